use super::payload::{Mode, RecipeRequest};
use super::sets::{known_references, replace_ingredients, replace_tags};
use super::view::{find_recipe, recipe_response, RecipeResponse};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::{Recipe, RecipeChanges};
use crate::schema::recipes;
use axum::extract::rejection::JsonRejection;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    patch,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    Path(id): Path<Uuid>,
    payload: Result<Json<RecipeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let mut conn = pool.get()?;

    let existing = find_recipe(&mut conn, id)?;
    if existing.author_id != user.id {
        return Err(ApiError::Forbidden);
    }

    let (known_ingredients, known_tags) = known_references(&mut conn, &req)?;
    let valid = req.validate(Mode::Update, &known_ingredients, &known_tags)?;

    let changes = RecipeChanges {
        name: valid.name.as_deref(),
        text: valid.text.as_deref(),
        image: valid.image.as_ref().map(|i| i.data.as_slice()),
        image_content_type: valid.image.as_ref().map(|i| i.content_type.as_str()),
        cooking_time: valid.cooking_time,
    };

    let recipe = conn.transaction(|conn| {
        let recipe: Recipe = if changes.is_empty() {
            existing
        } else {
            diesel::update(recipes::table.find(id))
                .set(&changes)
                .returning(Recipe::as_returning())
                .get_result(conn)?
        };

        if let Some(tags) = &valid.tags {
            replace_tags(conn, id, tags)?;
        }
        if let Some(ingredients) = &valid.ingredients {
            replace_ingredients(conn, id, ingredients)?;
        }

        Ok::<_, diesel::result::Error>(recipe)
    })?;

    tracing::info!(recipe_id = %id, "recipe updated");

    let response = recipe_response(&mut conn, &config, Some(user.id), recipe)?;
    Ok(Json(response))
}
