use super::payload::{Mode, RecipeRequest};
use super::sets::{known_references, replace_ingredients, replace_tags};
use super::view::{recipe_response, RecipeResponse};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::{NewRecipe, Recipe};
use crate::schema::recipes;
use axum::extract::rejection::JsonRejection;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    payload: Result<Json<RecipeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let mut conn = pool.get()?;

    let (known_ingredients, known_tags) = known_references(&mut conn, &req)?;
    let valid = req.validate(Mode::Create, &known_ingredients, &known_tags)?;

    // Create mode guarantees every field is present.
    let (Some(ingredients), Some(tags), Some(image), Some(name), Some(text), Some(cooking_time)) = (
        valid.ingredients,
        valid.tags,
        valid.image,
        valid.name,
        valid.text,
        valid.cooking_time,
    ) else {
        return Err(ApiError::BadRequest("Incomplete recipe".to_string()));
    };

    let recipe = conn.transaction(|conn| {
        let recipe: Recipe = diesel::insert_into(recipes::table)
            .values(&NewRecipe {
                author_id: user.id,
                name: &name,
                text: &text,
                image: &image.data,
                image_content_type: &image.content_type,
                cooking_time,
            })
            .returning(Recipe::as_returning())
            .get_result(conn)?;

        replace_tags(conn, recipe.id, &tags)?;
        replace_ingredients(conn, recipe.id, &ingredients)?;

        Ok::<_, diesel::result::Error>(recipe)
    })?;

    tracing::info!(recipe_id = %recipe.id, author_id = %user.id, "recipe created");

    let response = recipe_response(&mut conn, &config, Some(user.id), recipe)?;
    Ok((StatusCode::CREATED, Json(response)))
}
