use crate::api::recipes::view::find_recipe;
use crate::api::ErrorResponse;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::ApiError;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/s/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 308, description = "Redirect to the recipe page"),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn redirect(
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;
    let recipe = find_recipe(&mut conn, id)?;

    Ok(Redirect::permanent(&format!(
        "{}/recipes/{}",
        config.public_base_url, recipe.id
    )))
}
