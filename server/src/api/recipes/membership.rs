//! Shared body of the favorite and shopping-cart toggles.

use super::view::{find_recipe, RecipeShort};
use crate::config::Config;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::guards;
use crate::store::{PgStore, Relation};
use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use uuid::Uuid;

/// Put `recipe_id` into the user's `relation` set. 201 with the short recipe.
pub(super) fn add(
    pool: &DbPool,
    config: &Config,
    relation: Relation,
    user_id: Uuid,
    recipe_id: Uuid,
) -> Result<Response, ApiError> {
    let mut conn = pool.get()?;
    let recipe = find_recipe(&mut conn, recipe_id)?;

    guards::add(&mut PgStore::new(&mut conn), relation, user_id, recipe.id)?;

    Ok((
        StatusCode::CREATED,
        Json(RecipeShort::from_recipe(config, &recipe)),
    )
        .into_response())
}

/// Take `recipe_id` out of the user's `relation` set. 204.
pub(super) fn remove(
    pool: &DbPool,
    relation: Relation,
    user_id: Uuid,
    recipe_id: Uuid,
) -> Result<Response, ApiError> {
    let mut conn = pool.get()?;
    let recipe = find_recipe(&mut conn, recipe_id)?;

    guards::remove(&mut PgStore::new(&mut conn), relation, user_id, recipe.id)?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
