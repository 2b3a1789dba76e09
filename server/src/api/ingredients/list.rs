use super::IngredientResponse;
use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::Ingredient;
use crate::schema::ingredients;
use axum::extract::rejection::QueryRejection;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListIngredientsParams {
    /// Case-insensitive prefix of the ingredient name
    pub name: Option<String>,
}

/// `LIKE` pattern matching names that start with `prefix`.
fn prefix_pattern(prefix: &str) -> String {
    format!(
        "{}%",
        prefix
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_")
    )
}

#[utoipa::path(
    get,
    path = "/api/ingredients",
    tag = "ingredients",
    params(ListIngredientsParams),
    responses(
        (status = 200, description = "Matching ingredients, ordered by name", body = Vec<IngredientResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_ingredients(
    State(pool): State<Arc<DbPool>>,
    query: Result<Query<ListIngredientsParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = query?;
    let mut conn = pool.get()?;

    let mut query = ingredients::table.into_boxed();
    if let Some(name) = params.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        query = query.filter(ingredients::name.ilike(prefix_pattern(name)));
    }

    let ingredients: Vec<IngredientResponse> = query
        .order((ingredients::name.asc(), ingredients::measurement_unit.asc()))
        .select(Ingredient::as_select())
        .load(&mut conn)?
        .into_iter()
        .map(IngredientResponse::from)
        .collect();

    Ok(Json(ingredients))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_pattern_escapes_wildcards() {
        assert_eq!(prefix_pattern("sug"), "sug%");
        assert_eq!(prefix_pattern("100%_"), "100\\%\\_%");
    }
}
