use super::view::{recipe_responses, RecipeResponse};
use crate::api::ErrorResponse;
use crate::auth::MaybeAuthUser;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::Recipe;
use crate::pagination::{Page, PageParams, PageRequest};
use crate::schema::{favorites, recipe_tags, recipes, shopping_cart, tags};
use axum::extract::rejection::QueryRejection;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use diesel::pg::Pg;
use diesel::prelude::*;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

/// Query parameters for the recipe list. `tags` may be repeated.
#[derive(Debug, Default, IntoParams)]
pub struct ListRecipesParams {
    /// 1-based page number (default 1)
    pub page: Option<i64>,
    /// Items per page (default from server config, max 100)
    pub limit: Option<i64>,
    /// Only recipes by this author
    pub author: Option<Uuid>,
    /// Tag slugs; recipes with any of them match
    pub tags: Vec<String>,
    /// `1` to list only the caller's favorites
    pub is_favorited: Option<bool>,
    /// `1` to list only recipes in the caller's shopping cart
    pub is_in_shopping_cart: Option<bool>,
}

fn parse_flag(value: &str) -> Result<bool, ApiError> {
    match value {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        other => Err(ApiError::BadRequest(format!(
            "Invalid boolean value: {other:?}"
        ))),
    }
}

impl ListRecipesParams {
    /// Build from raw query pairs so that repeated `tags` keys are kept.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, ApiError> {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "page" | "limit" => {
                    let n: i64 = value.parse().map_err(|_| {
                        ApiError::BadRequest(format!("Invalid {key} value: {value:?}"))
                    })?;
                    if key == "page" {
                        params.page = Some(n);
                    } else {
                        params.limit = Some(n);
                    }
                }
                "author" => {
                    params.author = Some(value.parse().map_err(|_| {
                        ApiError::BadRequest(format!("Invalid author id: {value:?}"))
                    })?)
                }
                "tags" if !value.is_empty() => params.tags.push(value),
                "is_favorited" => params.is_favorited = Some(parse_flag(&value)?),
                "is_in_shopping_cart" => params.is_in_shopping_cart = Some(parse_flag(&value)?),
                _ => {}
            }
        }
        Ok(params)
    }

    fn wants_favorites(&self) -> bool {
        self.is_favorited == Some(true)
    }

    fn wants_cart(&self) -> bool {
        self.is_in_shopping_cart == Some(true)
    }
}

/// Recipes matching `params`, for `viewer`. Built fresh for each use because
/// boxed queries cannot be cloned.
fn filtered<'a>(params: &'a ListRecipesParams, viewer: Option<Uuid>) -> recipes::BoxedQuery<'a, Pg> {
    let mut query = recipes::table.into_boxed();

    if let Some(author) = params.author {
        query = query.filter(recipes::author_id.eq(author));
    }

    if !params.tags.is_empty() {
        query = query.filter(
            recipes::id.eq_any(
                recipe_tags::table
                    .inner_join(tags::table)
                    .filter(tags::slug.eq_any(&params.tags))
                    .select(recipe_tags::recipe_id),
            ),
        );
    }

    if let Some(viewer) = viewer {
        if params.wants_favorites() {
            query = query.filter(
                recipes::id.eq_any(
                    favorites::table
                        .filter(favorites::user_id.eq(viewer))
                        .select(favorites::recipe_id),
                ),
            );
        }
        if params.wants_cart() {
            query = query.filter(
                recipes::id.eq_any(
                    shopping_cart::table
                        .filter(shopping_cart::user_id.eq(viewer))
                        .select(shopping_cart::recipe_id),
                ),
            );
        }
    }

    query
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Page of recipes, newest first", body = Page<RecipeResponse>),
        (status = 400, description = "Invalid parameters", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(pairs) = query?;
    let params = ListRecipesParams::from_pairs(pairs)?;
    let request = PageRequest::from_params(
        &PageParams {
            page: params.page,
            limit: params.limit,
        },
        config.page_size,
    );
    let viewer = viewer.map(|u| u.id);

    // Anonymous callers have no favorites or cart.
    if viewer.is_none() && (params.wants_favorites() || params.wants_cart()) {
        return Ok(Json(Page::new(request, 0, Vec::new())));
    }

    let mut conn = pool.get()?;

    let count: i64 = filtered(&params, viewer).count().get_result(&mut conn)?;
    let page: Vec<Recipe> = filtered(&params, viewer)
        .order((recipes::created_at.desc(), recipes::id.desc()))
        .offset(request.offset())
        .limit(request.limit)
        .select(Recipe::as_select())
        .load(&mut conn)?;

    let results = recipe_responses(&mut conn, &config, viewer, page)?;

    Ok(Json(Page::new(request, count, results)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_repeated_tags_are_kept() {
        let params =
            ListRecipesParams::from_pairs(pairs(&[("tags", "breakfast"), ("tags", "lunch")]))
                .unwrap();
        assert_eq!(params.tags, vec!["breakfast", "lunch"]);
    }

    #[test]
    fn test_flags() {
        let params = ListRecipesParams::from_pairs(pairs(&[
            ("is_favorited", "1"),
            ("is_in_shopping_cart", "0"),
        ]))
        .unwrap();
        assert!(params.wants_favorites());
        assert!(!params.wants_cart());

        assert!(ListRecipesParams::from_pairs(pairs(&[("is_favorited", "yes")])).is_err());
    }

    #[test]
    fn test_paging_and_author() {
        let author = Uuid::new_v4();
        let params = ListRecipesParams::from_pairs(pairs(&[
            ("page", "2"),
            ("limit", "10"),
            ("author", &author.to_string()),
            ("unknown", "ignored"),
        ]))
        .unwrap();
        assert_eq!(params.page, Some(2));
        assert_eq!(params.limit, Some(10));
        assert_eq!(params.author, Some(author));

        assert!(ListRecipesParams::from_pairs(pairs(&[("page", "two")])).is_err());
        assert!(ListRecipesParams::from_pairs(pairs(&[("author", "nobody")])).is_err());
    }
}
