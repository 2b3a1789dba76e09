use super::view::{authors_with_recipes, AuthorWithRecipes};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::follows;
use crate::pagination::{Page, PageParams, PageRequest};
use crate::store::PgStore;
use axum::extract::rejection::QueryRejection;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SubscriptionsParams {
    /// 1-based page number (default 1)
    pub page: Option<i64>,
    /// Authors per page (default from server config, max 100)
    pub limit: Option<i64>,
    /// Maximum number of recipes to include per author
    pub recipes_limit: Option<usize>,
}

#[utoipa::path(
    get,
    path = "/api/users/subscriptions",
    tag = "users",
    params(SubscriptionsParams),
    responses(
        (status = 200, description = "Page of followed authors with their recipes", body = Page<AuthorWithRecipes>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_subscriptions(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    query: Result<Query<SubscriptionsParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = query?;
    let request = PageRequest::from_params(
        &PageParams {
            page: params.page,
            limit: params.limit,
        },
        config.page_size,
    );
    let mut conn = pool.get()?;

    let (count, entries) = follows::list_subscriptions(
        &mut PgStore::new(&mut conn),
        user.id,
        request.offset(),
        request.limit,
        params.recipes_limit,
    )?;

    let results = authors_with_recipes(&mut conn, &config, entries)?;

    Ok(Json(Page::new(request, count, results)))
}
