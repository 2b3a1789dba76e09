use super::view::{user_responses, UserResponse};
use crate::api::ErrorResponse;
use crate::auth::MaybeAuthUser;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::User;
use crate::pagination::{Page, PageParams, PageRequest};
use crate::schema::users;
use axum::extract::rejection::QueryRejection;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(PageParams),
    responses(
        (status = 200, description = "Page of users", body = Page<UserResponse>),
        (status = 401, description = "Invalid token", body = ErrorResponse)
    )
)]
pub async fn list_users(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = query?;
    let request = PageRequest::from_params(&params, config.page_size);
    let mut conn = pool.get()?;

    let count: i64 = users::table.count().get_result(&mut conn)?;
    let page: Vec<User> = users::table
        .order((users::created_at.asc(), users::id.asc()))
        .offset(request.offset())
        .limit(request.limit)
        .select(User::as_select())
        .load(&mut conn)?;

    let results = user_responses(&mut conn, &config, viewer.map(|u| u.id), &page)?;

    Ok(Json(Page::new(request, count, results)))
}
