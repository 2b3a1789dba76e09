use super::view::{user_response, UserResponse};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::config::Config;
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "users",
    responses(
        (status = 200, description = "The authenticated user", body = UserResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn me(AuthUser(user): AuthUser, State(config): State<Arc<Config>>) -> impl IntoResponse {
    Json(user_response(&config, &user, false))
}
