use crate::api::ErrorResponse;
use crate::auth::{bearer_token, delete_session, AuthUser};
use crate::db::DbPool;
use crate::error::ApiError;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/auth/token/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Session ended"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    // AuthUser already validated the header.
    if let Ok(Some(token)) = bearer_token(&headers) {
        let mut conn = pool.get()?;
        delete_session(&mut conn, token)?;
    }
    tracing::info!(user_id = %user.id, "user logged out");

    Ok(StatusCode::NO_CONTENT)
}
