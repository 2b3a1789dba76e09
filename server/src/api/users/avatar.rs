use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::images::decode_data_url;
use crate::schema::users;
use crate::validation::FieldErrors;
use axum::extract::rejection::JsonRejection;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AvatarRequest {
    /// Base64 image, optionally as a `data:image/...;base64,` URL
    pub avatar: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvatarResponse {
    /// Absolute URL of the stored avatar
    pub avatar: String,
}

#[utoipa::path(
    get,
    path = "/api/users/{id}/avatar",
    tag = "users",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Avatar image data", content_type = "image/*"),
        (status = 404, description = "User or avatar not found", body = ErrorResponse)
    )
)]
pub async fn get_avatar(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let (data, content_type): (Option<Vec<u8>>, Option<String>) = users::table
        .find(id)
        .select((users::avatar, users::avatar_content_type))
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("User"))?;

    let (Some(data), Some(content_type)) = (data, content_type) else {
        return Err(ApiError::NotFound("Avatar"));
    };

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "no-cache".to_string()),
        ],
        data,
    ))
}

#[utoipa::path(
    put,
    path = "/api/users/me/avatar",
    tag = "users",
    request_body = AvatarRequest,
    responses(
        (status = 200, description = "Avatar stored", body = AvatarResponse),
        (status = 400, description = "Invalid image", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn put_avatar(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    payload: Result<Json<AvatarRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let image = decode_data_url(&req.avatar).map_err(|message| {
        let mut errors = FieldErrors::new();
        errors.add("avatar", message);
        ApiError::Validation(errors)
    })?;

    let mut conn = pool.get()?;
    diesel::update(users::table.find(user.id))
        .set((
            users::avatar.eq(Some(image.data.as_slice())),
            users::avatar_content_type.eq(Some(image.content_type.as_str())),
        ))
        .execute(&mut conn)?;

    tracing::info!(user_id = %user.id, bytes = image.data.len(), "avatar updated");

    Ok(Json(AvatarResponse {
        avatar: config.avatar_url(user.id),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/users/me/avatar",
    tag = "users",
    responses(
        (status = 204, description = "Avatar removed"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_avatar(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;
    diesel::update(users::table.find(user.id))
        .set((
            users::avatar.eq(None::<Vec<u8>>),
            users::avatar_content_type.eq(None::<String>),
        ))
        .execute(&mut conn)?;

    Ok(StatusCode::NO_CONTENT)
}
