use super::view::{user_response, UserResponse};
use crate::api::ErrorResponse;
use crate::auth::hash_password;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::{NewUser, User};
use crate::schema::users;
use crate::validation::{
    is_valid_email, is_valid_username, FieldErrors, MAX_EMAIL, MAX_USER_NAME, MIN_PASSWORD,
};
use axum::extract::rejection::JsonRejection;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl SignupRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        errors.check_text("email", &self.email, MAX_EMAIL);
        if !self.email.trim().is_empty() && !is_valid_email(self.email.trim()) {
            errors.add("email", "Enter a valid email address");
        }

        errors.check_text("username", &self.username, MAX_USER_NAME);
        if !self.username.is_empty() && !is_valid_username(&self.username) {
            errors.add(
                "username",
                "Username may contain only letters, digits and @/./+/-/_",
            );
        }

        errors.check_text("first_name", &self.first_name, MAX_USER_NAME);
        errors.check_text("last_name", &self.last_name, MAX_USER_NAME);

        if self.password.chars().count() < MIN_PASSWORD {
            errors.add(
                "password",
                format!("Password must be at least {} characters", MIN_PASSWORD),
            );
        }

        errors.into_result()
    }
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Email or username already taken", body = ErrorResponse)
    )
)]
pub async fn signup(
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    req.validate()?;

    let email = req.email.trim().to_lowercase();
    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        ApiError::Internal("Failed to hash password".to_string())
    })?;

    let mut conn = pool.get()?;

    let new_user = NewUser {
        email: &email,
        username: &req.username,
        first_name: req.first_name.trim(),
        last_name: req.last_name.trim(),
        password_hash: &password_hash,
    };

    let user: User = match diesel::insert_into(users::table)
        .values(&new_user)
        .returning(User::as_returning())
        .get_result(&mut conn)
    {
        Ok(u) => u,
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            return Err(ApiError::Conflict(
                "A user with that email or username already exists".to_string(),
            ))
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = %user.id, username = %user.username, "user signed up");

    Ok((
        StatusCode::CREATED,
        Json(user_response(&config, &user, false)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SignupRequest {
        SignupRequest {
            email: "cook@example.com".to_string(),
            username: "cook".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Baker".to_string(),
            password: "long enough".to_string(),
        }
    }

    #[test]
    fn test_valid_signup() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_collects_every_field_error() {
        let req = SignupRequest {
            email: "not-an-email".to_string(),
            username: "has space".to_string(),
            first_name: "".to_string(),
            last_name: "x".repeat(151),
            password: "short".to_string(),
        };

        let errors = req.validate().unwrap_err();

        for field in ["email", "username", "first_name", "last_name", "password"] {
            assert!(errors.get(field).is_some(), "expected error for {field}");
        }
    }
}
