use crate::api::ErrorResponse;
use crate::guards::GuardError;
use crate::shopping_list::ShoppingListError;
use crate::store::StoreError;
use crate::validation::FieldErrors;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Error returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid input")]
    Validation(FieldErrors),

    #[error("You do not have permission to perform this action")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),

    /// A request body or query string the extractors could not accept.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error(transparent)]
    Guard(#[from] GuardError),

    #[error(transparent)]
    ShoppingList(#[from] ShoppingListError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Database connection failed: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Rejected { status, .. } => *status,
            ApiError::Guard(GuardError::Store(_))
            | ApiError::ShoppingList(ShoppingListError::Store(_))
            | ApiError::Store(_)
            | ApiError::Internal(_)
            | ApiError::Database(_)
            | ApiError::Pool(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Guard(_) | ApiError::ShoppingList(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            ErrorResponse {
                error: "Internal server error".to_string(),
                fields: None,
            }
        } else {
            let fields = match &self {
                ApiError::Validation(fields) => Some(fields.clone()),
                _ => None,
            };
            ErrorResponse {
                error: self.to_string(),
                fields,
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::users::subscriptions::SubscriptionsParams;
    use crate::store::Relation;
    use axum::body::to_bytes;
    use axum::extract::Query;
    use axum::http::Uri;

    #[test]
    fn test_business_rule_rejections_are_bad_requests() {
        for err in [
            ApiError::from(GuardError::AlreadyExists(Relation::Favorite)),
            ApiError::from(GuardError::NotFound(Relation::ShoppingCart)),
            ApiError::from(GuardError::SelfSubscription),
            ApiError::from(ShoppingListError::EmptyCart),
            ApiError::from(FieldErrors::new()),
        ] {
            assert_eq!(err.status(), StatusCode::BAD_REQUEST, "{err}");
        }
    }

    #[test]
    fn test_store_failures_are_server_errors() {
        assert_eq!(
            ApiError::from(GuardError::Store(StoreError::UniqueViolation)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(diesel::result::Error::NotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_query_rejection_keeps_error_shape() {
        let uri: Uri = "/api/users/subscriptions?recipes_limit=-1".parse().unwrap();
        let rejection = Query::<SubscriptionsParams>::try_from_uri(&uri).unwrap_err();

        let response = ApiError::from(rejection).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to deserialize query string"));
    }

    #[test]
    fn test_resource_statuses() {
        assert_eq!(ApiError::NotFound("Recipe").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::NotFound("Recipe").to_string(), "Recipe not found");
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::Conflict("taken".to_string()).status(),
            StatusCode::CONFLICT
        );
    }
}
