pub mod auth;
pub mod ingredients;
pub mod recipes;
pub mod short_link;
pub mod tags;
pub mod testing;
pub mod users;

use crate::images::MAX_FILE_SIZE;
use crate::validation::FieldErrors;
use crate::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{OpenApi, ToSchema};

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Per-field validation messages, present only for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

/// Body size cap for routes that take a base64 image inside JSON: the largest
/// accepted image after base64 expansion, plus 1 MiB for the other fields.
pub const IMAGE_BODY_LIMIT: usize = MAX_FILE_SIZE.div_ceil(3) * 4 + 1024 * 1024;

/// Replaces axum's default 2 MB body limit on image upload routes.
pub fn image_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(IMAGE_BODY_LIMIT)
}

/// Every API route. Authentication is enforced per handler through the
/// `AuthUser` / `MaybeAuthUser` extractors.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth::router())
        .nest("/api/users", users::router())
        .nest("/api/tags", tags::router())
        .nest("/api/ingredients", ingredients::router())
        .nest("/api/recipes", recipes::router())
        .nest("/api/test", testing::router())
        .route("/s/{id}", get(short_link::redirect))
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Base spec with shared components and security
    #[derive(OpenApi)]
    #[openapi(
        info(title = "recipebox", description = "Recipe sharing API"),
        paths(short_link::redirect),
        components(schemas(ErrorResponse, FieldErrors))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }

    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        auth::ApiDoc::openapi(),
        users::ApiDoc::openapi(),
        tags::ApiDoc::openapi(),
        ingredients::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        testing::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::recipes::payload::RecipeRequest;
    use crate::error::ApiError;
    use axum::body::{to_bytes, Body};
    use axum::extract::rejection::JsonRejection;
    use axum::http::{header, Request, StatusCode};
    use axum::routing::post;
    use axum::Json;
    use tower::ServiceExt;

    async fn image_len(
        payload: Result<Json<RecipeRequest>, JsonRejection>,
    ) -> Result<String, ApiError> {
        let Json(req) = payload?;
        Ok(req.image.map_or(0, |image| image.len()).to_string())
    }

    async fn post_image(len: usize) -> (StatusCode, serde_json::Value) {
        let app: Router = Router::new()
            .route("/", post(image_len))
            .layer(image_body_limit());
        let body = serde_json::json!({ "name": "Bread", "image": "A".repeat(len) }).to_string();
        let request = Request::post("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[test]
    fn test_image_body_limit_fits_largest_image() {
        let largest = "data:image/webp;base64,".len() + MAX_FILE_SIZE.div_ceil(3) * 4;
        assert!(IMAGE_BODY_LIMIT > largest + 1024);
    }

    #[tokio::test]
    async fn test_image_above_default_limit_is_accepted() {
        let (status, json) = post_image(4 * 1024 * 1024).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!(4 * 1024 * 1024));
    }

    #[tokio::test]
    async fn test_oversized_body_gets_error_shape() {
        let (status, json) = post_image(IMAGE_BODY_LIMIT).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(json["error"].is_string());
    }

    #[test]
    fn test_openapi_contains_core_paths() {
        let spec = openapi();
        for path in [
            "/api/recipes/download_shopping_cart",
            "/api/recipes/{id}/favorite",
            "/api/recipes/{id}/shopping_cart",
            "/api/users/{id}/subscribe",
            "/api/users/subscriptions",
            "/s/{id}",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let spec = openapi();
        let components = spec.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }

    #[test]
    fn test_error_response_omits_empty_fields() {
        let body = ErrorResponse {
            error: "nope".to_string(),
            fields: None,
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({"error": "nope"})
        );
    }
}
