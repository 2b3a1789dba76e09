pub mod avatar;
pub mod get;
pub mod list;
pub mod me;
pub mod set_password;
pub mod signup;
pub mod subscribe;
pub mod subscriptions;
pub mod view;

use crate::api::image_body_limit;
use crate::AppState;
use axum::routing::{get, post, put};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/users endpoints (mounted at /api/users)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_users).post(signup::signup))
        .route("/me", get(me::me))
        .route(
            "/me/avatar",
            put(avatar::put_avatar)
                .delete(avatar::delete_avatar)
                .layer(image_body_limit()),
        )
        .route("/set_password", post(set_password::set_password))
        .route("/subscriptions", get(subscriptions::list_subscriptions))
        .route("/{id}", get(get::get_user))
        .route("/{id}/avatar", get(avatar::get_avatar))
        .route(
            "/{id}/subscribe",
            post(subscribe::subscribe).delete(subscribe::unsubscribe),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        signup::signup,
        list::list_users,
        get::get_user,
        me::me,
        avatar::get_avatar,
        avatar::put_avatar,
        avatar::delete_avatar,
        set_password::set_password,
        subscribe::subscribe,
        subscribe::unsubscribe,
        subscriptions::list_subscriptions,
    ),
    components(schemas(
        view::UserResponse,
        view::AuthorWithRecipes,
        signup::SignupRequest,
        avatar::AvatarRequest,
        avatar::AvatarResponse,
        set_password::SetPasswordRequest,
    ))
)]
pub struct ApiDoc;
