pub mod create;
pub mod delete;
pub mod download;
pub mod favorite;
pub mod get;
pub mod get_link;
pub mod image;
pub mod list;
mod membership;
pub mod payload;
mod sets;
pub mod shopping_cart;
pub mod update;
pub mod view;

use crate::api::image_body_limit;
use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list::list_recipes)
                .post(create::create_recipe)
                .layer(image_body_limit()),
        )
        .route(
            "/download_shopping_cart",
            get(download::download_shopping_cart),
        )
        .route(
            "/{id}",
            get(get::get_recipe)
                .patch(update::update_recipe)
                .delete(delete::delete_recipe)
                .layer(image_body_limit()),
        )
        .route("/{id}/image", get(image::get_image))
        .route("/{id}/get-link", get(get_link::get_link))
        .route(
            "/{id}/favorite",
            post(favorite::add_favorite).delete(favorite::remove_favorite),
        )
        .route(
            "/{id}/shopping_cart",
            post(shopping_cart::add_to_cart).delete(shopping_cart::remove_from_cart),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_recipes,
        create::create_recipe,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
        image::get_image,
        get_link::get_link,
        favorite::add_favorite,
        favorite::remove_favorite,
        shopping_cart::add_to_cart,
        shopping_cart::remove_from_cart,
        download::download_shopping_cart,
    ),
    components(schemas(
        view::RecipeResponse,
        view::RecipeShort,
        view::IngredientAmountResponse,
        payload::RecipeRequest,
        payload::IngredientAmountRequest,
        get_link::ShortLinkResponse,
    ))
)]
pub struct ApiDoc;
