use crate::api::tags::TagResponse;
use crate::api::users::view::{subscribed_to, user_response, UserResponse};
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{Recipe, Tag, User};
use crate::schema::{amounts, favorites, ingredients, recipe_tags, recipes, shopping_cart, tags, users};
use crate::store::RecipeBrief;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;
use uuid::Uuid;

/// Compact recipe representation used in favorites, carts and subscriptions.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeShort {
    pub id: Uuid,
    pub name: String,
    /// Absolute URL of the recipe image
    pub image: String,
    pub cooking_time: i32,
}

impl RecipeShort {
    pub fn from_recipe(config: &Config, recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: config.recipe_image_url(recipe.id),
            cooking_time: recipe.cooking_time,
        }
    }

    pub fn from_brief(config: &Config, recipe: &RecipeBrief) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: config.recipe_image_url(recipe.id),
            cooking_time: recipe.cooking_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngredientAmountResponse {
    /// Ingredient ID
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub author: UserResponse,
    pub name: String,
    /// Absolute URL of the recipe image
    pub image: String,
    pub text: String,
    pub ingredients: Vec<IngredientAmountResponse>,
    pub tags: Vec<TagResponse>,
    pub cooking_time: i32,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub created_at: DateTime<Utc>,
}

pub fn find_recipe(conn: &mut PgConnection, id: Uuid) -> Result<Recipe, ApiError> {
    recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound("Recipe"))
}

/// Build full responses for `recipes`, keeping their order. Related rows are
/// loaded with one query per relation rather than per recipe.
pub fn recipe_responses(
    conn: &mut PgConnection,
    config: &Config,
    viewer: Option<Uuid>,
    recipes: Vec<Recipe>,
) -> Result<Vec<RecipeResponse>, diesel::result::Error> {
    if recipes.is_empty() {
        return Ok(Vec::new());
    }

    let recipe_ids: Vec<Uuid> = recipes.iter().map(|r| r.id).collect();
    let author_ids: Vec<Uuid> = recipes.iter().map(|r| r.author_id).collect();

    let authors: HashMap<Uuid, User> = users::table
        .filter(users::id.eq_any(&author_ids))
        .select(User::as_select())
        .load(conn)?
        .into_iter()
        .map(|user| (user.id, user))
        .collect();
    let subscribed = subscribed_to(conn, viewer, &author_ids)?;

    let mut tags_by_recipe: HashMap<Uuid, Vec<TagResponse>> = HashMap::new();
    let tag_rows: Vec<(Uuid, Tag)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(&recipe_ids))
        .order(tags::name.asc())
        .select((recipe_tags::recipe_id, Tag::as_select()))
        .load(conn)?;
    for (recipe_id, tag) in tag_rows {
        tags_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(TagResponse::from(tag));
    }

    let mut ingredients_by_recipe: HashMap<Uuid, Vec<IngredientAmountResponse>> = HashMap::new();
    let amount_rows: Vec<(Uuid, Uuid, String, String, i32)> = amounts::table
        .inner_join(ingredients::table)
        .filter(amounts::recipe_id.eq_any(&recipe_ids))
        .order(ingredients::name.asc())
        .select((
            amounts::recipe_id,
            ingredients::id,
            ingredients::name,
            ingredients::measurement_unit,
            amounts::amount,
        ))
        .load(conn)?;
    for (recipe_id, id, name, measurement_unit, amount) in amount_rows {
        ingredients_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(IngredientAmountResponse {
                id,
                name,
                measurement_unit,
                amount,
            });
    }

    let (favorited, in_cart): (HashSet<Uuid>, HashSet<Uuid>) = match viewer {
        Some(viewer) => {
            let favorited: Vec<Uuid> = favorites::table
                .filter(favorites::user_id.eq(viewer))
                .filter(favorites::recipe_id.eq_any(&recipe_ids))
                .select(favorites::recipe_id)
                .load(conn)?;
            let in_cart: Vec<Uuid> = shopping_cart::table
                .filter(shopping_cart::user_id.eq(viewer))
                .filter(shopping_cart::recipe_id.eq_any(&recipe_ids))
                .select(shopping_cart::recipe_id)
                .load(conn)?;
            (favorited.into_iter().collect(), in_cart.into_iter().collect())
        }
        None => (HashSet::new(), HashSet::new()),
    };

    let mut responses = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        let Some(author) = authors.get(&recipe.author_id) else {
            tracing::warn!(recipe_id = %recipe.id, "recipe author missing, skipping");
            continue;
        };
        responses.push(RecipeResponse {
            id: recipe.id,
            author: user_response(config, author, subscribed.contains(&author.id)),
            image: config.recipe_image_url(recipe.id),
            ingredients: ingredients_by_recipe.remove(&recipe.id).unwrap_or_default(),
            tags: tags_by_recipe.remove(&recipe.id).unwrap_or_default(),
            cooking_time: recipe.cooking_time,
            is_favorited: favorited.contains(&recipe.id),
            is_in_shopping_cart: in_cart.contains(&recipe.id),
            created_at: recipe.created_at,
            name: recipe.name,
            text: recipe.text,
        });
    }
    Ok(responses)
}

/// Single-recipe variant of [`recipe_responses`].
pub fn recipe_response(
    conn: &mut PgConnection,
    config: &Config,
    viewer: Option<Uuid>,
    recipe: Recipe,
) -> Result<RecipeResponse, ApiError> {
    recipe_responses(conn, config, viewer, vec![recipe])?
        .pop()
        .ok_or(ApiError::NotFound("Recipe"))
}
