use crate::api::recipes::view::RecipeShort;
use crate::config::Config;
use crate::error::ApiError;
use crate::follows::AuthorRecipes;
use crate::models::User;
use crate::schema::{subscriptions, users};
use diesel::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the caller follows this user (always false for anonymous callers)
    pub is_subscribed: bool,
    /// Absolute URL of the avatar, if one is set
    pub avatar: Option<String>,
}

/// A followed author with a preview of their recipes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorWithRecipes {
    #[serde(flatten)]
    pub user: UserResponse,
    pub recipes: Vec<RecipeShort>,
    /// Total number of recipes by this author, regardless of `recipes_limit`
    pub recipes_count: i64,
}

pub fn user_response(config: &Config, user: &User, is_subscribed: bool) -> UserResponse {
    UserResponse {
        id: user.id,
        email: user.email.clone(),
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        is_subscribed,
        avatar: user
            .avatar_content_type
            .as_ref()
            .map(|_| config.avatar_url(user.id)),
    }
}

/// The subset of `authors` that `viewer` follows.
pub fn subscribed_to(
    conn: &mut PgConnection,
    viewer: Option<Uuid>,
    authors: &[Uuid],
) -> Result<HashSet<Uuid>, diesel::result::Error> {
    let Some(viewer) = viewer else {
        return Ok(HashSet::new());
    };
    if authors.is_empty() {
        return Ok(HashSet::new());
    }

    let ids: Vec<Uuid> = subscriptions::table
        .filter(subscriptions::user_id.eq(viewer))
        .filter(subscriptions::author_id.eq_any(authors))
        .select(subscriptions::author_id)
        .load(conn)?;
    Ok(ids.into_iter().collect())
}

/// Build responses for `users`, resolving `is_subscribed` for `viewer` in one query.
pub fn user_responses(
    conn: &mut PgConnection,
    config: &Config,
    viewer: Option<Uuid>,
    users: &[User],
) -> Result<Vec<UserResponse>, diesel::result::Error> {
    let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
    let subscribed = subscribed_to(conn, viewer, &ids)?;
    Ok(users
        .iter()
        .map(|user| user_response(config, user, subscribed.contains(&user.id)))
        .collect())
}

pub fn find_user(conn: &mut PgConnection, id: Uuid) -> Result<User, ApiError> {
    users::table
        .find(id)
        .select(User::as_select())
        .first(conn)
        .optional()?
        .ok_or(ApiError::NotFound("User"))
}

/// Attach user profiles to subscription entries. The caller follows every one
/// of them, so `is_subscribed` is always true.
pub fn authors_with_recipes(
    conn: &mut PgConnection,
    config: &Config,
    entries: Vec<AuthorRecipes>,
) -> Result<Vec<AuthorWithRecipes>, ApiError> {
    let ids: Vec<Uuid> = entries.iter().map(|e| e.author_id).collect();
    let mut authors: HashMap<Uuid, User> = users::table
        .filter(users::id.eq_any(&ids))
        .select(User::as_select())
        .load(conn)?
        .into_iter()
        .map(|user| (user.id, user))
        .collect();

    let mut result = Vec::with_capacity(entries.len());
    for entry in entries {
        // An author deleted between the two reads is simply skipped.
        let Some(author) = authors.remove(&entry.author_id) else {
            continue;
        };
        result.push(AuthorWithRecipes {
            user: user_response(config, &author, true),
            recipes: entry
                .recipes
                .iter()
                .map(|recipe| RecipeShort::from_brief(config, recipe))
                .collect(),
            recipes_count: entry.recipes_count,
        });
    }
    Ok(result)
}
