//! Writes for a recipe's tag and ingredient sets.

use super::payload::RecipeRequest;
use crate::models::{NewAmount, NewRecipeTag};
use crate::schema::{amounts, ingredients, recipe_tags, tags};
use diesel::prelude::*;
use std::collections::HashSet;
use uuid::Uuid;

/// The ingredient and tag IDs referenced by `req` that exist.
pub fn known_references(
    conn: &mut PgConnection,
    req: &RecipeRequest,
) -> Result<(HashSet<Uuid>, HashSet<Uuid>), diesel::result::Error> {
    let ingredient_ids = req.ingredient_ids();
    let tag_ids = req.tag_ids();

    let known_ingredients: Vec<Uuid> = if ingredient_ids.is_empty() {
        Vec::new()
    } else {
        ingredients::table
            .filter(ingredients::id.eq_any(&ingredient_ids))
            .select(ingredients::id)
            .load(conn)?
    };
    let known_tags: Vec<Uuid> = if tag_ids.is_empty() {
        Vec::new()
    } else {
        tags::table
            .filter(tags::id.eq_any(&tag_ids))
            .select(tags::id)
            .load(conn)?
    };

    Ok((
        known_ingredients.into_iter().collect(),
        known_tags.into_iter().collect(),
    ))
}

pub fn replace_tags(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    tag_ids: &[Uuid],
) -> Result<(), diesel::result::Error> {
    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id))).execute(conn)?;

    let rows: Vec<NewRecipeTag> = tag_ids
        .iter()
        .map(|&tag_id| NewRecipeTag { recipe_id, tag_id })
        .collect();
    diesel::insert_into(recipe_tags::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}

pub fn replace_ingredients(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    items: &[(Uuid, i32)],
) -> Result<(), diesel::result::Error> {
    diesel::delete(amounts::table.filter(amounts::recipe_id.eq(recipe_id))).execute(conn)?;

    let rows: Vec<NewAmount> = items
        .iter()
        .map(|&(ingredient_id, amount)| NewAmount {
            recipe_id,
            ingredient_id,
            amount,
        })
        .collect();
    diesel::insert_into(amounts::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}
