use crate::images::{decode_data_url, DecodedImage};
use crate::validation::{
    FieldErrors, MAX_COOKING_TIME, MAX_INGREDIENT_AMOUNT, MAX_RECIPE_NAME, MIN_COOKING_TIME,
    MIN_INGREDIENT_AMOUNT,
};
use serde::Deserialize;
use std::collections::HashSet;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IngredientAmountRequest {
    /// Ingredient ID
    pub id: Uuid,
    pub amount: i32,
}

/// Body of recipe create and update requests.
///
/// On create every field is required. On update, omitted fields are left as
/// they are; `ingredients` and `tags`, when given, replace the previous sets.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RecipeRequest {
    pub ingredients: Option<Vec<IngredientAmountRequest>>,
    /// Tag IDs
    pub tags: Option<Vec<Uuid>>,
    /// Base64 image, optionally as a `data:image/...;base64,` URL
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    /// Minutes
    pub cooking_time: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update,
}

/// A request that passed validation.
#[derive(Debug)]
pub struct ValidRecipe {
    pub ingredients: Option<Vec<(Uuid, i32)>>,
    pub tags: Option<Vec<Uuid>>,
    pub image: Option<DecodedImage>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
}

impl RecipeRequest {
    pub fn ingredient_ids(&self) -> Vec<Uuid> {
        self.ingredients
            .iter()
            .flatten()
            .map(|i| i.id)
            .collect()
    }

    pub fn tag_ids(&self) -> Vec<Uuid> {
        self.tags.iter().flatten().copied().collect()
    }

    /// Check every field and report all problems at once.
    ///
    /// `known_ingredients` and `known_tags` are the referenced IDs that exist.
    pub fn validate(
        self,
        mode: Mode,
        known_ingredients: &HashSet<Uuid>,
        known_tags: &HashSet<Uuid>,
    ) -> Result<ValidRecipe, FieldErrors> {
        let mut errors = FieldErrors::new();
        let required = |errors: &mut FieldErrors, field: &str| {
            if mode == Mode::Create {
                errors.add(field, "This field is required");
            }
        };

        match &self.ingredients {
            None => required(&mut errors, "ingredients"),
            Some(items) if items.is_empty() => {
                errors.add("ingredients", "Add at least one ingredient")
            }
            Some(items) => {
                let mut seen = HashSet::new();
                for item in items {
                    if !seen.insert(item.id) {
                        errors.add("ingredients", "Ingredients must not repeat");
                    }
                    if !known_ingredients.contains(&item.id) {
                        errors.add("ingredients", format!("Ingredient {} does not exist", item.id));
                    }
                    if !(MIN_INGREDIENT_AMOUNT..=MAX_INGREDIENT_AMOUNT).contains(&item.amount) {
                        errors.add(
                            "ingredients",
                            format!(
                                "Amount must be between {} and {}",
                                MIN_INGREDIENT_AMOUNT, MAX_INGREDIENT_AMOUNT
                            ),
                        );
                    }
                }
            }
        }

        match &self.tags {
            None => required(&mut errors, "tags"),
            Some(tags) if tags.is_empty() => errors.add("tags", "Choose at least one tag"),
            Some(tags) => {
                let mut seen = HashSet::new();
                for tag in tags {
                    if !seen.insert(*tag) {
                        errors.add("tags", "Tags must not repeat");
                    }
                    if !known_tags.contains(tag) {
                        errors.add("tags", format!("Tag {} does not exist", tag));
                    }
                }
            }
        }

        match &self.name {
            None => required(&mut errors, "name"),
            Some(name) => errors.check_text("name", name, MAX_RECIPE_NAME),
        }

        match &self.text {
            None => required(&mut errors, "text"),
            Some(text) if text.trim().is_empty() => {
                errors.add("text", "This field may not be blank")
            }
            Some(_) => {}
        }

        match self.cooking_time {
            None => required(&mut errors, "cooking_time"),
            Some(minutes) => {
                errors.check_range("cooking_time", minutes, MIN_COOKING_TIME, MAX_COOKING_TIME)
            }
        }

        let image = match &self.image {
            None => {
                required(&mut errors, "image");
                None
            }
            Some(raw) => match decode_data_url(raw) {
                Ok(image) => Some(image),
                Err(message) => {
                    errors.add("image", message);
                    None
                }
            },
        };

        errors.into_result()?;

        Ok(ValidRecipe {
            ingredients: self
                .ingredients
                .map(|items| items.into_iter().map(|i| (i.id, i.amount)).collect()),
            tags: self.tags,
            image,
            name: self.name.map(|n| n.trim().to_string()),
            text: self.text,
            cooking_time: self.cooking_time,
        })
    }
}
