use super::{
    AmountRow, CartStore, RecipeBrief, Relation, RelationStore, StoreError, SubscriptionStore,
};
use std::collections::HashMap;
use uuid::Uuid;

/// In-memory store with the same uniqueness rules as the database schema.
///
/// Pairs are kept in insertion order, which stands in for the `created_at`
/// ordering used by [`super::PgStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    pairs: HashMap<Relation, Vec<(Uuid, Uuid)>>,
    recipes: Vec<RecipeBrief>,
    amounts: Vec<AmountRow>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a recipe together with its `(ingredient name, unit, amount)` lines.
    pub fn add_recipe(&mut self, recipe: RecipeBrief, lines: &[(&str, &str, i32)]) {
        for (name, unit, amount) in lines {
            self.amounts.push(AmountRow {
                recipe_id: recipe.id,
                name: name.to_string(),
                measurement_unit: unit.to_string(),
                amount: *amount,
            });
        }
        self.recipes.push(recipe);
    }

    /// Number of pairs currently stored for `relation`.
    pub fn count(&self, relation: Relation) -> usize {
        self.pairs.get(&relation).map_or(0, Vec::len)
    }

    fn position(&self, relation: Relation, subject: Uuid, object: Uuid) -> Option<usize> {
        self.pairs
            .get(&relation)?
            .iter()
            .position(|pair| *pair == (subject, object))
    }
}

impl RelationStore for MemoryStore {
    fn exists(
        &mut self,
        relation: Relation,
        subject: Uuid,
        object: Uuid,
    ) -> Result<bool, StoreError> {
        Ok(self.position(relation, subject, object).is_some())
    }

    fn insert(&mut self, relation: Relation, subject: Uuid, object: Uuid) -> Result<(), StoreError> {
        if self.position(relation, subject, object).is_some() {
            return Err(StoreError::UniqueViolation);
        }
        self.pairs
            .entry(relation)
            .or_default()
            .push((subject, object));
        Ok(())
    }

    fn delete(
        &mut self,
        relation: Relation,
        subject: Uuid,
        object: Uuid,
    ) -> Result<usize, StoreError> {
        match self.position(relation, subject, object) {
            Some(index) => {
                if let Some(pairs) = self.pairs.get_mut(&relation) {
                    pairs.remove(index);
                }
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

impl CartStore for MemoryStore {
    fn cart_recipe_ids(&mut self, user_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        Ok(self
            .pairs
            .get(&Relation::ShoppingCart)
            .map(|pairs| {
                pairs
                    .iter()
                    .filter(|(user, _)| *user == user_id)
                    .map(|(_, recipe)| *recipe)
                    .collect()
            })
            .unwrap_or_default())
    }

    fn amounts_for_recipes(&mut self, recipe_ids: &[Uuid]) -> Result<Vec<AmountRow>, StoreError> {
        Ok(self
            .amounts
            .iter()
            .filter(|row| recipe_ids.contains(&row.recipe_id))
            .cloned()
            .collect())
    }
}

impl SubscriptionStore for MemoryStore {
    fn followed_authors(
        &mut self,
        follower: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Uuid>, StoreError> {
        let offset = usize::try_from(offset).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .pairs
            .get(&Relation::Subscription)
            .map(|pairs| {
                pairs
                    .iter()
                    .filter(|(user, _)| *user == follower)
                    .map(|(_, author)| *author)
                    .skip(offset)
                    .take(limit)
                    .collect()
            })
            .unwrap_or_default())
    }

    fn count_followed(&mut self, follower: Uuid) -> Result<i64, StoreError> {
        let count = self
            .pairs
            .get(&Relation::Subscription)
            .map_or(0, |pairs| {
                pairs.iter().filter(|(user, _)| *user == follower).count()
            });
        Ok(count as i64)
    }

    fn recipes_by_authors(
        &mut self,
        authors: &[Uuid],
        per_author: Option<usize>,
    ) -> Result<Vec<RecipeBrief>, StoreError> {
        let mut recipes: Vec<RecipeBrief> = self
            .recipes
            .iter()
            .filter(|recipe| authors.contains(&recipe.author_id))
            .cloned()
            .collect();
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        if let Some(limit) = per_author {
            let mut taken: HashMap<Uuid, usize> = HashMap::new();
            recipes.retain(|recipe| {
                let seen = taken.entry(recipe.author_id).or_insert(0);
                *seen += 1;
                *seen <= limit
            });
        }
        Ok(recipes)
    }

    fn recipe_counts(&mut self, authors: &[Uuid]) -> Result<HashMap<Uuid, i64>, StoreError> {
        let mut counts = HashMap::new();
        for recipe in self.recipes.iter().filter(|r| authors.contains(&r.author_id)) {
            *counts.entry(recipe.author_id).or_insert(0) += 1;
        }
        Ok(counts)
    }
}
