//! Listing the authors a user follows, each with a preview of their recipes.

use crate::store::{RecipeBrief, StoreError, SubscriptionStore};
use std::collections::HashMap;
use uuid::Uuid;

/// An author together with their total recipe count and a (possibly truncated)
/// list of their recipes, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRecipes {
    pub author_id: Uuid,
    pub recipes_count: i64,
    pub recipes: Vec<RecipeBrief>,
}

/// Collect recipes for each author in `authors`, keeping the input order.
///
/// A non-zero `recipes_limit` truncates each author's list to its first N
/// entries; `recipes_count` always reports the full count.
pub fn author_recipes<S>(
    store: &mut S,
    authors: &[Uuid],
    recipes_limit: Option<usize>,
) -> Result<Vec<AuthorRecipes>, StoreError>
where
    S: SubscriptionStore + ?Sized,
{
    if authors.is_empty() {
        return Ok(Vec::new());
    }

    let per_author = recipes_limit.filter(|&limit| limit > 0);
    let mut counts = store.recipe_counts(authors)?;
    let mut by_author: HashMap<Uuid, Vec<RecipeBrief>> = HashMap::new();
    for recipe in store.recipes_by_authors(authors, per_author)? {
        by_author.entry(recipe.author_id).or_default().push(recipe);
    }

    Ok(authors
        .iter()
        .map(|author_id| AuthorRecipes {
            author_id: *author_id,
            recipes_count: counts.remove(author_id).unwrap_or(0),
            recipes: by_author.remove(author_id).unwrap_or_default(),
        })
        .collect())
}

/// One page of `follower`'s subscriptions and the total number of followed authors.
pub fn list_subscriptions<S>(
    store: &mut S,
    follower: Uuid,
    offset: i64,
    limit: i64,
    recipes_limit: Option<usize>,
) -> Result<(i64, Vec<AuthorRecipes>), StoreError>
where
    S: SubscriptionStore + ?Sized,
{
    let total = store.count_followed(follower)?;
    let authors = store.followed_authors(follower, offset, limit)?;
    let entries = author_recipes(store, &authors, recipes_limit)?;
    Ok((total, entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{Duration, Utc};

    fn add_recipes(store: &mut MemoryStore, author: Uuid, count: i64) {
        for i in 0..count {
            store.add_recipe(
                RecipeBrief {
                    id: Uuid::new_v4(),
                    author_id: author,
                    name: format!("Recipe {i}"),
                    cooking_time: 5,
                    created_at: Utc::now() - Duration::minutes(i),
                },
                &[],
            );
        }
    }

    #[test]
    fn test_store_truncates_each_author_separately() {
        let mut store = MemoryStore::new();
        let prolific = Uuid::new_v4();
        let occasional = Uuid::new_v4();
        add_recipes(&mut store, prolific, 5);
        add_recipes(&mut store, occasional, 1);

        let fetched = store
            .recipes_by_authors(&[prolific, occasional], Some(2))
            .unwrap();
        assert_eq!(fetched.len(), 3);

        let entries = author_recipes(&mut store, &[prolific, occasional], Some(2)).unwrap();
        assert_eq!(entries[0].recipes.len(), 2);
        assert_eq!(entries[0].recipes_count, 5);
        assert_eq!(entries[1].recipes.len(), 1);
        assert_eq!(entries[1].recipes_count, 1);
    }
}
