//! Storage capabilities used by the membership guards, the subscription listing
//! and the shopping-list aggregator.
//!
//! [`PgStore`] runs against PostgreSQL through diesel; [`MemoryStore`] keeps the
//! same contract in memory so the business rules can be exercised without a
//! database.

mod memory;
mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

use chrono::{DateTime, Utc};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// A (subject, object) association that can be toggled on and off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// user -> recipe
    Favorite,
    /// user -> recipe
    ShoppingCart,
    /// follower -> author
    Subscription,
}

impl Relation {
    pub fn as_str(self) -> &'static str {
        match self {
            Relation::Favorite => "favorite",
            Relation::ShoppingCart => "shopping_cart",
            Relation::Subscription => "subscription",
        }
    }

    /// Message used when adding a pair that is already present.
    pub fn already_present(self) -> &'static str {
        match self {
            Relation::Favorite => "Recipe is already in favorites",
            Relation::ShoppingCart => "Recipe is already in the shopping cart",
            Relation::Subscription => "You are already subscribed to this author",
        }
    }

    /// Message used when removing a pair that is not present.
    pub fn not_present(self) -> &'static str {
        match self {
            Relation::Favorite => "Recipe is not in favorites",
            Relation::ShoppingCart => "Recipe is not in the shopping cart",
            Relation::Subscription => "You are not subscribed to this author",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unique constraint violated")]
    UniqueViolation,

    #[error("Database error: {0}")]
    Database(DieselError),

    #[error("Database connection failed: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

impl From<DieselError> for StoreError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                StoreError::UniqueViolation
            }
            other => StoreError::Database(other),
        }
    }
}

/// One ingredient line of one recipe, denormalised with the ingredient's name
/// and unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountRow {
    pub recipe_id: Uuid,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// The fields of a recipe needed for short listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeBrief {
    pub id: Uuid,
    pub author_id: Uuid,
    pub name: String,
    pub cooking_time: i32,
    pub created_at: DateTime<Utc>,
}

/// Presence checks and toggles for [`Relation`] pairs.
///
/// `insert` must report a duplicate pair as [`StoreError::UniqueViolation`]
/// even when a concurrent writer got there between `exists` and `insert`.
pub trait RelationStore {
    fn exists(&mut self, relation: Relation, subject: Uuid, object: Uuid)
        -> Result<bool, StoreError>;

    fn insert(&mut self, relation: Relation, subject: Uuid, object: Uuid)
        -> Result<(), StoreError>;

    /// Returns the number of rows removed (0 or 1).
    fn delete(&mut self, relation: Relation, subject: Uuid, object: Uuid)
        -> Result<usize, StoreError>;
}

/// Reads needed to build a shopping list.
pub trait CartStore {
    fn cart_recipe_ids(&mut self, user_id: Uuid) -> Result<Vec<Uuid>, StoreError>;

    fn amounts_for_recipes(&mut self, recipe_ids: &[Uuid]) -> Result<Vec<AmountRow>, StoreError>;
}

/// Reads needed to list a user's subscriptions.
pub trait SubscriptionStore {
    /// Authors followed by `follower`, oldest subscription first.
    fn followed_authors(
        &mut self,
        follower: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Uuid>, StoreError>;

    fn count_followed(&mut self, follower: Uuid) -> Result<i64, StoreError>;

    /// Recipes written by any of `authors`, newest first. With `per_author`,
    /// only each author's newest `per_author` recipes are returned.
    fn recipes_by_authors(
        &mut self,
        authors: &[Uuid],
        per_author: Option<usize>,
    ) -> Result<Vec<RecipeBrief>, StoreError>;

    /// Total recipe count per author. Authors without recipes are absent.
    fn recipe_counts(&mut self, authors: &[Uuid]) -> Result<HashMap<Uuid, i64>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_is_recognised() {
        let err = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value".to_string()),
        );
        assert!(matches!(StoreError::from(err), StoreError::UniqueViolation));
    }

    #[test]
    fn test_other_database_errors_pass_through() {
        assert!(matches!(
            StoreError::from(DieselError::NotFound),
            StoreError::Database(DieselError::NotFound)
        ));
    }
}
