//! Strict add/remove toggles for favorites, shopping carts and subscriptions.
//!
//! Every pair is either absent or present. `add` moves it from absent to present
//! and `remove` from present to absent; anything else is rejected rather than
//! silently accepted.

use crate::store::{Relation, RelationStore, StoreError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("{}", .0.already_present())]
    AlreadyExists(Relation),

    #[error("{}", .0.not_present())]
    NotFound(Relation),

    #[error("You cannot subscribe to yourself")]
    SelfSubscription,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Insert `(subject, object)` into `relation`.
///
/// The existence check only saves a round trip; a unique violation reported by
/// the store on insert is treated the same way.
pub fn add<S>(
    store: &mut S,
    relation: Relation,
    subject: Uuid,
    object: Uuid,
) -> Result<(), GuardError>
where
    S: RelationStore + ?Sized,
{
    if relation == Relation::Subscription && subject == object {
        return Err(GuardError::SelfSubscription);
    }

    if store.exists(relation, subject, object)? {
        return Err(GuardError::AlreadyExists(relation));
    }

    match store.insert(relation, subject, object) {
        Ok(()) => {
            tracing::debug!(%relation, %subject, %object, "pair added");
            Ok(())
        }
        Err(StoreError::UniqueViolation) => {
            tracing::debug!(%relation, %subject, %object, "concurrent insert lost the race");
            Err(GuardError::AlreadyExists(relation))
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete `(subject, object)` from `relation`.
pub fn remove<S>(
    store: &mut S,
    relation: Relation,
    subject: Uuid,
    object: Uuid,
) -> Result<(), GuardError>
where
    S: RelationStore + ?Sized,
{
    if store.delete(relation, subject, object)? == 0 {
        return Err(GuardError::NotFound(relation));
    }
    tracing::debug!(%relation, %subject, %object, "pair removed");
    Ok(())
}

pub fn subscribe<S>(store: &mut S, follower: Uuid, author: Uuid) -> Result<(), GuardError>
where
    S: RelationStore + ?Sized,
{
    add(store, Relation::Subscription, follower, author)
}

pub fn unsubscribe<S>(store: &mut S, follower: Uuid, author: Uuid) -> Result<(), GuardError>
where
    S: RelationStore + ?Sized,
{
    remove(store, Relation::Subscription, follower, author)
}
