//! Subscription guards and the subscription listing over an in-memory store.

use chrono::{Duration, Utc};
use recipebox_server::follows;
use recipebox_server::guards::{self, GuardError};
use recipebox_server::store::{MemoryStore, RecipeBrief, Relation};
use uuid::Uuid;

/// Add `count` recipes by `author`, the last one being the newest.
fn add_recipes(store: &mut MemoryStore, author: Uuid, count: usize) -> Vec<Uuid> {
    let start = Utc::now() - Duration::hours(count as i64);
    (0..count)
        .map(|i| {
            let recipe = RecipeBrief {
                id: Uuid::new_v4(),
                author_id: author,
                name: format!("Recipe {}", i + 1),
                cooking_time: 15,
                created_at: start + Duration::hours(i as i64),
            };
            let id = recipe.id;
            store.add_recipe(recipe, &[("Salt", "g", 1)]);
            id
        })
        .collect()
}

#[test]
fn test_recipes_limit_truncates_but_count_is_full() {
    let mut store = MemoryStore::new();
    let follower = Uuid::new_v4();
    let author = Uuid::new_v4();
    let ids = add_recipes(&mut store, author, 3);

    guards::subscribe(&mut store, follower, author).unwrap();
    let (total, entries) = follows::list_subscriptions(&mut store, follower, 0, 10, Some(1)).unwrap();

    assert_eq!(total, 1);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].author_id, author);
    assert_eq!(entries[0].recipes_count, 3);
    assert_eq!(entries[0].recipes.len(), 1);
    // Newest first.
    assert_eq!(entries[0].recipes[0].id, ids[2]);
}

#[test]
fn test_no_limit_returns_all_recipes_newest_first() {
    let mut store = MemoryStore::new();
    let follower = Uuid::new_v4();
    let author = Uuid::new_v4();
    let ids = add_recipes(&mut store, author, 3);

    guards::subscribe(&mut store, follower, author).unwrap();
    let (_, entries) = follows::list_subscriptions(&mut store, follower, 0, 10, None).unwrap();

    let listed: Vec<Uuid> = entries[0].recipes.iter().map(|r| r.id).collect();
    assert_eq!(listed, vec![ids[2], ids[1], ids[0]]);
}

#[test]
fn test_author_without_recipes() {
    let mut store = MemoryStore::new();
    let follower = Uuid::new_v4();
    let author = Uuid::new_v4();

    guards::subscribe(&mut store, follower, author).unwrap();
    let (_, entries) = follows::list_subscriptions(&mut store, follower, 0, 10, Some(3)).unwrap();

    assert_eq!(entries[0].recipes_count, 0);
    assert!(entries[0].recipes.is_empty());
}

#[test]
fn test_pagination_keeps_subscription_order() {
    let mut store = MemoryStore::new();
    let follower = Uuid::new_v4();
    let authors: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
    for author in &authors {
        add_recipes(&mut store, *author, 1);
        guards::subscribe(&mut store, follower, *author).unwrap();
    }

    let (total, first) = follows::list_subscriptions(&mut store, follower, 0, 2, None).unwrap();
    let (_, last) = follows::list_subscriptions(&mut store, follower, 4, 2, None).unwrap();

    assert_eq!(total, 5);
    let first_ids: Vec<Uuid> = first.iter().map(|e| e.author_id).collect();
    assert_eq!(first_ids, vec![authors[0], authors[1]]);
    assert_eq!(last.len(), 1);
    assert_eq!(last[0].author_id, authors[4]);
}

#[test]
fn test_other_followers_are_not_listed() {
    let mut store = MemoryStore::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let author = Uuid::new_v4();

    guards::subscribe(&mut store, bob, author).unwrap();
    let (total, entries) = follows::list_subscriptions(&mut store, alice, 0, 10, None).unwrap();

    assert_eq!(total, 0);
    assert!(entries.is_empty());
}

#[test]
fn test_self_subscription_and_double_subscribe() {
    let mut store = MemoryStore::new();
    let user = Uuid::new_v4();
    let author = Uuid::new_v4();

    assert!(matches!(
        guards::subscribe(&mut store, user, user),
        Err(GuardError::SelfSubscription)
    ));

    guards::subscribe(&mut store, user, author).unwrap();
    assert!(matches!(
        guards::subscribe(&mut store, user, author),
        Err(GuardError::AlreadyExists(Relation::Subscription))
    ));
    assert_eq!(store.count(Relation::Subscription), 1);
}

#[test]
fn test_unsubscribe_then_list_is_empty() {
    let mut store = MemoryStore::new();
    let follower = Uuid::new_v4();
    let author = Uuid::new_v4();
    add_recipes(&mut store, author, 2);

    guards::subscribe(&mut store, follower, author).unwrap();
    guards::unsubscribe(&mut store, follower, author).unwrap();

    assert!(matches!(
        guards::unsubscribe(&mut store, follower, author),
        Err(GuardError::NotFound(Relation::Subscription))
    ));
    let (total, entries) = follows::list_subscriptions(&mut store, follower, 0, 10, Some(1)).unwrap();
    assert_eq!(total, 0);
    assert!(entries.is_empty());
}

#[test]
fn test_zero_recipes_limit_means_no_truncation() {
    let mut store = MemoryStore::new();
    let follower = Uuid::new_v4();
    let author = Uuid::new_v4();
    add_recipes(&mut store, author, 2);

    guards::subscribe(&mut store, follower, author).unwrap();
    let (_, entries) = follows::list_subscriptions(&mut store, follower, 0, 10, Some(0)).unwrap();

    assert_eq!(entries[0].recipes.len(), 2);
    assert_eq!(entries[0].recipes_count, 2);
}
