//! Favorite and shopping-cart toggles over an in-memory store.

use recipebox_server::guards::{self, GuardError};
use recipebox_server::store::{MemoryStore, Relation};
use uuid::Uuid;

#[test]
fn test_double_add_keeps_one_row() {
    for relation in [Relation::Favorite, Relation::ShoppingCart] {
        let mut store = MemoryStore::new();
        let user = Uuid::new_v4();
        let recipe = Uuid::new_v4();

        guards::add(&mut store, relation, user, recipe).unwrap();
        let err = guards::add(&mut store, relation, user, recipe).unwrap_err();

        assert!(matches!(err, GuardError::AlreadyExists(r) if r == relation));
        assert_eq!(store.count(relation), 1);
    }
}

#[test]
fn test_remove_absent_mutates_nothing() {
    for relation in [Relation::Favorite, Relation::ShoppingCart] {
        let mut store = MemoryStore::new();
        let user = Uuid::new_v4();
        let kept = Uuid::new_v4();
        guards::add(&mut store, relation, user, kept).unwrap();

        let err = guards::remove(&mut store, relation, user, Uuid::new_v4()).unwrap_err();

        assert!(matches!(err, GuardError::NotFound(r) if r == relation));
        assert_eq!(store.count(relation), 1);
    }
}

#[test]
fn test_same_recipe_for_different_users() {
    let mut store = MemoryStore::new();
    let recipe = Uuid::new_v4();

    guards::add(&mut store, Relation::Favorite, Uuid::new_v4(), recipe).unwrap();
    guards::add(&mut store, Relation::Favorite, Uuid::new_v4(), recipe).unwrap();

    assert_eq!(store.count(Relation::Favorite), 2);
}

#[test]
fn test_toggle_cycle() {
    let mut store = MemoryStore::new();
    let user = Uuid::new_v4();
    let recipe = Uuid::new_v4();

    for _ in 0..3 {
        guards::add(&mut store, Relation::Favorite, user, recipe).unwrap();
        guards::remove(&mut store, Relation::Favorite, user, recipe).unwrap();
    }

    assert_eq!(store.count(Relation::Favorite), 0);
}
