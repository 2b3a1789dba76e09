//! Shopping-list aggregation over an in-memory store.

use chrono::Utc;
use recipebox_server::guards;
use recipebox_server::shopping_list::{self, ShoppingListError, ShoppingListLine};
use recipebox_server::store::{MemoryStore, RecipeBrief, Relation};
use uuid::Uuid;

fn recipe(author_id: Uuid, name: &str) -> RecipeBrief {
    RecipeBrief {
        id: Uuid::new_v4(),
        author_id,
        name: name.to_string(),
        cooking_time: 10,
        created_at: Utc::now(),
    }
}

fn line(name: &str, unit: &str, total: i64) -> ShoppingListLine {
    ShoppingListLine {
        name: name.to_string(),
        measurement_unit: unit.to_string(),
        total_amount: total,
    }
}

#[test]
fn test_salt_and_sugar_across_two_recipes() {
    let mut store = MemoryStore::new();
    let user = Uuid::new_v4();
    let author = Uuid::new_v4();

    let r1 = recipe(author, "Brine");
    let r2 = recipe(author, "Caramel");
    let (r1_id, r2_id) = (r1.id, r2.id);
    store.add_recipe(r1, &[("Salt", "g", 5), ("Sugar", "g", 100)]);
    store.add_recipe(r2, &[("Salt", "g", 3)]);

    guards::add(&mut store, Relation::ShoppingCart, user, r1_id).unwrap();
    guards::add(&mut store, Relation::ShoppingCart, user, r2_id).unwrap();

    let lines = shopping_list::aggregate(&mut store, user).unwrap();

    assert_eq!(lines, vec![line("Salt", "g", 8), line("Sugar", "g", 100)]);
    assert_eq!(
        shopping_list::render(&lines),
        "Salt (g) - 8\nSugar (g) - 100\n"
    );
}

#[test]
fn test_sugar_from_two_recipes_and_salt_from_one() {
    let mut store = MemoryStore::new();
    let user = Uuid::new_v4();
    let author = Uuid::new_v4();

    let a = recipe(author, "A");
    let b = recipe(author, "B");
    let (a_id, b_id) = (a.id, b.id);
    store.add_recipe(a, &[("Sugar", "g", 100)]);
    store.add_recipe(b, &[("Sugar", "g", 50), ("Salt", "g", 10)]);

    guards::add(&mut store, Relation::ShoppingCart, user, a_id).unwrap();
    guards::add(&mut store, Relation::ShoppingCart, user, b_id).unwrap();

    let lines = shopping_list::aggregate(&mut store, user).unwrap();

    assert_eq!(
        shopping_list::render(&lines),
        "Salt (g) - 10\nSugar (g) - 150\n"
    );
}

#[test]
fn test_empty_cart_is_an_error() {
    let mut store = MemoryStore::new();
    let author = Uuid::new_v4();
    let other_user = Uuid::new_v4();
    let r = recipe(author, "Toast");
    let r_id = r.id;
    store.add_recipe(r, &[("Bread", "slice", 2)]);
    guards::add(&mut store, Relation::ShoppingCart, other_user, r_id).unwrap();

    let err = shopping_list::aggregate(&mut store, Uuid::new_v4()).unwrap_err();

    assert!(matches!(err, ShoppingListError::EmptyCart));
    assert_eq!(err.to_string(), "Your shopping cart is empty");
}

#[test]
fn test_only_the_users_cart_counts() {
    let mut store = MemoryStore::new();
    let author = Uuid::new_v4();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let soup = recipe(author, "Soup");
    let cake = recipe(author, "Cake");
    let (soup_id, cake_id) = (soup.id, cake.id);
    store.add_recipe(soup, &[("Water", "ml", 500)]);
    store.add_recipe(cake, &[("Flour", "g", 200), ("Water", "ml", 50)]);

    guards::add(&mut store, Relation::ShoppingCart, alice, soup_id).unwrap();
    guards::add(&mut store, Relation::ShoppingCart, bob, cake_id).unwrap();
    // Favorites are not part of the cart.
    guards::add(&mut store, Relation::Favorite, alice, cake_id).unwrap();

    let lines = shopping_list::aggregate(&mut store, alice).unwrap();

    assert_eq!(lines, vec![line("Water", "ml", 500)]);
}

#[test]
fn test_removed_recipe_leaves_the_list() {
    let mut store = MemoryStore::new();
    let user = Uuid::new_v4();
    let author = Uuid::new_v4();

    let pie = recipe(author, "Pie");
    let jam = recipe(author, "Jam");
    let (pie_id, jam_id) = (pie.id, jam.id);
    store.add_recipe(pie, &[("Apples", "pcs", 6), ("Sugar", "g", 80)]);
    store.add_recipe(jam, &[("Sugar", "g", 500)]);

    guards::add(&mut store, Relation::ShoppingCart, user, pie_id).unwrap();
    guards::add(&mut store, Relation::ShoppingCart, user, jam_id).unwrap();
    guards::remove(&mut store, Relation::ShoppingCart, user, pie_id).unwrap();

    let lines = shopping_list::aggregate(&mut store, user).unwrap();

    assert_eq!(lines, vec![line("Sugar", "g", 500)]);
}

#[test]
fn test_recipe_without_ingredients_gives_empty_list() {
    let mut store = MemoryStore::new();
    let user = Uuid::new_v4();
    let r = recipe(Uuid::new_v4(), "Air");
    let r_id = r.id;
    store.add_recipe(r, &[]);
    guards::add(&mut store, Relation::ShoppingCart, user, r_id).unwrap();

    let lines = shopping_list::aggregate(&mut store, user).unwrap();

    assert!(lines.is_empty());
    assert_eq!(shopping_list::render(&lines), "");
}
