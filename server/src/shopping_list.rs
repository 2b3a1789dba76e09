//! Aggregates the ingredients of every recipe in a user's shopping cart into a
//! flat, downloadable list.

use crate::store::{AmountRow, CartStore, StoreError};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

pub const FILENAME: &str = "shopping_list.txt";

#[derive(Debug, Error)]
pub enum ShoppingListError {
    #[error("Your shopping cart is empty")]
    EmptyCart,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One line of the list: the total of one ingredient in one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListLine {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

impl fmt::Display for ShoppingListLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - {}",
            self.name, self.measurement_unit, self.total_amount
        )
    }
}

/// Build the shopping list for `user_id`.
///
/// Lines are ordered by ingredient name, then unit. An empty cart is an error,
/// never an empty list.
pub fn aggregate<S>(store: &mut S, user_id: Uuid) -> Result<Vec<ShoppingListLine>, ShoppingListError>
where
    S: CartStore + ?Sized,
{
    let recipe_ids = store.cart_recipe_ids(user_id)?;
    if recipe_ids.is_empty() {
        return Err(ShoppingListError::EmptyCart);
    }

    let rows = store.amounts_for_recipes(&recipe_ids)?;
    let lines = sum_amounts(rows);

    tracing::debug!(
        %user_id,
        recipes = recipe_ids.len(),
        lines = lines.len(),
        "aggregated shopping list"
    );

    Ok(lines)
}

/// Group rows by (name, unit) and sum their amounts.
pub fn sum_amounts<I>(rows: I) -> Vec<ShoppingListLine>
where
    I: IntoIterator<Item = AmountRow>,
{
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
    for row in rows {
        *totals
            .entry((row.name, row.measurement_unit))
            .or_insert(0) += i64::from(row.amount);
    }

    totals
        .into_iter()
        .map(|((name, measurement_unit), total_amount)| ShoppingListLine {
            name,
            measurement_unit,
            total_amount,
        })
        .collect()
}

/// Render lines as the plain-text attachment body, one newline-terminated line each.
pub fn render(lines: &[ShoppingListLine]) -> String {
    lines.iter().map(|line| format!("{}\n", line)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(recipe_id: Uuid, name: &str, unit: &str, amount: i32) -> AmountRow {
        AmountRow {
            recipe_id,
            name: name.to_string(),
            measurement_unit: unit.to_string(),
            amount,
        }
    }

    #[test]
    fn test_same_name_different_unit_stays_separate() {
        let recipe = Uuid::new_v4();
        let lines = sum_amounts(vec![
            row(recipe, "Milk", "ml", 200),
            row(recipe, "Milk", "cup", 1),
        ]);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].measurement_unit, "cup");
        assert_eq!(lines[1].measurement_unit, "ml");
    }

    #[test]
    fn test_sum_does_not_overflow_i32() {
        let rows = (0..100_000).map(|_| row(Uuid::new_v4(), "Flour", "g", 32_000));
        let lines = sum_amounts(rows);
        assert_eq!(lines[0].total_amount, 3_200_000_000);
    }

    #[test]
    fn test_render_line_format() {
        let lines = vec![ShoppingListLine {
            name: "Sugar".to_string(),
            measurement_unit: "g".to_string(),
            total_amount: 150,
        }];
        assert_eq!(render(&lines), "Sugar (g) - 150\n");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[]), "");
    }
}
