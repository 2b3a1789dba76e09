//! Reference data loaders used by the admin CLI: ingredients from CSV or JSON,
//! tags from JSON.

use crate::models::{NewIngredient, NewTag};
use crate::schema::{ingredients, tags};
use crate::validation::{
    is_hex_color, is_valid_slug, MAX_INGREDIENT_NAME, MAX_MEASUREMENT_UNIT, MAX_TAG_NAME,
    MAX_TAG_SLUG,
};
use diesel::prelude::*;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngredientFixture {
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagFixture {
    pub name: String,
    pub color: String,
    pub slug: String,
}

/// A source row that was skipped, with its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<T> {
    pub rows: Vec<T>,
    pub rejected: Vec<Rejected>,
}

impl<T> Parsed<T> {
    fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = Result<T, String>>,
    {
        let mut rows = Vec::new();
        let mut rejected = Vec::new();
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(row) => rows.push(row),
                Err(reason) => rejected.push(Rejected {
                    row: index + 1,
                    reason,
                }),
            }
        }
        Self { rows, rejected }
    }
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
        .trim()
}

pub fn validate_ingredient(ingredient: &IngredientFixture) -> Result<(), String> {
    let name_len = ingredient.name.chars().count();
    let unit_len = ingredient.measurement_unit.chars().count();
    if name_len == 0 || unit_len == 0 {
        return Err("name and measurement unit are required".to_string());
    }
    if name_len > MAX_INGREDIENT_NAME {
        return Err(format!("name longer than {} characters", MAX_INGREDIENT_NAME));
    }
    if unit_len > MAX_MEASUREMENT_UNIT {
        return Err(format!(
            "measurement unit longer than {} characters",
            MAX_MEASUREMENT_UNIT
        ));
    }
    Ok(())
}

pub fn validate_tag(tag: &TagFixture) -> Result<(), String> {
    if tag.name.trim().is_empty() || tag.name.chars().count() > MAX_TAG_NAME {
        return Err(format!("name must be 1 to {} characters", MAX_TAG_NAME));
    }
    if !is_hex_color(&tag.color) {
        return Err(format!("color {:?} is not a #RRGGBB value", tag.color));
    }
    if tag.slug.chars().count() > MAX_TAG_SLUG || !is_valid_slug(&tag.slug) {
        return Err(format!("slug {:?} is not a valid slug", tag.slug));
    }
    Ok(())
}

/// Parse `name,unit` lines. The last comma separates the unit, so names may
/// contain commas. Blank lines are ignored.
pub fn parse_ingredients_csv(input: &str) -> Parsed<IngredientFixture> {
    let rows = input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| -> Result<IngredientFixture, String> {
            let (name, unit) = line
                .rsplit_once(',')
                .ok_or_else(|| format!("expected `name,unit`, got {:?}", line))?;
            let fixture = IngredientFixture {
                name: unquote(name).to_string(),
                measurement_unit: unquote(unit).to_string(),
            };
            validate_ingredient(&fixture)?;
            Ok(fixture)
        });
    Parsed::from_results(rows)
}

/// Parse `[{"name": ..., "measurement_unit": ...}]`.
pub fn parse_ingredients_json(input: &str) -> Result<Parsed<IngredientFixture>, serde_json::Error> {
    let items: Vec<IngredientFixture> = serde_json::from_str(input)?;
    Ok(Parsed::from_results(items.into_iter().map(|item| {
        let fixture = IngredientFixture {
            name: item.name.trim().to_string(),
            measurement_unit: item.measurement_unit.trim().to_string(),
        };
        validate_ingredient(&fixture).map(|_| fixture)
    })))
}

/// Parse `[{"name": ..., "color": ..., "slug": ...}]`.
pub fn parse_tags_json(input: &str) -> Result<Parsed<TagFixture>, serde_json::Error> {
    let items: Vec<TagFixture> = serde_json::from_str(input)?;
    Ok(Parsed::from_results(
        items
            .into_iter()
            .map(|tag| validate_tag(&tag).map(|_| tag)),
    ))
}

/// Insert ingredients in one transaction, skipping (name, unit) pairs that
/// already exist. Returns the number of rows inserted.
pub fn load_ingredients(
    conn: &mut PgConnection,
    rows: &[IngredientFixture],
) -> Result<usize, diesel::result::Error> {
    conn.transaction::<_, diesel::result::Error, _>(|conn| {
        let mut inserted = 0;
        for row in rows {
            inserted += diesel::insert_into(ingredients::table)
                .values(&NewIngredient {
                    name: &row.name,
                    measurement_unit: &row.measurement_unit,
                })
                .on_conflict_do_nothing()
                .execute(conn)?;
        }
        Ok(inserted)
    })
}

/// Insert tags in one transaction, skipping any that clash with an existing
/// name, color or slug. Returns the number of rows inserted.
pub fn load_tags(conn: &mut PgConnection, rows: &[TagFixture]) -> Result<usize, diesel::result::Error> {
    conn.transaction::<_, diesel::result::Error, _>(|conn| {
        let mut inserted = 0;
        for row in rows {
            inserted += diesel::insert_into(tags::table)
                .values(&NewTag {
                    name: &row.name,
                    color: &row.color,
                    slug: &row.slug,
                })
                .on_conflict_do_nothing()
                .execute(conn)?;
        }
        Ok(inserted)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_splits_on_last_comma() {
        let parsed = parse_ingredients_csv("\"salt, coarse\",g\nsugar,g\n\nflour , kg \n");

        assert!(parsed.rejected.is_empty());
        assert_eq!(
            parsed.rows,
            vec![
                IngredientFixture {
                    name: "salt, coarse".to_string(),
                    measurement_unit: "g".to_string(),
                },
                IngredientFixture {
                    name: "sugar".to_string(),
                    measurement_unit: "g".to_string(),
                },
                IngredientFixture {
                    name: "flour".to_string(),
                    measurement_unit: "kg".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_csv_rejects_bad_rows() {
        let long_unit = format!("milk,{}", "l".repeat(16));
        let input = format!("no unit here\nwater,\n{}\neggs,pcs", long_unit);

        let parsed = parse_ingredients_csv(&input);

        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].name, "eggs");
        let rejected_rows: Vec<usize> = parsed.rejected.iter().map(|r| r.row).collect();
        assert_eq!(rejected_rows, vec![1, 2, 3]);
    }

    #[test]
    fn test_ingredients_json() {
        let parsed = parse_ingredients_json(
            r#"[{"name": " butter ", "measurement_unit": "g"}, {"name": "", "measurement_unit": "g"}]"#,
        )
        .unwrap();

        assert_eq!(parsed.rows[0].name, "butter");
        assert_eq!(parsed.rejected.len(), 1);
        assert!(parse_ingredients_json("{not json").is_err());
    }

    #[test]
    fn test_tags_json_validation() {
        let parsed = parse_tags_json(
            r##"[
                {"name": "Breakfast", "color": "#E26C2D", "slug": "breakfast"},
                {"name": "Lunch", "color": "green", "slug": "lunch"},
                {"name": "Dinner", "color": "#8775D2", "slug": "din ner"}
            ]"##,
        )
        .unwrap();

        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].slug, "breakfast");
        assert_eq!(parsed.rejected.len(), 2);
        assert!(parsed.rejected[0].reason.contains("color"));
        assert!(parsed.rejected[1].reason.contains("slug"));
    }
}
