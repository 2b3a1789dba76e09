use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use utoipa::ToSchema;

pub const MAX_INGREDIENT_NAME: usize = 128;
pub const MAX_MEASUREMENT_UNIT: usize = 15;
pub const MAX_TAG_NAME: usize = 50;
pub const MAX_TAG_SLUG: usize = 50;
pub const MAX_RECIPE_NAME: usize = 200;
pub const MAX_USER_NAME: usize = 150;
pub const MAX_EMAIL: usize = 254;
pub const MIN_PASSWORD: usize = 8;

pub const MIN_COOKING_TIME: i32 = 1;
pub const MAX_COOKING_TIME: i32 = 32_000;
pub const MIN_INGREDIENT_AMOUNT: i32 = 1;
pub const MAX_INGREDIENT_AMOUNT: i32 = 32_000;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[A-Fa-f0-9]{6}$").expect("valid color regex"));
static USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username regex"));
static SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex"));

/// Validation messages keyed by field name.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Require a non-blank value no longer than `max` characters.
    pub fn check_text(&mut self, field: &str, value: &str, max: usize) {
        if value.trim().is_empty() {
            self.add(field, "This field may not be blank");
        } else if value.chars().count() > max {
            self.add(
                field,
                format!("Ensure this field has no more than {} characters", max),
            );
        }
    }

    pub fn check_range(&mut self, field: &str, value: i32, min: i32, max: i32) {
        if value < min {
            self.add(
                field,
                format!("Ensure this value is greater than or equal to {}", min),
            );
        } else if value > max {
            self.add(
                field,
                format!("Ensure this value is less than or equal to {}", max),
            );
        }
    }
}

pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

pub fn is_valid_username(value: &str) -> bool {
    USERNAME.is_match(value)
}

pub fn is_valid_slug(value: &str) -> bool {
    SLUG.is_match(value)
}

/// Loose structural check; deliverability is not our concern.
pub fn is_valid_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#FF00aa"));
        assert!(!is_hex_color("FF00aa"));
        assert!(!is_hex_color("#FF00a"));
        assert!(!is_hex_color("#GG0000"));
    }

    #[test]
    fn test_username() {
        assert!(is_valid_username("chef.anna+1@home"));
        assert!(!is_valid_username("chef anna"));
        assert!(!is_valid_username(""));
    }

    #[test]
    fn test_email() {
        assert!(is_valid_email("cook@example.com"));
        assert!(!is_valid_email("cook.example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("cook@localhost"));
        assert!(!is_valid_email("co ok@example.com"));
    }

    #[test]
    fn test_check_text() {
        let mut errors = FieldErrors::new();
        errors.check_text("name", "   ", 10);
        errors.check_text("unit", "kilograms!", 5);
        errors.check_text("ok", "fine", 5);

        assert_eq!(errors.get("name").unwrap().len(), 1);
        assert!(errors.get("unit").unwrap()[0].contains("5 characters"));
        assert!(errors.get("ok").is_none());
    }

    #[test]
    fn test_check_range_bounds_are_inclusive() {
        let mut errors = FieldErrors::new();
        errors.check_range("a", MIN_COOKING_TIME, MIN_COOKING_TIME, MAX_COOKING_TIME);
        errors.check_range("b", MAX_COOKING_TIME, MIN_COOKING_TIME, MAX_COOKING_TIME);
        assert!(errors.is_empty());

        errors.check_range("c", 0, MIN_COOKING_TIME, MAX_COOKING_TIME);
        errors.check_range("d", 32_001, MIN_COOKING_TIME, MAX_COOKING_TIME);
        assert_eq!(errors.clone().into_result().unwrap_err(), errors);
        assert!(errors.get("c").is_some());
        assert!(errors.get("d").is_some());
    }

    #[test]
    fn test_serializes_as_map() {
        let mut errors = FieldErrors::new();
        errors.add("tags", "Tags must not repeat");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"tags": ["Tags must not repeat"]}));
    }
}
