//! Declarative validators applied after a filter has coerced its value.

use interactor_errors::{kind, ErrorCollection};
use serde_json::Value as Json;

use crate::value::Value;

/// A check that runs against a successfully resolved value.
#[derive(Debug, Clone)]
pub enum Validator {
    /// Rejects blank values (see [`Value::is_blank`]).
    Presence,
    /// Bounds on [`Value::length`]; values without a length are skipped.
    Length {
        min: Option<usize>,
        max: Option<usize>,
    },
    /// The value must equal one of the listed JSON values.
    Inclusion(Vec<Json>),
    /// Returns a message when the value is invalid.
    Custom(fn(&Value) -> Option<String>),
}

impl Validator {
    pub fn length(min: Option<usize>, max: Option<usize>) -> Self {
        Validator::Length { min, max }
    }

    pub fn inclusion<I, V>(allowed: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Json>,
    {
        Validator::Inclusion(allowed.into_iter().map(Into::into).collect())
    }

    pub(crate) fn check(&self, attribute: &str, value: &Value, errors: &mut ErrorCollection) {
        match self {
            Validator::Presence => {
                if value.is_blank() {
                    errors.add_kind(attribute, kind::BLANK, "can't be blank", no_options());
                }
            }
            Validator::Length { min, max } => {
                let Some(len) = value.length() else {
                    return;
                };
                if let Some(min) = min.filter(|min| len < *min) {
                    errors.add_kind(
                        attribute,
                        kind::TOO_SHORT,
                        format!("is too short (minimum is {min} characters)"),
                        [("count", min.to_string())],
                    );
                }
                if let Some(max) = max.filter(|max| len > *max) {
                    errors.add_kind(
                        attribute,
                        kind::TOO_LONG,
                        format!("is too long (maximum is {max} characters)"),
                        [("count", max.to_string())],
                    );
                }
            }
            Validator::Inclusion(allowed) => {
                if !value.is_null() && !allowed.contains(&value.to_json()) {
                    errors.add_kind(
                        attribute,
                        kind::INCLUSION,
                        "is not included in the list",
                        no_options(),
                    );
                }
            }
            Validator::Custom(check) => {
                if let Some(message) = check(value) {
                    errors.add_kind(attribute, kind::INVALID, message, no_options());
                }
            }
        }
    }
}

pub(crate) fn no_options() -> [(&'static str, &'static str); 0] {
    []
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(validator: Validator, value: Value) -> ErrorCollection {
        let mut errors = ErrorCollection::new();
        validator.check("attr", &value, &mut errors);
        errors
    }

    #[test]
    fn test_presence_rejects_blank_strings() {
        let errors = run(Validator::Presence, Value::String("   ".into()));
        assert_eq!(errors.on("attr"), vec!["can't be blank"]);
        assert!(run(Validator::Presence, Value::String("x".into())).is_empty());
    }

    #[test]
    fn test_length_bounds() {
        let short = run(Validator::length(Some(3), None), Value::String("ab".into()));
        assert_eq!(short.on("attr"), vec!["is too short (minimum is 3 characters)"]);

        let long = run(Validator::length(None, Some(1)), Value::String("ab".into()));
        assert_eq!(long.on("attr"), vec!["is too long (maximum is 1 characters)"]);

        assert!(run(Validator::length(Some(1), Some(5)), Value::Integer(100)).is_empty());
    }

    #[test]
    fn test_inclusion() {
        let validator = Validator::inclusion(["red", "green"]);
        assert!(run(validator.clone(), Value::String("red".into())).is_empty());
        let errors = run(validator, Value::String("blue".into()));
        assert_eq!(errors.on("attr"), vec!["is not included in the list"]);
    }

    #[test]
    fn test_custom() {
        fn even(value: &Value) -> Option<String> {
            match value.as_i64() {
                Some(i) if i % 2 != 0 => Some("must be even".to_string()),
                _ => None,
            }
        }
        assert!(run(Validator::Custom(even), Value::Integer(4)).is_empty());
        assert_eq!(
            run(Validator::Custom(even), Value::Integer(3)).on("attr"),
            vec!["must be even"]
        );
    }
}
