//! A single attribute-scoped error and its detail view.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Attribute name for errors that concern the unit as a whole.
pub const BASE: &str = "base";

/// Well-known error kinds produced by the input resolver.
pub mod kind {
    pub const INVALID_TYPE: &str = "invalid_type";
    pub const MISSING: &str = "missing";
    pub const BLANK: &str = "blank";
    pub const TOO_SHORT: &str = "too_short";
    pub const TOO_LONG: &str = "too_long";
    pub const INCLUSION: &str = "inclusion";
    pub const INVALID: &str = "invalid";
}

/// An error attached to an attribute.
///
/// Two entries are equivalent when `attribute` and `message` match. `kind`
/// and `options` are informational and never take part in equivalence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub attribute: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
}

impl ErrorEntry {
    pub fn new(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            message: message.into(),
            kind: None,
            options: BTreeMap::new(),
        }
    }

    /// Tag the entry with a symbolic kind such as [`kind::INVALID_TYPE`].
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn matches(&self, attribute: &str, message: &str) -> bool {
        self.attribute == attribute && self.message == message
    }

    pub fn is_equivalent(&self, other: &ErrorEntry) -> bool {
        self.matches(&other.attribute, &other.message)
    }

    /// The detail view: the kind when one is set, the message otherwise.
    pub fn detail(&self) -> ErrorDetail {
        ErrorDetail {
            error: self.kind.clone().unwrap_or_else(|| self.message.clone()),
            options: self.options.clone(),
        }
    }

    /// `"<attribute> <message>"`, or just the message for [`BASE`] errors.
    pub fn full_message(&self) -> String {
        if self.attribute == BASE {
            self.message.clone()
        } else {
            format!("{} {}", self.attribute, self.message)
        }
    }
}

/// Machine-oriented view of an [`ErrorEntry`].
///
/// Serializes flat, e.g. `{"error": "invalid_type", "type": "boolean"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub error: String,
    #[serde(flatten)]
    pub options: BTreeMap<String, String>,
}

impl ErrorDetail {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            options: BTreeMap::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equivalence_ignores_kind_and_options() {
        let a = ErrorEntry::new("name", "can't be blank").with_kind(kind::BLANK);
        let b = ErrorEntry::new("name", "can't be blank").with_option("count", "0");
        assert!(a.is_equivalent(&b));
        assert_ne!(a, b);

        let c = ErrorEntry::new("name", "is too short");
        assert!(!a.is_equivalent(&c));
    }

    #[test]
    fn test_detail_prefers_kind() {
        let entry = ErrorEntry::new("flag", "is not a valid boolean")
            .with_kind(kind::INVALID_TYPE)
            .with_option("type", "boolean");
        assert_eq!(
            entry.detail(),
            ErrorDetail::new("invalid_type").with_option("type", "boolean")
        );

        let plain = ErrorEntry::new("flag", "must be set");
        assert_eq!(plain.detail(), ErrorDetail::new("must be set"));
    }

    #[test]
    fn test_detail_serializes_flat() {
        let detail = ErrorDetail::new("invalid_type").with_option("type", "hash");
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "invalid_type", "type": "hash" }));
    }

    #[test]
    fn test_full_message() {
        assert_eq!(
            ErrorEntry::new("email", "is required").full_message(),
            "email is required"
        );
        assert_eq!(ErrorEntry::new(BASE, "Account is locked").full_message(), "Account is locked");
    }
}
