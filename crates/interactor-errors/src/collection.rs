//! The ordered error collection and the [`Errorable`] contract.
//!
//! Two merge operations exist and they deliberately differ:
//!
//! - [`ErrorCollection::merge_dedup`] skips entries equivalent to one already
//!   present. This is how a unit folds its errors into a return object.
//! - [`ErrorCollection::merge_all`] appends every entry. This is how a caller
//!   folds a nested unit's errors into its own local collection.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entry::{ErrorDetail, ErrorEntry};

/// Insertion-ordered collection of [`ErrorEntry`] values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorCollection {
    entries: Vec<ErrorEntry>,
}

impl ErrorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ErrorEntry) {
        self.entries.push(entry);
    }

    /// Add a free-form message for `attribute`.
    pub fn add(&mut self, attribute: impl Into<String>, message: impl Into<String>) {
        self.push(ErrorEntry::new(attribute, message));
    }

    /// Add a message tagged with a symbolic kind and detail options.
    pub fn add_kind<K, V>(
        &mut self,
        attribute: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
        options: impl IntoIterator<Item = (K, V)>,
    ) where
        K: Into<String>,
        V: Into<String>,
    {
        let mut entry = ErrorEntry::new(attribute, message).with_kind(kind);
        for (key, value) in options {
            entry = entry.with_option(key, value);
        }
        self.push(entry);
    }

    /// Whether an entry with this `(attribute, message)` pair exists.
    pub fn added(&self, attribute: &str, message: &str) -> bool {
        self.entries.iter().any(|e| e.matches(attribute, message))
    }

    /// Append the entries of `other` that have no equivalent here yet.
    ///
    /// Returns the number of entries added. Duplicates within `other` are
    /// collapsed as well, since each added entry is visible to the next check.
    pub fn merge_dedup(&mut self, other: &ErrorCollection) -> usize {
        let mut added = 0;
        for entry in &other.entries {
            if !self.added(&entry.attribute, &entry.message) {
                self.entries.push(entry.clone());
                added += 1;
            }
        }
        added
    }

    /// Append every entry of `other`, duplicates included.
    pub fn merge_all(&mut self, other: &ErrorCollection) {
        self.entries.extend(other.entries.iter().cloned());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn any(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ErrorEntry> {
        self.entries.iter()
    }

    /// Messages recorded for one attribute, in insertion order.
    pub fn on(&self, attribute: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.attribute == attribute)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// Messages grouped by attribute.
    pub fn grouped_by_attribute(&self) -> BTreeMap<String, Vec<String>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for entry in &self.entries {
            grouped
                .entry(entry.attribute.clone())
                .or_default()
                .push(entry.message.clone());
        }
        grouped
    }

    /// Details grouped by attribute.
    pub fn details(&self) -> BTreeMap<String, Vec<ErrorDetail>> {
        let mut details: BTreeMap<String, Vec<ErrorDetail>> = BTreeMap::new();
        for entry in &self.entries {
            details
                .entry(entry.attribute.clone())
                .or_default()
                .push(entry.detail());
        }
        details
    }

    /// [`details`](Self::details) as a JSON object.
    pub fn details_json(&self) -> serde_json::Value {
        serde_json::to_value(self.details()).unwrap_or(serde_json::Value::Null)
    }

    pub fn full_messages(&self) -> Vec<String> {
        self.entries.iter().map(ErrorEntry::full_message).collect()
    }
}

impl fmt::Display for ErrorCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_messages().join(", "))
    }
}

impl<'a> IntoIterator for &'a ErrorCollection {
    type Item = &'a ErrorEntry;
    type IntoIter = std::slice::Iter<'a, ErrorEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for ErrorCollection {
    type Item = ErrorEntry;
    type IntoIter = std::vec::IntoIter<ErrorEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Extend<ErrorEntry> for ErrorCollection {
    fn extend<I: IntoIterator<Item = ErrorEntry>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl FromIterator<ErrorEntry> for ErrorCollection {
    fn from_iter<I: IntoIterator<Item = ErrorEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// An object that carries its own [`ErrorCollection`].
///
/// Return objects of returning units must implement this; the engine folds
/// the unit's errors into [`errors_mut`](Self::errors_mut) before handing the
/// object back. Use [`errors_any`](Self::errors_any) to check for failure.
pub trait Errorable {
    fn errors(&self) -> &ErrorCollection;

    fn errors_mut(&mut self) -> &mut ErrorCollection;

    fn errors_any(&self) -> bool {
        self.errors().any()
    }

    fn errors_empty(&self) -> bool {
        self.errors().is_empty()
    }
}

impl Errorable for ErrorCollection {
    fn errors(&self) -> &ErrorCollection {
        self
    }

    fn errors_mut(&mut self) -> &mut ErrorCollection {
        self
    }
}
