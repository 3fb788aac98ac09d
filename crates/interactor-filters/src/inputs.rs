//! Raw inputs supplied by a caller and the resolved [`InputSet`].
//!
//! Plain values travel as JSON. Records are borrowed `&mut` references to
//! caller-owned objects; they stay borrowed for one invocation and are never
//! copied.

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;
use serde_json::{Map, Value as Json};

use crate::filter::short_type_name;
use crate::value::Value;

/// A borrowed caller-owned object bound to an input name.
pub struct RecordRef<'r> {
    type_name: &'static str,
    object: &'r mut dyn Any,
}

impl<'r> RecordRef<'r> {
    pub fn new<T: Any>(object: &'r mut T) -> Self {
        Self {
            type_name: short_type_name(std::any::type_name::<T>()),
            object,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn as_any(&self) -> &dyn Any {
        &*self.object
    }

    pub fn is<T: Any>(&self) -> bool {
        self.object.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.object.downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.object.downcast_mut::<T>()
    }

    /// Give back the full `'r` borrow. The record is consumed even when the
    /// type does not match; check with [`is`](Self::is) first.
    pub fn into_inner<T: Any>(self) -> Option<&'r mut T> {
        let object: &'r mut dyn Any = self.object;
        object.downcast_mut::<T>()
    }
}

impl fmt::Debug for RecordRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.type_name)
    }
}

/// Unvalidated inputs for one invocation.
#[derive(Debug, Default)]
pub struct Inputs<'r> {
    values: BTreeMap<String, Json>,
    records: BTreeMap<String, RecordRef<'r>>,
}

impl<'r> Inputs<'r> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inputs from a JSON object; any other JSON value yields no inputs.
    pub fn from_json(json: Json) -> Self {
        match json {
            Json::Object(map) => Self::from_map(map),
            _ => Self::new(),
        }
    }

    pub fn from_map(map: Map<String, Json>) -> Self {
        Self {
            values: map.into_iter().collect(),
            records: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Json>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn with_record<T: Any>(mut self, name: impl Into<String>, record: &'r mut T) -> Self {
        self.insert_record(name, record);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Json>) {
        let name = name.into();
        self.records.remove(&name);
        self.values.insert(name, value.into());
    }

    pub fn insert_record<T: Any>(&mut self, name: impl Into<String>, record: &'r mut T) {
        let name = name.into();
        self.values.remove(&name);
        self.records.insert(name, RecordRef::new(record));
    }

    /// Whether `name` is bound to a non-null value or a record.
    pub fn is_bound(&self, name: &str) -> bool {
        self.records.contains_key(name)
            || self.values.get(name).is_some_and(|value| !value.is_null())
    }

    pub fn value(&self, name: &str) -> Option<&Json> {
        self.values.get(name)
    }

    pub fn record(&self, name: &str) -> Option<&RecordRef<'r>> {
        self.records.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.records.is_empty()
    }

    pub(crate) fn into_parts(self) -> (BTreeMap<String, Json>, BTreeMap<String, RecordRef<'r>>) {
        (self.values, self.records)
    }
}

/// Inputs after resolution: every declared filter that resolved, keyed by
/// name. Immutable apart from access to borrowed records.
#[derive(Default)]
pub struct InputSet<'r> {
    values: BTreeMap<String, Value>,
    records: BTreeMap<String, RecordRef<'r>>,
}

impl<'r> InputSet<'r> {
    pub(crate) fn new(
        values: BTreeMap<String, Value>,
        records: BTreeMap<String, RecordRef<'r>>,
    ) -> Self {
        Self { values, records }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name) || self.records.contains_key(name)
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(Value::as_str)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.value(name).and_then(Value::as_i64)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.value(name).and_then(Value::as_f64)
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.value(name).and_then(Value::as_bool)
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        self.value(name).and_then(Value::as_date)
    }

    pub fn hash(&self, name: &str) -> Option<&Map<String, Json>> {
        self.value(name).and_then(Value::as_hash)
    }

    pub fn array(&self, name: &str) -> Option<&[Json]> {
        self.value(name).and_then(Value::as_array)
    }

    pub fn record<T: Any>(&self, name: &str) -> Option<&T> {
        self.records.get(name).and_then(RecordRef::downcast_ref)
    }

    pub fn record_mut<T: Any>(&mut self, name: &str) -> Option<&mut T> {
        self.records.get_mut(name).and_then(RecordRef::downcast_mut)
    }

    /// Move a record out of the set, keeping the caller's full borrow.
    ///
    /// Leaves the set untouched when `name` is not a record of type `T`.
    pub fn take_record<T: Any>(&mut self, name: &str) -> Option<&'r mut T> {
        if !self.records.get(name).is_some_and(RecordRef::is::<T>) {
            return None;
        }
        self.records.remove(name)?.into_inner::<T>()
    }

    /// Names of all resolved inputs, values and records alike.
    pub fn names(&self) -> BTreeSet<&str> {
        self.values
            .keys()
            .chain(self.records.keys())
            .map(String::as_str)
            .collect()
    }

    /// The resolved plain values as fresh inputs, e.g. to forward them to a
    /// nested unit. Records are not carried over.
    pub fn forward(&self) -> Inputs<'static> {
        Inputs {
            values: self
                .values
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect(),
            records: BTreeMap::new(),
        }
    }

    /// Resolved plain values as JSON, excluding `except`.
    pub fn to_json_except(&self, except: &[&str]) -> Map<String, Json> {
        self.values
            .iter()
            .filter(|(name, _)| !except.contains(&name.as_str()))
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect()
    }
}

impl fmt::Display for InputSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, name) in self.names().into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match (self.values.get(name), self.records.get(name)) {
                (Some(value), _) => write!(f, "{name}: {value}")?,
                (None, Some(record)) => write!(f, "{name}: {record:?}")?,
                (None, None) => {}
            }
        }
        f.write_str("}")
    }
}

impl fmt::Debug for InputSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
