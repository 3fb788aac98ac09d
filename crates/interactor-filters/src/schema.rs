//! The input resolver: a [`Schema`] of filters turns raw [`Inputs`] into an
//! [`InputSet`] plus the validation errors found along the way.

use std::collections::BTreeMap;

use interactor_errors::{kind, ErrorCollection};
use tracing::trace;

use crate::coerce::resolve_json;
use crate::filter::{Filter, FilterKind, RecordType};
use crate::inputs::{InputSet, Inputs, RecordRef};
use crate::validator::no_options;

/// Ordered filter declarations of one unit type.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    filters: Vec<Filter>,
}

/// Output of [`Schema::resolve`].
#[derive(Debug)]
pub struct Resolution<'r> {
    pub inputs: InputSet<'r>,
    pub errors: ErrorCollection,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter, replacing any earlier filter with the same name.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.retain(|f| f.name() != filter.name());
        self.filters.push(filter);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Filter> {
        self.filters.iter().find(|f| f.name() == name)
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(Filter::name)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Validate and coerce `inputs`.
    ///
    /// Every declared filter yields either a resolved entry in the
    /// [`InputSet`] or at least one error under its name. Undeclared inputs
    /// are dropped.
    pub fn resolve<'r>(&self, inputs: Inputs<'r>) -> Resolution<'r> {
        let (values, mut records) = inputs.into_parts();
        let mut resolved = BTreeMap::new();
        let mut bound = BTreeMap::new();
        let mut errors = ErrorCollection::new();

        for filter in &self.filters {
            let name = filter.name();
            match filter.kind() {
                FilterKind::Record(record_type) => {
                    if let Some(record) = resolve_record(
                        filter,
                        record_type,
                        records.remove(name),
                        values.get(name),
                        &mut errors,
                    ) {
                        bound.insert(name.to_string(), record);
                    }
                }
                _ => {
                    if let Some(value) = resolve_json(filter, values.get(name), name, &mut errors) {
                        resolved.insert(name.to_string(), value);
                    }
                }
            }
        }

        trace!(
            filters = self.filters.len(),
            resolved = resolved.len() + bound.len(),
            errors = errors.len(),
            "inputs resolved"
        );

        Resolution {
            inputs: InputSet::new(resolved, bound),
            errors,
        }
    }
}

fn resolve_record<'r>(
    filter: &Filter,
    record_type: &RecordType,
    record: Option<RecordRef<'r>>,
    value: Option<&serde_json::Value>,
    errors: &mut ErrorCollection,
) -> Option<RecordRef<'r>> {
    let name = filter.name();
    match record {
        Some(record) if record_type.accepts(record.as_any()) => return Some(record),
        Some(_) => {}
        None => match value {
            Some(value) if !value.is_null() => {}
            _ => {
                if filter.default_value().is_none() {
                    errors.add_kind(name, kind::MISSING, "is required", no_options());
                }
                return None;
            }
        },
    }
    let type_name = record_type.type_name();
    errors.add_kind(
        name,
        kind::INVALID_TYPE,
        format!("is not a valid {type_name}"),
        [("type", type_name)],
    );
    None
}
