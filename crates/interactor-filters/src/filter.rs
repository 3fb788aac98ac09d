//! Filter declarations: a named, typed input with an optional default and
//! validators.

use std::any::{Any, TypeId};
use std::fmt;

use serde_json::Value as Json;

use crate::validator::Validator;

/// The type a record filter accepts.
#[derive(Clone, Copy)]
pub struct RecordType {
    type_id: TypeId,
    type_name: &'static str,
    matches: fn(&dyn Any) -> bool,
}

impl RecordType {
    pub fn of<T: Any>() -> Self {
        fn matches<T: Any>(object: &dyn Any) -> bool {
            object.is::<T>()
        }
        Self {
            type_id: TypeId::of::<T>(),
            type_name: short_type_name(std::any::type_name::<T>()),
            matches: matches::<T>,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn accepts(&self, object: &dyn Any) -> bool {
        (self.matches)(object)
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordType").field(&self.type_name).finish()
    }
}

/// `my_crate::models::Account<T>` becomes `Account`.
pub fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// The coercion a filter applies.
#[derive(Debug, Clone)]
pub enum FilterKind {
    String {
        strip: bool,
    },
    Integer,
    Float,
    Boolean,
    Date,
    Record(RecordType),
    Hash {
        filters: Vec<Filter>,
        strip: bool,
    },
    Array {
        element: Option<Box<Filter>>,
    },
}

impl FilterKind {
    /// Name used in `invalid_type` errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            FilterKind::String { .. } => "string",
            FilterKind::Integer => "integer",
            FilterKind::Float => "float",
            FilterKind::Boolean => "boolean",
            FilterKind::Date => "date",
            FilterKind::Record(record) => record.type_name(),
            FilterKind::Hash { .. } => "hash",
            FilterKind::Array { .. } => "array",
        }
    }
}

/// A named, typed input declaration.
#[derive(Debug, Clone)]
pub struct Filter {
    name: String,
    kind: FilterKind,
    default: Option<Json>,
    validators: Vec<Validator>,
}

impl Filter {
    pub fn new(name: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            validators: Vec::new(),
        }
    }

    /// Strings have surrounding whitespace stripped unless `strip(false)`.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FilterKind::String { strip: true })
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FilterKind::Integer)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FilterKind::Float)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FilterKind::Boolean)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FilterKind::Date)
    }

    /// A borrowed object of type `T`.
    pub fn record<T: Any>(name: impl Into<String>) -> Self {
        Self::new(name, FilterKind::Record(RecordType::of::<T>()))
    }

    /// A JSON object. Keys without a nested filter are dropped unless
    /// `strip(false)`.
    pub fn hash(name: impl Into<String>) -> Self {
        Self::new(
            name,
            FilterKind::Hash {
                filters: Vec::new(),
                strip: true,
            },
        )
    }

    pub fn array(name: impl Into<String>) -> Self {
        Self::new(name, FilterKind::Array { element: None })
    }

    /// Value used when the input is missing or null.
    pub fn default(mut self, value: impl Into<Json>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Shorthand for a `null` default.
    pub fn optional(self) -> Self {
        self.default(Json::Null)
    }

    pub fn validate(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn presence(self) -> Self {
        self.validate(Validator::Presence)
    }

    /// Toggle stripping for string and hash filters; no effect otherwise.
    pub fn strip(mut self, enabled: bool) -> Self {
        match &mut self.kind {
            FilterKind::String { strip } | FilterKind::Hash { strip, .. } => *strip = enabled,
            _ => {}
        }
        self
    }

    /// Declare a nested filter of a hash filter; no effect otherwise.
    pub fn field(mut self, filter: Filter) -> Self {
        if let FilterKind::Hash { filters, .. } = &mut self.kind {
            filters.retain(|f| f.name != filter.name);
            filters.push(filter);
        }
        self
    }

    /// Declare the element filter of an array filter; no effect otherwise.
    pub fn of(mut self, filter: Filter) -> Self {
        if let FilterKind::Array { element } = &mut self.kind {
            *element = Some(Box::new(filter));
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FilterKind {
        &self.kind
    }

    pub fn default_value(&self) -> Option<&Json> {
        self.default.as_ref()
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    /// The record type, for record filters.
    pub fn record_type(&self) -> Option<&RecordType> {
        match &self.kind {
            FilterKind::Record(record) => Some(record),
            _ => None,
        }
    }
}
