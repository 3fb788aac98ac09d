//! JSON to [`Value`] coercion for each [`FilterKind`].

use chrono::NaiveDate;
use interactor_errors::{kind, ErrorCollection};
use serde_json::{Map, Value as Json};

use crate::filter::{Filter, FilterKind};
use crate::validator::no_options;
use crate::value::Value;

const TRUE_STRINGS: &[&str] = &["true", "1", "on"];
const FALSE_STRINGS: &[&str] = &["false", "0", "off"];

/// Resolve one JSON-backed filter at `path`.
///
/// `raw` is `None` when the input is missing; `null` counts as missing.
/// Errors are recorded under `path`. Returns `None` when the filter did not
/// resolve.
pub(crate) fn resolve_json(
    filter: &Filter,
    raw: Option<&Json>,
    path: &str,
    errors: &mut ErrorCollection,
) -> Option<Value> {
    let raw = raw.filter(|value| !value.is_null());
    let value = match (raw, filter.default_value()) {
        (Some(raw), _) => coerce(filter, raw, path, errors)?,
        (None, Some(Json::Null)) => Value::Null,
        (None, Some(default)) => coerce(filter, default, path, errors)?,
        (None, None) => {
            errors.add_kind(path, kind::MISSING, "is required", no_options());
            return None;
        }
    };

    let before = errors.len();
    for validator in filter.validators() {
        validator.check(path, &value, errors);
    }
    (errors.len() == before).then_some(value)
}

fn coerce(filter: &Filter, raw: &Json, path: &str, errors: &mut ErrorCollection) -> Option<Value> {
    let coerced = match filter.kind() {
        FilterKind::String { strip } => raw.as_str().map(|s| {
            let s = if *strip { s.trim() } else { s };
            Value::String(s.to_string())
        }),
        FilterKind::Integer => coerce_integer(raw).map(Value::Integer),
        FilterKind::Float => coerce_float(raw).map(Value::Float),
        FilterKind::Boolean => coerce_boolean(raw).map(Value::Boolean),
        FilterKind::Date => raw
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
            .map(Value::Date),
        // Records are bound by reference, never through JSON.
        FilterKind::Record(_) => None,
        FilterKind::Hash { filters, strip } => {
            return raw
                .as_object()
                .map(|object| Value::Hash(coerce_hash(object, filters, *strip, path, errors)))
                .or_else(|| invalid_type(filter, path, errors));
        }
        FilterKind::Array { element } => {
            return raw
                .as_array()
                .map(|items| Value::Array(coerce_array(items, element.as_deref(), path, errors)))
                .or_else(|| invalid_type(filter, path, errors));
        }
    };
    coerced.or_else(|| invalid_type(filter, path, errors))
}

fn invalid_type(filter: &Filter, path: &str, errors: &mut ErrorCollection) -> Option<Value> {
    let type_name = filter.kind().type_name();
    errors.add_kind(
        path,
        kind::INVALID_TYPE,
        format!("is not a valid {type_name}"),
        [("type", type_name)],
    );
    None
}

fn coerce_integer(raw: &Json) -> Option<i64> {
    match raw {
        Json::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Json::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_float(raw: &Json) -> Option<f64> {
    match raw {
        Json::Number(n) => n.as_f64(),
        Json::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_boolean(raw: &Json) -> Option<bool> {
    match raw {
        Json::Bool(b) => Some(*b),
        Json::String(s) => {
            let s = s.trim().to_ascii_lowercase();
            if TRUE_STRINGS.contains(&s.as_str()) {
                Some(true)
            } else if FALSE_STRINGS.contains(&s.as_str()) {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn coerce_hash(
    object: &Map<String, Json>,
    filters: &[Filter],
    strip: bool,
    path: &str,
    errors: &mut ErrorCollection,
) -> Map<String, Json> {
    let mut out = if strip { Map::new() } else { object.clone() };
    for nested in filters {
        let nested_path = format!("{path}.{}", nested.name());
        match resolve_json(nested, object.get(nested.name()), &nested_path, errors) {
            Some(value) => {
                out.insert(nested.name().to_string(), value.to_json());
            }
            None => {
                out.remove(nested.name());
            }
        }
    }
    out
}

fn coerce_array(
    items: &[Json],
    element: Option<&Filter>,
    path: &str,
    errors: &mut ErrorCollection,
) -> Vec<Json> {
    let Some(element) = element else {
        return items.to_vec();
    };
    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            resolve_json(element, Some(item), &format!("{path}[{i}]"), errors)
                .map(|value| value.to_json())
        })
        .collect()
}
