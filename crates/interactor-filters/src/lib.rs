//! Typed input filters for interactor units.
//!
//! A unit declares its inputs as a [`Schema`] of [`Filter`]s. Resolving raw
//! [`Inputs`] against the schema coerces each value to its declared type,
//! applies defaults and validators, and yields an [`InputSet`] together with
//! an [`ErrorCollection`](interactor_errors::ErrorCollection) holding one
//! entry per rejected input.
//!
//! ```
//! use interactor_filters::{Filter, Inputs, Schema};
//!
//! let schema = Schema::new()
//!     .filter(Filter::string("name").presence())
//!     .filter(Filter::integer("age").optional());
//!
//! let resolution = schema.resolve(Inputs::new().with("name", "Ada").with("age", "36"));
//! assert!(resolution.errors.is_empty());
//! assert_eq!(resolution.inputs.integer("age"), Some(36));
//! ```

mod coerce;
pub mod filter;
pub mod inputs;
pub mod schema;
pub mod validator;
pub mod value;

pub use filter::{short_type_name, Filter, FilterKind, RecordType};
pub use inputs::{InputSet, Inputs, RecordRef};
pub use schema::{Resolution, Schema};
pub use validator::Validator;
pub use value::Value;
