//! The definition shared by plain and returning units.

use interactor_errors::ErrorCollection;
use interactor_filters::{short_type_name, InputSet, Schema};

/// Static description of a unit type: its name and input schema.
///
/// The schema is a pure function of the type. It is read once per
/// invocation and never mutated by one.
pub trait Unit {
    /// Name used in diagnostics and faults. Defaults to the bare type name.
    fn name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    fn filters(&self) -> Schema;

    /// Cross-field validation, run after every filter has resolved.
    ///
    /// Errors added here stop the body from running, exactly like filter
    /// errors.
    fn validate(&self, _inputs: &InputSet<'_>, _errors: &mut ErrorCollection) {}
}
