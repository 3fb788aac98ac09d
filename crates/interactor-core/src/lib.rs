//! interactor-core: execution lifecycle for interactions.
//!
//! An interaction is a unit of business logic with a typed input schema.
//! Running one resolves and validates its inputs, runs its body if they are
//! valid, and reports errors through an [`ErrorCollection`].
//!
//! - [`Interaction`]: plain units that produce an [`Outcome`]
//! - [`ReturningInteraction`]: units that always hand back the object bound
//!   to their return filter, with every error merged into it
//! - [`Context::compose`]: run a nested unit from a body
//! - [`Diagnostics`]: optional before/after lines per invocation
//!
//! Bodies return [`Step`]; `ctx.return_if_errors()?` stops a body early.

pub mod compose;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod frame;
pub mod interaction;
pub mod obs;
pub mod phase;
pub mod returning;
pub mod telemetry;
pub mod unit;

pub use compose::{Composable, Plain, Returning};
pub use config::{ConfigError, DiagnosticsTarget, EngineConfig};
pub use context::Context;
pub use diagnostics::{
    truncate_middle, DiagnosticSink, Diagnostics, MemorySink, NoopSink, TracingSink, WriterSink,
};
pub use engine::Engine;
pub use error::{Halt, InteractionError, Result, Step};
pub use frame::Frame;
pub use interaction::{Interaction, Outcome};
pub use phase::Phase;
pub use returning::ReturningInteraction;
pub use unit::Unit;

pub use interactor_errors::{kind, ErrorCollection, ErrorDetail, ErrorEntry, Errorable, BASE};
pub use interactor_filters::{
    Filter, FilterKind, InputSet, Inputs, RecordRef, RecordType, Schema, Validator, Value,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
