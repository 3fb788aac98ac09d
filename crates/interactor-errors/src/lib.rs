//! Interactor error collections.
//!
//! An [`ErrorCollection`] is an insertion-ordered set of attribute-scoped
//! [`ErrorEntry`] values. Units accumulate errors locally and fold them into
//! the error collection of any [`Errorable`] return object they hand back.

pub mod collection;
pub mod entry;

pub use collection::{ErrorCollection, Errorable};
pub use entry::{kind, ErrorDetail, ErrorEntry, BASE};
