//! Structured tracing hooks for the invocation lifecycle.
//!
//! This module provides:
//! - Invocation-scoped spans via the `InvocationSpan` RAII guard
//! - Emission functions for lifecycle events: start, validation failure,
//!   interrupt, phase change, fault and finish
//!
//! Events are emitted at `debug!` level (faults at `warn!`). Enable them with
//! `RUST_LOG=interactor_core=debug`; phase changes are at `trace!`.

use tracing::{debug, trace, warn};

use crate::error::InteractionError;
use crate::frame::Frame;
use crate::phase::Phase;

/// RAII guard that enters an invocation span for the lifetime of one
/// invocation.
///
/// # Example
///
/// ```ignore
/// let frame = Frame::root("UpdateUser");
/// let _span = InvocationSpan::enter(&frame);
/// // tracing calls are now associated with interaction = "UpdateUser"
/// ```
pub struct InvocationSpan {
    _span: tracing::span::EnteredSpan,
}

impl InvocationSpan {
    pub fn enter(frame: &Frame) -> Self {
        let span = tracing::debug_span!(
            "interactor.invoke",
            interaction = frame.name(),
            id = %frame.id(),
            depth = frame.depth(),
        );
        Self {
            _span: span.entered(),
        }
    }
}

pub fn emit_invocation_started(frame: &Frame, returning: Option<&str>) {
    debug!(
        event = "invocation.started",
        interaction = frame.name(),
        caller = frame.caller().unwrap_or(""),
        returning = returning.unwrap_or(""),
    );
}

pub fn emit_validation_failed(frame: &Frame, error_count: usize) {
    debug!(
        event = "invocation.validation_failed",
        interaction = frame.name(),
        errors = error_count,
    );
}

/// A body stopped early through `return_if_errors`.
pub fn emit_interrupted(frame: &Frame, error_count: usize) {
    debug!(
        event = "invocation.interrupted",
        interaction = frame.name(),
        errors = error_count,
    );
}

pub fn emit_phase(frame: &Frame, phase: Phase) {
    trace!(event = "invocation.phase", interaction = frame.name(), phase = %phase);
}

pub fn emit_fault(frame: &Frame, fault: &InteractionError) {
    warn!(event = "invocation.fault", interaction = frame.name(), error = %fault);
}

pub fn emit_invocation_finished(frame: &Frame, error_count: usize) {
    debug!(
        event = "invocation.finished",
        interaction = frame.name(),
        success = error_count == 0,
        errors = error_count,
    );
}
