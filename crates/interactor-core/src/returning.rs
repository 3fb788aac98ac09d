//! Returning units: guaranteed to hand back a designated input with every
//! error merged into it.
//!
//! # Lifecycle
//!
//! 1. **Bind.** The declared return filter must exist, be a record filter of
//!    [`ReturningInteraction::Record`], and have a record of that type bound
//!    to it. Otherwise the invocation fails with
//!    [`ReturningFilterNotSpecified`](InteractionError::ReturningFilterNotSpecified),
//!    [`ReturnFilterInexistent`](InteractionError::ReturnFilterInexistent) or
//!    [`NotErrorMergeable`](InteractionError::NotErrorMergeable) before
//!    anything else happens.
//! 2. **Validate.** Filter and custom validation errors are merged into the
//!    record without duplicates and the record is returned. The body does not
//!    run.
//! 3. **Execute.** The body runs; [`Halt::Interrupt`] ends it early and is
//!    not a failure.
//! 4. **Merge.** The local errors are merged into the record without
//!    duplicates and the record is returned.

use std::any::{type_name, TypeId};

use interactor_errors::Errorable;
use interactor_filters::{short_type_name, InputSet, Inputs, Resolution, Schema};

use crate::context::Context;
use crate::engine::Engine;
use crate::error::{Halt, InteractionError, Result, Step};
use crate::frame::Frame;
use crate::obs::{self, InvocationSpan};
use crate::phase::Phase;
use crate::unit::Unit;

/// A unit that always yields the object bound to its return filter.
///
/// ```
/// use interactor_core::{
///     Context, ErrorCollection, Errorable, Filter, Inputs, ReturningInteraction, Schema, Step,
///     Unit,
/// };
///
/// #[derive(Default)]
/// struct User {
///     email: Option<String>,
///     errors: ErrorCollection,
/// }
///
/// impl Errorable for User {
///     fn errors(&self) -> &ErrorCollection {
///         &self.errors
///     }
///     fn errors_mut(&mut self) -> &mut ErrorCollection {
///         &mut self.errors
///     }
/// }
///
/// struct UpdateEmail;
///
/// impl Unit for UpdateEmail {
///     fn filters(&self) -> Schema {
///         Schema::new()
///             .filter(Filter::record::<User>("user"))
///             .filter(Filter::string("email").presence())
///     }
/// }
///
/// impl ReturningInteraction for UpdateEmail {
///     type Record = User;
///     const RETURNING: Option<&'static str> = Some("user");
///
///     fn execute_returning(&mut self, ctx: &mut Context<'_>, user: &mut User) -> Step {
///         user.email = ctx.inputs().string("email").map(str::to_string);
///         Ok(())
///     }
/// }
///
/// let mut user = User::default();
/// let user = UpdateEmail
///     .run_returning(Inputs::new().with_record("user", &mut user).with("email", ""))
///     .unwrap();
/// assert!(user.errors_any());
/// assert!(user.email.is_none());
/// ```
pub trait ReturningInteraction: Unit {
    /// Type of the return object.
    type Record: Errorable + 'static;

    /// Name of the input whose value is returned. Fixed per type.
    const RETURNING: Option<&'static str> = None;

    /// The body. Must be overridden; the provided body fails with
    /// [`InteractionError::NotImplemented`].
    fn execute_returning(&mut self, _ctx: &mut Context<'_>, _record: &mut Self::Record) -> Step {
        Err(InteractionError::NotImplemented {
            interaction: self.name().to_string(),
        }
        .into())
    }

    /// Called after validation errors were merged into the record and
    /// before it is returned. The body does not run in that case; use this
    /// to copy the accepted inputs onto the record, e.g. to re-render a form.
    fn on_invalid(&mut self, _record: &mut Self::Record, _inputs: &InputSet<'_>) {}

    /// Run on the default engine.
    fn run_returning<'r>(self, inputs: Inputs<'r>) -> Result<&'r mut Self::Record>
    where
        Self: Sized,
    {
        Engine::default().run_returning(self, inputs)
    }
}

/// Phase tracking for one returning invocation.
struct Lifecycle<'f> {
    frame: &'f Frame,
    phase: Phase,
}

impl<'f> Lifecycle<'f> {
    fn new(frame: &'f Frame) -> Self {
        obs::emit_phase(frame, Phase::Initialized);
        Self {
            frame,
            phase: Phase::Initialized,
        }
    }

    fn advance(&mut self, next: Phase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "invalid phase transition {} -> {}",
            self.phase,
            next
        );
        self.phase = next;
        obs::emit_phase(self.frame, next);
    }
}

/// Check the declared return filter against the schema and the raw inputs.
fn bind_return_filter<R: ReturningInteraction>(
    name: &str,
    schema: &Schema,
    inputs: &Inputs<'_>,
) -> Result<&'static str> {
    let filter_name = R::RETURNING.ok_or_else(|| InteractionError::ReturningFilterNotSpecified {
        interaction: name.to_string(),
    })?;

    let inexistent = || InteractionError::ReturnFilterInexistent {
        interaction: name.to_string(),
        filter: filter_name.to_string(),
    };
    let not_mergeable = || InteractionError::NotErrorMergeable {
        interaction: name.to_string(),
        filter: filter_name.to_string(),
        expected: short_type_name(type_name::<R::Record>()).to_string(),
    };

    let filter = schema.get(filter_name).ok_or_else(inexistent)?;
    let declares_record = filter
        .record_type()
        .is_some_and(|record_type| record_type.type_id() == TypeId::of::<R::Record>());
    if !declares_record {
        return Err(not_mergeable());
    }

    match inputs.record(filter_name) {
        Some(record) if record.is::<R::Record>() => Ok(filter_name),
        Some(_) => Err(not_mergeable()),
        None if inputs.is_bound(filter_name) => Err(not_mergeable()),
        None => Err(inexistent()),
    }
}

pub(crate) fn invoke<'r, R: ReturningInteraction>(
    engine: &Engine,
    mut unit: R,
    inputs: Inputs<'r>,
    parent: Option<&Frame>,
) -> Result<&'r mut R::Record> {
    let frame = Frame::enter(parent, unit.name());
    let _span = InvocationSpan::enter(&frame);
    let mut lifecycle = Lifecycle::new(&frame);

    let schema = unit.filters();
    let filter_name = bind_return_filter::<R>(unit.name(), &schema, &inputs).map_err(|fault| {
        obs::emit_fault(&frame, &fault);
        fault
    })?;
    obs::emit_invocation_started(&frame, Some(filter_name));

    lifecycle.advance(Phase::Validating);
    let Resolution { mut inputs, mut errors } = schema.resolve(inputs);
    unit.validate(&inputs, &mut errors);
    engine.diagnostics().before(&frame, &inputs);

    let record = inputs
        .take_record::<R::Record>(filter_name)
        .ok_or_else(|| InteractionError::ReturnFilterInexistent {
            interaction: unit.name().to_string(),
            filter: filter_name.to_string(),
        })?;

    if errors.any() {
        lifecycle.advance(Phase::Invalid);
        obs::emit_validation_failed(&frame, errors.len());
        record.errors_mut().merge_dedup(&errors);
        unit.on_invalid(record, &inputs);
        engine.diagnostics().after(&frame, record.errors());
        return Ok(record);
    }

    lifecycle.advance(Phase::Executing);
    let mut ctx = Context::new(inputs, errors, frame.clone(), engine.clone(), Some(filter_name));
    match unit.execute_returning(&mut ctx, record) {
        Ok(()) => {}
        Err(Halt::Interrupt) => obs::emit_interrupted(&frame, ctx.errors().len()),
        Err(Halt::Fault(fault)) => {
            obs::emit_fault(&frame, &fault);
            return Err(fault);
        }
    }

    lifecycle.advance(Phase::Merging);
    let (errors, _) = ctx.finish();
    record.errors_mut().merge_dedup(&errors);

    lifecycle.advance(Phase::Done);
    engine.diagnostics().after(&frame, record.errors());
    obs::emit_invocation_finished(&frame, record.errors().len());
    Ok(record)
}
