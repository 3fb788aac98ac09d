//! Per-invocation execution context handed to a unit's body.

use interactor_errors::{ErrorCollection, Errorable};
use interactor_filters::{InputSet, Inputs};

use crate::compose::{Composable, Returning};
use crate::engine::Engine;
use crate::error::{Halt, Step};
use crate::frame::Frame;
use crate::returning::ReturningInteraction;

/// Resolved inputs, the local error collection and the invocation frame of
/// one running body.
///
/// A context lives for exactly one invocation and is dropped once its
/// errors have been handed back.
pub struct Context<'r> {
    inputs: InputSet<'r>,
    errors: ErrorCollection,
    frame: Frame,
    engine: Engine,
    returning: Option<&'static str>,
}

impl<'r> Context<'r> {
    pub(crate) fn new(
        inputs: InputSet<'r>,
        errors: ErrorCollection,
        frame: Frame,
        engine: Engine,
        returning: Option<&'static str>,
    ) -> Self {
        Self {
            inputs,
            errors,
            frame,
            engine,
            returning,
        }
    }

    pub fn inputs(&self) -> &InputSet<'r> {
        &self.inputs
    }

    /// Mutable access, for records bound by reference.
    pub fn inputs_mut(&mut self) -> &mut InputSet<'r> {
        &mut self.inputs
    }

    pub fn errors(&self) -> &ErrorCollection {
        &self.errors
    }

    pub fn errors_mut(&mut self) -> &mut ErrorCollection {
        &mut self.errors
    }

    pub fn add_error(&mut self, attribute: impl Into<String>, message: impl Into<String>) {
        self.errors.add(attribute, message);
    }

    /// Append every entry of `errors` to the local collection.
    pub fn merge_errors(&mut self, errors: &ErrorCollection) {
        self.errors.merge_all(errors);
    }

    pub fn errors_any(&self) -> bool {
        self.errors.any()
    }

    pub fn errors_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Stop the body when the local collection holds errors.
    ///
    /// ```ignore
    /// ctx.return_if_errors()?;
    /// ```
    pub fn return_if_errors(&self) -> Step {
        if self.errors.any() {
            Err(Halt::Interrupt)
        } else {
            Ok(())
        }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The declared return filter, when this body belongs to a returning unit.
    pub fn returning(&self) -> Option<&'static str> {
        self.returning
    }

    /// Run a nested unit from within this body.
    ///
    /// - [`Returning`] yields the nested return object. Its errors stay on
    ///   that object and are not copied into this context.
    /// - [`Plain`](crate::compose::Plain) yields the nested result. If the
    ///   nested unit failed, its errors are appended here and this body is
    ///   interrupted.
    ///
    /// Faults of the nested unit propagate.
    pub fn compose<'n, C>(&mut self, unit: C, inputs: Inputs<'n>) -> Step<C::Output>
    where
        C: Composable<'n>,
    {
        unit.compose_into(self, inputs)
    }

    /// Run a nested returning unit, append all of its record's errors to
    /// this context (duplicates included), then call `handler` with the
    /// record.
    pub fn compose_with<'n, R, T, F>(
        &mut self,
        unit: Returning<R>,
        inputs: Inputs<'n>,
        handler: F,
    ) -> Step<T>
    where
        R: ReturningInteraction,
        F: FnOnce(&mut Self, &'n mut R::Record) -> Step<T>,
    {
        let record = unit.compose_into(self, inputs)?;
        self.errors.merge_all(record.errors());
        handler(self, record)
    }

    pub(crate) fn finish(self) -> (ErrorCollection, Frame) {
        (self.errors, self.frame)
    }
}
