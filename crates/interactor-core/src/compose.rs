//! Nested invocation from within a running body.
//!
//! [`Context::compose`] accepts either wrapper:
//!
//! - [`Plain`] for an [`Interaction`]; yields its result
//! - [`Returning`] for a [`ReturningInteraction`]; yields its return object
//!
//! The nested unit runs on the caller's engine and its frame records the
//! caller chain for diagnostics.

use interactor_errors::Errorable;
use interactor_filters::Inputs;

use crate::context::Context;
use crate::error::{Halt, Step};
use crate::interaction::{self, Interaction};
use crate::returning::{self, ReturningInteraction};

mod sealed {
    pub trait Sealed {}
}

/// A unit wrapper that can be run from inside another body.
pub trait Composable<'n>: sealed::Sealed {
    type Output;

    #[doc(hidden)]
    fn compose_into(self, caller: &mut Context<'_>, inputs: Inputs<'n>) -> Step<Self::Output>;
}

/// Compose a plain unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain<I>(pub I);

/// Compose a returning unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct Returning<R>(pub R);

impl<I: Interaction> sealed::Sealed for Plain<I> {}
impl<R: ReturningInteraction> sealed::Sealed for Returning<R> {}

impl<'n, I: Interaction> Composable<'n> for Plain<I> {
    type Output = I::Output;

    fn compose_into(self, caller: &mut Context<'_>, inputs: Inputs<'n>) -> Step<I::Output> {
        let engine = caller.engine().clone();
        let outcome = interaction::invoke(&engine, self.0, inputs, Some(caller.frame()))?;
        let (errors, result) = outcome.into_parts();
        if errors.any() {
            caller.merge_errors(&errors);
            return Err(Halt::Interrupt);
        }
        result.ok_or(Halt::Interrupt)
    }
}

impl<'n, R: ReturningInteraction> Composable<'n> for Returning<R> {
    type Output = &'n mut R::Record;

    fn compose_into(self, caller: &mut Context<'_>, inputs: Inputs<'n>) -> Step<Self::Output> {
        let engine = caller.engine().clone();
        let record = returning::invoke(&engine, self.0, inputs, Some(caller.frame()))?;
        tracing::trace!(
            interaction = caller.frame().name(),
            nested_errors = record.errors().len(),
            "composed returning unit"
        );
        Ok(record)
    }
}
