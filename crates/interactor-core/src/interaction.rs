//! Plain units: validate inputs, run a body, report an [`Outcome`].

use interactor_errors::{ErrorCollection, Errorable};
use interactor_filters::{Inputs, Resolution};

use crate::context::Context;
use crate::engine::Engine;
use crate::error::{Halt, Result, Step};
use crate::frame::Frame;
use crate::obs::{self, InvocationSpan};
use crate::unit::Unit;

/// A unit whose body produces a value.
///
/// ```
/// use interactor_core::{Context, Filter, Inputs, Interaction, Schema, Step, Unit};
///
/// struct Greet;
///
/// impl Unit for Greet {
///     fn filters(&self) -> Schema {
///         Schema::new().filter(Filter::string("name").default("world"))
///     }
/// }
///
/// impl Interaction for Greet {
///     type Output = String;
///
///     fn execute(&mut self, ctx: &mut Context<'_>) -> Step<String> {
///         let name = ctx.inputs().string("name").unwrap_or_default().to_string();
///         if name.len() > 20 {
///             ctx.add_error("name", "is too long");
///         }
///         ctx.return_if_errors()?;
///         Ok(format!("hello {name}"))
///     }
/// }
///
/// let outcome = Greet.run(Inputs::new()).unwrap();
/// assert_eq!(outcome.result().map(String::as_str), Some("hello world"));
/// ```
pub trait Interaction: Unit {
    type Output;

    fn execute(&mut self, ctx: &mut Context<'_>) -> Step<Self::Output>;

    /// Run on the default engine.
    fn run(self, inputs: Inputs<'_>) -> Result<Outcome<Self::Output>>
    where
        Self: Sized,
    {
        Engine::default().run(self, inputs)
    }
}

/// Errors and result of a plain invocation.
///
/// `result` is `None` when validation failed or the body was interrupted.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    errors: ErrorCollection,
    result: Option<T>,
}

impl<T> Outcome<T> {
    pub fn errors(&self) -> &ErrorCollection {
        &self.errors
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn into_result(self) -> Option<T> {
        self.result
    }

    pub fn into_parts(self) -> (ErrorCollection, Option<T>) {
        (self.errors, self.result)
    }
}

impl<T> Errorable for Outcome<T> {
    fn errors(&self) -> &ErrorCollection {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut ErrorCollection {
        &mut self.errors
    }
}

pub(crate) fn invoke<I: Interaction>(
    engine: &Engine,
    mut unit: I,
    inputs: Inputs<'_>,
    parent: Option<&Frame>,
) -> Result<Outcome<I::Output>> {
    let frame = Frame::enter(parent, unit.name());
    let _span = InvocationSpan::enter(&frame);
    obs::emit_invocation_started(&frame, None);

    let Resolution { inputs, mut errors } = unit.filters().resolve(inputs);
    unit.validate(&inputs, &mut errors);
    engine.diagnostics().before(&frame, &inputs);

    if errors.any() {
        obs::emit_validation_failed(&frame, errors.len());
        engine.diagnostics().after(&frame, &errors);
        return Ok(Outcome {
            errors,
            result: None,
        });
    }

    let mut ctx = Context::new(inputs, errors, frame, engine.clone(), None);
    let result = match unit.execute(&mut ctx) {
        Ok(value) => Some(value),
        Err(Halt::Interrupt) => {
            obs::emit_interrupted(ctx.frame(), ctx.errors().len());
            None
        }
        Err(Halt::Fault(fault)) => {
            obs::emit_fault(ctx.frame(), &fault);
            return Err(fault);
        }
    };

    let (errors, frame) = ctx.finish();
    engine.diagnostics().after(&frame, &errors);
    obs::emit_invocation_finished(&frame, errors.len());
    Ok(Outcome { errors, result })
}
