//! The engine: runs units with a configured diagnostic sink.

use std::sync::Arc;

use interactor_filters::Inputs;

use crate::config::{DiagnosticsTarget, EngineConfig};
use crate::diagnostics::{DiagnosticSink, Diagnostics, NoopSink, TracingSink, WriterSink};
use crate::error::Result;
use crate::interaction::{self, Interaction, Outcome};
use crate::returning::{self, ReturningInteraction};

/// Entry point for running units.
///
/// Cheap to clone; nested invocations run on a clone of their caller's
/// engine. `Engine::default()` discards diagnostics.
#[derive(Clone, Default)]
pub struct Engine {
    diagnostics: Diagnostics,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(sink: impl DiagnosticSink + 'static) -> Self {
        Self::with_diagnostics(Diagnostics::new(Arc::new(sink)))
    }

    pub fn with_diagnostics(diagnostics: Diagnostics) -> Self {
        Self { diagnostics }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let sink: Arc<dyn DiagnosticSink> = match config.diagnostics {
            DiagnosticsTarget::Off => Arc::new(NoopSink),
            DiagnosticsTarget::Tracing => Arc::new(TracingSink),
            DiagnosticsTarget::Stderr => Arc::new(WriterSink::stderr()),
        };
        Self::with_diagnostics(
            Diagnostics::new(sink)
                .with_indent_width(config.indent_width)
                .with_max_inputs_len(config.max_inputs_len),
        )
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Run a plain unit.
    ///
    /// Validation and business failures are reported through
    /// [`Outcome::errors`]; `Err` means a fault raised by a nested unit.
    pub fn run<I: Interaction>(&self, unit: I, inputs: Inputs<'_>) -> Result<Outcome<I::Output>> {
        interaction::invoke(self, unit, inputs, None)
    }

    /// Run a returning unit and hand back its return object.
    ///
    /// # Errors
    ///
    /// Only configuration and implementation faults; see
    /// [`ReturningInteraction`].
    pub fn run_returning<'r, R: ReturningInteraction>(
        &self,
        unit: R,
        inputs: Inputs<'r>,
    ) -> Result<&'r mut R::Record> {
        returning::invoke(self, unit, inputs, None)
    }
}
