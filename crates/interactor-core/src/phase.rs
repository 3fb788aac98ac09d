//! Lifecycle phases of a returning invocation.

use std::fmt;

/// `Initialized → Validating → (Invalid | Executing) → Merging → Done`.
///
/// `Invalid` is terminal: the body never runs, so there is nothing further
/// to merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initialized,
    Validating,
    Invalid,
    Executing,
    Merging,
    Done,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Initialized => "initialized",
            Phase::Validating => "validating",
            Phase::Invalid => "invalid",
            Phase::Executing => "executing",
            Phase::Merging => "merging",
            Phase::Done => "done",
        }
    }

    pub fn can_advance_to(&self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Initialized, Phase::Validating)
                | (Phase::Validating, Phase::Invalid)
                | (Phase::Validating, Phase::Executing)
                | (Phase::Executing, Phase::Merging)
                | (Phase::Merging, Phase::Done)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Invalid | Phase::Done)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
