//! Fault taxonomy and the body step type.
//!
//! Validation and business failures are data (an
//! [`ErrorCollection`](interactor_errors::ErrorCollection)) and never appear
//! here. [`InteractionError`] covers programmer mistakes only.

/// Configuration and implementation faults. Raised synchronously.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InteractionError {
    #[error("{interaction} does not declare a returning filter")]
    ReturningFilterNotSpecified { interaction: String },

    #[error("{interaction}: return filter `{filter}` is not declared or has no value")]
    ReturnFilterInexistent { interaction: String, filter: String },

    #[error("{interaction}: return filter `{filter}` is not an error-mergeable {expected}")]
    NotErrorMergeable {
        interaction: String,
        filter: String,
        expected: String,
    },

    #[error("{interaction} must implement execute_returning")]
    NotImplemented { interaction: String },
}

impl InteractionError {
    /// The three faults raised while binding the return object.
    pub fn is_configuration_fault(&self) -> bool {
        !matches!(self, InteractionError::NotImplemented { .. })
    }

    pub fn interaction(&self) -> &str {
        match self {
            InteractionError::ReturningFilterNotSpecified { interaction }
            | InteractionError::ReturnFilterInexistent { interaction, .. }
            | InteractionError::NotErrorMergeable { interaction, .. }
            | InteractionError::NotImplemented { interaction } => interaction,
        }
    }
}

/// Result type for running units.
pub type Result<T> = std::result::Result<T, InteractionError>;

/// Why a body stopped before returning a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Halt {
    /// Early exit. Not a failure; the errors that justify it are already in
    /// the unit's local collection.
    Interrupt,
    /// A fault that aborts the whole invocation.
    Fault(InteractionError),
}

impl From<InteractionError> for Halt {
    fn from(fault: InteractionError) -> Self {
        Halt::Fault(fault)
    }
}

/// Result of a body or of one of its steps. Use `?` to propagate a
/// [`Halt`].
pub type Step<T = ()> = std::result::Result<T, Halt>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = InteractionError::ReturningFilterNotSpecified {
            interaction: "UpdateUser".to_string(),
        };
        assert!(err.to_string().contains("does not declare a returning filter"));

        let err = InteractionError::NotErrorMergeable {
            interaction: "UpdateUser".to_string(),
            filter: "user".to_string(),
            expected: "User".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("`user`"));
        assert!(msg.contains("User"));
    }

    #[test]
    fn test_configuration_fault_classification() {
        let fault = InteractionError::ReturnFilterInexistent {
            interaction: "A".into(),
            filter: "record".into(),
        };
        assert!(fault.is_configuration_fault());
        assert_eq!(fault.interaction(), "A");

        let fault = InteractionError::NotImplemented {
            interaction: "A".into(),
        };
        assert!(!fault.is_configuration_fault());
    }

    #[test]
    fn test_fault_converts_into_halt() {
        fn step() -> Step<u8> {
            let nested: Result<u8> = Err(InteractionError::NotImplemented {
                interaction: "A".into(),
            });
            Ok(nested?)
        }
        assert!(matches!(step(), Err(Halt::Fault(_))));
    }
}
