//! Error types for the wash cycle.
//!
//! Every run-time error is terminal for its run: nothing is retried
//! internally and no further machines execute once an error surfaces.
//! The caller owns any retry policy.

use crate::modification::ModificationError;
use thiserror::Error;

/// Result type alias using [`WashError`].
pub type WashResult<T> = Result<T, WashError>;

/// An error that terminated a wash cycle.
#[derive(Debug, Error)]
pub enum WashError {
    /// A washing machine reported failure through its continuation.
    #[error("washing machine '{machine}' failed")]
    Machine {
        /// The name of the failing machine.
        machine: &'static str,
        /// The error the machine reported.
        #[source]
        source: anyhow::Error,
    },

    /// A washing machine returned a malformed modification.
    #[error("washing machine '{machine}' proposed an invalid modification")]
    InvalidModification {
        /// The name of the offending machine.
        machine: &'static str,
        /// Why the proposal was rejected.
        #[source]
        source: ModificationError,
    },

    /// The iteration count surpassed the computed loop bound: the chain
    /// is oscillating rather than converging.
    #[error(
        "wash cycle reached {iterations} iterations, exceeding the bound of {bound} \
         for a chain of {machines} machines"
    )]
    LoopBoundExceeded {
        /// The iteration count at the moment the run was aborted.
        iterations: u32,
        /// The bound computed at run start.
        bound: u32,
        /// The chain length the bound was computed from.
        machines: usize,
    },
}

impl WashError {
    /// Creates a machine-failure error.
    #[must_use]
    pub fn machine(machine: &'static str, source: anyhow::Error) -> Self {
        Self::Machine { machine, source }
    }

    /// Creates an invalid-modification error.
    #[must_use]
    pub fn invalid_modification(machine: &'static str, source: ModificationError) -> Self {
        Self::InvalidModification { machine, source }
    }

    /// Creates a loop-bound-exceeded error.
    #[must_use]
    pub fn loop_bound_exceeded(iterations: u32, bound: u32, machines: usize) -> Self {
        Self::LoopBoundExceeded {
            iterations,
            bound,
            machines,
        }
    }

    /// The name of the machine this error originated from, if any.
    #[must_use]
    pub fn machine_name(&self) -> Option<&'static str> {
        match self {
            Self::Machine { machine, .. } | Self::InvalidModification { machine, .. } => {
                Some(machine)
            }
            Self::LoopBoundExceeded { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_error_carries_its_source() {
        let error = WashError::machine("broken", anyhow::anyhow!("lime-scale failure"));
        assert_eq!(error.machine_name(), Some("broken"));
        assert!(error.to_string().contains("broken"));

        let source = std::error::Error::source(&error).expect("source should be attached");
        assert!(source.to_string().contains("lime-scale failure"));
    }

    #[test]
    fn loop_bound_error_carries_diagnostics() {
        let error = WashError::loop_bound_exceeded(6, 5, 2);
        assert_eq!(error.machine_name(), None);

        let message = error.to_string();
        assert!(message.contains('6'));
        assert!(message.contains('5'));
        assert!(message.contains('2'));
    }
}
