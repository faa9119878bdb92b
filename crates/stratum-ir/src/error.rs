//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Gate received a target list of the wrong size.
    #[error("Gate '{gate_name}' expects {expected}, got {got} targets")]
    TargetCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Human-readable description of the expected count.
        expected: String,
        /// Actual number of targets provided.
        got: usize,
    },

    /// The same qubit was used twice where that is not allowed.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// A target kind that the gate does not accept.
    #[error("Invalid target '{target}'{}", format_gate_context(.gate_name))]
    InvalidTarget {
        /// Rendered target.
        target: String,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// A measurement record lookback of zero.
    #[error("Measurement record lookback must be negative")]
    ZeroRecordLookback,
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = IrError::DuplicateQubit {
            qubit: QubitId(3),
            gate_name: Some("CX".into()),
        };
        assert_eq!(err.to_string(), "Duplicate qubit 3 in operation (gate: CX)");

        let err = IrError::InvalidTarget {
            target: "rec[-1]".into(),
            gate_name: None,
        };
        assert_eq!(err.to_string(), "Invalid target 'rec[-1]'");
    }
}
