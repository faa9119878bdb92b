//! Error types for the compilation crate.

use thiserror::Error;

/// Errors that can occur during compilation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] stratum_ir::IrError),

    /// Instruction with no layer mapping or no Z-basis decomposition.
    #[error("Unsupported instruction '{instruction}': {reason}")]
    UnsupportedInstruction { instruction: String, reason: String },

    /// A pass produced a circuit that violates an invariant.
    #[error("Internal inconsistency: {0}")]
    InternalInconsistency(String),

    /// Invalid pass configuration.
    #[error("Invalid pass configuration: {0}")]
    InvalidConfiguration(String),
}

impl CompileError {
    /// Build an [`CompileError::UnsupportedInstruction`] for an instruction.
    pub(crate) fn unsupported(
        instruction: &stratum_ir::Instruction,
        reason: impl Into<String>,
    ) -> Self {
        CompileError::UnsupportedInstruction {
            instruction: instruction.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
