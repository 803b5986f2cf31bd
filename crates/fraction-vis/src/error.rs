//! Error types for fraction-vis.

use thiserror::Error;

use crate::phase::{AnimationPhase, OperationType};

/// Result type for fraction-vis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the walkthrough.
#[derive(Debug, Error)]
pub enum Error {
    /// Fraction arithmetic rejected an input.
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] fraction_arith::Error),

    /// Playback speed must be a positive, finite multiplier.
    #[error("invalid playback speed: {0}")]
    InvalidSpeed(f64),

    /// The requested phase does not occur for this operation.
    #[error("phase {phase:?} is not part of the {operation:?} sequence")]
    PhaseNotInSequence {
        phase: AnimationPhase,
        operation: OperationType,
    },

    /// A configuration value could not be used.
    #[error("invalid configuration {key}: {reason}")]
    Config { key: &'static str, reason: String },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
