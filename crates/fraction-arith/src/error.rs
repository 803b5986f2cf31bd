//! Error types for fraction-arith.

use thiserror::Error;

/// Result type for fraction arithmetic.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in fraction arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A fraction was constructed with a zero denominator.
    #[error("denominator must be non-zero")]
    ZeroDenominator,

    /// The divisor has a zero numerator.
    #[error("cannot divide by a fraction equal to zero")]
    DivisionByZero,

    /// Zero has no reciprocal.
    #[error("fraction with zero numerator has no reciprocal")]
    ZeroReciprocal,

    /// Subtraction would go below zero.
    #[error("result would be negative: {minuend} - {subtrahend}")]
    NegativeResult {
        minuend: String,
        subtrahend: String,
    },

    /// An intermediate product does not fit in a `u64`.
    #[error("arithmetic overflow computing {0}")]
    Overflow(&'static str),

    /// A random range is empty or admits a zero denominator.
    #[error("invalid value range {min}..={max}: must be non-empty and start at 1 or above")]
    InvalidRange { min: u64, max: u64 },

    /// A string is not of the form `N/D` with a non-zero `D`.
    #[error("cannot parse {0:?} as a fraction")]
    Parse(String),
}
