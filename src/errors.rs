//! Error types for textrank_lsh
//!
//! Structural and configuration problems are returned as errors. Numerical
//! edge cases (empty graphs, isolated vertices, non-convergence) are absorbed
//! and reported in the results instead.

use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, TextRankError>;

/// Main error type for textrank_lsh
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TextRankError {
    /// A tunable is out of range or inconsistent with another one
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Two input sequences that must line up have different lengths
    #[error("Length mismatch for {what}: expected {expected}, got {got}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// A unit id was supplied more than once in a single ranking run
    #[error("Duplicate unit id: {id}")]
    DuplicateUnit { id: String },

    /// A token refers to a unit id that is not part of the input
    #[error("Unknown unit id: {id}")]
    UnknownUnit { id: String },

    /// PageRank did not converge within the maximum iterations.
    /// Only produced when the caller asks for strict convergence.
    #[error("Convergence failure after {iterations} iterations (delta={delta:.6})")]
    ConvergenceFailure { iterations: usize, delta: f64 },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl TextRankError {
    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a length mismatch error
    pub fn length_mismatch(what: &'static str, expected: usize, got: usize) -> Self {
        Self::LengthMismatch {
            what,
            expected,
            got,
        }
    }

    /// Create a duplicate unit error
    pub fn duplicate_unit(id: impl Into<String>) -> Self {
        Self::DuplicateUnit { id: id.into() }
    }

    /// Create an unknown unit error
    pub fn unknown_unit(id: impl Into<String>) -> Self {
        Self::UnknownUnit { id: id.into() }
    }

    /// Create a convergence failure error
    pub fn convergence_failure(iterations: usize, delta: f64) -> Self {
        Self::ConvergenceFailure { iterations, delta }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// True for errors caused by bad tunables or malformed input
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. }
                | Self::LengthMismatch { .. }
                | Self::DuplicateUnit { .. }
                | Self::UnknownUnit { .. }
        )
    }

    /// Check if this error indicates non-convergence
    pub fn is_convergence_failure(&self) -> bool {
        matches!(self, Self::ConvergenceFailure { .. })
    }
}

impl From<serde_json::Error> for TextRankError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
