//! Error types shared by the instance loaders and the search engines.

use thiserror::Error;

/// Errors raised while building an instance or running a search.
#[derive(Debug, Error)]
pub enum SolverError {
    /// A tour needs at least two points.
    #[error("at least 2 points are required to build a tour, found {found}")]
    TooFewPoints { found: usize },

    /// The annealing temperature must stay strictly positive and finite.
    #[error("temperature must be positive and finite, got {0}")]
    InvalidTemperature(f64),

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A tour is not a permutation of the instance points, or its carried
    /// length disagrees with the distance table.
    #[error("malformed tour: {0}")]
    MalformedTour(String),

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SolverError>;

impl SolverError {
    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        SolverError::InvalidParameter { name, reason: reason.into() }
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        SolverError::Parse { line, message: message.into() }
    }
}
