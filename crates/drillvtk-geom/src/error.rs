//! Error types for chainage and trajectory computations.

use thiserror::Error;

/// Errors that can occur while resolving survey points or building trajectories.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeomError {
    /// Survey-point text is not of the form `major+minor`.
    #[error("malformed survey point '{text}': {message}")]
    Format {
        /// The rejected input.
        text: String,
        /// What was wrong with it.
        message: String,
    },

    /// Too few depth samples to form a polyline.
    #[error("insufficient data: {found} sample(s), at least {required} required")]
    InsufficientData {
        /// Number of samples supplied.
        found: usize,
        /// Minimum number of samples needed.
        required: usize,
    },
}

impl GeomError {
    /// Create a survey-point format error.
    pub fn format(text: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Format {
            text: text.into(),
            message: message.into(),
        }
    }

    /// Create an insufficient-data error for a polyline (two vertices minimum).
    pub fn insufficient(found: usize) -> Self {
        Self::InsufficientData {
            found,
            required: crate::MIN_POLYLINE_POINTS,
        }
    }
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeomError>;
