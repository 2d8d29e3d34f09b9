//! Error types for VTK serialization.

use thiserror::Error;

/// Errors that can occur while writing a VTK document.
#[derive(Error, Debug)]
pub enum VtkError {
    /// I/O error writing the output file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document has fewer points than a polyline needs.
    #[error("insufficient data: {found} point(s), at least {required} required")]
    InsufficientData {
        /// Number of points in the document.
        found: usize,
        /// Minimum number of points.
        required: usize,
    },

    /// The scalar field name would break the SCALARS line.
    #[error("invalid scalar field name '{0}': must be non-empty and contain no whitespace")]
    InvalidFieldName(String),

    /// The title would break the header (legacy titles are a single line).
    #[error("invalid title: must be a single line of at most 256 characters")]
    InvalidTitle,

    /// The library backend rejected the document.
    #[error("VTK backend error: {0}")]
    Backend(String),
}

impl VtkError {
    /// Create an insufficient-data error.
    pub fn insufficient(found: usize) -> Self {
        Self::InsufficientData {
            found,
            required: drillvtk_geom::MIN_POLYLINE_POINTS,
        }
    }
}

/// Result type for VTK operations.
pub type Result<T> = std::result::Result<T, VtkError>;
