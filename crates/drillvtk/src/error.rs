//! Error types for conversions.

use std::path::PathBuf;

use thiserror::Error;

use drillvtk_geom::GeomError;
use drillvtk_vtk::VtkError;

/// Errors that can occur while converting one input.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Survey-point or trajectory error.
    #[error(transparent)]
    Geom(#[from] GeomError),

    /// VTK serialization error.
    #[error(transparent)]
    Vtk(#[from] VtkError),

    /// I/O error reading input or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required column is absent from the input header.
    #[error("column '{column}' not found in input header")]
    MissingColumn {
        /// Configured column name.
        column: String,
    },

    /// No L/M/R side could be detected from the input name.
    #[error("cannot determine L/M/R side from '{0}'")]
    UnknownSide(String),

    /// Another input in the same batch already writes this path.
    #[error("output {} is already written by another input", .0.display())]
    OutputConflict(PathBuf),

    /// Settings file could not be parsed.
    #[error("invalid settings file: {0}")]
    Config(#[from] toml::de::Error),

    /// Settings could not be rendered as TOML.
    #[error("cannot serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Settings parsed but hold unusable values.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

impl ConvertError {
    /// Create a missing-column error.
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
