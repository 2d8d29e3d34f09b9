//! The in-memory document a writer serializes.

use drillvtk_geom::{TrajectoryPoint, MIN_POLYLINE_POINTS};

use crate::error::{Result, VtkError};

/// Title written on the second header line when none is given.
pub const DEFAULT_TITLE: &str = "Drill path data";

/// Scalar array name used when none is given.
pub const DEFAULT_SCALAR_FIELD: &str = "Energy";

/// Legacy readers truncate header titles beyond this length.
const MAX_TITLE_LEN: usize = 256;

/// A borehole trajectory ready for serialization: one polyline through all
/// points in order, with one scalar per point.
#[derive(Debug, Clone, PartialEq)]
pub struct VtkDocument {
    /// Ordered trajectory vertices.
    pub points: Vec<TrajectoryPoint>,
    /// Name of the point scalar array.
    pub scalar_field: String,
    /// Header title line.
    pub title: String,
}

impl VtkDocument {
    /// Document with the default title and scalar field name.
    pub fn new(points: Vec<TrajectoryPoint>) -> Self {
        Self {
            points,
            scalar_field: DEFAULT_SCALAR_FIELD.to_string(),
            title: DEFAULT_TITLE.to_string(),
        }
    }

    /// Set the scalar array name.
    pub fn with_scalar_field(mut self, name: impl Into<String>) -> Self {
        self.scalar_field = name.into();
        self
    }

    /// Set the header title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the document has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Vertex indices of the single polyline, `0..n`.
    pub fn connectivity(&self) -> impl Iterator<Item = usize> {
        0..self.points.len()
    }

    /// Check the document can be written under the legacy grammar.
    pub fn validate(&self) -> Result<()> {
        if self.points.len() < MIN_POLYLINE_POINTS {
            return Err(VtkError::insufficient(self.points.len()));
        }
        if self.scalar_field.is_empty() || self.scalar_field.chars().any(char::is_whitespace) {
            return Err(VtkError::InvalidFieldName(self.scalar_field.clone()));
        }
        let multiline = self.title.contains(['\n', '\r']);
        if multiline || self.title.chars().count() > MAX_TITLE_LEN {
            return Err(VtkError::InvalidTitle);
        }
        Ok(())
    }
}
