//! Settings loaded from TOML.
//!
//! Every key is optional; anything absent falls back to the built-in tunnel
//! constants. A minimal file overriding only the heading looks like:
//!
//! ```toml
//! [frame]
//! direction_angle_deg = 65.6
//!
//! [output]
//! scalar_field = "Lowess_Trend"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use drillvtk_geom::ReferenceFrame;
use drillvtk_vtk::{DEFAULT_SCALAR_FIELD, DEFAULT_TITLE};

use crate::error::{ConvertError, Result};

/// Default depth column in drilling logs.
pub const DEFAULT_DEPTH_COLUMN: &str = "穿孔長";

/// Default value column in drilling logs (smoothed energy).
pub const DEFAULT_VALUE_COLUMN: &str = "Lowess_Trend";

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Tunnel reference frame.
    pub frame: ReferenceFrame,
    /// Output naming and input column selection.
    pub output: OutputSettings,
}

/// Output and input-column settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// VTK header title.
    pub title: String,
    /// Name of the scalar array and of the last companion CSV column.
    pub scalar_field: String,
    /// Input column holding depth along the hole.
    pub depth_column: String,
    /// Input column holding the measured value.
    pub value_column: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            scalar_field: DEFAULT_SCALAR_FIELD.to_string(),
            depth_column: DEFAULT_DEPTH_COLUMN.to_string(),
            value_column: DEFAULT_VALUE_COLUMN.to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file. A missing file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let settings = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded settings");
        Ok(settings)
    }

    /// Render the effective settings as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        let frame = &self.frame;
        let mut numbers = vec![
            ("frame.reference_distance".to_string(), frame.reference_distance),
            ("frame.direction_angle_deg".to_string(), frame.direction_angle_deg),
            ("frame.survey.major".to_string(), frame.survey.major),
            ("frame.survey.minor".to_string(), frame.survey.minor),
            ("frame.survey.conversion_factor".to_string(), frame.survey.conversion_factor),
        ];
        for (side, base) in frame.base.iter() {
            numbers.push((format!("frame.base.{}.x", side), base.x));
            numbers.push((format!("frame.base.{}.y", side), base.y));
        }
        for (side, z) in frame.elevation.iter() {
            numbers.push((format!("frame.elevation.{}", side), *z));
        }
        if let Some((key, _)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConvertError::InvalidSettings(format!("{} must be finite", key)));
        }

        let output = &self.output;
        if output.scalar_field.is_empty() || output.scalar_field.chars().any(char::is_whitespace) {
            return Err(ConvertError::InvalidSettings(format!(
                "output.scalar_field '{}' must be non-empty without whitespace",
                output.scalar_field
            )));
        }
        if output.title.contains(['\n', '\r']) {
            return Err(ConvertError::InvalidSettings(
                "output.title must be a single line".into(),
            ));
        }
        if output.depth_column.trim().is_empty() || output.value_column.trim().is_empty() {
            return Err(ConvertError::InvalidSettings(
                "output.depth_column and output.value_column must be non-empty".into(),
            ));
        }
        Ok(())
    }
}
