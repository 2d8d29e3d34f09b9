#![warn(missing_docs)]

//! Convert borehole drilling logs into 3D VTK trajectories.
//!
//! A conversion takes a depth-ordered `(depth, value)` series for one side of
//! the tunnel face, places the borehole collar using the chainage distance and
//! the [`ReferenceFrame`], projects every sample along the tunnel heading and
//! writes a legacy VTK polyline plus a companion CSV.
//!
//! # Example
//!
//! ```no_run
//! use drillvtk::{convert, ConvertOptions, DepthSeries, ReferenceFrame, Side};
//!
//! let frame = ReferenceFrame::default();
//! let distance = frame.survey.locate("241+10")?;
//! let series = DepthSeries::read("2025_08_27_07_24_47_L.csv", "穿孔長", "Lowess_Trend")?;
//!
//! let options = ConvertOptions::new("Drill-L_ana_25.08.27.vtk", "2025_08_27_07_24_47_L_3d.csv");
//! let output = convert(&series.samples, distance, Side::Left, &frame, &options)?;
//! println!("wrote {}", output.vtk_path.display());
//! # Ok::<(), drillvtk::ConvertError>(())
//! ```

pub mod batch;
pub mod companion;
pub mod config;
pub mod error;
pub mod input;
pub mod naming;

pub use batch::{convert_files, run_batch, BatchEntry, BatchJob, BatchReport};
pub use config::{OutputSettings, Settings};
pub use error::{ConvertError, Result};
pub use input::DepthSeries;
pub use naming::{companion_file_name, detect_side, generate_file_name, sort_by_side};

pub use drillvtk_geom::{
    BaseCoordinates, CoordinateTransformer, DepthSample, ReferenceFrame, Side, SurveyPoint,
    SurveyReference, TrajectoryBuilder, TrajectoryPoint,
};
pub use drillvtk_vtk::{
    read_preview, ParseOutcome, PreviewSummary, VtkDocument, VtkPreview, VtkWriter,
};

use std::fs;
use std::path::PathBuf;

/// Output paths, naming and per-call frame overrides for one conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// VTK file to write.
    pub vtk_path: PathBuf,
    /// Companion CSV to write.
    pub csv_path: PathBuf,
    /// VTK header title.
    pub title: String,
    /// Scalar array name.
    pub scalar_field: String,
    /// Heading override (degrees) for this call only.
    pub direction_angle_deg: Option<f64>,
    /// Reference distance override (m) for this call only.
    pub reference_distance: Option<f64>,
}

impl ConvertOptions {
    /// Options with default title and scalar field.
    pub fn new(vtk_path: impl Into<PathBuf>, csv_path: impl Into<PathBuf>) -> Self {
        Self::from_settings(&OutputSettings::default(), vtk_path, csv_path)
    }

    /// Options taking title and scalar field from `output`.
    pub fn from_settings(
        output: &OutputSettings,
        vtk_path: impl Into<PathBuf>,
        csv_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            vtk_path: vtk_path.into(),
            csv_path: csv_path.into(),
            title: output.title.clone(),
            scalar_field: output.scalar_field.clone(),
            direction_angle_deg: None,
            reference_distance: None,
        }
    }

    /// Set the VTK title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the scalar array name.
    pub fn with_scalar_field(mut self, name: impl Into<String>) -> Self {
        self.scalar_field = name.into();
        self
    }

    /// Override the heading for this conversion.
    pub fn with_direction_angle(mut self, degrees: f64) -> Self {
        self.direction_angle_deg = Some(degrees);
        self
    }

    /// Override the reference distance for this conversion.
    pub fn with_reference_distance(mut self, distance: f64) -> Self {
        self.reference_distance = Some(distance);
        self
    }
}

/// Files written by one conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOutput {
    /// Path of the VTK file.
    pub vtk_path: PathBuf,
    /// Path of the companion CSV.
    pub csv_path: PathBuf,
    /// Number of trajectory points written.
    pub points: usize,
}

/// Build the trajectory for `side` at chainage `distance` and write the VTK
/// file and companion CSV named in `options`.
///
/// The VTK text is rendered first, so fewer than two samples or a bad field
/// name fails before anything is written. The companion CSV is written before
/// the VTK file and removed again if the VTK write fails.
pub fn convert(
    samples: &[DepthSample],
    distance: f64,
    side: Side,
    frame: &ReferenceFrame,
    options: &ConvertOptions,
) -> Result<ConversionOutput> {
    let coords = CoordinateTransformer::new(frame).calculate_with(
        distance,
        options.direction_angle_deg.unwrap_or(frame.direction_angle_deg),
        options.reference_distance.unwrap_or(frame.reference_distance),
    );
    let points = TrajectoryBuilder::for_side(frame, &coords, side).build(samples)?;

    let document = VtkDocument::new(points)
        .with_title(options.title.as_str())
        .with_scalar_field(options.scalar_field.as_str());
    let vtk = VtkWriter::new().to_bytes(&document)?;
    companion::save_companion(
        &options.csv_path,
        &document.points,
        side,
        distance,
        &document.scalar_field,
    )?;
    if let Err(e) = fs::write(&options.vtk_path, vtk) {
        // A failed conversion leaves neither file.
        let _ = fs::remove_file(&options.csv_path);
        return Err(e.into());
    }

    tracing::info!(
        side = %side,
        distance,
        points = document.len(),
        vtk = %options.vtk_path.display(),
        csv = %options.csv_path.display(),
        "converted trajectory"
    );

    Ok(ConversionOutput {
        vtk_path: options.vtk_path.clone(),
        csv_path: options.csv_path.clone(),
        points: document.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn samples() -> Vec<DepthSample> {
        vec![
            DepthSample::new(0.0, 120.0),
            DepthSample::new(0.5, 131.5),
            DepthSample::new(1.0, 99.25),
        ]
    }

    #[test]
    fn test_convert_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let options = ConvertOptions::new(dir.path().join("a.vtk"), dir.path().join("a_3d.csv"));
        let frame = ReferenceFrame::default();
        let out = convert(&samples(), 1238.0, Side::Left, &frame, &options).unwrap();
        assert_eq!(out.points, 3);

        let preview = read_preview(&out.vtk_path).into_preview().unwrap();
        assert_abs_diff_eq!(preview.points[0][0], -907.462, epsilon = 1e-3);
        assert_abs_diff_eq!(preview.points[0][1], 845.15, epsilon = 1e-3);
        assert_abs_diff_eq!(preview.points[0][2], 17.3, epsilon = 1e-3);

        let csv = std::fs::read_to_string(&out.csv_path).unwrap();
        assert!(csv.starts_with("\"# LMRタイプ: L, 坑口からの距離: 1238.0m\""));
    }

    #[test]
    fn test_short_series_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let options = ConvertOptions::new(dir.path().join("a.vtk"), dir.path().join("a_3d.csv"));
        let frame = ReferenceFrame::default();
        let err = convert(&samples()[..1], 1238.0, Side::Right, &frame, &options).unwrap_err();
        assert!(matches!(err, ConvertError::Geom(_)));
        assert!(!options.vtk_path.exists());
        assert!(!options.csv_path.exists());
    }

    #[test]
    fn test_overrides_apply_to_one_call() {
        let dir = tempfile::tempdir().unwrap();
        let frame = ReferenceFrame::default();
        let options = ConvertOptions::new(dir.path().join("a.vtk"), dir.path().join("a.csv"))
            .with_reference_distance(1238.0)
            .with_title("override")
            .with_scalar_field("Lowess_Trend");
        convert(&samples(), 1238.0, Side::Middle, &frame, &options).unwrap();

        let preview = read_preview(&options.vtk_path).into_preview().unwrap();
        // At the reference distance the collar is the base coordinate in metres.
        assert_abs_diff_eq!(preview.points[0][0], -658.623, epsilon = 1e-3);
        assert_abs_diff_eq!(preview.points[0][1], 737.700, epsilon = 1e-3);
        assert_eq!(preview.summary.scalar_names, vec!["Lowess_Trend"]);
        assert_eq!(frame.reference_distance, 967.0);
    }

    #[test]
    fn test_bad_scalar_field_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let options = ConvertOptions::new(dir.path().join("a.vtk"), dir.path().join("a.csv"))
            .with_scalar_field("two words");
        let err = convert(&samples(), 967.0, Side::Left, &ReferenceFrame::default(), &options)
            .unwrap_err();
        assert!(matches!(err, ConvertError::Vtk(drillvtk_vtk::VtkError::InvalidFieldName(_))));
        assert!(!options.vtk_path.exists());
        assert!(!options.csv_path.exists());
    }

    #[test]
    fn test_failed_vtk_write_removes_companion() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in place of the VTK file makes the write fail.
        let vtk_path = dir.path().join("taken.vtk");
        std::fs::create_dir(&vtk_path).unwrap();
        let options = ConvertOptions::new(&vtk_path, dir.path().join("taken_3d.csv"));

        let err = convert(&samples(), 1238.0, Side::Left, &ReferenceFrame::default(), &options)
            .unwrap_err();
        assert!(matches!(err, ConvertError::Io(_)));
        assert!(!options.csv_path.exists());
        assert!(vtk_path.is_dir());
    }
}
