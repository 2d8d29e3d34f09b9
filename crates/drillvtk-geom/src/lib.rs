#![warn(missing_docs)]

//! Chainage and trajectory geometry for drillvtk.
//!
//! Turns a survey point into a distance from the tunnel entrance, that distance
//! into per-side borehole collar coordinates, and a depth series into an
//! ordered 3D trajectory. Every function here is pure; the
//! [`ReferenceFrame`] is passed in explicitly.
//!
//! # Example
//!
//! ```
//! use drillvtk_geom::{
//!     CoordinateTransformer, DepthSample, ReferenceFrame, Side, TrajectoryBuilder,
//! };
//!
//! let frame = ReferenceFrame::default();
//! let distance = frame.survey.locate("241+10").unwrap();
//! let coords = CoordinateTransformer::new(&frame).calculate(distance);
//!
//! let samples = [DepthSample::new(0.0, 120.0), DepthSample::new(0.5, 131.5)];
//! let points = TrajectoryBuilder::for_side(&frame, &coords, Side::Left)
//!     .build(&samples)
//!     .unwrap();
//! assert_eq!(points.len(), 2);
//! ```

pub mod error;
pub mod frame;
pub mod lmr;
pub mod survey;
pub mod trajectory;

pub use error::{GeomError, Result};
pub use frame::{PlanarCoord, ReferenceFrame, Side, SideTable};
pub use lmr::{BaseCoordinates, CoordinateTransformer, VALIDATION_TOLERANCE};
pub use survey::{SurveyPoint, SurveyReference};
pub use trajectory::{DepthSample, TrajectoryBuilder, TrajectoryPoint};

/// A polyline needs at least this many vertices.
pub const MIN_POLYLINE_POINTS: usize = 2;
