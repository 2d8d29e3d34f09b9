#![warn(missing_docs)]

//! Legacy VTK ASCII PolyData output and preview parsing for drillvtk.
//!
//! A [`VtkDocument`] holds an ordered trajectory; [`VtkWriter`] serializes it
//! as a single polyline with one point scalar array, and [`parse`] /
//! [`read_preview`] recover the geometry without any graphics library.
//!
//! # Example
//!
//! ```
//! use drillvtk_geom::TrajectoryPoint;
//! use drillvtk_vtk::{parse, VtkDocument, VtkWriter};
//!
//! let doc = VtkDocument::new(vec![
//!     TrajectoryPoint::new(0.0, 0.0, 17.3, 120.0),
//!     TrajectoryPoint::new(-0.91, 0.41, 17.3, 131.5),
//! ]);
//! let bytes = VtkWriter::new().to_bytes(&doc).unwrap();
//! let text = String::from_utf8(bytes).unwrap();
//!
//! let preview = parse(&text).into_preview().unwrap();
//! assert_eq!(preview.summary.num_points, 2);
//! assert_eq!(preview.lines, vec![vec![0, 1]]);
//! ```

pub mod document;
pub mod error;
pub mod reader;
pub mod scanner;
pub mod writer;

pub use document::{VtkDocument, DEFAULT_SCALAR_FIELD, DEFAULT_TITLE};
pub use error::{Result, VtkError};
pub use reader::{parse, read_preview, Bounds, ParseOutcome, PreviewSummary, VtkPreview, VtkReader};
#[cfg(feature = "vtkio")]
pub use writer::LibraryBackedWriter;
pub use writer::{library_available, PolyDataWriter, TextWriter, VtkWriter};
