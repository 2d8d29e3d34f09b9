//! Legacy VTK ASCII PolyData writers.
//!
//! Both backends emit the same token grammar (the library backend adds blank
//! lines and an empty `CELL_DATA` section):
//!
//! ```text
//! # vtk DataFile Version 3.0
//! <title>
//! ASCII
//! DATASET POLYDATA
//! POINTS <n> float
//! <x> <y> <z>            (n lines)
//! LINES 1 <n+1>
//! <n> 0 1 2 ... <n-1>
//! POINT_DATA <n>
//! SCALARS <name> float 1
//! LOOKUP_TABLE default
//! <scalar>               (n lines)
//! ```
//!
//! [`VtkWriter::new`] picks the library backend when the `vtkio` feature is
//! compiled in and the text backend otherwise. Callers never see which one ran.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::document::VtkDocument;
use crate::error::Result;

#[cfg(feature = "vtkio")]
mod library;
mod text;

#[cfg(feature = "vtkio")]
pub use library::LibraryBackedWriter;
pub use text::TextWriter;

/// A serializer for [`VtkDocument`]s.
///
/// Implementations receive documents that already passed
/// [`VtkDocument::validate`].
pub trait PolyDataWriter: Send + Sync {
    /// Short backend name for diagnostics.
    fn name(&self) -> &'static str;

    /// Serialize `document` to legacy ASCII text.
    fn serialize(&self, document: &VtkDocument) -> Result<String>;
}

/// Whether a library-backed writer was compiled in.
pub fn library_available() -> bool {
    cfg!(feature = "vtkio")
}

#[cfg(feature = "vtkio")]
fn probe() -> Box<dyn PolyDataWriter> {
    Box::new(LibraryBackedWriter)
}

#[cfg(not(feature = "vtkio"))]
fn probe() -> Box<dyn PolyDataWriter> {
    Box::new(TextWriter)
}

/// Writes trajectory documents as legacy VTK files.
pub struct VtkWriter {
    backend: Box<dyn PolyDataWriter>,
}

impl Default for VtkWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VtkWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VtkWriter")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl VtkWriter {
    /// Writer using the best backend available in this build.
    pub fn new() -> Self {
        let backend = probe();
        tracing::debug!(backend = backend.name(), "selected VTK writer backend");
        Self { backend }
    }

    /// Writer using the built-in text emitter regardless of features.
    pub fn text() -> Self {
        Self::with_backend(Box::new(TextWriter))
    }

    /// Writer using a caller-supplied backend.
    pub fn with_backend(backend: Box<dyn PolyDataWriter>) -> Self {
        Self { backend }
    }

    /// Name of the active backend.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Serialize `document` in memory.
    pub fn to_bytes(&self, document: &VtkDocument) -> Result<Vec<u8>> {
        document.validate()?;
        Ok(self.backend.serialize(document)?.into_bytes())
    }

    /// Serialize `document` into `out`.
    pub fn write_to(&self, document: &VtkDocument, out: &mut impl Write) -> Result<()> {
        let bytes = self.to_bytes(document)?;
        out.write_all(&bytes)?;
        Ok(())
    }

    /// Serialize `document` to the file at `path`, replacing it if present.
    ///
    /// Nothing is created when the document is invalid.
    pub fn write(&self, document: &VtkDocument, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.to_bytes(document)?;
        fs::write(path.as_ref(), bytes)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            points = document.len(),
            backend = self.backend.name(),
            "wrote VTK file"
        );
        Ok(())
    }
}
