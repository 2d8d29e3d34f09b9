//! Hand-written legacy ASCII emitter with no external dependencies.

use std::fmt::Write;

use super::PolyDataWriter;
use crate::document::VtkDocument;
use crate::error::{Result, VtkError};

/// Emits the legacy grammar directly, one coordinate triple and one scalar
/// per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextWriter;

impl TextWriter {
    fn emit(document: &VtkDocument, out: &mut String) -> std::fmt::Result {
        let n = document.len();

        writeln!(out, "# vtk DataFile Version 3.0")?;
        writeln!(out, "{}", document.title)?;
        writeln!(out, "ASCII")?;
        writeln!(out, "DATASET POLYDATA")?;

        writeln!(out, "POINTS {} float", n)?;
        for p in &document.points {
            writeln!(out, "{} {} {}", p.x(), p.y(), p.z())?;
        }

        writeln!(out, "LINES 1 {}", n + 1)?;
        write!(out, "{}", n)?;
        for i in document.connectivity() {
            write!(out, " {}", i)?;
        }
        writeln!(out)?;

        writeln!(out, "POINT_DATA {}", n)?;
        writeln!(out, "SCALARS {} float 1", document.scalar_field)?;
        writeln!(out, "LOOKUP_TABLE default")?;
        for p in &document.points {
            writeln!(out, "{}", p.scalar)?;
        }
        Ok(())
    }
}

impl PolyDataWriter for TextWriter {
    fn name(&self) -> &'static str {
        "text"
    }

    fn serialize(&self, document: &VtkDocument) -> Result<String> {
        // Roughly 40 bytes per point line plus the scalar block.
        let mut out = String::with_capacity(128 + document.len() * 48);
        Self::emit(document, &mut out).map_err(|e| VtkError::Backend(e.to_string()))?;
        Ok(out)
    }
}
