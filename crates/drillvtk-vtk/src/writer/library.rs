//! Writer backed by the `vtkio` crate.
//!
//! The token stream matches [`super::TextWriter`], but the layout is the
//! library's own: blank lines separate sections and an empty `CELL_DATA`
//! section follows the lines. Readers that scan tokens, like
//! [`crate::reader`], see the same document either way.

use vtkio::model::{
    Attribute, Attributes, ByteOrder, DataArray, DataSet, ElementType, IOBuffer, PolyDataPiece,
    Version, VertexNumbers, Vtk,
};

use super::PolyDataWriter;
use crate::document::VtkDocument;
use crate::error::{Result, VtkError};

/// Builds a `vtkio` model and lets the library format it.
///
/// Values are stored single precision so the headers read `float`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibraryBackedWriter;

impl LibraryBackedWriter {
    fn model(document: &VtkDocument) -> Vtk {
        let n = document.len();

        let points: Vec<f32> = document
            .points
            .iter()
            .flat_map(|p| [p.x() as f32, p.y() as f32, p.z() as f32])
            .collect();

        let mut vertices = Vec::with_capacity(n + 1);
        vertices.push(n as u32);
        vertices.extend(document.connectivity().map(|i| i as u32));

        let scalars: Vec<f32> = document.points.iter().map(|p| p.scalar as f32).collect();

        Vtk {
            version: Version::new((3, 0)),
            byte_order: ByteOrder::BigEndian,
            title: document.title.clone(),
            file_path: None,
            data: DataSet::inline(PolyDataPiece {
                points: IOBuffer::F32(points),
                lines: Some(VertexNumbers::Legacy {
                    num_cells: 1,
                    vertices,
                }),
                data: Attributes {
                    point: vec![Attribute::DataArray(DataArray {
                        name: document.scalar_field.clone(),
                        elem: ElementType::Scalars {
                            num_comp: 1,
                            lookup_table: None,
                        },
                        data: IOBuffer::F32(scalars),
                    })],
                    cell: Vec::new(),
                },
                ..Default::default()
            }),
        }
    }
}

impl PolyDataWriter for LibraryBackedWriter {
    fn name(&self) -> &'static str {
        "vtkio"
    }

    fn serialize(&self, document: &VtkDocument) -> Result<String> {
        let mut out = String::new();
        Self::model(document)
            .write_legacy_ascii(&mut out)
            .map_err(|e| VtkError::Backend(format!("{e:?}")))?;
        Ok(out)
    }
}
