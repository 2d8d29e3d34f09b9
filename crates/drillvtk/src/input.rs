//! Depth series loaded from drilling-log CSV exports.

use std::fs;
use std::path::Path;

use drillvtk_geom::DepthSample;

use crate::error::{ConvertError, Result};

/// An ordered `(depth, value)` series taken from two columns of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthSeries {
    /// Header of the column depths were read from.
    pub depth_column: String,
    /// Header of the column values were read from.
    pub value_column: String,
    /// Samples in file order.
    pub samples: Vec<DepthSample>,
    /// Data rows dropped because a cell was empty or not a finite number.
    pub skipped: usize,
}

impl DepthSeries {
    /// Parse CSV text whose first non-blank line is the header.
    ///
    /// Columns are found by exact header match, falling back to the first
    /// header containing the configured name.
    pub fn from_csv_str(text: &str, depth_column: &str, value_column: &str) -> Result<Self> {
        let text = text.trim_start_matches('\u{feff}');
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());

        let header = match lines.next() {
            Some(line) => split_record(line),
            None => return Err(ConvertError::missing_column(depth_column)),
        };
        let depth_idx = find_column(&header, depth_column)?;
        let value_idx = find_column(&header, value_column)?;

        let mut samples = Vec::new();
        let mut skipped = 0;
        for line in lines {
            let fields = split_record(line);
            let parsed = (
                fields.get(depth_idx).and_then(|s| parse_cell(s)),
                fields.get(value_idx).and_then(|s| parse_cell(s)),
            );
            match parsed {
                (Some(depth), Some(value)) => samples.push(DepthSample::new(depth, value)),
                _ => skipped += 1,
            }
        }

        Ok(Self {
            depth_column: header[depth_idx].clone(),
            value_column: header[value_idx].clone(),
            samples,
            skipped,
        })
    }

    /// Read and parse a UTF-8 CSV file.
    pub fn read(path: impl AsRef<Path>, depth_column: &str, value_column: &str) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let series = Self::from_csv_str(&text, depth_column, value_column)?;
        if series.skipped > 0 {
            tracing::debug!(
                path = %path.as_ref().display(),
                skipped = series.skipped,
                "dropped rows without numeric depth and value"
            );
        }
        Ok(series)
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no rows survived parsing.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

fn find_column(header: &[String], name: &str) -> Result<usize> {
    header
        .iter()
        .position(|h| h == name)
        .or_else(|| header.iter().position(|h| h.contains(name)))
        .ok_or_else(|| ConvertError::missing_column(name))
}

fn parse_cell(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Split one CSV record, honouring double-quoted fields. Fields are trimmed.
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            ('"', _) => in_quotes = !in_quotes,
            (',', false) => fields.push(std::mem::take(&mut field).trim().to_string()),
            _ => field.push(c),
        }
    }
    fields.push(field.trim().to_string());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LOG: &str = "\
穿孔長,穿孔エネルギー,Lowess_Trend
0.0,118.2,120.0
0.5,133.0,131.5
1.0,,99.25
1.5,101.0,101.0
";

    #[test]
    fn test_exact_columns() {
        let series = DepthSeries::from_csv_str(LOG, "穿孔長", "Lowess_Trend").unwrap();
        assert_eq!(series.len(), 4);
        assert_eq!(series.samples[1], DepthSample::new(0.5, 131.5));
        assert_eq!(series.skipped, 0);
    }

    #[test]
    fn test_skips_unparsable_rows() {
        let series = DepthSeries::from_csv_str(LOG, "穿孔長", "穿孔エネルギー").unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.skipped, 1);
        let depths: Vec<f64> = series.samples.iter().map(|s| s.depth).collect();
        assert_eq!(depths, vec![0.0, 0.5, 1.5]);
    }

    #[test]
    fn test_contains_fallback() {
        let text = "x:穿孔長(m),Energy Lowess_Trend (smoothed)\n0,1\n0.5,2\n";
        let series = DepthSeries::from_csv_str(text, "穿孔長", "Lowess_Trend").unwrap();
        assert_eq!(series.depth_column, "x:穿孔長(m)");
        assert_eq!(series.value_column, "Energy Lowess_Trend (smoothed)");
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_exact_match_preferred() {
        let text = "Lowess_Trend_raw,Lowess_Trend,depth\n1,2,0\n";
        let series = DepthSeries::from_csv_str(text, "depth", "Lowess_Trend").unwrap();
        assert_eq!(series.samples, vec![DepthSample::new(0.0, 2.0)]);
    }

    #[test]
    fn test_missing_column() {
        let err = DepthSeries::from_csv_str(LOG, "穿孔長", "Ene-L").unwrap_err();
        assert!(matches!(err, ConvertError::MissingColumn { ref column } if column == "Ene-L"));
        assert!(DepthSeries::from_csv_str("", "a", "b").is_err());
    }

    #[test]
    fn test_quoted_fields_and_bom() {
        let text = "\u{feff}\"depth\",\"note, free text\",value\n\"0.5\",\"a, \"\"b\"\"\",7\n";
        let series = DepthSeries::from_csv_str(text, "depth", "value").unwrap();
        assert_eq!(series.samples, vec![DepthSample::new(0.5, 7.0)]);
        assert_eq!(split_record("\"a, \"\"b\"\"\",7"), vec!["a, \"b\"", "7"]);
    }

    #[test]
    fn test_nan_cells_skipped() {
        let text = "d,v\n0,NaN\n1,inf\n2,3\n";
        let series = DepthSeries::from_csv_str(text, "d", "v").unwrap();
        assert_eq!(series.samples, vec![DepthSample::new(2.0, 3.0)]);
        assert_eq!(series.skipped, 2);
    }

    #[test]
    fn test_read_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(LOG.as_bytes()).unwrap();
        let series = DepthSeries::read(file.path(), "穿孔長", "Lowess_Trend").unwrap();
        assert_eq!(series.len(), 4);
    }
}
