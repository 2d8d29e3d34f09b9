//! Library-free reader for legacy ASCII PolyData, used for previews.
//!
//! The reader is a token-driven state machine:
//!
//! ```text
//! SeekPoints -> ReadPoints -> SeekLines -> ReadLines -> SeekScalars -> ReadScalars -> Done
//! ```
//!
//! Keywords are matched case-insensitively and values may be packed on one
//! line or spread over many. Unrecognized tokens between blocks are skipped.
//! Malformed input produces [`ParseOutcome::Failed`] rather than an error, so
//! a preview can show the reason next to the file.

use std::path::Path;

use serde::Serialize;

use crate::scanner::{Scanner, Token};

/// Geometry and scalars recovered from a VTK file.
#[derive(Debug, Clone, PartialEq)]
pub struct VtkPreview {
    /// Point coordinates in file order.
    pub points: Vec<[f64; 3]>,
    /// Polylines as lists of point indices.
    pub lines: Vec<Vec<usize>>,
    /// First point scalar array, if any.
    pub scalars: Option<(String, Vec<f64>)>,
    /// Counts and extents.
    pub summary: PreviewSummary,
}

/// Axis-aligned extent of the points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    /// `[min, max]` along x.
    pub x: [f64; 2],
    /// `[min, max]` along y.
    pub y: [f64; 2],
    /// `[min, max]` along z.
    pub z: [f64; 2],
}

impl Bounds {
    /// Bounds of `points`, or `None` when empty.
    pub fn of(points: &[[f64; 3]]) -> Option<Self> {
        let first = points.first()?;
        let mut b = Bounds {
            x: [first[0]; 2],
            y: [first[1]; 2],
            z: [first[2]; 2],
        };
        for p in &points[1..] {
            for (axis, &v) in [&mut b.x, &mut b.y, &mut b.z].into_iter().zip(p) {
                axis[0] = axis[0].min(v);
                axis[1] = axis[1].max(v);
            }
        }
        Some(b)
    }
}

/// Summary shown alongside a preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewSummary {
    /// Number of points.
    pub num_points: usize,
    /// Number of polylines.
    pub num_lines: usize,
    /// Names of all point scalar arrays, in file order.
    pub scalar_names: Vec<String>,
    /// Extent of the points.
    pub bounds: Option<Bounds>,
}

/// Result of parsing; failures carry a human-readable reason.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// The file was understood.
    Parsed(VtkPreview),
    /// The file could not be read or was malformed.
    Failed(String),
}

impl ParseOutcome {
    /// Whether parsing succeeded.
    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }

    /// The preview, if parsing succeeded.
    pub fn into_preview(self) -> Option<VtkPreview> {
        match self {
            Self::Parsed(p) => Some(p),
            Self::Failed(_) => None,
        }
    }

    /// The failure reason, if parsing failed.
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Parsed(_) => None,
            Self::Failed(reason) => Some(reason),
        }
    }
}

/// Attribute section a SCALARS block belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Point(usize),
    Cell(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    SeekPoints,
    ReadPoints { remaining: usize },
    SeekLines,
    ReadLines { remaining: usize },
    SeekScalars,
    ReadScalars { remaining: usize, capture: bool },
    Done,
}

type Step<T> = std::result::Result<T, String>;

/// Upper bound on up-front allocation from a declared count.
const RESERVE_LIMIT: usize = 1 << 20;

/// Streaming parser over one file's text.
pub struct VtkReader<'a> {
    scanner: Scanner<'a>,
    state: State,
    points: Vec<[f64; 3]>,
    coords: Vec<f64>,
    connectivity: Vec<usize>,
    section: Option<Section>,
    scalar_names: Vec<String>,
    scalars: Option<(String, Vec<f64>)>,
    current_values: Vec<f64>,
}

impl<'a> VtkReader<'a> {
    /// Reader over `text`. A `# vtk` header and the title line after it are
    /// skipped so titles may contain keywords.
    pub fn new(text: &'a str) -> Self {
        let text = text.trim_start_matches('\u{feff}');
        let mut scanner = Scanner::new(text);
        if text.starts_with("# vtk") {
            scanner.skip_line();
            scanner.skip_line();
        }
        Self {
            scanner,
            state: State::SeekPoints,
            points: Vec::new(),
            coords: Vec::new(),
            connectivity: Vec::new(),
            section: None,
            scalar_names: Vec::new(),
            scalars: None,
            current_values: Vec::new(),
        }
    }

    /// Consume the input and produce an outcome.
    pub fn run(mut self) -> ParseOutcome {
        let lines = self.drive().and_then(|()| self.cells());
        match lines {
            Ok(lines) => ParseOutcome::Parsed(self.finish(lines)),
            Err(reason) => ParseOutcome::Failed(reason),
        }
    }

    fn drive(&mut self) -> Step<()> {
        while self.state != State::Done {
            self.state = match self.scanner.next_token() {
                Some(token) => self.step(token)?,
                None => self.end_of_input()?,
            };
        }
        Ok(())
    }

    fn step(&mut self, token: Token<'a>) -> Step<State> {
        match self.state {
            State::SeekPoints => {
                if !token.is_keyword("POINTS") {
                    return Ok(State::SeekPoints);
                }
                let n = self.count("POINTS")?;
                let values = n
                    .checked_mul(3)
                    .ok_or_else(|| format!("POINTS count {} too large", n))?;
                // Data type token (float, double, ...).
                self.expect_any("POINTS")?;
                self.points.reserve(n.min(RESERVE_LIMIT));
                Ok(Self::after_points(values))
            }
            State::ReadPoints { remaining } => {
                self.coords.push(parse_float(token)?);
                if self.coords.len() == 3 {
                    self.points.push([self.coords[0], self.coords[1], self.coords[2]]);
                    self.coords.clear();
                }
                Ok(Self::after_points(remaining - 1))
            }
            State::SeekLines => {
                if token.is_keyword("LINES") {
                    // Cell count is implied by the connectivity list.
                    self.count("LINES")?;
                    let size = self.count("LINES")?;
                    return Ok(Self::after_lines(size));
                }
                self.seek_scalars(token)
            }
            State::ReadLines { remaining } => {
                self.connectivity.push(parse_index(token)?);
                Ok(Self::after_lines(remaining - 1))
            }
            State::SeekScalars => self.seek_scalars(token),
            State::ReadScalars { remaining, capture } => {
                let value = parse_float(token)?;
                if capture {
                    self.current_values.push(value);
                }
                Ok(self.after_scalars(remaining - 1, capture))
            }
            State::Done => Ok(State::Done),
        }
    }

    fn after_points(remaining: usize) -> State {
        if remaining == 0 {
            State::SeekLines
        } else {
            State::ReadPoints { remaining }
        }
    }

    fn after_lines(remaining: usize) -> State {
        if remaining == 0 {
            State::SeekScalars
        } else {
            State::ReadLines { remaining }
        }
    }

    fn after_scalars(&mut self, remaining: usize, capture: bool) -> State {
        if remaining > 0 {
            return State::ReadScalars { remaining, capture };
        }
        if capture && self.scalars.is_none() {
            if let Some(name) = self.scalar_names.last() {
                self.scalars = Some((name.clone(), std::mem::take(&mut self.current_values)));
            }
        }
        self.current_values.clear();
        State::SeekScalars
    }

    fn seek_scalars(&mut self, token: Token<'a>) -> Step<State> {
        if token.is_keyword("POINT_DATA") {
            self.section = Some(Section::Point(self.count("POINT_DATA")?));
        } else if token.is_keyword("CELL_DATA") {
            self.section = Some(Section::Cell(self.count("CELL_DATA")?));
        } else if token.is_keyword("SCALARS") {
            return self.scalars_header();
        }
        Ok(State::SeekScalars)
    }

    fn scalars_header(&mut self) -> Step<State> {
        let name = self.expect_any("SCALARS")?.text.to_string();
        self.expect_any("SCALARS")?;

        // Optional component count, then optional LOOKUP_TABLE <name>.
        let mut components = 1;
        let mut next = self.scanner.next_token();
        if let Some(tok) = next {
            if let Ok(n @ 1..=4) = tok.text.parse::<usize>() {
                components = n;
                next = self.scanner.next_token();
            }
        }

        let section = self.section.unwrap_or(Section::Point(self.points.len()));
        let (tuples, capture) = match section {
            Section::Point(n) => (n, true),
            Section::Cell(n) => (n, false),
        };
        let total = tuples
            .checked_mul(components)
            .ok_or_else(|| format!("SCALARS {} value count too large", name))?;
        if capture {
            self.scalar_names.push(name);
        }

        match next {
            Some(tok) if tok.is_keyword("LOOKUP_TABLE") => {
                self.expect_any("LOOKUP_TABLE")?;
                Ok(self.after_scalars(total, capture))
            }
            // No lookup table line: this token is already the first value.
            Some(tok) if total > 0 => {
                let value = parse_float(tok)?;
                if capture {
                    self.current_values.push(value);
                }
                Ok(self.after_scalars(total - 1, capture))
            }
            Some(tok) => {
                let state = self.after_scalars(0, capture);
                debug_assert_eq!(state, State::SeekScalars);
                self.seek_scalars(tok)
            }
            None => {
                if total > 0 {
                    Err(format!("truncated SCALARS block: expected {} value(s)", total))
                } else {
                    Ok(self.after_scalars(0, capture))
                }
            }
        }
    }

    fn end_of_input(&self) -> Step<State> {
        match self.state {
            State::SeekPoints => Err("missing POINTS keyword".to_string()),
            State::ReadPoints { remaining } => Err(format!(
                "truncated POINTS block: {} coordinate value(s) missing",
                remaining
            )),
            State::ReadLines { remaining, .. } => Err(format!(
                "truncated LINES block: {} index value(s) missing",
                remaining
            )),
            State::ReadScalars { remaining, .. } => Err(format!(
                "truncated SCALARS block: {} value(s) missing",
                remaining
            )),
            State::SeekLines | State::SeekScalars | State::Done => Ok(State::Done),
        }
    }

    fn expect_any(&mut self, block: &str) -> Step<Token<'a>> {
        self.scanner
            .next_token()
            .ok_or_else(|| format!("truncated {} header on line {}", block, self.scanner.line()))
    }

    fn count(&mut self, block: &str) -> Step<usize> {
        let token = self.expect_any(block)?;
        token
            .text
            .parse::<usize>()
            .map_err(|_| format!("invalid {} count '{}' on line {}", block, token.text, token.line))
    }

    /// Split the connectivity list into cells. Each cell's leading count is
    /// not an index; only the vertices after it must name existing points.
    fn cells(&self) -> Step<Vec<Vec<usize>>> {
        let cells = split_cells(&self.connectivity)?;
        let n = self.points.len();
        match cells.iter().flatten().find(|&&i| i >= n) {
            Some(&i) => Err(format!(
                "LINES references point {} but only {} point(s) exist",
                i, n
            )),
            None => Ok(cells),
        }
    }

    fn finish(self, lines: Vec<Vec<usize>>) -> VtkPreview {
        let summary = PreviewSummary {
            num_points: self.points.len(),
            num_lines: lines.len(),
            scalar_names: self.scalar_names,
            bounds: Bounds::of(&self.points),
        };
        VtkPreview {
            points: self.points,
            lines,
            scalars: self.scalars,
            summary,
        }
    }
}

/// Split a legacy connectivity list (`count i0 i1 ... count j0 ...`).
fn split_cells(connectivity: &[usize]) -> Step<Vec<Vec<usize>>> {
    let mut cells = Vec::new();
    let mut rest = connectivity;
    while let Some((&count, tail)) = rest.split_first() {
        if count > tail.len() {
            return Err(format!(
                "LINES cell declares {} vertices but only {} value(s) remain",
                count,
                tail.len()
            ));
        }
        cells.push(tail[..count].to_vec());
        rest = &tail[count..];
    }
    Ok(cells)
}

fn parse_float(token: Token<'_>) -> Step<f64> {
    token
        .text
        .parse::<f64>()
        .map_err(|_| format!("invalid number '{}' on line {}", token.text, token.line))
}

fn parse_index(token: Token<'_>) -> Step<usize> {
    token
        .text
        .parse::<usize>()
        .map_err(|_| format!("invalid index '{}' on line {}", token.text, token.line))
}

/// Parse legacy VTK text.
pub fn parse(text: &str) -> ParseOutcome {
    let outcome = VtkReader::new(text).run();
    if let ParseOutcome::Failed(reason) = &outcome {
        tracing::debug!(%reason, "VTK parse failed");
    }
    outcome
}

/// Read and parse the file at `path`. I/O and decoding errors become
/// [`ParseOutcome::Failed`].
pub fn read_preview(path: impl AsRef<Path>) -> ParseOutcome {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(text) => parse(&text),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "cannot read VTK file");
            ParseOutcome::Failed(format!("cannot read {}: {}", path.display(), e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::VtkDocument;
    use crate::writer::{PolyDataWriter, TextWriter};
    use approx::assert_abs_diff_eq;
    use drillvtk_geom::TrajectoryPoint;

    fn parsed(text: &str) -> VtkPreview {
        match parse(text) {
            ParseOutcome::Parsed(p) => p,
            ParseOutcome::Failed(reason) => panic!("parse failed: {reason}"),
        }
    }

    fn failed(text: &str) -> String {
        match parse(text) {
            ParseOutcome::Parsed(p) => panic!("expected failure, got {p:?}"),
            ParseOutcome::Failed(reason) => reason,
        }
    }

    #[test]
    fn test_round_trip_text_writer() {
        let doc = VtkDocument::new(vec![
            TrajectoryPoint::new(-907.462, 845.15, 17.3, 120.0),
            TrajectoryPoint::new(-907.917, 845.356, 17.3, 131.5),
            TrajectoryPoint::new(-908.372, 845.563, 17.3, 99.25),
            TrajectoryPoint::new(-908.828, 845.769, 17.3, 101.0),
        ]);
        let text = TextWriter.serialize(&doc).unwrap();
        let preview = parsed(&text);

        assert_eq!(preview.points.len(), 4);
        assert_eq!(preview.lines, vec![vec![0, 1, 2, 3]]);
        for (read, p) in preview.points.iter().zip(&doc.points) {
            assert_abs_diff_eq!(read[0], p.x(), epsilon = 1e-9);
            assert_abs_diff_eq!(read[1], p.y(), epsilon = 1e-9);
            assert_abs_diff_eq!(read[2], p.z(), epsilon = 1e-9);
        }
        let (name, values) = preview.scalars.unwrap();
        assert_eq!(name, "Energy");
        assert_eq!(values, vec![120.0, 131.5, 99.25, 101.0]);
    }

    #[test]
    fn test_packed_layout() {
        let text = "# vtk DataFile Version 3.0\nPOINTS in the title\nASCII\nDATASET POLYDATA\n\
                    POINTS 3 float\n0 0 0 1 0 0 2 0 0\n\nLINES 1 4\n3 0 1 2\n\n\
                    CELL_DATA 1\nPOINT_DATA 3\nSCALARS Energy float\nLOOKUP_TABLE default\n5 6 7\n";
        let preview = parsed(text);
        assert_eq!(preview.points, vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        assert_eq!(preview.lines, vec![vec![0, 1, 2]]);
        assert_eq!(preview.scalars, Some(("Energy".to_string(), vec![5.0, 6.0, 7.0])));
    }

    #[test]
    fn test_lowercase_keywords() {
        let text = "points 2 double\n0 0 0\n1 1 1\nlines 1 3\n2 0 1\n";
        let preview = parsed(text);
        assert_eq!(preview.summary.num_points, 2);
        assert_eq!(preview.summary.num_lines, 1);
        assert!(preview.scalars.is_none());
    }

    #[test]
    fn test_missing_points_fails() {
        let reason = failed("# vtk DataFile Version 3.0\ntitle\nASCII\nDATASET POLYDATA\n");
        assert!(reason.contains("POINTS"));
        assert!(!parse("").is_parsed());
    }

    #[test]
    fn test_truncated_points_fails() {
        let reason = failed("POINTS 3 float\n0 0 0\n1 1\n");
        assert!(reason.contains("truncated POINTS"));
        assert!(reason.contains('4'));
    }

    #[test]
    fn test_truncated_lines_fails() {
        let reason = failed("POINTS 2 float\n0 0 0 1 1 1\nLINES 1 3\n2 0\n");
        assert!(reason.contains("truncated LINES"));
    }

    #[test]
    fn test_truncated_scalars_fails() {
        let reason = failed(
            "POINTS 2 float\n0 0 0 1 1 1\nPOINT_DATA 2\n\
             SCALARS e float 1\nLOOKUP_TABLE default\n1\n",
        );
        assert!(reason.contains("truncated SCALARS"));
    }

    #[test]
    fn test_bad_number_reports_line() {
        let reason = failed("POINTS 1 float\n0 x 0\n");
        assert!(reason.contains("'x'"));
        assert!(reason.contains("line 2"));
    }

    #[test]
    fn test_lines_and_scalars_optional() {
        let preview = parsed("POINTS 1 float 4 5 6");
        assert_eq!(preview.points, vec![[4.0, 5.0, 6.0]]);
        assert!(preview.lines.is_empty());
        assert!(preview.scalars.is_none());
    }

    #[test]
    fn test_scalars_without_lines_or_lookup() {
        let preview = parsed("POINTS 2 float 0 0 0 1 1 1 POINT_DATA 2 SCALARS v float 1 8 9");
        assert_eq!(preview.scalars, Some(("v".to_string(), vec![8.0, 9.0])));
    }

    #[test]
    fn test_cell_scalars_skipped() {
        let text = "POINTS 2 float 0 0 0 1 1 1 LINES 1 3 2 0 1 \
                    CELL_DATA 1 SCALARS c float 1 LOOKUP_TABLE default 42 \
                    POINT_DATA 2 SCALARS p float 1 LOOKUP_TABLE default 3 4 \
                    SCALARS q float 1 LOOKUP_TABLE default 5 6";
        let preview = parsed(text);
        assert_eq!(preview.scalars, Some(("p".to_string(), vec![3.0, 4.0])));
        assert_eq!(preview.summary.scalar_names, vec!["p", "q"]);
    }

    #[test]
    fn test_out_of_range_index_fails() {
        let reason = failed("POINTS 2 float 0 0 0 1 1 1 LINES 1 3 2 0 5");
        assert!(reason.contains("point 5"));
    }

    #[test]
    fn test_polyline_over_every_point() {
        let preview = parsed("POINTS 3 float 0 0 0 1 0 0 2 0 0 LINES 1 4 3 0 1 2");
        assert_eq!(preview.lines, vec![vec![0, 1, 2]]);
        assert_eq!(preview.summary.num_lines, 1);
    }

    #[test]
    fn test_cell_longer_than_list_fails() {
        let reason = failed("POINTS 2 float 0 0 0 1 1 1 LINES 1 2 3 0");
        assert!(reason.contains("declares 3 vertices"));
    }

    #[test]
    fn test_huge_scalar_count_fails() {
        let reason = failed(
            "POINTS 1 float 0 0 0 POINT_DATA 18446744073709551615 \
             SCALARS v float 4 LOOKUP_TABLE default 1",
        );
        assert!(reason.contains("too large"));
    }

    #[test]
    fn test_multiple_lines() {
        let text = "POINTS 4 float 0 0 0 1 0 0 2 0 0 3 0 0 LINES 2 6 2 0 1 2 2 3";
        let preview = parsed(text);
        assert_eq!(preview.lines, vec![vec![0, 1], vec![2, 3]]);
        assert_eq!(preview.summary.num_lines, 2);
    }

    #[test]
    fn test_summary_bounds() {
        let preview = parsed("POINTS 3 float 1 -2 17.3 -4 5 17.3 0 0 21.3");
        let b = preview.summary.bounds.unwrap();
        assert_eq!(b.x, [-4.0, 1.0]);
        assert_eq!(b.y, [-2.0, 5.0]);
        assert_eq!(b.z, [17.3, 21.3]);
        assert!(parsed("POINTS 0 float").summary.bounds.is_none());
    }

    #[test]
    fn test_read_preview_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = read_preview(dir.path().join("nope.vtk"));
        assert!(outcome.failure().unwrap().contains("cannot read"));
    }

    #[test]
    fn test_read_preview_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let text = b"POINTS 2 float 0 0 0 1 1 1 LINES 1 3 2 0 1";
        std::io::Write::write_all(&mut file, text).unwrap();
        let preview = read_preview(file.path()).into_preview().unwrap();
        assert_eq!(preview.lines, vec![vec![0, 1]]);
    }
}
