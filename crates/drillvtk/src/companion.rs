//! Companion CSV written next to each VTK file.
//!
//! ```text
//! "# LMRタイプ: L, 坑口からの距離: 1238.0m"
//! X(m),Y(m),Z:標高(m),Energy
//! -907.462,845.15,17.3,120.0
//! ```
//!
//! The comment row is a single quoted field because it contains a comma.
//! Numbers always carry a fractional part so spreadsheet imports keep them as
//! decimals.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use drillvtk_geom::{Side, TrajectoryPoint};

/// Format `v` the way the legacy tables do: integral values keep one decimal
/// place (`1238.0`), others print shortest round-trip form.
pub fn format_decimal(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

/// Quote a field when it holds a separator, quote or line break.
fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Write the companion table for `points` to `writer`.
pub fn write_companion<W: Write>(
    writer: &mut W,
    points: &[TrajectoryPoint],
    side: Side,
    distance: f64,
    scalar_field: &str,
) -> std::io::Result<()> {
    let comment = format!(
        "# LMRタイプ: {}, 坑口からの距離: {}m",
        side,
        format_decimal(distance)
    );
    writeln!(writer, "{}", quote(&comment))?;
    writeln!(writer, "X(m),Y(m),Z:標高(m),{}", quote(scalar_field))?;
    for p in points {
        writeln!(
            writer,
            "{},{},{},{}",
            format_decimal(p.x()),
            format_decimal(p.y()),
            format_decimal(p.z()),
            format_decimal(p.scalar)
        )?;
    }
    Ok(())
}

/// Write the companion table to `path`, replacing any existing file.
pub fn save_companion(
    path: impl AsRef<Path>,
    points: &[TrajectoryPoint],
    side: Side,
    distance: f64,
    scalar_field: &str,
) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_companion(&mut writer, points, side, distance, scalar_field)?;
    writer.flush()
}
