//! Side detection and output file names derived from input names.
//!
//! Logger exports are named like `2025_08_27_07_24_47_L.csv`: a timestamp
//! split by underscores followed by the side letter.

use std::path::Path;

use drillvtk_geom::Side;

/// Placeholder date when the name carries none.
const NO_DATE: &str = "00.00.00";

/// File stem of `name` (directory and extension removed).
fn stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}

/// Detect the borehole side from a file name.
///
/// The stem is split on `_`, then on `-`; the first token that is a bare
/// `L`, `M` or `R` (any case) wins. Infix forms such as `_L_` and suffix
/// forms such as `-R` are covered by the same token split.
pub fn detect_side(file_name: &str) -> Option<Side> {
    let stem = stem(file_name);
    ['_', '-']
        .iter()
        .find_map(|&sep| stem.split(sep).find_map(Side::from_letter))
}

/// `YY.MM.DD` from the first three `_` tokens of the stem when they form a
/// 4-digit year, a month in 1..=12 and a day in 1..=31.
fn date_tag(stem: &str) -> Option<String> {
    let mut parts = stem.split('_');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if year.len() != 4 || !all_digits(year) || !all_digits(month) || !all_digits(day) {
        return None;
    }
    let m: u32 = month.parse().ok()?;
    let d: u32 = day.parse().ok()?;
    if !(1..=12).contains(&m) || !(1..=31).contains(&d) {
        return None;
    }
    Some(format!("{}.{:0>2}.{:0>2}", &year[2..], month, day))
}

/// Standard VTK output name for an input file:
/// `Drill-<side>_ana_<YY.MM.DD>.vtk`, side `X` when undetectable and date
/// `00.00.00` when the name carries none.
pub fn generate_file_name(csv_name: &str) -> String {
    let side = detect_side(csv_name).map_or('X', Side::letter);
    let date = date_tag(stem(csv_name)).unwrap_or_else(|| NO_DATE.to_string());
    format!("Drill-{}_ana_{}.vtk", side, date)
}

/// Companion CSV name for an input file: `<stem>_3d.csv`.
pub fn companion_file_name(csv_name: &str) -> String {
    format!("{}_3d.csv", stem(csv_name))
}

fn side_rank(name: &str) -> u8 {
    let upper = name.to_uppercase();
    Side::ALL
        .iter()
        .position(|side| {
            let letter = side.letter();
            upper.contains(&format!("_{}_", letter)) || upper.ends_with(&format!("_{}.CSV", letter))
        })
        .map_or(3, |i| i as u8)
}

/// Sort names L, M, R, then everything else; by name within each group.
pub fn sort_by_side<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by(|a, b| {
        let (a, b) = (a.as_ref(), b.as_ref());
        side_rank(a).cmp(&side_rank(b)).then_with(|| a.cmp(b))
    });
}
