//! End-to-end conversions: log CSV in, VTK and companion CSV out, VTK read
//! back through the preview reader.

use std::fs;
use std::path::{Path, PathBuf};

use approx::assert_abs_diff_eq;
use drillvtk::{
    convert_files, generate_file_name, read_preview, sort_by_side, CoordinateTransformer,
    ParseOutcome, ReferenceFrame, Settings, Side, SurveyPoint,
};

fn write_log(dir: &Path, name: &str, rows: usize) -> PathBuf {
    let mut text = String::from("穿孔長,穿孔エネルギー,Lowess_Trend\n");
    for i in 0..rows {
        let depth = i as f64 * 0.5;
        text.push_str(&format!("{},{},{}\n", depth, 100.0 + i as f64, 110.0 + i as f64 * 2.0));
    }
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn test_survey_point_to_trajectory_file() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let log = write_log(input.path(), "2025_08_27_07_24_47_L.csv", 20);

    let settings = Settings::default();
    let point: SurveyPoint = "241+10".parse().unwrap();
    let distance = settings.frame.survey.distance_from_entrance(&point);
    assert_abs_diff_eq!(distance, 274.0);

    let report = convert_files(&[&log], distance, &settings, out.path(), None);
    assert_eq!(report.success_count(), 1);
    let written = report.outputs().next().unwrap();
    assert_eq!(written.vtk_path, out.path().join("Drill-L_ana_25.08.27.vtk"));

    let coords = CoordinateTransformer::new(&settings.frame).calculate(distance);
    let collar = coords.get(Side::Left);

    let preview = match read_preview(&written.vtk_path) {
        ParseOutcome::Parsed(p) => p,
        ParseOutcome::Failed(reason) => panic!("preview failed: {reason}"),
    };
    assert_eq!(preview.summary.num_points, 20);
    assert_eq!(preview.lines, vec![(0..20).collect::<Vec<_>>()]);
    assert_abs_diff_eq!(preview.points[0][0], collar.x, epsilon = 1e-3);
    assert_abs_diff_eq!(preview.points[0][1], collar.y, epsilon = 1e-3);
    for p in &preview.points {
        assert_abs_diff_eq!(p[2], 17.3, epsilon = 1e-3);
    }

    // Consecutive samples are 0.5 m apart along the hole.
    let [a, b] = [preview.points[0], preview.points[1]];
    let step = ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2)).sqrt();
    assert_abs_diff_eq!(step, 0.5, epsilon = 1e-3);

    let (name, values) = preview.scalars.unwrap();
    assert_eq!(name, "Energy");
    assert_abs_diff_eq!(values[3], 116.0, epsilon = 1e-3);

    let companion = fs::read_to_string(&written.csv_path).unwrap();
    let mut lines = companion.lines();
    assert_eq!(lines.next(), Some("\"# LMRタイプ: L, 坑口からの距離: 274.0m\""));
    assert_eq!(lines.next(), Some("X(m),Y(m),Z:標高(m),Energy"));
    assert_eq!(lines.count(), 20);
}

#[test]
fn test_batch_of_three_with_one_short_file() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let mut names: Vec<String> = [
        write_log(input.path(), "2025_08_27_07_24_47_R.csv", 12),
        write_log(input.path(), "2025_08_27_07_24_47_L.csv", 12),
        write_log(input.path(), "2025_08_27_07_24_47_M.csv", 1),
    ]
    .iter()
    .map(|p| p.to_string_lossy().into_owned())
    .collect();
    sort_by_side(&mut names);
    let files: Vec<PathBuf> = names.into_iter().map(PathBuf::from).collect();

    let report = convert_files(&files, 1238.0, &Settings::default(), out.path(), None);
    assert_eq!(report.entries.len(), 3);
    assert_eq!(report.success_count(), 2);
    assert_eq!(report.failure_count(), 1);

    let sides: Vec<_> = report.entries.iter().map(|e| e.side).collect();
    assert_eq!(sides, vec![Some(Side::Left), Some(Side::Middle), Some(Side::Right)]);
    assert!(!report.entries[1].is_success());
    assert!(out.path().join("Drill-L_ana_25.08.27.vtk").exists());
    assert!(out.path().join("Drill-R_ana_25.08.27.vtk").exists());
    assert!(!out.path().join("Drill-M_ana_25.08.27.vtk").exists());
}

#[test]
fn test_sides_use_their_own_elevation() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let files: Vec<_> = ["a_L.csv", "a_M.csv", "a_R.csv"]
        .iter()
        .map(|n| write_log(input.path(), n, 4))
        .collect();
    let frame = ReferenceFrame::default();
    let settings = Settings {
        frame: frame.clone(),
        ..Settings::default()
    };

    let report = convert_files(&files, 1238.0, &settings, out.path(), None);
    assert_eq!(report.success_count(), 3);
    for (entry, side) in report.entries.iter().zip(Side::ALL) {
        let output = entry.result.as_ref().unwrap();
        let preview = read_preview(&output.vtk_path).into_preview().unwrap();
        assert_abs_diff_eq!(preview.points[0][2], frame.elevation_of(side), epsilon = 1e-3);
        assert_eq!(entry.side, Some(side));
    }
}

#[test]
fn test_file_names() {
    assert_eq!(generate_file_name("2025_08_27_07_24_47_L.csv"), "Drill-L_ana_25.08.27.vtk");
    assert_eq!(generate_file_name("L_processed"), "Drill-L_ana_00.00.00.vtk");
}
