//! drillvtk CLI - drilling log to VTK trajectory conversion
//!
//! Resolves survey points, prints collar coordinates, converts log CSV files
//! and inspects written VTK files.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

use drillvtk::{
    convert_files, generate_file_name, read_preview, sort_by_side, CoordinateTransformer,
    ParseOutcome, Settings, Side, SurveyPoint,
};

#[derive(Parser)]
#[command(name = "drillvtk")]
#[command(about = "Convert borehole drilling logs into VTK trajectories", long_about = None)]
struct Cli {
    /// Settings file (TOML); built-in tunnel constants when absent
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the distance from the tunnel entrance for a survey point
    Distance {
        /// Survey point, e.g. 241+10
        point: String,
    },
    /// Print L/M/R collar coordinates for a distance or survey point
    Coords {
        /// Distance from the entrance (m) or survey point (e.g. 241+10)
        at: String,
        /// Heading override (degrees)
        #[arg(long)]
        angle: Option<f64>,
        /// Reference distance override (m)
        #[arg(long)]
        reference_distance: Option<f64>,
    },
    /// Convert drilling log CSV files to VTK and companion CSV
    Convert {
        /// Input CSV files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Distance from the entrance (m)
        #[arg(long, conflicts_with = "survey", required_unless_present = "survey")]
        distance: Option<f64>,
        /// Survey point of the face, e.g. 241+10
        #[arg(long)]
        survey: Option<String>,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
        /// Force the side (L, M or R) instead of detecting it from file names
        #[arg(long, value_parser = parse_side)]
        side: Option<Side>,
        /// Heading override (degrees)
        #[arg(long)]
        angle: Option<f64>,
        /// Reference distance override (m)
        #[arg(long)]
        reference_distance: Option<f64>,
    },
    /// Summarize a VTK file
    Inspect {
        /// VTK file to read
        file: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the standard VTK file name for each input name
    Name {
        /// Input CSV names
        #[arg(required = true)]
        inputs: Vec<String>,
    },
    /// Show effective settings
    Config {
        /// Print settings as TOML
        #[arg(long)]
        dump: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };

    match cli.command {
        Commands::Distance { point } => {
            let point = SurveyPoint::parse(&point)?;
            let distance = settings.frame.survey.distance_from_entrance(&point);
            println!("{}: {} m from entrance", point, distance);
        }
        Commands::Coords {
            at,
            angle,
            reference_distance,
        } => {
            show_coords(&settings, &at, angle, reference_distance)?;
        }
        Commands::Convert {
            inputs,
            distance,
            survey,
            out,
            side,
            angle,
            reference_distance,
        } => {
            let distance = match (distance, survey) {
                (Some(d), _) => d,
                (None, Some(s)) => settings.frame.survey.locate(&s)?,
                (None, None) => bail!("either --distance or --survey is required"),
            };
            let settings = with_overrides(settings, angle, reference_distance);
            convert(&inputs, distance, &settings, &out, side)?;
        }
        Commands::Inspect { file, json } => {
            inspect(&file, json)?;
        }
        Commands::Name { inputs } => {
            let mut inputs = inputs;
            sort_by_side(&mut inputs);
            for input in &inputs {
                println!("{} -> {}", input, generate_file_name(input));
            }
        }
        Commands::Config { dump } => {
            if dump {
                print!("{}", settings.to_toml_string()?);
            } else {
                match &cli.config {
                    Some(path) => println!("settings: {}", path.display()),
                    None => println!("settings: built-in defaults (use --dump to print)"),
                }
            }
        }
    }

    Ok(())
}

/// Initialize logging to stderr. `RUST_LOG` overrides the default filter.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "info,drillvtk=debug,drillvtk_vtk=debug,drillvtk_geom=debug"
    } else {
        "warn,drillvtk=info,drillvtk_vtk=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_side(s: &str) -> std::result::Result<Side, String> {
    Side::from_letter(s).ok_or_else(|| format!("expected L, M or R, got '{}'", s))
}

fn with_overrides(
    mut settings: Settings,
    angle: Option<f64>,
    reference_distance: Option<f64>,
) -> Settings {
    if let Some(angle) = angle {
        settings.frame = settings.frame.with_direction_angle(angle);
    }
    if let Some(d) = reference_distance {
        settings.frame = settings.frame.with_reference_distance(d);
    }
    settings
}

fn show_coords(
    settings: &Settings,
    at: &str,
    angle: Option<f64>,
    reference_distance: Option<f64>,
) -> Result<()> {
    let distance = if at.contains('+') {
        settings.frame.survey.locate(at)?
    } else {
        at.parse::<f64>()
            .with_context(|| format!("'{}' is neither a distance nor a survey point", at))?
    };

    let frame = &settings.frame;
    let coords = CoordinateTransformer::new(frame).calculate_with(
        distance,
        angle.unwrap_or(frame.direction_angle_deg),
        reference_distance.unwrap_or(frame.reference_distance),
    );

    println!("Distance from entrance: {} m", distance);
    println!("Heading: {} deg", coords.direction_angle_deg);
    for side in Side::ALL {
        let c = coords.get(side);
        println!(
            "  {}: X = {:.3}  Y = {:.3}  Z = {}",
            side,
            c.x,
            c.y,
            frame.elevation_of(side)
        );
    }
    Ok(())
}

fn convert(
    inputs: &[PathBuf],
    distance: f64,
    settings: &Settings,
    out: &Path,
    side: Option<Side>,
) -> Result<()> {
    std::fs::create_dir_all(out)
        .with_context(|| format!("cannot create output directory {}", out.display()))?;

    tracing::debug!(distance, inputs = inputs.len(), out = %out.display(), "starting batch");
    let report = convert_files(inputs, distance, settings, out, side);
    for entry in &report.entries {
        let side = entry.side.map_or('?', Side::letter);
        match &entry.result {
            Ok(output) => println!(
                "ok    [{}] {} -> {} ({} points)",
                side,
                entry.name,
                output.vtk_path.display(),
                output.points
            ),
            Err(e) => println!("error [{}] {}: {}", side, entry.name, e),
        }
    }
    println!(
        "{} converted, {} failed",
        report.success_count(),
        report.failure_count()
    );

    if report.success_count() == 0 {
        bail!("no input converted");
    }
    Ok(())
}

fn inspect(file: &Path, json: bool) -> Result<()> {
    let preview = match read_preview(file) {
        ParseOutcome::Parsed(p) => p,
        ParseOutcome::Failed(reason) => bail!("cannot preview {}: {}", file.display(), reason),
    };
    let summary = &preview.summary;

    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!("VTK file: {}", file.display());
    println!("  Points: {}", summary.num_points);
    println!("  Lines: {}", summary.num_lines);
    if summary.scalar_names.is_empty() {
        println!("  Scalars: none");
    } else {
        println!("  Scalars: {}", summary.scalar_names.join(", "));
    }
    if let Some((name, values)) = &preview.scalars {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !values.is_empty() {
            println!("  {} range: {} .. {}", name, min, max);
        }
    }
    if let Some(b) = &summary.bounds {
        println!("\nBounds:");
        println!("  X: {:.3} .. {:.3}", b.x[0], b.x[1]);
        println!("  Y: {:.3} .. {:.3}", b.y[0], b.y[1]);
        println!("  Z: {:.3} .. {:.3}", b.z[0], b.z[1]);
    }
    Ok(())
}
