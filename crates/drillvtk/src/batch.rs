//! Parallel conversion of many inputs with per-input outcomes.
//!
//! A failing input never stops the batch. Entries come back in input order.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use drillvtk_geom::{DepthSample, ReferenceFrame, Side};

use crate::config::Settings;
use crate::error::{ConvertError, Result};
use crate::input::DepthSeries;
use crate::naming::{companion_file_name, detect_side, generate_file_name};
use crate::{convert, ConversionOutput, ConvertOptions};

/// One in-memory conversion request.
#[derive(Debug, Clone)]
pub struct BatchJob {
    /// Display name, usually the input file name.
    pub name: String,
    /// Depth-ordered samples.
    pub samples: Vec<DepthSample>,
    /// Side to convert for; `None` fails the job with
    /// [`ConvertError::UnknownSide`].
    pub side: Option<Side>,
    /// Output paths and naming.
    pub options: ConvertOptions,
}

impl BatchJob {
    /// Job whose side is detected from `name`.
    pub fn new(
        name: impl Into<String>,
        samples: Vec<DepthSample>,
        options: ConvertOptions,
    ) -> Self {
        let name = name.into();
        let side = detect_side(&name);
        Self {
            name,
            samples,
            side,
            options,
        }
    }

    /// Override the detected side.
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    fn run(&self, distance: f64, frame: &ReferenceFrame) -> Result<ConversionOutput> {
        let side = self
            .side
            .ok_or_else(|| ConvertError::UnknownSide(self.name.clone()))?;
        convert(&self.samples, distance, side, frame, &self.options)
    }
}

/// Outcome for one input.
#[derive(Debug)]
pub struct BatchEntry {
    /// Input name.
    pub name: String,
    /// Side used, when known.
    pub side: Option<Side>,
    /// Written paths, or why the input failed.
    pub result: Result<ConversionOutput>,
}

impl BatchEntry {
    /// Whether this input converted.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of a whole batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One entry per input.
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    /// Number of inputs converted.
    pub fn success_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_success()).count()
    }

    /// Number of inputs that failed.
    pub fn failure_count(&self) -> usize {
        self.entries.len() - self.success_count()
    }

    /// Successful outputs.
    pub fn outputs(&self) -> impl Iterator<Item = &ConversionOutput> {
        self.entries.iter().filter_map(|e| e.result.as_ref().ok())
    }

    /// `(name, error)` for each failed input.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &ConvertError)> {
        self.entries
            .iter()
            .filter_map(|e| e.result.as_ref().err().map(|err| (e.name.as_str(), err)))
    }
}

fn finish(name: String, side: Option<Side>, result: Result<ConversionOutput>) -> BatchEntry {
    if let Err(e) = &result {
        tracing::warn!(input = %name, error = %e, "conversion failed");
    }
    BatchEntry { name, side, result }
}

/// Inputs of a batch as the scheduler sees them.
trait Request {
    fn name(&self) -> &str;
    fn side(&self) -> Option<Side>;
    fn options(&self) -> &ConvertOptions;
}

impl Request for BatchJob {
    fn name(&self) -> &str {
        &self.name
    }

    fn side(&self) -> Option<Side> {
        self.side
    }

    fn options(&self) -> &ConvertOptions {
        &self.options
    }
}

fn output_paths(options: &ConvertOptions) -> [&Path; 2] {
    [options.vtk_path.as_path(), options.csv_path.as_path()]
}

/// Partition request indices so that requests sharing any output path land
/// in the same group. Each group is in input order.
fn output_groups<'a>(options: impl Iterator<Item = &'a ConvertOptions>) -> Vec<Vec<usize>> {
    let options: Vec<&ConvertOptions> = options.collect();
    let mut owner: HashMap<&Path, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();

    for (i, opts) in options.iter().enumerate() {
        let mut found: Vec<usize> = output_paths(opts)
            .iter()
            .filter_map(|p| owner.get(p).copied())
            .collect();
        found.sort_unstable();
        found.dedup();

        let target = match found.first() {
            Some(&g) => g,
            None => {
                groups.push(Vec::new());
                groups.len() - 1
            }
        };
        for &g in found.iter().skip(1) {
            let moved = std::mem::take(&mut groups[g]);
            for &j in &moved {
                for path in output_paths(options[j]) {
                    owner.insert(path, target);
                }
            }
            groups[target].extend(moved);
        }
        groups[target].push(i);
        for path in output_paths(opts) {
            owner.insert(path, target);
        }
    }

    groups.retain(|g| !g.is_empty());
    for group in &mut groups {
        group.sort_unstable();
    }
    groups
}

/// Run requests in parallel, one group of path-sharing requests per task.
///
/// Within a group requests run in input order and an output path belongs to
/// the first request that actually writes it. A later request that would
/// overwrite it fails with [`ConvertError::OutputConflict`]; a request that
/// failed earlier claims nothing.
fn run_claimed<R, F>(requests: &[R], run: F) -> Vec<BatchEntry>
where
    R: Request + Sync,
    F: Fn(&R) -> Result<ConversionOutput> + Sync,
{
    let groups = output_groups(requests.iter().map(|r| r.options()));
    let mut entries: Vec<(usize, BatchEntry)> = groups
        .par_iter()
        .flat_map_iter(|group| {
            let mut written: HashSet<&Path> = HashSet::new();
            let mut done = Vec::with_capacity(group.len());
            for &i in group {
                let request = &requests[i];
                let paths = output_paths(request.options());
                let taken = paths.iter().find(|p| written.contains(*p));
                let result = match (request.side(), taken) {
                    (Some(_), Some(path)) => Err(ConvertError::OutputConflict(path.to_path_buf())),
                    _ => run(request),
                };
                if result.is_ok() {
                    written.extend(paths);
                }
                done.push((i, finish(request.name().to_string(), request.side(), result)));
            }
            done
        })
        .collect();

    entries.sort_unstable_by_key(|(i, _)| *i);
    entries.into_iter().map(|(_, entry)| entry).collect()
}

/// Convert every job in parallel at the same chainage distance.
pub fn run_batch(jobs: &[BatchJob], distance: f64, frame: &ReferenceFrame) -> BatchReport {
    let entries = run_claimed(jobs, |job| job.run(distance, frame));
    BatchReport { entries }
}

/// A file conversion with its outputs decided.
struct FileRequest {
    name: String,
    path: PathBuf,
    side: Option<Side>,
    options: ConvertOptions,
}

impl Request for FileRequest {
    fn name(&self) -> &str {
        &self.name
    }

    fn side(&self) -> Option<Side> {
        self.side
    }

    fn options(&self) -> &ConvertOptions {
        &self.options
    }
}

impl FileRequest {
    fn run(&self, distance: f64, settings: &Settings) -> Result<ConversionOutput> {
        let side = self
            .side
            .ok_or_else(|| ConvertError::UnknownSide(self.name.clone()))?;
        let output = &settings.output;
        let series = DepthSeries::read(&self.path, &output.depth_column, &output.value_column)?;
        convert(&series.samples, distance, side, &settings.frame, &self.options)
    }
}

/// Read, convert and write each CSV file into `out_dir`.
///
/// Output names are [`generate_file_name`] and [`companion_file_name`] of the
/// input. `side` forces one side for every file; otherwise it is detected
/// from each file name.
pub fn convert_files<P: AsRef<Path>>(
    inputs: &[P],
    distance: f64,
    settings: &Settings,
    out_dir: &Path,
    side: Option<Side>,
) -> BatchReport {
    let requests: Vec<FileRequest> = inputs
        .iter()
        .map(|input| {
            let path = input.as_ref().to_path_buf();
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let options = ConvertOptions::from_settings(
                &settings.output,
                out_dir.join(generate_file_name(&name)),
                out_dir.join(companion_file_name(&name)),
            );
            FileRequest {
                side: side.or_else(|| detect_side(&name)),
                name,
                path,
                options,
            }
        })
        .collect();

    let entries = run_claimed(&requests, |request| request.run(distance, settings));
    BatchReport { entries }
}
