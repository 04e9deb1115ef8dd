use crate::error::{ExtractError, Result};
use crate::format::Format;
use crate::track::Track;
use flate2::read::GzDecoder;
use indicatif::{ParallelProgressIterator, ProgressBar};
use log::{debug, warn};
use rayon::prelude::*;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const DEFAULT_BATCH_SIZE: usize = 50;

const GZIP_SUFFIX: &str = ".gz";

#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Files parsed in parallel before the next batch starts.
    pub batch_size: usize,
    pub progress: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            batch_size: DEFAULT_BATCH_SIZE,
            progress: true,
        }
    }
}

/// What came out of one file.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<Vec<Track>>,
}

/// Finds every track file below `data_dir`, sorted by path.
///
/// Gzipped files (`ride.fit.gz`, as exported by Strava) are picked up too.
pub fn discover(data_dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(data_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file() && is_track_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

fn is_track_file(path: &Path) -> bool {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("")
        .to_lowercase();
    let file_name = file_name.strip_suffix(GZIP_SUFFIX).unwrap_or(&file_name);

    Format::ALL
        .iter()
        .any(|format| file_name.ends_with(&format!(".{}", format.extension())))
}

/// Reads a file, gunzipping it if needed.
///
/// Returns the name the content should be extracted under, which drops the
/// `.gz` suffix so the inner extension picks the format.
pub fn load(path: &Path) -> Result<(String, Vec<u8>)> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let content = fs::read(path).map_err(|e| ExtractError::decode(&file_name, e))?;

    if !file_name.to_lowercase().ends_with(GZIP_SUFFIX) {
        return Ok((file_name, content));
    }

    let mut decoder = GzDecoder::new(content.as_slice());
    let mut decompressed_data = Vec::new();
    decoder
        .read_to_end(&mut decompressed_data)
        .map_err(|e| ExtractError::decode(&file_name, e))?;

    let inner_name = file_name[..file_name.len() - GZIP_SUFFIX.len()].to_string();
    Ok((inner_name, decompressed_data))
}

pub fn process(path: &Path) -> FileOutcome {
    let result = load(path).and_then(|(file_name, content)| {
        crate::extract_tracks(&file_name, &content)
    });

    match &result {
        Ok(tracks) => debug!("{}: {} tracks", path.display(), tracks.len()),
        Err(e) => warn!("✗ Error processing {}: {}", path.display(), e),
    }

    FileOutcome {
        path: path.to_path_buf(),
        result,
    }
}

/// Processes `files` in consecutive batches, each batch in parallel.
///
/// One file failing never affects the others. Outcomes keep the input order.
pub fn run(files: &[PathBuf], config: &BatchConfig) -> Vec<FileOutcome> {
    let progress = if config.progress {
        ProgressBar::new(files.len() as u64)
    } else {
        ProgressBar::hidden()
    };

    let mut outcomes = Vec::with_capacity(files.len());

    for batch in files.chunks(config.batch_size.max(1)) {
        let mut batch_outcomes: Vec<FileOutcome> = batch
            .par_iter()
            .progress_with(progress.clone())
            .map(|path| process(path))
            .collect();

        outcomes.append(&mut batch_outcomes);
    }

    progress.finish_and_clear();
    outcomes
}

/// Every extracted track in file order, failures left out.
pub fn into_tracks(outcomes: Vec<FileOutcome>) -> Vec<Track> {
    outcomes
        .into_iter()
        .filter_map(|outcome| outcome.result.ok())
        .flatten()
        .collect()
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub files: usize,
    pub failed: usize,
    pub tracks: usize,
    pub points: usize,
}

impl Summary {
    pub fn from_outcomes(outcomes: &[FileOutcome]) -> Self {
        let mut summary = Summary {
            files: outcomes.len(),
            ..Summary::default()
        };

        for outcome in outcomes {
            match &outcome.result {
                Ok(tracks) => {
                    summary.tracks += tracks.len();
                    summary.points += tracks.iter().map(|track| track.points.len()).sum::<usize>();
                }
                Err(_) => summary.failed += 1,
            }
        }

        summary
    }

    pub fn print(&self) {
        println!(
            "✓ Extracted {} tracks ({} points) from {} files",
            self.tracks,
            self.points,
            self.files - self.failed
        );
        if self.failed > 0 {
            println!("✗ {} files could not be read", self.failed);
        }
    }
}
