use anyhow::{Context, Result, bail, ensure};
use clap::{ArgAction, Parser, ValueHint};
use std::path::PathBuf;
use track_extract::batch::{self, BatchConfig, DEFAULT_BATCH_SIZE, Summary};
use track_extract::io::{write_gpx, write_json};

pub const DATA_DIR: &str = "data";
pub const OUT_PATH: &str = "data/tracks.json";

#[derive(Parser, Debug)]
#[command(author, version, about = "Extract GPS tracks from GPX, TCX and FIT files", long_about = None)]
struct Cli {
    /// Directory searched recursively for .gpx, .tcx and .fit files (optionally .gz)
    #[arg(default_value = DATA_DIR, value_hint = ValueHint::DirPath)]
    data_dir: PathBuf,

    /// Output JSON path
    #[arg(short, long, default_value = OUT_PATH, value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Also write every track into a single GPX file
    #[arg(long, value_hint = ValueHint::FilePath)]
    gpx: Option<PathBuf>,

    /// Number of files parsed in parallel per batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Hide the progress bar
    #[arg(short, long, action = ArgAction::SetTrue)]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    ensure!(cli.batch_size > 0, "--batch-size must be at least 1");
    if !cli.data_dir.is_dir() {
        bail!("{} is not a directory", cli.data_dir.display());
    }

    println!(
        "Searching for track files in {} directory...",
        cli.data_dir.display()
    );
    let files = batch::discover(&cli.data_dir);
    println!("Found {} track files", files.len());

    if files.is_empty() {
        println!("No tracks to extract.");
        return Ok(());
    }

    let config = BatchConfig {
        batch_size: cli.batch_size,
        progress: !cli.quiet,
    };
    println!(
        "Processing {} files in batches of {}...",
        files.len(),
        config.batch_size
    );

    let outcomes = batch::run(&files, &config);
    let summary = Summary::from_outcomes(&outcomes);
    summary.print();

    let tracks = batch::into_tracks(outcomes);

    println!("\nWriting tracks to {}...", cli.output.display());
    write_json(&tracks, &cli.output)
        .with_context(|| format!("writing {}", cli.output.display()))?;

    if let Some(gpx_path) = &cli.gpx {
        println!("Writing tracks to {}...", gpx_path.display());
        write_gpx(&tracks, gpx_path).with_context(|| format!("writing {}", gpx_path.display()))?;
    }

    println!("✓ Successfully wrote {} tracks", tracks.len());
    Ok(())
}
