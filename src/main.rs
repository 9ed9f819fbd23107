#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::uninlined_format_args)]

mod analysis;
mod charts;
mod error;
mod loader;
mod table;

use analysis::pipeline::{run_pipeline, AnalysisConfig};
use clap::Parser;
use error::{Result, TrackError};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Tracklens - exploratory analysis of a music-track metadata CSV
#[derive(Parser, Debug)]
#[command(name = "tracklens")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input track CSV (needs release_date, popularity, artists, ...)
    #[arg(short, long, default_value = "tracks.csv")]
    input: PathBuf,

    /// Directory for the CSV and PNG outputs
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Skip PNG rendering, write only the CSV outputs
    #[arg(long)]
    no_charts: bool,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tracklens=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    if !args.input.exists() {
        return Err(TrackError::Config(format!(
            "Track file not found: {}",
            args.input.display()
        )));
    }

    std::fs::create_dir_all(&args.output_dir)?;

    info!("Analyzing: {}", args.input.display());
    let table = loader::load_tracks(&args.input)?;

    let config = AnalysisConfig {
        output_dir: args.output_dir,
        render_charts: !args.no_charts,
    };
    let result = run_pipeline(table, &config)?;

    info!("Output written to {}", config.output_dir.display());
    for path in &result.written {
        info!("  - {}", path.display());
    }

    Ok(())
}
