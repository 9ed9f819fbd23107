//! Output file names and CSV writers for the analysis run

use crate::error::Result;
use crate::table::TrackTable;
use std::path::{Path, PathBuf};
use tracing::info;

pub const TOP_SONGS_CSV: &str = "top_10_songs.csv";
pub const LONG_SONGS_CSV: &str = "long_songs.csv";
pub const HEATMAP_PNG: &str = "correlation_heatmap_annotated.png";
pub const SONGS_PER_YEAR_PNG: &str = "songs_per_year.png";
pub const AVG_POPULARITY_PNG: &str = "avg_popularity_per_year.png";
pub const SCATTER_PNG: &str = "danceability_vs_energy.png";

/// Write `top_10_songs.csv` - the ranked view, every column, no index
///
/// # Errors
/// Returns error if file cannot be written
pub fn write_top_songs(output_dir: &Path, top: &TrackTable) -> Result<PathBuf> {
    write_table(output_dir, TOP_SONGS_CSV, top)
}

/// Write `long_songs.csv` - every track over the duration threshold
///
/// # Errors
/// Returns error if file cannot be written
pub fn write_long_songs(output_dir: &Path, long: &TrackTable) -> Result<PathBuf> {
    write_table(output_dir, LONG_SONGS_CSV, long)
}

fn write_table(output_dir: &Path, name: &str, table: &TrackTable) -> Result<PathBuf> {
    let path = output_dir.join(name);
    table.write_csv(&path)?;
    info!("Wrote {} rows to {}", table.row_count(), path.display());
    Ok(path)
}
