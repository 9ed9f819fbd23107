use crate::error::Result;
use crate::table::TrackTable;

pub const DURATION_MS: &str = "duration_ms";
/// Ten minutes
pub const LONG_SONG_MS: f64 = 600_000.0;
pub const PREVIEW_ROWS: usize = 5;

/// Rows strictly longer than `LONG_SONG_MS`, in table order
///
/// # Errors
/// Returns `MissingColumn` if the table has no `duration_ms` column
pub fn long_songs(table: &TrackTable) -> Result<TrackTable> {
    let durations = table.numeric_column(table.require_column(DURATION_MS)?);
    let matches: Vec<usize> = durations
        .iter()
        .enumerate()
        .filter(|(_, d)| d.is_some_and(|ms| ms > LONG_SONG_MS))
        .map(|(i, _)| i)
        .collect();
    Ok(table.select_rows(&matches))
}
