use crate::error::Result;
use crate::table::TrackTable;
use std::cmp::Ordering;

pub const POPULARITY: &str = "popularity";
pub const TOP_SONGS: usize = 10;

/// Descending order with missing values last
fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// The `n` most popular rows, highest first. Ties keep source order.
///
/// # Errors
/// Returns `MissingColumn` if the table has no `popularity` column
pub fn top_by_popularity(table: &TrackTable, n: usize) -> Result<TrackTable> {
    let col = table.require_column(POPULARITY)?;
    let scores = table.numeric_column(col);

    let mut order: Vec<usize> = (0..table.row_count()).collect();
    order.sort_by(|&a, &b| descending(scores[a], scores[b]));
    order.truncate(n);

    Ok(table.select_rows(&order))
}
