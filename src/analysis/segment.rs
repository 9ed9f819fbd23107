//! Popular vs less-popular segmentation

use crate::analysis::rank::POPULARITY;
use crate::analysis::stats::{format_float, mean};
use crate::error::Result;
use crate::table::{format_rows, TrackTable};

pub const IS_POPULAR: &str = "is_popular";
pub const POPULARITY_THRESHOLD: f64 = 70.0;
pub const DANCEABILITY: &str = "danceability";
pub const ENERGY: &str = "energy";
pub const SEGMENT_FEATURES: [&str; 3] = [DANCEABILITY, ENERGY, "tempo"];

/// Feature means for one side of the popularity split
#[derive(Debug, Clone)]
pub struct SegmentMeans {
    pub is_popular: bool,
    pub rows: usize,
    pub means: Vec<f64>,
}

/// One point of the danceability/energy scatter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterPoint {
    pub danceability: f64,
    pub energy: f64,
    pub popularity: f64,
}

/// Append `is_popular` (`True`/`False`) to every row. Missing popularity is not popular.
///
/// # Errors
/// Returns `MissingColumn` if the table has no `popularity` column
pub fn mark_popular(table: &mut TrackTable) -> Result<usize> {
    let scores = table.numeric_column(table.require_column(POPULARITY)?);
    let flags: Vec<bool> = scores
        .iter()
        .map(|s| s.is_some_and(|v| v >= POPULARITY_THRESHOLD))
        .collect();
    let popular = flags.iter().filter(|&&f| f).count();

    table.set_column(
        IS_POPULAR,
        flags
            .into_iter()
            .map(|f| if f { "True" } else { "False" }.to_string())
            .collect(),
    )?;
    Ok(popular)
}

/// Mean of each segment feature grouped by `is_popular`, `False` group first.
/// Groups with no rows are omitted.
///
/// # Errors
/// Returns `MissingColumn` if `is_popular` or a feature column is absent
pub fn feature_means(table: &TrackTable) -> Result<Vec<SegmentMeans>> {
    let flag_col = table.require_column(IS_POPULAR)?;
    let features = SEGMENT_FEATURES
        .iter()
        .map(|name| Ok(table.numeric_column(table.require_column(name)?)))
        .collect::<Result<Vec<_>>>()?;

    let mut groups = Vec::with_capacity(2);
    for is_popular in [false, true] {
        let label = if is_popular { "True" } else { "False" };
        let members: Vec<usize> = (0..table.row_count())
            .filter(|&r| table.cell(r, flag_col) == Some(label))
            .collect();
        if members.is_empty() {
            continue;
        }

        let means = features
            .iter()
            .map(|values| mean(members.iter().filter_map(|&r| values[r])))
            .collect();
        groups.push(SegmentMeans {
            is_popular,
            rows: members.len(),
            means,
        });
    }
    Ok(groups)
}

/// Rows with danceability, energy and popularity all present
///
/// # Errors
/// Returns `MissingColumn` if any of the three columns is absent
pub fn scatter_points(table: &TrackTable) -> Result<Vec<ScatterPoint>> {
    let dance = table.numeric_column(table.require_column(DANCEABILITY)?);
    let energy = table.numeric_column(table.require_column(ENERGY)?);
    let popularity = table.numeric_column(table.require_column(POPULARITY)?);

    Ok(dance
        .iter()
        .zip(&energy)
        .zip(&popularity)
        .filter_map(|((d, e), p)| {
            Some(ScatterPoint {
                danceability: (*d)?,
                energy: (*e)?,
                popularity: (*p)?,
            })
        })
        .collect())
}

#[must_use]
pub fn means_report(groups: &[SegmentMeans]) -> String {
    let mut headers = vec![IS_POPULAR, "songs"];
    headers.extend(SEGMENT_FEATURES);
    let rows: Vec<Vec<String>> = groups
        .iter()
        .map(|g| {
            let mut row = vec![
                if g.is_popular { "True" } else { "False" }.to_string(),
                g.rows.to_string(),
            ];
            row.extend(g.means.iter().map(|m| format_float(*m)));
            row
        })
        .collect();
    format_rows(&headers, &rows)
}
