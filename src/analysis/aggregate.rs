//! Frequency and per-year aggregates

use crate::analysis::rank::POPULARITY;
use crate::analysis::stats::{format_float, mean};
use crate::error::Result;
use crate::loader::YEAR;
use crate::table::{format_rows, TrackTable};
use std::collections::{BTreeMap, HashMap};

pub const ARTISTS: &str = "artists";
pub const TOP_ARTISTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistCount {
    pub artists: String,
    pub count: usize,
}

/// Songs and mean popularity for one release year
#[derive(Debug, Clone)]
pub struct YearSummary {
    pub year: i32,
    pub count: usize,
    pub mean_popularity: f64,
}

/// Most frequent `artists` values, highest count first.
/// Ties keep first-appearance order; nulls are not counted.
///
/// # Errors
/// Returns `MissingColumn` if the table has no `artists` column
pub fn top_artists(table: &TrackTable, n: usize) -> Result<Vec<ArtistCount>> {
    let col = table.require_column(ARTISTS)?;

    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<ArtistCount> = Vec::new();
    for row in 0..table.row_count() {
        let Some(artists) = table.cell(row, col) else {
            continue;
        };
        let slot = *slots.entry(artists).or_insert_with(|| {
            counts.push(ArtistCount {
                artists: artists.to_string(),
                count: 0,
            });
            counts.len() - 1
        });
        counts[slot].count += 1;
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    Ok(counts)
}

/// Row count and mean popularity per year, ascending by year.
/// Rows with a null year are skipped.
///
/// # Errors
/// Returns `MissingColumn` if `year` or `popularity` is absent
pub fn per_year(table: &TrackTable) -> Result<Vec<YearSummary>> {
    let year_col = table.require_column(YEAR)?;
    let popularity = table.numeric_column(table.require_column(POPULARITY)?);

    let mut groups: BTreeMap<i32, (usize, Vec<f64>)> = BTreeMap::new();
    for (row, score) in popularity.iter().enumerate() {
        let Some(year) = table
            .cell(row, year_col)
            .and_then(|s| s.trim().parse::<i32>().ok())
        else {
            continue;
        };
        let entry = groups.entry(year).or_default();
        entry.0 += 1;
        if let Some(score) = score {
            entry.1.push(*score);
        }
    }

    Ok(groups
        .into_iter()
        .map(|(year, (count, scores))| YearSummary {
            year,
            count,
            mean_popularity: mean(scores),
        })
        .collect())
}

#[must_use]
pub fn artists_report(counts: &[ArtistCount]) -> String {
    let rows: Vec<Vec<String>> = counts
        .iter()
        .map(|c| vec![c.artists.clone(), c.count.to_string()])
        .collect();
    format_rows(&[ARTISTS, "count"], &rows)
}

#[must_use]
pub fn years_report(years: &[YearSummary]) -> String {
    let rows: Vec<Vec<String>> = years
        .iter()
        .map(|y| {
            vec![
                y.year.to_string(),
                y.count.to_string(),
                format_float(y.mean_popularity),
            ]
        })
        .collect();
    format_rows(&[YEAR, "songs", "avg_popularity"], &rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TrackTable {
        TrackTable::from_reader(
            "artists,popularity,year\n\
             ['B'],10,2001\n\
             ['A'],20,1999\n\
             ['B'],30,2001\n\
             ['C'],,1999\n\
             ['A'],40,2000\n\
             ,50,2000\n\
             ['D'],60,\n"
                .as_bytes(),
        )
        .expect("parse")
    }

    #[test]
    fn test_top_artists_counts_and_ties() {
        let counts = top_artists(&sample(), TOP_ARTISTS).expect("count");
        let pairs: Vec<(&str, usize)> = counts
            .iter()
            .map(|c| (c.artists.as_str(), c.count))
            .collect();
        // B appears before A in the source, so it wins the tie
        assert_eq!(pairs, vec![("['B']", 2), ("['A']", 2), ("['C']", 1), ("['D']", 1)]);
    }

    #[test]
    fn test_top_artists_truncates() {
        let counts = top_artists(&sample(), 2).expect("count");
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_per_year_counts_and_means() {
        let years = per_year(&sample()).expect("aggregate");

        let keys: Vec<i32> = years.iter().map(|y| y.year).collect();
        assert_eq!(keys, vec![1999, 2000, 2001]);

        assert_eq!(years[0].count, 2);
        // 1999 has one null popularity, so only 20 counts toward the mean
        assert!((years[0].mean_popularity - 20.0).abs() < 1e-9);
        assert!((years[1].mean_popularity - 45.0).abs() < 1e-9);
        assert!((years[2].mean_popularity - 20.0).abs() < 1e-9);

        // the null-year row is the only one left out
        let total: usize = years.iter().map(|y| y.count).sum();
        assert_eq!(total, sample().row_count() - 1);
    }
}
