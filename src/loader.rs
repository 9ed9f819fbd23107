//! Track CSV loading and release-date normalisation

use crate::error::Result;
use crate::table::TrackTable;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::path::Path;
use tracing::{debug, info};

pub const RELEASE_DATE: &str = "release_date";
pub const YEAR: &str = "year";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parse a release date at day, month, or year precision
#[must_use]
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }

    // Month precision: "1999-07"
    if let Some((y, m)) = raw.split_once('-') {
        if y.len() == 4 && (1..=2).contains(&m.len()) {
            let year = y.parse::<i32>().ok()?;
            let month = m.parse::<u32>().ok()?;
            return NaiveDate::from_ymd_opt(year, month, 1);
        }
        return None;
    }

    // Year precision: "1999"
    if raw.len() == 4 && raw.bytes().all(|b| b.is_ascii_digit()) {
        let year = raw.parse::<i32>().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }

    None
}

/// Normalise `release_date` to `YYYY-MM-DD` and derive the `year` column.
/// Unparseable dates become empty (null) in both columns; rows are kept.
///
/// # Errors
/// Returns `MissingColumn` if the table has no `release_date` column
pub fn derive_year(table: &mut TrackTable) -> Result<usize> {
    let date_idx = table.require_column(RELEASE_DATE)?;

    let mut years = Vec::with_capacity(table.row_count());
    let mut unparsed = 0usize;
    for row in &mut table.rows {
        match parse_release_date(&row[date_idx]) {
            Some(date) => {
                row[date_idx] = date.format("%Y-%m-%d").to_string();
                years.push(date.year().to_string());
            }
            None => {
                if !row[date_idx].trim().is_empty() {
                    debug!("unparseable release_date: {:?}", row[date_idx]);
                }
                row[date_idx].clear();
                years.push(String::new());
                unparsed += 1;
            }
        }
    }

    table.set_column(YEAR, years)?;
    Ok(unparsed)
}

/// Load the track CSV and attach the derived `year` column
///
/// # Errors
/// Returns error if the file cannot be read or lacks `release_date`
pub fn load_tracks(path: &Path) -> Result<TrackTable> {
    let mut table = TrackTable::from_file(path)?;
    let unparsed = derive_year(&mut table)?;

    info!(
        "Loaded {} rows x {} columns from {} ({unparsed} without a release year)",
        table.row_count(),
        table.col_count(),
        path.display()
    );

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_release_date_precisions() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day);

        assert_eq!(parse_release_date("1999-07-15"), d(1999, 7, 15));
        assert_eq!(parse_release_date("1999/07/15"), d(1999, 7, 15));
        assert_eq!(parse_release_date("1999-07-15T10:20:30"), d(1999, 7, 15));
        assert_eq!(parse_release_date("1999-07"), d(1999, 7, 1));
        assert_eq!(parse_release_date("1922"), d(1922, 1, 1));
        assert_eq!(parse_release_date(" 2001 "), d(2001, 1, 1));
    }

    #[test]
    fn test_parse_release_date_rejects_garbage() {
        assert_eq!(parse_release_date(""), None);
        assert_eq!(parse_release_date("not a date"), None);
        assert_eq!(parse_release_date("1999-13"), None);
        assert_eq!(parse_release_date("1999-02-30"), None);
        assert_eq!(parse_release_date("99"), None);
    }

    #[test]
    fn test_load_tracks_derives_year() {
        let content = "name,release_date\na,1999-07-15\nb,garbage\nc,1950\n";
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(content.as_bytes()).expect("write content");

        let table = load_tracks(file.path()).expect("load");
        let year = table.column_index(YEAR).expect("year column");
        let date = table.column_index(RELEASE_DATE).expect("date column");

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.cell(0, year), Some("1999"));
        assert_eq!(table.cell(1, year), None);
        assert_eq!(table.cell(2, year), Some("1950"));
        assert_eq!(table.cell(2, date), Some("1950-01-01"));
        assert_eq!(table.cell(1, date), None);
    }

    #[test]
    fn test_load_without_release_date_fails() {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(b"name,popularity\na,1\n").expect("write content");

        let result = load_tracks(file.path());
        assert!(matches!(result, Err(TrackError::MissingColumn(c)) if c == RELEASE_DATE));
    }
}
