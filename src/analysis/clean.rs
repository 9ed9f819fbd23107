use crate::error::Result;
use crate::loader::YEAR;
use crate::table::{is_null, TrackTable};
use std::collections::HashSet;

/// Rows removed by each cleaning step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CleanReport {
    pub duplicates_removed: usize,
    pub missing_year_removed: usize,
}

/// One cell as compared for duplicate detection
#[derive(Debug, PartialEq, Eq, Hash)]
enum CellKey<'a> {
    Missing,
    Number(u64),
    Text(&'a str),
}

impl CellKey<'_> {
    fn number(value: f64) -> Self {
        // adding zero folds -0.0 into 0.0
        Self::Number((value + 0.0).to_bits())
    }
}

/// Drop rows identical to an earlier row across every column.
/// Numeric columns compare by value (`90` equals `90.0`), other columns by
/// text. Null cells compare equal regardless of which missing marker they use.
pub fn drop_duplicates(table: &mut TrackTable) -> usize {
    let numeric: Vec<Option<Vec<Option<f64>>>> = (0..table.col_count())
        .map(|c| {
            table
                .dtype(c)
                .is_numeric()
                .then(|| table.numeric_column(c))
        })
        .collect();

    let keep: Vec<bool> = {
        let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(table.row_count());
        table
            .rows
            .iter()
            .enumerate()
            .map(|(r, row)| {
                let key: Vec<CellKey<'_>> = row
                    .iter()
                    .zip(&numeric)
                    .map(|(cell, values)| match values {
                        Some(values) => values[r].map_or(CellKey::Missing, CellKey::number),
                        None if is_null(cell) => CellKey::Missing,
                        None => CellKey::Text(cell.as_str()),
                    })
                    .collect();
                seen.insert(key)
            })
            .collect()
    };

    let before = table.row_count();
    let mut flags = keep.into_iter();
    table.rows.retain(|_| flags.next().unwrap_or(false));
    before - table.row_count()
}

/// Drop rows whose derived year is null
///
/// # Errors
/// Returns `MissingColumn` if the table has no `year` column
pub fn drop_missing_year(table: &mut TrackTable) -> Result<usize> {
    let year = table.require_column(YEAR)?;
    let before = table.row_count();
    table.rows.retain(|row| !is_null(&row[year]));
    Ok(before - table.row_count())
}

/// Remove duplicates, then rows without a year
///
/// # Errors
/// Returns `MissingColumn` if the table has no `year` column
pub fn clean(table: &mut TrackTable) -> Result<CleanReport> {
    let duplicates_removed = drop_duplicates(table);
    let missing_year_removed = drop_missing_year(table)?;
    Ok(CleanReport {
        duplicates_removed,
        missing_year_removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::derive_year;

    fn load(content: &str) -> TrackTable {
        let mut table = TrackTable::from_reader(content.as_bytes()).expect("parse");
        derive_year(&mut table).expect("derive year");
        table
    }

    #[test]
    fn test_clean_removes_duplicates_and_missing_years() {
        let mut table = load(
            "name,release_date\na,1999-01-01\nb,bogus\na,1999-01-01\nc,2001\nc,2001-01-01\n",
        );

        let report = clean(&mut table).expect("clean");

        // "2001" and "2001-01-01" normalise to the same date, so they collapse
        assert_eq!(report.duplicates_removed, 2);
        assert_eq!(report.missing_year_removed, 1);
        assert_eq!(table.row_count(), 2);

        let year = table.column_index(YEAR).expect("year");
        assert!((0..table.row_count()).all(|r| table.cell(r, year).is_some()));
    }

    #[test]
    fn test_unparseable_date_removes_exactly_one_row() {
        let mut table = load("name,release_date\na,1990\nb,not-a-date\nc,1991\n");
        let before = table.row_count();

        clean(&mut table).expect("clean");

        assert_eq!(table.row_count(), before - 1);
        assert_eq!(table.rows[0][0], "a");
        assert_eq!(table.rows[1][0], "c");
    }

    #[test]
    fn test_null_markers_compare_equal() {
        let mut table = TrackTable::from_reader("a,b\nx,\nx,NaN\nx,1\n".as_bytes()).expect("parse");
        assert_eq!(drop_duplicates(&mut table), 1);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_numeric_cells_compare_by_value() {
        let mut table = TrackTable::from_reader(
            "name,popularity,energy\na,90,0.5\na,90.0,0.50\na,91,0.5\n".as_bytes(),
        )
        .expect("parse");

        assert_eq!(drop_duplicates(&mut table), 1);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0][1], "90");
        assert_eq!(table.rows[1][1], "91");
    }

    #[test]
    fn test_text_cells_compare_as_written() {
        // "x" makes code a text column, so "007" and "7" stay distinct
        let mut table =
            TrackTable::from_reader("name,code\na,007\na,7\na,x\n".as_bytes()).expect("parse");
        assert_eq!(drop_duplicates(&mut table), 0);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let mut table = load("name,release_date\na,1999\na,1999\nb,\n");
        clean(&mut table).expect("first pass");
        let snapshot = table.clone();

        let report = clean(&mut table).expect("second pass");

        assert_eq!(report, CleanReport::default());
        assert_eq!(table, snapshot);
    }
}
