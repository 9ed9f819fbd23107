//! Read-only dataset profile: schema, null counts, summary statistics

use crate::analysis::stats::ColumnStats;
use crate::table::{format_rows, DType, TrackTable};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Schema entry for one column
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    pub index: usize,
    pub name: String,
    pub non_null: usize,
    pub dtype: DType,
}

/// Everything the profiler reports about a table
#[derive(Debug, Clone)]
pub struct Profile {
    pub rows: usize,
    pub columns: Vec<ColumnInfo>,
    pub stats: Vec<ColumnStats>,
}

impl Profile {
    /// Build a profile without touching the table
    #[must_use]
    pub fn of(table: &TrackTable) -> Self {
        let columns: Vec<ColumnInfo> = table
            .headers
            .iter()
            .enumerate()
            .map(|(index, name)| ColumnInfo {
                index,
                name: name.clone(),
                non_null: table.non_null_count(index),
                dtype: table.dtype(index),
            })
            .collect();

        let stats = columns
            .iter()
            .filter(|c| c.dtype.is_numeric())
            .map(|c| ColumnStats::calculate(&c.name, &table.numeric_column(c.index)))
            .collect();

        Self {
            rows: table.row_count(),
            columns,
            stats,
        }
    }

    /// Null count per column, in column order
    #[must_use]
    pub fn null_counts(&self) -> Vec<(&str, usize)> {
        self.columns
            .iter()
            .map(|c| (c.name.as_str(), self.rows - c.non_null))
            .collect()
    }

    /// Schema listing with non-null counts and dtypes
    #[must_use]
    pub fn info_report(&self) -> String {
        let mut out = format!(
            "{} rows x {} columns\n",
            self.rows,
            self.columns.len()
        );

        let rows: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|c| {
                vec![
                    c.index.to_string(),
                    c.name.clone(),
                    format!("{} non-null", c.non_null),
                    c.dtype.display_name().to_string(),
                ]
            })
            .collect();
        out.push_str(&format_rows(&["#", "Column", "Non-Null Count", "Dtype"], &rows));

        let mut dtype_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for c in &self.columns {
            *dtype_counts.entry(c.dtype.display_name()).or_insert(0) += 1;
        }
        let summary: Vec<String> = dtype_counts
            .iter()
            .map(|(name, n)| format!("{name}({n})"))
            .collect();
        let _ = writeln!(out, "dtypes: {}", summary.join(", "));
        out
    }

    /// Per-column missing value counts
    #[must_use]
    pub fn null_report(&self) -> String {
        let rows: Vec<Vec<String>> = self
            .null_counts()
            .into_iter()
            .map(|(name, n)| vec![name.to_string(), n.to_string()])
            .collect();
        format_rows(&["column", "missing"], &rows)
    }

    /// `describe`-style table, one row per numeric column
    #[must_use]
    pub fn describe_report(&self) -> String {
        let rows: Vec<Vec<String>> = self.stats.iter().map(ColumnStats::cells).collect();
        format_rows(
            &["column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"],
            &rows,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TrackTable {
        TrackTable::from_reader(
            "name,popularity,tempo,explicit\na,10,120.0,True\nb,,90.5,False\nc,30,,True\n"
                .as_bytes(),
        )
        .expect("parse")
    }

    #[test]
    fn test_profile_schema() {
        let profile = Profile::of(&sample());

        assert_eq!(profile.rows, 3);
        assert_eq!(profile.columns.len(), 4);
        assert_eq!(profile.columns[0].dtype, DType::Object);
        assert_eq!(profile.columns[1].dtype, DType::Int64);
        assert_eq!(profile.columns[1].non_null, 2);
        assert_eq!(profile.columns[2].dtype, DType::Float64);
        assert_eq!(profile.columns[3].dtype, DType::Bool);
    }

    #[test]
    fn test_null_counts() {
        let profile = Profile::of(&sample());
        assert_eq!(
            profile.null_counts(),
            vec![("name", 0), ("popularity", 1), ("tempo", 1), ("explicit", 0)]
        );
    }

    #[test]
    fn test_describe_covers_numeric_columns_only() {
        let profile = Profile::of(&sample());
        let names: Vec<&str> = profile.stats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["popularity", "tempo", "explicit"]);

        let popularity = &profile.stats[0];
        assert_eq!(popularity.count, 2);
        assert!((popularity.mean - 20.0).abs() < 1e-9);

        let report = profile.describe_report();
        assert!(report.contains("popularity"));
        assert!(!report.contains("name "));
    }

    #[test]
    fn test_info_report_lists_dtypes() {
        let report = Profile::of(&sample()).info_report();
        assert!(report.starts_with("3 rows x 4 columns"));
        assert!(report.contains("dtypes: bool(1), float64(1), int64(1), object(1)"));
    }

    #[test]
    fn test_release_date_profiles_as_date() {
        let mut table = TrackTable::from_reader(
            "name,popularity,release_date\na,10,1999\nb,20,2001-03\n".as_bytes(),
        )
        .expect("parse");
        crate::loader::derive_year(&mut table).expect("derive year");

        let profile = Profile::of(&table);

        assert_eq!(profile.columns[2].dtype, DType::Date);
        assert_eq!(profile.columns[3].dtype, DType::Int64);
        assert!(profile.stats.iter().all(|s| s.name != "release_date"));
        assert!(profile
            .info_report()
            .contains("dtypes: datetime64[ns](1), int64(2), object(1)"));
    }
}
