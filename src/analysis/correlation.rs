//! Correlation matrix computation

use crate::analysis::stats::{format_float, pearson};
use crate::error::{Result, TrackError};
use crate::table::{format_rows, TrackTable};
use ndarray::Array2;
use std::cmp::Ordering;

/// Pairwise Pearson correlations between the numeric columns of a table
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    pub matrix: Array2<f64>,
}

impl CorrelationMatrix {
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[allow(dead_code)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Correlations of every column against `name`, highest first, NaN last
    ///
    /// # Errors
    /// Returns `MissingColumn` if `name` is not one of the numeric columns
    pub fn ranking(&self, name: &str) -> Result<Vec<(String, f64)>> {
        let col = self
            .names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| TrackError::MissingColumn(format!("{name} (numeric)")))?;

        let mut ranked: Vec<(String, f64)> = self
            .names
            .iter()
            .cloned()
            .zip(self.matrix.column(col).iter().copied())
            .collect();
        ranked.sort_by(|a, b| match (a.1.is_nan(), b.1.is_nan()) {
            (false, false) => b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal),
            (false, true) => Ordering::Less,
            (true, false) => Ordering::Greater,
            (true, true) => Ordering::Equal,
        });
        Ok(ranked)
    }
}

/// Compute the `NxN` correlation matrix between all numeric columns
///
/// # Errors
/// Returns error if the table has no numeric columns
pub fn correlation_matrix(table: &TrackTable) -> Result<CorrelationMatrix> {
    let indices = table.numeric_column_indices();
    if indices.is_empty() {
        return Err(TrackError::Analysis("No numeric columns found".into()));
    }

    let names: Vec<String> = indices.iter().map(|&i| table.headers[i].clone()).collect();
    let columns: Vec<Vec<Option<f64>>> = indices
        .iter()
        .map(|&i| table.numeric_column(i))
        .collect();

    let n = columns.len();
    let mut matrix = Array2::<f64>::from_elem((n, n), f64::NAN);

    for i in 0..n {
        // A column correlates perfectly with itself unless it is constant
        let self_r = pearson(&columns[i], &columns[i]);
        matrix[[i, i]] = if self_r.is_nan() { f64::NAN } else { 1.0 };
        for j in (i + 1)..n {
            let r = pearson(&columns[i], &columns[j]);
            matrix[[i, j]] = r;
            matrix[[j, i]] = r;
        }
    }

    Ok(CorrelationMatrix { names, matrix })
}

#[must_use]
pub fn ranking_report(ranking: &[(String, f64)]) -> String {
    let rows: Vec<Vec<String>> = ranking
        .iter()
        .map(|(name, r)| vec![name.clone(), format_float(*r)])
        .collect();
    format_rows(&["column", "correlation"], &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_correlation_matrix() {
        let content = "name,a,b,c\nx,1.0,2.0,10.0\ny,2.0,4.0,20.0\nz,3.0,6.0,30.0";
        let mut file = NamedTempFile::new().expect("create");
        file.write_all(content.as_bytes()).expect("write");

        let table = TrackTable::from_file(file.path()).expect("parse");
        let corr = correlation_matrix(&table).expect("correlate");

        assert_eq!(corr.names, vec!["a", "b", "c"]);
        assert_eq!(corr.matrix.dim(), (3, 3));
        // Diagonal should be 1.0
        assert!((corr.matrix[[0, 0]] - 1.0).abs() < 0.01);
        // a and b are perfectly correlated
        assert!((corr.matrix[[0, 1]] - 1.0).abs() < 0.01);
        assert!((corr.matrix[[1, 0]] - corr.matrix[[0, 1]]).abs() < 1e-12);
    }

    #[test]
    fn test_ranking_sorted_with_nan_last() {
        let table = TrackTable::from_reader(
            "popularity,up,down,flat\n1,10,5,7\n2,20,4,7\n3,35,1,7\n".as_bytes(),
        )
        .expect("parse");
        let corr = correlation_matrix(&table).expect("correlate");

        let ranking = corr.ranking("popularity").expect("rank");
        let names: Vec<&str> = ranking.iter().map(|(n, _)| n.as_str()).collect();

        assert_eq!(names, vec!["popularity", "up", "down", "flat"]);
        assert!((ranking[0].1 - 1.0).abs() < 1e-12);
        assert!(ranking[2].1 < 0.0);
        assert!(ranking[3].1.is_nan());
        assert!(corr.matrix[[3, 3]].is_nan());
    }

    #[test]
    fn test_ranking_unknown_column() {
        let table = TrackTable::from_reader("a,b\n1,2\n2,3\n".as_bytes()).expect("parse");
        let corr = correlation_matrix(&table).expect("correlate");
        assert!(corr.ranking("popularity").is_err());
    }

    #[test]
    fn test_no_numeric_columns() {
        let table = TrackTable::from_reader("name\nx\n".as_bytes()).expect("parse");
        assert!(correlation_matrix(&table).is_err());
    }
}
