use crate::error::{Result, TrackError};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Cell texts that count as missing, on top of the empty string
const NULL_MARKERS: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "<NA>", "#N/A",
];

/// Whether a raw cell holds a missing value
#[must_use]
pub fn is_null(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || NULL_MARKERS.contains(&trimmed)
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell.trim() {
        "True" | "true" | "TRUE" => Some(true),
        "False" | "false" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Inferred storage type of a column, named the way the profiler prints it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    Int64,
    Float64,
    Bool,
    Date,
    Object,
}

impl DType {
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Bool => "bool",
            Self::Date => "datetime64[ns]",
            Self::Object => "object",
        }
    }

    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int64 | Self::Float64 | Self::Bool)
    }
}

/// In-memory track table: source headers plus one text cell per column per row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TrackTable {
    #[allow(dead_code)]
    #[must_use]
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Parse a CSV file with a header row
    ///
    /// # Errors
    /// Returns error if the file is missing, unreadable, or malformed
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse CSV text from any reader. Short rows are padded with empty cells.
    ///
    /// # Errors
    /// Returns error on malformed CSV or a row wider than the header
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for (line, result) in reader.records().enumerate() {
            let record = result?;
            if record.len() > headers.len() {
                return Err(TrackError::Analysis(format!(
                    "row {} has {} fields, header has {}",
                    line + 1,
                    record.len(),
                    headers.len()
                )));
            }
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    /// Get number of rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get number of columns
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.headers.len()
    }

    /// Get column index by name
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Like `column_index`, but a missing column is an error
    ///
    /// # Errors
    /// Returns `MissingColumn` if no header matches
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| TrackError::MissingColumn(name.to_string()))
    }

    /// Non-null text of a cell
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .filter(|s| !is_null(s))
    }

    /// Numeric value of a cell, if it holds one
    #[must_use]
    pub fn number(&self, row: usize, col: usize) -> Option<f64> {
        self.cell(row, col)
            .and_then(|s| s.trim().parse::<f64>().ok())
    }

    /// Count of non-null cells in a column
    #[must_use]
    pub fn non_null_count(&self, col: usize) -> usize {
        (0..self.row_count())
            .filter(|&r| self.cell(r, col).is_some())
            .count()
    }

    /// Infer the column type from its non-null cells
    #[must_use]
    pub fn dtype(&self, col: usize) -> DType {
        let mut cells = (0..self.row_count())
            .filter_map(|r| self.cell(r, col))
            .peekable();
        if cells.peek().is_none() {
            return DType::Object;
        }

        let mut all_int = true;
        let mut all_float = true;
        let mut all_bool = true;
        let mut all_date = true;
        for cell in cells {
            let cell = cell.trim();
            all_int &= cell.parse::<i64>().is_ok();
            all_float &= cell.parse::<f64>().is_ok();
            all_bool &= parse_bool(cell).is_some();
            all_date &= NaiveDate::parse_from_str(cell, "%Y-%m-%d").is_ok();
            if !(all_int || all_float || all_bool || all_date) {
                return DType::Object;
            }
        }

        if all_int {
            DType::Int64
        } else if all_float {
            DType::Float64
        } else if all_bool {
            DType::Bool
        } else {
            DType::Date
        }
    }

    /// Column values as numbers; bool columns map to 0/1, nulls to `None`
    #[must_use]
    pub fn numeric_column(&self, col: usize) -> Vec<Option<f64>> {
        let as_bool = self.dtype(col) == DType::Bool;
        (0..self.row_count())
            .map(|r| {
                if as_bool {
                    self.cell(r, col)
                        .and_then(parse_bool)
                        .map(|b| if b { 1.0 } else { 0.0 })
                } else {
                    self.number(r, col)
                }
            })
            .collect()
    }

    /// Indices of columns whose inferred type is numeric
    #[must_use]
    pub fn numeric_column_indices(&self) -> Vec<usize> {
        (0..self.col_count())
            .filter(|&i| self.dtype(i).is_numeric())
            .collect()
    }

    /// Append a column, or overwrite it if the name already exists
    ///
    /// # Errors
    /// Returns error if `values` does not have one entry per row
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        if values.len() != self.row_count() {
            return Err(TrackError::Analysis(format!(
                "column '{name}' has {} values for {} rows",
                values.len(),
                self.row_count()
            )));
        }

        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// New table holding copies of the given rows, in the given order
    #[must_use]
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            headers: self.headers.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }

    /// Project the named columns as display rows, nulls rendered as `NaN`
    ///
    /// # Errors
    /// Returns `MissingColumn` if any name is absent
    pub fn project(&self, names: &[&str]) -> Result<Vec<Vec<String>>> {
        let indices = names
            .iter()
            .map(|n| self.require_column(n))
            .collect::<Result<Vec<_>>>()?;

        Ok((0..self.row_count())
            .map(|r| {
                indices
                    .iter()
                    .map(|&c| self.cell(r, c).unwrap_or("NaN").to_string())
                    .collect()
            })
            .collect())
    }

    /// Write as CSV with a header row and no index column
    ///
    /// # Errors
    /// Returns error if the file cannot be created or written
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.to_writer(file)
    }

    /// Write as CSV to any writer
    ///
    /// # Errors
    /// Returns error if writing fails
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = WriterBuilder::new().from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Render rows as a left-aligned text table under the given headers
#[must_use]
pub fn format_rows(headers: &[&str], rows: &[Vec<String>]) -> String {
    use std::fmt::Write as _;

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{h:<w$}"))
        .collect();
    let _ = writeln!(out, "{}", header_line.join("  ").trim_end());
    for row in rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    }
    out
}
