// Core structs: Table, IndexRecord, error types
use thiserror::Error;

/// Marker written into every cell that has no value.
pub const MISSING: &str = "no data";

/// Name of the join key column shared by the index and integrated tables.
pub const YEAR_MONTH: &str = "year_month";

/// Name of the numeric index column in the index and integrated tables.
pub const INDEX_VALUE: &str = "index_value";

/// In-memory table of text cells. Every row has exactly one cell per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding short rows with `MISSING` and cutting long ones.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), MISSING.to_string());
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &str> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[idx].as_str()))
    }

    /// Number of cells still carrying the missing marker.
    #[cfg(test)]
    pub fn sentinel_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|cell| cell.as_str() == MISSING)
            .count()
    }
}

/// One reshaped row of the SIDRA price index response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexRecord {
    pub territory_code: Option<String>,
    pub territory_name: Option<String>,
    pub unit_code: Option<String>,
    pub unit_name: Option<String>,
    pub index_value: Option<f64>,
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub variable_code: Option<String>,
    pub variable_name: Option<String>,
    pub month_code: Option<String>,
    pub month_name: Option<String>,
    pub group_code: Option<String>,
    pub group_name: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
    pub year_month: Option<String>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("file is empty: {0}")]
    Empty(String),
    #[error("malformed CSV in {path}: {reason}")]
    Malformed { path: String, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("request timed out")]
    Timeout,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response is not a JSON array")]
    NotAnArray,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("dataset {0} was not loaded")]
    MissingDataset(String),
    #[error("missing required input: {0}")]
    MissingInput(String),
    #[error("column '{0}' not found in table")]
    MissingColumn(String),
    #[error("column '{0}' exists in both the transactions and index tables")]
    ColumnClash(String),
    #[error("chart rendering failed: {0}")]
    Chart(String),
}
