// CSV dataset loading with missing-value substitution
use crate::model::{LoadError, Table, MISSING};
use crate::registry::DatasetName;
use crate::utils::is_null_cell;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const PREVIEW_ROWS: usize = 10;

/// Per-column count of missing cells, taken before substitution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MissingReport {
    pub by_column: Vec<(String, usize)>,
}

impl MissingReport {
    pub fn total(&self) -> usize {
        self.by_column.iter().map(|(_, count)| count).sum()
    }
}

/// Reads one CSV file, replacing every missing cell with `MISSING`.
pub fn read_table(path: &Path) -> Result<(Table, MissingReport), LoadError> {
    let display = path.display().to_string();
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadError::NotFound(display.clone()),
        _ => LoadError::Io(e),
    })?;

    let malformed = |reason: String| LoadError::Malformed {
        path: display.clone(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| malformed(e.to_string()))?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.trim().to_string()
        })
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::Empty(display.clone()));
    }

    let mut missing = vec![0usize; headers.len()];
    let mut table = Table::new(headers.clone());

    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| malformed(e.to_string()))?;
        if record.len() > headers.len() {
            return Err(malformed(format!(
                "row {} has {} fields, header has {}",
                line + 2,
                record.len(),
                headers.len()
            )));
        }

        let mut row = Vec::with_capacity(headers.len());
        for (idx, count) in missing.iter_mut().enumerate() {
            match record.get(idx) {
                Some(cell) if !is_null_cell(cell) => row.push(cell.to_string()),
                _ => {
                    *count += 1;
                    row.push(MISSING.to_string());
                }
            }
        }
        table.push_row(row);
    }

    let report = MissingReport {
        by_column: headers.into_iter().zip(missing).collect(),
    };
    Ok((table, report))
}

/// Loads every registered dataset, skipping the ones that fail.
///
/// The result only holds datasets that loaded; callers check for presence.
pub fn load_datasets(paths: &BTreeMap<DatasetName, PathBuf>) -> BTreeMap<DatasetName, Table> {
    let mut datasets = BTreeMap::new();

    for (name, path) in paths {
        match read_table(path) {
            Ok((table, report)) => {
                info!(
                    "Loaded {}: {} rows x {} columns",
                    name,
                    table.len(),
                    table.columns().len()
                );
                log_missing(*name, &report);
                log_preview(*name, &table);
                datasets.insert(*name, table);
            }
            Err(LoadError::NotFound(p)) => {
                warn!("Skipping {}: file not found ({})", name, p);
            }
            Err(e) => {
                warn!("Skipping {}: {}", name, e);
            }
        }
    }

    info!("{} of {} datasets loaded", datasets.len(), paths.len());
    datasets
}

fn log_missing(name: DatasetName, report: &MissingReport) {
    if report.total() == 0 {
        info!("{}: no missing values", name);
        return;
    }
    info!("{}: {} missing values replaced", name, report.total());
    for (column, count) in report.by_column.iter().filter(|(_, c)| *c > 0) {
        info!("  {}: {}", column, count);
    }
}

fn log_preview(name: DatasetName, table: &Table) {
    debug!("{} preview: {}", name, table.columns().join(" | "));
    for row in table.rows().iter().take(PREVIEW_ROWS) {
        debug!("  {}", row.join(" | "));
    }
}
