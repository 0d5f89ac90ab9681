use crate::loader::read_table;
use crate::model::{LoadError, StorageError, Table};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Single-file CSV copy of the integrated table.
pub struct CsvStorage {
    path: PathBuf,
}

impl CsvStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the table, deleting any file already at the path first.
    pub fn save(&self, table: &Table) -> Result<(), StorageError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            info!("Removed previous export {}", self.path.display());
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(table.columns())?;
        for row in table.rows() {
            writer.write_record(row)?;
        }
        writer.flush()?;

        info!("Saved {} rows to {}", table.len(), self.path.display());
        Ok(())
    }

    /// Reads the export back the same way datasets are loaded.
    pub fn load(&self) -> Result<Table, LoadError> {
        read_table(&self.path).map(|(table, _)| table)
    }
}
