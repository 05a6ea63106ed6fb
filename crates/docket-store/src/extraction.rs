//! Structured table: one row per document

use crate::table::{open_reader, seal_tail};
use crate::{Result, StoreError};
use docket_domain::traits::ExtractionStore;
use docket_domain::{DocType, StructuredRecord, KEY_COLUMN};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// CSV-backed implementation of `ExtractionStore`
///
/// The column set is fixed at construction. Appending to an existing file
/// whose header differs is refused rather than producing misaligned rows.
/// A row cut short by an interrupted write still marks its document as
/// processed.
#[derive(Debug)]
pub struct CsvExtractionStore {
    path: PathBuf,
    columns: Vec<String>,
    /// Holds whether the file tail has been checked for a partial record
    lock: Mutex<bool>,
}

impl CsvExtractionStore {
    /// Create a store backed by the CSV file at `path`
    pub fn new(path: impl Into<PathBuf>, columns: Vec<String>) -> Self {
        Self {
            path: path.into(),
            columns,
            lock: Mutex::new(false),
        }
    }

    /// Create the store for a document type inside `dir`
    pub fn for_doc_type(dir: impl AsRef<Path>, doc_type: DocType) -> Self {
        let columns = doc_type.columns().into_iter().map(String::from).collect();
        Self::new(dir.as_ref().join(doc_type.structured_table_name()), columns)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Column names in table order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    fn check_header(&self) -> Result<bool> {
        let empty = fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);
        if empty {
            return Ok(true);
        }

        let mut reader = open_reader(&self.path)?;
        let header = reader.headers()?;
        if header.iter().ne(self.columns.iter().map(String::as_str)) {
            return Err(StoreError::InvalidData(format!(
                "Header of {} does not match the expected columns",
                self.path.display()
            )));
        }
        Ok(false)
    }
}

impl ExtractionStore for CsvExtractionStore {
    type Error = StoreError;

    fn already_processed(&self) -> Result<HashSet<String>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.path.exists() {
            return Ok(HashSet::new());
        }

        let mut reader = open_reader(&self.path)?;
        let key = reader
            .headers()?
            .iter()
            .position(|h| h == KEY_COLUMN)
            .ok_or_else(|| {
                StoreError::InvalidData(format!(
                    "{} has no {} column",
                    self.path.display(),
                    KEY_COLUMN
                ))
            })?;

        let mut ids = HashSet::new();
        for result in reader.records() {
            let record = result?;
            if let Some(id) = record.get(key).filter(|id| !id.is_empty()) {
                ids.insert(id.to_string());
            }
        }
        Ok(ids)
    }

    fn append(&self, records: &[StructuredRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let columns: Vec<&str> = self.columns.iter().map(String::as_str).collect();

        let mut sealed = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !*sealed {
            seal_tail(&self.path)?;
            *sealed = true;
        }
        let needs_header = self.check_header()?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        if needs_header {
            writer.write_record(&columns)?;
        }
        for record in records {
            writer.write_record(record.to_row(&columns))?;
        }
        let buffer = writer
            .into_inner()
            .map_err(|e| StoreError::Io(e.into_error()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&buffer)?;
        file.flush()?;

        debug!(rows = records.len(), path = %self.path.display(), "Appended structured rows");
        Ok(())
    }
}
