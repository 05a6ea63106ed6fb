//! Staging table: one row per chunk with its embedding

use crate::codec::{decode_embedding, encode_embedding};
use crate::table::{open_reader, seal_tail};
use crate::{Result, StoreError};
use docket_domain::traits::StagingStore;
use docket_domain::{DocType, StagedRecord};
use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// Header of every staging table
pub const STAGED_COLUMNS: [&str; 4] = ["file_name", "chunk_index", "chunk_text", "embedding"];

/// CSV-backed implementation of `StagingStore`
///
/// The file is created with its header on the first append. Reads and
/// appends share one mutex so a reader never observes half a batch.
/// Rows cut short by an interrupted write are skipped on load; their
/// document still counts as staged.
#[derive(Debug)]
pub struct CsvStagingStore {
    path: PathBuf,
    /// Holds whether the file tail has been checked for a partial record
    lock: Mutex<bool>,
}

impl CsvStagingStore {
    /// Create a store backed by the CSV file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(false),
        }
    }

    /// Create the store for a document type inside `dir`
    pub fn for_doc_type(dir: impl AsRef<Path>, doc_type: DocType) -> Self {
        Self::new(dir.as_ref().join(doc_type.staged_table_name()))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_rows(&self) -> Result<Vec<StagedRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = open_reader(&self.path)?;
        let mut rows = Vec::new();
        for (line, result) in reader.records().enumerate() {
            let row = line + 1;
            let record = result?;
            let document = record.get(0).unwrap_or_default();
            if record.len() != STAGED_COLUMNS.len() {
                warn!(
                    row,
                    document,
                    columns = record.len(),
                    "Skipping staged row with wrong column count"
                );
                continue;
            }
            let chunk_index = match record[1].parse::<usize>() {
                Ok(index) => index,
                Err(e) => {
                    warn!(row, document, "Skipping staged row with bad chunk_index: {}", e);
                    continue;
                }
            };
            let embedding = decode_embedding(&record[3]).unwrap_or_else(|e| {
                warn!(row, document, "Unreadable embedding, keeping chunk without it: {}", e);
                Vec::new()
            });
            rows.push(StagedRecord {
                document_id: document.to_string(),
                chunk_index,
                chunk_text: record[2].to_string(),
                embedding,
            });
        }
        Ok(rows)
    }

    fn encode_batch(records: &[StagedRecord], with_header: bool) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        if with_header {
            writer.write_record(STAGED_COLUMNS)?;
        }
        for record in records {
            let index = record.chunk_index.to_string();
            let embedding = encode_embedding(&record.embedding)?;
            writer.write_record([
                record.document_id.as_str(),
                index.as_str(),
                record.chunk_text.as_str(),
                embedding.as_str(),
            ])?;
        }
        writer
            .into_inner()
            .map_err(|e| StoreError::Io(e.into_error()))
    }
}

impl StagingStore for CsvStagingStore {
    type Error = StoreError;

    fn staged_documents(&self) -> Result<HashSet<String>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.path.exists() {
            return Ok(HashSet::new());
        }

        let mut reader = open_reader(&self.path)?;
        let mut ids = HashSet::new();
        for result in reader.records() {
            let record = result?;
            // A partial row still marks its document as staged
            if let Some(id) = record.get(0).filter(|id| !id.is_empty()) {
                ids.insert(id.to_string());
            }
        }
        Ok(ids)
    }

    fn append(&self, document_id: &str, records: &[StagedRecord]) -> Result<()> {
        if let Some(stray) = records.iter().find(|r| r.document_id != document_id) {
            return Err(StoreError::InvalidData(format!(
                "Row for '{}' in batch for '{}'",
                stray.document_id, document_id
            )));
        }
        if records.is_empty() {
            return Ok(());
        }

        let mut ordered = records.to_vec();
        ordered.sort_by_key(|r| r.chunk_index);

        let mut sealed = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !*sealed {
            seal_tail(&self.path)?;
            *sealed = true;
        }
        let needs_header = fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);
        let buffer = Self::encode_batch(&ordered, needs_header)?;

        let mut file: File = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&buffer)?;
        file.flush()?;

        debug!(document = document_id, rows = ordered.len(), "Appended staged rows");
        Ok(())
    }

    fn load_documents(&self) -> Result<BTreeMap<String, Vec<StagedRecord>>> {
        let rows = {
            let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.read_rows()?
        };

        let mut documents: BTreeMap<String, Vec<StagedRecord>> = BTreeMap::new();
        for row in rows {
            documents.entry(row.document_id.clone()).or_default().push(row);
        }
        for chunks in documents.values_mut() {
            chunks.sort_by_key(|r| r.chunk_index);
        }
        Ok(documents)
    }
}
