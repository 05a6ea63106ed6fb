//! Stage phase: discover, normalise, chunk, embed, persist

use crate::chunking::Chunker;
use crate::error::ExtractorError;
use crate::fanout::EmbeddingFanout;
use crate::reader::{discover, document_id, read_document};
use crate::types::StageReport;
use docket_domain::{Chunk, DocType, EmbeddingProvider, StagedRecord, StagingStore, TextCleaner};
use std::path::Path;
use tracing::{error, info, warn};

/// Stages one source directory into one staging table
///
/// Documents are processed one at a time; chunks within a document are
/// embedded concurrently. A document with any row in the table is skipped.
pub struct StageDriver<E, C> {
    fanout: EmbeddingFanout<E>,
    cleaner: C,
    chunker: Chunker,
    extensions: Vec<String>,
}

impl<E: EmbeddingProvider, C: TextCleaner> StageDriver<E, C> {
    /// Create a new stage driver
    pub fn new(
        fanout: EmbeddingFanout<E>,
        cleaner: C,
        chunker: Chunker,
        extensions: Vec<String>,
    ) -> Self {
        Self {
            fanout,
            cleaner,
            chunker,
            extensions,
        }
    }

    /// Stage every new document under `source_dir`
    ///
    /// # Errors
    ///
    /// Only startup conditions are fatal: a missing source directory or an
    /// unreadable staging table. Per-document failures are counted in the
    /// report.
    pub async fn run<S: StagingStore>(
        &self,
        source_dir: &Path,
        doc_type: DocType,
        store: &S,
    ) -> Result<StageReport, ExtractorError> {
        let files = discover(source_dir, &self.extensions)?;
        let mut completed = store.staged_documents().map_err(ExtractorError::store)?;
        let mut report = StageReport::new(doc_type);
        report.discovered = files.len();

        info!(
            doc_type = doc_type.as_str(),
            files = files.len(),
            already_staged = completed.len(),
            "Staging {}",
            source_dir.display()
        );

        for path in files {
            let id = document_id(&path);
            if completed.contains(&id) {
                info!(document = %id, "Already staged, skipping");
                report.skipped += 1;
                continue;
            }

            let raw = match read_document(&path) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(document = %id, "Unreadable, skipping: {}", e);
                    report.unreadable += 1;
                    continue;
                }
            };

            let text = self.cleaner.clean(&raw);
            drop(raw);
            let chunks = self.chunker.chunk(&text);
            if chunks.is_empty() {
                warn!(document = %id, "No text after normalisation, skipping");
                report.empty += 1;
                continue;
            }

            let embeddings = self.fanout.embed_all(&id, &chunks).await;
            let records: Vec<StagedRecord> = chunks
                .into_iter()
                .zip(embeddings)
                .map(|(text, (index, embedding))| {
                    let chunk = Chunk {
                        document_id: id.clone(),
                        index,
                        text,
                    };
                    StagedRecord::from_chunk(chunk, embedding)
                })
                .collect();
            let empty_embeddings = records.iter().filter(|r| r.has_empty_embedding()).count();

            match store.append(&id, &records) {
                Ok(()) => {
                    info!(
                        document = %id,
                        chunks = records.len(),
                        empty_embeddings,
                        "Staged"
                    );
                    report.staged += 1;
                    report.chunks_written += records.len();
                    report.empty_embeddings += empty_embeddings;
                    completed.insert(id);
                }
                Err(e) => {
                    error!(document = %id, "Failed to write staged rows: {}", e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}
