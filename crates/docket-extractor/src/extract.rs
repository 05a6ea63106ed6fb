//! Extract phase: staged chunks to one structured row per document

use crate::error::ExtractorError;
use crate::extractor::StructuredExtractor;
use crate::pool::WorkerPool;
use crate::types::ExtractReport;
use docket_domain::{DocType, ExtractionStore, LlmProvider, StagingStore};
use std::slice;
use tracing::{error, info};

enum Outcome {
    Written,
    Omitted,
    WriteFailed,
}

/// Extracts every staged document not yet in the structured table
///
/// Documents run concurrently on the `extract` pool. Each record is written
/// as soon as its document completes.
pub struct ExtractDriver<L> {
    extractor: StructuredExtractor<L>,
    pool: WorkerPool,
}

impl<L: LlmProvider> ExtractDriver<L> {
    /// Create a new extract driver
    pub fn new(extractor: StructuredExtractor<L>, workers: usize) -> Self {
        Self {
            extractor,
            pool: WorkerPool::new("extract", workers),
        }
    }

    /// Run one extraction pass
    ///
    /// # Errors
    ///
    /// Fails only if either table cannot be read.
    pub async fn run<S, X>(
        &self,
        doc_type: DocType,
        staging: &S,
        output: &X,
    ) -> Result<ExtractReport, ExtractorError>
    where
        S: StagingStore,
        X: ExtractionStore,
    {
        let documents = staging.load_documents().map_err(ExtractorError::store)?;
        let processed = output.already_processed().map_err(ExtractorError::store)?;

        let mut report = ExtractReport::new(doc_type);
        report.documents = documents.len();

        let pending: Vec<(String, String)> = documents
            .into_iter()
            .filter(|(id, _)| !processed.contains(id))
            .map(|(id, chunks)| {
                let text = chunks
                    .iter()
                    .map(|c| c.chunk_text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                (id, text)
            })
            .collect();
        report.skipped = report.documents - pending.len();

        info!(
            doc_type = doc_type.as_str(),
            pending = pending.len(),
            skipped = report.skipped,
            pool = self.pool.name(),
            "Extracting"
        );

        let extractor = &self.extractor;
        let outcomes = self
            .pool
            .run_ordered(pending, move |_, (id, text)| async move {
                let Some(record) = extractor.process_document(&id, &text, doc_type).await else {
                    return Outcome::Omitted;
                };
                match output.append(slice::from_ref(&record)) {
                    Ok(()) => {
                        info!(document = %id, "Structured record written");
                        Outcome::Written
                    }
                    Err(e) => {
                        error!(document = %id, "Failed to write structured record: {}", e);
                        Outcome::WriteFailed
                    }
                }
            })
            .await;

        for outcome in outcomes {
            match outcome {
                Outcome::Written => report.written += 1,
                Outcome::Omitted => report.omitted += 1,
                Outcome::WriteFailed => report.failed_writes += 1,
            }
        }
        Ok(report)
    }
}
