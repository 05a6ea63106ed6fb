//! Two-level map-reduce summarization for documents too long for one call

use crate::chunking::split_at_char_limit;
use crate::client::SchemaClient;
use crate::pool::WorkerPool;
use docket_domain::{LlmProvider, Summary};
use tracing::{debug, info, warn};

/// Condenses long text so each extraction call stays within the input budget
///
/// The map step slices the text into `chunk_size`-character pieces, groups
/// them into batches of `batch_chunks`, and summarizes every batch on the
/// `summarize` pool. The reduce step runs only when the joined batch
/// summaries still exceed `chunk_size * batch_chunks`.
pub struct Summarizer<L> {
    client: SchemaClient<L>,
    chunk_size: usize,
    batch_chunks: usize,
    pool: WorkerPool,
}

impl<L: LlmProvider> Summarizer<L> {
    /// Create a new summarizer; zero sizes are treated as one
    pub fn new(client: SchemaClient<L>, chunk_size: usize, batch_chunks: usize, workers: usize) -> Self {
        Self {
            client,
            chunk_size: chunk_size.max(1),
            batch_chunks: batch_chunks.max(1),
            pool: WorkerPool::new("summarize", workers),
        }
    }

    /// Input budget of one call (characters)
    pub fn budget(&self) -> usize {
        self.chunk_size * self.batch_chunks
    }

    /// Whether `text` is too long to extract from in one call
    pub fn needs_summary(&self, text: &str) -> bool {
        text.chars().count() > self.budget()
    }

    /// Summarize `text`; never fails
    ///
    /// A failed batch contributes its raw text; a failed reduce returns the
    /// unreduced combined summary.
    pub async fn summarize(&self, document_id: &str, text: &str) -> String {
        let pieces = split_at_char_limit(text, self.chunk_size);
        let batches: Vec<String> = pieces
            .chunks(self.batch_chunks)
            .map(|batch| batch.join(" "))
            .collect();
        let total = batches.len();
        info!(
            document = document_id,
            batches = total,
            pool = self.pool.name(),
            "Summarizing {} characters",
            text.chars().count()
        );

        let client = &self.client;
        let summaries = self
            .pool
            .run_ordered(batches, move |index, batch| async move {
                let part = [("Part", format!("{}/{}", index + 1, total))];
                match client.extract::<Summary>(&batch, &part).await {
                    Ok(summary) => {
                        debug!(document = document_id, batch = index, "Batch summarized");
                        summary.summary
                    }
                    Err(e) => {
                        warn!(
                            document = document_id,
                            batch = index,
                            "Batch summary failed, keeping raw text: {}",
                            e
                        );
                        batch
                    }
                }
            })
            .await;

        let combined = summaries.join(" ");
        if combined.chars().count() <= self.budget() {
            return combined;
        }

        debug!(document = document_id, "Reducing combined summary");
        match self.client.extract::<Summary>(&combined, &[]).await {
            Ok(summary) => summary.summary,
            Err(e) => {
                warn!(
                    document = document_id,
                    "Reduce step failed, keeping combined summary: {}", e
                );
                combined
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_llm::MockProvider;
    use std::sync::Arc;

    fn summarizer(llm: &Arc<MockProvider>, chunk_size: usize, batch_chunks: usize) -> Summarizer<MockProvider> {
        Summarizer::new(SchemaClient::new(Arc::clone(llm)), chunk_size, batch_chunks, 3)
    }

    #[tokio::test]
    async fn test_short_text_single_call() {
        let llm = Arc::new(
            MockProvider::default().with_schema_response("Summary", r#"{"summary": "short"}"#),
        );
        let summarizer = summarizer(&llm, 100, 4);

        let text = "x".repeat(350);
        assert!(!summarizer.needs_summary(&text));
        assert_eq!(summarizer.summarize("doc", &text).await, "short");
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_batches_joined_in_order_with_fallback() {
        let llm = Arc::new(
            MockProvider::default()
                .with_schema_response("Summary", r#"{"summary": "s"}"#)
                .with_failure_marker("Part: 2/3"),
        );
        let summarizer = summarizer(&llm, 2, 2);

        // 10 characters -> 5 pieces -> batches of 2, 2, 1
        let result = summarizer.summarize("doc", "aabbccddee").await;

        // The combined "s cc dd s" exceeds the budget of 4 and is reduced
        assert_eq!(result, "s");
        assert_eq!(llm.call_count(), 4);
        let reduce_prompt = llm.prompts().pop().unwrap();
        assert!(reduce_prompt.contains("---\ns cc dd s\n---"));
    }

    #[tokio::test]
    async fn test_reduce_step_when_still_too_long() {
        let llm = Arc::new(
            MockProvider::default()
                .with_schema_response("Summary", r#"{"summary": "0123456789"}"#),
        );
        let summarizer = summarizer(&llm, 5, 2);

        // 4 batches of 10 characters each summarize to 10 characters: 43 > 10
        let text = "z".repeat(40);
        assert!(summarizer.needs_summary(&text));
        let result = summarizer.summarize("doc", &text).await;
        assert_eq!(result, "0123456789");
        assert!(result.chars().count() <= summarizer.budget());
        assert_eq!(llm.call_count(), 5);
    }

    #[tokio::test]
    async fn test_reduce_failure_returns_combined() {
        let llm = Arc::new(
            MockProvider::default()
                .with_schema_response("Summary", r#"{"summary": "0123456789"}"#)
                .with_failure_marker("0123456789 0123456789"),
        );
        let summarizer = summarizer(&llm, 5, 2);

        let result = summarizer.summarize("doc", &"z".repeat(20)).await;
        assert_eq!(result, "0123456789 0123456789");
    }
}
