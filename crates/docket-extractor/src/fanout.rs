//! Concurrent chunk embedding with order-preserving reassembly

use crate::pool::WorkerPool;
use docket_domain::{Embedding, EmbeddingProvider};
use std::sync::Arc;
use tracing::{debug, warn};

/// Embeds every chunk of a document on the `embed` pool
///
/// A failed chunk yields an empty embedding at its index; siblings are
/// unaffected.
pub struct EmbeddingFanout<E> {
    embedder: Arc<E>,
    pool: WorkerPool,
}

impl<E: EmbeddingProvider> EmbeddingFanout<E> {
    /// Create a new fan-out over a shared embedder
    pub fn new(embedder: Arc<E>, workers: usize) -> Self {
        Self {
            embedder,
            pool: WorkerPool::new("embed", workers),
        }
    }

    /// Pool width
    pub fn width(&self) -> usize {
        self.pool.width()
    }

    /// Embed `chunks`, returning `(index, embedding)` in input order
    pub async fn embed_all(&self, document_id: &str, chunks: &[String]) -> Vec<(usize, Embedding)> {
        let embedder = &self.embedder;
        let results = self
            .pool
            .run_ordered(chunks, move |index, chunk| async move {
                let text = chunk.trim();
                if text.is_empty() {
                    return (index, Embedding::new());
                }

                match embedder.embed(text).await {
                    Ok(embedding) if embedding.iter().all(|v| v.is_finite()) => (index, embedding),
                    Ok(_) => {
                        warn!(document = document_id, chunk = index, "Embedding has non-finite values");
                        (index, Embedding::new())
                    }
                    Err(e) => {
                        warn!(document = document_id, chunk = index, "Embedding failed: {}", e);
                        (index, Embedding::new())
                    }
                }
            })
            .await;

        let failed = results.iter().filter(|(_, e)| e.is_empty()).count();
        debug!(
            document = document_id,
            chunks = results.len(),
            empty = failed,
            pool = self.pool.name(),
            "Embedded chunks"
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docket_domain::CapabilityError;
    use docket_llm::MockEmbedder;
    use std::time::Duration;

    /// Finishes chunks in reverse submission order
    struct ReversingEmbedder;

    #[async_trait]
    impl EmbeddingProvider for ReversingEmbedder {
        async fn embed(&self, text: &str) -> Result<Embedding, CapabilityError> {
            let index: u64 = text.trim_start_matches("chunk ").parse().unwrap();
            tokio::time::sleep(Duration::from_millis(60 - index * 10)).await;
            Ok(vec![index as f32])
        }
    }

    fn chunks(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("chunk {}", i)).collect()
    }

    #[tokio::test]
    async fn test_order_preserved_under_reversed_completion() {
        let fanout = EmbeddingFanout::new(Arc::new(ReversingEmbedder), 6);
        let results = fanout.embed_all("doc", &chunks(6)).await;

        for (position, (index, embedding)) in results.iter().enumerate() {
            assert_eq!(*index, position);
            assert_eq!(embedding, &vec![position as f32]);
        }
    }

    #[tokio::test]
    async fn test_always_failing_embedder() {
        let fanout = EmbeddingFanout::new(Arc::new(MockEmbedder::failing()), 3);
        let results = fanout.embed_all("doc", &chunks(5)).await;

        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|(_, e)| e.is_empty()));
        let indices: Vec<_> = results.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_single_failure_isolated() {
        let embedder = Arc::new(MockEmbedder::new(8).with_fail_marker("chunk 2"));
        let fanout = EmbeddingFanout::new(Arc::clone(&embedder), 2);
        let results = fanout.embed_all("doc", &chunks(4)).await;

        assert!(results[2].1.is_empty());
        assert!(results.iter().filter(|(i, _)| *i != 2).all(|(_, e)| e.len() == 8));
    }

    #[tokio::test]
    async fn test_blank_chunk_skips_call() {
        let embedder = Arc::new(MockEmbedder::new(4));
        let fanout = EmbeddingFanout::new(Arc::clone(&embedder), 2);
        let results = fanout
            .embed_all("doc", &["  ".to_string(), "text".to_string()])
            .await;

        assert!(results[0].1.is_empty());
        assert_eq!(results[1].1.len(), 4);
        assert_eq!(embedder.call_count(), 1);
    }
}
