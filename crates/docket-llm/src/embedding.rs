//! Deterministic embedding capability for tests
//!
//! Generates hash-based embeddings so the staging pipeline can be exercised
//! end to end without a model server. The embeddings are:
//!
//! - **Deterministic**: Same text always produces same embedding
//! - **Normalized**: All vectors have unit length
//! - **Diverse**: Different texts produce different embeddings
//!
//! # Examples
//!
//! ```rust
//! use docket_domain::traits::EmbeddingProvider;
//! use docket_llm::MockEmbedder;
//!
//! # tokio_test::block_on(async {
//! let model = MockEmbedder::new(16);
//! let embedding = model.embed("The sky is blue").await.unwrap();
//! assert_eq!(embedding.len(), 16);
//! assert_eq!(embedding, model.embed("The sky is blue").await.unwrap());
//! # });
//! ```

use async_trait::async_trait;
use docket_domain::document::Embedding;
use docket_domain::traits::{CapabilityError, EmbeddingProvider};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Hash-based mock embedding capability
#[derive(Debug, Clone)]
pub struct MockEmbedder {
    dimension: usize,
    always_fail: bool,
    fail_marker: Option<String>,
    call_count: Arc<AtomicUsize>,
}

impl MockEmbedder {
    /// Create a new mock embedder
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            always_fail: false,
            fail_marker: None,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// An embedder whose every call fails
    pub fn failing() -> Self {
        Self {
            always_fail: true,
            ..Self::new(0)
        }
    }

    /// Fail calls whose text contains `marker`
    pub fn with_fail_marker(mut self, marker: impl Into<String>) -> Self {
        self.fail_marker = Some(marker.into());
        self
    }

    /// Get the number of calls made
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Hash text with a seed to get a deterministic f32 value
    fn hash_with_seed(text: &str, seed: u64) -> f32 {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        seed.hash(&mut hasher);
        let hash_value = hasher.finish();

        // Convert hash to float in range [-1, 1]
        let normalized = (hash_value as f64 / u64::MAX as f64) * 2.0 - 1.0;
        normalized as f32
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, CapabilityError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        let failed = self.always_fail
            || self
                .fail_marker
                .as_deref()
                .is_some_and(|marker| text.contains(marker));
        if failed {
            return Err(CapabilityError::RemoteCallFailed(
                "Mock embedding failure".to_string(),
            ));
        }
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut embedding: Embedding = (0..self.dimension)
            .map(|i| Self::hash_with_seed(text, i as u64))
            .collect();

        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut embedding {
                *value /= magnitude;
            }
        }

        Ok(embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_embedder_normalized() {
        let model = MockEmbedder::new(32);
        let embedding = model.embed("revenue grew").await.unwrap();
        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn test_mock_embedder_diverse() {
        let model = MockEmbedder::new(32);
        let a = model.embed("revenue grew").await.unwrap();
        let b = model.embed("revenue fell").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_mock_embedder_blank_text() {
        let model = MockEmbedder::new(32);
        assert!(model.embed("   ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mock_embedder_failures() {
        let model = MockEmbedder::failing();
        assert!(model.embed("anything").await.is_err());

        let model = MockEmbedder::new(8).with_fail_marker("poison");
        assert!(model.embed("clean text").await.is_ok());
        assert!(model.embed("poison pill").await.is_err());
        assert_eq!(model.call_count(), 2);
    }
}
