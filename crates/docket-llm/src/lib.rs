//! Docket LLM Provider Layer
//!
//! Remote capability implementations for the pipeline.
//!
//! # Architecture
//!
//! This crate provides implementations of the `LlmProvider` and
//! `EmbeddingProvider` traits from `docket-domain`. A single provider is
//! constructed at process start and shared behind an `Arc` by every
//! component that needs it.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock generation for testing
//! - `MockEmbedder`: Hash-based deterministic embeddings for testing
//! - `OllamaProvider`: Local Ollama API integration (generation and embeddings)
//!
//! # Examples
//!
//! ```
//! use docket_domain::schema::SUMMARY;
//! use docket_domain::traits::LlmProvider;
//! use docket_llm::MockProvider;
//!
//! # tokio_test::block_on(async {
//! let provider = MockProvider::new(r#"{"summary": "short"}"#);
//! let result = provider.generate_structured("long text", &SUMMARY).await.unwrap();
//! assert_eq!(result, r#"{"summary": "short"}"#);
//! # });
//! ```

#![warn(missing_docs)]

pub mod embedding;
pub mod ollama;

use async_trait::async_trait;
use docket_domain::schema::Schema;
use docket_domain::traits::{CapabilityError, LlmProvider};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

pub use embedding::MockEmbedder;
pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl From<LlmError> for CapabilityError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::InvalidResponse(msg) => CapabilityError::Serialization(msg),
            other => CapabilityError::RemoteCallFailed(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
enum Scripted {
    Respond(String),
    Fail,
}

/// Mock LLM provider for deterministic testing
///
/// Structured calls are answered per schema name, free-text calls with the
/// default response. Any call whose prompt contains a registered failure
/// marker fails with `RemoteCallFailed`. No network calls are made.
///
/// # Examples
///
/// ```
/// use docket_domain::schema::{FINANCIAL_METRICS, SUMMARY};
/// use docket_domain::traits::LlmProvider;
/// use docket_llm::MockProvider;
///
/// # tokio_test::block_on(async {
/// let provider = MockProvider::default()
///     .with_schema_response("Summary", r#"{"summary": "s"}"#)
///     .with_failing_schema("FinancialMetrics");
///
/// assert!(provider.generate_structured("text", &SUMMARY).await.is_ok());
/// assert!(provider.generate_structured("text", &FINANCIAL_METRICS).await.is_err());
/// assert_eq!(provider.call_count(), 2);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    schemas: Arc<Mutex<HashMap<String, Scripted>>>,
    failure_markers: Arc<Mutex<Vec<String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    call_count: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            schemas: Arc::new(Mutex::new(HashMap::new())),
            failure_markers: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Answer structured calls for a schema with a fixed response
    pub fn with_schema_response(
        self,
        schema_name: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.schemas
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(schema_name.into(), Scripted::Respond(response.into()));
        self
    }

    /// Fail every structured call for a schema
    pub fn with_failing_schema(self, schema_name: impl Into<String>) -> Self {
        self.schemas
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(schema_name.into(), Scripted::Fail);
        self
    }

    /// Fail every call whose prompt contains `marker`
    pub fn with_failure_marker(self, marker: impl Into<String>) -> Self {
        self.failure_markers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(marker.into());
        self
    }

    /// Get the number of calls made
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Every prompt received, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reset the call count and recorded prompts
    pub fn reset(&self) {
        self.call_count.store(0, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn record(&self, prompt: &str) -> Result<(), CapabilityError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());

        let markers = self
            .failure_markers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match markers.iter().find(|m| prompt.contains(m.as_str())) {
            Some(marker) => Err(CapabilityError::RemoteCallFailed(format!(
                "Mock failure on '{}'",
                marker
            ))),
            None => Ok(()),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn generate(&self, prompt: &str) -> Result<String, CapabilityError> {
        self.record(prompt)?;
        Ok(self.default_response.clone())
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &'static Schema,
    ) -> Result<String, CapabilityError> {
        self.record(prompt)?;

        let scripted = self
            .schemas
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(schema.name)
            .cloned();
        match scripted {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail) => Err(CapabilityError::RemoteCallFailed(format!(
                "Mock failure for schema {}",
                schema.name
            ))),
            None => Ok(self.default_response.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_domain::schema::{ADMINISTRATIVE_INFO, RISK_ANALYSIS};

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate("any prompt").await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_schema_responses() {
        let provider = MockProvider::default()
            .with_schema_response("AdministrativeInfo", "admin")
            .with_schema_response("RiskAnalysis", "risk");

        assert_eq!(
            provider
                .generate_structured("p", &ADMINISTRATIVE_INFO)
                .await
                .unwrap(),
            "admin"
        );
        assert_eq!(
            provider.generate_structured("p", &RISK_ANALYSIS).await.unwrap(),
            "risk"
        );
        assert_eq!(provider.generate("p").await.unwrap(), "Default mock response");
    }

    #[tokio::test]
    async fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.generate("prompt1").await.unwrap();
        provider.generate("prompt2").await.unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.prompts(), vec!["prompt1", "prompt2"]);

        provider.reset();
        assert_eq!(provider.call_count(), 0);
        assert!(provider.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_mock_provider_failure_marker() {
        let provider = MockProvider::default().with_failure_marker("Part 2/");

        assert!(provider.generate("Part 1/3: text").await.is_ok());
        let err = provider.generate("Part 2/3: text").await.unwrap_err();
        assert!(matches!(err, CapabilityError::RemoteCallFailed(_)));
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate("test").await.unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[test]
    fn test_llm_error_mapping() {
        let err: CapabilityError = LlmError::InvalidResponse("bad json".to_string()).into();
        assert_eq!(err, CapabilityError::Serialization("bad json".to_string()));

        let err: CapabilityError = LlmError::RateLimitExceeded.into();
        assert!(matches!(err, CapabilityError::RemoteCallFailed(_)));
    }
}
