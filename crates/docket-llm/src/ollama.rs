//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's local API for both text generation
//! and embeddings.
//!
//! # Features
//!
//! - Async HTTP communication with Ollama API
//! - Configurable endpoint, generation model and embedding model
//! - JSON mode for schema-constrained generation
//! - Retry logic with exponential backoff
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use docket_llm::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3.1")
//!     .unwrap()
//!     .with_embedding_model("nomic-embed-text");
//! ```

use crate::LlmError;
use async_trait::async_trait;
use docket_domain::document::Embedding;
use docket_domain::schema::Schema;
use docket_domain::traits::{CapabilityError, EmbeddingProvider, LlmProvider};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default generation model
pub const DEFAULT_MODEL: &str = "llama3.1";

/// Default embedding model
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

/// Default timeout for requests (2 minutes; long filings are slow to summarize)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of attempts per call
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Ollama API provider for local inference
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    embedding_model: String,
    client: reqwest::Client,
    max_retries: u32,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

/// Request body for Ollama embeddings API
#[derive(Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

/// Response from Ollama embeddings API
#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embedding: Vec<f32>,
}

impl OllamaProvider {
    /// Create a new Ollama provider with the default timeout
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Generation model (e.g., "llama3.1", "mistral")
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Other` if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(endpoint, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new Ollama provider with an explicit request timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Create a new Ollama provider on `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the embedding model
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Set the maximum number of attempts per call
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Generate text using Ollama API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running
    /// - Model is not available
    /// - Network communication fails
    /// - Response format is invalid
    pub async fn generate_text(&self, prompt: &str) -> Result<String, LlmError> {
        let body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: None,
        };
        let response: OllamaGenerateResponse =
            self.post_with_retry("/api/generate", &body, &self.model).await?;
        Ok(response.response)
    }

    /// Generate a JSON object using Ollama's JSON mode
    pub async fn generate_json(&self, prompt: &str) -> Result<String, LlmError> {
        let body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: Some("json"),
        };
        let response: OllamaGenerateResponse =
            self.post_with_retry("/api/generate", &body, &self.model).await?;
        Ok(response.response)
    }

    /// Embed text using the embedding model
    pub async fn embed_text(&self, text: &str) -> Result<Embedding, LlmError> {
        let body = OllamaEmbedRequest {
            model: &self.embedding_model,
            prompt: text,
        };
        let response: OllamaEmbedResponse = self
            .post_with_retry("/api/embeddings", &body, &self.embedding_model)
            .await?;
        Ok(response.embedding)
    }

    async fn post_with_retry<B, R>(&self, path: &str, body: &B, model: &str) -> Result<R, LlmError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.endpoint, path);

        // Retry logic with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.post(&url).json(body).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.json::<R>().await.map_err(|e| {
                            LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                        });
                    } else if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(model.to_string()));
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(LlmError::RateLimitExceeded);
                    } else {
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                debug!(url = %url, attempt = attempts, "Retrying in {:?}", delay);
                tokio::time::sleep(delay).await;
            }
        }

        let err = last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string()));
        warn!(url = %url, attempts, "Giving up: {}", err);
        Err(err)
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn generate(&self, prompt: &str) -> Result<String, CapabilityError> {
        Ok(self.generate_text(prompt).await?)
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        _schema: &'static Schema,
    ) -> Result<String, CapabilityError> {
        // The schema is rendered into the prompt; JSON mode constrains the syntax
        Ok(self.generate_json(prompt).await?)
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaProvider {
    async fn embed(&self, text: &str) -> Result<Embedding, CapabilityError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.embed_text(text).await?)
    }
}
