//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and its
//! collaborators. Implementations live in other crates: remote capabilities
//! in docket-llm, tables in docket-store.

use crate::document::{Embedding, StagedRecord};
use crate::schema::Schema;
use crate::structured::StructuredRecord;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Typed failure reason of a remote capability call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    /// The remote call failed or returned an error status
    #[error("Remote call failed: {0}")]
    RemoteCallFailed(String),

    /// Nothing to send
    #[error("Empty input")]
    EmptyInput,

    /// The response could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CapabilityError {
    fn from(err: serde_json::Error) -> Self {
        CapabilityError::Serialization(err.to_string())
    }
}

/// Text embedding capability
///
/// Implemented by the infrastructure layer (docket-llm)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one piece of text
    async fn embed(&self, text: &str) -> Result<Embedding, CapabilityError>;
}

/// Text generation capability
///
/// Implemented by the infrastructure layer (docket-llm)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a free-text completion
    async fn generate(&self, prompt: &str) -> Result<String, CapabilityError>;

    /// Generate a JSON object populating `schema`
    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &'static Schema,
    ) -> Result<String, CapabilityError>;
}

/// Markup to plain text normalisation
pub trait TextCleaner: Send + Sync {
    /// Strip markup and collapse whitespace
    fn clean(&self, markup: &str) -> String;
}

/// Append-only table of staged chunks
///
/// Implemented by the infrastructure layer (docket-store)
pub trait StagingStore: Send + Sync {
    /// Error type for store operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Ids of every document with at least one row
    fn staged_documents(&self) -> Result<HashSet<String>, Self::Error>;

    /// Whether a document has any rows
    fn is_staged(&self, document_id: &str) -> Result<bool, Self::Error> {
        Ok(self.staged_documents()?.contains(document_id))
    }

    /// Append one document's rows in chunk index order
    fn append(&self, document_id: &str, records: &[StagedRecord]) -> Result<(), Self::Error>;

    /// Every staged row grouped by document and ordered by chunk index
    fn load_documents(&self) -> Result<BTreeMap<String, Vec<StagedRecord>>, Self::Error>;
}

/// Append-only table of structured records
///
/// Implemented by the infrastructure layer (docket-store)
pub trait ExtractionStore: Send + Sync {
    /// Error type for store operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Ids of every document already written
    fn already_processed(&self) -> Result<HashSet<String>, Self::Error>;

    /// Append records, one row each
    fn append(&self, records: &[StructuredRecord]) -> Result<(), Self::Error>;
}
