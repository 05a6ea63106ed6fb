//! Docket Domain Layer
//!
//! This crate contains the value types and trait interfaces shared by every
//! other Docket crate. It carries no I/O: tables live in docket-store and
//! remote capabilities in docket-llm.
//!
//! ## Key Concepts
//!
//! - **Chunk**: a bounded-size slice of a document's normalized text
//! - **StagedRecord**: one chunk and its embedding, as persisted by staging
//! - **Schema**: a named, fixed set of typed fields an extraction call populates
//! - **StructuredRecord**: the merged row of every schema for one document
//!
//! ## Architecture
//!
//! - Pure data and validation only
//! - Trait definitions for all external interactions
//! - Dependencies limited to serialization, error derivation and async traits

#![warn(clippy::all)]

pub mod document;
pub mod records;
pub mod schema;
pub mod structured;
pub mod traits;

// Re-exports for convenience
pub use document::{Chunk, DocType, Embedding, StagedRecord};
pub use records::{
    AdministrativeInfo, FieldValue, FinancialMetrics, RegulatoryAnalysis, RiskAnalysis,
    SchemaRecord, Severity, StrategicLandscape, Summary,
};
pub use schema::{FieldKind, FieldSpec, Schema};
pub use structured::{MergeError, StructuredRecord, KEY_COLUMN};
pub use traits::{
    CapabilityError, EmbeddingProvider, ExtractionStore, LlmProvider, StagingStore, TextCleaner,
};
