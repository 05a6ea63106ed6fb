//! Docket Extractor
//!
//! Turns directories of SEC 10-K filings and regulatory texts into two
//! append-only tables: staged chunks with embeddings, and one structured,
//! schema-constrained row per document.
//!
//! # Architecture
//!
//! ```text
//! stage:   files → MarkupCleaner → Chunker → EmbeddingFanout → StagingStore
//! extract: StagingStore → (Summarizer) → StructuredExtractor → ExtractionStore
//! ```
//!
//! # Key Features
//!
//! - **Resumable**: documents already present in an output table are skipped
//! - **Bounded concurrency**: named worker pools for embedding, summarization
//!   and document extraction, each sized by configuration
//! - **Order preserving**: chunk order survives any completion order
//! - **Local degradation**: a failed chunk gets an empty embedding, a failed
//!   batch summary keeps its raw text, a failed document is omitted and
//!   retried on the next run
//!
//! # Example Usage
//!
//! ```no_run
//! use docket_domain::DocType;
//! use docket_extractor::{
//!     Chunker, EmbeddingFanout, MarkupCleaner, PipelineConfig, StageDriver,
//! };
//! use docket_llm::MockEmbedder;
//! use docket_store::CsvStagingStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::default();
//! let fanout = EmbeddingFanout::new(Arc::new(MockEmbedder::new(384)), config.embed_workers);
//! let driver = StageDriver::new(
//!     fanout,
//!     MarkupCleaner,
//!     Chunker::new(config.max_chunk_size),
//!     config.extensions.clone(),
//! );
//!
//! let store = CsvStagingStore::new(config.staged_table(DocType::Filing));
//! let report = driver.run(&config.filings_dir, DocType::Filing, &store).await?;
//! println!("Staged: {} documents", report.staged);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod chunking;
mod client;
mod config;
mod error;
mod extract;
mod extractor;
mod fanout;
mod parser;
mod pool;
mod prompt;
mod reader;
mod stage;
mod summarize;
mod types;


pub use chunking::{split_at_char_limit, split_sentences, Chunker};
pub use client::SchemaClient;
pub use config::PipelineConfig;
pub use error::ExtractorError;
pub use extract::ExtractDriver;
pub use extractor::StructuredExtractor;
pub use fanout::EmbeddingFanout;
pub use parser::parse_record;
pub use pool::{default_width, WorkerPool};
pub use prompt::{ContextField, PromptBuilder};
pub use reader::{collapse_whitespace, discover, document_id, read_document, MarkupCleaner};
pub use stage::StageDriver;
pub use summarize::Summarizer;
pub use types::{ExtractReport, StageReport};
