//! Docket Storage Layer
//!
//! Implements the `StagingStore` and `ExtractionStore` traits over flat,
//! append-only CSV tables.
//!
//! # Architecture
//!
//! - One staging table per document type: `file_name, chunk_index, chunk_text, embedding`
//! - One structured table per document type: `file_name` followed by schema fields
//! - Embeddings and string lists are stored as JSON arrays in a single cell
//! - Every physical append happens under a per-table mutex as one buffered write
//! - A partial record left by an interrupted write is tolerated on read and
//!   closed before the next append
//!
//! # Examples
//!
//! ```no_run
//! use docket_domain::DocType;
//! use docket_store::CsvStagingStore;
//!
//! let store = CsvStagingStore::for_doc_type("data/staged", DocType::Filing);
//! // Store is now ready for append and resume queries
//! ```

#![warn(missing_docs)]

mod codec;
pub mod extraction;
pub mod staging;
mod table;

use thiserror::Error;

pub use codec::{decode_embedding, encode_embedding};
pub use extraction::CsvExtractionStore;
pub use staging::CsvStagingStore;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding or decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
