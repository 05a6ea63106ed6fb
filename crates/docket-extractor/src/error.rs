//! Error types for the pipeline

use docket_domain::{CapabilityError, MergeError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while staging or extracting
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Remote capability error
    #[error("Capability error: {0}")]
    Capability(#[from] CapabilityError),

    /// Sub-records could not be merged
    #[error("Merge error: {0}")]
    Merge(#[from] MergeError),

    /// A parsed record violated its schema's constraints
    #[error("Invalid {schema} record: {reason}")]
    InvalidRecord {
        /// Schema name
        schema: &'static str,
        /// What was wrong
        reason: String,
    },

    /// Staging or extraction store error
    #[error("Store error: {0}")]
    Store(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Source directory does not exist
    #[error("Source directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::Capability(CapabilityError::from(e))
    }
}

impl ExtractorError {
    /// Wrap any store error
    pub fn store(err: impl std::error::Error) -> Self {
        ExtractorError::Store(err.to_string())
    }
}
