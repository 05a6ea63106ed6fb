//! Configuration for the staging and extraction pipeline

use crate::pool::default_width;
use docket_domain::DocType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Upper bound for default pool widths
const DEFAULT_WIDTH_CAP: usize = 5;

/// Configuration for the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Source directory of 10-K filings
    pub filings_dir: PathBuf,

    /// Source directory of regulatory texts
    pub directives_dir: PathBuf,

    /// Output directory of staging tables
    pub staged_dir: PathBuf,

    /// Output directory of structured tables
    pub structured_dir: PathBuf,

    /// Maximum chunk size (characters)
    pub max_chunk_size: usize,

    /// Width of the chunk embedding pool
    pub embed_workers: usize,

    /// Width of the document extraction pool
    pub extract_workers: usize,

    /// Summarization slice size (characters)
    pub summary_chunk_size: usize,

    /// Slices per summarization batch
    pub summary_batch_chunks: usize,

    /// Width of the summarization pool
    pub summary_workers: usize,

    /// File extensions picked up by discovery, without the dot
    pub extensions: Vec<String>,
}

impl PipelineConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_chunk_size == 0 {
            return Err("max_chunk_size must be greater than 0".to_string());
        }
        if self.summary_chunk_size == 0 {
            return Err("summary_chunk_size must be greater than 0".to_string());
        }
        if self.summary_batch_chunks == 0 {
            return Err("summary_batch_chunks must be greater than 0".to_string());
        }
        if self.embed_workers == 0 || self.extract_workers == 0 || self.summary_workers == 0 {
            return Err("worker counts must be greater than 0".to_string());
        }
        if self.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err("extensions must name at least one file type".to_string());
        }
        Ok(())
    }

    /// Source directory for a document type
    pub fn source_dir(&self, doc_type: DocType) -> &PathBuf {
        match doc_type {
            DocType::Filing => &self.filings_dir,
            DocType::Regulation => &self.directives_dir,
        }
    }

    /// Staging table path for a document type
    pub fn staged_table(&self, doc_type: DocType) -> PathBuf {
        self.staged_dir.join(doc_type.staged_table_name())
    }

    /// Structured table path for a document type
    pub fn structured_table(&self, doc_type: DocType) -> PathBuf {
        self.structured_dir.join(doc_type.structured_table_name())
    }

    /// Input budget of one summarization call (characters)
    pub fn summary_budget(&self) -> usize {
        self.summary_chunk_size * self.summary_batch_chunks
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            filings_dir: PathBuf::from("data/filings"),
            directives_dir: PathBuf::from("data/directives"),
            staged_dir: PathBuf::from("data/staged_chunks"),
            structured_dir: PathBuf::from("data/structured_data"),
            max_chunk_size: 6500,
            embed_workers: default_width(DEFAULT_WIDTH_CAP),
            extract_workers: 2,
            summary_chunk_size: 8000,
            summary_batch_chunks: 4,
            summary_workers: default_width(DEFAULT_WIDTH_CAP),
            extensions: ["html", "htm", "xml", "txt"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.embed_workers >= 1 && config.embed_workers <= 5);
        assert_eq!(config.summary_budget(), 32_000);
    }

    #[test]
    fn test_invalid_chunk_size() {
        let config = PipelineConfig {
            max_chunk_size: 0,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_worker_count() {
        let config = PipelineConfig {
            extract_workers: 0,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_extensions() {
        let config = PipelineConfig {
            extensions: vec![],
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_table_paths() {
        let config = PipelineConfig::default();
        assert_eq!(
            config.staged_table(DocType::Regulation),
            PathBuf::from("data/staged_chunks/regulations_staged.csv")
        );
        assert_eq!(
            config.structured_table(DocType::Filing),
            PathBuf::from("data/structured_data/filings_structured.csv")
        );
        assert_eq!(config.source_dir(DocType::Regulation), &config.directives_dir);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = PipelineConfig::from_toml("max_chunk_size = 1000\nextract_workers = 4\n").unwrap();
        assert_eq!(config.max_chunk_size, 1000);
        assert_eq!(config.extract_workers, 4);
        assert_eq!(config.summary_chunk_size, 8000);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = PipelineConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = PipelineConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}
