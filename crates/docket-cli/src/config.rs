//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use docket_extractor::PipelineConfig;
use docket_llm::ollama::{
    DEFAULT_EMBEDDING_MODEL, DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES, DEFAULT_MODEL,
    DEFAULT_TIMEOUT_SECS,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "DOCKET_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG: &str = "docket.toml";

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Pipeline settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Model server settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// Report output settings
    #[serde(default)]
    pub output: OutputSettings,
}

/// Model server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Ollama base URL
    pub endpoint: String,

    /// Generation model
    pub model: String,

    /// Embedding model
    pub embedding_model: String,

    /// Attempts per remote call
    pub max_retries: u32,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Report format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl Config {
    /// Get the configuration file path.
    ///
    /// `DOCKET_CONFIG` wins, then `./docket.toml` if present, then the
    /// per-user config directory.
    pub fn path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let local = PathBuf::from(LOCAL_CONFIG);
        if local.exists() {
            return Ok(local);
        }
        let dir = dirs::config_dir()
            .ok_or_else(|| CliError::Config("Could not find config directory".into()))?;
        Ok(dir.join("docket").join("config.toml"))
    }

    /// Load configuration from file or fall back to defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from a specific file; a missing file means defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let contents = fs::read_to_string(path)?;
            toml::from_str(&contents)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate().map_err(CliError::Config)?;
        if self.llm.endpoint.trim().is_empty() {
            return Err(CliError::Config("llm.endpoint must not be empty".into()));
        }
        if self.llm.max_retries == 0 {
            return Err(CliError::Config("llm.max_retries must be at least 1".into()));
        }
        if self.llm.timeout_secs == 0 {
            return Err(CliError::Config("llm.timeout_secs must be greater than 0".into()));
        }
        Ok(())
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.endpoint, "http://localhost:11434");
        assert_eq!(config.pipeline.max_chunk_size, 6500);
        assert!(config.output.color);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_means_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.llm, LlmSettings::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("docket.toml");
        fs::write(
            &path,
            r#"
[pipeline]
filings_dir = "/srv/sec/10k"
extract_workers = 4

[llm]
model = "qwen2.5"

[output]
format = "json"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.pipeline.filings_dir, PathBuf::from("/srv/sec/10k"));
        assert_eq!(config.pipeline.extract_workers, 4);
        assert_eq!(config.pipeline.max_chunk_size, 6500);
        assert_eq!(config.llm.model, "qwen2.5");
        assert_eq!(config.llm.embedding_model, "nomic-embed-text");
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.color);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("docket.toml");

        fs::write(&path, "[pipeline]\nmax_chunk_size = 0\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(CliError::Config(_))));

        fs::write(&path, "[llm]\nmax_retries = 0\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(CliError::Config(_))));

        fs::write(&path, "[pipeline\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(CliError::Toml(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.llm.timeout_secs = 30;
        config.save(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.llm.timeout_secs, 30);
        assert_eq!(loaded.pipeline, config.pipeline);
    }
}
