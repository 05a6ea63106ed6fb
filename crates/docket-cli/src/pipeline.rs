//! Wiring of configuration, capabilities and stores into the two drivers.

use crate::config::LlmSettings;
use crate::error::Result;
use docket_domain::{DocType, EmbeddingProvider, LlmProvider};
use docket_extractor::{
    Chunker, EmbeddingFanout, ExtractDriver, ExtractReport, MarkupCleaner, PipelineConfig,
    SchemaClient, StageDriver, StageReport, StructuredExtractor, Summarizer,
};
use docket_llm::OllamaProvider;
use docket_store::{CsvExtractionStore, CsvStagingStore};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Build the Ollama client used for both embeddings and generation.
pub fn build_provider(settings: &LlmSettings) -> Result<OllamaProvider> {
    let provider = OllamaProvider::with_timeout(
        settings.endpoint.clone(),
        settings.model.clone(),
        Duration::from_secs(settings.timeout_secs),
    )?
    .with_embedding_model(settings.embedding_model.clone())
    .with_max_retries(settings.max_retries);

    info!(
        endpoint = %settings.endpoint,
        model = %settings.model,
        embedding_model = %settings.embedding_model,
        "Model client ready"
    );
    Ok(provider)
}

/// Stage every new document of `doc_type`.
pub async fn stage<E: EmbeddingProvider>(
    config: &PipelineConfig,
    doc_type: DocType,
    embedder: Arc<E>,
) -> Result<StageReport> {
    fs::create_dir_all(&config.staged_dir)?;

    let driver = StageDriver::new(
        EmbeddingFanout::new(embedder, config.embed_workers),
        MarkupCleaner,
        Chunker::new(config.max_chunk_size),
        config.extensions.clone(),
    );
    let store = CsvStagingStore::new(config.staged_table(doc_type));
    Ok(driver
        .run(config.source_dir(doc_type), doc_type, &store)
        .await?)
}

/// Extract one structured record per staged document of `doc_type`.
pub async fn extract<L: LlmProvider>(
    config: &PipelineConfig,
    doc_type: DocType,
    llm: Arc<L>,
) -> Result<ExtractReport> {
    fs::create_dir_all(&config.staged_dir)?;
    fs::create_dir_all(&config.structured_dir)?;

    let client = SchemaClient::new(llm);
    let summarizer = Summarizer::new(
        client.clone(),
        config.summary_chunk_size,
        config.summary_batch_chunks,
        config.summary_workers,
    );
    let driver = ExtractDriver::new(
        StructuredExtractor::new(client, summarizer),
        config.extract_workers,
    );

    let staging = CsvStagingStore::new(config.staged_table(doc_type));
    let output = CsvExtractionStore::for_doc_type(&config.structured_dir, doc_type);
    Ok(driver.run(doc_type, &staging, &output).await?)
}
