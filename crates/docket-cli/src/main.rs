//! Docket CLI - stage and extract SEC filings and regulatory texts.

use anyhow::Context;
use clap::Parser;
use docket_cli::{pipeline, Cli, Config, Formatter, Mode};
use docket_domain::DocType;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; the run report is the only stdout output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let path = Config::path()?;
    let config = Config::load_from(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    let provider = Arc::new(
        pipeline::build_provider(&config.llm).context("Failed to create model client")?,
    );
    let doc_type = DocType::from(cli.doc_type);
    let formatter = Formatter::new(config.output.format, config.output.color);

    let output = match cli.mode {
        Mode::Stage => {
            let report = pipeline::stage(&config.pipeline, doc_type, provider)
                .await
                .with_context(|| format!("Staging {} documents failed", doc_type))?;
            formatter.format_stage_report(&report)?
        }
        Mode::Extract => {
            let report = pipeline::extract(&config.pipeline, doc_type, provider)
                .await
                .with_context(|| format!("Extracting {} documents failed", doc_type))?;
            formatter.format_extract_report(&report)?
        }
    };

    println!("{}", output);
    Ok(())
}
