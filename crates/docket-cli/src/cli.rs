//! CLI argument parsing.

use clap::Parser;
use docket_domain::DocType;

/// Docket - stage and extract SEC filings and regulatory texts.
#[derive(Debug, Parser)]
#[command(name = "docket")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Pipeline phase to run
    #[arg(long, value_enum)]
    pub mode: Mode,

    /// Document type to process
    #[arg(long = "doc-type", alias = "doc_type", value_enum, default_value = "filing")]
    pub doc_type: DocTypeArg,
}

/// Pipeline phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Chunk, embed and stage new documents
    Stage,
    /// Extract one structured record per staged document
    Extract,
}

/// Document type argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DocTypeArg {
    /// Annual 10-K filings
    Filing,
    /// Regulatory and legislative texts
    Regulation,
}

impl From<DocTypeArg> for DocType {
    fn from(arg: DocTypeArg) -> Self {
        match arg {
            DocTypeArg::Filing => DocType::Filing,
            DocTypeArg::Regulation => DocType::Regulation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_required() {
        assert!(Cli::try_parse_from(["docket"]).is_err());
        assert!(Cli::try_parse_from(["docket", "--mode", "ingest"]).is_err());
    }

    #[test]
    fn test_doc_type_defaults_to_filing() {
        let cli = Cli::parse_from(["docket", "--mode", "stage"]);
        assert_eq!(cli.mode, Mode::Stage);
        assert_eq!(DocType::from(cli.doc_type), DocType::Filing);
    }

    #[test]
    fn test_extract_regulation() {
        let cli = Cli::parse_from(["docket", "--mode", "extract", "--doc-type", "regulation"]);
        assert_eq!(cli.mode, Mode::Extract);
        assert_eq!(DocType::from(cli.doc_type), DocType::Regulation);
    }

    #[test]
    fn test_underscore_alias() {
        let cli = Cli::parse_from(["docket", "--mode", "stage", "--doc_type", "regulation"]);
        assert_eq!(cli.doc_type, DocTypeArg::Regulation);
    }

    #[test]
    fn test_no_other_flags() {
        assert!(Cli::try_parse_from(["docket", "--mode", "stage", "--workers", "4"]).is_err());
    }
}
