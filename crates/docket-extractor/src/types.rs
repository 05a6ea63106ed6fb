//! Run reports

use docket_domain::DocType;
use serde::Serialize;

/// Outcome counts of one stage run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    /// Document type staged
    #[serde(serialize_with = "serialize_doc_type")]
    pub doc_type: DocType,

    /// Files found by discovery
    pub discovered: usize,

    /// Documents newly written to the staging table
    pub staged: usize,

    /// Documents already present in the staging table
    pub skipped: usize,

    /// Files that could not be read
    pub unreadable: usize,

    /// Files whose normalized text was empty
    pub empty: usize,

    /// Documents whose rows could not be written
    pub failed: usize,

    /// Rows written
    pub chunks_written: usize,

    /// Rows written with an empty embedding
    pub empty_embeddings: usize,
}

impl StageReport {
    /// An empty report for a document type
    pub fn new(doc_type: DocType) -> Self {
        Self {
            doc_type,
            discovered: 0,
            staged: 0,
            skipped: 0,
            unreadable: 0,
            empty: 0,
            failed: 0,
            chunks_written: 0,
            empty_embeddings: 0,
        }
    }
}

/// Outcome counts of one extract run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractReport {
    /// Document type extracted
    #[serde(serialize_with = "serialize_doc_type")]
    pub doc_type: DocType,

    /// Documents present in the staging table
    pub documents: usize,

    /// Documents already present in the structured table
    pub skipped: usize,

    /// Records written
    pub written: usize,

    /// Documents whose extraction failed
    pub omitted: usize,

    /// Records that could not be written
    pub failed_writes: usize,
}

impl ExtractReport {
    /// An empty report for a document type
    pub fn new(doc_type: DocType) -> Self {
        Self {
            doc_type,
            documents: 0,
            skipped: 0,
            written: 0,
            omitted: 0,
            failed_writes: 0,
        }
    }
}

fn serialize_doc_type<S: serde::Serializer>(doc_type: &DocType, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(doc_type.as_str())
}
