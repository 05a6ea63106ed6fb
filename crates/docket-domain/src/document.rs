//! Document module - document types, chunks and staged rows

use std::fmt;

/// An embedding vector. An empty vector denotes a failed or blank embedding.
pub type Embedding = Vec<f32>;

/// Kind of source document, which selects the extraction schemas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocType {
    /// SEC annual report (10-K)
    Filing,

    /// Legislative or regulatory text
    Regulation,
}

impl DocType {
    /// Get the document type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            DocType::Filing => "filing",
            DocType::Regulation => "regulation",
        }
    }

    /// Parse a document type from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "filing" => Some(DocType::Filing),
            "regulation" => Some(DocType::Regulation),
            _ => None,
        }
    }

    /// Plural stem used to name the output tables
    pub fn table_stem(&self) -> &'static str {
        match self {
            DocType::Filing => "filings",
            DocType::Regulation => "regulations",
        }
    }

    /// File name of the staging table for this document type
    pub fn staged_table_name(&self) -> String {
        format!("{}_staged.csv", self.table_stem())
    }

    /// File name of the structured table for this document type
    pub fn structured_table_name(&self) -> String {
        format!("{}_structured.csv", self.table_stem())
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid document type: {}", s))
    }
}

/// A bounded-size slice of a document's normalized text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Owning document (its source file name)
    pub document_id: String,

    /// Dense 0-based position within the document
    pub index: usize,

    /// Chunk text, never empty
    pub text: String,
}

/// One persisted row of the staging table
#[derive(Debug, Clone, PartialEq)]
pub struct StagedRecord {
    /// Owning document (its source file name)
    pub document_id: String,

    /// Position of the chunk within the document
    pub chunk_index: usize,

    /// Chunk text
    pub chunk_text: String,

    /// Embedding of the chunk text, empty on failure
    pub embedding: Embedding,
}

impl StagedRecord {
    /// Build a staged row from a chunk and its embedding
    pub fn from_chunk(chunk: Chunk, embedding: Embedding) -> Self {
        Self {
            document_id: chunk.document_id,
            chunk_index: chunk.index,
            chunk_text: chunk.text,
            embedding,
        }
    }

    /// Whether the embedding call for this row failed or was skipped
    pub fn has_empty_embedding(&self) -> bool {
        self.embedding.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_type_parsing() {
        assert_eq!(DocType::parse("filing"), Some(DocType::Filing));
        assert_eq!(DocType::parse("Regulation"), Some(DocType::Regulation));
        assert_eq!(DocType::parse("memo"), None);
        assert!("FILING".parse::<DocType>().is_ok());
        assert!("other".parse::<DocType>().is_err());
    }

    #[test]
    fn test_table_names() {
        assert_eq!(DocType::Filing.staged_table_name(), "filings_staged.csv");
        assert_eq!(DocType::Filing.structured_table_name(), "filings_structured.csv");
        assert_eq!(DocType::Regulation.staged_table_name(), "regulations_staged.csv");
        assert_eq!(
            DocType::Regulation.structured_table_name(),
            "regulations_structured.csv"
        );
    }

    #[test]
    fn test_staged_record_from_chunk() {
        let chunk = Chunk {
            document_id: "AAPL_10K.htm".to_string(),
            index: 3,
            text: "Revenue grew.".to_string(),
        };
        let record = StagedRecord::from_chunk(chunk, Vec::new());
        assert_eq!(record.document_id, "AAPL_10K.htm");
        assert_eq!(record.chunk_index, 3);
        assert!(record.has_empty_embedding());
    }
}
