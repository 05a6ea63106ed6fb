//! Structured records: the merged, flat output row of the extract phase

use crate::document::DocType;
use crate::records::{FieldValue, SchemaRecord};
use crate::schema::{
    Schema, ADMINISTRATIVE_INFO, FINANCIAL_METRICS, REGULATORY_ANALYSIS, RISK_ANALYSIS,
    STRATEGIC_LANDSCAPE,
};
use thiserror::Error;

/// Name of the key column shared by every output table
pub const KEY_COLUMN: &str = "file_name";

/// Errors raised while merging sub-records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// Two sub-records populate the same field
    #[error("Field collision: {0}")]
    FieldCollision(String),
}

static FILING_SCHEMAS: [&Schema; 4] = [
    &ADMINISTRATIVE_INFO,
    &FINANCIAL_METRICS,
    &RISK_ANALYSIS,
    &STRATEGIC_LANDSCAPE,
];

static REGULATION_SCHEMAS: [&Schema; 1] = [&REGULATORY_ANALYSIS];

impl DocType {
    /// Schemas whose fields make up this document type's structured row
    pub fn schemas(&self) -> &'static [&'static Schema] {
        match self {
            DocType::Filing => &FILING_SCHEMAS,
            DocType::Regulation => &REGULATION_SCHEMAS,
        }
    }

    /// Column names of the structured table: key column, then schema fields
    pub fn columns(&self) -> Vec<&'static str> {
        std::iter::once(KEY_COLUMN)
            .chain(self.schemas().iter().flat_map(|s| s.field_names()))
            .collect()
    }
}

/// One merged row keyed by document id
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredRecord {
    /// Owning document (its source file name)
    pub document_id: String,

    fields: Vec<(&'static str, FieldValue)>,
}

impl StructuredRecord {
    /// Create an empty record for a document
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            fields: Vec::new(),
        }
    }

    /// Union a sub-record's fields into this record
    ///
    /// Fails without modifying the record if any incoming field is already
    /// present or names the key column.
    pub fn merge<R: SchemaRecord>(&mut self, record: R) -> Result<(), MergeError> {
        let incoming = record.into_fields();
        for (name, _) in &incoming {
            if *name == KEY_COLUMN || self.get(name).is_some() {
                return Err(MergeError::FieldCollision(name.to_string()));
            }
        }
        self.fields.extend(incoming);
        Ok(())
    }

    /// Look up a merged field
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// Number of merged fields, excluding the key
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether nothing has been merged yet
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render the record as cells in the given column order
    ///
    /// Columns the record does not carry become empty cells.
    pub fn to_row(&self, columns: &[&str]) -> Vec<String> {
        columns
            .iter()
            .map(|column| {
                if *column == KEY_COLUMN {
                    self.document_id.clone()
                } else {
                    self.get(column).map(FieldValue::to_cell).unwrap_or_default()
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{FinancialMetrics, Summary};

    fn metrics() -> FinancialMetrics {
        FinancialMetrics {
            revenue: 391_035_000_000.0,
            net_income: 93_736_000_000.0,
            operating_cash_flow: 118_254_000_000.0,
            capital_expenditure: 9_447_000_000.0,
            eps: 6.08,
            pe_ratio: None,
        }
    }

    #[test]
    fn test_merge_and_row() {
        let mut record = StructuredRecord::new("AAPL_10K.htm");
        record.merge(metrics()).unwrap();
        assert_eq!(record.len(), 6);

        let row = record.to_row(&["file_name", "eps", "pe_ratio", "company_name"]);
        assert_eq!(row, vec!["AAPL_10K.htm", "6.08", "", ""]);
    }

    #[test]
    fn test_merge_collision_fails_loudly() {
        let mut record = StructuredRecord::new("AAPL_10K.htm");
        record.merge(metrics()).unwrap();

        let err = record.merge(metrics()).unwrap_err();
        assert_eq!(err, MergeError::FieldCollision("revenue".to_string()));
        assert_eq!(record.len(), 6);
    }

    #[test]
    fn test_merge_rejects_key_column() {
        #[derive(Clone, serde::Serialize, serde::Deserialize)]
        struct Keyed {
            file_name: String,
        }

        impl SchemaRecord for Keyed {
            fn schema() -> &'static Schema {
                &crate::schema::SUMMARY
            }

            fn into_fields(self) -> Vec<(&'static str, FieldValue)> {
                vec![("file_name", FieldValue::Text(self.file_name))]
            }
        }

        let mut record = StructuredRecord::new("doc.htm");
        let err = record
            .merge(Keyed {
                file_name: "other.htm".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, MergeError::FieldCollision(name) if name == "file_name"));
        assert!(record.is_empty());

        record
            .merge(Summary {
                summary: "short".to_string(),
            })
            .unwrap();
        assert_eq!(record.get("summary").and_then(FieldValue::as_text), Some("short"));
    }

    #[test]
    fn test_columns() {
        let filing = DocType::Filing.columns();
        assert_eq!(filing.len(), 1 + 23);
        assert_eq!(filing[0], "file_name");
        assert_eq!(filing[1], "company_name");
        assert_eq!(*filing.last().unwrap(), "major_investments_acquisitions");

        let regulation = DocType::Regulation.columns();
        assert_eq!(regulation.len(), 1 + 10);
        assert_eq!(regulation[2], "law_name");
    }

    #[test]
    fn test_schemas_are_the_shared_constants() {
        let filing = DocType::Filing.schemas();
        assert_eq!(filing.len(), 4);
        assert!(std::ptr::eq(filing[0], &ADMINISTRATIVE_INFO));
        assert!(std::ptr::eq(filing[3], &STRATEGIC_LANDSCAPE));

        let regulation = DocType::Regulation.schemas();
        assert_eq!(regulation.len(), 1);
        assert!(std::ptr::eq(regulation[0], &REGULATORY_ANALYSIS));
    }
}
