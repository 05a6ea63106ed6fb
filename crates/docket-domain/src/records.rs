//! Typed extraction records, one per schema
//!
//! Each record deserializes from the JSON an extraction call returns,
//! validates itself against its schema's constraints, and flattens into
//! named [`FieldValue`]s for merging into a [`StructuredRecord`].
//!
//! [`StructuredRecord`]: crate::StructuredRecord

use crate::schema::{
    FieldKind, Schema, ADMINISTRATIVE_INFO, FINANCIAL_METRICS, REGULATORY_ANALYSIS, RISK_ANALYSIS,
    STRATEGIC_LANDSCAPE, SUMMARY,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single field value of a structured record
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Free text
    Text(String),
    /// Number
    Float(f64),
    /// Sequence of strings
    List(Vec<String>),
    /// Optional field left unpopulated
    Missing,
}

impl FieldValue {
    /// Render the value as a single table cell
    ///
    /// Lists are JSON arrays, missing values are empty cells.
    pub fn to_cell(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Float(v) => v.to_string(),
            FieldValue::List(items) => {
                serde_json::to_string(items).unwrap_or_else(|_| String::from("[]"))
            }
            FieldValue::Missing => String::new(),
        }
    }

    /// Borrow the text, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Option<f64>> for FieldValue {
    fn from(value: Option<f64>) -> Self {
        value.map(FieldValue::Float).unwrap_or(FieldValue::Missing)
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map(FieldValue::Text).unwrap_or(FieldValue::Missing)
    }
}

/// Low / Medium / High rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Low
    #[serde(alias = "low", alias = "LOW")]
    Low,
    /// Medium
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    /// High
    #[serde(alias = "high", alias = "HIGH")]
    High,
}

impl Severity {
    /// Get the rating as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record produced by one schema-constrained extraction call
pub trait SchemaRecord: Clone + Serialize + for<'de> Deserialize<'de> + Send + 'static {
    /// The schema this record populates
    fn schema() -> &'static Schema;

    /// Check the record against its schema
    ///
    /// Every required text field must be non-blank and every number finite;
    /// `check_values` then applies record-specific constraints.
    fn validate(&self) -> Result<(), String> {
        check_against_schema(Self::schema(), &self.clone().into_fields())?;
        self.check_values()
    }

    /// Value constraints the schema cannot express
    fn check_values(&self) -> Result<(), String> {
        Ok(())
    }

    /// Flatten into `(field name, value)` pairs in schema order
    fn into_fields(self) -> Vec<(&'static str, FieldValue)>;
}

fn check_against_schema(
    schema: &Schema,
    fields: &[(&'static str, FieldValue)],
) -> Result<(), String> {
    for (name, value) in fields {
        if let FieldValue::Float(v) = value {
            if !v.is_finite() {
                return Err(format!("{} is not a finite number", name));
            }
        }
    }

    for spec in schema.fields {
        if !spec.required || spec.kind != FieldKind::Text {
            continue;
        }
        let populated = fields
            .iter()
            .find(|(name, _)| *name == spec.name)
            .and_then(|(_, value)| value.as_text())
            .is_some_and(|text| !text.trim().is_empty());
        if !populated {
            return Err(format!("{} is empty", spec.name));
        }
    }
    Ok(())
}

/// Administrative details from the filing cover page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdministrativeInfo {
    pub company_name: String,
    pub trading_symbol: String,
    pub fiscal_year_end: String,
    pub state_of_incorporation: String,
    pub employer_id_no: String,
    pub address: String,
    pub phone_number: String,
    pub exchange: String,
    pub primary_sector: String,
}

impl SchemaRecord for AdministrativeInfo {
    fn schema() -> &'static Schema {
        &ADMINISTRATIVE_INFO
    }

    fn into_fields(self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("company_name", FieldValue::Text(self.company_name)),
            ("trading_symbol", FieldValue::Text(self.trading_symbol)),
            ("fiscal_year_end", FieldValue::Text(self.fiscal_year_end)),
            ("state_of_incorporation", FieldValue::Text(self.state_of_incorporation)),
            ("employer_id_no", FieldValue::Text(self.employer_id_no)),
            ("address", FieldValue::Text(self.address)),
            ("phone_number", FieldValue::Text(self.phone_number)),
            ("exchange", FieldValue::Text(self.exchange)),
            ("primary_sector", FieldValue::Text(self.primary_sector)),
        ]
    }
}

/// Headline financial figures, in USD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetrics {
    pub revenue: f64,
    pub net_income: f64,
    pub operating_cash_flow: f64,
    pub capital_expenditure: f64,
    pub eps: f64,
    #[serde(default)]
    pub pe_ratio: Option<f64>,
}

impl SchemaRecord for FinancialMetrics {
    fn schema() -> &'static Schema {
        &FINANCIAL_METRICS
    }

    fn into_fields(self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("revenue", FieldValue::Float(self.revenue)),
            ("net_income", FieldValue::Float(self.net_income)),
            ("operating_cash_flow", FieldValue::Float(self.operating_cash_flow)),
            ("capital_expenditure", FieldValue::Float(self.capital_expenditure)),
            ("eps", FieldValue::Float(self.eps)),
            ("pe_ratio", self.pe_ratio.into()),
        ]
    }
}

/// Risk assessment of the filing's risk factors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    pub risk_level: Severity,
    pub top_3_risk_factors: Vec<String>,
    pub mitigation_suggestions: Vec<String>,
    pub confidence_score: f64,
}

impl SchemaRecord for RiskAnalysis {
    fn schema() -> &'static Schema {
        &RISK_ANALYSIS
    }

    fn check_values(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence_score) {
            return Err(format!(
                "confidence_score {} out of range [0.0, 1.0]",
                self.confidence_score
            ));
        }
        Ok(())
    }

    fn into_fields(self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("risk_level", FieldValue::Text(self.risk_level.to_string())),
            ("top_3_risk_factors", FieldValue::List(self.top_3_risk_factors)),
            ("mitigation_suggestions", FieldValue::List(self.mitigation_suggestions)),
            ("confidence_score", FieldValue::Float(self.confidence_score)),
        ]
    }
}

/// Competitive environment and partnerships
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicLandscape {
    pub key_rivals: Vec<String>,
    pub competitive_advantage: String,
    pub key_partners: Vec<String>,
    pub major_investments_acquisitions: Vec<String>,
}

impl SchemaRecord for StrategicLandscape {
    fn schema() -> &'static Schema {
        &STRATEGIC_LANDSCAPE
    }

    fn into_fields(self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("key_rivals", FieldValue::List(self.key_rivals)),
            ("competitive_advantage", FieldValue::Text(self.competitive_advantage)),
            ("key_partners", FieldValue::List(self.key_partners)),
            (
                "major_investments_acquisitions",
                FieldValue::List(self.major_investments_acquisitions),
            ),
        ]
    }
}

/// Analysis of a single law, directive or regulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryAnalysis {
    pub country_region: String,
    pub law_name: String,
    pub primary_subject: String,
    pub key_requirements_summary: String,
    pub affected_sectors: Vec<String>,
    pub potential_impact_severity: Severity,
    #[serde(default)]
    pub specific_companies_mentioned: Vec<String>,
    #[serde(default)]
    pub companies_that_could_be_impacted: Vec<String>,
    #[serde(default)]
    pub compliance_deadline: Option<String>,
    #[serde(default)]
    pub estimated_compliance_cost: Option<String>,
}

impl SchemaRecord for RegulatoryAnalysis {
    fn schema() -> &'static Schema {
        &REGULATORY_ANALYSIS
    }

    fn into_fields(self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("country_region", FieldValue::Text(self.country_region)),
            ("law_name", FieldValue::Text(self.law_name)),
            ("primary_subject", FieldValue::Text(self.primary_subject)),
            ("key_requirements_summary", FieldValue::Text(self.key_requirements_summary)),
            ("affected_sectors", FieldValue::List(self.affected_sectors)),
            (
                "potential_impact_severity",
                FieldValue::Text(self.potential_impact_severity.to_string()),
            ),
            (
                "specific_companies_mentioned",
                FieldValue::List(self.specific_companies_mentioned),
            ),
            (
                "companies_that_could_be_impacted",
                FieldValue::List(self.companies_that_could_be_impacted),
            ),
            ("compliance_deadline", self.compliance_deadline.into()),
            ("estimated_compliance_cost", self.estimated_compliance_cost.into()),
        ]
    }
}

/// Output of one summarization call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub summary: String,
}

impl SchemaRecord for Summary {
    fn schema() -> &'static Schema {
        &SUMMARY
    }

    fn into_fields(self) -> Vec<(&'static str, FieldValue)> {
        vec![("summary", FieldValue::Text(self.summary))]
    }
}
