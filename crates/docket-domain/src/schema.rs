//! Schema module - field descriptors for schema-constrained extraction
//!
//! Each schema is a process-wide constant describing the fields an
//! extraction call must populate. The descriptions are rendered into the
//! prompt, so they double as instructions to the model.

use std::fmt;

/// Semantic type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text
    Text,
    /// Floating-point number
    Float,
    /// Sequence of strings
    TextList,
    /// One of `Low`, `Medium`, `High`
    Severity,
}

impl FieldKind {
    /// Type name as shown to the model
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "string",
            FieldKind::Float => "number",
            FieldKind::TextList => "array of strings",
            FieldKind::Severity => "one of \"Low\", \"Medium\", \"High\"",
        }
    }
}

/// A single typed field of a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field (and output column) name
    pub name: &'static str,
    /// Semantic type
    pub kind: FieldKind,
    /// Whether the extraction must populate the field
    pub required: bool,
    /// Natural-language instruction for the field
    pub description: &'static str,
}

const fn required(name: &'static str, kind: FieldKind, description: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        required: true,
        description,
    }
}

const fn optional(name: &'static str, kind: FieldKind, description: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        required: false,
        description,
    }
}

/// A named, fixed set of typed fields
#[derive(Debug, PartialEq, Eq)]
pub struct Schema {
    /// Schema name
    pub name: &'static str,
    /// What the schema captures
    pub description: &'static str,
    /// Ordered fields; the order is also the output column order
    pub fields: &'static [FieldSpec],
}

impl Schema {
    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

use FieldKind::{Float, Severity, Text, TextList};

/// Administrative details from the filing cover page
pub static ADMINISTRATIVE_INFO: Schema = Schema {
    name: "AdministrativeInfo",
    description: "Administrative information from the cover page and Part I of an SEC filing",
    fields: &[
        required("company_name", Text, "Full legal name of the company"),
        required("trading_symbol", Text, "Stock ticker symbol"),
        required(
            "fiscal_year_end",
            Text,
            "Fiscal year end date (e.g., 'September 28, 2024')",
        ),
        required("state_of_incorporation", Text, "State where incorporated"),
        required("employer_id_no", Text, "Employer Identification Number (EIN)"),
        required("address", Text, "Company headquarters address"),
        required("phone_number", Text, "Company phone number"),
        required("exchange", Text, "Stock exchange listing"),
        required(
            "primary_sector",
            Text,
            "GICS sector of the company (e.g., Technology, Healthcare, Industrial)",
        ),
    ],
};

/// Headline financial figures
pub static FINANCIAL_METRICS: Schema = Schema {
    name: "FinancialMetrics",
    description: "Key financial metrics from MD&A and the financial statements",
    fields: &[
        required(
            "revenue",
            Float,
            "Total annual revenue in USD, give full numerical float values",
        ),
        required(
            "net_income",
            Float,
            "Annual net income in USD, give full numerical float values",
        ),
        required(
            "operating_cash_flow",
            Float,
            "Operating cash flow in USD, give full numerical float values",
        ),
        required(
            "capital_expenditure",
            Float,
            "Capital expenditures (CAPEX) in USD, give full numerical float values",
        ),
        required("eps", Float, "Diluted earnings per share (EPS)"),
        optional("pe_ratio", Float, "Price to earnings ratio (P/E), if it can be determined"),
    ],
};

/// Risk assessment of Item 1A
pub static RISK_ANALYSIS: Schema = Schema {
    name: "RiskAnalysis",
    description: "Structured risk assessment of the filing's risk factors",
    fields: &[
        required("risk_level", Severity, "Low, Medium, or High based on extracted risks"),
        required(
            "top_3_risk_factors",
            TextList,
            "The top 3 most critical risk factors mentioned in Item 1A",
        ),
        required(
            "mitigation_suggestions",
            TextList,
            "Risk mitigation strategies based on the filing and general market knowledge",
        ),
        required("confidence_score", Float, "Confidence in the analysis, between 0 and 1"),
    ],
};

/// Competitive environment and partnerships
pub static STRATEGIC_LANDSCAPE: Schema = Schema {
    name: "StrategicLandscape",
    description: "Competitive environment, partnerships and investments",
    fields: &[
        required(
            "key_rivals",
            TextList,
            "The company's primary competitors (3-5 names)",
        ),
        required(
            "competitive_advantage",
            Text,
            "Concise summary of the company's stated competitive advantage",
        ),
        required(
            "key_partners",
            TextList,
            "Named key suppliers, distributors, or strategic partners",
        ),
        required(
            "major_investments_acquisitions",
            TextList,
            "Major M&A activity or internal investments mentioned in the year",
        ),
    ],
};

/// Analysis of a single law, directive or regulation
pub static REGULATORY_ANALYSIS: Schema = Schema {
    name: "RegulatoryAnalysis",
    description: "Structured analysis of a single directive or law document",
    fields: &[
        required("country_region", Text, "Country or region issuing the law"),
        required("law_name", Text, "Official name of the regulation, act or directive"),
        required("primary_subject", Text, "The main topic of the law"),
        required(
            "key_requirements_summary",
            Text,
            "A concise summary of the 3-5 main obligations or requirements",
        ),
        required(
            "affected_sectors",
            TextList,
            "Industries most directly impacted",
        ),
        required("potential_impact_severity", Severity, "Low, Medium, or High"),
        optional(
            "specific_companies_mentioned",
            TextList,
            "Any S&P 500 companies explicitly mentioned",
        ),
        optional(
            "companies_that_could_be_impacted",
            TextList,
            "S&P 500 companies likely to be affected even if not named",
        ),
        optional(
            "compliance_deadline",
            Text,
            "Key implementation dates or deadlines",
        ),
        optional(
            "estimated_compliance_cost",
            Text,
            "Any mentioned compliance costs or budget allocations",
        ),
    ],
};

/// Free-text summary used by the summarization reducer
pub static SUMMARY: Schema = Schema {
    name: "Summary",
    description: "A dense summary preserving names, figures, dates and risks",
    fields: &[required(
        "summary",
        Text,
        "Summary of the text keeping every company name, financial figure, date, risk and obligation",
    )],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lookup() {
        let field = FINANCIAL_METRICS.field("pe_ratio").unwrap();
        assert_eq!(field.kind, FieldKind::Float);
        assert!(!field.required);
        assert!(FINANCIAL_METRICS.field("missing").is_none());
    }

    #[test]
    fn test_filing_schemas_have_disjoint_fields() {
        let schemas = [
            &ADMINISTRATIVE_INFO,
            &FINANCIAL_METRICS,
            &RISK_ANALYSIS,
            &STRATEGIC_LANDSCAPE,
        ];
        let mut seen = std::collections::HashSet::new();
        for schema in schemas {
            for name in schema.field_names() {
                assert!(seen.insert(name), "duplicate field {}", name);
            }
        }
        assert_eq!(seen.len(), 9 + 6 + 4 + 4);
    }

    #[test]
    fn test_regulatory_optional_fields() {
        let optional: Vec<_> = REGULATORY_ANALYSIS
            .fields
            .iter()
            .filter(|f| !f.required)
            .map(|f| f.name)
            .collect();
        assert_eq!(
            optional,
            vec![
                "specific_companies_mentioned",
                "companies_that_could_be_impacted",
                "compliance_deadline",
                "estimated_compliance_cost",
            ]
        );
    }
}
