//! Per-document structured extraction

use crate::client::SchemaClient;
use crate::error::ExtractorError;
use crate::summarize::Summarizer;
use docket_domain::{
    AdministrativeInfo, DocType, FinancialMetrics, LlmProvider, RegulatoryAnalysis, RiskAnalysis,
    StrategicLandscape, StructuredRecord,
};
use tracing::{debug, info, warn};

/// Produces one merged record per document
///
/// Filings need four sub-extractions. Administrative info comes first since
/// its ticker and sector are context for the risk and strategy calls; those
/// run concurrently with the financial metrics call. Regulations need one.
pub struct StructuredExtractor<L> {
    client: SchemaClient<L>,
    summarizer: Summarizer<L>,
}

impl<L: LlmProvider> StructuredExtractor<L> {
    /// Create a new extractor
    pub fn new(client: SchemaClient<L>, summarizer: Summarizer<L>) -> Self {
        Self { client, summarizer }
    }

    /// Extract a document's record, or `None` if any call failed
    ///
    /// Failures are logged here and never propagate; the document stays
    /// eligible for the next run.
    pub async fn process_document(
        &self,
        document_id: &str,
        text: &str,
        doc_type: DocType,
    ) -> Option<StructuredRecord> {
        match self.try_process(document_id, text, doc_type).await {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(document = document_id, "Omitting record: {}", e);
                None
            }
        }
    }

    /// Extract a document's record, surfacing the first failure
    pub async fn try_process(
        &self,
        document_id: &str,
        text: &str,
        doc_type: DocType,
    ) -> Result<StructuredRecord, ExtractorError> {
        info!(
            document = document_id,
            doc_type = doc_type.as_str(),
            "Processing {} characters",
            text.chars().count()
        );

        let summary;
        let text = if self.summarizer.needs_summary(text) {
            summary = self.summarizer.summarize(document_id, text).await;
            summary.as_str()
        } else {
            text
        };

        let mut record = StructuredRecord::new(document_id);
        match doc_type {
            DocType::Filing => {
                let admin: AdministrativeInfo = self.client.extract(text, &[]).await?;
                debug!(
                    document = document_id,
                    ticker = %admin.trading_symbol,
                    "Administrative info extracted"
                );

                let risk_context = [("Company Symbol", admin.trading_symbol.clone())];
                let strategy_context = [("Company Sector", admin.primary_sector.clone())];
                let (financials, risk, strategy) = tokio::join!(
                    self.client.extract::<FinancialMetrics>(text, &[]),
                    self.client.extract::<RiskAnalysis>(text, &risk_context),
                    self.client.extract::<StrategicLandscape>(text, &strategy_context),
                );

                record.merge(admin)?;
                record.merge(financials?)?;
                record.merge(risk?)?;
                record.merge(strategy?)?;
            }
            DocType::Regulation => {
                let context = [("Document", document_id.to_string())];
                let analysis: RegulatoryAnalysis = self.client.extract(text, &context).await?;
                record.merge(analysis)?;
            }
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_domain::FieldValue;
    use docket_llm::MockProvider;
    use std::sync::Arc;

    const ADMIN: &str = r#"{
        "company_name": "Apple Inc.",
        "trading_symbol": "AAPL",
        "fiscal_year_end": "September 28, 2024",
        "state_of_incorporation": "California",
        "employer_id_no": "94-2404110",
        "address": "One Apple Park Way, Cupertino, California 95014",
        "phone_number": "(408) 996-1010",
        "exchange": "The Nasdaq Stock Market LLC",
        "primary_sector": "Information Technology"
    }"#;

    const FINANCIALS: &str = r#"{
        "revenue": 391035000000,
        "net_income": 93736000000,
        "operating_cash_flow": 118254000000,
        "capital_expenditure": 9447000000,
        "eps": 6.08
    }"#;

    const RISK: &str = r#"```json
    {
        "risk_level": "Medium",
        "top_3_risk_factors": ["Supply chain concentration", "Regulation", "Competition"],
        "mitigation_suggestions": ["Diversify suppliers"],
        "confidence_score": 0.8
    }
    ```"#;

    const STRATEGY: &str = r#"{
        "key_rivals": ["Samsung", "Google", "Microsoft"],
        "competitive_advantage": "Integrated hardware and software ecosystem",
        "key_partners": ["TSMC", "Foxconn"],
        "major_investments_acquisitions": []
    }"#;

    fn filing_provider() -> MockProvider {
        MockProvider::default()
            .with_schema_response("AdministrativeInfo", ADMIN)
            .with_schema_response("FinancialMetrics", FINANCIALS)
            .with_schema_response("RiskAnalysis", RISK)
            .with_schema_response("StrategicLandscape", STRATEGY)
    }

    fn extractor(llm: &Arc<MockProvider>, budget_chunk: usize) -> StructuredExtractor<MockProvider> {
        let client = SchemaClient::new(Arc::clone(llm));
        let summarizer = Summarizer::new(client.clone(), budget_chunk, 4, 2);
        StructuredExtractor::new(client, summarizer)
    }

    #[tokio::test]
    async fn test_filing_merges_four_schemas() {
        let llm = Arc::new(filing_provider());
        let extractor = extractor(&llm, 8000);

        let record = extractor
            .try_process("AAPL_10K.htm", "Apple Inc. annual report.", DocType::Filing)
            .await
            .unwrap();

        assert_eq!(record.len(), 23);
        assert_eq!(
            record.get("trading_symbol"),
            Some(&FieldValue::Text("AAPL".to_string()))
        );
        assert_eq!(record.get("pe_ratio"), Some(&FieldValue::Missing));
        assert_eq!(record.get("risk_level").and_then(FieldValue::as_text), Some("Medium"));
        assert_eq!(llm.call_count(), 4);

        let prompts = llm.prompts();
        assert!(prompts[0].starts_with("Extract administrative info"));
        assert!(prompts.iter().any(|p| p.contains("Company Symbol: AAPL")));
        assert!(prompts
            .iter()
            .any(|p| p.contains("Company Sector: Information Technology")));
    }

    #[tokio::test]
    async fn test_regulation_carries_document_name() {
        let llm = Arc::new(MockProvider::default().with_schema_response(
            "RegulatoryAnalysis",
            r#"{
                "country_region": "European Union",
                "law_name": "Artificial Intelligence Act",
                "primary_subject": "AI Regulation",
                "key_requirements_summary": "Risk-based obligations for AI systems",
                "affected_sectors": ["Technology"],
                "potential_impact_severity": "High",
                "compliance_deadline": "2026-08-02"
            }"#,
        ));
        let extractor = extractor(&llm, 8000);

        let record = extractor
            .process_document("EU_AI_Act.html", "Article 1. Subject matter.", DocType::Regulation)
            .await
            .unwrap();

        assert_eq!(record.len(), 10);
        assert_eq!(
            record.get("estimated_compliance_cost"),
            Some(&FieldValue::Missing)
        );
        assert!(llm.prompts()[0].contains("Document: EU_AI_Act.html"));
    }

    #[tokio::test]
    async fn test_sub_extraction_failure_omits_record() {
        let llm = Arc::new(filing_provider().with_failing_schema("RiskAnalysis"));
        let extractor = extractor(&llm, 8000);

        let record = extractor
            .process_document("AAPL_10K.htm", "Apple Inc. annual report.", DocType::Filing)
            .await;
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn test_admin_failure_skips_dependent_calls() {
        let llm = Arc::new(filing_provider().with_failing_schema("AdministrativeInfo"));
        let extractor = extractor(&llm, 8000);

        assert!(extractor
            .process_document("AAPL_10K.htm", "text", DocType::Filing)
            .await
            .is_none());
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_long_text_is_summarized_first() {
        let llm = Arc::new(
            filing_provider().with_schema_response("Summary", r#"{"summary": "Apple summary."}"#),
        );
        // Budget of 4 * 10 characters
        let extractor = extractor(&llm, 10);

        let text = "Apple designs smartphones. ".repeat(5);
        let record = extractor
            .try_process("AAPL_10K.htm", &text, DocType::Filing)
            .await
            .unwrap();

        assert_eq!(record.len(), 23);
        let prompts = llm.prompts();
        assert!(prompts[0].starts_with("Summarize"));
        assert!(prompts
            .iter()
            .filter(|p| !p.starts_with("Summarize"))
            .all(|p| p.contains("---\nApple summary.\n---")));
    }
}
