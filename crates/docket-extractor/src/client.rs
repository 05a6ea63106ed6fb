//! Typed extraction calls against an `LlmProvider`

use crate::error::ExtractorError;
use crate::parser::parse_record;
use crate::prompt::{ContextField, PromptBuilder};
use docket_domain::{CapabilityError, LlmProvider, SchemaRecord};
use std::sync::Arc;
use tracing::debug;

/// Issues one schema-constrained call per request and returns the typed record
pub struct SchemaClient<L> {
    llm: Arc<L>,
}

impl<L> Clone for SchemaClient<L> {
    fn clone(&self) -> Self {
        Self {
            llm: Arc::clone(&self.llm),
        }
    }
}

impl<L: LlmProvider> SchemaClient<L> {
    /// Create a new client over a shared provider
    pub fn new(llm: Arc<L>) -> Self {
        Self { llm }
    }

    /// Populate `T`'s schema from `text`
    ///
    /// Blank text fails with `EmptyInput` without calling the provider.
    pub async fn extract<T: SchemaRecord>(
        &self,
        text: &str,
        context: &[ContextField],
    ) -> Result<T, ExtractorError> {
        if text.trim().is_empty() {
            return Err(CapabilityError::EmptyInput.into());
        }

        let schema = T::schema();
        let prompt = PromptBuilder::new(schema, text).with_context(context).build();
        debug!(schema = schema.name, prompt_chars = prompt.len(), "Structured call");

        let response = self.llm.generate_structured(&prompt, schema).await?;
        parse_record(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_domain::{FinancialMetrics, Summary};
    use docket_llm::MockProvider;

    #[tokio::test]
    async fn test_extract_typed_record() {
        let llm = MockProvider::default()
            .with_schema_response("Summary", r#"{"summary": "Apple sells iPhones."}"#);
        let client = SchemaClient::new(Arc::new(llm));

        let summary: Summary = client.extract("Long text.", &[]).await.unwrap();
        assert_eq!(summary.summary, "Apple sells iPhones.");
    }

    #[tokio::test]
    async fn test_blank_text_is_empty_input() {
        let llm = Arc::new(MockProvider::default());
        let client = SchemaClient::new(Arc::clone(&llm));

        let err = client.extract::<Summary>("  ", &[]).await.unwrap_err();
        assert!(matches!(
            err,
            ExtractorError::Capability(CapabilityError::EmptyInput)
        ));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_remote_failure_is_typed() {
        let llm = MockProvider::default().with_failing_schema("FinancialMetrics");
        let client = SchemaClient::new(Arc::new(llm));

        let err = client
            .extract::<FinancialMetrics>("text", &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExtractorError::Capability(CapabilityError::RemoteCallFailed(_))
        ));
    }
}
