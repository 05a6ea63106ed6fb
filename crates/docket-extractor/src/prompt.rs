//! Prompt construction for schema-constrained extraction

use docket_domain::Schema;

/// A labelled context line placed ahead of the text, e.g. `Company Symbol: AAPL`
pub type ContextField = (&'static str, String);

/// Builds prompts that ask the model to populate one schema
pub struct PromptBuilder<'a> {
    schema: &'static Schema,
    text: &'a str,
    context: &'a [ContextField],
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(schema: &'static Schema, text: &'a str) -> Self {
        Self {
            schema,
            text,
            context: &[],
        }
    }

    /// Add context lines; blank values are left out
    pub fn with_context(mut self, context: &'a [ContextField]) -> Self {
        self.context = context;
        self
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Task and field specification
        prompt.push_str(task_for(self.schema));
        prompt.push_str("\n\n");
        prompt.push_str(&format!(
            "Respond with a single JSON object for {} ({}) with these fields:\n",
            self.schema.name, self.schema.description
        ));
        for field in self.schema.fields {
            prompt.push_str(&format!(
                "- \"{}\" ({}, {}): {}\n",
                field.name,
                field.kind.type_name(),
                if field.required { "required" } else { "optional" },
                field.description
            ));
        }
        prompt.push('\n');

        // 2. Context
        let mut has_context = false;
        for (label, value) in self.context {
            if value.trim().is_empty() {
                continue;
            }
            prompt.push_str(&format!("{}: {}\n", label, value.trim()));
            has_context = true;
        }
        if has_context {
            prompt.push('\n');
        }

        // 3. The text to analyze
        prompt.push_str("Text:\n---\n");
        prompt.push_str(self.text);
        prompt.push_str("\n---\n\n");

        // 4. Output format reminder
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

/// Task line for a schema
fn task_for(schema: &Schema) -> &'static str {
    match schema.name {
        "AdministrativeInfo" => "Extract administrative info from this SEC filing.",
        "FinancialMetrics" => "Extract key financial metrics from this text.",
        "RiskAnalysis" => "Analyze the risks described in this text and provide structured output.",
        "StrategicLandscape" => {
            "Identify key rivals, advantages, partners, and major investments in this text."
        }
        "RegulatoryAnalysis" => {
            "Analyze the following legislative text and provide structured output."
        }
        "Summary" => SUMMARY_TASK,
        _ => "Extract the requested fields from this text.",
    }
}

const SUMMARY_TASK: &str = "Summarize the following text. Keep every company name, \
financial figure, date, risk, obligation and named party; drop boilerplate and repetition.";

const OUTPUT_FORMAT_REMINDER: &str = "Remember: Return ONLY valid JSON, \
no markdown code blocks, no explanations. Use [] for lists with no entries \
and omit optional fields you cannot determine.";
