//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use docket_extractor::{ExtractReport, StageReport};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the report of a stage run.
    pub fn format_stage_report(&self, report: &StageReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Table => {
                let rows = [
                    ("Discovered", report.discovered),
                    ("Staged", report.staged),
                    ("Already staged", report.skipped),
                    ("Unreadable", report.unreadable),
                    ("Empty", report.empty),
                    ("Write failures", report.failed),
                    ("Chunks written", report.chunks_written),
                    ("Empty embeddings", report.empty_embeddings),
                ];
                let degraded = report.unreadable + report.failed + report.empty_embeddings;
                Ok(self.render(
                    &format!("Stage {}", report.doc_type),
                    &rows,
                    degraded,
                ))
            }
        }
    }

    /// Format the report of an extract run.
    pub fn format_extract_report(&self, report: &ExtractReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Table => {
                let rows = [
                    ("Documents", report.documents),
                    ("Already extracted", report.skipped),
                    ("Written", report.written),
                    ("Omitted", report.omitted),
                    ("Write failures", report.failed_writes),
                ];
                let degraded = report.omitted + report.failed_writes;
                Ok(self.render(
                    &format!("Extract {}", report.doc_type),
                    &rows,
                    degraded,
                ))
            }
        }
    }

    fn render(&self, title: &str, rows: &[(&str, usize)], degraded: usize) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Outcome", "Count"]);
        for (label, count) in rows {
            builder.push_record([label.to_string(), count.to_string()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let summary = if degraded == 0 {
            self.success(title)
        } else {
            self.warning(&format!("{} ({} degraded)", title, degraded))
        };
        format!("{}\n{}", summary, table)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_domain::DocType;

    fn stage_report() -> StageReport {
        let mut report = StageReport::new(DocType::Filing);
        report.discovered = 3;
        report.staged = 2;
        report.skipped = 1;
        report.chunks_written = 41;
        report
    }

    #[test]
    fn test_stage_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_stage_report(&stage_report()).unwrap();
        assert!(output.starts_with("✓ Stage filing"));
        assert!(output.contains("Chunks written"));
        assert!(output.contains("41"));
    }

    #[test]
    fn test_degraded_run_warns() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut report = ExtractReport::new(DocType::Regulation);
        report.documents = 4;
        report.written = 3;
        report.omitted = 1;
        let output = formatter.format_extract_report(&report).unwrap();
        assert!(output.starts_with("⚠ Extract regulation (1 degraded)"));
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_stage_report(&stage_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["doc_type"], "filing");
        assert_eq!(value["chunks_written"], 41);
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.error("test"), "✗ test");
    }
}
