//! Parse model output into typed records

use crate::error::ExtractorError;
use docket_domain::SchemaRecord;

/// Parse a JSON response into a validated record
pub fn parse_record<T: SchemaRecord>(response: &str) -> Result<T, ExtractorError> {
    let json = extract_json(response);
    let record: T = serde_json::from_str(json)?;

    record
        .validate()
        .map_err(|reason| ExtractorError::InvalidRecord {
            schema: T::schema().name,
            reason,
        })?;
    Ok(record)
}

/// Extract the JSON object from a response
///
/// LLMs sometimes wrap JSON in markdown code blocks or surround it with prose.
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    let unfenced = match trimmed.strip_prefix("```") {
        Some(rest) => {
            // Drop the language tag line, then the closing fence
            let body = rest.split_once('\n').map_or("", |(_, body)| body);
            body.trim_end().strip_suffix("```").unwrap_or(body).trim()
        }
        None => trimmed,
    };

    match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => &unfenced[start..=end],
        _ => unfenced,
    }
}
