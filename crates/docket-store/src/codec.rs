//! Cell encoding for embeddings

use crate::{Result, StoreError};
use docket_domain::Embedding;

/// Encode an embedding as a JSON array cell
pub fn encode_embedding(embedding: &[f32]) -> Result<String> {
    // serde_json would silently write NaN and infinities as null
    if embedding.iter().any(|v| !v.is_finite()) {
        return Err(StoreError::InvalidData(
            "Embedding contains non-finite values".to_string(),
        ));
    }
    serde_json::to_string(embedding)
        .map_err(|e| StoreError::InvalidData(format!("Unencodable embedding: {}", e)))
}

/// Decode an embedding cell; a blank cell is an empty embedding
pub fn decode_embedding(cell: &str) -> Result<Embedding> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(cell)
        .map_err(|e| StoreError::InvalidData(format!("Malformed embedding '{}': {}", cell, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_embedding_cell() {
        assert_eq!(encode_embedding(&[]).unwrap(), "[]");
        assert!(decode_embedding("[]").unwrap().is_empty());
        assert!(decode_embedding("").unwrap().is_empty());
    }

    #[test]
    fn test_decode_values() {
        assert_eq!(decode_embedding("[0.5, -1.0, 2]").unwrap(), vec![0.5, -1.0, 2.0]);
    }

    #[test]
    fn test_malformed_cell() {
        let err = decode_embedding("0.1;0.2").unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        assert!(encode_embedding(&[f32::NAN]).is_err());
    }
}
