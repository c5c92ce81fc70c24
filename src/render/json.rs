//! JSON rendering for documents.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Document;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonFormat {
    /// Pretty-printed array with indentation
    #[default]
    Pretty,
    /// Compact array without extra whitespace
    Compact,
    /// One compact document per line
    Lines,
}

/// Convert documents to JSON, each in its flattened dictionary form.
pub fn to_json(documents: &[Document], format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(documents),
        JsonFormat::Compact => serde_json::to_string(documents),
        JsonFormat::Lines => documents
            .iter()
            .map(serde_json::to_string)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(|lines| lines.join("\n")),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Parse documents from a JSON array, a single JSON object, or JSON lines.
pub fn from_json(input: &str) -> Result<Vec<Document>> {
    let trimmed = input.trim_start();
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    if let Ok(document) = serde_json::from_str::<Document>(trimmed) {
        return Ok(vec![document]);
    }

    input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(i, line)| {
            serde_json::from_str(line)
                .map_err(|e| Error::InvalidDocument(format!("line {}: {}", i + 1, e)))
        })
        .collect()
}
