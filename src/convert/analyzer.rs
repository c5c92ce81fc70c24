//! Document analysis backends.

use crate::error::{Error, Result};
use crate::model::AnalyzeResult;

/// A document-analysis (OCR) service.
///
/// Implement this trait to connect a remote analysis API. The converter only
/// needs the structured result; transport, authentication and polling stay
/// inside the implementation.
pub trait DocumentAnalyzer: Send + Sync {
    /// Get the name of this analyzer.
    fn name(&self) -> &str;

    /// Analyze a document with the given model.
    fn analyze(&self, model_id: &str, data: &[u8]) -> Result<AnalyzeResult>;
}

/// Reads previously saved analysis responses.
///
/// Each source is expected to hold the JSON of an analysis result, in either
/// the REST (camelCase) or SDK (snake_case) shape. Responses wrapped in an
/// `analyzeResult` envelope are unwrapped.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonAnalyzer;

impl JsonAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentAnalyzer for JsonAnalyzer {
    fn name(&self) -> &str {
        "json"
    }

    fn analyze(&self, model_id: &str, data: &[u8]) -> Result<AnalyzeResult> {
        let mut result = AnalyzeResult::from_json_slice(data)
            .map_err(|e| Error::Analysis(format!("Not a saved analysis response: {}", e)))?;

        if let Some(saved) = result.model_id.as_deref() {
            if saved != model_id {
                log::debug!(
                    "Saved analysis was produced by model '{}', requested '{}'",
                    saved,
                    model_id
                );
            }
        } else {
            result.model_id = Some(model_id.to_string());
        }

        Ok(result)
    }
}
