//! OCR conversion options.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layout::{LayoutOptions, PageLayout, TableFormat};

/// Default analysis model.
pub const DEFAULT_MODEL_ID: &str = "prebuilt-read";

/// Options for OCR conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrOptions {
    /// Analysis model to request
    pub model_id: String,

    /// Keep the full `file_path` in meta instead of only the file name
    pub store_full_path: bool,

    /// Layout reconstruction settings
    #[serde(flatten)]
    pub layout: LayoutOptions,
}

impl OcrOptions {
    /// Create new OCR options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the analysis model.
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// Keep or shorten source paths.
    pub fn with_full_path(mut self, store_full_path: bool) -> Self {
        self.store_full_path = store_full_path;
        self
    }

    /// Set the reading order strategy.
    pub fn with_page_layout(mut self, layout: PageLayout) -> Self {
        self.layout.page_layout = layout;
        self
    }

    /// Set the row grouping threshold.
    pub fn with_threshold_y(mut self, threshold_y: f64) -> Self {
        self.layout.threshold_y = threshold_y;
        self
    }

    /// Set the table format.
    pub fn with_table_format(mut self, format: TableFormat) -> Self {
        self.layout.table_format = format;
        self
    }

    /// Enable or disable separate table extraction.
    pub fn with_tables_separately(mut self, separately: bool) -> Self {
        self.layout.extract_tables_separately = separately;
        self
    }

    /// Set the number of context lines kept around extracted tables.
    pub fn with_context_lines(mut self, preceding: usize, following: usize) -> Self {
        self.layout = self.layout.with_context_lines(preceding, following);
        self
    }

    /// Check for unsupported combinations.
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()
    }
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            store_full_path: false,
            layout: LayoutOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ocr_options_builder() {
        let options = OcrOptions::new()
            .with_model_id("prebuilt-layout")
            .with_full_path(true)
            .with_page_layout(PageLayout::SingleColumnByLine)
            .with_threshold_y(0.1)
            .with_tables_separately(false)
            .with_table_format(TableFormat::Text)
            .with_context_lines(5, 0);

        assert_eq!(options.model_id, "prebuilt-layout");
        assert!(options.store_full_path);
        assert_eq!(options.layout.page_layout, PageLayout::SingleColumnByLine);
        assert_eq!(options.layout.threshold_y, 0.1);
        assert_eq!(options.layout.preceding_context_len, 5);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let options = OcrOptions::default();
        assert_eq!(options.model_id, "prebuilt-read");
        assert!(!options.store_full_path);
        assert_eq!(options.layout.preceding_context_len, 3);
        assert_eq!(options.layout.following_context_len, 3);
        assert!(options.layout.extract_tables_separately);
    }

    #[test]
    fn test_from_json_flat_keys() {
        let options = OcrOptions::from_json(
            r#"{"model_id": "prebuilt-layout", "page_layout": "single_column", "threshold_y": 0.2}"#,
        )
        .unwrap();
        assert_eq!(options.model_id, "prebuilt-layout");
        assert_eq!(options.layout.page_layout, PageLayout::SingleColumnByLine);
        assert_eq!(options.layout.threshold_y, 0.2);
        assert_eq!(options.layout.table_format, TableFormat::Csv);
    }

    #[test]
    fn test_round_trip_json() {
        let options = OcrOptions::new().with_page_layout(PageLayout::SingleColumnByParagraph);
        let json = serde_json::to_string(&options).unwrap();
        assert!(json.contains("\"page_layout\":\"single_column_by_paragraph\""));
        assert_eq!(OcrOptions::from_json(&json).unwrap(), options);
    }

    #[test]
    fn test_text_tables_invalid_when_separate() {
        let options = OcrOptions::new().with_table_format(TableFormat::Text);
        assert!(options.validate().is_err());
    }
}
