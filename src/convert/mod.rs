//! OCR conversion module.
//!
//! Sends each source through a [`DocumentAnalyzer`] and turns the analysis
//! into documents: one per extracted table, then one with the page text.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use docprep::convert::{JsonAnalyzer, MetaInput, OcrConverter, OcrOptions, Source};
//!
//! fn main() -> docprep::Result<()> {
//!     let converter = OcrConverter::new(Arc::new(JsonAnalyzer::new()), OcrOptions::default())?;
//!     let output = converter.run(&[Source::from("scan.analysis.json")], MetaInput::None)?;
//!     for doc in &output.documents {
//!         println!("{}", doc);
//!     }
//!     Ok(())
//! }
//! ```

mod analyzer;
mod options;
mod source;

pub use analyzer::{DocumentAnalyzer, JsonAnalyzer};
pub use options::{OcrOptions, DEFAULT_MODEL_ID};
pub use source::{merge_meta, MetaInput, Source};

use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::layout;
use crate::model::{AnalyzeResult, Document, Meta};

/// Documents and raw analyses produced by a conversion run.
#[derive(Debug, Clone, Default)]
pub struct ConversionOutput {
    /// Table documents (sorted by page) then the text document, per source
    pub documents: Vec<Document>,

    /// Serialized analysis result per converted source
    pub raw_analysis: Vec<Value>,
}

impl ConversionOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the output of another run.
    pub fn extend(&mut self, other: ConversionOutput) {
        self.documents.extend(other.documents);
        self.raw_analysis.extend(other.raw_analysis);
    }
}

/// Converts sources to documents through an analysis service.
pub struct OcrConverter {
    analyzer: Arc<dyn DocumentAnalyzer>,
    options: OcrOptions,
}

impl OcrConverter {
    /// Create a converter, rejecting unsupported option combinations.
    pub fn new(analyzer: Arc<dyn DocumentAnalyzer>, options: OcrOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { analyzer, options })
    }

    pub fn options(&self) -> &OcrOptions {
        &self.options
    }

    /// Name of the analyzer in use.
    pub fn analyzer_name(&self) -> &str {
        self.analyzer.name()
    }

    /// Convert sources.
    ///
    /// Sources that cannot be read are skipped with a warning. Analysis
    /// failures abort the run.
    pub fn run(&self, sources: &[Source], meta: impl Into<MetaInput>) -> Result<ConversionOutput> {
        let metas = meta.into().normalize(sources.len())?;
        let mut output = ConversionOutput::new();

        for (source, meta) in sources.iter().zip(metas) {
            let stream = match source.load() {
                Ok(stream) => stream,
                Err(e) => {
                    log::warn!("Could not read {}. Skipping it. Error: {}", source.describe(), e);
                    continue;
                }
            };

            log::debug!(
                "Analyzing {} ({} bytes) with {}",
                source.describe(),
                stream.len(),
                self.analyzer.name()
            );
            let result = self.analyzer.analyze(&self.options.model_id, &stream.data)?;
            output.raw_analysis.push(serde_json::to_value(&result)?);

            let merged = merge_meta(&stream.meta, meta, self.options.store_full_path);
            output.documents.extend(self.convert_result(&result, &merged)?);
        }

        Ok(output)
    }

    /// Convert an analysis result that is already at hand.
    pub fn convert_result(&self, result: &AnalyzeResult, meta: &Meta) -> Result<Vec<Document>> {
        layout::convert_result(result, meta, &self.options.layout)
    }
}

impl std::fmt::Debug for OcrConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OcrConverter")
            .field("analyzer", &self.analyzer.name())
            .field("options", &self.options)
            .finish()
    }
}
