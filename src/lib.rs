//! # docprep
//!
//! Document preparation for retrieval pipelines.
//!
//! This library turns the output of a document-analysis (OCR) service into
//! plain text in a human reading order, splits text into bounded chunks, and
//! trims document batches to a token budget.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docprep::{chunk::ChunkerOptions, convert::OcrOptions};
//!
//! fn main() -> docprep::Result<()> {
//!     // Rebuild text and tables from a saved analysis response
//!     let docs = docprep::convert_file("scan.analysis.json", OcrOptions::default())?;
//!
//!     // Split into chunks of at most 500 characters
//!     let chunks = docprep::chunk_documents(&docs, ChunkerOptions::new(500, 50))?;
//!     println!("{} chunks", chunks.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Layout reconstruction**: natural or single-column reading order, with
//!   rows grouped by vertical proximity
//! - **Table handling**: tables as CSV, either inline or as separate documents
//!   with surrounding context
//! - **Recursive chunking**: separator priority lists, regex and sentence
//!   separators, overlap
//! - **Token truncation**: beginning, end or equal-share strategies, counting
//!   words or model tokens from a `tokenizer.json` (`hf-tokenizer` feature)
//! - **Parallel processing**: Uses Rayon to chunk many documents at once

pub mod chunk;
pub mod convert;
pub mod error;
pub mod layout;
pub mod model;
pub mod render;
pub mod truncate;

// Re-export commonly used types
pub use chunk::{ChunkerOptions, RecursiveChunker};
pub use convert::{
    ConversionOutput, DocumentAnalyzer, JsonAnalyzer, MetaInput, OcrConverter, OcrOptions, Source,
};
pub use error::{Error, Result};
pub use layout::{LayoutOptions, PageLayout, TableFormat};
pub use model::{
    AnalyzeResult, AnalyzedPage, BoundingRegion, ByteStream, Document, DocumentBuilder, Line, Meta,
    Paragraph, Point, SparseEmbedding, Span, Table, TableCell,
};
pub use render::{to_json, JsonFormat};
#[cfg(feature = "hf-tokenizer")]
pub use truncate::HfTokenizer;
pub use truncate::{
    DocumentTokenTruncater, Tokenizer, TruncaterOptions, TruncationStrategy, WhitespaceTokenizer,
};

use std::path::Path;
use std::sync::Arc;

/// Load a saved analysis response.
///
/// # Example
///
/// ```no_run
/// let result = docprep::load_analysis("scan.analysis.json").unwrap();
/// println!("Pages: {}", result.pages.len());
/// ```
pub fn load_analysis<P: AsRef<Path>>(path: P) -> Result<AnalyzeResult> {
    let data = std::fs::read(path)?;
    AnalyzeResult::from_json_slice(&data)
}

/// Rebuild the text of a saved analysis response.
///
/// # Example
///
/// ```no_run
/// use docprep::LayoutOptions;
///
/// let text = docprep::extract_text("scan.analysis.json", &LayoutOptions::default()).unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P, options: &LayoutOptions) -> Result<String> {
    options.validate()?;
    let result = load_analysis(path)?;
    layout::reconstruct_text(&result, options)
}

/// Convert a saved analysis response into documents.
///
/// Table documents come first, sorted by page, followed by the text document.
pub fn convert_file<P: AsRef<Path>>(path: P, options: OcrOptions) -> Result<Vec<Document>> {
    let converter = OcrConverter::new(Arc::new(JsonAnalyzer::new()), options)?;
    let source = Source::from(path.as_ref());
    Ok(converter.run(&[source], MetaInput::None)?.documents)
}

/// Split documents into chunks.
pub fn chunk_documents(documents: &[Document], options: ChunkerOptions) -> Result<Vec<Document>> {
    let chunker = RecursiveChunker::new(options)?;
    Ok(chunker.run(documents))
}

/// Truncate documents to a token budget, counting whitespace-separated words.
pub fn truncate_documents(
    documents: &[Document],
    options: TruncaterOptions,
) -> Result<Vec<Document>> {
    DocumentTokenTruncater::new(WhitespaceTokenizer, options).run(documents)
}

/// Truncate documents to a token budget counted by a model's `tokenizer.json`.
#[cfg(feature = "hf-tokenizer")]
pub fn truncate_documents_with_tokenizer<P: AsRef<Path>>(
    documents: &[Document],
    tokenizer_path: P,
    options: TruncaterOptions,
) -> Result<Vec<Document>> {
    let tokenizer = HfTokenizer::from_file(tokenizer_path)?;
    DocumentTokenTruncater::new(tokenizer, options).run(documents)
}
