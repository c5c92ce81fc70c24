//! Data model: analysis results from the OCR service and the documents
//! produced from them.
//!
//! Analysis types are read-only inputs; [`Document`] is the unit every
//! pipeline stage consumes and produces.

mod analysis;
mod document;
pub mod fingerprint;
mod table;

pub use analysis::{AnalyzeResult, AnalyzedPage, BoundingRegion, Line, Paragraph, Point, Span};
pub use document::{
    translate_legacy_fields, ByteStream, Document, DocumentBuilder, Meta, SparseEmbedding,
};
pub use table::{Table, TableCell};
