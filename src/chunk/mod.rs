//! Recursive text chunking module.
//!
//! Splits text into pieces of at most `chunk_size` characters by trying a
//! priority list of separators, recursing into fragments that are still too
//! long, and falling back to fixed-width windows when no separator applies.
//!
//! # Example
//!
//! ```
//! use docprep::chunk::{ChunkerOptions, RecursiveChunker};
//!
//! let options = ChunkerOptions::new(10, 0).with_separators([" "]);
//! let chunker = RecursiveChunker::new(options).unwrap();
//! assert_eq!(
//!     chunker.split_text("one two three four five"),
//!     vec!["one two ", "three ", "four five"]
//! );
//! ```

mod options;
mod separator;

pub use options::{ChunkerOptions, SENTENCE_SEPARATOR};
pub use separator::{Fragment, Separator};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde_json::Value;

use crate::error::Result;
use crate::model::Document;

/// Meta key linking a chunk back to the document it came from.
pub const ORIGINAL_ID_KEY: &str = "original_id";

/// Splits documents into bounded-size chunks.
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    options: ChunkerOptions,
    separators: Vec<Separator>,
}

impl RecursiveChunker {
    /// Create a chunker, validating sizes and compiling separators.
    pub fn new(options: ChunkerOptions) -> Result<Self> {
        options.validate()?;
        let separators = options
            .separators
            .iter()
            .map(|s| Separator::parse(s, options.is_separator_regex))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            options,
            separators,
        })
    }

    pub fn options(&self) -> &ChunkerOptions {
        &self.options
    }

    /// Split documents into chunk documents.
    ///
    /// Each chunk carries the parent's meta plus `original_id`. Documents
    /// without content are skipped with a warning. Output follows input order.
    pub fn run(&self, documents: &[Document]) -> Vec<Document> {
        if self.options.parallel && documents.len() > 1 {
            return self.run_parallel(documents);
        }
        self.run_sequential(documents)
    }

    fn run_sequential(&self, documents: &[Document]) -> Vec<Document> {
        documents
            .iter()
            .flat_map(|doc| self.chunk_document(doc))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn run_parallel(&self, documents: &[Document]) -> Vec<Document> {
        documents
            .par_iter()
            .map(|doc| self.chunk_document(doc))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn run_parallel(&self, documents: &[Document]) -> Vec<Document> {
        self.run_sequential(documents)
    }

    /// Split a single document.
    pub fn chunk_document(&self, document: &Document) -> Vec<Document> {
        let content = match document.content.as_deref() {
            Some(content) if !content.is_empty() => content,
            _ => {
                log::warn!(
                    "Document ID {} has an empty content. Skipping this document.",
                    document.id
                );
                return Vec::new();
            }
        };

        self.split_text(content)
            .into_iter()
            .map(|chunk| {
                let mut chunk_doc = Document::with_content_and_meta(chunk, document.meta.clone());
                chunk_doc
                    .meta
                    .insert(ORIGINAL_ID_KEY.into(), Value::String(document.id.clone()));
                chunk_doc
            })
            .collect()
    }

    /// Split text into chunks.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        match self.split_recursive(text) {
            Split::Separated(chunks) => self.apply_overlap(chunks),
            Split::Whole(chunks) | Split::Windows(chunks) => chunks,
        }
    }

    fn split_recursive(&self, text: &str) -> Split {
        let size = self.options.chunk_size;
        if char_len(text) <= size {
            return Split::Whole(vec![text.to_string()]);
        }

        for separator in &self.separators {
            let fragments: Vec<Fragment<'_>> = separator
                .split(text)
                .into_iter()
                .filter(|f| !f.is_blank())
                .collect();

            if fragments.is_empty() {
                return Split::Separated(Vec::new());
            }
            if fragments.len() == 1 {
                continue;
            }

            let keep = self.options.keep_separator && !separator.is_sentence();
            let mut chunks = Vec::new();
            let mut buffer = String::new();
            let mut buffer_len = 0;

            for fragment in fragments {
                let piece = if keep {
                    fragment.with_delimiter
                } else {
                    fragment.body
                };
                let piece_len = char_len(piece);

                if buffer_len + piece_len > size {
                    if !buffer.is_empty() {
                        chunks.push(std::mem::take(&mut buffer));
                        buffer_len = 0;
                    }
                    if piece_len > size {
                        chunks.extend(self.split_recursive(piece).into_chunks());
                    } else {
                        chunks.push(piece.to_string());
                    }
                } else {
                    buffer.push_str(piece);
                    buffer_len += piece_len;
                }
            }

            if !buffer.is_empty() {
                chunks.push(buffer);
            }
            return Split::Separated(chunks);
        }

        Split::Windows(self.fixed_windows(text))
    }

    /// Windows of `chunk_size` characters every `chunk_size - chunk_overlap`.
    fn fixed_windows(&self, text: &str) -> Vec<String> {
        let size = self.options.chunk_size;
        let step = size - self.options.chunk_overlap;

        let mut bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        let char_count = bounds.len();
        bounds.push(text.len());

        (0..char_count)
            .step_by(step)
            .map(|start| {
                let end = (start + size).min(char_count);
                text[bounds[start]..bounds[end]].to_string()
            })
            .collect()
    }

    /// Prefix every chunk after the first with the tail of its predecessor.
    fn apply_overlap(&self, chunks: Vec<String>) -> Vec<String> {
        let overlap = self.options.chunk_overlap;
        if overlap == 0 || chunks.len() < 2 {
            return chunks;
        }

        let mut overlapped = Vec::with_capacity(chunks.len());
        overlapped.push(chunks[0].clone());
        for pair in chunks.windows(2) {
            let tail = last_chars(&pair[0], overlap);
            overlapped.push(format!("{}{}", tail, pair[1]));
        }
        overlapped
    }
}

/// How a piece of text was split.
enum Split {
    /// Short enough to keep as is
    Whole(Vec<String>),
    /// Split on a separator
    Separated(Vec<String>),
    /// Fixed-width fallback, already overlapping
    Windows(Vec<String>),
}

impl Split {
    fn into_chunks(self) -> Vec<String> {
        match self {
            Split::Whole(chunks) | Split::Separated(chunks) | Split::Windows(chunks) => chunks,
        }
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn last_chars(text: &str, n: usize) -> &str {
    let len = char_len(text);
    if len <= n {
        return text;
    }
    match text.char_indices().nth(len - n) {
        Some((i, _)) => &text[i..],
        None => text,
    }
}
