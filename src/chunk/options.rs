//! Chunker options and configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Separator name that selects sentence-boundary splitting.
pub const SENTENCE_SEPARATOR: &str = "sentence";

/// Options for the recursive chunker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerOptions {
    /// Maximum chunk length in characters
    pub chunk_size: usize,

    /// Characters of the previous chunk repeated at the start of the next
    pub chunk_overlap: usize,

    /// Separators tried in priority order
    pub separators: Vec<String>,

    /// Re-attach the matched separator to the fragment before it
    pub keep_separator: bool,

    /// Treat separators as regular expressions
    pub is_separator_regex: bool,

    /// Whether to chunk documents in parallel
    pub parallel: bool,
}

impl ChunkerOptions {
    /// Create options with the given size and overlap and default separators.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            ..Self::default()
        }
    }

    /// Set the separators.
    pub fn with_separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable keeping separators.
    pub fn with_keep_separator(mut self, keep: bool) -> Self {
        self.keep_separator = keep;
        self
    }

    /// Treat separators as regular expressions.
    pub fn with_separator_regex(mut self, is_regex: bool) -> Self {
        self.is_separator_regex = is_regex;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Check size and overlap bounds.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig(
                "Chunk size must be greater than zero.".into(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::InvalidConfig(format!(
                "Overlap ({}) cannot be greater than or equal to the chunk size ({}).",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

impl Default for ChunkerOptions {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 0,
            separators: vec!["\n\n".into(), "\n".into(), ".".into(), " ".into()],
            keep_separator: true,
            is_separator_regex: false,
            parallel: true,
        }
    }
}
