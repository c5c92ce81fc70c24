//! Token-budget truncation module.
//!
//! Trims a batch of documents so their combined token count fits a model's
//! context window, less a reserved share for prompts.

#[cfg(feature = "hf-tokenizer")]
mod hf;
mod tokenizer;

#[cfg(feature = "hf-tokenizer")]
pub use hf::HfTokenizer;
pub use tokenizer::{Tokenizer, WhitespaceTokenizer};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::Document;

/// Meta key set on documents whose content was cut.
pub const TRUNCATED_KEY: &str = "truncated";

/// How documents are cut to fit the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TruncationStrategy {
    /// Drop tokens from the beginning, keeping the tail
    Beginning,
    /// Drop tokens from the end, keeping the head
    #[default]
    End,
    /// Give every document an equal share of the budget
    Equal,
}

impl TruncationStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TruncationStrategy::Beginning => "beginning",
            TruncationStrategy::End => "end",
            TruncationStrategy::Equal => "equal",
        }
    }
}

impl fmt::Display for TruncationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TruncationStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "beginning" => Ok(TruncationStrategy::Beginning),
            "end" => Ok(TruncationStrategy::End),
            "equal" => Ok(TruncationStrategy::Equal),
            other => Err(Error::InvalidConfig(format!(
                "strategy must be one of [beginning, end, equal], got '{}'",
                other
            ))),
        }
    }
}

/// Options for the token truncater.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TruncaterOptions {
    /// Maximum tokens across all documents
    pub max_token_len: usize,

    /// Tokens held back for other content such as prompt instructions
    pub reserve_token_len: usize,

    /// Truncation strategy
    pub strategy: TruncationStrategy,
}

impl TruncaterOptions {
    /// Create options with the given budget.
    pub fn new(max_token_len: usize) -> Self {
        Self {
            max_token_len,
            ..Self::default()
        }
    }

    /// Set the strategy.
    pub fn with_strategy(mut self, strategy: TruncationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the strategy by name, failing on unknown names.
    pub fn with_strategy_name(self, name: &str) -> Result<Self> {
        Ok(self.with_strategy(name.parse()?))
    }

    /// Set the reserved token count.
    pub fn with_reserve(mut self, reserve_token_len: usize) -> Self {
        self.reserve_token_len = reserve_token_len;
        self
    }

    /// Tokens left for documents, if any.
    pub fn available_tokens(&self) -> Option<usize> {
        self.max_token_len
            .checked_sub(self.reserve_token_len)
            .filter(|n| *n > 0)
    }
}

impl Default for TruncaterOptions {
    fn default() -> Self {
        Self {
            max_token_len: 512,
            reserve_token_len: 0,
            strategy: TruncationStrategy::End,
        }
    }
}

/// Truncates documents to fit a token budget.
#[derive(Debug, Clone)]
pub struct DocumentTokenTruncater<T: Tokenizer> {
    tokenizer: T,
    options: TruncaterOptions,
}

impl<T: Tokenizer> DocumentTokenTruncater<T> {
    /// Create a truncater.
    pub fn new(tokenizer: T, options: TruncaterOptions) -> Self {
        Self { tokenizer, options }
    }

    pub fn options(&self) -> &TruncaterOptions {
        &self.options
    }

    /// Truncate a batch of documents.
    ///
    /// Fails when reserving tokens leaves no budget.
    pub fn run(&self, documents: &[Document]) -> Result<Vec<Document>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let available = self.options.available_tokens().ok_or_else(|| {
            Error::Truncation(format!(
                "No tokens available after reserving {} of {} tokens",
                self.options.reserve_token_len, self.options.max_token_len
            ))
        })?;

        if self.options.strategy == TruncationStrategy::Equal {
            if let Some(truncated) = self.truncate_equally(documents, available) {
                return Ok(truncated);
            }
        }

        Ok(self.truncate_greedily(documents, available))
    }

    /// Split the budget evenly, or `None` when everything already fits.
    fn truncate_equally(&self, documents: &[Document], available: usize) -> Option<Vec<Document>> {
        let counts: Vec<Option<usize>> = documents
            .iter()
            .map(|doc| content_of(doc).map(|c| self.tokenizer.count(c)))
            .collect();
        let total: usize = counts.iter().flatten().sum();
        if total <= available {
            return None;
        }

        let with_content = counts.iter().flatten().count();
        let per_document = available / with_content;
        log::debug!(
            "Truncating {} documents to {} tokens each ({} over budget)",
            with_content,
            per_document,
            total - available
        );

        Some(
            documents
                .iter()
                .map(|doc| match content_of(doc) {
                    Some(content) => self.truncated(doc, content, per_document, TruncationStrategy::End),
                    None => doc.clone(),
                })
                .collect(),
        )
    }

    fn truncate_greedily(&self, documents: &[Document], available: usize) -> Vec<Document> {
        let mut kept = Vec::with_capacity(documents.len());
        let mut used = 0;

        for doc in documents {
            let Some(content) = content_of(doc) else {
                kept.push(doc.clone());
                continue;
            };

            let tokens = self.tokenizer.count(content);
            if used + tokens <= available {
                kept.push(doc.clone());
                used += tokens;
                continue;
            }

            let remaining = available - used;
            if remaining > 0 {
                kept.push(self.truncated(doc, content, remaining, self.options.strategy));
            }
            break;
        }

        kept
    }

    fn truncated(
        &self,
        doc: &Document,
        content: &str,
        max_tokens: usize,
        strategy: TruncationStrategy,
    ) -> Document {
        let tokens = self.tokenizer.encode(content);
        let text = if tokens.len() <= max_tokens {
            content.to_string()
        } else if strategy == TruncationStrategy::Beginning {
            self.tokenizer.decode(&tokens[tokens.len() - max_tokens..])
        } else {
            self.tokenizer.decode(&tokens[..max_tokens])
        };

        let mut meta = doc.meta.clone();
        meta.insert(TRUNCATED_KEY.into(), Value::Bool(true));
        Document::with_content_and_meta(text, meta)
    }
}

fn content_of(doc: &Document) -> Option<&str> {
    doc.content.as_deref().filter(|c| !c.is_empty())
}
