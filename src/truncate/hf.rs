//! Hugging Face tokenizer backend.

use std::path::Path;

use super::tokenizer::Tokenizer;
use crate::error::{Error, Result};

/// Counts tokens with a model's `tokenizer.json`.
///
/// Special tokens are neither added on encode nor kept on decode, so counts
/// cover document text only.
#[derive(Clone)]
pub struct HfTokenizer {
    inner: tokenizers::Tokenizer,
}

impl HfTokenizer {
    /// Load a tokenizer from a `tokenizer.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let inner = tokenizers::Tokenizer::from_file(path).map_err(|e| {
            Error::Tokenizer(format!("Failed to load {}: {}", path.display(), e))
        })?;
        log::debug!("Loaded tokenizer from {}", path.display());
        Ok(Self { inner })
    }

    /// Load a tokenizer from its serialized JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        let inner: tokenizers::Tokenizer = json
            .parse()
            .map_err(|e| Error::Tokenizer(format!("Failed to parse tokenizer: {}", e)))?;
        Ok(Self { inner })
    }

    pub fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(true)
    }
}

impl From<tokenizers::Tokenizer> for HfTokenizer {
    fn from(inner: tokenizers::Tokenizer) -> Self {
        Self { inner }
    }
}

impl std::fmt::Debug for HfTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HfTokenizer")
            .field("vocab_size", &self.vocab_size())
            .finish()
    }
}

impl Tokenizer for HfTokenizer {
    type Token = u32;

    fn encode(&self, text: &str) -> Vec<u32> {
        match self.inner.encode(text, false) {
            Ok(encoding) => encoding.get_ids().to_vec(),
            Err(e) => {
                log::warn!("Tokenization failed, counting no tokens: {}", e);
                Vec::new()
            }
        }
    }

    fn decode(&self, tokens: &[u32]) -> String {
        self.inner.decode(tokens, true).unwrap_or_else(|e| {
            log::warn!("Failed to decode {} tokens: {}", tokens.len(), e);
            String::new()
        })
    }
}
