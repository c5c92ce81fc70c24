//! Tokenizer abstraction used for token budgets.

/// Converts text to tokens and back.
///
/// Implementations wrap a model's tokenizer; only the token count and the
/// ability to decode a prefix or suffix matter to truncation.
pub trait Tokenizer: Send + Sync {
    type Token: Clone;

    /// Encode text into tokens.
    fn encode(&self, text: &str) -> Vec<Self::Token>;

    /// Decode tokens back into text.
    fn decode(&self, tokens: &[Self::Token]) -> String;

    /// Number of tokens in `text`.
    fn count(&self, text: &str) -> usize {
        self.encode(text).len()
    }
}

/// Treats every whitespace-separated word as one token.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    type Token = String;

    fn encode(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    fn decode(&self, tokens: &[String]) -> String {
        tokens.join(" ")
    }

    fn count(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}

impl<T: Tokenizer> Tokenizer for &T {
    type Token = T::Token;

    fn encode(&self, text: &str) -> Vec<Self::Token> {
        (**self).encode(text)
    }

    fn decode(&self, tokens: &[Self::Token]) -> String {
        (**self).decode(tokens)
    }

    fn count(&self, text: &str) -> usize {
        (**self).count(text)
    }
}
