//! Integration tests for token truncation.

use docprep::chunk::ChunkerOptions;
use docprep::truncate::TRUNCATED_KEY;
use docprep::{
    Document, DocumentTokenTruncater, Tokenizer, TruncaterOptions, TruncationStrategy,
    WhitespaceTokenizer,
};

/// Counts characters, one token per char.
struct CharTokenizer;

impl Tokenizer for CharTokenizer {
    type Token = char;

    fn encode(&self, text: &str) -> Vec<char> {
        text.chars().collect()
    }

    fn decode(&self, tokens: &[char]) -> String {
        tokens.iter().collect()
    }
}

#[test]
fn test_custom_tokenizer() {
    let truncater = DocumentTokenTruncater::new(CharTokenizer, TruncaterOptions::new(8));
    let docs = vec![Document::with_content("hello"), Document::with_content("world")];
    let result = truncater.run(&docs).unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result[0].content.as_deref(), Some("hello"));
    assert_eq!(result[1].content.as_deref(), Some("wor"));
    assert_eq!(result[1].meta[TRUNCATED_KEY], true);
}

#[test]
fn test_truncate_chunks_to_budget() {
    let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
    let chunks = docprep::chunk_documents(
        &[Document::with_content(text)],
        ChunkerOptions::new(20, 0).sequential(),
    )
    .unwrap();
    assert!(chunks.len() > 2);

    let result = docprep::truncate_documents(&chunks, TruncaterOptions::new(5)).unwrap();
    let kept_tokens: usize = result
        .iter()
        .filter_map(|d| d.content.as_deref())
        .map(|c| WhitespaceTokenizer.count(c))
        .sum();
    assert!(kept_tokens <= 5);
    assert!(result.len() < chunks.len());
}

#[test]
fn test_equal_strategy_marks_every_document() {
    let options = TruncaterOptions::new(4).with_strategy(TruncationStrategy::Equal);
    let docs = vec![
        Document::with_content("a b c d"),
        Document::with_content("e f g h"),
    ];
    let result = docprep::truncate_documents(&docs, options).unwrap();
    assert_eq!(result[0].content.as_deref(), Some("a b"));
    assert_eq!(result[1].content.as_deref(), Some("e f"));
    assert!(result.iter().all(|d| d.meta[TRUNCATED_KEY] == true));
}

#[test]
fn test_options_from_json() {
    let options: TruncaterOptions =
        serde_json::from_str(r#"{"max_token_len": 100, "strategy": "beginning"}"#).unwrap();
    assert_eq!(options.max_token_len, 100);
    assert_eq!(options.reserve_token_len, 0);
    assert_eq!(options.strategy, TruncationStrategy::Beginning);
    assert!(serde_json::from_str::<TruncaterOptions>(r#"{"strategy": "middle"}"#).is_err());
}

// ==================== Model Tokenizer ====================

#[cfg(feature = "hf-tokenizer")]
mod model_tokenizer {
    use super::*;
    use docprep::HfTokenizer;
    use std::path::PathBuf;

    fn fixture() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("word_level_tokenizer.json")
    }

    #[test]
    fn test_counts_model_tokens() {
        let tokenizer = HfTokenizer::from_file(fixture()).unwrap();
        // Punctuation is its own token, unlike whitespace splitting.
        assert_eq!(tokenizer.count("The scan was clean."), 5);
        assert_eq!(WhitespaceTokenizer.count("The scan was clean."), 4);
    }

    #[test]
    fn test_truncate_with_tokenizer_file() {
        let docs = vec![
            Document::with_content("The scan was clean."),
            Document::with_content("Tables came out fine."),
        ];
        let result =
            docprep::truncate_documents_with_tokenizer(&docs, fixture(), TruncaterOptions::new(7))
                .unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].content.as_deref(), Some("The scan was clean."));
        assert_eq!(result[1].content.as_deref(), Some("tables came"));
        assert_eq!(result[1].meta[TRUNCATED_KEY], true);
    }

    #[test]
    fn test_missing_tokenizer_file() {
        let result = docprep::truncate_documents_with_tokenizer(
            &[Document::with_content("x")],
            fixture().with_file_name("absent.json"),
            TruncaterOptions::new(7),
        );
        assert!(matches!(result, Err(docprep::Error::Tokenizer(_))));
    }
}
