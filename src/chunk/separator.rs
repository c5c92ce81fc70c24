//! Separators and text splitting.

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use super::options::SENTENCE_SEPARATOR;
use crate::error::Result;

/// A compiled separator.
#[derive(Debug, Clone)]
pub enum Separator {
    /// Exact string; the empty string splits between every character
    Literal(String),
    /// Regular expression; the matched text is the delimiter
    Regex(Regex),
    /// Unicode sentence boundaries
    Sentence,
}

impl Separator {
    /// Compile a configured separator.
    pub fn parse(separator: &str, is_regex: bool) -> Result<Self> {
        if separator == SENTENCE_SEPARATOR {
            Ok(Separator::Sentence)
        } else if is_regex {
            Ok(Separator::Regex(Regex::new(separator)?))
        } else {
            Ok(Separator::Literal(separator.to_string()))
        }
    }

    pub fn is_sentence(&self) -> bool {
        matches!(self, Separator::Sentence)
    }

    /// Split `text` into fragments, each paired with the delimiter that
    /// followed it. The last fragment has an empty delimiter.
    pub fn split<'t>(&self, text: &'t str) -> Vec<Fragment<'t>> {
        match self {
            Separator::Literal(sep) if sep.is_empty() => text
                .char_indices()
                .map(|(i, c)| Fragment::new(text, i, i + c.len_utf8(), i + c.len_utf8()))
                .collect(),
            Separator::Literal(sep) => {
                split_at_matches(text, text.match_indices(sep.as_str()).map(|(i, m)| (i, i + m.len())))
            }
            Separator::Regex(regex) => {
                split_at_matches(text, regex.find_iter(text).map(|m| (m.start(), m.end())))
            }
            Separator::Sentence => {
                let mut start = 0;
                text.split_sentence_bounds()
                    .map(|sentence| {
                        let end = start + sentence.len();
                        let fragment = Fragment::new(text, start, end, end);
                        start = end;
                        fragment
                    })
                    .collect()
            }
        }
    }
}

/// A piece of text between delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment<'t> {
    /// Text before the delimiter
    pub body: &'t str,
    /// Text including the delimiter that followed it
    pub with_delimiter: &'t str,
}

impl<'t> Fragment<'t> {
    fn new(text: &'t str, start: usize, body_end: usize, delimiter_end: usize) -> Self {
        Self {
            body: &text[start..body_end],
            with_delimiter: &text[start..delimiter_end],
        }
    }

    /// Check if the body holds anything besides whitespace.
    pub fn is_blank(&self) -> bool {
        self.body.trim().is_empty()
    }
}

fn split_at_matches<'t>(
    text: &'t str,
    matches: impl Iterator<Item = (usize, usize)>,
) -> Vec<Fragment<'t>> {
    let mut fragments = Vec::new();
    let mut last = 0;
    for (start, end) in matches {
        fragments.push(Fragment::new(text, last, start, end));
        last = end;
    }
    fragments.push(Fragment::new(text, last, text.len(), text.len()));
    fragments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bodies(fragments: &[Fragment<'_>]) -> Vec<String> {
        fragments.iter().map(|f| f.body.to_string()).collect()
    }

    fn with_delimiters(fragments: &[Fragment<'_>]) -> Vec<String> {
        fragments.iter().map(|f| f.with_delimiter.to_string()).collect()
    }

    #[test]
    fn test_literal_split() {
        let sep = Separator::parse(", ", false).unwrap();
        let fragments = sep.split("a, b, c");
        assert_eq!(bodies(&fragments), vec!["a", "b", "c"]);
        assert_eq!(with_delimiters(&fragments), vec!["a, ", "b, ", "c"]);
    }

    #[test]
    fn test_literal_split_without_match() {
        let sep = Separator::parse("|", false).unwrap();
        assert_eq!(bodies(&sep.split("abc")), vec!["abc"]);
    }

    #[test]
    fn test_empty_literal_splits_characters() {
        let sep = Separator::parse("", false).unwrap();
        assert_eq!(bodies(&sep.split("h\u{e9}y")), vec!["h", "\u{e9}", "y"]);
    }

    #[test]
    fn test_regex_split_keeps_matched_delimiter() {
        let sep = Separator::parse(r"[.!?]\s*", true).unwrap();
        let fragments = sep.split("One. Two!Three");
        assert_eq!(bodies(&fragments), vec!["One", "Two", "Three"]);
        assert_eq!(with_delimiters(&fragments), vec!["One. ", "Two!", "Three"]);
    }

    #[test]
    fn test_invalid_regex() {
        assert!(Separator::parse("(unclosed", true).is_err());
        assert!(Separator::parse("(unclosed", false).is_ok());
    }

    #[test]
    fn test_sentence_split() {
        let sep = Separator::parse("sentence", false).unwrap();
        assert!(sep.is_sentence());
        let fragments = sep.split("First one. Second one? Third.");
        assert_eq!(
            bodies(&fragments),
            vec!["First one. ", "Second one? ", "Third."]
        );
    }

    #[test]
    fn test_sentence_is_exact_match() {
        assert!(!Separator::parse("sent", false).unwrap().is_sentence());
        assert!(Separator::parse("sentence", true).unwrap().is_sentence());
    }

    #[test]
    fn test_blank_fragments() {
        let sep = Separator::parse(" ", false).unwrap();
        let fragments = sep.split("a  b");
        assert_eq!(bodies(&fragments), vec!["a", "", "b"]);
        assert!(fragments[1].is_blank());
    }
}
