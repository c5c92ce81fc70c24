//! Table extraction into standalone documents.

use serde_json::Value;

use crate::error::Result;
use crate::model::{AnalyzeResult, Document, Line, Meta, Table};

/// Turn every table of a result into a CSV document.
///
/// Each document carries the source meta plus `preceding_context`,
/// `following_context` and, when known, the starting `page`. Output is
/// stably sorted by page, tables without a page first.
pub fn extract_table_documents(
    result: &AnalyzeResult,
    meta: &Meta,
    preceding_context_len: usize,
    following_context_len: usize,
) -> Result<Vec<Document>> {
    let mut documents = Vec::with_capacity(result.tables.len());

    for table in &result.tables {
        let content = table.to_csv()?;

        let mut table_meta = meta.clone();
        table_meta.insert(
            "preceding_context".into(),
            Value::String(preceding_context(result, table, preceding_context_len)),
        );
        table_meta.insert(
            "following_context".into(),
            Value::String(following_context(result, table, following_context_len)),
        );
        if let Some(page) = table.first_page() {
            table_meta.insert("page".into(), Value::from(page));
        }

        documents.push(Document::with_content_and_meta(content, table_meta));
    }

    documents.sort_by_key(page_of);
    Ok(documents)
}

/// Last `len` lines before the table on its first page, trimmed.
fn preceding_context(result: &AnalyzeResult, table: &Table, len: usize) -> String {
    let (Some(page), Some(span)) = (table.first_page(), table.first_span()) else {
        return String::new();
    };
    let before: Vec<&str> = page_lines(result, page)
        .filter(|line| line_offset(line).is_some_and(|o| o < span.offset))
        .map(|line| line.content.as_str())
        .collect();

    let start = before.len().saturating_sub(len);
    before[start..].join("\n").trim().to_string()
}

/// First `len` lines after the table on its last page.
fn following_context(result: &AnalyzeResult, table: &Table, len: usize) -> String {
    let (Some(page), Some(span)) = (table.last_page(), table.first_span()) else {
        return String::new();
    };
    let after: Vec<&str> = page_lines(result, page)
        .filter(|line| line_offset(line).is_some_and(|o| o > span.end()))
        .map(|line| line.content.as_str())
        .take(len)
        .collect();

    after.join("\n")
}

fn page_lines(result: &AnalyzeResult, page_number: u32) -> impl Iterator<Item = &Line> {
    result
        .page(page_number)
        .into_iter()
        .flat_map(|page| page.lines.iter())
}

fn line_offset(line: &Line) -> Option<usize> {
    line.first_span().map(|s| s.offset)
}

fn page_of(document: &Document) -> u64 {
    document.meta.get("page").and_then(Value::as_u64).unwrap_or(0)
}
