//! Layout reconstruction module.
//!
//! Turns an [`AnalyzeResult`] into plain text in a human reading order and,
//! optionally, into standalone table documents. The pipeline is:
//!
//! 1. group lines or paragraphs by page ([`merger`])
//! 2. reconcile them with table regions ([`merger::merge_tables`])
//! 3. order them, either by content offset or by single-column geometry
//!    ([`clustering`], [`sorter`])
//! 4. assemble rows into page text ([`assemble`])

pub mod assemble;
pub mod clustering;
pub mod extract;
pub mod merger;
mod object;
mod options;
pub mod sorter;

pub use assemble::{assemble_text, natural_rows, PAGE_BREAK};
pub use clustering::{cluster_rows, DisjointSet};
pub use extract::extract_table_documents;
pub use merger::{is_in_table, merge_tables, TablesByPage};
pub use object::{ObjectsByPage, PageObject, Row, RowsByPage};
pub use options::{LayoutOptions, PageLayout, TableFormat, TableHandling, DEFAULT_THRESHOLD_Y};
pub use sorter::single_column_rows;

use crate::error::Result;
use crate::model::{AnalyzeResult, Document, Meta};

/// Reconstruct the text of a result under the given options.
pub fn reconstruct_text(result: &AnalyzeResult, options: &LayoutOptions) -> Result<String> {
    let tables = TablesByPage::from_result(result);
    let handling = options.table_handling();

    let rows = match options.page_layout {
        PageLayout::Natural => {
            let objects = merge_tables(merger::paragraphs_by_page(result), &tables, handling);
            natural_rows(&objects, result)
        }
        PageLayout::SingleColumnByLine => {
            let objects = merge_tables(merger::lines_by_page(result), &tables, handling);
            single_column_rows(&objects, options.threshold_y)
        }
        PageLayout::SingleColumnByParagraph => {
            let objects = merge_tables(merger::paragraphs_by_page(result), &tables, handling);
            single_column_rows(&objects, options.threshold_y)
        }
    };

    assemble_text(&rows, result)
}

/// Convert a result into documents: extracted tables first, then the text.
pub fn convert_result(
    result: &AnalyzeResult,
    meta: &Meta,
    options: &LayoutOptions,
) -> Result<Vec<Document>> {
    let mut documents = if options.extract_tables_separately {
        extract_table_documents(
            result,
            meta,
            options.preceding_context_len,
            options.following_context_len,
        )?
    } else {
        Vec::new()
    };

    log::debug!(
        "Reconstructing {} pages with {} layout ({} tables)",
        result.pages.len(),
        options.page_layout,
        result.tables.len()
    );

    let text = reconstruct_text(result, options)?;
    documents.push(Document::with_content_and_meta(text, meta.clone()));
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnalyzedPage, Line, Paragraph, Point, Span, Table, TableCell};

    fn at(x: f64, y: f64) -> Option<Vec<Point>> {
        Some(vec![
            Point::new(x, y),
            Point::new(x + 1.0, y),
            Point::new(x + 1.0, y + 0.2),
            Point::new(x, y + 0.2),
        ])
    }

    /// Two columns of lines on one page, with a table below them.
    fn two_column_result() -> AnalyzeResult {
        let mut page = AnalyzedPage::new(1);
        page.add_line(Line::new("Left top", Span::new(0, 8), at(0.5, 1.0)));
        page.add_line(Line::new("Left bottom", Span::new(9, 11), at(0.5, 2.0)));
        page.add_line(Line::new("Right top", Span::new(21, 9), at(4.0, 1.02)));
        page.add_line(Line::new("Right bottom", Span::new(31, 12), at(4.0, 2.01)));
        page.add_line(Line::new("a", Span::new(44, 1), at(0.5, 3.0)));
        page.add_line(Line::new("b", Span::new(46, 1), at(4.0, 3.0)));

        let mut result = AnalyzeResult::new();
        result.content = "Left top\nLeft bottom\nRight top\nRight bottom\na b".into();
        result.pages.push(page);
        result.paragraphs.push(Paragraph::new("Left top Left bottom", Span::new(0, 20), 1, at(0.5, 1.0)));
        result.paragraphs.push(Paragraph::new("Right top Right bottom", Span::new(21, 22), 1, at(4.0, 1.02)));
        result.paragraphs.push(Paragraph::new("a", Span::new(44, 1), 1, at(0.5, 3.0)));
        result.paragraphs.push(Paragraph::new("b", Span::new(46, 1), 1, at(4.0, 3.0)));
        result.tables.push(
            Table::new(1, 2)
                .with_cell(TableCell::new(0, 0, "a"))
                .with_cell(TableCell::new(0, 1, "b"))
                .with_span(Span::new(44, 3))
                .on_page(1, at(0.5, 3.0)),
        );
        result
    }

    #[test]
    fn test_natural_layout_excludes_tables() {
        let result = two_column_result();
        let text = reconstruct_text(&result, &LayoutOptions::new()).unwrap();
        assert_eq!(text, "Left top Left bottom\nRight top Right bottom\n");
    }

    #[test]
    fn test_single_column_by_line() {
        let result = two_column_result();
        let options = LayoutOptions::new().with_page_layout(PageLayout::SingleColumnByLine);
        let text = reconstruct_text(&result, &options).unwrap();
        assert_eq!(text, "Left top Right top\nLeft bottom Right bottom\n");
    }

    #[test]
    fn test_single_column_with_inline_table() {
        let result = two_column_result();
        let options = LayoutOptions::new()
            .with_page_layout(PageLayout::SingleColumnByLine)
            .with_tables_separately(false);
        let text = reconstruct_text(&result, &options).unwrap();
        assert_eq!(text, "Left top Right top\nLeft bottom Right bottom\na,b\n\n");
    }

    #[test]
    fn test_text_tables_keep_cell_lines() {
        let result = two_column_result();
        let options = LayoutOptions::new()
            .with_page_layout(PageLayout::SingleColumnByParagraph)
            .with_tables_separately(false)
            .with_table_format(TableFormat::Text);
        let text = reconstruct_text(&result, &options).unwrap();
        assert_eq!(text, "Left top Left bottom Right top Right bottom\na b\n");
    }

    #[test]
    fn test_convert_result_orders_tables_before_text() {
        let result = two_column_result();
        let mut meta = Meta::new();
        meta.insert("file_path".into(), "scan.pdf".into());

        let docs = convert_result(&result, &meta, &LayoutOptions::new()).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].content.as_deref(), Some("a,b\n"));
        assert_eq!(docs[0].meta["page"], 1);
        assert_eq!(docs[0].meta["preceding_context"], "Left bottom\nRight top\nRight bottom");
        assert_eq!(docs[1].meta, meta);
    }

    #[test]
    fn test_empty_result() {
        let result = AnalyzeResult::new();
        let docs = convert_result(&result, &Meta::new(), &LayoutOptions::new()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content.as_deref(), Some(""));
    }
}
