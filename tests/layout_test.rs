//! Integration tests for layout reconstruction on saved analysis responses.

use docprep::layout::{reconstruct_text, PAGE_BREAK};
use docprep::{
    AnalyzeResult, AnalyzedPage, LayoutOptions, Line, Meta, PageLayout, Span, TableFormat,
};

/// Two pages in the REST response shape: a title, two columns and a table on
/// page 1, a single line on page 2.
const ANALYSIS: &str = r#"{
    "status": "succeeded",
    "analyzeResult": {
        "apiVersion": "2023-07-31",
        "modelId": "prebuilt-layout",
        "content": "Title\nCol A\nCol B\nq 1\nNotes\nLast",
        "pages": [
            {
                "pageNumber": 1,
                "unit": "inch",
                "lines": [
                    {"content": "Title", "polygon": [1, 0.5, 3, 0.5, 3, 0.8, 1, 0.8], "spans": [{"offset": 0, "length": 5}]},
                    {"content": "Col A", "polygon": [1, 1.0, 3, 1.0, 3, 1.2, 1, 1.2], "spans": [{"offset": 6, "length": 5}]},
                    {"content": "Col B", "polygon": [5, 1.01, 7, 1.01, 7, 1.2, 5, 1.2], "spans": [{"offset": 12, "length": 5}]},
                    {"content": "q", "polygon": [1, 2.0, 2, 2.0, 2, 2.2, 1, 2.2], "spans": [{"offset": 18, "length": 1}]},
                    {"content": "1", "polygon": [5, 2.0, 6, 2.0, 6, 2.2, 5, 2.2], "spans": [{"offset": 20, "length": 1}]},
                    {"content": "Notes", "polygon": [1, 3.0, 3, 3.0, 3, 3.2, 1, 3.2], "spans": [{"offset": 22, "length": 5}]}
                ]
            },
            {
                "pageNumber": 2,
                "unit": "inch",
                "lines": [
                    {"content": "Last", "polygon": [1, 1.0, 2, 1.0, 2, 1.2, 1, 1.2], "spans": [{"offset": 28, "length": 4}]}
                ]
            }
        ],
        "paragraphs": [
            {"content": "Title", "role": "title", "boundingRegions": [{"pageNumber": 1, "polygon": [1, 0.5, 3, 0.5, 3, 0.8, 1, 0.8]}], "spans": [{"offset": 0, "length": 5}]},
            {"content": "Col A", "boundingRegions": [{"pageNumber": 1, "polygon": [1, 1.0, 3, 1.0, 3, 1.2, 1, 1.2]}], "spans": [{"offset": 6, "length": 5}]},
            {"content": "Col B", "boundingRegions": [{"pageNumber": 1, "polygon": [5, 1.01, 7, 1.01, 7, 1.2, 5, 1.2]}], "spans": [{"offset": 12, "length": 5}]},
            {"content": "q", "boundingRegions": [{"pageNumber": 1, "polygon": [1, 2.0, 2, 2.0, 2, 2.2, 1, 2.2]}], "spans": [{"offset": 18, "length": 1}]},
            {"content": "1", "boundingRegions": [{"pageNumber": 1, "polygon": [5, 2.0, 6, 2.0, 6, 2.2, 5, 2.2]}], "spans": [{"offset": 20, "length": 1}]},
            {"content": "Notes", "boundingRegions": [{"pageNumber": 1, "polygon": [1, 3.0, 3, 3.0, 3, 3.2, 1, 3.2]}], "spans": [{"offset": 22, "length": 5}]},
            {"content": "Last", "boundingRegions": [{"pageNumber": 2, "polygon": [1, 1.0, 2, 1.0, 2, 1.2, 1, 1.2]}], "spans": [{"offset": 28, "length": 4}]}
        ],
        "tables": [
            {
                "rowCount": 1,
                "columnCount": 2,
                "cells": [
                    {"kind": "content", "rowIndex": 0, "columnIndex": 0, "content": "q"},
                    {"kind": "content", "rowIndex": 0, "columnIndex": 1, "content": "1"}
                ],
                "boundingRegions": [{"pageNumber": 1, "polygon": [1, 2.0, 6, 2.0, 6, 2.2, 1, 2.2]}],
                "spans": [{"offset": 18, "length": 3}]
            }
        ]
    }
}"#;

fn analysis() -> AnalyzeResult {
    AnalyzeResult::from_json_slice(ANALYSIS.as_bytes()).unwrap()
}

// ==================== Parsing Tests ====================

#[test]
fn test_parse_rest_envelope() {
    let result = analysis();
    assert_eq!(result.model_id.as_deref(), Some("prebuilt-layout"));
    assert_eq!(result.pages.len(), 2);
    assert_eq!(result.pages[0].lines.len(), 6);
    assert_eq!(result.paragraphs[0].role.as_deref(), Some("title"));
    assert_eq!(result.tables[0].to_csv().unwrap(), "q,1\n");
}

// ==================== Reading Order Tests ====================

#[test]
fn test_natural_layout() {
    let text = reconstruct_text(&analysis(), &LayoutOptions::new()).unwrap();
    assert_eq!(text, "Title\nCol A\nCol B\nNotes\n\u{c}Last\n");
}

#[test]
fn test_single_column_groups_rows() {
    let options = LayoutOptions::new().with_page_layout(PageLayout::SingleColumnByLine);
    let text = reconstruct_text(&analysis(), &options).unwrap();
    assert_eq!(text, "Title\nCol A Col B\nNotes\n\u{c}Last\n");
}

#[test]
fn test_single_column_by_paragraph() {
    let options = LayoutOptions::new().with_page_layout(PageLayout::SingleColumnByParagraph);
    let text = reconstruct_text(&analysis(), &options).unwrap();
    assert_eq!(text, "Title\nCol A Col B\nNotes\n\u{c}Last\n");
}

#[test]
fn test_zero_threshold_keeps_every_line_apart() {
    let options = LayoutOptions::new()
        .with_page_layout(PageLayout::SingleColumnByLine)
        .with_threshold_y(0.0);
    let text = reconstruct_text(&analysis(), &options).unwrap();
    assert_eq!(text, "Title\nCol A\nCol B\nNotes\n\u{c}Last\n");
}

#[test]
fn test_pages_are_separated_by_form_feed() {
    let text = reconstruct_text(&analysis(), &LayoutOptions::new()).unwrap();
    assert_eq!(text.matches(PAGE_BREAK).count(), 1);
}

#[test]
fn test_lines_without_polygons_keep_source_order() {
    let mut page = AnalyzedPage::new(1);
    page.add_line(Line::new("second", Span::new(7, 6), None));
    page.add_line(Line::new("first", Span::new(0, 5), None));
    let mut result = AnalyzeResult::new();
    result.content = "first\nsecond".into();
    result.pages.push(page);

    let options = LayoutOptions::new().with_page_layout(PageLayout::SingleColumnByLine);
    let text = reconstruct_text(&result, &options).unwrap();
    assert_eq!(text, "second\nfirst\n");
}

// ==================== Table Tests ====================

#[test]
fn test_inline_table() {
    let options = LayoutOptions::new()
        .with_page_layout(PageLayout::SingleColumnByLine)
        .with_tables_separately(false);
    let text = reconstruct_text(&analysis(), &options).unwrap();
    assert_eq!(text, "Title\nCol A Col B\nq,1\n\nNotes\n\u{c}Last\n");
}

#[test]
fn test_text_tables_leave_cells_as_lines() {
    let options = LayoutOptions::new()
        .with_page_layout(PageLayout::SingleColumnByLine)
        .with_tables_separately(false)
        .with_table_format(TableFormat::Text);
    let text = reconstruct_text(&analysis(), &options).unwrap();
    assert_eq!(text, "Title\nCol A Col B\nq 1\nNotes\n\u{c}Last\n");
}

#[test]
fn test_convert_result_extracts_tables_with_context() {
    let mut meta = Meta::new();
    meta.insert("file_path".into(), "scan.pdf".into());

    let docs = docprep::layout::convert_result(&analysis(), &meta, &LayoutOptions::new()).unwrap();
    assert_eq!(docs.len(), 2);

    let table = &docs[0];
    assert_eq!(table.content.as_deref(), Some("q,1\n"));
    assert_eq!(table.meta["file_path"], "scan.pdf");
    assert_eq!(table.meta["preceding_context"], "Title\nCol A\nCol B");
    assert_eq!(table.meta["following_context"], "Notes");
    assert_eq!(table.meta["page"], 1);

    let text = &docs[1];
    assert_eq!(text.content.as_deref(), Some("Title\nCol A\nCol B\nNotes\n\u{c}Last\n"));
    assert_eq!(text.meta, meta);
}

#[test]
fn test_context_lengths_are_configurable() {
    let options = LayoutOptions::new().with_context_lines(1, 0);
    let docs = docprep::layout::convert_result(&analysis(), &Meta::new(), &options).unwrap();
    assert_eq!(docs[0].meta["preceding_context"], "Col B");
    assert_eq!(docs[0].meta["following_context"], "");
}
