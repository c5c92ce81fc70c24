//! Text assembly from ordered rows.

use super::object::{ObjectsByPage, RowsByPage};
use crate::error::Result;
use crate::model::AnalyzeResult;

/// Page separator in assembled text.
pub const PAGE_BREAK: char = '\u{000C}';

/// Order each page's objects by content offset, one object per row.
///
/// Only pages listed in the result are kept.
pub fn natural_rows<'a>(objects_by_page: &ObjectsByPage<'a>, result: &AnalyzeResult) -> RowsByPage<'a> {
    let mut rows_by_page = RowsByPage::new();
    for page in &result.pages {
        let Some(objects) = objects_by_page.get(&page.page_number) else {
            continue;
        };
        let mut sorted = objects.clone();
        sorted.sort_by_key(|obj| obj.offset());
        rows_by_page.insert(page.page_number, sorted.into_iter().map(|obj| vec![obj]).collect());
    }
    rows_by_page
}

/// Build the full text of a result from its rows.
///
/// Pages follow `result.pages` in source order and are joined with a form
/// feed. Within a page every row becomes one line: object texts joined with
/// a single space, then `\n`. Pages without rows contribute empty text.
pub fn assemble_text(rows_by_page: &RowsByPage<'_>, result: &AnalyzeResult) -> Result<String> {
    let mut pages = Vec::with_capacity(result.pages.len());

    for page in &result.pages {
        let mut page_text = String::new();
        for row in rows_by_page.get(&page.page_number).into_iter().flatten() {
            let texts = row.iter().map(|obj| obj.text()).collect::<Result<Vec<_>>>()?;
            page_text.push_str(&texts.join(" "));
            page_text.push('\n');
        }
        pages.push(page_text);
    }

    Ok(pages.join(&PAGE_BREAK.to_string()))
}
