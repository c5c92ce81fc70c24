//! Page grouping and reconciliation of text objects with table regions.

use std::collections::BTreeMap;

use super::object::{ObjectsByPage, PageObject};
use super::options::TableHandling;
use crate::model::{AnalyzeResult, Table};

/// Tables of a result, grouped two ways.
#[derive(Debug, Clone, Default)]
pub struct TablesByPage<'a> {
    /// Every page a table touches, used to exclude text inside tables
    pub touching: BTreeMap<u32, Vec<&'a Table>>,
    /// The page a table starts on, used to place it inline
    pub anchored: BTreeMap<u32, Vec<&'a Table>>,
}

impl<'a> TablesByPage<'a> {
    /// Group the tables of a result by page.
    ///
    /// A table without bounding regions lands on the highest page already
    /// holding tables, or page 1.
    pub fn from_result(result: &'a AnalyzeResult) -> Self {
        let mut grouped = Self::default();

        for table in &result.tables {
            let pages: Vec<u32> = if table.bounding_regions.is_empty() {
                vec![last_page_or_first(&grouped.anchored)]
            } else {
                table.bounding_regions.iter().map(|r| r.page_number).collect()
            };

            grouped.anchored.entry(pages[0]).or_default().push(table);

            let mut seen = Vec::with_capacity(pages.len());
            for page in pages {
                if !seen.contains(&page) {
                    seen.push(page);
                    grouped.touching.entry(page).or_default().push(table);
                }
            }
        }

        grouped
    }

    /// Tables touching a page.
    pub fn on_page(&self, page_number: u32) -> &[&'a Table] {
        self.touching
            .get(&page_number)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.anchored.is_empty()
    }
}

/// Group paragraphs by the page they start on.
pub fn paragraphs_by_page(result: &AnalyzeResult) -> ObjectsByPage<'_> {
    let mut by_page = ObjectsByPage::new();
    for paragraph in &result.paragraphs {
        let page = paragraph
            .first_page()
            .unwrap_or_else(|| last_page_or_first(&by_page));
        by_page
            .entry(page)
            .or_default()
            .push(PageObject::Paragraph(paragraph));
    }
    by_page
}

/// Group lines by the page that lists them.
pub fn lines_by_page(result: &AnalyzeResult) -> ObjectsByPage<'_> {
    let mut by_page = ObjectsByPage::new();
    for page in &result.pages {
        by_page.insert(
            page.page_number,
            page.lines.iter().map(PageObject::Line).collect(),
        );
    }
    by_page
}

/// Check if an object's first offset falls within any of the tables' spans.
///
/// Objects or tables without spans never match.
pub fn is_in_table(tables: &[&Table], obj: &PageObject<'_>) -> bool {
    let Some(offset) = obj.first_span().map(|s| s.offset) else {
        return false;
    };
    tables
        .iter()
        .filter_map(|t| t.first_span())
        .any(|span| span.contains(offset))
}

/// Drop every object that lies inside a table on its page.
pub fn remove_objects_in_tables<'a>(
    objects_by_page: ObjectsByPage<'a>,
    tables: &TablesByPage<'a>,
) -> ObjectsByPage<'a> {
    objects_by_page
        .into_iter()
        .map(|(page_number, objects)| {
            let on_page = tables.on_page(page_number);
            let kept = objects
                .into_iter()
                .filter(|obj| !is_in_table(on_page, obj))
                .collect();
            (page_number, kept)
        })
        .collect()
}

/// Append each table to the object list of the page it starts on.
pub fn insert_tables<'a>(
    mut objects_by_page: ObjectsByPage<'a>,
    tables: &TablesByPage<'a>,
) -> ObjectsByPage<'a> {
    for (&page_number, page_tables) in &tables.anchored {
        objects_by_page
            .entry(page_number)
            .or_default()
            .extend(page_tables.iter().map(|t| PageObject::Table(*t)));
    }
    objects_by_page
}

/// Reconcile text objects with tables according to `handling`.
pub fn merge_tables<'a>(
    objects_by_page: ObjectsByPage<'a>,
    tables: &TablesByPage<'a>,
    handling: TableHandling,
) -> ObjectsByPage<'a> {
    match handling {
        TableHandling::Keep => objects_by_page,
        TableHandling::Exclude => remove_objects_in_tables(objects_by_page, tables),
        TableHandling::Inline => {
            let without = remove_objects_in_tables(objects_by_page, tables);
            insert_tables(without, tables)
        }
    }
}

fn last_page_or_first<T>(by_page: &BTreeMap<u32, T>) -> u32 {
    by_page.keys().next_back().copied().unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnalyzedPage, Line, Paragraph, Span, TableCell};

    fn result_with_table() -> AnalyzeResult {
        let mut page = AnalyzedPage::new(1);
        page.add_line(Line::new("Intro", Span::new(0, 5), None));
        page.add_line(Line::new("cell", Span::new(6, 4), None));
        page.add_line(Line::new("Outro", Span::new(20, 5), None));

        let mut result = AnalyzeResult::new();
        result.pages.push(page);
        result.tables.push(
            Table::new(1, 1)
                .with_cell(TableCell::new(0, 0, "cell"))
                .with_span(Span::new(6, 10))
                .on_page(1, None),
        );
        result
    }

    fn texts(objects: &[PageObject<'_>]) -> Vec<String> {
        objects.iter().map(|o| o.text().unwrap()).collect()
    }

    // ==================== Grouping Tests ====================

    #[test]
    fn test_paragraph_page_fallback() {
        let mut result = AnalyzeResult::new();
        let mut orphan = Paragraph::new("orphan", Span::new(0, 6), 1, None);
        orphan.bounding_regions.clear();
        result.paragraphs.push(orphan.clone());
        result.paragraphs.push(Paragraph::new("p3", Span::new(7, 2), 3, None));
        result.paragraphs.push(orphan);

        let by_page = paragraphs_by_page(&result);
        assert_eq!(texts(&by_page[&1]), vec!["orphan"]);
        assert_eq!(texts(&by_page[&3]), vec!["p3", "orphan"]);
    }

    #[test]
    fn test_multi_page_table_touches_every_page() {
        let mut result = AnalyzeResult::new();
        result.tables.push(Table::new(1, 1).on_page(2, None).on_page(3, None));
        result.tables.push(Table::new(1, 1));

        let tables = TablesByPage::from_result(&result);
        assert_eq!(tables.anchored[&2].len(), 2);
        assert!(!tables.anchored.contains_key(&3));
        assert_eq!(tables.on_page(3).len(), 1);
        assert!(tables.on_page(4).is_empty());
    }

    // ==================== Merge Tests ====================

    #[test]
    fn test_in_table_is_inclusive() {
        let result = result_with_table();
        let tables: Vec<&Table> = result.tables.iter().collect();

        let at_end = Line::new("x", Span::new(16, 1), None);
        let after = Line::new("x", Span::new(17, 1), None);
        let no_span = Line {
            content: "x".into(),
            polygon: None,
            spans: Vec::new(),
        };
        assert!(is_in_table(&tables, &PageObject::Line(&at_end)));
        assert!(!is_in_table(&tables, &PageObject::Line(&after)));
        assert!(!is_in_table(&tables, &PageObject::Line(&no_span)));
    }

    #[test]
    fn test_exclude_mode() {
        let result = result_with_table();
        let tables = TablesByPage::from_result(&result);
        let merged = merge_tables(lines_by_page(&result), &tables, TableHandling::Exclude);
        assert_eq!(texts(&merged[&1]), vec!["Intro", "Outro"]);
    }

    #[test]
    fn test_inline_mode_appends_tables() {
        let result = result_with_table();
        let tables = TablesByPage::from_result(&result);
        let merged = merge_tables(lines_by_page(&result), &tables, TableHandling::Inline);
        assert_eq!(texts(&merged[&1]), vec!["Intro", "Outro", "cell\n"]);
        assert!(merged[&1][2].is_table());
    }

    #[test]
    fn test_keep_mode_is_untouched() {
        let result = result_with_table();
        let tables = TablesByPage::from_result(&result);
        let merged = merge_tables(lines_by_page(&result), &tables, TableHandling::Keep);
        assert_eq!(texts(&merged[&1]), vec!["Intro", "cell", "Outro"]);
    }

    #[test]
    fn test_inline_table_on_page_without_text() {
        let mut result = AnalyzeResult::new();
        result.pages.push(AnalyzedPage::new(1));
        result.tables.push(Table::new(1, 1).on_page(2, None));

        let tables = TablesByPage::from_result(&result);
        let merged = merge_tables(lines_by_page(&result), &tables, TableHandling::Inline);
        assert!(merged[&1].is_empty());
        assert_eq!(merged[&2].len(), 1);
    }
}
