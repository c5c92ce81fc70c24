//! Page objects: the text-bearing units that layout reconstruction orders.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::model::{Line, Paragraph, Point, Span, Table};

/// A line, paragraph or table placed on a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageObject<'a> {
    Line(&'a Line),
    Paragraph(&'a Paragraph),
    Table(&'a Table),
}

impl<'a> PageObject<'a> {
    /// Bounding polygon, upper-left corner first.
    pub fn polygon(&self) -> Option<&'a [Point]> {
        let polygon = match self {
            PageObject::Line(line) => line.polygon.as_deref(),
            PageObject::Paragraph(paragraph) => paragraph.polygon(),
            PageObject::Table(table) => table.polygon(),
        };
        polygon.filter(|p| !p.is_empty())
    }

    /// Upper-left corner of the polygon.
    pub fn upper_left(&self) -> Option<Point> {
        self.polygon().and_then(|p| p.first().copied())
    }

    /// First span, which positions the object in the content.
    pub fn first_span(&self) -> Option<&'a Span> {
        match self {
            PageObject::Line(line) => line.first_span(),
            PageObject::Paragraph(paragraph) => paragraph.first_span(),
            PageObject::Table(table) => table.first_span(),
        }
    }

    /// Start offset in the content; objects without spans sort first.
    pub fn offset(&self) -> usize {
        self.first_span().map(|s| s.offset).unwrap_or(0)
    }

    pub fn is_table(&self) -> bool {
        matches!(self, PageObject::Table(_))
    }

    /// Text of the object; tables render as header-less CSV.
    pub fn text(&self) -> Result<String> {
        match self {
            PageObject::Line(line) => Ok(line.content.clone()),
            PageObject::Paragraph(paragraph) => Ok(paragraph.content.clone()),
            PageObject::Table(table) => table.to_csv(),
        }
    }
}

/// Objects grouped by page number.
pub type ObjectsByPage<'a> = BTreeMap<u32, Vec<PageObject<'a>>>;

/// Objects judged to share a horizontal band, in reading order once sorted.
pub type Row<'a> = Vec<PageObject<'a>>;

/// Rows grouped by page number.
pub type RowsByPage<'a> = BTreeMap<u32, Vec<Row<'a>>>;
