//! Table types.

use csv::{Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};

use super::{BoundingRegion, Point, Span};
use crate::error::{Error, Result};

/// A table recognized by the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(alias = "rowCount")]
    pub row_count: usize,

    #[serde(alias = "columnCount")]
    pub column_count: usize,

    /// Sparse list of filled cells
    #[serde(default)]
    pub cells: Vec<TableCell>,

    /// Pages the table appears on, first region first
    #[serde(default, alias = "boundingRegions")]
    pub bounding_regions: Vec<BoundingRegion>,

    #[serde(default)]
    pub spans: Vec<Span>,
}

impl Table {
    /// Create an empty table with the given grid size.
    pub fn new(row_count: usize, column_count: usize) -> Self {
        Self {
            row_count,
            column_count,
            cells: Vec::new(),
            bounding_regions: Vec::new(),
            spans: Vec::new(),
        }
    }

    /// Set the span of the table and return self.
    pub fn with_span(mut self, span: Span) -> Self {
        self.spans = vec![span];
        self
    }

    /// Add a page association and return self.
    pub fn on_page(mut self, page_number: u32, polygon: Option<Vec<Point>>) -> Self {
        self.bounding_regions
            .push(BoundingRegion::new(page_number, polygon));
        self
    }

    /// Add a cell.
    pub fn add_cell(&mut self, cell: TableCell) {
        self.cells.push(cell);
    }

    /// Add a cell and return self.
    pub fn with_cell(mut self, cell: TableCell) -> Self {
        self.cells.push(cell);
        self
    }

    /// First span, used to position the table relative to text.
    pub fn first_span(&self) -> Option<&Span> {
        self.spans.first()
    }

    /// Polygon of the first bounding region.
    pub fn polygon(&self) -> Option<&[Point]> {
        self.bounding_regions
            .first()
            .and_then(|r| r.polygon.as_deref())
    }

    /// Page the table starts on.
    pub fn first_page(&self) -> Option<u32> {
        self.bounding_regions.first().map(|r| r.page_number)
    }

    /// Page the table ends on.
    pub fn last_page(&self) -> Option<u32> {
        self.bounding_regions.last().map(|r| r.page_number)
    }

    /// Expand the sparse cell list into a dense `row_count x column_count` grid.
    ///
    /// Unfilled positions are empty strings. A spanning cell's content is
    /// replicated into every row and column it covers; positions outside the
    /// declared grid are ignored.
    pub fn grid(&self) -> Vec<Vec<String>> {
        let mut grid = vec![vec![String::new(); self.column_count]; self.row_count];

        for cell in &self.cells {
            for c in 0..cell.column_span() {
                for r in 0..cell.row_span() {
                    let row = cell.row_index + r;
                    let col = cell.column_index + c;
                    if let Some(slot) = grid.get_mut(row).and_then(|cols| cols.get_mut(col)) {
                        slot.clone_from(&cell.content);
                    }
                }
            }
        }

        grid
    }

    /// Render the table as CSV text without a header row.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        for row in self.grid() {
            writer.write_record(&row)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Render(format!("CSV flush error: {}", e.error())))?;
        String::from_utf8(bytes).map_err(|e| Error::Render(format!("CSV encoding error: {}", e)))
    }
}

/// A filled cell of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    #[serde(alias = "rowIndex")]
    pub row_index: usize,

    #[serde(alias = "columnIndex")]
    pub column_index: usize,

    /// Number of rows covered; absent or zero means one
    #[serde(default, alias = "rowSpan", skip_serializing_if = "Option::is_none")]
    pub row_span: Option<usize>,

    /// Number of columns covered; absent or zero means one
    #[serde(default, alias = "columnSpan", skip_serializing_if = "Option::is_none")]
    pub column_span: Option<usize>,

    #[serde(default)]
    pub content: String,

    /// Cell kind ("columnHeader", "rowHeader", "content", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl TableCell {
    /// Create a cell covering a single position.
    pub fn new(row_index: usize, column_index: usize, content: impl Into<String>) -> Self {
        Self {
            row_index,
            column_index,
            row_span: None,
            column_span: None,
            content: content.into(),
            kind: None,
        }
    }

    /// Set rowspan and return self.
    pub fn rowspan(mut self, span: usize) -> Self {
        self.row_span = Some(span);
        self
    }

    /// Set colspan and return self.
    pub fn colspan(mut self, span: usize) -> Self {
        self.column_span = Some(span);
        self
    }

    /// Effective row span.
    pub fn row_span(&self) -> usize {
        self.row_span.filter(|s| *s > 0).unwrap_or(1)
    }

    /// Effective column span.
    pub fn column_span(&self) -> usize {
        self.column_span.filter(|s| *s > 0).unwrap_or(1)
    }

    /// Check if this cell spans multiple rows or columns.
    pub fn is_merged(&self) -> bool {
        self.row_span() > 1 || self.column_span() > 1
    }
}
