//! Layout reconstruction options and configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default vertical tolerance, in page units, for grouping objects into rows.
pub const DEFAULT_THRESHOLD_Y: f64 = 0.05;

/// Options controlling how analysis results become text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Reading order strategy
    pub page_layout: PageLayout,

    /// Vertical tolerance for single-column row grouping
    pub threshold_y: f64,

    /// How tables are rendered
    pub table_format: TableFormat,

    /// Emit tables as their own documents instead of inline text
    pub extract_tables_separately: bool,

    /// Lines before a table kept as `preceding_context`
    pub preceding_context_len: usize,

    /// Lines after a table kept as `following_context`
    pub following_context_len: usize,
}

impl LayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reading order strategy.
    pub fn with_page_layout(mut self, layout: PageLayout) -> Self {
        self.page_layout = layout;
        self
    }

    /// Set the row grouping threshold.
    pub fn with_threshold_y(mut self, threshold_y: f64) -> Self {
        self.threshold_y = threshold_y;
        self
    }

    /// Set the table format.
    pub fn with_table_format(mut self, format: TableFormat) -> Self {
        self.table_format = format;
        self
    }

    /// Enable or disable separate table extraction.
    pub fn with_tables_separately(mut self, separately: bool) -> Self {
        self.extract_tables_separately = separately;
        self
    }

    /// Set the number of context lines kept around extracted tables.
    pub fn with_context_lines(mut self, preceding: usize, following: usize) -> Self {
        self.preceding_context_len = preceding;
        self.following_context_len = following;
        self
    }

    /// Reject unsupported combinations.
    pub fn validate(&self) -> Result<()> {
        if self.extract_tables_separately && self.table_format == TableFormat::Text {
            return Err(Error::InvalidConfig(
                "Table format 'text' is not supported when extracting tables separately. Choose 'csv'."
                    .into(),
            ));
        }
        if !self.threshold_y.is_finite() || self.threshold_y < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "threshold_y must be a non-negative number, got {}",
                self.threshold_y
            )));
        }
        Ok(())
    }

    /// How tables interact with the text stream under these options.
    pub fn table_handling(&self) -> TableHandling {
        if self.extract_tables_separately {
            TableHandling::Exclude
        } else if self.table_format == TableFormat::Csv {
            TableHandling::Inline
        } else {
            TableHandling::Keep
        }
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            page_layout: PageLayout::Natural,
            threshold_y: DEFAULT_THRESHOLD_Y,
            table_format: TableFormat::Csv,
            extract_tables_separately: true,
            preceding_context_len: 3,
            following_context_len: 3,
        }
    }
}

/// Reading order strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageLayout {
    /// Reading order reported by the analysis service
    #[default]
    Natural,
    /// Group lines into rows by vertical position
    #[serde(alias = "single_column")]
    SingleColumnByLine,
    /// Group paragraphs into rows by vertical position
    SingleColumnByParagraph,
}

impl PageLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageLayout::Natural => "natural",
            PageLayout::SingleColumnByLine => "single_column_by_line",
            PageLayout::SingleColumnByParagraph => "single_column_by_paragraph",
        }
    }
}

impl fmt::Display for PageLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageLayout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "natural" => Ok(PageLayout::Natural),
            "single_column" | "single_column_by_line" => Ok(PageLayout::SingleColumnByLine),
            "single_column_by_paragraph" => Ok(PageLayout::SingleColumnByParagraph),
            other => Err(Error::InvalidConfig(format!(
                "Unknown page layout '{}'. Expected natural, single_column, \
                 single_column_by_line or single_column_by_paragraph",
                other
            ))),
        }
    }
}

/// Table output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    /// Header-less CSV
    #[default]
    Csv,
    /// Leave table text as ordinary lines and paragraphs
    Text,
}

impl FromStr for TableFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "csv" => Ok(TableFormat::Csv),
            "text" => Ok(TableFormat::Text),
            other => Err(Error::InvalidConfig(format!(
                "Unknown table format '{}'. Expected csv or text",
                other
            ))),
        }
    }
}

/// How table regions are reconciled with the text stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableHandling {
    /// Drop text inside tables; tables are emitted elsewhere
    Exclude,
    /// Drop text inside tables and place the tables themselves in the text
    Inline,
    /// Leave text untouched
    Keep,
}
