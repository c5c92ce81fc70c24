//! Analysis result types produced by the document-analysis (OCR) service.
//!
//! These mirror the service's response closely enough to deserialize either
//! the SDK dictionary form (snake_case keys, `{x, y}` points) or the REST form
//! (camelCase keys, flat `[x1, y1, x2, y2, ...]` polygons).

use serde::{Deserialize, Deserializer, Serialize};

use super::Table;

/// A point on a page, in the page's unit (usually inches).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A `(offset, length)` region of the full extracted content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub offset: usize,
    pub length: usize,
}

impl Span {
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// Offset just past the span, inclusive bound used for table containment.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    /// Check if an offset falls within `[offset, offset + length]`.
    pub fn contains(&self, offset: usize) -> bool {
        self.offset <= offset && offset <= self.end()
    }
}

/// Page association of an object, with its polygon on that page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingRegion {
    #[serde(alias = "pageNumber")]
    pub page_number: u32,

    #[serde(
        default,
        deserialize_with = "deserialize_polygon",
        skip_serializing_if = "Option::is_none"
    )]
    pub polygon: Option<Vec<Point>>,
}

impl BoundingRegion {
    pub fn new(page_number: u32, polygon: Option<Vec<Point>>) -> Self {
        Self {
            page_number,
            polygon,
        }
    }
}

/// A line of text detected on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub content: String,

    #[serde(
        default,
        deserialize_with = "deserialize_polygon",
        skip_serializing_if = "Option::is_none"
    )]
    pub polygon: Option<Vec<Point>>,

    #[serde(default)]
    pub spans: Vec<Span>,
}

impl Line {
    /// Create a line with a single span.
    pub fn new(content: impl Into<String>, span: Span, polygon: Option<Vec<Point>>) -> Self {
        Self {
            content: content.into(),
            polygon,
            spans: vec![span],
        }
    }

    /// First span of the line, which positions it in the content.
    pub fn first_span(&self) -> Option<&Span> {
        self.spans.first()
    }
}

/// A paragraph detected by the service, possibly spanning pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub content: String,

    /// Semantic role assigned by the service ("title", "pageHeader", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default, alias = "boundingRegions")]
    pub bounding_regions: Vec<BoundingRegion>,

    #[serde(default)]
    pub spans: Vec<Span>,
}

impl Paragraph {
    /// Create a paragraph on a single page.
    pub fn new(
        content: impl Into<String>,
        span: Span,
        page_number: u32,
        polygon: Option<Vec<Point>>,
    ) -> Self {
        Self {
            content: content.into(),
            role: None,
            bounding_regions: vec![BoundingRegion::new(page_number, polygon)],
            spans: vec![span],
        }
    }

    /// Polygon of the first bounding region.
    pub fn polygon(&self) -> Option<&[Point]> {
        self.bounding_regions
            .first()
            .and_then(|r| r.polygon.as_deref())
    }

    pub fn first_span(&self) -> Option<&Span> {
        self.spans.first()
    }

    /// Page the paragraph starts on, if the service reported one.
    pub fn first_page(&self) -> Option<u32> {
        self.bounding_regions.first().map(|r| r.page_number)
    }
}

/// A single page of the analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedPage {
    #[serde(alias = "pageNumber")]
    pub page_number: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub lines: Vec<Line>,
}

impl AnalyzedPage {
    /// Create an empty page.
    pub fn new(page_number: u32) -> Self {
        Self {
            page_number,
            width: None,
            height: None,
            unit: None,
            lines: Vec::new(),
        }
    }

    /// Add a line to the page.
    pub fn add_line(&mut self, line: Line) {
        self.lines.push(line);
    }
}

/// Full result of analyzing one source document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResult {
    #[serde(default, alias = "apiVersion", skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(default, alias = "modelId", skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,

    /// Concatenated text content that spans point into.
    #[serde(default)]
    pub content: String,

    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub pages: Vec<AnalyzedPage>,

    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub paragraphs: Vec<Paragraph>,

    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub tables: Vec<Table>,
}

impl AnalyzeResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a page by its page number.
    pub fn page(&self, page_number: u32) -> Option<&AnalyzedPage> {
        self.pages.iter().find(|p| p.page_number == page_number)
    }

    /// Parse a saved analysis response, unwrapping an `analyzeResult`
    /// envelope if present.
    pub fn from_json_slice(data: &[u8]) -> crate::Result<Self> {
        let mut value: serde_json::Value = serde_json::from_slice(data)?;
        if value.get("analyzeResult").is_some() {
            value = value["analyzeResult"].take();
        }
        Ok(serde_json::from_value(value)?)
    }
}

fn deserialize_polygon<'de, D>(deserializer: D) -> Result<Option<Vec<Point>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPolygon {
        Points(Vec<Point>),
        Flat(Vec<f64>),
    }

    let raw = Option::<RawPolygon>::deserialize(deserializer)?;
    Ok(raw.map(|polygon| match polygon {
        RawPolygon::Points(points) => points,
        RawPolygon::Flat(coords) => coords
            .chunks_exact(2)
            .map(|c| Point::new(c[0], c[1]))
            .collect(),
    }))
}

fn deserialize_null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_contains_is_inclusive() {
        let span = Span::new(10, 5);
        assert!(span.contains(10));
        assert!(span.contains(15));
        assert!(!span.contains(9));
        assert!(!span.contains(16));
    }

    #[test]
    fn test_deserialize_sdk_form() {
        let json = r#"{
            "content": "Hello",
            "pages": [{
                "page_number": 1,
                "lines": [{
                    "content": "Hello",
                    "polygon": [{"x": 1.0, "y": 2.0}, {"x": 3.0, "y": 2.0},
                                {"x": 3.0, "y": 2.5}, {"x": 1.0, "y": 2.5}],
                    "spans": [{"offset": 0, "length": 5}]
                }]
            }],
            "paragraphs": [],
            "tables": []
        }"#;
        let result: AnalyzeResult = serde_json::from_str(json).unwrap();
        let line = &result.pages[0].lines[0];
        assert_eq!(line.polygon.as_ref().unwrap()[0], Point::new(1.0, 2.0));
        assert_eq!(line.first_span(), Some(&Span::new(0, 5)));
    }

    #[test]
    fn test_deserialize_rest_form() {
        let json = r#"{
            "apiVersion": "2023-07-31",
            "modelId": "prebuilt-read",
            "content": "Title",
            "pages": [{"pageNumber": 2, "lines": null}],
            "paragraphs": [{
                "content": "Title",
                "role": "title",
                "boundingRegions": [{"pageNumber": 2, "polygon": [0.5, 0.7, 2.0, 0.7, 2.0, 0.9, 0.5, 0.9]}],
                "spans": [{"offset": 0, "length": 5}]
            }]
        }"#;
        let result: AnalyzeResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.model_id.as_deref(), Some("prebuilt-read"));
        assert!(result.pages[0].lines.is_empty());
        assert!(result.tables.is_empty());

        let paragraph = &result.paragraphs[0];
        assert_eq!(paragraph.first_page(), Some(2));
        assert_eq!(paragraph.polygon().unwrap()[0], Point::new(0.5, 0.7));
        assert_eq!(paragraph.polygon().unwrap().len(), 4);
    }

    #[test]
    fn test_missing_polygon() {
        let json = r#"{"content": "x", "spans": [{"offset": 0, "length": 1}]}"#;
        let line: Line = serde_json::from_str(json).unwrap();
        assert!(line.polygon.is_none());
    }

    #[test]
    fn test_from_json_slice_unwraps_envelope() {
        let data = br#"{"status": "succeeded", "analyzeResult": {"content": "x", "pages": []}}"#;
        let result = AnalyzeResult::from_json_slice(data).unwrap();
        assert_eq!(result.content, "x");
        assert!(AnalyzeResult::from_json_slice(b"[1, 2]").is_err());
    }
}
