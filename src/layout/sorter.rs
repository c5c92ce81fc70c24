//! Reading-order sorting of clustered rows.

use super::clustering::{cluster_pages, PageRows};
use super::object::{ObjectsByPage, PageObject, Row, RowsByPage};

/// Order the rows of one page.
///
/// Members of a row are sorted left to right by upper-left x, then rows are
/// sorted top to bottom by the upper-left y of their first member. Both sorts
/// are stable. Unpositioned pages keep source order.
pub fn sort_rows<'a>(objects: &[PageObject<'a>], rows: PageRows) -> Vec<Row<'a>> {
    match rows {
        PageRows::Unpositioned(_) => objects.iter().map(|obj| vec![*obj]).collect(),
        PageRows::Clustered(indices) => {
            let mut rows: Vec<Row<'a>> = indices
                .into_iter()
                .map(|row| {
                    let mut row: Row<'a> = row.into_iter().map(|i| objects[i]).collect();
                    row.sort_by(|a, b| x_of(a).total_cmp(&x_of(b)));
                    row
                })
                .filter(|row| !row.is_empty())
                .collect();
            rows.sort_by(|a, b| y_of(&a[0]).total_cmp(&y_of(&b[0])));
            rows
        }
    }
}

/// Cluster and sort every page.
pub fn single_column_rows<'a>(objects_by_page: &ObjectsByPage<'a>, threshold_y: f64) -> RowsByPage<'a> {
    cluster_pages(objects_by_page, threshold_y)
        .into_iter()
        .map(|(page_number, rows)| {
            let objects = objects_by_page
                .get(&page_number)
                .map(Vec::as_slice)
                .unwrap_or_default();
            (page_number, sort_rows(objects, rows))
        })
        .collect()
}

// Clustered pages always have polygons.
fn x_of(obj: &PageObject<'_>) -> f64 {
    obj.upper_left().map(|p| p.x).unwrap_or(0.0)
}

fn y_of(obj: &PageObject<'_>) -> f64 {
    obj.upper_left().map(|p| p.y).unwrap_or(0.0)
}
