//! Row clustering for single-column layouts.
//!
//! Objects whose upper-left corners are vertically closer than `threshold_y`
//! share a row, and the relation is closed transitively: three
//! lines at y = 0.00, 0.04 and 0.08 with a threshold of 0.05 form one row
//! even though the outer two are 0.08 apart.

use super::object::{ObjectsByPage, PageObject};

/// Disjoint-set forest over object indices.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    /// Create `n` singleton sets.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of the set containing `x`.
    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            // path halving
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merge the sets containing `a` and `b`.
    pub fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }

    /// All sets, ordered by smallest member, members ascending.
    pub fn components(&mut self) -> Vec<Vec<usize>> {
        let mut slot_of_root: Vec<Option<usize>> = vec![None; self.len()];
        let mut components: Vec<Vec<usize>> = Vec::new();

        for i in 0..self.len() {
            let root = self.find(i);
            match slot_of_root[root] {
                Some(slot) => components[slot].push(i),
                None => {
                    slot_of_root[root] = Some(components.len());
                    components.push(vec![i]);
                }
            }
        }

        components
    }
}

/// Group the objects of one page into rows of indices.
///
/// Returns `None` when any object lacks a polygon, since vertical position
/// is then unknown for part of the page.
pub fn cluster_rows(objects: &[PageObject<'_>], threshold_y: f64) -> Option<Vec<Vec<usize>>> {
    let ys: Vec<f64> = objects
        .iter()
        .map(|obj| obj.upper_left().map(|p| p.y))
        .collect::<Option<_>>()?;

    let mut sets = DisjointSet::new(ys.len());
    for i in 0..ys.len() {
        for j in (i + 1)..ys.len() {
            if (ys[i] - ys[j]).abs() < threshold_y {
                sets.union(i, j);
            }
        }
    }

    Some(sets.components())
}

/// Cluster every page, falling back to one object per row, in source order,
/// on pages with missing polygons.
pub fn cluster_pages(
    objects_by_page: &ObjectsByPage<'_>,
    threshold_y: f64,
) -> Vec<(u32, PageRows)> {
    objects_by_page
        .iter()
        .map(|(&page_number, objects)| {
            let rows = match cluster_rows(objects, threshold_y) {
                Some(rows) => PageRows::Clustered(rows),
                None => {
                    log::warn!(
                        "Polygon information missing on page {}; each object gets its own row",
                        page_number
                    );
                    PageRows::Unpositioned(objects.len())
                }
            };
            (page_number, rows)
        })
        .collect()
}

/// Row grouping outcome for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRows {
    /// Index rows built from polygon positions
    Clustered(Vec<Vec<usize>>),
    /// Position unknown; `n` singleton rows kept in source order
    Unpositioned(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Line, Point, Span};

    fn line_at(text: &str, offset: usize, x: f64, y: f64) -> Line {
        Line::new(text, Span::new(offset, text.len()), Some(vec![Point::new(x, y)]))
    }

    // ==================== Disjoint Set Tests ====================

    #[test]
    fn test_disjoint_set_components() {
        let mut sets = DisjointSet::new(5);
        sets.union(3, 1);
        sets.union(4, 0);
        assert_eq!(sets.components(), vec![vec![0, 4], vec![1, 3], vec![2]]);
    }

    #[test]
    fn test_disjoint_set_union_is_idempotent() {
        let mut sets = DisjointSet::new(3);
        sets.union(0, 1);
        sets.union(1, 0);
        sets.union(0, 1);
        assert_eq!(sets.find(0), sets.find(1));
        assert_ne!(sets.find(0), sets.find(2));
    }

    #[test]
    fn test_disjoint_set_empty() {
        let mut sets = DisjointSet::new(0);
        assert!(sets.is_empty());
        assert!(sets.components().is_empty());
    }

    // ==================== Clustering Tests ====================

    #[test]
    fn test_rows_are_transitive() {
        let lines = [
            line_at("a", 0, 0.0, 0.0),
            line_at("b", 2, 1.0, 0.04),
            line_at("c", 4, 2.0, 0.08),
        ];
        let objects: Vec<_> = lines.iter().map(PageObject::Line).collect();

        assert_eq!(cluster_rows(&objects, 0.05), Some(vec![vec![0, 1, 2]]));
    }

    #[test]
    fn test_threshold_is_strict() {
        let lines = [line_at("a", 0, 0.0, 1.0), line_at("b", 2, 1.0, 1.5)];
        let objects: Vec<_> = lines.iter().map(PageObject::Line).collect();

        assert_eq!(cluster_rows(&objects, 0.6), Some(vec![vec![0, 1]]));
        assert_eq!(cluster_rows(&objects, 0.5), Some(vec![vec![0], vec![1]]));
    }

    #[test]
    fn test_zero_threshold_yields_singletons() {
        let lines = [line_at("a", 0, 0.0, 1.0), line_at("b", 2, 1.0, 1.0)];
        let objects: Vec<_> = lines.iter().map(PageObject::Line).collect();

        assert_eq!(cluster_rows(&objects, 0.0), Some(vec![vec![0], vec![1]]));
    }

    #[test]
    fn test_missing_polygon_disables_clustering() {
        let lines = [
            line_at("a", 0, 0.0, 1.0),
            Line::new("b", Span::new(2, 1), None),
        ];
        let objects: Vec<_> = lines.iter().map(PageObject::Line).collect();
        assert_eq!(cluster_rows(&objects, 0.05), None);

        let mut by_page = ObjectsByPage::new();
        by_page.insert(1, objects);
        assert_eq!(
            cluster_pages(&by_page, 0.05),
            vec![(1, PageRows::Unpositioned(2))]
        );
    }
}
