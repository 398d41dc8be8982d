//! Ridges: the `(d-2)`-faces shared by exactly two facets.
//!
//! A ridge names its two facets as `top` and `bottom`. The labels carry no geometric
//! meaning; they only give each side a stable slot so a facet can be swapped out when the
//! hull is rebuilt around it.

#![forbid(unsafe_code)]

use super::collections::VertexKeyBuffer;
use super::facet::FacetView;
use super::hull_data_structure::{FacetKey, RidgeKey, VertexKey};
use super::vertex::VertexView;
use crate::geometry::algorithms::convex_hull::ConvexHull;
use crate::geometry::point::PointId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ridge record stored in the facet graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ridge {
    pub(crate) id: u64,
    pub(crate) top: FacetKey,
    pub(crate) bottom: FacetKey,
    pub(crate) vertices: VertexKeyBuffer,
    pub(crate) tested: bool,
}

impl Ridge {
    /// Vertices are kept sorted by key so equal vertex sets compare equal.
    pub(crate) fn new(top: FacetKey, bottom: FacetKey, mut vertices: VertexKeyBuffer) -> Self {
        vertices.sort_unstable();
        Self {
            id: 0,
            top,
            bottom,
            vertices,
            tested: false,
        }
    }

    /// Unique, monotonically assigned id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// First incident facet.
    #[inline]
    #[must_use]
    pub const fn top(&self) -> FacetKey {
        self.top
    }

    /// Second incident facet.
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> FacetKey {
        self.bottom
    }

    /// Vertex keys, sorted.
    #[inline]
    #[must_use]
    pub fn vertex_keys(&self) -> &[VertexKey] {
        &self.vertices
    }

    /// Whether the ridge was examined by the current horizon search.
    #[inline]
    #[must_use]
    pub const fn is_tested(&self) -> bool {
        self.tested
    }

    /// `true` if `facet` is one of the two sides.
    #[inline]
    #[must_use]
    pub fn contains_facet(&self, facet: FacetKey) -> bool {
        self.top == facet || self.bottom == facet
    }

    /// The facet on the other side of `facet`, or `None` if `facet` is not incident.
    #[must_use]
    pub fn other(&self, facet: FacetKey) -> Option<FacetKey> {
        if self.top == facet {
            Some(self.bottom)
        } else if self.bottom == facet {
            Some(self.top)
        } else {
            None
        }
    }

    /// Replaces one side. Returns `false` if `old` was not incident.
    pub(crate) fn replace_facet(&mut self, old: FacetKey, new: FacetKey) -> bool {
        if self.top == old {
            self.top = new;
            true
        } else if self.bottom == old {
            self.bottom = new;
            true
        } else {
            false
        }
    }
}

/// Serializable snapshot of one ridge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RidgeReport {
    /// Ridge id.
    pub id: u64,
    /// Id of the top facet.
    pub top: u64,
    /// Id of the bottom facet.
    pub bottom: u64,
    /// Vertex points, in vertex-key order.
    pub vertices: Vec<PointId>,
}

impl fmt::Display for RidgeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{} between f{} and f{}:", self.id, self.top, self.bottom)?;
        for v in &self.vertices {
            write!(f, " {v}")?;
        }
        Ok(())
    }
}

/// Read-only view of a ridge of a finished hull.
#[derive(Clone, Copy)]
pub struct RidgeView<'a> {
    hull: &'a ConvexHull,
    key: RidgeKey,
    ridge: &'a Ridge,
}

impl<'a> RidgeView<'a> {
    pub(crate) fn new(hull: &'a ConvexHull, key: RidgeKey) -> Option<Self> {
        hull.graph().ridge(key).map(|ridge| Self { hull, key, ridge })
    }

    /// Arena key.
    #[inline]
    #[must_use]
    pub const fn key(&self) -> RidgeKey {
        self.key
    }

    /// Unique id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.ridge.id
    }

    /// Underlying record.
    #[inline]
    #[must_use]
    pub const fn ridge(&self) -> &'a Ridge {
        self.ridge
    }

    /// First incident facet.
    #[must_use]
    pub fn top(&self) -> Option<FacetView<'a>> {
        FacetView::new(self.hull, self.ridge.top)
    }

    /// Second incident facet.
    #[must_use]
    pub fn bottom(&self) -> Option<FacetView<'a>> {
        FacetView::new(self.hull, self.ridge.bottom)
    }

    /// The facet across the ridge from `facet`.
    #[must_use]
    pub fn other(&self, facet: FacetKey) -> Option<FacetView<'a>> {
        self.ridge
            .other(facet)
            .and_then(|key| FacetView::new(self.hull, key))
    }

    /// Vertices of the ridge.
    pub fn vertices(self) -> impl Iterator<Item = VertexView<'a>> + 'a {
        let hull = self.hull;
        self.ridge
            .vertices
            .iter()
            .filter_map(move |&key| VertexView::new(hull, key))
    }

    /// Snapshot for printing or export.
    #[must_use]
    pub fn report(&self) -> Option<RidgeReport> {
        self.hull.ridge_report(self.key).ok()
    }
}

impl fmt::Debug for RidgeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RidgeView")
            .field("id", &self.ridge.id)
            .field("vertices", &self.ridge.vertices.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_other_and_replace() {
        let mut facets: SlotMap<FacetKey, ()> = SlotMap::with_key();
        let a = facets.insert(());
        let b = facets.insert(());
        let c = facets.insert(());

        let mut ridge = Ridge::new(a, b, VertexKeyBuffer::new());
        assert_eq!(ridge.other(a), Some(b));
        assert_eq!(ridge.other(b), Some(a));
        assert_eq!(ridge.other(c), None);

        assert!(ridge.replace_facet(b, c));
        assert_eq!(ridge.bottom(), c);
        assert!(!ridge.replace_facet(b, a));
        assert!(ridge.contains_facet(c));
        assert!(!ridge.contains_facet(b));
    }

    #[test]
    fn test_report_display() {
        let report = RidgeReport {
            id: 7,
            top: 1,
            bottom: 4,
            vertices: vec![PointId::new(0), PointId::new(3)],
        };
        assert_eq!(report.to_string(), "r7 between f1 and f4: p0 p3");
    }

    #[test]
    fn test_vertices_are_sorted() {
        let mut facets: SlotMap<FacetKey, ()> = SlotMap::with_key();
        let a = facets.insert(());
        let b = facets.insert(());
        let mut vertices: SlotMap<VertexKey, ()> = SlotMap::with_key();
        let v0 = vertices.insert(());
        let v1 = vertices.insert(());
        let v2 = vertices.insert(());

        let ridge = Ridge::new(a, b, [v2, v0, v1].into_iter().collect());
        assert_eq!(ridge.vertex_keys(), &[v0, v1, v2]);
    }
}
