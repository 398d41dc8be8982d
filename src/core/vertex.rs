//! Hull vertices.
//!
//! A [`Vertex`] ties an input point to the facets it belongs to. Vertices are created when a
//! point becomes part of the hull boundary and removed when no facet uses them any more
//! (the point then lies inside the hull, or on a facet interior after a merge).
//!
//! # Examples
//!
//! ```rust
//! use qhull_rs::prelude::*;
//!
//! let hull = ConvexHull::from_points(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]).unwrap();
//! for vertex in hull.vertices() {
//!     assert_eq!(vertex.facets().count(), 2);
//! }
//! ```

#![forbid(unsafe_code)]

use super::collections::FacetKeyBuffer;
use super::facet::FacetView;
use super::hull_data_structure::{FacetKey, VertexKey};
use crate::geometry::algorithms::convex_hull::ConvexHull;
use crate::geometry::point::PointId;
use std::fmt;

// =============================================================================
// VERTEX RECORD
// =============================================================================

/// Vertex record stored in the facet graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vertex {
    pub(crate) id: u64,
    pub(crate) point: PointId,
    pub(crate) facets: FacetKeyBuffer,
    pub(crate) newly_added: bool,
}

impl Vertex {
    pub(crate) fn new(point: PointId) -> Self {
        Self {
            id: 0,
            point,
            facets: FacetKeyBuffer::new(),
            newly_added: false,
        }
    }

    /// Unique, monotonically assigned id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// The point this vertex stands for.
    #[inline]
    #[must_use]
    pub const fn point(&self) -> PointId {
        self.point
    }

    /// Keys of the facets containing this vertex.
    #[inline]
    #[must_use]
    pub fn facet_keys(&self) -> &[FacetKey] {
        &self.facets
    }

    /// `true` while the vertex is the apex of the cone being attached.
    #[inline]
    #[must_use]
    pub const fn is_newly_added(&self) -> bool {
        self.newly_added
    }

    pub(crate) fn add_facet(&mut self, facet: FacetKey) {
        if !self.facets.contains(&facet) {
            self.facets.push(facet);
        }
    }

    pub(crate) fn remove_facet(&mut self, facet: FacetKey) {
        self.facets.retain(|f| *f != facet);
    }
}

// =============================================================================
// VERTEX VIEW
// =============================================================================

/// Read-only view of a vertex of a finished hull.
#[derive(Clone, Copy)]
pub struct VertexView<'a> {
    hull: &'a ConvexHull,
    key: VertexKey,
    vertex: &'a Vertex,
}

impl<'a> VertexView<'a> {
    pub(crate) fn new(hull: &'a ConvexHull, key: VertexKey) -> Option<Self> {
        hull.graph().vertex(key).map(|vertex| Self { hull, key, vertex })
    }

    /// Arena key.
    #[inline]
    #[must_use]
    pub const fn key(&self) -> VertexKey {
        self.key
    }

    /// Unique id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.vertex.id
    }

    /// Underlying record.
    #[inline]
    #[must_use]
    pub const fn vertex(&self) -> &'a Vertex {
        self.vertex
    }

    /// Id of the point this vertex stands for.
    #[inline]
    #[must_use]
    pub const fn point_id(&self) -> PointId {
        self.vertex.point
    }

    /// Coordinates of the vertex in hull space (lifted in Voronoi mode).
    #[must_use]
    pub fn coords(&self) -> &'a [f64] {
        self.hull.points().coords(self.vertex.point).unwrap_or(&[])
    }

    /// Facets incident to the vertex.
    pub fn facets(self) -> impl Iterator<Item = FacetView<'a>> + 'a {
        let hull = self.hull;
        self.vertex
            .facets
            .iter()
            .filter_map(move |&key| FacetView::new(hull, key))
    }
}

impl fmt::Debug for VertexView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VertexView")
            .field("id", &self.vertex.id)
            .field("point", &self.vertex.point)
            .field("facets", &self.vertex.facets.len())
            .finish()
    }
}
