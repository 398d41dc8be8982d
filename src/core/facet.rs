//! Hull facets.
//!
//! A facet is a `(d-1)`-face of the hull: an oriented hyperplane, the vertices that span it,
//! the ridges it shares with its neighbors, and the points that were assigned to it during
//! construction. Facets live in the [`FacetGraph`](super::hull_data_structure::FacetGraph)
//! arena and are also threaded on an intrusive, doubly-linked list that fixes the order in
//! which Quickhull visits them.
//!
//! Read access on a finished hull goes through [`FacetView`], which adds the derived
//! queries (area, centers, inner and outer planes, reports) on top of the stored record.
//!
//! # Examples
//!
//! ```rust
//! use qhull_rs::prelude::*;
//!
//! let hull = ConvexHull::from_points(&[
//!     [0.0, 0.0, 0.0],
//!     [1.0, 0.0, 0.0],
//!     [0.0, 1.0, 0.0],
//!     [0.0, 0.0, 1.0],
//! ])
//! .unwrap();
//!
//! let facet = hull.first_facet().unwrap();
//! assert!(facet.is_simplicial());
//! assert_eq!(facet.vertices().count(), 3);
//! assert_eq!(facet.neighbors().count(), 3);
//! assert!(facet.area().unwrap() > 0.0);
//! ```

#![forbid(unsafe_code)]

use super::collections::{FacetKeyBuffer, RidgeKeyBuffer, VertexKeyBuffer};
use super::hull_data_structure::{FacetKey, RidgeKey, VertexKey};
use super::ridge::RidgeView;
use super::vertex::VertexView;
use crate::geometry::algorithms::convex_hull::{ConvexHull, QueryError};
use crate::geometry::hyperplane::Hyperplane;
use crate::geometry::point::PointId;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;
use std::sync::OnceLock;

// =============================================================================
// SUPPORTING TYPES
// =============================================================================

/// A point assigned to a facet together with its signed distance to the facet plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedPoint {
    /// The point.
    pub point: PointId,
    /// Signed distance to the facet hyperplane when the point was assigned.
    pub distance: f64,
}

/// Boolean state carried by every facet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct FacetFlags {
    /// Selected by the good-facet filter.
    pub good: bool,
    /// Exactly `d` vertices and `d` ridges.
    pub simplicial: bool,
    /// Upper side of the lifted hull (Voronoi mode only).
    pub upper_delaunay: bool,
    /// Piece of a merged facet split back into simplices; shares its owner's plane.
    pub tricoplanar: bool,
    /// Result of at least one merge.
    pub merged: bool,
    /// Numerically degenerate piece (zero measure).
    pub degenerate: bool,
    /// Created by the current cone attachment. Always `false` on a finished hull.
    pub new_facet: bool,
    /// Visible from the current apex. Always `false` on a finished hull.
    pub visible: bool,
}

impl fmt::Display for FacetFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (self.good, "good"),
            (self.simplicial, "simplicial"),
            (self.upper_delaunay, "upperDelaunay"),
            (self.tricoplanar, "tricoplanar"),
            (self.merged, "merged"),
            (self.degenerate, "degenerate"),
            (self.new_facet, "new"),
            (self.visible, "visible"),
        ];
        let mut first = true;
        for (_, name) in names.iter().filter(|(set, _)| *set) {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}

/// Which center [`FacetView::center`] computes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CenterKind {
    /// Arithmetic mean of the facet's vertices, in hull coordinates.
    #[default]
    Centroid,
    /// Circumcenter of the facet's input points, recovered from the paraboloid lift.
    Voronoi,
}

// =============================================================================
// FACET RECORD
// =============================================================================

/// Facet record stored in the facet graph.
#[derive(Clone, Debug)]
pub struct Facet {
    pub(crate) id: u64,
    pub(crate) hyperplane: Hyperplane,
    pub(crate) vertices: VertexKeyBuffer,
    pub(crate) ridges: RidgeKeyBuffer,
    pub(crate) neighbors: FacetKeyBuffer,
    pub(crate) outside: Vec<ClassifiedPoint>,
    pub(crate) coplanar: Vec<ClassifiedPoint>,
    pub(crate) next: Option<FacetKey>,
    pub(crate) previous: Option<FacetKey>,
    pub(crate) flags: FacetFlags,
    pub(crate) tricoplanar_owner: Option<FacetKey>,
    pub(crate) max_outside: f64,
    pub(crate) min_vertex: f64,
    pub(crate) centroid_cache: OnceLock<Vec<f64>>,
    pub(crate) voronoi_cache: OnceLock<Vec<f64>>,
}

impl Facet {
    pub(crate) fn new(hyperplane: Hyperplane, vertices: VertexKeyBuffer) -> Self {
        Self {
            id: 0,
            hyperplane,
            vertices,
            ridges: RidgeKeyBuffer::new(),
            neighbors: FacetKeyBuffer::new(),
            outside: Vec::new(),
            coplanar: Vec::new(),
            next: None,
            previous: None,
            flags: FacetFlags::default(),
            tricoplanar_owner: None,
            max_outside: 0.0,
            min_vertex: 0.0,
            centroid_cache: OnceLock::new(),
            voronoi_cache: OnceLock::new(),
        }
    }

    /// Unique, monotonically assigned id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Oriented hyperplane; the hull interior is on its negative side.
    #[inline]
    #[must_use]
    pub const fn hyperplane(&self) -> &Hyperplane {
        &self.hyperplane
    }

    /// Vertex keys.
    #[inline]
    #[must_use]
    pub fn vertex_keys(&self) -> &[VertexKey] {
        &self.vertices
    }

    /// Ridge keys.
    #[inline]
    #[must_use]
    pub fn ridge_keys(&self) -> &[RidgeKey] {
        &self.ridges
    }

    /// Neighbor keys: the facets across this facet's ridges.
    #[inline]
    #[must_use]
    pub fn neighbor_keys(&self) -> &[FacetKey] {
        &self.neighbors
    }

    /// Outside set, farthest point first. Empty on a finished hull.
    #[inline]
    #[must_use]
    pub fn outside(&self) -> &[ClassifiedPoint] {
        &self.outside
    }

    /// Coplanar set: points within tolerance of this facet that are not vertices.
    #[inline]
    #[must_use]
    pub fn coplanar(&self) -> &[ClassifiedPoint] {
        &self.coplanar
    }

    /// Next facet in list order.
    #[inline]
    #[must_use]
    pub const fn next(&self) -> Option<FacetKey> {
        self.next
    }

    /// Previous facet in list order.
    #[inline]
    #[must_use]
    pub const fn previous(&self) -> Option<FacetKey> {
        self.previous
    }

    /// Flags.
    #[inline]
    #[must_use]
    pub const fn flags(&self) -> FacetFlags {
        self.flags
    }

    /// Owner of a tricoplanar piece.
    #[inline]
    #[must_use]
    pub const fn tricoplanar_owner(&self) -> Option<FacetKey> {
        self.tricoplanar_owner
    }

    /// Largest distance of a vertex or coplanar point above the plane (at least 0).
    #[inline]
    #[must_use]
    pub const fn max_outside(&self) -> f64 {
        self.max_outside
    }

    /// Most negative distance of a vertex below the plane (at most 0).
    #[inline]
    #[must_use]
    pub const fn min_vertex(&self) -> f64 {
        self.min_vertex
    }

    /// Farthest outside point, if any.
    #[must_use]
    pub fn furthest_outside(&self) -> Option<ClassifiedPoint> {
        self.outside.first().copied()
    }

    /// Restores the farthest-first order of the outside set. Ties keep insertion order.
    pub(crate) fn sort_outside(&mut self) {
        self.outside
            .sort_by_key(|p| Reverse(OrderedFloat(p.distance)));
    }

    pub(crate) fn invalidate_caches(&mut self) {
        self.centroid_cache = OnceLock::new();
        self.voronoi_cache = OnceLock::new();
    }

    pub(crate) fn refresh_simplicial(&mut self, dimension: usize) {
        self.flags.simplicial = self.vertices.len() == dimension && self.ridges.len() == dimension;
    }
}

// =============================================================================
// FACET REPORT
// =============================================================================

/// Serializable snapshot of one facet, for printing and export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FacetReport {
    /// Facet id.
    pub id: u64,
    /// Flags.
    pub flags: FacetFlags,
    /// Unit normal.
    pub normal: Vec<f64>,
    /// Plane offset.
    pub offset: f64,
    /// Requested center, if it could be computed.
    pub center: Option<Vec<f64>>,
    /// Offset of the inner plane.
    pub inner_offset: f64,
    /// Offset of the outer plane.
    pub outer_offset: f64,
    /// Area, for good facets.
    pub area: Option<f64>,
    /// Vertex points.
    pub vertices: Vec<PointId>,
    /// Neighbor facet ids.
    pub neighbors: Vec<u64>,
    /// Ridge ids.
    pub ridges: Vec<u64>,
    /// Coplanar points.
    pub coplanar_points: Vec<PointId>,
    /// Owner id of a tricoplanar piece.
    pub tricoplanar_owner: Option<u64>,
}

impl fmt::Display for FacetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- f{}", self.id)?;
        writeln!(f, "    - flags: {}", self.flags)?;
        if let Some(owner) = self.tricoplanar_owner {
            writeln!(f, "    - owner of tricoplanar facet: f{owner}")?;
        }
        write!(f, "    - normal:")?;
        for n in &self.normal {
            write!(f, " {n:.6}")?;
        }
        writeln!(f)?;
        writeln!(f, "    - offset: {:.6}", self.offset)?;
        if let Some(center) = &self.center {
            write!(f, "    - center:")?;
            for c in center {
                write!(f, " {c:.6}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "    - inner plane offset: {:.6}", self.inner_offset)?;
        writeln!(f, "    - outer plane offset: {:.6}", self.outer_offset)?;
        if let Some(area) = self.area {
            writeln!(f, "    - area: {area:.6}")?;
        }
        write!(f, "    - vertices:")?;
        for v in &self.vertices {
            write!(f, " {v}")?;
        }
        writeln!(f)?;
        write!(f, "    - neighboring facets:")?;
        for n in &self.neighbors {
            write!(f, " f{n}")?;
        }
        writeln!(f)?;
        if !self.coplanar_points.is_empty() {
            write!(f, "    - coplanar points:")?;
            for p in &self.coplanar_points {
                write!(f, " {p}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// =============================================================================
// FACET VIEW
// =============================================================================

/// Read-only view of a facet of a finished hull.
///
/// Views are cheap to copy and borrow the hull, so they cannot outlive it.
#[derive(Clone, Copy)]
pub struct FacetView<'a> {
    hull: &'a ConvexHull,
    key: FacetKey,
    facet: &'a Facet,
}

impl<'a> FacetView<'a> {
    /// Creates a view, or `None` if `key` does not name a live facet.
    #[must_use]
    pub fn new(hull: &'a ConvexHull, key: FacetKey) -> Option<Self> {
        hull.graph().facet(key).map(|facet| Self { hull, key, facet })
    }

    /// Arena key.
    #[inline]
    #[must_use]
    pub const fn key(&self) -> FacetKey {
        self.key
    }

    /// Unique id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.facet.id
    }

    /// Underlying record.
    #[inline]
    #[must_use]
    pub const fn facet(&self) -> &'a Facet {
        self.facet
    }

    /// The hull this facet belongs to.
    #[inline]
    #[must_use]
    pub const fn hull(&self) -> &'a ConvexHull {
        self.hull
    }

    /// Oriented hyperplane.
    #[inline]
    #[must_use]
    pub const fn hyperplane(&self) -> &'a Hyperplane {
        &self.facet.hyperplane
    }

    /// Signed distance of a point to the facet plane.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::DimensionMismatch`] if the point does not have the hull's
    /// dimension.
    pub fn distance(&self, point: &[f64]) -> Result<f64, QueryError> {
        self.facet
            .hyperplane
            .checked_distance(point)
            .map_err(|_| QueryError::DimensionMismatch {
                expected: self.facet.hyperplane.dimension(),
                actual: point.len(),
            })
    }

    /// Flags.
    #[inline]
    #[must_use]
    pub const fn flags(&self) -> FacetFlags {
        self.facet.flags
    }

    /// Selected by the good-facet filter.
    #[inline]
    #[must_use]
    pub const fn is_good(&self) -> bool {
        self.facet.flags.good
    }

    /// Exactly `d` vertices and `d` ridges.
    #[inline]
    #[must_use]
    pub const fn is_simplicial(&self) -> bool {
        self.facet.flags.simplicial
    }

    /// On the upper side of the lifted hull.
    #[inline]
    #[must_use]
    pub const fn is_upper_delaunay(&self) -> bool {
        self.facet.flags.upper_delaunay
    }

    /// Piece of a triangulated merged facet.
    #[inline]
    #[must_use]
    pub const fn is_tricoplanar(&self) -> bool {
        self.facet.flags.tricoplanar
    }

    /// Owner of a tricoplanar piece; all pieces of one merged facet share it.
    #[must_use]
    pub fn tricoplanar_owner(&self) -> Option<FacetView<'a>> {
        self.facet
            .tricoplanar_owner
            .and_then(|key| Self::new(self.hull, key))
    }

    /// Next facet in list order, `None` at the end of the list.
    #[must_use]
    pub fn next(&self) -> Option<FacetView<'a>> {
        self.facet.next.and_then(|key| Self::new(self.hull, key))
    }

    /// Previous facet in list order, `None` at the start of the list.
    #[must_use]
    pub fn previous(&self) -> Option<FacetView<'a>> {
        self.facet
            .previous
            .and_then(|key| Self::new(self.hull, key))
    }

    /// Vertices of the facet.
    pub fn vertices(self) -> impl Iterator<Item = VertexView<'a>> + 'a {
        let hull = self.hull;
        self.facet
            .vertices
            .iter()
            .filter_map(move |&key| VertexView::new(hull, key))
    }

    /// Points of the facet's vertices.
    pub fn vertex_points(self) -> impl Iterator<Item = PointId> + 'a {
        self.vertices().map(|vertex| vertex.point_id())
    }

    /// Ridges of the facet.
    pub fn ridges(self) -> impl Iterator<Item = RidgeView<'a>> + 'a {
        let hull = self.hull;
        self.facet
            .ridges
            .iter()
            .filter_map(move |&key| RidgeView::new(hull, key))
    }

    /// Facets sharing a ridge with this one.
    pub fn neighbors(self) -> impl Iterator<Item = FacetView<'a>> + 'a {
        let hull = self.hull;
        self.facet
            .neighbors
            .iter()
            .filter_map(move |&key| Self::new(hull, key))
    }

    /// Outside set. Always empty on a finished hull.
    #[inline]
    #[must_use]
    pub fn outside_points(&self) -> &'a [ClassifiedPoint] {
        &self.facet.outside
    }

    /// Coplanar set.
    #[inline]
    #[must_use]
    pub fn coplanar_points(&self) -> &'a [ClassifiedPoint] {
        &self.facet.coplanar
    }

    /// Facet area; see [`ConvexHull::facet_area`].
    ///
    /// # Errors
    ///
    /// Same as [`ConvexHull::facet_area`].
    pub fn area(&self) -> Result<f64, QueryError> {
        self.hull.facet_area(self.key)
    }

    /// Facet center; see [`ConvexHull::facet_center`].
    ///
    /// # Errors
    ///
    /// Same as [`ConvexHull::facet_center`].
    pub fn center(&self, kind: CenterKind) -> Result<Vec<f64>, QueryError> {
        self.hull.facet_center(self.key, kind)
    }

    /// Voronoi vertex; see [`ConvexHull::voronoi_vertex`].
    ///
    /// # Errors
    ///
    /// Same as [`ConvexHull::voronoi_vertex`].
    pub fn voronoi_vertex(&self) -> Result<Vec<f64>, QueryError> {
        self.hull.voronoi_vertex(self.key)
    }

    /// Inner plane; see [`ConvexHull::inner_plane`].
    ///
    /// # Errors
    ///
    /// Same as [`ConvexHull::inner_plane`].
    pub fn inner_plane(&self) -> Result<Hyperplane, QueryError> {
        self.hull.inner_plane(self.key)
    }

    /// Outer plane; see [`ConvexHull::outer_plane`].
    ///
    /// # Errors
    ///
    /// Same as [`ConvexHull::outer_plane`].
    pub fn outer_plane(&self) -> Result<Hyperplane, QueryError> {
        self.hull.outer_plane(self.key)
    }

    /// Snapshot for printing or export; see [`ConvexHull::facet_report`].
    ///
    /// # Errors
    ///
    /// Same as [`ConvexHull::facet_report`].
    pub fn report(&self, center: CenterKind) -> Result<FacetReport, QueryError> {
        self.hull.facet_report(self.key, center)
    }
}

impl PartialEq for FacetView<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.hull, other.hull) && self.key == other.key
    }
}

impl Eq for FacetView<'_> {}

impl fmt::Debug for FacetView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacetView")
            .field("id", &self.facet.id)
            .field("flags", &self.facet.flags)
            .field("vertices", &self.facet.vertices.len())
            .finish()
    }
}
