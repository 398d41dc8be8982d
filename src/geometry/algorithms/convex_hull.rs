//! Convex hulls of point sets in any dimension.
//!
//! [`ConvexHull`] is the finished, read-only result of a Quickhull construction. It owns the
//! points it was built over (lifted onto the paraboloid in Voronoi mode), the facet graph,
//! the frozen per-run context, and the construction statistics. Everything exposed here is
//! a query: facet, ridge and vertex views, areas, centers, inner and outer planes, Voronoi
//! vertices, point location, reports, and validation.
//!
//! # Examples
//!
//! ```rust
//! use qhull_rs::geometry::algorithms::convex_hull::ConvexHull;
//!
//! let hull = ConvexHull::from_points(&[
//!     [0.0, 0.0],
//!     [1.0, 0.0],
//!     [1.0, 1.0],
//!     [0.0, 1.0],
//!     [0.5, 0.5],
//! ])
//! .unwrap();
//!
//! assert_eq!(hull.number_of_facets(), 4);
//! assert_eq!(hull.number_of_vertices(), 4);
//! assert!((hull.total_area().unwrap() - 4.0).abs() < 1e-12);
//! assert!(!hull.is_point_outside(&[0.25, 0.75]).unwrap());
//! assert!(hull.is_point_outside(&[2.0, 0.5]).unwrap());
//! ```

#![forbid(unsafe_code)]

use crate::core::algorithms::initial_simplex::select_initial_simplex;
use crate::core::algorithms::quickhull::{HullState, HullStatistics};
use crate::core::context::{GoodFacetFilter, HullContext, HullOptions};
use crate::core::facet::{CenterKind, Facet, FacetReport, FacetView};
use crate::core::hull_data_structure::{
    FacetGraph, FacetKey, HullConstructionError, HullErrorKind, HullValidationError,
    HullValidationReport, InvariantKind, RidgeKey,
};
use crate::core::ridge::{RidgeReport, RidgeView};
use crate::core::vertex::VertexView;
use crate::geometry::algorithms::paraboloid::{lift_to_paraboloid, voronoi_center_from_normal};
use crate::geometry::hyperplane::Hyperplane;
use crate::geometry::point::{PointId, PointStore, squared_distance};
use crate::geometry::tolerance::Tolerance;
use crate::geometry::util::{centroid, circumcenter, simplex_volume};
use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by queries on a finished hull.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The key does not name a live facet.
    #[error("Query on an undefined facet")]
    UndefinedFacet,
    /// The query needs a facet selected by the good-facet filter.
    #[error("Facet f{facet_id} is not good")]
    FacetNotGood {
        /// Id of the facet.
        facet_id: u64,
    },
    /// Voronoi vertices exist only for lower facets of the lifted hull.
    #[error("Facet f{facet_id} is an upper Delaunay facet and has no Voronoi vertex")]
    NotLowerDelaunay {
        /// Id of the facet.
        facet_id: u64,
    },
    /// A Voronoi query on a hull that was not built over lifted points.
    #[error("Voronoi query on a hull built without Voronoi mode")]
    NotVoronoiMode,
    /// A query point does not have the hull's dimension.
    #[error("Dimension mismatch: expected {expected} coordinates, found {actual}")]
    DimensionMismatch {
        /// Hull dimension.
        expected: usize,
        /// Dimension of the query point.
        actual: usize,
    },
    /// The facet is too degenerate for the requested measure.
    #[error("Facet f{facet_id} is degenerate: {message}")]
    Degenerate {
        /// Id of the facet.
        facet_id: u64,
        /// What failed.
        message: String,
    },
}

impl QueryError {
    /// Coarse classification of the error.
    #[must_use]
    pub const fn kind(&self) -> HullErrorKind {
        match self {
            Self::UndefinedFacet
            | Self::FacetNotGood { .. }
            | Self::NotLowerDelaunay { .. }
            | Self::NotVoronoiMode => HullErrorKind::InvalidQuery,
            Self::DimensionMismatch { .. } => HullErrorKind::DimensionMismatch,
            Self::Degenerate { .. } => HullErrorKind::NumericInstability,
        }
    }
}

// =============================================================================
// CONVEX HULL
// =============================================================================

/// A finished convex hull.
///
/// Construction either completes with a topologically consistent facet graph or fails with
/// a [`HullConstructionError`]; a partially built hull is never returned.
#[derive(Clone, Debug)]
pub struct ConvexHull {
    points: PointStore,
    graph: FacetGraph,
    context: HullContext,
    statistics: HullStatistics,
}

impl ConvexHull {
    /// Builds the hull of `points`.
    ///
    /// In Voronoi mode the points are lifted onto the paraboloid first and the hull is built
    /// one dimension up; [`ConvexHull::points`] then returns the lifted store.
    ///
    /// # Errors
    ///
    /// - [`HullConstructionError::InvalidOptions`] for rejected options;
    /// - [`HullConstructionError::DimensionMismatch`] when a
    ///   [`GoodFacetFilter::VisibleFrom`] point does not have the hull dimension;
    /// - [`HullConstructionError::InsufficientPoints`],
    ///   [`HullConstructionError::CoincidentPoints`] or
    ///   [`HullConstructionError::DegenerateInput`] for inputs that do not span the space;
    /// - [`HullConstructionError::NumericInstability`] or
    ///   [`HullConstructionError::MergeLimitExceeded`] when construction cannot resolve a
    ///   degenerate configuration.
    pub fn new(points: PointStore, options: HullOptions) -> Result<Self, HullConstructionError> {
        options.validate()?;
        let input_dimension = points.dimension();
        let dimension = if options.voronoi {
            input_dimension + 1
        } else {
            input_dimension
        };
        if let GoodFacetFilter::VisibleFrom(viewpoint) = &options.good_facets
            && viewpoint.len() != dimension
        {
            return Err(HullConstructionError::DimensionMismatch {
                expected: dimension,
                actual: viewpoint.len(),
            });
        }
        if points.total_len() < input_dimension + 1 {
            return Err(HullConstructionError::InsufficientPoints {
                dimension: input_dimension,
                required: input_dimension + 1,
                actual: points.total_len(),
            });
        }

        let (points, infinity_point) = if options.voronoi {
            let (lifted, infinity) = lift_to_paraboloid(&points)?;
            (lifted, Some(infinity))
        } else {
            (points, None)
        };

        let tolerance = Tolerance::for_points(&points, options.tolerance, options.merge_centrum);
        tracing::debug!(
            "[quickhull] {} points in {}D, distance tolerance {:e}, merge threshold {:e}",
            points.total_len(),
            dimension,
            tolerance.distance(),
            tolerance.merge_centrum()
        );

        let simplex = select_initial_simplex(&points, &tolerance)?;
        let corners: Vec<&[f64]> = simplex.iter().filter_map(|&id| points.coords(id)).collect();
        let interior =
            centroid(&corners).ok_or(HullConstructionError::InsufficientPoints {
                dimension,
                required: dimension + 1,
                actual: corners.len(),
            })?;
        let context = HullContext::new(input_dimension, tolerance, interior, options, infinity_point);

        let (graph, statistics) = HullState::new(&points, &context).run(&simplex)?;
        Ok(Self {
            points,
            graph,
            context,
            statistics,
        })
    }

    /// Builds the hull of fixed-size points with default options.
    ///
    /// # Errors
    ///
    /// Same as [`ConvexHull::new`], plus [`HullConstructionError::InvalidPoints`] for
    /// malformed coordinates.
    pub fn from_points<const D: usize>(points: &[[f64; D]]) -> Result<Self, HullConstructionError> {
        Self::new(PointStore::from_points(points)?, HullOptions::default())
    }

    /// Builds the hull of equal-length rows.
    ///
    /// # Errors
    ///
    /// Same as [`ConvexHull::from_points`].
    pub fn from_rows<R: AsRef<[f64]>>(
        rows: &[R],
        options: HullOptions,
    ) -> Result<Self, HullConstructionError> {
        Self::new(PointStore::from_rows(rows)?, options)
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// The facet graph.
    #[inline]
    #[must_use]
    pub const fn graph(&self) -> &FacetGraph {
        &self.graph
    }

    /// Points the hull was built over, in hull coordinates.
    #[inline]
    #[must_use]
    pub const fn points(&self) -> &PointStore {
        &self.points
    }

    /// Frozen per-run context.
    #[inline]
    #[must_use]
    pub const fn context(&self) -> &HullContext {
        &self.context
    }

    /// Tolerances used during construction.
    #[inline]
    #[must_use]
    pub const fn tolerance(&self) -> &Tolerance {
        self.context.tolerance()
    }

    /// Construction counters.
    #[inline]
    #[must_use]
    pub const fn statistics(&self) -> &HullStatistics {
        &self.statistics
    }

    /// Dimension the hull lives in.
    #[inline]
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.context.dimension()
    }

    /// Dimension of the caller's points.
    #[inline]
    #[must_use]
    pub const fn input_dimension(&self) -> usize {
        self.context.input_dimension()
    }

    /// Whether the hull was built over lifted points.
    #[inline]
    #[must_use]
    pub const fn is_voronoi(&self) -> bool {
        self.context.is_voronoi()
    }

    /// Number of facets.
    #[must_use]
    pub fn number_of_facets(&self) -> usize {
        self.graph.number_of_facets()
    }

    /// Number of ridges.
    #[must_use]
    pub fn number_of_ridges(&self) -> usize {
        self.graph.number_of_ridges()
    }

    /// Number of vertices.
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.graph.number_of_vertices()
    }

    // =========================================================================
    // TRAVERSAL
    // =========================================================================

    /// Facets in list order.
    pub fn facets(&self) -> impl Iterator<Item = FacetView<'_>> + '_ {
        self.graph
            .facet_keys()
            .filter_map(move |key| FacetView::new(self, key))
    }

    /// Facets flagged good, in list order.
    pub fn good_facets(&self) -> impl Iterator<Item = FacetView<'_>> + '_ {
        self.facets().filter(FacetView::is_good)
    }

    /// View of one facet.
    #[must_use]
    pub fn facet(&self, key: FacetKey) -> Option<FacetView<'_>> {
        FacetView::new(self, key)
    }

    /// View of the facet with the given id.
    #[must_use]
    pub fn facet_by_id(&self, id: u64) -> Option<FacetView<'_>> {
        self.graph
            .facet_by_id(id)
            .and_then(|key| FacetView::new(self, key))
    }

    /// Head of the facet list.
    #[must_use]
    pub fn first_facet(&self) -> Option<FacetView<'_>> {
        self.graph
            .first_facet()
            .and_then(|key| FacetView::new(self, key))
    }

    /// Every vertex.
    pub fn vertices(&self) -> impl Iterator<Item = VertexView<'_>> + '_ {
        self.graph
            .vertices()
            .filter_map(move |(key, _)| VertexView::new(self, key))
    }

    /// Every ridge.
    pub fn ridges(&self) -> impl Iterator<Item = RidgeView<'_>> + '_ {
        self.graph
            .ridges()
            .filter_map(move |(key, _)| RidgeView::new(self, key))
    }

    /// Sorted ids of the input points that are hull vertices. The point at infinity of
    /// Voronoi mode is left out.
    #[must_use]
    pub fn hull_point_ids(&self) -> Vec<PointId> {
        let infinity = self.context.infinity_point();
        let mut ids: Vec<PointId> = self
            .graph
            .vertices()
            .map(|(_, vertex)| vertex.point())
            .filter(|&point| Some(point) != infinity)
            .collect();
        ids.sort_unstable();
        ids
    }

    // =========================================================================
    // DERIVED FACET QUERIES
    // =========================================================================

    fn live_facet(&self, key: FacetKey) -> Result<&Facet, QueryError> {
        self.graph.facet(key).ok_or(QueryError::UndefinedFacet)
    }

    /// `(d-1)`-dimensional measure of a good facet.
    ///
    /// Simplicial facets are measured directly. Larger facets are fanned from their centrum
    /// (vertex centroid projected onto the plane) over their ridges.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UndefinedFacet`], [`QueryError::FacetNotGood`], or
    /// [`QueryError::Degenerate`] when a piece of the fan cannot be measured.
    pub fn facet_area(&self, key: FacetKey) -> Result<f64, QueryError> {
        let facet = self.live_facet(key)?;
        if !facet.flags.good {
            return Err(QueryError::FacetNotGood { facet_id: facet.id });
        }
        let degenerate = |source: &dyn std::fmt::Display| QueryError::Degenerate {
            facet_id: facet.id,
            message: source.to_string(),
        };

        let coords = self.graph.facet_vertex_coords(key, &self.points);
        if coords.len() == self.dimension() {
            return simplex_volume(&coords).map_err(|e| degenerate(&e));
        }

        let center = centroid(&coords)
            .map(|center| facet.hyperplane.project(&center))
            .ok_or_else(|| degenerate(&"facet has no vertices"))?;
        let mut area = 0.0;
        for &ridge_key in &facet.ridges {
            let Some(ridge) = self.graph.ridge(ridge_key) else {
                continue;
            };
            let mut piece = self.graph.vertex_coords(&ridge.vertices, &self.points);
            piece.push(center.as_slice());
            area += simplex_volume(&piece).map_err(|e| degenerate(&e))?;
        }
        Ok(area)
    }

    /// Sum of the areas of all good facets.
    ///
    /// # Errors
    ///
    /// Propagates the first [`ConvexHull::facet_area`] failure.
    pub fn total_area(&self) -> Result<f64, QueryError> {
        self.good_facets().map(|facet| facet.area()).sum()
    }

    /// Center of a facet, computed once and cached on the facet.
    ///
    /// [`CenterKind::Centroid`] is the mean of the facet's vertices in hull coordinates;
    /// [`CenterKind::Voronoi`] is [`ConvexHull::voronoi_vertex`].
    ///
    /// # Errors
    ///
    /// [`QueryError::UndefinedFacet`] for a dead key, plus the errors of
    /// [`ConvexHull::voronoi_vertex`] for the Voronoi center.
    pub fn facet_center(&self, key: FacetKey, kind: CenterKind) -> Result<Vec<f64>, QueryError> {
        match kind {
            CenterKind::Voronoi => self.voronoi_vertex(key),
            CenterKind::Centroid => {
                let facet = self.live_facet(key)?;
                if let Some(center) = facet.centroid_cache.get() {
                    return Ok(center.clone());
                }
                let coords = self.graph.facet_vertex_coords(key, &self.points);
                let center = centroid(&coords).ok_or_else(|| QueryError::Degenerate {
                    facet_id: facet.id,
                    message: "facet has no vertices".to_string(),
                })?;
                Ok(facet.centroid_cache.get_or_init(|| center).clone())
            }
        }
    }

    /// Voronoi vertex of a good lower facet of a lifted hull: the circumcenter of the
    /// facet's input points.
    ///
    /// The circumcenter is solved from the first `d + 1` vertices; when that system is
    /// singular the center is recovered from the lifted plane's normal instead.
    ///
    /// # Errors
    ///
    /// [`QueryError::NotVoronoiMode`], [`QueryError::UndefinedFacet`],
    /// [`QueryError::NotLowerDelaunay`], [`QueryError::FacetNotGood`], or
    /// [`QueryError::Degenerate`] if neither method yields a center.
    pub fn voronoi_vertex(&self, key: FacetKey) -> Result<Vec<f64>, QueryError> {
        if !self.is_voronoi() {
            return Err(QueryError::NotVoronoiMode);
        }
        let facet = self.live_facet(key)?;
        if facet.flags.upper_delaunay {
            return Err(QueryError::NotLowerDelaunay { facet_id: facet.id });
        }
        if !facet.flags.good {
            return Err(QueryError::FacetNotGood { facet_id: facet.id });
        }
        if let Some(center) = facet.voronoi_cache.get() {
            return Ok(center.clone());
        }

        let input_dimension = self.input_dimension();
        let coords = self.graph.facet_vertex_coords(key, &self.points);
        let sites: Vec<&[f64]> = coords
            .iter()
            .take(input_dimension + 1)
            .map(|&c| &c[..input_dimension])
            .collect();
        let center = match circumcenter(&sites) {
            Ok(center) => center,
            Err(source) => {
                tracing::trace!(
                    "[quickhull] f{}: circumcenter failed ({source}), using the lifted normal",
                    facet.id
                );
                voronoi_center_from_normal(&facet.hyperplane).ok_or_else(|| {
                    QueryError::Degenerate {
                        facet_id: facet.id,
                        message: source.to_string(),
                    }
                })?
            }
        };
        Ok(facet.voronoi_cache.get_or_init(|| center).clone())
    }

    /// Voronoi vertex of every good lower facet, in list order.
    ///
    /// # Errors
    ///
    /// Same as [`ConvexHull::voronoi_vertex`].
    pub fn voronoi_vertices(&self) -> Result<Vec<(FacetKey, Vec<f64>)>, QueryError> {
        if !self.is_voronoi() {
            return Err(QueryError::NotVoronoiMode);
        }
        self.good_facets()
            .filter(|facet| !facet.is_upper_delaunay())
            .map(|facet| Ok((facet.key(), self.voronoi_vertex(facet.key())?)))
            .collect()
    }

    /// Input points of every good lower facet: the Delaunay regions of the input.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NotVoronoiMode`] for hulls built without Voronoi mode.
    pub fn delaunay_regions(&self) -> Result<Vec<Vec<PointId>>, QueryError> {
        if !self.is_voronoi() {
            return Err(QueryError::NotVoronoiMode);
        }
        Ok(self
            .good_facets()
            .filter(|facet| !facet.is_upper_delaunay())
            .map(|facet| {
                let mut region: Vec<PointId> = facet.vertex_points().collect();
                region.sort_unstable();
                region
            })
            .collect())
    }

    /// Plane below every vertex of the facet by at least the distance tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UndefinedFacet`] for a dead key.
    pub fn inner_plane(&self, key: FacetKey) -> Result<Hyperplane, QueryError> {
        let facet = self.live_facet(key)?;
        Ok(facet
            .hyperplane
            .shifted(facet.min_vertex - self.tolerance().distance()))
    }

    /// Plane above every vertex and retained point of the facet by at least the distance
    /// tolerance. Points beyond it are certainly outside the hull.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UndefinedFacet`] for a dead key.
    pub fn outer_plane(&self, key: FacetKey) -> Result<Hyperplane, QueryError> {
        let facet = self.live_facet(key)?;
        Ok(facet
            .hyperplane
            .shifted(facet.max_outside + self.tolerance().distance()))
    }

    /// Snapshot of a facet. Center and area are included when they can be computed.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UndefinedFacet`] for a dead key.
    pub fn facet_report(&self, key: FacetKey, center: CenterKind) -> Result<FacetReport, QueryError> {
        let facet = self.live_facet(key)?;
        let inner = self.inner_plane(key)?;
        let outer = self.outer_plane(key)?;
        let vertices = facet
            .vertices
            .iter()
            .filter_map(|&v| self.graph.vertex(v).map(|vertex| vertex.point()))
            .collect();
        let neighbors = facet
            .neighbors
            .iter()
            .filter_map(|&n| self.graph.facet(n).map(Facet::id))
            .collect();
        let ridges = facet
            .ridges
            .iter()
            .filter_map(|&r| self.graph.ridge(r).map(|ridge| ridge.id()))
            .collect();
        Ok(FacetReport {
            id: facet.id,
            flags: facet.flags,
            normal: facet.hyperplane.normal().to_vec(),
            offset: facet.hyperplane.offset(),
            center: self.facet_center(key, center).ok(),
            inner_offset: inner.offset(),
            outer_offset: outer.offset(),
            area: facet
                .flags
                .good
                .then(|| self.facet_area(key).ok())
                .flatten(),
            vertices,
            neighbors,
            ridges,
            coplanar_points: facet.coplanar.iter().map(|p| p.point).collect(),
            tricoplanar_owner: facet
                .tricoplanar_owner
                .and_then(|owner| self.graph.facet(owner))
                .map(Facet::id),
        })
    }

    /// Snapshot of a ridge.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UndefinedFacet`] if the ridge or one of its facets is gone.
    pub fn ridge_report(&self, key: RidgeKey) -> Result<RidgeReport, QueryError> {
        let ridge = self.graph.ridge(key).ok_or(QueryError::UndefinedFacet)?;
        Ok(RidgeReport {
            id: ridge.id(),
            top: self.live_facet(ridge.top())?.id,
            bottom: self.live_facet(ridge.bottom())?.id,
            vertices: ridge
                .vertex_keys()
                .iter()
                .filter_map(|&v| self.graph.vertex(v).map(|vertex| vertex.point()))
                .collect(),
        })
    }

    // =========================================================================
    // POINT QUERIES
    // =========================================================================

    fn check_query_point(&self, point: &[f64]) -> Result<(), QueryError> {
        if point.len() == self.dimension() {
            Ok(())
        } else {
            Err(QueryError::DimensionMismatch {
                expected: self.dimension(),
                actual: point.len(),
            })
        }
    }

    /// Facets whose outer plane has `point` strictly above it, in list order.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::DimensionMismatch`] if `point` does not have the hull's
    /// dimension.
    pub fn find_visible_facets(&self, point: &[f64]) -> Result<Vec<FacetKey>, QueryError> {
        self.check_query_point(point)?;
        let tolerance = self.tolerance().distance();
        Ok(self
            .graph
            .facets()
            .filter(|(_, facet)| facet.hyperplane.distance(point) > facet.max_outside + tolerance)
            .map(|(key, _)| key)
            .collect())
    }

    /// Visible facet whose vertex centroid is closest to `point`, or `None` if no facet is
    /// visible.
    ///
    /// # Errors
    ///
    /// Same as [`ConvexHull::find_visible_facets`].
    pub fn find_nearest_visible_facet(&self, point: &[f64]) -> Result<Option<FacetKey>, QueryError> {
        let mut nearest: Option<(FacetKey, f64)> = None;
        for key in self.find_visible_facets(point)? {
            let center = self.facet_center(key, CenterKind::Centroid)?;
            let distance = squared_distance(point, &center);
            if nearest.is_none_or(|(_, best)| distance < best) {
                nearest = Some((key, distance));
            }
        }
        Ok(nearest.map(|(key, _)| key))
    }

    /// Whether `point` is outside the hull, i.e. visible from at least one facet.
    ///
    /// # Errors
    ///
    /// Same as [`ConvexHull::find_visible_facets`].
    pub fn is_point_outside(&self, point: &[f64]) -> Result<bool, QueryError> {
        Ok(!self.find_visible_facets(point)?.is_empty())
    }

    // =========================================================================
    // VALIDATION
    // =========================================================================

    /// Checks the facet graph and the geometry of the hull.
    ///
    /// Beyond the structural checks of [`FacetGraph::is_valid`], every vertex must lie
    /// within [`Tolerance::max_offset`] of each of its facets' planes, and no point of the
    /// store may lie above a facet's outer bound by more than that offset.
    ///
    /// # Errors
    ///
    /// Returns the first [`HullValidationError`] found.
    pub fn validate(&self) -> Result<(), HullValidationError> {
        self.graph.is_valid()?;
        self.validate_geometry()
    }

    /// Runs every check and reports all failing invariant groups.
    ///
    /// # Errors
    ///
    /// Returns a [`HullValidationReport`] with one violation per failing group.
    pub fn validation_report(&self) -> Result<(), HullValidationReport> {
        let mut report = self.graph.validation_report().err().unwrap_or_default();
        report.record(InvariantKind::Geometry, self.validate_geometry());
        if report.is_empty() { Ok(()) } else { Err(report) }
    }

    fn validate_geometry(&self) -> Result<(), HullValidationError> {
        let bound = self.tolerance().max_offset();
        for (key, facet) in self.graph.facets() {
            for coords in self.graph.facet_vertex_coords(key, &self.points) {
                let distance = facet.hyperplane.distance(coords);
                if distance.abs() > bound {
                    return Err(HullValidationError::Geometry {
                        facet_id: facet.id,
                        message: format!(
                            "vertex lies {distance:e} from the plane, bound {bound:e}"
                        ),
                    });
                }
            }
            let limit = facet.max_outside + bound;
            for id in self.points.ids() {
                let Some(coords) = self.points.coords(id) else {
                    continue;
                };
                let distance = facet.hyperplane.distance(coords);
                if distance > limit {
                    return Err(HullValidationError::Geometry {
                        facet_id: facet.id,
                        message: format!("point {id} lies {distance:e} above the plane"),
                    });
                }
            }
        }
        Ok(())
    }
}
