//! Arena-backed facet graph of a convex hull.
//!
//! The [`FacetGraph`] owns every [`Facet`], [`Ridge`], and [`Vertex`] of a hull in three
//! slotmap arenas. All cross references (facet to vertices, facet to ridges, ridge to its two
//! facets, vertex to incident facets, neighbor lists, the intrusive facet list) are keys into
//! those arenas, so removing an entity never leaves a dangling pointer: lookups of removed
//! keys simply return `None`.
//!
//! # Invariants
//!
//! A consistent graph in dimension `d` satisfies:
//!
//! - every ridge has `d - 1` vertices, two distinct incident facets, and appears in the
//!   ridge list of both;
//! - a ridge's vertices are a subset of both of its facets' vertices;
//! - each facet's neighbor set equals the set of facets across its ridges;
//! - each facet has at least `d` vertices and `d` ridges;
//! - vertex incidence lists and facet vertex lists agree, and no vertex is orphaned;
//! - the facet list visits every facet exactly once with consistent back links.
//!
//! [`FacetGraph::is_valid`] checks all of them and stops at the first failure;
//! [`FacetGraph::validation_report`] collects one violation per invariant group.
//!
//! # Identity
//!
//! Besides their arena keys, facets, ridges, and vertices carry `u64` ids assigned from
//! per-kind counters that only ever increase, so ids are never reused within a hull.

#![forbid(unsafe_code)]

use super::collections::{
    FacetKeyBuffer, FacetKeySet, PointToVertexMap, StorageMap, VertexKeyBuffer, VertexKeySet,
    fast_hash_set_with_capacity,
};
use super::facet::Facet;
use super::ridge::Ridge;
use super::vertex::Vertex;
use crate::geometry::point::{PointId, PointStore, PointStoreError};
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use thiserror::Error;

// =============================================================================
// KEYS
// =============================================================================

new_key_type! {
    /// Key of a facet in a [`FacetGraph`].
    pub struct FacetKey;
}

new_key_type! {
    /// Key of a ridge in a [`FacetGraph`].
    pub struct RidgeKey;
}

new_key_type! {
    /// Key of a vertex in a [`FacetGraph`].
    pub struct VertexKey;
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Coarse classification shared by every error the hull can raise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HullErrorKind {
    /// The input cannot form a full-dimensional hull (too few, coincident, or affinely
    /// dependent points) or is otherwise malformed.
    InputDegeneracy,
    /// Round-off produced an inconsistent structure that merging could not repair.
    NumericInstability,
    /// A query was asked of a facet or hull that cannot answer it.
    InvalidQuery,
    /// A point or option has the wrong number of coordinates.
    DimensionMismatch,
}

/// Structural validation failures of a [`FacetGraph`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HullValidationError {
    /// The intrusive facet list is broken.
    #[error("Facet list is inconsistent: {message}")]
    FacetList {
        /// Description of the break.
        message: String,
    },
    /// A ridge is malformed or not shared by exactly two facets.
    #[error("Ridge r{ridge_id} is invalid: {message}")]
    InvalidRidge {
        /// Offending ridge.
        ridge_id: u64,
        /// Description.
        message: String,
    },
    /// A facet's neighbor set disagrees with its ridges.
    #[error("Facet f{facet_id} has inconsistent neighbors: {message}")]
    InconsistentNeighbors {
        /// Offending facet.
        facet_id: u64,
        /// Description.
        message: String,
    },
    /// A facet has too few vertices or ridges, or repeats a vertex.
    #[error("Facet f{facet_id} is malformed: {message}")]
    InvalidFacet {
        /// Offending facet.
        facet_id: u64,
        /// Description.
        message: String,
    },
    /// Vertex incidence does not match facet vertex lists.
    #[error("Vertex v{vertex_id} has inconsistent incidence: {message}")]
    VertexIncidence {
        /// Offending vertex.
        vertex_id: u64,
        /// Description.
        message: String,
    },
    /// A facet plane does not fit its vertices, or a point lies outside the hull.
    #[error("Facet f{facet_id} fails a geometric check: {message}")]
    Geometry {
        /// Offending facet.
        facet_id: u64,
        /// Description.
        message: String,
    },
}

/// Errors raised while building a hull.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HullConstructionError {
    /// The input points could not be stored.
    #[error("Invalid input points: {0}")]
    InvalidPoints(#[from] PointStoreError),
    /// The options are out of range.
    #[error("Invalid hull options: {message}")]
    InvalidOptions {
        /// What was wrong.
        message: String,
    },
    /// Fewer than `d + 1` points.
    #[error(
        "Insufficient points for a {dimension}D hull: need at least {required}, got {actual}"
    )]
    InsufficientPoints {
        /// Hull dimension.
        dimension: usize,
        /// `dimension + 1`.
        required: usize,
        /// Points supplied.
        actual: usize,
    },
    /// All points coincide within tolerance.
    #[error("All {count} points coincide within the distance tolerance {tolerance}")]
    CoincidentPoints {
        /// Points supplied.
        count: usize,
        /// The distance tolerance.
        tolerance: String,
    },
    /// The points are affinely dependent.
    #[error(
        "Degenerate input: points span only a {spanned}-dimensional affine subspace of {dimension}D space"
    )]
    DegenerateInput {
        /// Hull dimension.
        dimension: usize,
        /// Dimension of the affine hull of the input.
        spanned: usize,
    },
    /// Round-off produced a structure construction cannot continue from.
    #[error("Numeric instability at facet f{facet_id}: {message}")]
    NumericInstability {
        /// Facet being processed when the problem surfaced.
        facet_id: u64,
        /// Description.
        message: String,
    },
    /// The merge pass did not settle within the configured bound.
    #[error("Merging did not converge after {limit} merges (last facet f{facet_id})")]
    MergeLimitExceeded {
        /// Facet involved in the last merge.
        facet_id: u64,
        /// Configured bound.
        limit: usize,
    },
    /// An option carries a point of the wrong dimension.
    #[error("Dimension mismatch: expected {expected} coordinates, found {actual}")]
    DimensionMismatch {
        /// Hull dimension.
        expected: usize,
        /// Supplied dimension.
        actual: usize,
    },
    /// The finished structure failed validation.
    #[error("Constructed hull failed validation: {0}")]
    Validation(#[from] HullValidationError),
}

impl HullConstructionError {
    /// Coarse classification of the error.
    #[must_use]
    pub const fn kind(&self) -> HullErrorKind {
        match self {
            Self::InvalidPoints(PointStoreError::DimensionMismatch { .. })
            | Self::DimensionMismatch { .. } => HullErrorKind::DimensionMismatch,
            Self::InvalidPoints(_)
            | Self::InsufficientPoints { .. }
            | Self::CoincidentPoints { .. }
            | Self::DegenerateInput { .. } => HullErrorKind::InputDegeneracy,
            Self::InvalidOptions { .. } => HullErrorKind::InvalidQuery,
            Self::NumericInstability { .. }
            | Self::MergeLimitExceeded { .. }
            | Self::Validation(_) => HullErrorKind::NumericInstability,
        }
    }
}

// =============================================================================
// VALIDATION REPORTING
// =============================================================================

/// Invariant groups checked by [`FacetGraph::validation_report`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InvariantKind {
    /// Intrusive facet list.
    FacetList,
    /// Ridge shape and two-sidedness.
    RidgeSharing,
    /// Per-facet vertex and ridge counts.
    FacetValidity,
    /// Neighbor sets against ridges.
    NeighborConsistency,
    /// Vertex incidence lists.
    VertexIncidence,
    /// Plane fit and containment (checked by the hull, not the graph).
    Geometry,
}

/// A single invariant violation recorded during validation diagnostics.
#[derive(Clone, Debug)]
pub struct InvariantViolation {
    /// The kind of invariant that failed.
    pub kind: InvariantKind,
    /// The detailed validation error explaining the failure.
    pub error: HullValidationError,
}

/// Aggregate report of one or more validation failures.
#[derive(Clone, Debug, Default)]
pub struct HullValidationReport {
    /// The ordered list of invariant violations that occurred.
    pub violations: Vec<InvariantViolation>,
}

impl HullValidationReport {
    /// Returns `true` if no violations were recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub(crate) fn record(&mut self, kind: InvariantKind, result: Result<(), HullValidationError>) {
        if let Err(error) = result {
            self.violations.push(InvariantViolation { kind, error });
        }
    }
}

// =============================================================================
// FACET GRAPH
// =============================================================================

/// Facets, ridges, and vertices of a hull, with the intrusive facet list.
#[derive(Clone, Debug)]
pub struct FacetGraph {
    dimension: usize,
    pub(crate) facets: StorageMap<FacetKey, Facet>,
    pub(crate) ridges: StorageMap<RidgeKey, Ridge>,
    pub(crate) vertices: StorageMap<VertexKey, Vertex>,
    vertex_by_point: PointToVertexMap,
    head: Option<FacetKey>,
    tail: Option<FacetKey>,
    next_facet_id: u64,
    next_ridge_id: u64,
    next_vertex_id: u64,
}

/// Iterator over facet keys in list order.
#[derive(Clone, Debug)]
pub struct FacetListIter<'a> {
    graph: &'a FacetGraph,
    current: Option<FacetKey>,
}

impl Iterator for FacetListIter<'_> {
    type Item = FacetKey;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.current?;
        self.current = self.graph.facets.get(key).and_then(|facet| facet.next);
        Some(key)
    }
}

impl FacetGraph {
    /// Creates an empty graph for hulls of the given dimension.
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            facets: StorageMap::with_key(),
            ridges: StorageMap::with_key(),
            vertices: StorageMap::with_key(),
            vertex_by_point: PointToVertexMap::default(),
            head: None,
            tail: None,
            next_facet_id: 0,
            next_ridge_id: 0,
            next_vertex_id: 0,
        }
    }

    /// Hull dimension.
    #[inline]
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of facets.
    #[inline]
    #[must_use]
    pub fn number_of_facets(&self) -> usize {
        self.facets.len()
    }

    /// Number of ridges.
    #[inline]
    #[must_use]
    pub fn number_of_ridges(&self) -> usize {
        self.ridges.len()
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Facet record by key.
    #[inline]
    #[must_use]
    pub fn facet(&self, key: FacetKey) -> Option<&Facet> {
        self.facets.get(key)
    }

    /// Ridge record by key.
    #[inline]
    #[must_use]
    pub fn ridge(&self, key: RidgeKey) -> Option<&Ridge> {
        self.ridges.get(key)
    }

    /// Vertex record by key.
    #[inline]
    #[must_use]
    pub fn vertex(&self, key: VertexKey) -> Option<&Vertex> {
        self.vertices.get(key)
    }

    #[inline]
    pub(crate) fn facet_mut(&mut self, key: FacetKey) -> Option<&mut Facet> {
        self.facets.get_mut(key)
    }

    #[inline]
    pub(crate) fn ridge_mut(&mut self, key: RidgeKey) -> Option<&mut Ridge> {
        self.ridges.get_mut(key)
    }

    #[inline]
    pub(crate) fn vertex_mut(&mut self, key: VertexKey) -> Option<&mut Vertex> {
        self.vertices.get_mut(key)
    }

    /// First facet in list order.
    #[inline]
    #[must_use]
    pub const fn first_facet(&self) -> Option<FacetKey> {
        self.head
    }

    /// Last facet in list order.
    #[inline]
    #[must_use]
    pub const fn last_facet(&self) -> Option<FacetKey> {
        self.tail
    }

    /// Facet keys in list order.
    #[must_use]
    pub const fn facet_keys(&self) -> FacetListIter<'_> {
        FacetListIter {
            graph: self,
            current: self.head,
        }
    }

    /// Facets in list order.
    pub fn facets(&self) -> impl Iterator<Item = (FacetKey, &Facet)> + '_ {
        self.facet_keys()
            .filter_map(|key| self.facets.get(key).map(|facet| (key, facet)))
    }

    /// Ridges in arena order.
    pub fn ridges(&self) -> impl Iterator<Item = (RidgeKey, &Ridge)> + '_ {
        self.ridges.iter()
    }

    /// Vertices in arena order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexKey, &Vertex)> + '_ {
        self.vertices.iter()
    }

    /// Vertex created for a point, if the point is a hull vertex.
    #[must_use]
    pub fn vertex_for_point(&self, point: PointId) -> Option<VertexKey> {
        self.vertex_by_point.get(&point).copied()
    }

    /// Facet with the given id (linear scan).
    #[must_use]
    pub fn facet_by_id(&self, id: u64) -> Option<FacetKey> {
        self.facets
            .iter()
            .find_map(|(key, facet)| (facet.id == id).then_some(key))
    }

    /// Coordinates of a facet's vertices, in the facet's vertex order.
    #[must_use]
    pub fn facet_vertex_coords<'p>(&self, key: FacetKey, points: &'p PointStore) -> Vec<&'p [f64]> {
        self.facets.get(key).map_or_else(Vec::new, |facet| {
            self.vertex_coords(&facet.vertices, points)
        })
    }

    /// Coordinates of the given vertices; unknown keys are skipped.
    #[must_use]
    pub fn vertex_coords<'p>(&self, vertices: &[VertexKey], points: &'p PointStore) -> Vec<&'p [f64]> {
        vertices
            .iter()
            .filter_map(|&v| self.vertices.get(v))
            .filter_map(|vertex| points.coords(vertex.point))
            .collect()
    }

    // =========================================================================
    // MUTATION
    // =========================================================================

    /// Returns the vertex for `point`, creating it if needed.
    pub(crate) fn insert_vertex(&mut self, point: PointId) -> VertexKey {
        if let Some(&key) = self.vertex_by_point.get(&point) {
            return key;
        }
        let mut vertex = Vertex::new(point);
        vertex.id = self.next_vertex_id;
        self.next_vertex_id += 1;
        let key = self.vertices.insert(vertex);
        self.vertex_by_point.insert(point, key);
        key
    }

    /// Removes a vertex. Facets still listing it are not touched.
    pub(crate) fn remove_vertex(&mut self, key: VertexKey) -> Option<Vertex> {
        let vertex = self.vertices.remove(key)?;
        self.vertex_by_point.remove(&vertex.point);
        Some(vertex)
    }

    /// Inserts a facet at the tail of the list, assigns its id, and registers it with its
    /// vertices.
    pub(crate) fn insert_facet(&mut self, mut facet: Facet) -> FacetKey {
        facet.id = self.next_facet_id;
        self.next_facet_id += 1;
        facet.previous = self.tail;
        facet.next = None;
        let vertices = facet.vertices.clone();
        let key = self.facets.insert(facet);
        if let Some(tail) = self.tail.and_then(|t| self.facets.get_mut(t)) {
            tail.next = Some(key);
        } else {
            self.head = Some(key);
        }
        self.tail = Some(key);
        for v in vertices {
            if let Some(vertex) = self.vertices.get_mut(v) {
                vertex.add_facet(key);
            }
        }
        key
    }

    /// Unlinks and removes a facet and drops it from its vertices' incidence lists.
    /// Ridges referring to it are left for the caller to repoint or remove.
    pub(crate) fn remove_facet(&mut self, key: FacetKey) -> Option<Facet> {
        let facet = self.facets.remove(key)?;
        match facet.previous.and_then(|p| self.facets.get_mut(p)) {
            Some(previous) => previous.next = facet.next,
            None => self.head = facet.next,
        }
        match facet.next.and_then(|n| self.facets.get_mut(n)) {
            Some(next) => next.previous = facet.previous,
            None => self.tail = facet.previous,
        }
        for &v in &facet.vertices {
            if let Some(vertex) = self.vertices.get_mut(v) {
                vertex.remove_facet(key);
            }
        }
        Some(facet)
    }

    /// Creates a ridge between two facets and records it on both.
    pub(crate) fn insert_ridge(
        &mut self,
        top: FacetKey,
        bottom: FacetKey,
        vertices: VertexKeyBuffer,
    ) -> RidgeKey {
        let mut ridge = Ridge::new(top, bottom, vertices);
        ridge.id = self.next_ridge_id;
        self.next_ridge_id += 1;
        let key = self.ridges.insert(ridge);
        for side in [top, bottom] {
            if let Some(facet) = self.facets.get_mut(side) {
                facet.ridges.push(key);
            }
        }
        key
    }

    /// Removes a ridge and drops it from both facets' ridge lists.
    pub(crate) fn remove_ridge(&mut self, key: RidgeKey) -> Option<Ridge> {
        let ridge = self.ridges.remove(key)?;
        for side in [ridge.top, ridge.bottom] {
            if let Some(facet) = self.facets.get_mut(side) {
                facet.ridges.retain(|r| *r != key);
            }
        }
        Some(ridge)
    }

    /// Recomputes a facet's neighbor set from its ridges, keeping first-seen order.
    pub(crate) fn refresh_neighbors(&mut self, key: FacetKey) {
        let Some(facet) = self.facets.get(key) else {
            return;
        };
        let mut neighbors = FacetKeyBuffer::new();
        for &r in &facet.ridges {
            if let Some(other) = self.ridges.get(r).and_then(|ridge| ridge.other(key))
                && !neighbors.contains(&other)
            {
                neighbors.push(other);
            }
        }
        if let Some(facet) = self.facets.get_mut(key) {
            facet.neighbors = neighbors;
        }
    }

    // =========================================================================
    // VALIDATION
    // =========================================================================

    /// Checks every structural invariant and returns the first violation.
    ///
    /// # Errors
    ///
    /// Returns the first [`HullValidationError`] found, checking the facet list, ridges,
    /// facets, neighbors, and vertex incidence in that order.
    pub fn is_valid(&self) -> Result<(), HullValidationError> {
        self.validate_facet_list()?;
        self.validate_ridges()?;
        self.validate_facets()?;
        self.validate_neighbors()?;
        self.validate_vertex_incidence()
    }

    /// Runs every structural check and reports all failing invariant groups.
    ///
    /// # Errors
    ///
    /// Returns a [`HullValidationReport`] listing one violation per failing group.
    pub fn validation_report(&self) -> Result<(), HullValidationReport> {
        let mut report = HullValidationReport::default();
        report.record(InvariantKind::FacetList, self.validate_facet_list());
        report.record(InvariantKind::RidgeSharing, self.validate_ridges());
        report.record(InvariantKind::FacetValidity, self.validate_facets());
        report.record(InvariantKind::NeighborConsistency, self.validate_neighbors());
        report.record(InvariantKind::VertexIncidence, self.validate_vertex_incidence());
        if report.is_empty() { Ok(()) } else { Err(report) }
    }

    fn validate_facet_list(&self) -> Result<(), HullValidationError> {
        let mut previous: Option<FacetKey> = None;
        let mut visited = 0_usize;
        let mut current = self.head;
        while let Some(key) = current {
            let facet = self.facets.get(key).ok_or_else(|| HullValidationError::FacetList {
                message: format!("list links to removed facet {key:?}"),
            })?;
            if facet.previous != previous {
                return Err(HullValidationError::FacetList {
                    message: format!("facet f{} has a stale previous link", facet.id),
                });
            }
            visited += 1;
            if visited > self.facets.len() {
                return Err(HullValidationError::FacetList {
                    message: "list contains a cycle".to_string(),
                });
            }
            previous = Some(key);
            current = facet.next;
        }
        if previous != self.tail || visited != self.facets.len() {
            return Err(HullValidationError::FacetList {
                message: format!(
                    "list visits {visited} of {} facets or ends away from the tail",
                    self.facets.len()
                ),
            });
        }
        Ok(())
    }

    fn validate_ridges(&self) -> Result<(), HullValidationError> {
        for (key, ridge) in &self.ridges {
            let fail = |message: String| HullValidationError::InvalidRidge {
                ridge_id: ridge.id,
                message,
            };
            if ridge.top == ridge.bottom {
                return Err(fail("both sides are the same facet".to_string()));
            }
            if ridge.vertices.len() + 1 != self.dimension {
                return Err(fail(format!(
                    "has {} vertices, expected {}",
                    ridge.vertices.len(),
                    self.dimension - 1
                )));
            }
            for side in [ridge.top, ridge.bottom] {
                let facet = self
                    .facets
                    .get(side)
                    .ok_or_else(|| fail(format!("refers to removed facet {side:?}")))?;
                if !facet.ridges.contains(&key) {
                    return Err(fail(format!("missing from facet f{}'s ridge list", facet.id)));
                }
                if let Some(v) = ridge.vertices.iter().find(|v| !facet.vertices.contains(v)) {
                    return Err(fail(format!(
                        "vertex {v:?} is not a vertex of facet f{}",
                        facet.id
                    )));
                }
            }
        }
        Ok(())
    }

    fn validate_facets(&self) -> Result<(), HullValidationError> {
        for (key, facet) in &self.facets {
            let fail = |message: String| HullValidationError::InvalidFacet {
                facet_id: facet.id,
                message,
            };
            if facet.vertices.len() < self.dimension {
                return Err(fail(format!(
                    "{} vertices, need at least {}",
                    facet.vertices.len(),
                    self.dimension
                )));
            }
            if facet.ridges.len() < self.dimension {
                return Err(fail(format!(
                    "{} ridges, need at least {}",
                    facet.ridges.len(),
                    self.dimension
                )));
            }
            let mut seen: VertexKeySet = fast_hash_set_with_capacity(facet.vertices.len());
            if !facet.vertices.iter().all(|v| seen.insert(*v)) {
                return Err(fail("repeats a vertex".to_string()));
            }
            for &r in &facet.ridges {
                let ridge = self
                    .ridges
                    .get(r)
                    .ok_or_else(|| fail(format!("lists removed ridge {r:?}")))?;
                if !ridge.contains_facet(key) {
                    return Err(fail(format!("lists ridge r{} that does not name it", ridge.id)));
                }
            }
        }
        Ok(())
    }

    fn validate_neighbors(&self) -> Result<(), HullValidationError> {
        for (key, facet) in &self.facets {
            let across: FacetKeySet = facet
                .ridges
                .iter()
                .filter_map(|&r| self.ridges.get(r))
                .filter_map(|ridge| ridge.other(key))
                .collect();
            let listed: FacetKeySet = facet.neighbors.iter().copied().collect();
            if across != listed || listed.len() != facet.neighbors.len() {
                return Err(HullValidationError::InconsistentNeighbors {
                    facet_id: facet.id,
                    message: format!(
                        "{} listed neighbors, {} facets across ridges",
                        facet.neighbors.len(),
                        across.len()
                    ),
                });
            }
            for &n in &facet.neighbors {
                let symmetric = self
                    .facets
                    .get(n)
                    .is_some_and(|neighbor| neighbor.neighbors.contains(&key));
                if !symmetric {
                    return Err(HullValidationError::InconsistentNeighbors {
                        facet_id: facet.id,
                        message: format!("neighbor {n:?} does not list it back"),
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_vertex_incidence(&self) -> Result<(), HullValidationError> {
        for (key, vertex) in &self.vertices {
            let fail = |message: String| HullValidationError::VertexIncidence {
                vertex_id: vertex.id,
                message,
            };
            if vertex.facets.is_empty() {
                return Err(fail("belongs to no facet".to_string()));
            }
            if self.vertex_by_point.get(&vertex.point) != Some(&key) {
                return Err(fail(format!("point {} maps to another vertex", vertex.point)));
            }
            for &f in &vertex.facets {
                let listed = self
                    .facets
                    .get(f)
                    .is_some_and(|facet| facet.vertices.contains(&key));
                if !listed {
                    return Err(fail(format!("incident facet {f:?} does not list it")));
                }
            }
        }
        for (key, facet) in &self.facets {
            for &v in &facet.vertices {
                let vertex = self.vertices.get(v).ok_or_else(|| {
                    HullValidationError::InvalidFacet {
                        facet_id: facet.id,
                        message: format!("lists removed vertex {v:?}"),
                    }
                })?;
                if !vertex.facets.contains(&key) {
                    return Err(HullValidationError::VertexIncidence {
                        vertex_id: vertex.id,
                        message: format!("does not list incident facet f{}", facet.id),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::hyperplane::Hyperplane;

    /// Triangle boundary in 2D: three edges, three ridges (the corners).
    fn triangle_graph() -> (FacetGraph, [FacetKey; 3]) {
        let mut graph = FacetGraph::new(2);
        let v: Vec<VertexKey> = (0..3).map(|i| graph.insert_vertex(PointId::new(i))).collect();
        let plane = || Hyperplane::new(vec![1.0, 0.0], 0.0).unwrap();
        let edges = [[v[1], v[2]], [v[0], v[2]], [v[0], v[1]]];
        let keys = edges.map(|edge| graph.insert_facet(Facet::new(plane(), edge.into_iter().collect())));
        // Ridge opposite vertex i is shared by the edges that contain it.
        graph.insert_ridge(keys[1], keys[2], [v[0]].into_iter().collect());
        graph.insert_ridge(keys[0], keys[2], [v[1]].into_iter().collect());
        graph.insert_ridge(keys[0], keys[1], [v[2]].into_iter().collect());
        for key in keys {
            graph.refresh_neighbors(key);
        }
        (graph, keys)
    }

    #[test]
    fn test_triangle_graph_is_valid() {
        let (graph, keys) = triangle_graph();
        assert!(graph.is_valid().is_ok());
        assert_eq!(graph.number_of_facets(), 3);
        assert_eq!(graph.number_of_ridges(), 3);
        assert_eq!(graph.number_of_vertices(), 3);
        assert_eq!(graph.facet_keys().collect::<Vec<_>>(), keys.to_vec());
        assert_eq!(graph.first_facet(), Some(keys[0]));
        assert_eq!(graph.last_facet(), Some(keys[2]));
    }

    #[test]
    fn test_ids_are_monotonic_and_never_reused() {
        let (mut graph, keys) = triangle_graph();
        let ids: Vec<u64> = graph.facets().map(|(_, f)| f.id()).collect();
        assert_eq!(ids, vec![0, 1, 2]);

        graph.remove_facet(keys[2]);
        let vertices: VertexKeyBuffer = graph.facet(keys[0]).unwrap().vertices.clone();
        let plane = Hyperplane::new(vec![0.0, 1.0], 0.0).unwrap();
        let key = graph.insert_facet(Facet::new(plane, vertices));
        assert_eq!(graph.facet(key).unwrap().id(), 3);
        assert_eq!(graph.facet_by_id(3), Some(key));
        assert_eq!(graph.facet_by_id(2), None);
    }

    #[test]
    fn test_remove_facet_relinks_list() {
        let (mut graph, keys) = triangle_graph();
        graph.remove_facet(keys[1]);
        assert_eq!(graph.facet_keys().collect::<Vec<_>>(), vec![keys[0], keys[2]]);
        assert_eq!(graph.facet(keys[2]).unwrap().previous(), Some(keys[0]));

        graph.remove_facet(keys[0]);
        assert_eq!(graph.first_facet(), Some(keys[2]));
        graph.remove_facet(keys[2]);
        assert_eq!(graph.first_facet(), None);
        assert_eq!(graph.last_facet(), None);
    }

    #[test]
    fn test_validation_detects_dangling_ridge() {
        let (mut graph, keys) = triangle_graph();
        graph.remove_facet(keys[0]);
        let report = graph.validation_report().unwrap_err();
        assert!(
            report
                .violations
                .iter()
                .any(|v| v.kind == InvariantKind::RidgeSharing)
        );
        assert!(graph.is_valid().is_err());
    }

    #[test]
    fn test_validation_detects_stale_neighbors() {
        let (mut graph, keys) = triangle_graph();
        graph.facet_mut(keys[0]).unwrap().neighbors.clear();
        assert!(matches!(
            graph.is_valid(),
            Err(HullValidationError::InconsistentNeighbors { facet_id: 0, .. })
        ));
    }

    #[test]
    fn test_insert_vertex_reuses_point_mapping() {
        let mut graph = FacetGraph::new(3);
        let a = graph.insert_vertex(PointId::new(5));
        let b = graph.insert_vertex(PointId::new(5));
        assert_eq!(a, b);
        assert_eq!(graph.vertex_for_point(PointId::new(5)), Some(a));
        graph.remove_vertex(a);
        assert_eq!(graph.vertex_for_point(PointId::new(5)), None);
        let c = graph.insert_vertex(PointId::new(5));
        assert_eq!(graph.vertex(c).unwrap().id(), 1);
    }

    #[test]
    fn test_error_kinds() {
        let err = HullConstructionError::DegenerateInput {
            dimension: 3,
            spanned: 2,
        };
        assert_eq!(err.kind(), HullErrorKind::InputDegeneracy);
        let err = HullConstructionError::NumericInstability {
            facet_id: 4,
            message: "horizon".to_string(),
        };
        assert_eq!(err.kind(), HullErrorKind::NumericInstability);
        assert!(err.to_string().contains("f4"));
        let err = HullConstructionError::from(PointStoreError::DimensionMismatch {
            expected: 2,
            actual: 3,
        });
        assert_eq!(err.kind(), HullErrorKind::DimensionMismatch);
    }
}
