//! Incremental Quickhull construction.
//!
//! [`HullState`] owns the facet graph while it is being built. Construction runs in three
//! phases:
//!
//! 1. **Simplex.** The `d + 1` facets of the initial simplex are created, oriented away from
//!    the simplex centroid, and every other point is assigned to the facet it lies farthest
//!    above.
//! 2. **Growth.** While some facet has a non-empty outside set, the farthest point of the
//!    first such facet in list order becomes the apex. The facets it sees form a connected
//!    visible region; the ridges on its border form the horizon. Each horizon ridge is
//!    coned to the apex, the visible facets are deleted, and their points are handed to the
//!    new facets. The merge pass then repairs any non-convex or coplanar neighbors.
//! 3. **Finish.** Optional triangulation, inner/outer bookkeeping, flags, and a structural
//!    validation of the result.
//!
//! The merge pass lives in [`super::merge`] and triangulation in [`super::triangulate`];
//! both extend [`HullState`].

#![forbid(unsafe_code)]

use crate::core::collections::{
    FacetKeyBuffer, FacetKeySet, PointIdSet, SubsetFacetMap, VertexKeyBuffer,
    fast_hash_set_with_capacity,
};
use crate::core::context::HullContext;
use crate::core::facet::{ClassifiedPoint, Facet};
use crate::core::hull_data_structure::{
    FacetGraph, FacetKey, HullConstructionError, RidgeKey, VertexKey,
};
use crate::geometry::algorithms::paraboloid::is_upper_delaunay;
use crate::geometry::hyperplane::Hyperplane;
use crate::geometry::point::{PointId, PointStore};
use crate::geometry::tolerance::PointClassification;
use serde::{Deserialize, Serialize};

/// Counters collected during one construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HullStatistics {
    /// Apex points added after the initial simplex.
    pub processed_points: usize,
    /// Facets created, including the initial simplex and triangulation pieces.
    pub facets_created: usize,
    /// Facets deleted as visible or absorbed by a merge.
    pub facets_deleted: usize,
    /// Facet merges performed.
    pub merges: usize,
    /// Largest visible region seen from one apex.
    pub max_visible: usize,
    /// Largest horizon seen from one apex.
    pub max_horizon: usize,
    /// Merged facets split back into simplices.
    pub triangulated_facets: usize,
}

/// A ridge on the border of the visible region.
#[derive(Clone, Copy, Debug)]
struct HorizonRidge {
    ridge: RidgeKey,
    visible: FacetKey,
    other: FacetKey,
}

/// Mutable construction state.
pub(crate) struct HullState<'a> {
    pub(crate) graph: FacetGraph,
    pub(crate) points: &'a PointStore,
    pub(crate) context: &'a HullContext,
    pub(crate) stats: HullStatistics,
    /// Points that were hull vertices and lost that role. They are never outside points
    /// again, so each point becomes an apex at most once.
    pub(crate) retired: PointIdSet,
}

impl<'a> HullState<'a> {
    pub(crate) fn new(points: &'a PointStore, context: &'a HullContext) -> Self {
        Self {
            graph: FacetGraph::new(context.dimension()),
            points,
            context,
            stats: HullStatistics::default(),
            retired: PointIdSet::default(),
        }
    }

    /// Builds the hull from an initial simplex and returns the finished graph.
    pub(crate) fn run(
        mut self,
        simplex: &[PointId],
    ) -> Result<(FacetGraph, HullStatistics), HullConstructionError> {
        let initial = self.build_simplex(simplex)?;
        self.partition_initial(simplex, &initial)?;

        let limit = self.points.total_len() + 1;
        while let Some((facet, apex)) = self.next_apex() {
            self.stats.processed_points += 1;
            if self.stats.processed_points > limit {
                return Err(HullConstructionError::NumericInstability {
                    facet_id: self.facet_id(facet),
                    message: format!("more than {limit} apex points processed"),
                });
            }
            self.add_point(facet, apex)?;
        }

        if self.context.options().triangulate {
            self.triangulate()?;
        }
        self.finalize()?;

        tracing::debug!(
            "[quickhull] finished: {} facets, {} ridges, {} vertices, {} merges",
            self.graph.number_of_facets(),
            self.graph.number_of_ridges(),
            self.graph.number_of_vertices(),
            self.stats.merges
        );
        Ok((self.graph, self.stats))
    }

    // =========================================================================
    // SHARED HELPERS
    // =========================================================================

    pub(crate) fn coords(&self, point: PointId) -> Result<&'a [f64], HullConstructionError> {
        self.points
            .coords(point)
            .ok_or_else(|| HullConstructionError::NumericInstability {
                facet_id: u64::MAX,
                message: format!("point {point} is not in the point store"),
            })
    }

    pub(crate) fn facet_id(&self, key: FacetKey) -> u64 {
        self.graph.facet(key).map_or(u64::MAX, Facet::id)
    }

    /// Assigns a point to the candidate facet it lies farthest above.
    ///
    /// Outside points join that facet's outside set. Points within tolerance are kept as
    /// coplanar when requested; everything else is interior and dropped. A retired vertex
    /// point above the facet counts as coplanar; `finalize` widens the outer
    /// plane to cover it.
    pub(crate) fn assign_point(
        &mut self,
        point: PointId,
        candidates: &[FacetKey],
    ) -> Result<(), HullConstructionError> {
        let coords = self.coords(point)?;
        let mut best: Option<(FacetKey, f64)> = None;
        for &key in candidates {
            let Some(facet) = self.graph.facet(key) else {
                continue;
            };
            let distance = facet.hyperplane.distance(coords);
            if best.is_none_or(|(_, best_distance)| distance > best_distance) {
                best = Some((key, distance));
            }
        }
        let Some((key, distance)) = best else {
            return Ok(());
        };
        let keep_coplanar = self.context.options().keep_coplanar;
        let classification = match self.context.tolerance().classify(distance) {
            PointClassification::Outside if self.retired.contains(&point) => {
                PointClassification::Coplanar
            }
            other => other,
        };
        if let Some(facet) = self.graph.facet_mut(key) {
            let entry = ClassifiedPoint { point, distance };
            match classification {
                PointClassification::Outside => facet.outside.push(entry),
                PointClassification::Coplanar if keep_coplanar => facet.coplanar.push(entry),
                PointClassification::Coplanar | PointClassification::Inside => {}
            }
        }
        Ok(())
    }

    pub(crate) fn sort_outside_sets(&mut self, facets: &[FacetKey]) {
        for &key in facets {
            if let Some(facet) = self.graph.facet_mut(key) {
                facet.sort_outside();
            }
        }
    }

    /// Orients a plane so the hull interior is below it. When the interior point is too
    /// close to the plane to decide, the farthest vertex of `reference` is used instead.
    pub(crate) fn orient(&self, plane: &mut Hyperplane, reference: Option<FacetKey>) {
        let tolerance = self.context.tolerance().distance();
        let interior_distance = plane.distance(self.context.interior());
        if interior_distance.abs() > tolerance {
            plane.orient_away_from(self.context.interior());
            return;
        }
        let reference_vertex = reference.and_then(|key| {
            self.graph
                .facet_vertex_coords(key, self.points)
                .into_iter()
                .max_by(|a, b| plane.distance(a).abs().total_cmp(&plane.distance(b).abs()))
        });
        match reference_vertex {
            Some(coords) => {
                plane.orient_away_from(coords);
            }
            None => {
                plane.orient_away_from(self.context.interior());
            }
        }
    }

    // =========================================================================
    // INITIAL SIMPLEX
    // =========================================================================

    fn build_simplex(&mut self, simplex: &[PointId]) -> Result<Vec<FacetKey>, HullConstructionError> {
        let vertices: Vec<VertexKey> = simplex
            .iter()
            .map(|&point| self.graph.insert_vertex(point))
            .collect();

        let mut facets = Vec::with_capacity(simplex.len());
        for omit in 0..simplex.len() {
            let keys: VertexKeyBuffer = vertices
                .iter()
                .enumerate()
                .filter_map(|(i, &v)| (i != omit).then_some(v))
                .collect();
            let coords = self.graph.vertex_coords(&keys, self.points);
            let mut plane = Hyperplane::through_points(&coords).map_err(|source| {
                HullConstructionError::NumericInstability {
                    facet_id: omit as u64,
                    message: format!("initial facet plane: {source}"),
                }
            })?;
            plane.orient_away_from(self.context.interior());
            facets.push(self.graph.insert_facet(Facet::new(plane, keys)));
        }

        for i in 0..facets.len() {
            for j in (i + 1)..facets.len() {
                let shared: VertexKeyBuffer = vertices
                    .iter()
                    .enumerate()
                    .filter_map(|(k, &v)| (k != i && k != j).then_some(v))
                    .collect();
                self.graph.insert_ridge(facets[i], facets[j], shared);
            }
        }

        let dimension = self.graph.dimension();
        for &key in &facets {
            self.graph.refresh_neighbors(key);
            if let Some(facet) = self.graph.facet_mut(key) {
                facet.refresh_simplicial(dimension);
            }
        }
        self.stats.facets_created += facets.len();
        Ok(facets)
    }

    fn partition_initial(
        &mut self,
        simplex: &[PointId],
        facets: &[FacetKey],
    ) -> Result<(), HullConstructionError> {
        for point in self.points.ids() {
            if !simplex.contains(&point) {
                self.assign_point(point, facets)?;
            }
        }
        self.sort_outside_sets(facets);
        Ok(())
    }

    // =========================================================================
    // GROWTH
    // =========================================================================

    /// First facet in list order with a non-empty outside set, and its farthest point.
    fn next_apex(&self) -> Option<(FacetKey, PointId)> {
        self.graph
            .facets()
            .find_map(|(key, facet)| facet.furthest_outside().map(|p| (key, p.point)))
    }

    fn add_point(&mut self, start: FacetKey, apex: PointId) -> Result<(), HullConstructionError> {
        let apex_coords = self.coords(apex)?;
        if let Some(facet) = self.graph.facet_mut(start) {
            facet.outside.retain(|p| p.point != apex);
        }
        tracing::trace!(
            "[quickhull] adding {apex} above f{}",
            self.facet_id(start)
        );

        let visible = self.collect_visible(start, apex_coords);
        let horizon = self.collect_horizon(&visible);
        if horizon.is_empty() {
            return Err(HullConstructionError::NumericInstability {
                facet_id: self.facet_id(start),
                message: format!("{apex} sees every facet of the hull"),
            });
        }
        self.stats.max_visible = self.stats.max_visible.max(visible.len());
        self.stats.max_horizon = self.stats.max_horizon.max(horizon.len());

        let apex_vertex = self.graph.insert_vertex(apex);
        if let Some(vertex) = self.graph.vertex_mut(apex_vertex) {
            vertex.newly_added = true;
        }

        let new_facets = self.build_cone(apex_vertex, &horizon)?;
        self.link_cone(&new_facets)?;
        let orphans = self.delete_visible(&visible);

        let dimension = self.graph.dimension();
        let mut candidates: Vec<FacetKey> = new_facets.clone();
        for &key in &new_facets {
            self.graph.refresh_neighbors(key);
            if let Some(facet) = self.graph.facet_mut(key) {
                facet.refresh_simplicial(dimension);
            }
        }
        for entry in &horizon {
            self.graph.refresh_neighbors(entry.other);
            if !candidates.contains(&entry.other) {
                candidates.push(entry.other);
            }
        }

        for point in orphans {
            if point != apex {
                self.assign_point(point, &candidates)?;
            }
        }
        self.sort_outside_sets(&candidates);

        self.merge_facets_around(&new_facets)?;

        for key in new_facets {
            if let Some(facet) = self.graph.facet_mut(key) {
                facet.flags.new_facet = false;
            }
        }
        if let Some(vertex) = self.graph.vertex_mut(apex_vertex) {
            vertex.newly_added = false;
        }
        Ok(())
    }

    /// Breadth-first search over neighbors for the facets the apex lies above.
    fn collect_visible(&mut self, start: FacetKey, apex: &[f64]) -> Vec<FacetKey> {
        let tolerance = self.context.tolerance().distance();
        let mut visible = vec![start];
        let mut seen: FacetKeySet = fast_hash_set_with_capacity(16);
        seen.insert(start);
        if let Some(facet) = self.graph.facet_mut(start) {
            facet.flags.visible = true;
        }

        let mut index = 0;
        while index < visible.len() {
            let current = visible[index];
            index += 1;
            let neighbors: FacetKeyBuffer = self
                .graph
                .facet(current)
                .map(|facet| facet.neighbors.clone())
                .unwrap_or_default();
            for neighbor in neighbors {
                if !seen.insert(neighbor) {
                    continue;
                }
                let is_visible = self
                    .graph
                    .facet(neighbor)
                    .is_some_and(|facet| facet.hyperplane.distance(apex) > tolerance);
                if is_visible {
                    if let Some(facet) = self.graph.facet_mut(neighbor) {
                        facet.flags.visible = true;
                    }
                    visible.push(neighbor);
                }
            }
        }
        visible
    }

    /// Ridges with exactly one visible side.
    fn collect_horizon(&mut self, visible: &[FacetKey]) -> Vec<HorizonRidge> {
        let mut horizon = Vec::new();
        for &key in visible {
            let Some(facet) = self.graph.facet(key) else {
                continue;
            };
            for &ridge_key in &facet.ridges {
                let Some(other) = self.graph.ridge(ridge_key).and_then(|r| r.other(key)) else {
                    continue;
                };
                let other_visible = self
                    .graph
                    .facet(other)
                    .is_some_and(|facet| facet.flags.visible);
                if !other_visible {
                    horizon.push(HorizonRidge {
                        ridge: ridge_key,
                        visible: key,
                        other,
                    });
                }
            }
        }
        for entry in &horizon {
            if let Some(ridge) = self.graph.ridge_mut(entry.ridge) {
                ridge.tested = true;
            }
        }
        horizon
    }

    /// One new facet per horizon ridge: the ridge's vertices plus the apex. Each horizon
    /// ridge is handed over from its visible side to the new facet.
    fn build_cone(
        &mut self,
        apex: VertexKey,
        horizon: &[HorizonRidge],
    ) -> Result<Vec<FacetKey>, HullConstructionError> {
        let mut new_facets = Vec::with_capacity(horizon.len());
        for entry in horizon {
            let mut vertices = self
                .graph
                .ridge(entry.ridge)
                .map(|ridge| ridge.vertices.clone())
                .unwrap_or_default();
            vertices.push(apex);

            let coords = self.graph.vertex_coords(&vertices, self.points);
            let (plane, degenerate) = match Hyperplane::through_points(&coords) {
                Ok(mut plane) => {
                    self.orient(&mut plane, Some(entry.other));
                    (plane, false)
                }
                Err(source) => {
                    // Apex lies in the ridge's affine span; borrow the far side's plane and
                    // let the merge pass absorb the facet.
                    tracing::debug!(
                        "[quickhull] degenerate cone facet over f{}: {source}",
                        self.facet_id(entry.other)
                    );
                    let plane = self
                        .graph
                        .facet(entry.other)
                        .map(|facet| facet.hyperplane.clone())
                        .ok_or_else(|| HullConstructionError::NumericInstability {
                            facet_id: self.facet_id(entry.visible),
                            message: "horizon ridge lost its far side".to_string(),
                        })?;
                    (plane, true)
                }
            };

            let mut facet = Facet::new(plane, vertices);
            facet.flags.new_facet = true;
            facet.flags.degenerate = degenerate;
            let key = self.graph.insert_facet(facet);
            if let Some(ridge) = self.graph.ridge_mut(entry.ridge) {
                ridge.replace_facet(entry.visible, key);
                ridge.tested = false;
            }
            if let Some(facet) = self.graph.facet_mut(key) {
                facet.ridges.push(entry.ridge);
            }
            new_facets.push(key);
        }
        self.stats.facets_created += new_facets.len();
        Ok(new_facets)
    }

    /// Creates the ridges between cone facets by matching their apex-containing
    /// sub-faces.
    fn link_cone(&mut self, new_facets: &[FacetKey]) -> Result<(), HullConstructionError> {
        let mut subsets = SubsetFacetMap::default();
        let mut order: Vec<VertexKeyBuffer> = Vec::new();
        for &key in new_facets {
            let Some(facet) = self.graph.facet(key) else {
                continue;
            };
            let apex_position = facet.vertices.len() - 1;
            for skip in 0..apex_position {
                let mut sub: VertexKeyBuffer = facet
                    .vertices
                    .iter()
                    .enumerate()
                    .filter_map(|(i, &v)| (i != skip).then_some(v))
                    .collect();
                sub.sort_unstable();
                let holders = subsets.entry(sub.clone()).or_default();
                if holders.is_empty() {
                    order.push(sub);
                }
                holders.push(key);
            }
        }

        for sub in order {
            let Some(holders) = subsets.remove(&sub) else {
                continue;
            };
            if holders.len() != 2 {
                return Err(HullConstructionError::NumericInstability {
                    facet_id: self.facet_id(holders[0]),
                    message: format!(
                        "cone ridge is shared by {} new facets instead of 2",
                        holders.len()
                    ),
                });
            }
            self.graph.insert_ridge(holders[0], holders[1], sub);
        }
        Ok(())
    }

    /// Deletes the visible facets and the ridges between them. Returns the points they
    /// held, plus the points of vertices that no longer belong to any facet.
    fn delete_visible(&mut self, visible: &[FacetKey]) -> Vec<PointId> {
        for &key in visible {
            let ridges = self
                .graph
                .facet(key)
                .map(|facet| facet.ridges.clone())
                .unwrap_or_default();
            for ridge_key in ridges {
                let interior = self
                    .graph
                    .ridge(ridge_key)
                    .is_some_and(|ridge| ridge.contains_facet(key));
                if interior {
                    self.graph.remove_ridge(ridge_key);
                }
            }
        }

        let mut orphans = Vec::new();
        for &key in visible {
            let Some(record) = self.graph.remove_facet(key) else {
                continue;
            };
            orphans.extend(record.outside.iter().map(|p| p.point));
            orphans.extend(record.coplanar.iter().map(|p| p.point));
            for vertex_key in record.vertices {
                let orphaned = self
                    .graph
                    .vertex(vertex_key)
                    .is_some_and(|vertex| vertex.facets.is_empty());
                if orphaned && let Some(vertex) = self.graph.remove_vertex(vertex_key) {
                    self.retired.insert(vertex.point);
                    orphans.push(vertex.point);
                }
            }
        }
        self.stats.facets_deleted += visible.len();
        orphans
    }

    // =========================================================================
    // FINISH
    // =========================================================================

    /// Sets inner and outer offsets and flags on every facet. The outer offset covers the
    /// vertices, the coplanar points, and every retired vertex point.
    fn finalize(&mut self) -> Result<(), HullConstructionError> {
        let tolerance = self.context.tolerance().distance();
        let dimension = self.graph.dimension();
        let voronoi = self.context.is_voronoi();
        let infinity = self
            .context
            .infinity_point()
            .and_then(|point| self.graph.vertex_for_point(point));
        let filter = self.context.good_facets().clone();
        let retired: Vec<&[f64]> = self
            .retired
            .iter()
            .filter_map(|&point| self.points.coords(point))
            .collect();

        let keys: Vec<FacetKey> = self.graph.facet_keys().collect();
        for key in keys {
            let Some(facet) = self.graph.facet(key) else {
                continue;
            };
            let coords = self.graph.vertex_coords(&facet.vertices, self.points);
            let (mut low, mut high) = (0.0_f64, 0.0_f64);
            for point in coords {
                let distance = facet.hyperplane.distance(point);
                low = low.min(distance);
                high = high.max(distance);
            }
            for point in &facet.coplanar {
                high = high.max(point.distance);
            }
            for point in &retired {
                high = high.max(facet.hyperplane.distance(point));
            }
            let upper = voronoi
                && (is_upper_delaunay(&facet.hyperplane)
                    || infinity.is_some_and(|v| facet.vertices.contains(&v)));

            if let Some(facet) = self.graph.facet_mut(key) {
                facet.min_vertex = low;
                facet.max_outside = high;
                facet.flags.new_facet = false;
                facet.flags.visible = false;
                facet.flags.upper_delaunay = upper;
                facet.refresh_simplicial(dimension);
                facet.flags.good = !facet.flags.degenerate
                    && filter.accepts(&facet.hyperplane, upper, tolerance);
            }
        }

        self.graph.is_valid()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::algorithms::initial_simplex::select_initial_simplex;
    use crate::core::context::HullOptions;
    use crate::geometry::tolerance::Tolerance;
    use crate::geometry::util::centroid;

    fn build(
        store: &PointStore,
        options: HullOptions,
    ) -> Result<(FacetGraph, HullStatistics), HullConstructionError> {
        let tolerance = Tolerance::for_points(store, options.tolerance, options.merge_centrum);
        let simplex = select_initial_simplex(store, &tolerance)?;
        let coords: Vec<&[f64]> = simplex.iter().filter_map(|&p| store.coords(p)).collect();
        let interior = centroid(&coords).unwrap();
        let context = HullContext::new(store.dimension(), tolerance, interior, options, None);
        HullState::new(store, &context).run(&simplex)
    }

    #[test]
    fn test_simplex_only() {
        let store = PointStore::from_points(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ])
        .unwrap();
        let (graph, stats) = build(&store, HullOptions::default()).unwrap();
        assert_eq!(graph.number_of_facets(), 4);
        assert_eq!(graph.number_of_ridges(), 6);
        assert_eq!(stats.processed_points, 0);
        for (_, facet) in graph.facets() {
            assert!(facet.flags().simplicial);
            assert!(facet.flags().good);
            assert_eq!(facet.neighbor_keys().len(), 3);
        }
    }

    #[test]
    fn test_hexagon_adds_every_point() {
        let points: Vec<[f64; 2]> = (0..6)
            .map(|i| {
                let angle = f64::from(i) * std::f64::consts::PI / 3.0;
                [angle.cos(), angle.sin()]
            })
            .collect();
        let store = PointStore::from_points(&points).unwrap();
        let (graph, stats) = build(&store, HullOptions::default()).unwrap();
        assert_eq!(graph.number_of_facets(), 6);
        assert_eq!(graph.number_of_vertices(), 6);
        assert_eq!(stats.processed_points, 3);
        assert!(graph.is_valid().is_ok());
    }

    #[test]
    fn test_interior_points_are_dropped_or_kept_as_coplanar() {
        let store = PointStore::from_points(&[
            [0.0, 0.0],
            [2.0, 0.0],
            [2.0, 2.0],
            [0.0, 2.0],
            [1.0, 1.0],
            [1.0, 0.0],
        ])
        .unwrap();
        let (graph, _) = build(&store, HullOptions::default()).unwrap();
        assert_eq!(graph.number_of_facets(), 4);
        assert!(graph.vertex_for_point(PointId::new(4)).is_none());
        assert!(graph.vertex_for_point(PointId::new(5)).is_none());
        assert!(graph.facets().all(|(_, f)| f.coplanar().is_empty()));

        let (graph, _) = build(&store, HullOptions::default().with_keep_coplanar(true)).unwrap();
        let coplanar: Vec<PointId> = graph
            .facets()
            .flat_map(|(_, f)| f.coplanar().iter().map(|p| p.point))
            .collect();
        assert_eq!(coplanar, vec![PointId::new(5)]);
    }

    #[test]
    fn test_flags_are_cleared_on_finished_hull() {
        let store = PointStore::from_points(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
        ])
        .unwrap();
        let (graph, stats) = build(&store, HullOptions::default()).unwrap();
        assert_eq!(stats.processed_points, 1);
        for (_, facet) in graph.facets() {
            assert!(!facet.flags().new_facet);
            assert!(!facet.flags().visible);
            assert!(facet.outside().is_empty());
        }
        for (_, vertex) in graph.vertices() {
            assert!(!vertex.is_newly_added());
        }
        for (_, ridge) in graph.ridges() {
            assert!(!ridge.is_tested());
        }
    }

    #[test]
    fn test_unknown_point_names_no_facet() {
        let store = PointStore::from_points(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]).unwrap();
        let tolerance = Tolerance::for_points(&store, None, None);
        let context =
            HullContext::new(2, tolerance, vec![0.25, 0.25], HullOptions::default(), None);
        let state = HullState::new(&store, &context);
        assert!(state.coords(PointId::new(2)).is_ok());
        match state.coords(PointId::new(99)) {
            Err(HullConstructionError::NumericInstability { facet_id, message }) => {
                assert_eq!(facet_id, u64::MAX);
                assert!(message.contains("not in the point store"));
            }
            other => panic!("expected NumericInstability, got {other:?}"),
        }
    }
}
