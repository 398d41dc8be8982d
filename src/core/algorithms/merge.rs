//! Facet merging.
//!
//! After a cone of new facets has been attached, some neighbors may be coplanar within
//! round-off or even slightly non-convex. Two neighbors are merged when the centrum of
//! either one (its vertex centroid projected onto its own plane) is not clearly below the
//! other's plane, or when one of them is degenerate.
//!
//! A merge keeps one facet (the survivor) and folds the other into it: shared ridges are
//! deleted, the remaining ridges are handed over, vertex sets are united, vertices that no
//! longer lie on any ridge are dropped, and the plane is refitted to the vertices. Points
//! held by either facet are repartitioned. Merges are counted against
//! [`HullOptions::max_merges`](crate::core::context::HullOptions::max_merges).
//!
//! Once the merges around an apex are done, a vertex that belongs to fewer than `d`
//! facets lies inside a shared lower-dimensional face rather than at a corner. Its ridges
//! are moved onto a neighboring vertex of that face and the vertex is removed.
//!
//! The point of a removed vertex is retired: it may become a coplanar point, but it never
//! re-enters an outside set.

#![forbid(unsafe_code)]

use super::quickhull::HullState;
use crate::core::collections::{FacetKeyBuffer, FacetKeySet, VertexKeyBuffer, VertexKeySet};
use crate::core::facet::{ClassifiedPoint, Facet};
use crate::core::hull_data_structure::{FacetKey, HullConstructionError, RidgeKey, VertexKey};
use crate::geometry::hyperplane::Hyperplane;
use crate::geometry::point::PointId;
use crate::geometry::tolerance::PointClassification;
use crate::geometry::util::{centroid, simplex_volume};
use std::cmp::Reverse;
use std::collections::VecDeque;

/// Relative change in ridge measure allowed when a vertex is collapsed onto a neighbor.
const COLLAPSE_MEASURE_SLACK: f64 = 1e-9;

/// Ridge rewrite for one vertex collapse: `None` deletes the ridge, `Some` replaces its
/// vertex set.
type CollapsePlan = Vec<(RidgeKey, Option<VertexKeyBuffer>)>;

impl HullState<'_> {
    /// Merges around `seeds` until no facet reachable from them needs merging, then
    /// collapses the vertices those merges left without a corner.
    pub(crate) fn merge_facets_around(
        &mut self,
        seeds: &[FacetKey],
    ) -> Result<(), HullConstructionError> {
        let mut queue: VecDeque<FacetKey> = seeds.iter().copied().collect();
        let mut queued: FacetKeySet = seeds.iter().copied().collect();
        let mut survivors = FacetKeySet::default();
        while let Some(key) = queue.pop_front() {
            queued.remove(&key);
            let Some(partner) = self.merge_partner(key) else {
                continue;
            };
            let survivor = self.merge_pair(key, partner)?;
            survivors.insert(survivor);
            if queued.insert(survivor) {
                queue.push_back(survivor);
            }
        }
        self.reduce_vertices(&survivors)
    }

    /// Vertex centroid of a facet projected onto its plane.
    pub(crate) fn centrum(&self, key: FacetKey) -> Option<Vec<f64>> {
        let facet = self.graph.facet(key)?;
        let coords = self.graph.vertex_coords(&facet.vertices, self.points);
        centroid(&coords).map(|center| facet.hyperplane.project(&center))
    }

    /// Neighbor that `key` must be merged with, preferring the most parallel one.
    ///
    /// Nearly parallel normals alone are not enough: a ridge whose centrums are clearly
    /// below the opposite planes is convex, however flat the angle.
    fn merge_partner(&self, key: FacetKey) -> Option<FacetKey> {
        let facet = self.graph.facet(key)?;
        let centrum = self.centrum(key)?;
        let threshold = self.context.tolerance().merge_centrum();

        let mut best: Option<(FacetKey, f64)> = None;
        for &neighbor_key in &facet.neighbors {
            let Some(neighbor) = self.graph.facet(neighbor_key) else {
                continue;
            };
            let cosine = facet.hyperplane.cos_angle(&neighbor.hyperplane);
            let needs_merge = facet.flags.degenerate
                || neighbor.flags.degenerate
                || neighbor.hyperplane.distance(&centrum) > -threshold
                || self
                    .centrum(neighbor_key)
                    .is_some_and(|other| facet.hyperplane.distance(&other) > -threshold);
            if needs_merge && best.is_none_or(|(_, best_cosine)| cosine > best_cosine) {
                best = Some((neighbor_key, cosine));
            }
        }
        best.map(|(neighbor, _)| neighbor)
    }

    /// Folds one facet into the other and returns the survivor.
    fn merge_pair(
        &mut self,
        first: FacetKey,
        second: FacetKey,
    ) -> Result<FacetKey, HullConstructionError> {
        let (survivor, absorbed) = self.choose_survivor(first, second);
        let dimension = self.graph.dimension();
        let survivor_id = self.facet_id(survivor);
        let absorbed_id = self.facet_id(absorbed);

        self.stats.merges += 1;
        let limit = self.context.options().max_merges;
        if self.stats.merges > limit {
            return Err(HullConstructionError::MergeLimitExceeded {
                facet_id: survivor_id,
                limit,
            });
        }

        let (absorbed_ridges, absorbed_vertices, absorbed_neighbors) = self
            .graph
            .facet(absorbed)
            .map(|facet| {
                (
                    facet.ridges.clone(),
                    facet.vertices.clone(),
                    facet.neighbors.clone(),
                )
            })
            .unwrap_or_default();

        for ridge_key in absorbed_ridges {
            let shared = self
                .graph
                .ridge(ridge_key)
                .is_some_and(|ridge| ridge.contains_facet(survivor));
            if shared {
                self.graph.remove_ridge(ridge_key);
            } else {
                let moved = self
                    .graph
                    .ridge_mut(ridge_key)
                    .is_some_and(|ridge| ridge.replace_facet(absorbed, survivor));
                if moved && let Some(facet) = self.graph.facet_mut(survivor) {
                    facet.ridges.push(ridge_key);
                }
            }
        }

        for vertex_key in absorbed_vertices {
            let added = match self.graph.facet_mut(survivor) {
                Some(facet) if !facet.vertices.contains(&vertex_key) => {
                    facet.vertices.push(vertex_key);
                    true
                }
                _ => false,
            };
            if added && let Some(vertex) = self.graph.vertex_mut(vertex_key) {
                vertex.add_facet(survivor);
            }
        }

        let record = self.graph.remove_facet(absorbed).ok_or_else(|| {
            HullConstructionError::NumericInstability {
                facet_id: absorbed_id,
                message: "merged facet vanished".to_string(),
            }
        })?;
        self.stats.facets_deleted += 1;

        self.graph.refresh_neighbors(survivor);
        for neighbor in absorbed_neighbors {
            self.graph.refresh_neighbors(neighbor);
        }

        let mut pending: Vec<PointId> = record
            .outside
            .iter()
            .chain(&record.coplanar)
            .map(|p| p.point)
            .collect();
        let dropped = self.drop_redundant_vertices(survivor);

        let (vertex_count, ridge_count) = self
            .graph
            .facet(survivor)
            .map_or((0, 0), |facet| (facet.vertices.len(), facet.ridges.len()));
        if vertex_count < dimension || ridge_count < dimension {
            return Err(HullConstructionError::NumericInstability {
                facet_id: survivor_id,
                message: format!(
                    "merge left {vertex_count} vertices and {ridge_count} ridges in {dimension}D"
                ),
            });
        }

        let plane = self.refit_plane(survivor, survivor_id)?;
        if let Some(facet) = self.graph.facet_mut(survivor) {
            facet.hyperplane = plane;
            facet.invalidate_caches();
            facet.flags.merged = true;
            facet.flags.degenerate = false;
            facet.refresh_simplicial(dimension);
            pending.extend(facet.outside.drain(..).map(|p| p.point));
            pending.extend(facet.coplanar.drain(..).map(|p| p.point));
        }

        let mut candidates = vec![survivor];
        if let Some(facet) = self.graph.facet(survivor) {
            candidates.extend(facet.neighbors.iter().copied());
        }
        for point in pending {
            self.assign_point(point, &candidates)?;
        }
        self.retire_points(&dropped, &[survivor])?;
        self.sort_outside_sets(&candidates);

        tracing::debug!(
            "[merge] f{survivor_id} absorbed f{absorbed_id}: {vertex_count} vertices, {ridge_count} ridges, {} dropped",
            dropped.len()
        );
        Ok(survivor)
    }

    /// Degenerate facets never survive; then old facets beat new ones, larger facets beat
    /// smaller ones, and lower ids win ties.
    fn choose_survivor(&self, a: FacetKey, b: FacetKey) -> (FacetKey, FacetKey) {
        let rank = |key: FacetKey| {
            self.graph.facet(key).map(|facet: &Facet| {
                (
                    facet.flags.degenerate,
                    facet.flags.new_facet,
                    Reverse(facet.vertices.len()),
                    facet.id,
                )
            })
        };
        if rank(b) < rank(a) { (b, a) } else { (a, b) }
    }

    /// Removes vertices of `key` that lie on none of its ridges. Returns the points of
    /// vertices that were left without any facet and deleted.
    fn drop_redundant_vertices(&mut self, key: FacetKey) -> Vec<PointId> {
        let Some(facet) = self.graph.facet(key) else {
            return Vec::new();
        };
        let on_ridges: VertexKeySet = facet
            .ridges
            .iter()
            .filter_map(|&r| self.graph.ridge(r))
            .flat_map(|ridge| ridge.vertices.iter().copied())
            .collect();
        let redundant: Vec<VertexKey> = facet
            .vertices
            .iter()
            .filter(|v| !on_ridges.contains(v))
            .copied()
            .collect();

        let mut orphans = Vec::new();
        for vertex_key in redundant {
            if let Some(facet) = self.graph.facet_mut(key) {
                facet.vertices.retain(|v| *v != vertex_key);
            }
            let orphaned = self.graph.vertex_mut(vertex_key).is_some_and(|vertex| {
                vertex.remove_facet(key);
                vertex.facets.is_empty()
            });
            if orphaned && let Some(vertex) = self.graph.remove_vertex(vertex_key) {
                tracing::debug!("[merge] dropped redundant vertex at {}", vertex.point);
                orphans.push(vertex.point);
            }
        }
        orphans
    }

    /// Marks the points of removed vertices as retired. With `keep_coplanar`, each one
    /// that is not clearly inside joins the coplanar set of the facet in `facets` it lies
    /// farthest above.
    fn retire_points(
        &mut self,
        points: &[PointId],
        facets: &[FacetKey],
    ) -> Result<(), HullConstructionError> {
        let keep_coplanar = self.context.options().keep_coplanar;
        for &point in points {
            self.retired.insert(point);
            if !keep_coplanar {
                continue;
            }
            let coords = self.coords(point)?;
            let best = facets
                .iter()
                .filter_map(|&key| {
                    self.graph
                        .facet(key)
                        .map(|facet| (key, facet.hyperplane.distance(coords)))
                })
                .max_by(|a, b| a.1.total_cmp(&b.1));
            let Some((key, distance)) = best else {
                continue;
            };
            if self.context.tolerance().classify(distance) == PointClassification::Inside {
                continue;
            }
            if let Some(facet) = self.graph.facet_mut(key) {
                facet.coplanar.push(ClassifiedPoint { point, distance });
            }
        }
        Ok(())
    }

    /// Least-squares plane through the facet's vertices, oriented outward.
    fn refit_plane(&self, key: FacetKey, facet_id: u64) -> Result<Hyperplane, HullConstructionError> {
        let coords = self.graph.facet_vertex_coords(key, self.points);
        let mut plane = Hyperplane::fit_points(&coords).map_err(|source| {
            HullConstructionError::NumericInstability {
                facet_id,
                message: format!("cannot refit merged facet: {source}"),
            }
        })?;
        let previous = self.graph.facet(key).map(|facet| facet.hyperplane.clone());
        let interior_distance = plane.distance(self.context.interior());
        if interior_distance.abs() > self.context.tolerance().distance() {
            plane.orient_away_from(self.context.interior());
        } else if let Some(previous) = previous
            && plane.cos_angle(&previous) < 0.0
        {
            plane = plane.flipped();
        }
        Ok(plane)
    }

    // =========================================================================
    // VERTEX COLLAPSE
    // =========================================================================

    /// Collapses every vertex of `facets` that belongs to fewer than `d` facets.
    ///
    /// A collapse can unblock a neighbor whose own collapse would have folded a ridge, so
    /// the vertices of every facet a collapse touched are examined again until a pass
    /// removes nothing.
    fn reduce_vertices(&mut self, facets: &FacetKeySet) -> Result<(), HullConstructionError> {
        let dimension = self.graph.dimension();
        let mut pending: Vec<FacetKey> = facets.iter().copied().collect();
        while !pending.is_empty() {
            let mut vertices: Vec<VertexKey> = pending
                .iter()
                .filter_map(|&key| self.graph.facet(key))
                .flat_map(|facet| facet.vertices.iter().copied())
                .collect();
            vertices.sort_unstable();
            vertices.dedup();

            pending.clear();
            for vertex_key in vertices {
                let sparse = self
                    .graph
                    .vertex(vertex_key)
                    .is_some_and(|vertex| vertex.facets.len() < dimension);
                if sparse && let Some(incident) = self.collapse_vertex(vertex_key)? {
                    pending.extend(incident);
                }
            }
        }
        Ok(())
    }

    /// Moves every ridge through `vertex_key` onto a neighboring vertex shared by all of
    /// its facets, then deletes the vertex. Returns the facets that held it, or `None`
    /// when no neighbor qualifies and the vertex is kept.
    fn collapse_vertex(
        &mut self,
        vertex_key: VertexKey,
    ) -> Result<Option<FacetKeyBuffer>, HullConstructionError> {
        let Some(vertex) = self.graph.vertex(vertex_key) else {
            return Ok(None);
        };
        let incident = vertex.facets.clone();
        let point = vertex.point;

        let mut star: Vec<RidgeKey> = Vec::new();
        for &facet_key in &incident {
            let Some(facet) = self.graph.facet(facet_key) else {
                continue;
            };
            for &ridge_key in &facet.ridges {
                let through = self
                    .graph
                    .ridge(ridge_key)
                    .is_some_and(|ridge| ridge.vertices.contains(&vertex_key));
                if through && !star.contains(&ridge_key) {
                    star.push(ridge_key);
                }
            }
        }

        let mut targets: Vec<VertexKey> = star
            .iter()
            .filter_map(|&r| self.graph.ridge(r))
            .flat_map(|ridge| ridge.vertices.iter().copied())
            .filter(|&v| v != vertex_key)
            .filter(|v| {
                incident.iter().all(|&f| {
                    self.graph
                        .facet(f)
                        .is_some_and(|facet| facet.vertices.contains(v))
                })
            })
            .collect();
        targets.sort_unstable();
        targets.dedup();

        let Some((target, plan)) = targets.into_iter().find_map(|target| {
            self.plan_collapse(vertex_key, target, &incident, &star)
                .map(|plan| (target, plan))
        }) else {
            tracing::trace!(
                "[merge] vertex at {point} lies in {} facets but has no collapse target",
                incident.len()
            );
            return Ok(None);
        };

        for (ridge_key, replaced) in plan {
            match replaced {
                Some(vertices) => {
                    if let Some(ridge) = self.graph.ridge_mut(ridge_key) {
                        ridge.vertices = vertices;
                    }
                }
                None => {
                    self.graph.remove_ridge(ridge_key);
                }
            }
        }
        let dimension = self.graph.dimension();
        for &facet_key in &incident {
            if let Some(facet) = self.graph.facet_mut(facet_key) {
                facet.vertices.retain(|v| *v != vertex_key);
                facet.invalidate_caches();
                facet.refresh_simplicial(dimension);
            }
            self.graph.refresh_neighbors(facet_key);
        }
        self.graph.remove_vertex(vertex_key);
        self.retire_points(&[point], &incident)?;

        if let Some(target) = self.graph.vertex(target) {
            tracing::debug!("[merge] collapsed vertex at {point} onto {}", target.point);
        }
        Ok(Some(incident))
    }

    /// Ridge rewrite that collapses `vertex_key` onto `target`, or `None` if the result
    /// would fold over, leave a gap, or duplicate a ridge.
    ///
    /// Ridges through both vertices vanish; the others swap `vertex_key` for `target`. The
    /// ridges between each pair of facets must keep their total measure and every
    /// rewritten ridge must keep a positive one.
    fn plan_collapse(
        &self,
        vertex_key: VertexKey,
        target: VertexKey,
        incident: &[FacetKey],
        star: &[RidgeKey],
    ) -> Option<CollapsePlan> {
        let dimension = self.graph.dimension();
        let mut plan = CollapsePlan::with_capacity(star.len());
        let mut rewritten: Vec<((FacetKey, FacetKey), f64)> = Vec::new();
        let mut totals: Vec<((FacetKey, FacetKey), f64, f64)> = Vec::new();

        for &ridge_key in star {
            let ridge = self.graph.ridge(ridge_key)?;
            let pair = if ridge.top < ridge.bottom {
                (ridge.top, ridge.bottom)
            } else {
                (ridge.bottom, ridge.top)
            };
            let before = self.ridge_measure(&ridge.vertices)?;
            let replaced = (!ridge.vertices.contains(&target)).then(|| {
                let mut vertices: VertexKeyBuffer = ridge
                    .vertices
                    .iter()
                    .map(|&v| if v == vertex_key { target } else { v })
                    .collect();
                vertices.sort_unstable();
                vertices
            });
            let after = match &replaced {
                Some(vertices) => {
                    let measure = self.ridge_measure(vertices)?;
                    rewritten.push((pair, measure));
                    measure
                }
                None => 0.0,
            };
            match totals.iter_mut().find(|entry| entry.0 == pair) {
                Some(entry) => {
                    entry.1 += before;
                    entry.2 += after;
                }
                None => totals.push((pair, before, after)),
            }
            plan.push((ridge_key, replaced));
        }

        for &(pair, before, after) in &totals {
            if (before - after).abs() > COLLAPSE_MEASURE_SLACK * before {
                return None;
            }
            let degenerate = rewritten
                .iter()
                .any(|&(other, measure)| other == pair && measure <= COLLAPSE_MEASURE_SLACK * before);
            if degenerate {
                return None;
            }
        }

        for &facet_key in incident {
            let facet = self.graph.facet(facet_key)?;
            let mut subsets: Vec<VertexKeyBuffer> = Vec::with_capacity(facet.ridges.len());
            for &ridge_key in &facet.ridges {
                match plan.iter().find(|(key, _)| *key == ridge_key) {
                    Some((_, Some(vertices))) => subsets.push(vertices.clone()),
                    Some((_, None)) => {}
                    None => subsets.push(self.graph.ridge(ridge_key)?.vertices.clone()),
                }
            }
            let ridge_count = subsets.len();
            subsets.sort_unstable();
            subsets.dedup();
            if subsets.len() != ridge_count
                || ridge_count < dimension
                || facet.vertices.len() <= dimension
            {
                return None;
            }
        }
        Some(plan)
    }

    /// `(d-2)`-volume of a ridge.
    fn ridge_measure(&self, vertices: &[VertexKey]) -> Option<f64> {
        let coords = self.graph.vertex_coords(vertices, self.points);
        simplex_volume(&coords).ok()
    }
}

#[cfg(test)]
mod tests {
    use crate::core::algorithms::initial_simplex::select_initial_simplex;
    use crate::core::algorithms::quickhull::{HullState, HullStatistics};
    use crate::core::context::{HullContext, HullOptions};
    use crate::core::hull_data_structure::{FacetGraph, HullConstructionError};
    use crate::geometry::point::{PointId, PointStore};
    use crate::geometry::tolerance::Tolerance;
    use crate::geometry::util::centroid;

    fn run(store: &PointStore, options: HullOptions) -> (FacetGraph, HullStatistics) {
        let tolerance = Tolerance::for_points(store, None, None);
        let simplex = select_initial_simplex(store, &tolerance).unwrap();
        let coords: Vec<&[f64]> = simplex.iter().filter_map(|&p| store.coords(p)).collect();
        let context = HullContext::new(
            store.dimension(),
            tolerance,
            centroid(&coords).unwrap(),
            options,
            None,
        );
        HullState::new(store, &context).run(&simplex).unwrap()
    }

    fn cube() -> PointStore {
        let mut points = Vec::new();
        for x in [0.0, 1.0] {
            for y in [0.0, 1.0] {
                for z in [0.0, 1.0] {
                    points.push([x, y, z]);
                }
            }
        }
        PointStore::from_points(&points).unwrap()
    }

    #[test]
    fn test_cube_faces_are_merged() {
        let (graph, stats) = run(&cube(), HullOptions::default());
        assert_eq!(graph.number_of_facets(), 6);
        assert_eq!(graph.number_of_vertices(), 8);
        assert!(stats.merges >= 6);
        for (_, facet) in graph.facets() {
            assert_eq!(facet.vertex_keys().len(), 4);
            assert_eq!(facet.ridge_keys().len(), 4);
            assert_eq!(facet.neighbor_keys().len(), 4);
            assert!(facet.flags().merged);
            assert!(!facet.flags().simplicial);
        }
        assert!(graph.is_valid().is_ok());
    }

    #[test]
    fn test_collinear_boundary_vertex_is_dropped() {
        // The edge midpoints start the simplex; adding the corners makes them collinear with
        // their neighbors, and the merged edges drop them.
        let store = PointStore::from_points(&[
            [1.0, 0.0],
            [1.0, 10.0],
            [0.0, 0.0],
            [2.0, 0.0],
            [2.0, 10.0],
            [0.0, 10.0],
        ])
        .unwrap();
        let (graph, stats) = run(&store, HullOptions::default());
        assert_eq!(graph.number_of_facets(), 4);
        assert_eq!(graph.number_of_vertices(), 4);
        assert!(stats.merges >= 2);
        assert!(graph.vertex_for_point(PointId::new(0)).is_none());
        assert!(graph.vertex_for_point(PointId::new(1)).is_none());
        assert!(graph.is_valid().is_ok());
    }

    #[test]
    fn test_dropped_vertex_points_become_coplanar() {
        let store = PointStore::from_points(&[
            [1.0, 0.0],
            [1.0, 10.0],
            [0.0, 0.0],
            [2.0, 0.0],
            [2.0, 10.0],
            [0.0, 10.0],
        ])
        .unwrap();
        let options = HullOptions {
            keep_coplanar: true,
            ..HullOptions::default()
        };
        let (graph, stats) = run(&store, options);
        assert_eq!(graph.number_of_vertices(), 4);
        // Three points start the simplex; each of the other three is an apex at most once.
        assert!(stats.processed_points <= 3);

        let coplanar: Vec<PointId> = graph
            .facets()
            .flat_map(|(_, facet)| facet.coplanar().iter().map(|p| p.point))
            .collect();
        assert!(coplanar.contains(&PointId::new(0)));
        assert!(coplanar.contains(&PointId::new(1)));
        for (_, facet) in graph.facets() {
            for entry in facet.coplanar() {
                assert!(entry.distance.abs() <= 1e-12);
            }
        }
    }

    #[test]
    fn test_edge_midpoints_are_collapsed() {
        // The midpoints of four parallel cube edges come first, so they win distance ties
        // against the corners of their edges and can become vertices before the corners do.
        // Once the faces are merged each of them lies in only two facets.
        let mut points = vec![
            [0.5, 0.0, 0.0],
            [0.5, 1.0, 0.0],
            [0.5, 0.0, 1.0],
            [0.5, 1.0, 1.0],
        ];
        for x in [0.0, 1.0] {
            for y in [0.0, 1.0] {
                for z in [0.0, 1.0] {
                    points.push([x, y, z]);
                }
            }
        }
        let store = PointStore::from_points(&points).unwrap();
        let (graph, _) = run(&store, HullOptions::default());

        assert_eq!(graph.number_of_facets(), 6);
        assert_eq!(graph.number_of_vertices(), 8);
        for id in 0..4 {
            assert!(graph.vertex_for_point(PointId::new(id)).is_none());
        }
        for (_, facet) in graph.facets() {
            assert_eq!(facet.vertex_keys().len(), 4);
            assert_eq!(facet.ridge_keys().len(), 4);
        }
        for (_, vertex) in graph.vertices() {
            assert_eq!(vertex.facet_keys().len(), 3);
        }
        assert!(graph.is_valid().is_ok());
    }

    #[test]
    fn test_flat_but_convex_ridges_are_not_merged() {
        // The base is bent along x = 0.5 by far more than round-off; the two halves must stay
        // separate facets even though their normals differ by about 1e-9 radians.
        let store = PointStore::from_points(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.5, 0.0, -1e-9],
            [0.5, 1.0, -1e-9],
            [0.5, 0.5, 1.0],
        ])
        .unwrap();
        let (graph, stats) = run(&store, HullOptions::default());
        assert_eq!(graph.number_of_vertices(), 7);
        assert!(stats.processed_points <= 3);
        let bottom = graph
            .facets()
            .filter(|(_, facet)| facet.hyperplane().normal()[2] < -0.99)
            .count();
        assert_eq!(bottom, 2);
        assert!(graph.is_valid().is_ok());
    }

    #[test]
    fn test_merge_limit_is_enforced() {
        let store = cube();
        let tolerance = Tolerance::for_points(&store, None, None);
        let simplex = select_initial_simplex(&store, &tolerance).unwrap();
        let coords: Vec<&[f64]> = simplex.iter().filter_map(|&p| store.coords(p)).collect();
        let options = HullOptions {
            max_merges: 1,
            ..HullOptions::default()
        };
        let context = HullContext::new(3, tolerance, centroid(&coords).unwrap(), options, None);
        let result = HullState::new(&store, &context).run(&simplex);
        assert!(matches!(
            result,
            Err(HullConstructionError::MergeLimitExceeded {
                limit: 1,
                ..
            })
        ));
    }
}
