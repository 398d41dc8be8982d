//! Triangulated output.
//!
//! Each non-simplicial facet is replaced by a fan of simplicial pieces around one apex
//! vertex (the facet's smallest vertex key): one piece per ridge that does not contain the
//! apex. Ridges of the original facet are handed to the piece that contains them, and pieces
//! are linked to each other through new ridges found by matching sorted vertex subsets.
//!
//! All pieces keep the original plane and record the first piece as their tricoplanar owner.
//! Pieces with zero measure (the apex collinear with a ridge, for instance) are flagged
//! degenerate and are never good.

#![forbid(unsafe_code)]

use super::quickhull::HullState;
use crate::core::collections::{SubsetFacetMap, VertexKeyBuffer};
use crate::core::facet::{Facet, FacetFlags};
use crate::core::hull_data_structure::{FacetKey, HullConstructionError, VertexKey};
use crate::geometry::point::squared_distance;
use crate::geometry::util::simplex_volume;

impl HullState<'_> {
    /// Splits every non-simplicial facet into simplicial pieces.
    pub(crate) fn triangulate(&mut self) -> Result<(), HullConstructionError> {
        let dimension = self.graph.dimension();
        let targets: Vec<FacetKey> = self
            .graph
            .facets()
            .filter(|(_, facet)| facet.vertices.len() > dimension)
            .map(|(key, _)| key)
            .collect();
        for key in targets {
            self.triangulate_facet(key)?;
        }
        Ok(())
    }

    fn triangulate_facet(&mut self, key: FacetKey) -> Result<(), HullConstructionError> {
        let facet_id = self.facet_id(key);
        let Some(facet) = self.graph.facet(key) else {
            return Ok(());
        };
        let plane = facet.hyperplane.clone();
        let merged = facet.flags.merged;
        let ridges = facet.ridges.clone();
        let neighbors = facet.neighbors.clone();
        let coplanar = facet.coplanar.clone();
        let apex = facet.vertices.iter().min().copied().ok_or_else(|| {
            HullConstructionError::NumericInstability {
                facet_id,
                message: "facet has no vertices".to_string(),
            }
        })?;

        let mut pieces: Vec<(FacetKey, VertexKeyBuffer)> = Vec::new();
        let mut owner: Option<FacetKey> = None;
        for &ridge_key in &ridges {
            let Some(ridge) = self.graph.ridge(ridge_key) else {
                continue;
            };
            if ridge.vertices.contains(&apex) {
                continue;
            }
            let mut vertices = ridge.vertices.clone();
            vertices.push(apex);

            let mut piece = Facet::new(plane.clone(), vertices.clone());
            piece.flags = FacetFlags {
                tricoplanar: true,
                merged,
                simplicial: true,
                ..FacetFlags::default()
            };
            let piece_key = self.graph.insert_facet(piece);
            let owner_key = *owner.get_or_insert(piece_key);
            if let Some(ridge) = self.graph.ridge_mut(ridge_key) {
                ridge.replace_facet(key, piece_key);
            }
            if let Some(piece) = self.graph.facet_mut(piece_key) {
                piece.tricoplanar_owner = Some(owner_key);
                piece.ridges.push(ridge_key);
            }
            pieces.push((piece_key, vertices));
        }
        let owner = owner.ok_or_else(|| HullConstructionError::NumericInstability {
            facet_id,
            message: "every ridge contains the triangulation apex".to_string(),
        })?;

        let mut subsets = SubsetFacetMap::default();
        let mut order: Vec<VertexKeyBuffer> = Vec::new();
        for (piece_key, vertices) in &pieces {
            for skip in vertices.iter().filter(|&&v| v != apex) {
                let mut sub: VertexKeyBuffer =
                    vertices.iter().filter(|&v| v != skip).copied().collect();
                sub.sort_unstable();
                let holders = subsets.entry(sub.clone()).or_default();
                if holders.is_empty() {
                    order.push(sub);
                }
                holders.push(*piece_key);
            }
        }

        // Boundary ridges through the apex belong to exactly one piece.
        for &ridge_key in &ridges {
            let Some(ridge) = self.graph.ridge(ridge_key) else {
                continue;
            };
            if !ridge.vertices.contains(&apex) {
                continue;
            }
            let ridge_id = ridge.id;
            let holders = subsets.remove(&ridge.vertices).unwrap_or_default();
            let [holder] = holders.as_slice() else {
                return Err(HullConstructionError::NumericInstability {
                    facet_id,
                    message: format!(
                        "boundary ridge r{ridge_id} matches {} triangulation pieces",
                        holders.len()
                    ),
                });
            };
            let holder = *holder;
            if let Some(ridge) = self.graph.ridge_mut(ridge_key) {
                ridge.replace_facet(key, holder);
            }
            if let Some(piece) = self.graph.facet_mut(holder) {
                piece.ridges.push(ridge_key);
            }
        }

        for sub in order {
            let Some(holders) = subsets.remove(&sub) else {
                continue;
            };
            let [first, second] = holders.as_slice() else {
                return Err(HullConstructionError::NumericInstability {
                    facet_id,
                    message: format!(
                        "interior ridge of the triangulation is shared by {} pieces",
                        holders.len()
                    ),
                });
            };
            self.graph.insert_ridge(*first, *second, sub);
        }

        if let Some(piece) = self.graph.facet_mut(owner) {
            piece.coplanar = coplanar;
        }
        self.graph.remove_facet(key);
        self.stats.facets_deleted += 1;
        self.stats.facets_created += pieces.len();
        self.stats.triangulated_facets += 1;

        for (piece_key, vertices) in &pieces {
            self.graph.refresh_neighbors(*piece_key);
            let degenerate = self.is_degenerate_piece(vertices, apex);
            if let Some(piece) = self.graph.facet_mut(*piece_key) {
                piece.flags.degenerate = degenerate;
            }
        }
        for neighbor in neighbors {
            self.graph.refresh_neighbors(neighbor);
        }

        tracing::debug!(
            "[triangulate] f{facet_id} split into {} pieces",
            pieces.len()
        );
        Ok(())
    }

    /// A piece is degenerate when its measure is below the distance tolerance times the
    /// scale of its edges from the apex.
    fn is_degenerate_piece(&self, vertices: &[VertexKey], apex: VertexKey) -> bool {
        let coords = self.graph.vertex_coords(vertices, self.points);
        let Some(apex_coords) = self
            .graph
            .vertex(apex)
            .and_then(|vertex| self.points.coords(vertex.point))
        else {
            return true;
        };
        let scale = coords
            .iter()
            .map(|c| squared_distance(c, apex_coords).sqrt())
            .fold(0.0_f64, f64::max);
        let exponent = i32::try_from(vertices.len().saturating_sub(2)).unwrap_or(i32::MAX);
        let bound = self.context.tolerance().distance() * scale.powi(exponent);
        simplex_volume(&coords).map_or(true, |volume| volume <= bound)
    }
}
