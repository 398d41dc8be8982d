//! Selection of the starting simplex.
//!
//! The simplex starts from the two extreme points along the axis of largest extent and then
//! grows greedily: each further vertex is the point farthest from the affine span of the ones
//! already chosen. A residual at or below the distance tolerance means the input does not
//! span the full space, which is reported before any facet exists.

#![forbid(unsafe_code)]

use crate::core::hull_data_structure::HullConstructionError;
use crate::geometry::point::{PointId, PointStore};
use crate::geometry::tolerance::Tolerance;
use crate::geometry::util::{difference, dot, hypot};

/// Chooses `d + 1` affinely independent points, in selection order.
///
/// Every point of the store is a candidate, including appended other points.
///
/// # Errors
///
/// - [`HullConstructionError::InsufficientPoints`] with fewer than `d + 1` points;
/// - [`HullConstructionError::CoincidentPoints`] when every axis extent is within tolerance;
/// - [`HullConstructionError::DegenerateInput`] when the points span a lower-dimensional
///   affine subspace.
pub fn select_initial_simplex(
    points: &PointStore,
    tolerance: &Tolerance,
) -> Result<Vec<PointId>, HullConstructionError> {
    let dimension = points.dimension();
    let count = points.total_len();
    if count < dimension + 1 {
        return Err(HullConstructionError::InsufficientPoints {
            dimension,
            required: dimension + 1,
            actual: count,
        });
    }

    let (low, high, extent) = widest_axis_extremes(points);
    if extent <= tolerance.distance() {
        return Err(HullConstructionError::CoincidentPoints {
            count,
            tolerance: format!("{:e}", tolerance.distance()),
        });
    }

    let origin = coords(points, low)?;
    let mut simplex = vec![low, high];
    let first = difference(coords(points, high)?, origin);
    let length = hypot(&first);
    let mut basis: Vec<Vec<f64>> = vec![first.iter().map(|x| x / length).collect()];

    while simplex.len() <= dimension {
        let mut best: Option<(PointId, Vec<f64>, f64)> = None;
        for id in points.ids() {
            if simplex.contains(&id) {
                continue;
            }
            let residual = residual_from_span(coords(points, id)?, origin, &basis);
            let norm = hypot(&residual);
            if best.as_ref().is_none_or(|(_, _, best_norm)| norm > *best_norm) {
                best = Some((id, residual, norm));
            }
        }
        match best {
            Some((id, residual, norm)) if norm > tolerance.distance() => {
                basis.push(residual.iter().map(|x| x / norm).collect());
                simplex.push(id);
            }
            _ => {
                return Err(HullConstructionError::DegenerateInput {
                    dimension,
                    spanned: simplex.len() - 1,
                });
            }
        }
    }

    tracing::debug!(
        "[quickhull] initial simplex: {}",
        simplex
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    );
    Ok(simplex)
}

/// Lowest and highest point along the axis with the largest spread. Ties keep the first
/// point encountered.
fn widest_axis_extremes(points: &PointStore) -> (PointId, PointId, f64) {
    let mut best = (PointId::new(0), PointId::new(0), f64::NEG_INFINITY);
    for axis in 0..points.dimension() {
        let mut low = (PointId::new(0), f64::INFINITY);
        let mut high = (PointId::new(0), f64::NEG_INFINITY);
        for id in points.ids() {
            let Some(value) = points.coords(id).map(|c| c[axis]) else {
                continue;
            };
            if value < low.1 {
                low = (id, value);
            }
            if value > high.1 {
                high = (id, value);
            }
        }
        let extent = high.1 - low.1;
        if extent > best.2 {
            best = (low.0, high.0, extent);
        }
    }
    best
}

/// Component of `point - origin` orthogonal to the orthonormal `basis`.
///
/// Projections are removed twice, which keeps the residual orthogonal even when the basis
/// has accumulated rounding.
fn residual_from_span(point: &[f64], origin: &[f64], basis: &[Vec<f64>]) -> Vec<f64> {
    let mut residual = difference(point, origin);
    for _ in 0..2 {
        for direction in basis {
            let projection = dot(&residual, direction);
            for (r, b) in residual.iter_mut().zip(direction) {
                *r -= projection * b;
            }
        }
    }
    residual
}

fn coords(points: &PointStore, id: PointId) -> Result<&[f64], HullConstructionError> {
    points
        .coords(id)
        .ok_or_else(|| HullConstructionError::InsufficientPoints {
            dimension: points.dimension(),
            required: points.dimension() + 1,
            actual: points.total_len(),
        })
}
