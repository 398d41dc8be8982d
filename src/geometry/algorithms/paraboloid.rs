//! Paraboloid lift for Delaunay triangulations and Voronoi diagrams.
//!
//! Lifting every input point `p` to `(p, |p|²)` turns the Delaunay triangulation of the
//! input into the lower convex hull of the lifted points: a lower facet's vertices are
//! cospherical and no other input point lies inside their circumsphere. The circumcenter of
//! a lower facet is a Voronoi vertex.
//!
//! A synthetic point at infinity sits above the centroid of the input, higher than every
//! lifted point. It keeps small inputs (three points in the plane, say) full-dimensional
//! after lifting and ends up only in upper facets.

#![forbid(unsafe_code)]

use crate::geometry::hyperplane::Hyperplane;
use crate::geometry::point::{PointId, PointStore, PointStoreError};
use crate::geometry::util::squared_norm;

/// Upper facets have a normal whose last coordinate is at least `-UPPER_DELAUNAY_EPSILON`.
pub const UPPER_DELAUNAY_EPSILON: f64 = 1e-12;

/// `(p, |p|²)`.
///
/// # Examples
///
/// ```rust
/// use qhull_rs::geometry::algorithms::paraboloid::lift_point;
///
/// assert_eq!(lift_point(&[1.0, 2.0]), vec![1.0, 2.0, 5.0]);
/// ```
#[must_use]
pub fn lift_point(coords: &[f64]) -> Vec<f64> {
    let mut lifted = Vec::with_capacity(coords.len() + 1);
    lifted.extend_from_slice(coords);
    lifted.push(squared_norm(coords));
    lifted
}

/// Lifts every input point and appends the point at infinity.
///
/// Point ids are preserved: input point `i` of `points` is input point `i` of the result.
/// The returned id names the point at infinity, stored as an other point.
///
/// # Errors
///
/// Returns [`PointStoreError`] if the lifted coordinates overflow to non-finite values.
pub fn lift_to_paraboloid(points: &PointStore) -> Result<(PointStore, PointId), PointStoreError> {
    let dimension = points.dimension();
    let mut coords = Vec::with_capacity(points.len() * (dimension + 1));
    let mut low = f64::INFINITY;
    let mut high = f64::NEG_INFINITY;
    let mut center = vec![0.0; dimension];
    for point in points.iter() {
        let lifted = lift_point(point.coords());
        let height = lifted[dimension];
        low = low.min(height);
        high = high.max(height);
        for (sum, value) in center.iter_mut().zip(point.coords()) {
            *sum += value;
        }
        coords.extend(lifted);
    }
    let count = points.len().max(1) as f64;
    for value in &mut center {
        *value /= count;
    }

    let mut lifted = PointStore::new(dimension + 1, coords)?;

    let (min, max) = points.bounds();
    let diagonal: f64 = min.iter().zip(&max).map(|(lo, hi)| (hi - lo) * (hi - lo)).sum();
    let mut rise = (high - low).max(diagonal);
    if rise <= 0.0 {
        rise = 1.0;
    }
    center.push(high + rise);
    let infinity = lifted.add_other_point(center)?;
    Ok((lifted, infinity))
}

/// Whether a lifted facet faces up (or is vertical) and so contributes no Delaunay region.
#[must_use]
pub fn is_upper_delaunay(plane: &Hyperplane) -> bool {
    plane
        .normal()
        .last()
        .is_some_and(|&last| last >= -UPPER_DELAUNAY_EPSILON)
}

/// Center of the sphere a lower lifted plane cuts out, `−½·n[..d] / n[d]`.
///
/// Returns `None` for (near-)vertical planes.
#[must_use]
pub fn voronoi_center_from_normal(plane: &Hyperplane) -> Option<Vec<f64>> {
    let (&last, rest) = plane.normal().split_last()?;
    if last.abs() <= UPPER_DELAUNAY_EPSILON {
        return None;
    }
    Some(rest.iter().map(|n| -0.5 * n / last).collect())
}
