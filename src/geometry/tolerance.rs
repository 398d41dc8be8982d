//! Distance tolerances for hull construction.
//!
//! Every "is this point above the plane?" and "are these facets coplanar?" decision is made
//! against a [`Tolerance`] computed once per run from the magnitude of the input, or taken
//! from the caller. The value is frozen before the first facet is built.

#![forbid(unsafe_code)]

use crate::geometry::point::PointStore;
use serde::{Deserialize, Serialize};

/// Safety factor applied to the estimated round-off of a distance computation.
pub const DISTANCE_ROUNDOFF_FACTOR: f64 = 4.0;

/// Default merge threshold, as a multiple of the distance tolerance.
pub const DEFAULT_MERGE_CENTRUM_FACTOR: f64 = 2.0;

/// Where a point lies relative to a facet hyperplane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointClassification {
    /// Below the plane by more than the tolerance.
    Inside,
    /// Within the tolerance of the plane.
    Coplanar,
    /// Above the plane by more than the tolerance.
    Outside,
}

/// Tolerances used by one hull construction.
///
/// # Examples
///
/// ```rust
/// use qhull_rs::geometry::point::PointStore;
/// use qhull_rs::geometry::tolerance::{PointClassification, Tolerance};
///
/// let store = PointStore::from_points(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]).unwrap();
/// let tolerance = Tolerance::for_points(&store, None, None);
/// assert!(tolerance.distance() > 0.0 && tolerance.distance() < 1e-12);
/// assert_eq!(tolerance.classify(1.0), PointClassification::Outside);
/// assert_eq!(tolerance.classify(0.0), PointClassification::Coplanar);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    distance: f64,
    merge_centrum: f64,
    round_off: f64,
    user_supplied: bool,
}

impl Tolerance {
    /// Computes the tolerances for a point set.
    ///
    /// `distance_override` replaces the computed distance tolerance and `merge_override`
    /// replaces the merge threshold (which otherwise defaults to
    /// [`DEFAULT_MERGE_CENTRUM_FACTOR`] times the distance tolerance).
    #[must_use]
    pub fn for_points(
        points: &PointStore,
        distance_override: Option<f64>,
        merge_override: Option<f64>,
    ) -> Self {
        let round_off = Self::round_off(
            points.dimension(),
            points.max_abs_coordinate(),
            points.max_abs_sum(),
        );
        let distance = distance_override.unwrap_or(round_off * DISTANCE_ROUNDOFF_FACTOR);
        Self {
            distance,
            merge_centrum: merge_override.unwrap_or(distance * DEFAULT_MERGE_CENTRUM_FACTOR),
            round_off,
            user_supplied: distance_override.is_some(),
        }
    }

    /// Estimated round-off error of one point-to-plane distance.
    ///
    /// Scales machine epsilon by the largest coordinate sum times the dimension, plus the
    /// largest single coordinate.
    #[must_use]
    pub fn round_off(dimension: usize, max_abs: f64, max_abs_sum: f64) -> f64 {
        let scale = (dimension as f64 * max_abs_sum).mul_add(1.01, max_abs);
        f64::EPSILON * scale
    }

    /// Distance above which a point is outside a facet.
    #[inline]
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    /// Centrum distance below which two neighboring facets are merged.
    #[inline]
    #[must_use]
    pub const fn merge_centrum(&self) -> f64 {
        self.merge_centrum
    }

    /// Round-off estimate the defaults were derived from.
    #[inline]
    #[must_use]
    pub const fn round_off_estimate(&self) -> f64 {
        self.round_off
    }

    /// Whether the distance tolerance came from the caller.
    #[inline]
    #[must_use]
    pub const fn is_user_supplied(&self) -> bool {
        self.user_supplied
    }

    /// Largest deviation of a hull vertex or retained point from its facet plane on a
    /// finished hull: the distance tolerance plus the slack merging may introduce.
    #[inline]
    #[must_use]
    pub fn max_offset(&self) -> f64 {
        self.distance.mul_add(2.0, self.merge_centrum)
    }

    /// `true` if `distance` is strictly above the plane by more than the tolerance.
    #[inline]
    #[must_use]
    pub fn is_outside(&self, distance: f64) -> bool {
        distance > self.distance
    }

    /// Classifies a signed distance.
    #[must_use]
    pub fn classify(&self, distance: f64) -> PointClassification {
        if distance > self.distance {
            PointClassification::Outside
        } else if distance >= -self.distance {
            PointClassification::Coplanar
        } else {
            PointClassification::Inside
        }
    }

    /// Point equality under the distance tolerance.
    #[must_use]
    pub fn points_equal(&self, a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len()
            && crate::geometry::point::squared_distance(a, b) <= self.distance * self.distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tolerance_scales_with_magnitude() {
        let small = PointStore::from_points(&[[0.0, 0.0], [1.0, 1.0]]).unwrap();
        let large = PointStore::from_points(&[[0.0, 0.0], [1e6, 1e6]]).unwrap();
        let small_tol = Tolerance::for_points(&small, None, None);
        let large_tol = Tolerance::for_points(&large, None, None);
        assert!(large_tol.distance() > small_tol.distance() * 1e5);
        assert!(!small_tol.is_user_supplied());
    }

    #[test]
    fn test_overrides_are_respected() {
        let store = PointStore::from_points(&[[0.0, 0.0], [1.0, 1.0]]).unwrap();
        let tol = Tolerance::for_points(&store, Some(1e-6), None);
        assert_relative_eq!(tol.distance(), 1e-6);
        assert_relative_eq!(tol.merge_centrum(), 2e-6);
        assert!(tol.is_user_supplied());

        let tol = Tolerance::for_points(&store, Some(1e-6), Some(5e-5));
        assert_relative_eq!(tol.merge_centrum(), 5e-5);
        assert_relative_eq!(tol.max_offset(), 5.2e-5);
    }

    #[test]
    fn test_classification_boundaries() {
        let store = PointStore::from_points(&[[0.0, 0.0], [1.0, 1.0]]).unwrap();
        let tol = Tolerance::for_points(&store, Some(0.1), None);
        assert_eq!(tol.classify(0.11), PointClassification::Outside);
        assert_eq!(tol.classify(0.1), PointClassification::Coplanar);
        assert_eq!(tol.classify(-0.1), PointClassification::Coplanar);
        assert_eq!(tol.classify(-0.11), PointClassification::Inside);
        assert!(tol.points_equal(&[0.0, 0.0], &[0.05, 0.05]));
        assert!(!tol.points_equal(&[0.0, 0.0], &[0.1, 0.1]));
    }
}
