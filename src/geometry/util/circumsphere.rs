//! Circumsphere calculations for simplices.
//!
//! This module provides functions for computing the circumcenter and circumradius
//! of full-dimensional simplices given as coordinate rows.

#![forbid(unsafe_code)]

use super::CircumcenterError;
use super::norms::{hypot, squared_norm};
use crate::geometry::matrix::{Matrix, Vector, solve};

/// Calculate the circumcenter of `d + 1` points in `d` dimensions.
///
/// The circumcenter `C` is equidistant from every vertex. Subtracting the sphere equation at
/// `x₀` from the one at `xᵢ` gives a linear system in `y = C - x₀`:
///
/// ```text
/// (xᵢ - x₀) · y = ½ |xᵢ - x₀|²     for i = 1..d
/// ```
///
/// whose rows are the perpendicular bisectors of the edges from `x₀`.
///
/// # Errors
///
/// Returns [`CircumcenterError::EmptyPointSet`] for no points,
/// [`CircumcenterError::InvalidSimplex`] for a wrong point count or mixed dimensions, and
/// [`CircumcenterError::MatrixInversionFailed`] when the points are affinely dependent.
///
/// # Example
///
/// ```
/// use qhull_rs::geometry::util::circumcenter;
///
/// let center = circumcenter(&[&[0.0, 0.0], &[2.0, 0.0], &[0.0, 2.0]]).unwrap();
/// assert!((center[0] - 1.0).abs() < 1e-12);
/// assert!((center[1] - 1.0).abs() < 1e-12);
/// ```
pub fn circumcenter(points: &[&[f64]]) -> Result<Vec<f64>, CircumcenterError> {
    let origin = *points.first().ok_or(CircumcenterError::EmptyPointSet)?;
    let dimension = origin.len();
    if points.len() != dimension + 1 || points.iter().any(|p| p.len() != dimension) {
        return Err(CircumcenterError::InvalidSimplex {
            actual: points.len(),
            expected: dimension + 1,
            dimension,
        });
    }

    let a = Matrix::from_fn(dimension, dimension, |r, c| points[r + 1][c] - origin[c]);
    let b = Vector::from_fn(dimension, |r, _| {
        let edge: Vec<f64> = points[r + 1]
            .iter()
            .zip(origin)
            .map(|(x, o)| x - o)
            .collect();
        0.5 * squared_norm(&edge)
    });
    let y = solve(&a, &b)?;
    Ok(origin.iter().zip(y.iter()).map(|(o, y)| o + y).collect())
}

/// Circumradius of `d + 1` points in `d` dimensions.
///
/// # Errors
///
/// Same as [`circumcenter`].
pub fn circumradius(points: &[&[f64]]) -> Result<f64, CircumcenterError> {
    let center = circumcenter(points)?;
    Ok(circumradius_with_center(points, &center))
}

/// Distance from `center` to the first point; zero for an empty set.
#[must_use]
pub fn circumradius_with_center(points: &[&[f64]], center: &[f64]) -> f64 {
    points.first().map_or(0.0, |first| {
        let offset: Vec<f64> = first.iter().zip(center).map(|(x, c)| x - c).collect();
        hypot(&offset)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_circumcenter_regular_tetrahedron() {
        let points: [&[f64]; 4] = [
            &[1.0, 1.0, 1.0],
            &[1.0, -1.0, -1.0],
            &[-1.0, 1.0, -1.0],
            &[-1.0, -1.0, 1.0],
        ];
        let center = circumcenter(&points).unwrap();
        for c in &center {
            assert_relative_eq!(*c, 0.0, epsilon = 1e-12);
        }
        assert_relative_eq!(circumradius(&points).unwrap(), 3.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_circumcenter_errors() {
        assert_eq!(circumcenter(&[]), Err(CircumcenterError::EmptyPointSet));
        assert!(matches!(
            circumcenter(&[&[0.0, 0.0], &[1.0, 0.0]]),
            Err(CircumcenterError::InvalidSimplex {
                actual: 2,
                expected: 3,
                dimension: 2
            })
        ));
        assert!(matches!(
            circumcenter(&[&[0.0, 0.0], &[1.0, 1.0], &[2.0, 2.0]]),
            Err(CircumcenterError::MatrixInversionFailed { .. })
        ));
    }
}
