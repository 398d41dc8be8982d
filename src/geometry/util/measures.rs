//! Volumes of simplices embedded in any ambient dimension.

#![forbid(unsafe_code)]

use super::MeasureError;
use crate::geometry::matrix::{Matrix, gram_determinant};
use num_traits::cast;

/// `k`-dimensional volume of the simplex spanned by `k + 1` points.
///
/// The points may live in any ambient dimension `d >= k`, which is what facet areas need:
/// a facet of a `d`-dimensional hull is a `(d-1)`-simplex embedded in `d` dimensions.
///
/// # Mathematical Background
///
/// With edge vectors `eᵢ = pᵢ - p₀` stacked as rows of `E`,
///
/// **Volume = √det(E Eᵀ) / k!**
///
/// A negative Gram determinant from round-off is clamped to zero.
///
/// # Errors
///
/// Returns [`MeasureError::InvalidSimplex`] for fewer than two points, more points than
/// the ambient dimension allows, or points of mixed dimension.
///
/// # Examples
///
/// ```
/// use qhull_rs::geometry::util::simplex_volume;
/// use approx::assert_relative_eq;
///
/// // Unit right triangle embedded in 3D.
/// let area = simplex_volume(&[&[0.0, 0.0, 5.0], &[1.0, 0.0, 5.0], &[0.0, 1.0, 5.0]]).unwrap();
/// assert_relative_eq!(area, 0.5);
///
/// // Segment length.
/// assert_relative_eq!(simplex_volume(&[&[0.0, 0.0], &[3.0, 4.0]]).unwrap(), 5.0);
/// ```
pub fn simplex_volume(points: &[&[f64]]) -> Result<f64, MeasureError> {
    let dimension = points.first().map_or(0, |p| p.len());
    let k = points.len().saturating_sub(1);
    if k == 0 || k > dimension || points.iter().any(|p| p.len() != dimension) {
        return Err(MeasureError::InvalidSimplex {
            count: points.len(),
            dimension,
        });
    }
    let origin = points[0];
    let edges = Matrix::from_fn(k, dimension, |r, c| points[r + 1][c] - origin[c]);
    let gram = gram_determinant(&edges)?.max(0.0);
    Ok(gram.sqrt() / factorial(k)?)
}

fn factorial(n: usize) -> Result<f64, MeasureError> {
    (2..=n).try_fold(1.0_f64, |acc, i| {
        cast::<usize, f64>(i)
            .map(|value| acc * value)
            .ok_or(MeasureError::ConversionFailed { value: i })
    })
}
