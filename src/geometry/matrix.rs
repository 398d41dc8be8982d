//! Dense linear algebra over runtime-sized matrices.
//!
//! Hull dimension is only known at run time (and grows by one in Voronoi mode), so every
//! matrix here is an `nalgebra::DMatrix<f64>`. The helpers cover what the hull needs:
//! determinants, cofactor normals, LU solves with a relative singularity check, Gram
//! determinants, and the least-squares normal of a point cloud.

#![forbid(unsafe_code)]

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

/// Runtime-sized matrix used throughout the crate.
pub type Matrix = DMatrix<f64>;

/// Runtime-sized column vector.
pub type Vector = DVector<f64>;

/// Error type for matrix operations.
///
/// # Examples
///
/// ```rust
/// use qhull_rs::geometry::matrix::MatrixError;
///
/// let err = MatrixError::SingularMatrix;
/// assert!(matches!(err, MatrixError::SingularMatrix));
/// ```
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MatrixError {
    /// Matrix is singular (or too close to singular to trust).
    #[error("Matrix is singular!")]
    SingularMatrix,
    /// The operation needs a different shape.
    #[error("Unexpected matrix shape {rows}x{cols}: {expected}")]
    InvalidShape {
        /// Row count.
        rows: usize,
        /// Column count.
        cols: usize,
        /// What the operation expected.
        expected: &'static str,
    },
    /// A result contained NaN or infinity.
    #[error("Matrix computation produced a non-finite value")]
    NonFinite,
}

/// Relative pivot threshold below which an LU factorization is treated as singular.
///
/// The ratio of the smallest to the largest absolute pivot is compared against it, so the
/// check does not depend on the magnitude of the input.
pub const SINGULARITY_TOLERANCE: f64 = 1e-12;

/// Builds a matrix whose rows are the given slices.
///
/// All rows must have the same length; an empty slice gives a 0x0 matrix.
#[must_use]
pub fn matrix_from_rows(rows: &[&[f64]]) -> Matrix {
    let cols = rows.first().map_or(0, |row| row.len());
    Matrix::from_fn(rows.len(), cols, |r, c| rows[r][c])
}

/// Determinant of a square matrix.
///
/// # Errors
///
/// Returns [`MatrixError::InvalidShape`] for non-square input.
///
/// # Examples
///
/// ```rust
/// use qhull_rs::geometry::matrix::{determinant, Matrix};
///
/// let m = Matrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 3.0]);
/// assert_eq!(determinant(&m).unwrap(), 6.0);
/// ```
pub fn determinant(matrix: &Matrix) -> Result<f64, MatrixError> {
    if !matrix.is_square() {
        return Err(MatrixError::InvalidShape {
            rows: matrix.nrows(),
            cols: matrix.ncols(),
            expected: "square matrix",
        });
    }
    if matrix.nrows() == 0 {
        return Ok(1.0);
    }
    Ok(matrix.determinant())
}

/// Generalized cross product of `d - 1` row vectors in `d` dimensions.
///
/// Component `i` is the signed minor obtained by deleting column `i`. The result is
/// orthogonal to every row and its length is the `(d-1)`-volume of the parallelotope the
/// rows span, so it vanishes exactly when the rows are linearly dependent.
///
/// # Errors
///
/// Returns [`MatrixError::InvalidShape`] unless the matrix has one column more than rows.
pub fn cofactor_normal(edges: &Matrix) -> Result<Vector, MatrixError> {
    let (rows, cols) = edges.shape();
    if cols == 0 || rows + 1 != cols {
        return Err(MatrixError::InvalidShape {
            rows,
            cols,
            expected: "(d-1) x d edge matrix",
        });
    }
    let mut normal = Vector::zeros(cols);
    for column in 0..cols {
        let minor = edges.clone().remove_column(column);
        let sign = if column % 2 == 0 { 1.0 } else { -1.0 };
        normal[column] = sign * determinant(&minor)?;
    }
    Ok(normal)
}

/// Solves `a x = b` by LU decomposition.
///
/// # Errors
///
/// Returns [`MatrixError::SingularMatrix`] when the relative pivot magnitude drops below
/// [`SINGULARITY_TOLERANCE`], [`MatrixError::InvalidShape`] for non-square `a` or a
/// mismatched right-hand side, and [`MatrixError::NonFinite`] if the solution overflowed.
pub fn solve(a: &Matrix, b: &Vector) -> Result<Vector, MatrixError> {
    if !a.is_square() || a.nrows() != b.len() {
        return Err(MatrixError::InvalidShape {
            rows: a.nrows(),
            cols: a.ncols(),
            expected: "square system matching the right-hand side",
        });
    }
    let lu = a.clone().lu();
    let pivots = lu.u().diagonal().map(f64::abs);
    let largest = pivots.max();
    if largest == 0.0 || pivots.min() <= SINGULARITY_TOLERANCE * largest {
        return Err(MatrixError::SingularMatrix);
    }
    let x = lu.solve(b).ok_or(MatrixError::SingularMatrix)?;
    if x.iter().all(|value| value.is_finite()) {
        Ok(x)
    } else {
        Err(MatrixError::NonFinite)
    }
}

/// Determinant of the Gram matrix `V Vᵀ` of the rows of `vectors`.
///
/// This is the squared `k`-volume of the parallelotope spanned by `k` row vectors, valid in
/// any ambient dimension.
///
/// # Errors
///
/// Propagates [`determinant`] errors (never for well-formed input).
pub fn gram_determinant(vectors: &Matrix) -> Result<f64, MatrixError> {
    let gram = vectors * vectors.transpose();
    determinant(&gram)
}

/// Unit vector minimizing `‖M n‖` together with the corresponding singular value.
///
/// For a matrix of centered point coordinates this is the normal of the best-fit hyperplane
/// in the least-squares sense. Matrices with fewer rows than columns are padded with zero
/// rows so the full right-singular basis is available.
///
/// # Errors
///
/// Returns [`MatrixError::InvalidShape`] for an empty matrix and [`MatrixError::NonFinite`]
/// if the decomposition did not produce usable vectors.
pub fn smallest_singular_vector(matrix: &Matrix) -> Result<(Vector, f64), MatrixError> {
    let (rows, cols) = matrix.shape();
    if cols == 0 {
        return Err(MatrixError::InvalidShape {
            rows,
            cols,
            expected: "at least one column",
        });
    }
    let padded = if rows < cols {
        matrix.clone().resize_vertically(cols, 0.0)
    } else {
        matrix.clone()
    };
    let svd = padded.svd(false, true);
    let v_t = svd.v_t.ok_or(MatrixError::NonFinite)?;
    let (index, smallest) = svd
        .singular_values
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::INFINITY), |best, (i, value)| {
            if value < best.1 { (i, value) } else { best }
        });
    if !smallest.is_finite() {
        return Err(MatrixError::NonFinite);
    }
    let normal = v_t.row(index).transpose();
    Ok((normal, smallest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_determinant_rejects_non_square() {
        let m = Matrix::zeros(2, 3);
        assert!(matches!(
            determinant(&m),
            Err(MatrixError::InvalidShape { rows: 2, cols: 3, .. })
        ));
        assert_relative_eq!(determinant(&Matrix::zeros(0, 0)).unwrap(), 1.0);
    }

    #[test]
    fn test_cofactor_normal_is_orthogonal_to_rows() {
        let edges = Matrix::from_row_slice(2, 3, &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        let normal = cofactor_normal(&edges).unwrap();
        assert_relative_eq!(normal[0], 0.0);
        assert_relative_eq!(normal[1], 0.0);
        assert_relative_eq!(normal[2].abs(), 1.0);

        let edges_2d = Matrix::from_row_slice(1, 2, &[3.0, 4.0]);
        let normal_2d = cofactor_normal(&edges_2d).unwrap();
        assert_relative_eq!(normal_2d.dot(&Vector::from_vec(vec![3.0, 4.0])), 0.0);
        assert_relative_eq!(normal_2d.norm(), 5.0);
    }

    #[test]
    fn test_cofactor_normal_vanishes_for_dependent_rows() {
        let edges = Matrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 2.0, 4.0, 6.0]);
        let normal = cofactor_normal(&edges).unwrap();
        assert_relative_eq!(normal.norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_solve_detects_singular_systems() {
        let a = Matrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let b = Vector::from_vec(vec![1.0, 2.0]);
        assert_eq!(solve(&a, &b), Err(MatrixError::SingularMatrix));

        let a = Matrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 4.0]);
        let x = solve(&a, &b).unwrap();
        assert_relative_eq!(x[0], 0.5);
        assert_relative_eq!(x[1], 0.5);
    }

    #[test]
    fn test_gram_determinant_measures_area() {
        // Two edges of a unit right triangle lying in 3D.
        let v = Matrix::from_row_slice(2, 3, &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        assert_relative_eq!(gram_determinant(&v).unwrap(), 1.0);
    }

    #[test]
    fn test_smallest_singular_vector_fits_plane() {
        // Points on z = 0, centered.
        let centered = Matrix::from_row_slice(
            4,
            3,
            &[
                -0.5, -0.5, 0.0, 0.5, -0.5, 0.0, 0.5, 0.5, 0.0, -0.5, 0.5, 0.0,
            ],
        );
        let (normal, residual) = smallest_singular_vector(&centered).unwrap();
        assert_relative_eq!(normal[2].abs(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(residual, 0.0, epsilon = 1e-12);
    }
}
