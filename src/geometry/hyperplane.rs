//! Oriented hyperplanes `n · x + offset = 0` with unit normal `n`.
//!
//! Signed distance is positive on the side the normal points to. Facet hyperplanes are
//! oriented so that the hull interior lies on the negative side.

#![forbid(unsafe_code)]

use crate::geometry::matrix::{
    MatrixError, cofactor_normal, matrix_from_rows, smallest_singular_vector,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while constructing or evaluating a hyperplane.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HyperplaneError {
    /// The normal has zero (or non-finite) length, so no orientation exists.
    #[error("Degenerate normal in dimension {dimension}: {details}")]
    DegenerateNormal {
        /// Ambient dimension.
        dimension: usize,
        /// What made the normal unusable.
        details: String,
    },
    /// Wrong number of defining points.
    #[error("A hyperplane in dimension {dimension} needs {expected} points, got {actual}")]
    WrongPointCount {
        /// Ambient dimension.
        dimension: usize,
        /// Required number of points.
        expected: usize,
        /// Supplied number of points.
        actual: usize,
    },
    /// A point or normal has the wrong number of coordinates.
    #[error("Dimension mismatch: expected {expected} coordinates, found {actual}")]
    DimensionMismatch {
        /// Hyperplane dimension.
        expected: usize,
        /// Dimension of the offending input.
        actual: usize,
    },
    /// Underlying linear algebra failed.
    #[error("Linear algebra failure: {0}")]
    Matrix(#[from] MatrixError),
}

/// Oriented hyperplane with unit normal.
///
/// # Examples
///
/// ```rust
/// use qhull_rs::geometry::hyperplane::Hyperplane;
///
/// // The line y = 1, normal pointing up.
/// let plane = Hyperplane::new(vec![0.0, 2.0], -2.0).unwrap();
/// assert_eq!(plane.normal(), &[0.0, 1.0]);
/// assert_eq!(plane.offset(), -1.0);
/// assert_eq!(plane.distance(&[5.0, 3.0]), 2.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hyperplane {
    normal: Vec<f64>,
    offset: f64,
}

impl Hyperplane {
    /// Builds a hyperplane from any non-zero normal; both normal and offset are divided by
    /// the normal's length.
    ///
    /// # Errors
    ///
    /// Returns [`HyperplaneError::DegenerateNormal`] for an empty, zero-length, or
    /// non-finite normal.
    pub fn new(normal: Vec<f64>, offset: f64) -> Result<Self, HyperplaneError> {
        let dimension = normal.len();
        let length = normal.iter().map(|x| x * x).sum::<f64>().sqrt();
        if dimension == 0 || !length.is_finite() || length <= f64::MIN_POSITIVE || !offset.is_finite()
        {
            return Err(HyperplaneError::DegenerateNormal {
                dimension,
                details: format!("normal length {length}, offset {offset}"),
            });
        }
        Ok(Self {
            normal: normal.into_iter().map(|x| x / length).collect(),
            offset: offset / length,
        })
    }

    /// Hyperplane through exactly `d` affinely independent points in `d` dimensions.
    ///
    /// The normal is the generalized cross product of the edges from the first point, so its
    /// orientation follows the point order. Use [`Hyperplane::orient_away_from`] to fix it.
    ///
    /// # Errors
    ///
    /// Returns [`HyperplaneError::WrongPointCount`] or
    /// [`HyperplaneError::DimensionMismatch`] for malformed input, and
    /// [`HyperplaneError::DegenerateNormal`] when the points are affinely dependent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use qhull_rs::geometry::hyperplane::Hyperplane;
    ///
    /// let a = [0.0, 0.0, 1.0];
    /// let b = [1.0, 0.0, 1.0];
    /// let c = [0.0, 1.0, 1.0];
    /// let plane = Hyperplane::through_points(&[&a, &b, &c]).unwrap();
    /// assert!(plane.distance(&[0.3, 0.3, 1.0]).abs() < 1e-12);
    /// assert!((plane.distance(&[0.0, 0.0, 0.0]).abs() - 1.0).abs() < 1e-12);
    /// ```
    pub fn through_points(points: &[&[f64]]) -> Result<Self, HyperplaneError> {
        let dimension = points.first().map_or(0, |p| p.len());
        check_points(points, dimension, dimension)?;
        let origin = points[0];
        let edges: Vec<Vec<f64>> = points[1..]
            .iter()
            .map(|p| p.iter().zip(origin).map(|(x, o)| x - o).collect())
            .collect();
        let edge_rows: Vec<&[f64]> = edges.iter().map(Vec::as_slice).collect();
        let normal = cofactor_normal(&matrix_from_rows(&edge_rows))?;
        let offset = -normal.iter().zip(origin).map(|(n, x)| n * x).sum::<f64>();
        Self::new(normal.iter().copied().collect(), offset)
            .map(|plane| plane.recentered(points))
    }

    /// Least-squares hyperplane through `d` or more points.
    ///
    /// The normal is the right-singular vector of the centered coordinates with the smallest
    /// singular value, and the plane passes through the centroid.
    ///
    /// # Errors
    ///
    /// Same as [`Hyperplane::through_points`], except that more than `d` points are accepted.
    pub fn fit_points(points: &[&[f64]]) -> Result<Self, HyperplaneError> {
        let dimension = points.first().map_or(0, |p| p.len());
        check_points(points, dimension, usize::MAX)?;
        if points.len() == dimension {
            return Self::through_points(points);
        }
        let centroid = centroid_of(points, dimension);
        let centered: Vec<Vec<f64>> = points
            .iter()
            .map(|p| p.iter().zip(&centroid).map(|(x, c)| x - c).collect())
            .collect();
        let rows: Vec<&[f64]> = centered.iter().map(Vec::as_slice).collect();
        let (normal, _) = smallest_singular_vector(&matrix_from_rows(&rows))?;
        let offset = -normal.iter().zip(&centroid).map(|(n, c)| n * c).sum::<f64>();
        Self::new(normal.iter().copied().collect(), offset)
    }

    /// Ambient dimension.
    #[inline]
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.normal.len()
    }

    /// Unit normal.
    #[inline]
    #[must_use]
    pub fn normal(&self) -> &[f64] {
        &self.normal
    }

    /// Offset: the signed distance of the origin.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    /// Signed distance of a point. Extra or missing coordinates are ignored, so callers that
    /// cannot guarantee the dimension should use [`Hyperplane::checked_distance`].
    #[inline]
    #[must_use]
    pub fn distance(&self, point: &[f64]) -> f64 {
        self.normal
            .iter()
            .zip(point)
            .fold(self.offset, |acc, (n, x)| n.mul_add(*x, acc))
    }

    /// Signed distance with a dimension check.
    ///
    /// # Errors
    ///
    /// Returns [`HyperplaneError::DimensionMismatch`] if `point` has the wrong length.
    pub fn checked_distance(&self, point: &[f64]) -> Result<f64, HyperplaneError> {
        if point.len() != self.dimension() {
            return Err(HyperplaneError::DimensionMismatch {
                expected: self.dimension(),
                actual: point.len(),
            });
        }
        Ok(self.distance(point))
    }

    /// Same plane with the opposite orientation.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            normal: self.normal.iter().map(|n| -n).collect(),
            offset: -self.offset,
        }
    }

    /// Flips the plane if needed so that `interior` lies strictly on the negative side.
    /// Returns `true` when a flip happened.
    pub fn orient_away_from(&mut self, interior: &[f64]) -> bool {
        if self.distance(interior) > 0.0 {
            *self = self.flipped();
            true
        } else {
            false
        }
    }

    /// Parallel plane moved by `shift` along the normal (outward for positive values).
    #[must_use]
    pub fn shifted(&self, shift: f64) -> Self {
        Self {
            normal: self.normal.clone(),
            offset: self.offset - shift,
        }
    }

    /// Cosine of the angle between the two normals.
    #[must_use]
    pub fn cos_angle(&self, other: &Self) -> f64 {
        self.normal
            .iter()
            .zip(&other.normal)
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Orthogonal projection of a point onto the plane.
    #[must_use]
    pub fn project(&self, point: &[f64]) -> Vec<f64> {
        let distance = self.distance(point);
        point
            .iter()
            .zip(&self.normal)
            .map(|(x, n)| x - distance * n)
            .collect()
    }

    /// Moves the offset so the plane passes through the centroid of its defining points,
    /// which averages out the rounding of the first point.
    fn recentered(mut self, points: &[&[f64]]) -> Self {
        let centroid = centroid_of(points, self.dimension());
        self.offset = -self
            .normal
            .iter()
            .zip(&centroid)
            .map(|(n, c)| n * c)
            .sum::<f64>();
        self
    }
}

fn check_points(points: &[&[f64]], dimension: usize, max: usize) -> Result<(), HyperplaneError> {
    if dimension == 0 || points.len() < dimension || points.len() > max {
        return Err(HyperplaneError::WrongPointCount {
            dimension,
            expected: dimension,
            actual: points.len(),
        });
    }
    if let Some(bad) = points.iter().find(|p| p.len() != dimension) {
        return Err(HyperplaneError::DimensionMismatch {
            expected: dimension,
            actual: bad.len(),
        });
    }
    Ok(())
}

fn centroid_of(points: &[&[f64]], dimension: usize) -> Vec<f64> {
    let mut centroid = vec![0.0; dimension];
    for point in points {
        for (c, x) in centroid.iter_mut().zip(point.iter()) {
            *c += x;
        }
    }
    let count = points.len() as f64;
    centroid.iter_mut().for_each(|c| *c /= count);
    centroid
}
