//! Geometric utility functions for runtime-dimension coordinate slices.
//!
//! These helpers work on plain `&[f64]` rows and are shared by the hull builder and the
//! derived facet queries.
//!
//! # Organization
//!
//! - [`norms`]: dot products, norms, centroids
//! - [`measures`]: simplex volumes via Gram determinants
//! - [`circumsphere`]: circumcenters and circumradii

#![forbid(unsafe_code)]

use crate::geometry::matrix::MatrixError;
use thiserror::Error;

pub mod circumsphere;
pub mod measures;
pub mod norms;

pub use circumsphere::*;
pub use measures::*;
pub use norms::*;

/// Errors raised by circumcenter and circumradius computations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CircumcenterError {
    /// No points were supplied.
    #[error("Empty point set")]
    EmptyPointSet,
    /// The points cannot form a full-dimensional simplex.
    #[error(
        "Points do not form a valid simplex: expected {expected} points in dimension {dimension}, got {actual}"
    )]
    InvalidSimplex {
        /// Number of points supplied.
        actual: usize,
        /// Number required (`dimension + 1`).
        expected: usize,
        /// Ambient dimension.
        dimension: usize,
    },
    /// The linear system for the center was singular.
    #[error("Matrix inversion failed: {details}")]
    MatrixInversionFailed {
        /// Underlying failure.
        details: String,
    },
}

impl From<MatrixError> for CircumcenterError {
    fn from(err: MatrixError) -> Self {
        Self::MatrixInversionFailed {
            details: err.to_string(),
        }
    }
}

/// Errors raised by volume and area computations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MeasureError {
    /// Too few points, or points of mixed dimension.
    #[error("Cannot measure a simplex from {count} points in dimension {dimension}")]
    InvalidSimplex {
        /// Number of points supplied.
        count: usize,
        /// Ambient dimension of the first point.
        dimension: usize,
    },
    /// The factorial normalizer could not be represented.
    #[error("Failed to convert {value} to f64 while normalizing a volume")]
    ConversionFailed {
        /// The value that did not convert.
        value: usize,
    },
    /// Gram determinant computation failed.
    #[error("Gram determinant failed: {0}")]
    Matrix(#[from] MatrixError),
}
