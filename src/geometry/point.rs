//! Point storage and point identity.
//!
//! A [`PointStore`] owns every coordinate the hull ever looks at: the caller's input points,
//! stored contiguously in row-major order, plus a short list of *other points* appended by
//! the library (for example the synthetic point above the paraboloid in Voronoi mode). The
//! rest of the crate refers to points only through [`PointId`].
//!
//! Identity of a borrowed coordinate slice is resolved the way the data is laid out: a slice
//! that lives inside the contiguous input buffer has its index computed from its address
//! offset, while slices belonging to other points are found by a linear scan of that list.
//! Anything else has no identity.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::mem::size_of;
use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised while building a [`PointStore`] or comparing points.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PointStoreError {
    /// The requested dimension cannot hold a hull.
    #[error("Invalid point dimension {dimension}: hulls need at least 2 coordinates per point")]
    InvalidDimension {
        /// The rejected dimension.
        dimension: usize,
    },
    /// The coordinate buffer length is not a multiple of the dimension.
    #[error(
        "Coordinate buffer of length {length} cannot be split into points of dimension {dimension}"
    )]
    RaggedCoordinates {
        /// Length of the flat buffer.
        length: usize,
        /// Requested dimension.
        dimension: usize,
    },
    /// A point or row does not have the store's dimension.
    #[error("Dimension mismatch: expected {expected} coordinates, found {actual}")]
    DimensionMismatch {
        /// Store dimension.
        expected: usize,
        /// Dimension of the offending point.
        actual: usize,
    },
    /// A coordinate is NaN or infinite.
    #[error(
        "Non-finite coordinate {coordinate_value} at point {point_index}, coordinate {coordinate_index}"
    )]
    NonFiniteCoordinate {
        /// Index of the point within its input.
        point_index: usize,
        /// Index of the coordinate within the point.
        coordinate_index: usize,
        /// The coordinate, rendered as text.
        coordinate_value: String,
    },
}

// =============================================================================
// POINT IDENTITY
// =============================================================================

/// Stable identity of a point in a [`PointStore`].
///
/// Input points are numbered `0..len()` in input order; other points continue after them.
///
/// # Examples
///
/// ```rust
/// use qhull_rs::geometry::point::PointId;
///
/// let id = PointId::new(3);
/// assert_eq!(id.index(), 3);
/// assert_eq!(id.to_string(), "p3");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointId(usize);

impl PointId {
    /// Wraps a raw index.
    #[inline]
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Raw index of the point.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

// =============================================================================
// POINT STORE
// =============================================================================

/// Owner of all point coordinates used by a hull.
///
/// # Examples
///
/// ```rust
/// use qhull_rs::geometry::point::PointStore;
///
/// let store = PointStore::from_points(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]).unwrap();
/// assert_eq!(store.dimension(), 2);
/// assert_eq!(store.len(), 3);
///
/// let second = store.point(1).unwrap();
/// assert_eq!(second.coords(), &[1.0, 0.0]);
/// assert_eq!(store.id_of(second.coords()).map(|id| id.index()), Some(1));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointStore {
    dimension: usize,
    coords: Vec<f64>,
    other_points: Vec<Vec<f64>>,
}

impl PointStore {
    /// Builds a store from a flat, row-major coordinate buffer.
    ///
    /// # Errors
    ///
    /// Returns [`PointStoreError::InvalidDimension`] for dimensions below 2,
    /// [`PointStoreError::RaggedCoordinates`] when the buffer length is not a multiple of
    /// `dimension`, and [`PointStoreError::NonFiniteCoordinate`] for NaN or infinite values.
    pub fn new(dimension: usize, coords: Vec<f64>) -> Result<Self, PointStoreError> {
        if dimension < 2 {
            return Err(PointStoreError::InvalidDimension { dimension });
        }
        if coords.len() % dimension != 0 {
            return Err(PointStoreError::RaggedCoordinates {
                length: coords.len(),
                dimension,
            });
        }
        for (flat_index, value) in coords.iter().enumerate() {
            if !value.is_finite() {
                return Err(PointStoreError::NonFiniteCoordinate {
                    point_index: flat_index / dimension,
                    coordinate_index: flat_index % dimension,
                    coordinate_value: value.to_string(),
                });
            }
        }
        Ok(Self {
            dimension,
            coords,
            other_points: Vec::new(),
        })
    }

    /// Builds a store from rows of equal length. The dimension is taken from the first row.
    ///
    /// # Errors
    ///
    /// Same as [`PointStore::new`], plus [`PointStoreError::DimensionMismatch`] when a row
    /// differs in length from the first one. An empty slice yields
    /// [`PointStoreError::InvalidDimension`] with dimension 0.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, PointStoreError> {
        let dimension = rows.first().map_or(0, |row| row.as_ref().len());
        let mut coords = Vec::with_capacity(rows.len() * dimension);
        for row in rows {
            let row = row.as_ref();
            if row.len() != dimension {
                return Err(PointStoreError::DimensionMismatch {
                    expected: dimension,
                    actual: row.len(),
                });
            }
            coords.extend_from_slice(row);
        }
        Self::new(dimension, coords)
    }

    /// Builds a store from fixed-size coordinate arrays.
    ///
    /// # Errors
    ///
    /// Same as [`PointStore::new`].
    pub fn from_points<const D: usize>(points: &[[f64; D]]) -> Result<Self, PointStoreError> {
        Self::new(D, points.iter().flatten().copied().collect())
    }

    /// Appends a point owned outside the contiguous input buffer and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`PointStoreError::DimensionMismatch`] or
    /// [`PointStoreError::NonFiniteCoordinate`] for malformed coordinates.
    pub fn add_other_point(&mut self, coords: Vec<f64>) -> Result<PointId, PointStoreError> {
        if coords.len() != self.dimension {
            return Err(PointStoreError::DimensionMismatch {
                expected: self.dimension,
                actual: coords.len(),
            });
        }
        let id = PointId(self.len() + self.other_points.len());
        if let Some((coordinate_index, value)) =
            coords.iter().enumerate().find(|(_, value)| !value.is_finite())
        {
            return Err(PointStoreError::NonFiniteCoordinate {
                point_index: id.0,
                coordinate_index,
                coordinate_value: value.to_string(),
            });
        }
        self.other_points.push(coords);
        Ok(id)
    }

    /// Number of coordinates per point.
    #[inline]
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of input points (other points excluded).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.coords.len() / self.dimension
    }

    /// Returns `true` if the store holds no input points.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Number of points appended through [`PointStore::add_other_point`].
    #[inline]
    #[must_use]
    pub fn other_len(&self) -> usize {
        self.other_points.len()
    }

    /// Input points plus other points.
    #[inline]
    #[must_use]
    pub fn total_len(&self) -> usize {
        self.len() + self.other_points.len()
    }

    /// Returns `true` if `id` names an appended point rather than an input point.
    #[inline]
    #[must_use]
    pub fn is_other_point(&self, id: PointId) -> bool {
        id.0 >= self.len() && id.0 < self.total_len()
    }

    /// Coordinates of a point, or `None` for an unknown id.
    #[must_use]
    pub fn coords(&self, id: PointId) -> Option<&[f64]> {
        let primary = self.len();
        if id.0 < primary {
            let start = id.0 * self.dimension;
            self.coords.get(start..start + self.dimension)
        } else {
            self.other_points.get(id.0 - primary).map(Vec::as_slice)
        }
    }

    /// Borrowed view of a point by raw index.
    #[must_use]
    pub fn point(&self, index: usize) -> Option<PointRef<'_>> {
        self.get(PointId(index))
    }

    /// Borrowed view of a point by id.
    #[must_use]
    pub fn get(&self, id: PointId) -> Option<PointRef<'_>> {
        self.coords(id).map(|coords| PointRef {
            id: Some(id),
            coords,
        })
    }

    /// Iterates over the input points in input order.
    pub fn iter(&self) -> impl Iterator<Item = PointRef<'_>> + '_ {
        self.coords
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(index, coords)| PointRef {
                id: Some(PointId(index)),
                coords,
            })
    }

    /// Ids of every point, input points first, then other points.
    pub fn ids(&self) -> impl Iterator<Item = PointId> + use<> {
        (0..self.total_len()).map(PointId)
    }

    /// Resolves the identity of a borrowed coordinate slice.
    ///
    /// Slices that point into the input buffer are identified by address offset. Slices of
    /// other points are found by scanning that list. Copies of coordinates, even equal ones,
    /// have no identity and yield `None`.
    #[must_use]
    pub fn id_of(&self, coords: &[f64]) -> Option<PointId> {
        if coords.len() != self.dimension {
            return None;
        }
        let address = coords.as_ptr() as usize;
        let range = self.coords.as_ptr_range();
        let (start, end) = (range.start as usize, range.end as usize);
        if (start..end).contains(&address) {
            let offset = (address - start) / size_of::<f64>();
            return (offset % self.dimension == 0).then_some(PointId(offset / self.dimension));
        }
        self.other_points
            .iter()
            .position(|other| other.as_ptr() as usize == address)
            .map(|index| PointId(self.len() + index))
    }

    /// Largest absolute coordinate over all points.
    #[must_use]
    pub fn max_abs_coordinate(&self) -> f64 {
        self.all_coords()
            .flat_map(|coords| coords.iter())
            .fold(0.0_f64, |acc, value| acc.max(value.abs()))
    }

    /// Largest sum of absolute coordinates of a single point.
    #[must_use]
    pub fn max_abs_sum(&self) -> f64 {
        self.all_coords()
            .map(|coords| coords.iter().map(|value| value.abs()).sum::<f64>())
            .fold(0.0_f64, f64::max)
    }

    /// Per-axis bounding box `(min, max)` over all points.
    #[must_use]
    pub fn bounds(&self) -> (Vec<f64>, Vec<f64>) {
        let mut min = vec![f64::INFINITY; self.dimension];
        let mut max = vec![f64::NEG_INFINITY; self.dimension];
        for coords in self.all_coords() {
            for (axis, &value) in coords.iter().enumerate() {
                min[axis] = min[axis].min(value);
                max[axis] = max[axis].max(value);
            }
        }
        (min, max)
    }

    fn all_coords(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.coords
            .chunks_exact(self.dimension)
            .chain(self.other_points.iter().map(Vec::as_slice))
    }
}

// =============================================================================
// POINT VIEW
// =============================================================================

/// Borrowed coordinates with an optional identity.
///
/// Views obtained from a [`PointStore`] carry their id; views built with
/// [`PointRef::new`] over arbitrary memory carry none.
#[derive(Clone, Copy, Debug)]
pub struct PointRef<'a> {
    id: Option<PointId>,
    coords: &'a [f64],
}

impl<'a> PointRef<'a> {
    /// Wraps a coordinate slice without identity.
    #[inline]
    #[must_use]
    pub const fn new(coords: &'a [f64]) -> Self {
        Self { id: None, coords }
    }

    /// Identity of the point, if it came from a store.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> Option<PointId> {
        self.id
    }

    /// Coordinates of the point.
    #[inline]
    #[must_use]
    pub const fn coords(&self) -> &'a [f64] {
        self.coords
    }

    /// Number of coordinates.
    #[inline]
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.coords.len()
    }

    /// Euclidean distance to another point.
    ///
    /// # Errors
    ///
    /// Returns [`PointStoreError::DimensionMismatch`] if the dimensions differ.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use qhull_rs::geometry::point::PointRef;
    ///
    /// let a = PointRef::new(&[0.0, 0.0, 0.0]);
    /// let b = PointRef::new(&[1.0, 2.0, 2.0]);
    /// assert_eq!(a.distance(&b).unwrap(), 3.0);
    /// ```
    pub fn distance(&self, other: &PointRef<'_>) -> Result<f64, PointStoreError> {
        if self.dimension() != other.dimension() {
            return Err(PointStoreError::DimensionMismatch {
                expected: self.dimension(),
                actual: other.dimension(),
            });
        }
        Ok(squared_distance(self.coords, other.coords).sqrt())
    }

    /// Equality under an explicit epsilon: the squared distance is compared with
    /// `epsilon²`. Points of different dimension are never equal.
    #[must_use]
    pub fn approx_eq(&self, other: &PointRef<'_>, epsilon: f64) -> bool {
        if self.dimension() != other.dimension() {
            return false;
        }
        if std::ptr::eq(self.coords, other.coords) {
            return true;
        }
        squared_distance(self.coords, other.coords) <= epsilon * epsilon
    }
}

impl fmt::Display for PointRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(id) = self.id {
            write!(f, "{id}:")?;
        }
        for value in self.coords {
            write!(f, " {value}")?;
        }
        Ok(())
    }
}

/// Squared Euclidean distance. Unrolled for the common low dimensions.
#[inline]
#[must_use]
pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    let diff = |i: usize| a[i] - b[i];
    match (a.len(), b.len()) {
        (2, 2) => diff(0).mul_add(diff(0), diff(1) * diff(1)),
        (3, 3) => diff(0).mul_add(diff(0), diff(1).mul_add(diff(1), diff(2) * diff(2))),
        _ => a
            .iter()
            .zip(b)
            .map(|(x, y)| (x - y) * (x - y))
            .sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> PointStore {
        PointStore::from_points(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]).unwrap()
    }

    #[test]
    fn test_store_rejects_malformed_input() {
        assert_eq!(
            PointStore::new(1, vec![0.0]),
            Err(PointStoreError::InvalidDimension { dimension: 1 })
        );
        assert_eq!(
            PointStore::new(2, vec![0.0, 1.0, 2.0]),
            Err(PointStoreError::RaggedCoordinates {
                length: 3,
                dimension: 2
            })
        );
        assert!(matches!(
            PointStore::new(2, vec![0.0, f64::NAN]),
            Err(PointStoreError::NonFiniteCoordinate {
                point_index: 0,
                coordinate_index: 1,
                ..
            })
        ));
        assert_eq!(
            PointStore::from_rows(&[vec![0.0, 0.0], vec![1.0]]),
            Err(PointStoreError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_id_of_uses_offset_for_input_points() {
        let store = unit_square();
        for index in 0..store.len() {
            let coords = store.coords(PointId::new(index)).unwrap();
            assert_eq!(store.id_of(coords), Some(PointId::new(index)));
        }
    }

    #[test]
    fn test_id_of_scans_other_points() {
        let mut store = unit_square();
        let id = store.add_other_point(vec![0.5, 9.0]).unwrap();
        assert_eq!(id, PointId::new(4));
        assert!(store.is_other_point(id));
        assert_eq!(store.total_len(), 5);

        let coords = store.coords(id).unwrap();
        assert_eq!(store.id_of(coords), Some(id));
    }

    #[test]
    fn test_id_of_unrelated_memory_is_none() {
        let store = unit_square();
        let copy = [1.0, 0.0];
        assert_eq!(store.id_of(&copy), None);

        // A slice straddling two points is not a point.
        assert_eq!(store.id_of(&store.coords[1..3]), None);
    }

    #[test]
    fn test_point_distance_and_equality() {
        let a = PointRef::new(&[0.0, 0.0]);
        let b = PointRef::new(&[3.0, 4.0]);
        assert_relative_eq!(a.distance(&b).unwrap(), 5.0);
        assert!(a.approx_eq(&PointRef::new(&[1e-9, 0.0]), 1e-8));
        assert!(!a.approx_eq(&b, 1.0));

        let c = PointRef::new(&[0.0, 0.0, 0.0]);
        assert!(!a.approx_eq(&c, 1.0));
        assert_eq!(
            a.distance(&c),
            Err(PointStoreError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_squared_distance_general_dimension() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [0.0, 0.0, 0.0, 0.0, 0.0];
        assert_relative_eq!(squared_distance(&a, &b), 55.0);
    }

    #[test]
    fn test_store_bounds_and_magnitudes() {
        let store = PointStore::from_points(&[[-2.0, 1.0], [3.0, -1.0]]).unwrap();
        assert_relative_eq!(store.max_abs_coordinate(), 3.0);
        assert_relative_eq!(store.max_abs_sum(), 4.0);
        assert_eq!(store.bounds(), (vec![-2.0, -1.0], vec![3.0, 1.0]));
    }
}
