//! Vector norms, dot products, and centroids.

/// Dot product of two equal-length slices.
///
/// # Examples
///
/// ```
/// use qhull_rs::geometry::util::dot;
///
/// assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
/// ```
#[inline]
#[must_use]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Sum of squared coordinates.
///
/// # Examples
///
/// ```
/// use qhull_rs::geometry::util::squared_norm;
///
/// assert_eq!(squared_norm(&[3.0, 4.0]), 25.0);
/// assert_eq!(squared_norm(&[1.0, 2.0, 2.0]), 9.0);
/// ```
#[inline]
#[must_use]
pub fn squared_norm(coords: &[f64]) -> f64 {
    coords.iter().fold(0.0, |acc, &x| x.mul_add(x, acc))
}

/// Euclidean norm, scaled by the largest magnitude to avoid overflow and underflow.
///
/// # Examples
///
/// ```
/// use qhull_rs::geometry::util::hypot;
///
/// assert_eq!(hypot(&[3.0, 4.0]), 5.0);
/// assert_eq!(hypot(&[1.0, 2.0, 2.0]), 3.0);
/// assert_eq!(hypot(&[1.0, 1.0, 1.0, 1.0]), 2.0);
/// ```
#[must_use]
pub fn hypot(coords: &[f64]) -> f64 {
    match coords {
        [] => 0.0,
        [x] => x.abs(),
        [x, y] => x.hypot(*y),
        _ => {
            let max_abs = coords.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
            if max_abs == 0.0 {
                return 0.0;
            }
            let scaled = coords.iter().fold(0.0, |acc, &x| {
                let s = x / max_abs;
                s.mul_add(s, acc)
            });
            max_abs * scaled.sqrt()
        }
    }
}

/// Componentwise difference `a - b`.
#[inline]
#[must_use]
pub fn difference(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x - y).collect()
}

/// Arithmetic mean of a set of equal-dimension points. Returns `None` for an empty set.
///
/// # Examples
///
/// ```
/// use qhull_rs::geometry::util::centroid;
///
/// let c = centroid(&[&[0.0, 0.0], &[2.0, 0.0], &[1.0, 3.0]]).unwrap();
/// assert_eq!(c, vec![1.0, 1.0]);
/// ```
#[must_use]
pub fn centroid(points: &[&[f64]]) -> Option<Vec<f64>> {
    let first = points.first()?;
    let mut sum = vec![0.0; first.len()];
    for point in points {
        for (s, x) in sum.iter_mut().zip(point.iter()) {
            *s += x;
        }
    }
    let count = points.len() as f64;
    Some(sum.into_iter().map(|s| s / count).collect())
}
