use super::{FastBuildHasher, FastHashMap, FastHashSet};

// =============================================================================
// UTILITY FUNCTIONS
// =============================================================================

/// Creates a [`FastHashMap`] with pre-allocated capacity.
///
/// # Examples
///
/// ```rust
/// use qhull_rs::core::collections::fast_hash_map_with_capacity;
///
/// let map = fast_hash_map_with_capacity::<u64, usize>(1000);
/// assert!(map.capacity() >= 1000);
/// ```
#[inline]
#[must_use]
pub fn fast_hash_map_with_capacity<K, V>(capacity: usize) -> FastHashMap<K, V> {
    FastHashMap::with_capacity_and_hasher(capacity, FastBuildHasher::default())
}

/// Creates a [`FastHashSet`] with pre-allocated capacity.
///
/// # Examples
///
/// ```rust
/// use qhull_rs::core::collections::fast_hash_set_with_capacity;
/// use qhull_rs::core::hull_data_structure::FacetKey;
///
/// let set = fast_hash_set_with_capacity::<FacetKey>(500);
/// assert!(set.capacity() >= 500);
/// ```
#[inline]
#[must_use]
pub fn fast_hash_set_with_capacity<T>(capacity: usize) -> FastHashSet<T> {
    FastHashSet::with_capacity_and_hasher(capacity, FastBuildHasher::default())
}
