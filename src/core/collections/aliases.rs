use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use smallvec::SmallVec;

#[cfg(not(feature = "dense-slotmap"))]
use slotmap::SlotMap;

#[cfg(feature = "dense-slotmap")]
use slotmap::DenseSlotMap;

// =============================================================================
// STORAGE BACKEND
// =============================================================================

/// Arena backend for facets, ridges, and vertices.
///
/// `DenseSlotMap` is the default (via the `dense-slotmap` feature); building with
/// `--no-default-features` switches to `SlotMap`. Public APIs never expose this type
/// directly: callers see keys, views, and iterators.
///
/// Keys stay valid until their entry is removed, and a removed key never aliases a later
/// insertion because slotmap versions every slot.
#[cfg(not(feature = "dense-slotmap"))]
pub type StorageMap<K, V> = SlotMap<K, V>;

#[cfg(feature = "dense-slotmap")]
pub type StorageMap<K, V> = DenseSlotMap<K, V>;

// =============================================================================
// CORE OPTIMIZED TYPES
// =============================================================================

/// `HashMap` keyed by internal identifiers, hashed with `FxHasher`.
///
/// `FxHasher` has no random state, so iteration order depends only on the sequence of
/// insertions. Hull construction relies on that for run-to-run determinism.
///
/// # Security Warning
///
/// Not DoS-resistant. Only use it with keys produced by this crate.
///
/// # Examples
///
/// ```rust
/// use qhull_rs::core::collections::FastHashMap;
///
/// let mut map: FastHashMap<u64, usize> = FastHashMap::default();
/// map.insert(123, 456);
/// assert_eq!(map.get(&123), Some(&456));
/// ```
pub type FastHashMap<K, V> = FxHashMap<K, V>;

/// Build hasher shared by [`FastHashMap`] and [`FastHashSet`].
pub type FastBuildHasher = FxBuildHasher;

/// `HashSet` counterpart of [`FastHashMap`].
///
/// # Examples
///
/// ```rust
/// use qhull_rs::core::collections::FastHashSet;
///
/// let mut set: FastHashSet<u64> = FastHashSet::default();
/// set.insert(7);
/// assert!(set.contains(&7));
/// ```
pub type FastHashSet<T> = FxHashSet<T>;

/// Inline buffer with heap fallback once it holds more than `N` elements.
///
/// Facet vertex and ridge lists have exactly `d` entries for simplicial facets, so an inline
/// capacity of [`MAX_PRACTICAL_DIMENSION_SIZE`] keeps the common case off the heap.
///
/// # Examples
///
/// ```rust
/// use qhull_rs::core::collections::SmallBuffer;
///
/// let mut buffer: SmallBuffer<i32, 8> = SmallBuffer::new();
/// buffer.extend(0..5);
/// assert!(!buffer.spilled());
/// ```
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;

// =============================================================================
// SEMANTIC SIZE CONSTANTS
// =============================================================================

/// Largest dimension for which per-facet buffers stay inline.
///
/// Hulls are routinely computed in 2D-5D and Voronoi mode adds one to the dimension,
/// so 8 covers the practical range.
pub const MAX_PRACTICAL_DIMENSION_SIZE: usize = 8;
