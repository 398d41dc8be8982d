use super::{FastHashMap, FastHashSet, MAX_PRACTICAL_DIMENSION_SIZE, SmallBuffer};
use crate::core::hull_data_structure::{FacetKey, RidgeKey, VertexKey};
use crate::geometry::point::PointId;

// =============================================================================
// KEY-BASED SETS
// =============================================================================

/// Set of facet keys, used for visibility marking and merge work lists.
pub type FacetKeySet = FastHashSet<FacetKey>;

/// Set of ridge keys.
pub type RidgeKeySet = FastHashSet<RidgeKey>;

/// Set of vertex keys.
pub type VertexKeySet = FastHashSet<VertexKey>;

/// Set of input point ids.
pub type PointIdSet = FastHashSet<PointId>;

// =============================================================================
// INLINE KEY BUFFERS
// =============================================================================

/// Vertex keys of one facet or ridge.
///
/// A simplicial facet holds exactly `d` vertices and a ridge `d - 1`, so these stay inline
/// for every practical dimension. Merged facets may spill to the heap.
pub type VertexKeyBuffer = SmallBuffer<VertexKey, MAX_PRACTICAL_DIMENSION_SIZE>;

/// Ridge keys of one facet.
pub type RidgeKeyBuffer = SmallBuffer<RidgeKey, MAX_PRACTICAL_DIMENSION_SIZE>;

/// Facet keys, used for neighbor sets and vertex incidence lists.
pub type FacetKeyBuffer = SmallBuffer<FacetKey, MAX_PRACTICAL_DIMENSION_SIZE>;

// =============================================================================
// KEY-BASED MAPS
// =============================================================================

/// Maps an input point to the vertex created for it.
pub type PointToVertexMap = FastHashMap<PointId, VertexKey>;

/// Maps a sorted vertex subset to the facets that contain it.
///
/// Used to pair up new facets across their shared ridges when a cone of facets is attached
/// to the horizon, and when a merged facet is split back into simplices. Exactly two entries
/// per key is the consistent outcome.
pub type SubsetFacetMap = FastHashMap<VertexKeyBuffer, SmallBuffer<FacetKey, 2>>;

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_sorted_vertex_subsets_hash_equal() {
        let mut arena: SlotMap<VertexKey, ()> = SlotMap::with_key();
        let a = arena.insert(());
        let b = arena.insert(());
        let c = arena.insert(());

        let mut first: VertexKeyBuffer = [c, a, b].into_iter().collect();
        let mut second: VertexKeyBuffer = [b, c, a].into_iter().collect();
        first.sort_unstable();
        second.sort_unstable();

        let mut map: SubsetFacetMap = SubsetFacetMap::default();
        map.entry(first).or_default();
        assert!(map.contains_key(&second));
    }
}
