//! # qhull-rs
//!
//! Convex hulls of n-dimensional point sets, built with the Quickhull algorithm, and
//! Delaunay triangulations and Voronoi vertices obtained from them through the paraboloid
//! lift.
//!
//! # Features
//!
//! - d-dimensional convex hulls (d ≥ 2), with the dimension chosen at run time
//! - Facet merging that keeps nearly coplanar input from producing thin or flipped facets
//! - Optional triangulated output: merged facets split back into simplices
//! - Delaunay regions and Voronoi vertices in Voronoi mode
//! - Facet areas, centroids, inner and outer planes, and serializable reports
//! - Serialization of options and reports with [serde](https://serde.rs)
//!
//! # Basic Usage
//!
//! ```rust
//! use qhull_rs::prelude::*;
//!
//! // Unit cube plus an interior point.
//! let mut points = vec![[0.5, 0.5, 0.5]];
//! for x in [0.0, 1.0] {
//!     for y in [0.0, 1.0] {
//!         for z in [0.0, 1.0] {
//!             points.push([x, y, z]);
//!         }
//!     }
//! }
//! let hull = ConvexHull::from_points(&points).unwrap();
//!
//! // Coplanar triangles are merged into the six square faces.
//! assert_eq!(hull.number_of_facets(), 6);
//! assert_eq!(hull.number_of_vertices(), 8);
//! assert!(hull.facets().all(|facet| facet.vertices().count() == 4));
//! assert!((hull.total_area().unwrap() - 6.0).abs() < 1e-12);
//! assert!(hull.validate().is_ok());
//! ```
//!
//! # Options
//!
//! [`HullOptions`](core::context::HullOptions) selects triangulated output, coplanar point
//! retention, Voronoi mode, the good-facet filter, and tolerance overrides:
//!
//! ```rust
//! use qhull_rs::prelude::*;
//!
//! let points = PointStore::from_points(&[[0.0, 0.0], [2.0, 0.0], [0.0, 2.0], [2.0, 2.0]])
//!     .unwrap();
//! let hull = ConvexHull::new(points, HullOptions::voronoi()).unwrap();
//!
//! // The four points are cocircular: one Delaunay region, one Voronoi vertex.
//! let vertices = hull.voronoi_vertices().unwrap();
//! assert_eq!(vertices.len(), 1);
//! assert!((vertices[0].1[0] - 1.0).abs() < 1e-9);
//! assert!((vertices[0].1[1] - 1.0).abs() < 1e-9);
//! ```
//!
//! # Numerical tolerance
//!
//! Every outside/coplanar/inside decision is made against one distance tolerance computed
//! from the magnitude of the input (or supplied by the caller) before the first facet is
//! built. It never changes during a run and lives in the per-run
//! [`HullContext`](core::context::HullContext), not in global state, so independent hulls
//! can be built on separate threads.
//!
//! # Errors
//!
//! Construction either returns a complete hull or a
//! [`HullConstructionError`](core::hull_data_structure::HullConstructionError); queries on a
//! finished hull return [`QueryError`](geometry::algorithms::convex_hull::QueryError). Both
//! classify themselves through
//! [`HullErrorKind`](core::hull_data_structure::HullErrorKind).

#![forbid(unsafe_code)]

#[macro_use]
extern crate derive_builder;

/// The `core` module holds the facet graph and the algorithms that build it.
///
/// It includes the [`FacetGraph`](core::hull_data_structure::FacetGraph) arena with its
/// `Facet`, `Ridge`, and `Vertex` records, the read-only views over a finished hull, the
/// construction options and per-run context, and the Quickhull, merge, and triangulation
/// passes.
pub mod core {
    /// Hull construction algorithms
    pub mod algorithms {
        pub mod initial_simplex;
        pub mod merge;
        pub mod quickhull;
        pub mod triangulate;
        pub use initial_simplex::*;
        pub use quickhull::HullStatistics;
    }
    pub mod collections;
    pub mod context;
    pub mod facet;
    pub mod hull_data_structure;
    pub mod ridge;
    pub mod vertex;

    pub use context::*;
    pub use facet::*;
    pub use hull_data_structure::*;
    pub use ridge::*;
    pub use vertex::*;
}

/// Contains geometric types: the point store, hyperplanes, tolerances, linear algebra and
/// measures, the finished [`ConvexHull`](geometry::algorithms::convex_hull::ConvexHull),
/// and the paraboloid lift.
pub mod geometry {
    /// Geometric algorithms built on the facet graph
    pub mod algorithms {
        pub mod convex_hull;
        pub mod paraboloid;
        pub use convex_hull::*;
        pub use paraboloid::*;
    }
    pub mod hyperplane;
    pub mod matrix;
    pub mod point;
    pub mod tolerance;
    pub mod util;

    pub use algorithms::*;
    pub use hyperplane::*;
    pub use matrix::*;
    pub use point::*;
    pub use tolerance::*;
    pub use util::*;
}

/// A prelude module that re-exports commonly used types.
/// This makes it easier to import the most commonly used items from the crate.
pub mod prelude {
    // Re-export from core
    pub use crate::core::algorithms::HullStatistics;
    pub use crate::core::{context::*, facet::*, hull_data_structure::*, ridge::*, vertex::*};

    // Re-export commonly used collection types from core::collections
    pub use crate::core::collections::{
        FastHashMap, FastHashSet, SmallBuffer, fast_hash_map_with_capacity,
        fast_hash_set_with_capacity,
    };

    // Re-export from geometry
    pub use crate::geometry::{
        algorithms::*, hyperplane::*, point::*, tolerance::*, util::*,
    };
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================
