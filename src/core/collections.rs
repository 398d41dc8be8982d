//! Collection types used throughout the facet graph.
//!
//! Everything that stores facets, ridges, or vertices goes through the aliases defined here
//! so the storage backend and hasher can be swapped in one place.
//!
//! # Organization
//!
//! - [`aliases`]: storage backend, fast hash collections, and small buffers
//! - [`key_maps`]: key-based sets, maps, and inline buffers for the facet graph
//! - [`helpers`]: capacity-aware constructors

mod aliases;
mod helpers;
mod key_maps;

pub use aliases::*;
pub use helpers::*;
pub use key_maps::*;
