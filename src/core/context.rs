//! Construction options and the explicit per-run context.
//!
//! [`HullOptions`] is what callers configure; [`HullContext`] is what the builder and the
//! derived queries read. The context is assembled once, after the tolerance has been computed
//! and the initial simplex chosen, and is never mutated afterwards. Nothing about a run lives
//! in global state, so independent hulls can be built on separate threads.
//!
//! # Examples
//!
//! ```rust
//! use qhull_rs::core::context::{GoodFacetFilter, HullOptionsBuilder};
//!
//! let options = HullOptionsBuilder::default()
//!     .triangulate(true)
//!     .tolerance(1e-9)
//!     .build()
//!     .unwrap();
//! assert!(options.triangulate);
//! assert_eq!(options.tolerance, Some(1e-9));
//! assert_eq!(options.good_facets, GoodFacetFilter::Auto);
//! assert!(options.validate().is_ok());
//! ```

#![forbid(unsafe_code)]

use crate::core::hull_data_structure::HullConstructionError;
use crate::geometry::hyperplane::Hyperplane;
use crate::geometry::point::PointId;
use crate::geometry::tolerance::Tolerance;
use serde::{Deserialize, Serialize};

/// Default bound on the number of facet merges in one construction.
pub const DEFAULT_MAX_MERGES: usize = 10_000;

// =============================================================================
// GOOD-FACET FILTER
// =============================================================================

/// Reporting predicate deciding which facets of a finished hull are flagged good.
///
/// Degenerate pieces produced by triangulating a merged facet are never good.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum GoodFacetFilter {
    /// [`GoodFacetFilter::LowerDelaunay`] in Voronoi mode, [`GoodFacetFilter::All`] otherwise.
    #[default]
    Auto,
    /// Every facet.
    All,
    /// Facets on the lower side of the lifted hull.
    LowerDelaunay,
    /// Facets on the upper side of the lifted hull.
    UpperDelaunay,
    /// Facets whose plane has the given point strictly above it (hull coordinates).
    VisibleFrom(Vec<f64>),
}

impl GoodFacetFilter {
    /// Replaces [`GoodFacetFilter::Auto`] by the concrete filter for the given mode.
    #[must_use]
    pub fn resolve(&self, voronoi: bool) -> Self {
        match self {
            Self::Auto if voronoi => Self::LowerDelaunay,
            Self::Auto => Self::All,
            other => other.clone(),
        }
    }

    /// Applies the filter to one facet.
    #[must_use]
    pub fn accepts(&self, hyperplane: &Hyperplane, upper_delaunay: bool, tolerance: f64) -> bool {
        match self {
            Self::Auto | Self::All => true,
            Self::LowerDelaunay => !upper_delaunay,
            Self::UpperDelaunay => upper_delaunay,
            Self::VisibleFrom(point) => hyperplane.distance(point) > tolerance,
        }
    }
}

// =============================================================================
// OPTIONS
// =============================================================================

/// Caller-facing construction options.
///
/// Build with [`HullOptionsBuilder`] or start from `HullOptions::default()`.
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[builder(default)]
pub struct HullOptions {
    /// Explicit distance tolerance replacing the computed default.
    #[builder(setter(strip_option))]
    pub tolerance: Option<f64>,
    /// Split every non-simplicial facet into simplicial pieces after construction.
    pub triangulate: bool,
    /// Record coplanar points on their facets.
    pub keep_coplanar: bool,
    /// Lift the input onto a paraboloid and build the hull one dimension up.
    pub voronoi: bool,
    /// Which facets are flagged good.
    pub good_facets: GoodFacetFilter,
    /// Centrum distance below which neighboring facets are merged; defaults to a multiple of
    /// the distance tolerance.
    #[builder(setter(strip_option))]
    pub merge_centrum: Option<f64>,
    /// Upper bound on facet merges before construction gives up.
    pub max_merges: usize,
}

impl Default for HullOptions {
    fn default() -> Self {
        Self {
            tolerance: None,
            triangulate: false,
            keep_coplanar: false,
            voronoi: false,
            good_facets: GoodFacetFilter::Auto,
            merge_centrum: None,
            max_merges: DEFAULT_MAX_MERGES,
        }
    }
}

impl HullOptions {
    /// Options for a Delaunay/Voronoi run: paraboloid lift, lower facets good.
    #[must_use]
    pub fn voronoi() -> Self {
        Self {
            voronoi: true,
            ..Self::default()
        }
    }

    /// Enables or disables triangulated output.
    #[must_use]
    pub const fn with_triangulate(mut self, triangulate: bool) -> Self {
        self.triangulate = triangulate;
        self
    }

    /// Enables or disables coplanar-point retention.
    #[must_use]
    pub const fn with_keep_coplanar(mut self, keep_coplanar: bool) -> Self {
        self.keep_coplanar = keep_coplanar;
        self
    }

    /// Sets an explicit distance tolerance.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Checks ranges before any work is done.
    ///
    /// # Errors
    ///
    /// Returns [`HullConstructionError::InvalidOptions`] for a negative or non-finite
    /// tolerance or merge threshold, or a zero merge bound.
    pub fn validate(&self) -> Result<(), HullConstructionError> {
        for (name, value) in [
            ("tolerance", self.tolerance),
            ("merge_centrum", self.merge_centrum),
        ] {
            if let Some(value) = value
                && (!value.is_finite() || value < 0.0)
            {
                return Err(HullConstructionError::InvalidOptions {
                    message: format!("{name} must be finite and non-negative, got {value}"),
                });
            }
        }
        if self.max_merges == 0 {
            return Err(HullConstructionError::InvalidOptions {
                message: "max_merges must be positive".to_string(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// CONTEXT
// =============================================================================

/// Frozen per-run state shared by construction and the derived queries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HullContext {
    dimension: usize,
    input_dimension: usize,
    tolerance: Tolerance,
    interior: Vec<f64>,
    options: HullOptions,
    good_facets: GoodFacetFilter,
    infinity_point: Option<PointId>,
}

impl HullContext {
    /// Assembles the context. The good-facet filter is resolved against the Voronoi flag.
    #[must_use]
    pub fn new(
        input_dimension: usize,
        tolerance: Tolerance,
        interior: Vec<f64>,
        options: HullOptions,
        infinity_point: Option<PointId>,
    ) -> Self {
        let dimension = if options.voronoi {
            input_dimension + 1
        } else {
            input_dimension
        };
        let good_facets = options.good_facets.resolve(options.voronoi);
        Self {
            dimension,
            input_dimension,
            tolerance,
            interior,
            options,
            good_facets,
            infinity_point,
        }
    }

    /// Dimension the hull is built in (input dimension + 1 in Voronoi mode).
    #[inline]
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Dimension of the caller's points.
    #[inline]
    #[must_use]
    pub const fn input_dimension(&self) -> usize {
        self.input_dimension
    }

    /// Frozen tolerances.
    #[inline]
    #[must_use]
    pub const fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    /// A point strictly inside the hull (centroid of the initial simplex).
    #[inline]
    #[must_use]
    pub fn interior(&self) -> &[f64] {
        &self.interior
    }

    /// Options as supplied.
    #[inline]
    #[must_use]
    pub const fn options(&self) -> &HullOptions {
        &self.options
    }

    /// Resolved good-facet filter.
    #[inline]
    #[must_use]
    pub const fn good_facets(&self) -> &GoodFacetFilter {
        &self.good_facets
    }

    /// Whether the hull was built over lifted points.
    #[inline]
    #[must_use]
    pub const fn is_voronoi(&self) -> bool {
        self.options.voronoi
    }

    /// Synthetic point at infinity added in Voronoi mode.
    #[inline]
    #[must_use]
    pub const fn infinity_point(&self) -> Option<PointId> {
        self.infinity_point
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point::PointStore;

    #[test]
    fn test_builder_defaults_match_default() {
        let built = HullOptionsBuilder::default().build().unwrap();
        assert_eq!(built, HullOptions::default());
        assert_eq!(built.max_merges, DEFAULT_MAX_MERGES);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let options = HullOptions::default().with_tolerance(-1.0);
        assert!(matches!(
            options.validate(),
            Err(HullConstructionError::InvalidOptions { .. })
        ));

        let options = HullOptions {
            merge_centrum: Some(f64::NAN),
            ..HullOptions::default()
        };
        assert!(options.validate().is_err());

        let options = HullOptions {
            max_merges: 0,
            ..HullOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_filter_resolution() {
        assert_eq!(
            GoodFacetFilter::Auto.resolve(true),
            GoodFacetFilter::LowerDelaunay
        );
        assert_eq!(GoodFacetFilter::Auto.resolve(false), GoodFacetFilter::All);
        assert_eq!(
            GoodFacetFilter::UpperDelaunay.resolve(false),
            GoodFacetFilter::UpperDelaunay
        );

        let plane = Hyperplane::new(vec![0.0, 1.0], -1.0).unwrap();
        let filter = GoodFacetFilter::VisibleFrom(vec![0.0, 2.0]);
        assert!(filter.accepts(&plane, false, 1e-12));
        let filter = GoodFacetFilter::VisibleFrom(vec![0.0, 0.0]);
        assert!(!filter.accepts(&plane, false, 1e-12));
    }

    #[test]
    fn test_context_lifts_dimension_in_voronoi_mode() {
        let store = PointStore::from_points(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]).unwrap();
        let tolerance = Tolerance::for_points(&store, None, None);
        let context = HullContext::new(
            2,
            tolerance,
            vec![0.3, 0.3, 0.5],
            HullOptions::voronoi(),
            Some(PointId::new(3)),
        );
        assert_eq!(context.dimension(), 3);
        assert_eq!(context.input_dimension(), 2);
        assert!(context.is_voronoi());
        assert_eq!(context.good_facets(), &GoodFacetFilter::LowerDelaunay);
    }

    #[test]
    fn test_options_serde_round_trip() {
        let options = HullOptions::voronoi().with_keep_coplanar(true);
        let json = serde_json::to_string(&options).unwrap();
        let back: HullOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, options);
    }
}
