//! Property-based tests for convex hull construction.
//!
//! This module uses proptest to verify the invariants every finished hull satisfies:
//! - The facet graph is consistent and neighbor relations are symmetric
//! - No input point lies above any facet's outer plane
//! - Triangulated output consists of simplicial facets only
//! - Construction is deterministic for a given input
//! - Only the corners of a lattice are vertices, whatever the insertion order
//! - Lattices perturbed by a small multiple of the tolerance still build
//!
//! Inputs that cannot span a full-dimensional hull are skipped; they are covered by the
//! error path tests. Tests are generated for dimensions 2D-5D using macros to reduce
//! duplication.

use proptest::prelude::*;
use qhull_rs::prelude::*;

// =============================================================================
// TEST CONFIGURATION
// =============================================================================

/// Strategy for generating finite f64 coordinates
fn finite_coordinate() -> impl Strategy<Value = f64> {
    (-100.0..100.0).prop_filter("must be finite", |x: &f64| x.is_finite())
}

/// Builds the hull, or `None` when the input is degenerate.
fn build<const D: usize>(points: &[[f64; D]], options: HullOptions) -> Option<ConvexHull> {
    let store = PointStore::from_points(points).ok()?;
    match ConvexHull::new(store, options) {
        Ok(hull) => Some(hull),
        Err(error) if error.kind() == HullErrorKind::InputDegeneracy => None,
        Err(error) => panic!("construction failed on non-degenerate input: {error}"),
    }
}

/// Every point of the integer lattice `[0, sides[0]) × [0, sides[1]) × ...`.
fn lattice(sides: &[u32]) -> Vec<Vec<f64>> {
    let mut rows: Vec<Vec<f64>> = vec![Vec::new()];
    for &side in sides {
        rows = rows
            .into_iter()
            .flat_map(|row| {
                (0..side).map(move |i| {
                    let mut next = row.clone();
                    next.push(f64::from(i));
                    next
                })
            })
            .collect();
    }
    rows
}

fn is_lattice_corner(row: &[f64], sides: &[u32]) -> bool {
    row.iter()
        .zip(sides)
        .all(|(&x, &side)| x.abs() < 1e-12 || (x - f64::from(side - 1)).abs() < 1e-12)
}

fn facet_signature(hull: &ConvexHull) -> Vec<Vec<PointId>> {
    let mut signature: Vec<Vec<PointId>> = hull
        .facets()
        .map(|facet| {
            let mut points: Vec<PointId> = facet.vertex_points().collect();
            points.sort_unstable();
            points
        })
        .collect();
    signature.sort();
    signature
}

// =============================================================================
// DIMENSIONAL TEST GENERATION MACROS
// =============================================================================

/// Macro to generate convex hull property tests for a given dimension
macro_rules! test_convex_hull_properties {
    ($dim:literal, $min_points:literal, $max_points:literal) => {
        pastey::paste! {
            proptest! {
                /// Property: A constructed hull passes structural and geometric validation
                #[test]
                fn [<prop_hull_is_valid_ $dim d>](
                    points in prop::collection::vec(
                        prop::array::[<uniform $dim>](finite_coordinate()),
                        $min_points..=$max_points
                    )
                ) {
                    let hull = build(&points, HullOptions::default());
                    prop_assume!(hull.is_some());
                    let hull = hull.unwrap();

                    prop_assert!(
                        hull.validate().is_ok(),
                        "{}D hull failed validation: {:?}",
                        $dim,
                        hull.validation_report().err()
                    );
                    prop_assert!(hull.number_of_facets() > $dim);
                    prop_assert!(hull.number_of_vertices() > $dim);
                    prop_assert!(hull.number_of_vertices() <= points.len());
                }

                /// Property: Every facet is listed by each of its neighbors
                #[test]
                fn [<prop_neighbors_are_symmetric_ $dim d>](
                    points in prop::collection::vec(
                        prop::array::[<uniform $dim>](finite_coordinate()),
                        $min_points..=$max_points
                    )
                ) {
                    let hull = build(&points, HullOptions::default());
                    prop_assume!(hull.is_some());
                    let hull = hull.unwrap();

                    for facet in hull.facets() {
                        for neighbor in facet.neighbors() {
                            prop_assert!(
                                neighbor.neighbors().any(|back| back == facet),
                                "{}D: f{} and f{} disagree about adjacency",
                                $dim,
                                facet.id(),
                                neighbor.id()
                            );
                        }
                    }
                }

                /// Property: No input point lies outside the finished hull
                #[test]
                fn [<prop_points_are_enclosed_ $dim d>](
                    points in prop::collection::vec(
                        prop::array::[<uniform $dim>](finite_coordinate()),
                        $min_points..=$max_points
                    )
                ) {
                    let hull = build(&points, HullOptions::default());
                    prop_assume!(hull.is_some());
                    let hull = hull.unwrap();

                    for point in &points {
                        prop_assert!(
                            !hull.is_point_outside(point).unwrap(),
                            "{}D: input point {:?} is outside the hull",
                            $dim,
                            point
                        );
                    }
                    prop_assert!(hull.total_area().unwrap() > 0.0);
                }

                /// Property: Triangulated output is simplicial and passes validation
                #[test]
                fn [<prop_triangulated_output_ $dim d>](
                    points in prop::collection::vec(
                        prop::array::[<uniform $dim>](finite_coordinate()),
                        $min_points..=$max_points
                    )
                ) {
                    let hull = build(&points, HullOptions::default().with_triangulate(true));
                    prop_assume!(hull.is_some());
                    let hull = hull.unwrap();

                    for facet in hull.facets() {
                        prop_assert_eq!(facet.vertices().count(), $dim);
                        prop_assert!(facet.is_simplicial());
                    }
                    prop_assert!(hull.validate().is_ok());
                }

                /// Property: Building twice from the same points gives the same facets
                #[test]
                fn [<prop_construction_is_deterministic_ $dim d>](
                    points in prop::collection::vec(
                        prop::array::[<uniform $dim>](finite_coordinate()),
                        $min_points..=$max_points
                    )
                ) {
                    let first = build(&points, HullOptions::default());
                    prop_assume!(first.is_some());
                    let first = first.unwrap();
                    let second = build(&points, HullOptions::default()).unwrap();

                    prop_assert_eq!(facet_signature(&first), facet_signature(&second));
                    prop_assert_eq!(first.statistics(), second.statistics());
                }
            }
        }
    };
}

// Generate tests for dimensions 2-5
test_convex_hull_properties!(2, 4, 10);
test_convex_hull_properties!(3, 5, 12);
test_convex_hull_properties!(4, 6, 14);
test_convex_hull_properties!(5, 7, 16);

/// Macro to generate lattice tests for a given dimension
macro_rules! test_lattice_properties {
    ($dim:literal, [$($side:literal),+], $corners:literal) => {
        pastey::paste! {
            proptest! {
                /// Property: Only lattice corners are vertices, whatever the insertion order
                #[test]
                fn [<prop_shuffled_lattice_keeps_only_corners_ $dim d>](seed in any::<u64>()) {
                    use rand::seq::SliceRandom;
                    use rand::SeedableRng;

                    let sides = [$($side),+];
                    let mut rows = lattice(&sides);
                    rows.shuffle(&mut rand::rngs::StdRng::seed_from_u64(seed));
                    let hull = ConvexHull::from_rows(&rows, HullOptions::default()).unwrap();

                    prop_assert_eq!(
                        hull.number_of_vertices(),
                        $corners,
                        "{}D lattice {:?} kept non-corner vertices",
                        $dim,
                        sides
                    );
                    for vertex in hull.vertices() {
                        prop_assert!(is_lattice_corner(&rows[vertex.point_id().index()], &sides));
                    }
                    prop_assert!(hull.validate().is_ok());
                }

                /// Property: A lattice perturbed within a hundred distance tolerances builds
                #[test]
                fn [<prop_perturbed_lattice_builds_ $dim d>](
                    seed in any::<u64>(),
                    scale in 0.0..100.0_f64
                ) {
                    use rand::{Rng, SeedableRng};

                    let sides = [$($side),+];
                    let exact = lattice(&sides);
                    let tolerance = Tolerance::for_points(
                        &PointStore::from_rows(&exact).unwrap(),
                        None,
                        None,
                    )
                    .distance();
                    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
                    let rows: Vec<Vec<f64>> = exact
                        .iter()
                        .map(|row| {
                            row.iter()
                                .map(|x| x + scale * tolerance * rng.random_range(-1.0..=1.0))
                                .collect()
                        })
                        .collect();

                    let hull = ConvexHull::from_rows(&rows, HullOptions::default());
                    prop_assert!(
                        hull.is_ok(),
                        "{}D perturbed lattice failed: {:?}",
                        $dim,
                        hull.err()
                    );
                    let hull = hull.unwrap();
                    prop_assert!(hull.number_of_vertices() >= $corners);
                    prop_assert!(hull.number_of_vertices() <= rows.len());
                    for facet in hull.facets() {
                        for neighbor in facet.neighbors() {
                            prop_assert!(neighbor.neighbors().any(|back| back == facet));
                        }
                    }
                }
            }
        }
    };
}

test_lattice_properties!(2, [4, 4], 4);
test_lattice_properties!(3, [3, 3, 3], 8);
test_lattice_properties!(4, [3, 2, 2, 2], 16);
