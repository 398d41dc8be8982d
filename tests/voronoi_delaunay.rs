//! Delaunay regions and Voronoi vertices through the paraboloid lift.
//!
//! Known circumcenters for small inputs, cocircular input merged into one region (or split
//! again by triangulated output), and the empty-circumsphere property on seeded random
//! clouds.

use approx::assert_relative_eq;
use qhull_rs::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

fn voronoi_hull(rows: &[Vec<f64>]) -> ConvexHull {
    ConvexHull::from_rows(rows, HullOptions::voronoi()).unwrap()
}

fn random_rows(seed: u64, count: usize, dimension: usize) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| (0..dimension).map(|_| rng.random_range(0.0..10.0)).collect())
        .collect()
}

// =============================================================================
// SMALL INPUTS
// =============================================================================

#[test]
fn test_triangle_circumcenter() {
    init_tracing();
    let hull = voronoi_hull(&[vec![0.0, 0.0], vec![2.0, 0.0], vec![0.0, 2.0]]);
    assert!(hull.is_voronoi());
    assert_eq!(hull.input_dimension(), 2);
    assert_eq!(hull.dimension(), 3);

    let vertices = hull.voronoi_vertices().unwrap();
    assert_eq!(vertices.len(), 1);
    assert_relative_eq!(vertices[0].1[0], 1.0, epsilon = 1e-9);
    assert_relative_eq!(vertices[0].1[1], 1.0, epsilon = 1e-9);

    let regions = hull.delaunay_regions().unwrap();
    assert_eq!(regions, vec![vec![PointId::new(0), PointId::new(1), PointId::new(2)]]);
    // The point at infinity is never reported as a hull point.
    assert_eq!(hull.hull_point_ids().len(), 3);
}

#[test]
fn test_tetrahedron_circumcenter() {
    init_tracing();
    let hull = voronoi_hull(&[
        vec![0.0, 0.0, 0.0],
        vec![2.0, 0.0, 0.0],
        vec![0.0, 2.0, 0.0],
        vec![0.0, 0.0, 2.0],
    ]);
    assert_eq!(hull.dimension(), 4);
    assert_eq!(hull.number_of_facets(), 5);
    assert_eq!(hull.good_facets().count(), 1);

    let facet = hull.good_facets().next().unwrap();
    assert!(!facet.is_upper_delaunay());
    let center = facet.center(CenterKind::Voronoi).unwrap();
    for c in &center {
        assert_relative_eq!(*c, 1.0, epsilon = 1e-9);
    }
    // Cached on first use; a second query returns the same coordinates.
    assert_eq!(facet.voronoi_vertex().unwrap(), center);
}

#[test]
fn test_cocircular_square_is_one_region() {
    init_tracing();
    let hull = voronoi_hull(&[
        vec![0.0, 0.0],
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 1.0],
    ]);
    let regions = hull.delaunay_regions().unwrap();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].len(), 4);

    let vertices = hull.voronoi_vertices().unwrap();
    assert_eq!(vertices.len(), 1);
    assert_relative_eq!(vertices[0].1[0], 0.5, epsilon = 1e-9);
    assert_relative_eq!(vertices[0].1[1], 0.5, epsilon = 1e-9);
}

#[test]
fn test_cocircular_square_triangulated() {
    init_tracing();
    let store =
        PointStore::from_points(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]).unwrap();
    let hull = ConvexHull::new(store, HullOptions::voronoi().with_triangulate(true)).unwrap();

    let regions = hull.delaunay_regions().unwrap();
    assert_eq!(regions.len(), 2);
    assert!(regions.iter().all(|region| region.len() == 3));

    // Both triangles share the circumcircle of the square.
    for (_, vertex) in hull.voronoi_vertices().unwrap() {
        assert_relative_eq!(vertex[0], 0.5, epsilon = 1e-9);
        assert_relative_eq!(vertex[1], 0.5, epsilon = 1e-9);
    }
}

#[test]
fn test_voronoi_query_dimension_is_the_input_dimension() {
    init_tracing();
    let hull = voronoi_hull(&[vec![0.0, 0.0], vec![2.0, 0.0], vec![0.0, 2.0]]);
    // Point queries run against the lifted hull.
    assert!(hull.is_point_outside(&[0.0, 0.0, -1.0]).unwrap());
    assert!(hull.is_point_outside(&[0.0, 0.0]).is_err());
}

// =============================================================================
// RANDOM CLOUDS
// =============================================================================

/// No input point lies strictly inside the circumsphere of a Delaunay region.
#[test]
fn test_empty_circumsphere_property() {
    init_tracing();
    for (dimension, count) in [(2, 40), (3, 25)] {
        let rows = random_rows(17 + dimension as u64, count, dimension);
        let hull = voronoi_hull(&rows);
        let vertices = hull.voronoi_vertices().unwrap();
        assert!(!vertices.is_empty());

        for (key, center) in vertices {
            let facet = hull.facet(key).unwrap();
            let corner = &rows[facet.vertex_points().next().unwrap().index()];
            let radius = squared_distance(corner, &center).sqrt();
            for row in &rows {
                let distance = squared_distance(row, &center).sqrt();
                assert!(
                    distance >= radius - 1e-6 * (1.0 + radius),
                    "point {row:?} lies inside the circumsphere of f{}",
                    facet.id()
                );
            }
        }
    }
}

/// A planar Delaunay triangulation of n points in general position with h of them on the
/// convex hull has 2n − h − 2 triangles.
#[test]
fn test_planar_triangle_count() {
    init_tracing();
    let rows = random_rows(99, 50, 2);
    let planar = ConvexHull::from_rows(&rows, HullOptions::default()).unwrap();
    let delaunay = voronoi_hull(&rows);

    let regions = delaunay.delaunay_regions().unwrap();
    assert!(regions.iter().all(|region| region.len() == 3));
    assert_eq!(regions.len(), 2 * rows.len() - planar.number_of_vertices() - 2);

    // Every input point is a Delaunay vertex.
    let mut used: Vec<PointId> = regions.into_iter().flatten().collect();
    used.sort_unstable();
    used.dedup();
    assert_eq!(used.len(), rows.len());
}
