//! Property-based tests for track generation invariants using the `proptest` crate.

use proptest::prelude::*;

use coaster_kernel::{
    catmull_rom, generate_track, ControlPointTransform, Hexahedron, PlacementPolicy, Point3d,
    TrackConfig, Vec3,
};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Arbitrary control point in a reasonable floating-point range.
fn arb_point() -> impl Strategy<Value = Point3d> {
    (-100.0f64..100.0, -100.0f64..100.0, -100.0f64..100.0)
        .prop_map(|(x, y, z)| Point3d::new(x, y, z))
}

fn arb_tension() -> impl Strategy<Value = f64> {
    0.0f64..1.0
}

/// Rising helix around the Y axis: (radius, angle per point, rise per point).
fn arb_helix() -> impl Strategy<Value = (f64, f64, f64)> {
    (5.0f64..20.0, 0.1f64..0.5, 0.0f64..1.0)
}

fn helix(radius: f64, angle: f64, rise: f64, count: usize) -> Vec<Point3d> {
    (0..count)
        .map(|i| {
            let a = angle * i as f64;
            Point3d::new(radius * a.cos(), 10.0 + rise * i as f64, radius * a.sin())
        })
        .collect()
}

fn straight(count: usize) -> Vec<Point3d> {
    (0..count)
        .map(|i| Point3d::new(0.0, 5.0, 2.0 * i as f64))
        .collect()
}

const TOL: f64 = 1e-9;

// ---------------------------------------------------------------------------
// 1. A segment starts exactly on its second control point
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn segment_starts_at_second_point(
        a in arb_point(), b in arb_point(), c in arb_point(), d in arb_point(),
        tau in arb_tension(),
    ) {
        let p = catmull_rom(&a, &b, &c, &d, tau, 0.0);
        prop_assert_eq!(p, b);
    }
}

// ---------------------------------------------------------------------------
// 2. A segment ends on its third control point
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn segment_ends_at_third_point(
        a in arb_point(), b in arb_point(), c in arb_point(), d in arb_point(),
        tau in arb_tension(),
    ) {
        let p = catmull_rom(&a, &b, &c, &d, tau, 1.0);
        prop_assert!((p - c).norm() < 1e-9 * (1.0 + c.coords.norm()),
            "u=1 gave {:?}, expected {:?}", p, c);
    }
}

// ---------------------------------------------------------------------------
// 3. Frames stay orthonormal along a helix
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn frames_stay_orthonormal((radius, angle, rise) in arb_helix()) {
        let track = generate_track(&helix(radius, angle, rise, 16), &TrackConfig::default())
            .unwrap();
        prop_assert_eq!(track.frame_path().skipped(), 0);
        for (k, sample) in track.frames().iter().enumerate() {
            let deviation = sample.frame.orthonormality_error();
            prop_assert!(deviation < TOL, "frame {} deviates by {}", k, deviation);
        }
    }
}

// ---------------------------------------------------------------------------
// 4. Generation is deterministic
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn generation_is_deterministic((radius, angle, rise) in arb_helix()) {
        let points = helix(radius, angle, rise, 10);
        let config = TrackConfig::default();
        let first = generate_track(&points, &config).unwrap();
        let second = generate_track(&points, &config).unwrap();
        prop_assert_eq!(first.rails().as_bytes(), second.rails().as_bytes());
        prop_assert_eq!(first.planks().as_bytes(), second.planks().as_bytes());
        prop_assert_eq!(first.max_height(), second.max_height());
    }
}

// ---------------------------------------------------------------------------
// 5. Pillars appear exactly on upright segments outside the exclusion set
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn pillars_skip_excluded_segments(
        excluded in prop::collection::btree_set(0usize..20, 0..10),
        count in 5usize..20,
    ) {
        let config = TrackConfig {
            placement: PlacementPolicy {
                pillar_exclusions: excluded.clone(),
                ..PlacementPolicy::default()
            },
            ..TrackConfig::default()
        };
        let track = generate_track(&straight(count), &config).unwrap();
        let expected: Vec<usize> = (1..=count - 4).filter(|s| !excluded.contains(s)).collect();
        prop_assert_eq!(track.pillar_segments(), expected.as_slice());
    }
}

// ---------------------------------------------------------------------------
// 6. Control-point transform is a scaled prefix sum
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn transform_is_scaled_prefix_sum(
        deltas in prop::collection::vec(arb_point(), 1..20),
        scale in 0.1f64..10.0,
    ) {
        let transform = ControlPointTransform { start: Vec3::new(-2.0, 0.0, -4.5), scale };
        let deltas: Vec<Vec3> = deltas.iter().map(|p| p.coords).collect();
        let points = transform.apply(&deltas);
        prop_assert_eq!(points.len(), deltas.len());

        let sum = deltas.iter().fold(transform.start, |acc, d| acc + d);
        let last = points[points.len() - 1];
        prop_assert!((last.coords - sum * scale).norm() < 1e-6 * (1.0 + sum.norm() * scale));
    }
}

// ---------------------------------------------------------------------------
// 7. Boxes wind outward whatever their corner handedness
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn boxes_wind_outward(
        origin in arb_point(),
        (w, h, d) in (0.01f64..10.0, 0.01f64..10.0, 0.01f64..10.0),
        mirror in any::<bool>(),
    ) {
        let sign = if mirror { -1.0 } else { 1.0 };
        let corners: [Point3d; 8] = std::array::from_fn(|i| {
            origin + Vec3::new(
                sign * w * (i & 1) as f64,
                h * ((i >> 1) & 1) as f64,
                d * ((i >> 2) & 1) as f64,
            )
        });
        let solid = Hexahedron::from_corners(corners);
        prop_assert!(solid.signed_volume() > 0.0);

        let center = solid.center();
        for [a, b, c] in solid.triangles() {
            let normal = (b - a).cross(&(c - a));
            let centroid = Point3d::from((a.coords + b.coords + c.coords) / 3.0);
            prop_assert!(normal.dot(&(centroid - center)) > 0.0);
        }
    }
}

// ---------------------------------------------------------------------------
// 8. Too short a control polygon is rejected, never indexed past
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn short_polygons_are_rejected(count in 0usize..5) {
        let result = generate_track(&straight(count), &TrackConfig::default());
        prop_assert!(result.is_err());
    }
}
