#![allow(clippy::unwrap_used)]

use std::f64::consts::TAU;

use photom_pattern::{
    BidirectionalParams, BidirectionalStrategy, EngineConfig, PatternSpec, PatternWarning, Point,
    Polygon, ShapeId, ShapeTrace, SpiralParams, SpiralSampling, generate, spiral_turns,
};
use proptest::prelude::*;

/// Star-shaped polygon around `(cx, cy)`: one vertex per radius at evenly
/// spaced angles, so the boundary never self-intersects.
fn star(cx: f64, cy: f64, radii: &[f64]) -> Polygon {
    #[allow(clippy::cast_precision_loss)]
    let step = TAU / radii.len() as f64;
    let points = radii
        .iter()
        .enumerate()
        .map(|(i, r)| {
            #[allow(clippy::cast_precision_loss)]
            let a = step * i as f64;
            Point::new(r.mul_add(a.cos(), cx), r.mul_add(a.sin(), cy))
        })
        .collect();
    Polygon::new(points).unwrap()
}

fn radii() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(10.0f64..150.0, 3..12)
}

fn strategy() -> impl Strategy<Value = BidirectionalStrategy> {
    prop_oneof![
        Just(BidirectionalStrategy::Raster),
        Just(BidirectionalStrategy::LatticeBfs),
    ]
}

fn sampling() -> impl Strategy<Value = SpiralSampling> {
    prop_oneof![
        Just(SpiralSampling::Resampled),
        Just(SpiralSampling::AllInPolygon),
    ]
}

proptest! {
    #[test]
    fn lattice_points_stay_inside(
        radii in radii(),
        cx in 150.0f64..400.0,
        cy in 150.0f64..400.0,
        h in 1u32..60,
        v in 1u32..60,
        count in prop::option::of(1usize..200),
        strategy in strategy(),
    ) {
        let polygon = star(cx, cy, &radii);
        let config = EngineConfig { bidirectional_strategy: strategy, ..EngineConfig::default() };
        let spec = PatternSpec::Bidirectional(BidirectionalParams {
            horizontal_spacing: h,
            vertical_spacing: v,
            target_point_count: count,
        });
        let out = generate(&polygon, &spec, &config).unwrap();

        prop_assert!(!out.ablation_points.is_empty());
        prop_assert!(out.pattern_points.is_empty());
        if out.is_fallback() {
            prop_assert_eq!(out.ablation_points.clone(), vec![polygon.centroid()]);
        } else {
            for p in &out.ablation_points {
                prop_assert!(polygon.contains_point(*p), "{:?} outside", p);
            }
        }
        if let Some(n) = count {
            prop_assert!(out.ablation_points.len() <= n);
        }
    }

    #[test]
    fn spiral_points_stay_inside(
        radii in radii(),
        count in prop::option::of(1usize..400),
        sampling in sampling(),
    ) {
        let polygon = star(200.0, 200.0, &radii);
        let config = EngineConfig { spiral_sampling: sampling, ..EngineConfig::default() };
        let spec = PatternSpec::Spiral(SpiralParams { target_point_count: count });
        let out = generate(&polygon, &spec, &config).unwrap();

        prop_assert!(!out.ablation_points.is_empty());
        for p in &out.pattern_points {
            prop_assert!(polygon.contains_point(*p));
        }
        if !out.is_fallback() {
            for p in &out.ablation_points {
                prop_assert!(polygon.contains_point(*p));
            }
        }
        if let (SpiralSampling::Resampled, Some(n)) = (sampling, count) {
            prop_assert!(out.ablation_points.len() <= n);
        }
    }

    #[test]
    fn spiral_rectangle_places_exactly_the_requested_count(
        x in 0.0f64..200.0,
        y in 0.0f64..200.0,
        w in 20.0f64..400.0,
        h in 20.0f64..400.0,
        n in 1usize..600,
    ) {
        let polygon = Polygon::from_coords(&[(x, y), (x + w, y), (x + w, y + h), (x, y + h)]).unwrap();
        let spec = PatternSpec::Spiral(SpiralParams { target_point_count: Some(n) });
        let out = generate(&polygon, &spec, &EngineConfig::default()).unwrap();
        let placed = out.ablation_points.len();

        // Every sample is inside a rectangle, so only a warned clamp may
        // leave the count short.
        match out.warnings.as_slice() {
            [] => prop_assert_eq!(placed, n),
            [PatternWarning::PointCountClamped { requested, maximum }] => {
                prop_assert_eq!(*requested, n);
                prop_assert_eq!(*maximum, placed);
                prop_assert!(placed < n);
            }
            other => prop_assert!(false, "unexpected warnings: {:?}", other),
        }
    }

    #[test]
    fn applying_twice_is_idempotent(
        radii in radii(),
        spacing in 1u32..40,
        spiral in any::<bool>(),
    ) {
        let spec = if spiral {
            PatternSpec::Spiral(SpiralParams::default())
        } else {
            PatternSpec::Bidirectional(BidirectionalParams {
                horizontal_spacing: spacing,
                vertical_spacing: spacing,
                target_point_count: None,
            })
        };
        let config = EngineConfig::default();
        let mut trace = ShapeTrace::new(ShapeId(0), star(200.0, 200.0, &radii));
        trace.apply_pattern(&spec, &config).unwrap();
        let once = trace.clone();
        trace.apply_pattern(&spec, &config).unwrap();
        prop_assert_eq!(trace, once);
    }

    #[test]
    fn small_spacing_equals_minimum_gap(
        radii in radii(),
        spacing in 1u32..5,
    ) {
        let polygon = star(200.0, 200.0, &radii);
        let config = EngineConfig::default();
        let params = |s| PatternSpec::Bidirectional(BidirectionalParams {
            horizontal_spacing: s,
            vertical_spacing: s,
            target_point_count: None,
        });
        let small = generate(&polygon, &params(spacing), &config).unwrap();
        let gap = generate(&polygon, &params(5), &config).unwrap();
        prop_assert_eq!(small.ablation_points, gap.ablation_points);
    }

    #[test]
    fn spiral_turns_respect_gap(
        max_radius in 1.0f64..2000.0,
        gap in 0.5f64..50.0,
    ) {
        let turns = spiral_turns(max_radius, gap, 4);
        prop_assert!(turns >= 4);
        if turns > 4 {
            prop_assert!(max_radius / f64::from(turns) >= gap);
        }
        prop_assert!(max_radius / f64::from(turns + 1) < gap);
        prop_assert!(spiral_turns(max_radius, gap / 2.0, 4) >= turns);
    }
}
