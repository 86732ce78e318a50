//! Spiral pattern: an Archimedean spiral stretched over the bounding box,
//! resampled by arc length and clipped to the polygon.
//!
//! # Steps
//!
//! 1. `max_radius = min(width, height) / 2`.
//! 2. Pick the turn count (see [`spiral_turns`]).
//! 3. Sample `r = theta` for `theta` in `[0, turns * pi]`.
//! 4. Rescale x and y independently so the curve spans the bounding box
//!    exactly, then translate to the box origin.
//! 5. Accumulate arc length along the samples.
//! 6. Clamp the requested point count to `floor(arc_length / minimum_gap)`
//!    and to the number of samples.
//! 7. Pick sample indices at equal arc-length intervals. Targets that
//!    land on the same sample merge; a request that ends up short is
//!    reported as [`PatternWarning::PointCountClamped`].
//! 8. Keep the selected samples that are inside the polygon as ablation
//!    points; the remaining inside samples become preview points.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{PatternMetrics, PatternWarning, Warnings};
use crate::pattern::{Generated, SpiralParams, requested_count, with_centroid_fallback};
use crate::polygon::Polygon;
use crate::types::{BoundingBox, EngineConfig, Point};

/// Selects how spiral samples become ablation points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpiralSampling {
    /// Arc-length-equidistant resampling to the requested point count;
    /// unselected inside samples are kept as preview points.
    #[default]
    Resampled,

    /// Every inside sample is an ablation point. No resampling, no point
    /// limit, no preview points.
    AllInPolygon,
}

/// Number of turns for a spiral of `max_radius` whose arms must stay at
/// least `minimum_gap` apart.
///
/// Returns the largest `turns >= initial_turns` such that
/// `max_radius / turns >= minimum_gap`, or `initial_turns` when even that
/// many turns pack the arms tighter than the gap. The result never
/// decreases as `minimum_gap` decreases.
///
/// The turn count grows with the radius while the sample count stays
/// fixed (`spiral_samples`), so large shapes get a coarse curve: a 2000
/// px square has 200 half-turns, only 10 samples per rotation with the
/// default 1000 samples. Raise `spiral_samples` for large shapes.
///
/// `minimum_gap` must be positive (see [`EngineConfig::validate`]).
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn spiral_turns(max_radius: f64, minimum_gap: f64, initial_turns: u32) -> u32 {
    debug_assert!(minimum_gap > 0.0, "minimum_gap must be positive");
    // Closed-form estimate, then nudge for rounding at exact multiples.
    let mut turns = ((max_radius / minimum_gap).floor() as u32).max(initial_turns);
    while turns > initial_turns && max_radius / f64::from(turns) < minimum_gap {
        turns -= 1;
    }
    while turns < u32::MAX && max_radius / f64::from(turns + 1) >= minimum_gap {
        turns += 1;
    }
    turns
}

/// Below this many samples per full rotation the sampled spiral looks
/// more like a star than a curve.
const MIN_SAMPLES_PER_ROTATION: u64 = 20;

/// Returns `true` if `samples` spread over `turns` half-turns leave fewer
/// than [`MIN_SAMPLES_PER_ROTATION`] samples per full rotation.
fn is_undersampled(turns: u32, samples: usize) -> bool {
    let samples = u64::try_from(samples).unwrap_or(u64::MAX);
    samples.saturating_mul(2) < MIN_SAMPLES_PER_ROTATION * u64::from(turns)
}

/// `n` evenly spaced values from `start` to `stop` inclusive.
///
/// The last value is exactly `stop`.
#[allow(clippy::cast_precision_loss)]
fn linspace(start: f64, stop: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = if n > 1 {
        (stop - start) / (n - 1) as f64
    } else {
        0.0
    };
    (0..n).map(move |i| {
        if i + 1 == n && n > 1 {
            stop
        } else {
            (i as f64).mul_add(step, start)
        }
    })
}

/// Sample the spiral and stretch it over `bounds`.
fn sample_curve(bounds: &BoundingBox, turns: u32, samples: usize) -> Vec<Point> {
    let theta_max = f64::from(turns) * PI;
    let raw: Vec<Point> = linspace(0.0, theta_max, samples)
        .map(|theta| Point::new(theta * theta.cos(), theta * theta.sin()))
        .collect();

    let Some(raw_bounds) = BoundingBox::from_points(&raw) else {
        return Vec::new();
    };
    let rescale = |v: f64, min: f64, span: f64, extent: f64, origin: f64| {
        if span > 0.0 {
            ((v - min) / span).mul_add(extent, origin)
        } else {
            origin
        }
    };

    raw.into_iter()
        .map(|p| {
            Point::new(
                rescale(
                    p.x,
                    raw_bounds.min_x,
                    raw_bounds.width(),
                    bounds.width(),
                    bounds.min_x,
                ),
                rescale(
                    p.y,
                    raw_bounds.min_y,
                    raw_bounds.height(),
                    bounds.height(),
                    bounds.min_y,
                ),
            )
        })
        .collect()
}

/// Cumulative arc length; element `i` is the path length from sample 0
/// to sample `i`.
fn cumulative_arc_length(curve: &[Point]) -> Vec<f64> {
    let mut total = 0.0;
    let mut lengths = Vec::with_capacity(curve.len());
    lengths.push(0.0);
    for pair in curve.windows(2) {
        total += pair[0].distance(pair[1]);
        lengths.push(total);
    }
    lengths.truncate(curve.len());
    lengths
}

/// Mark the sample indices closest (from above) to `count` equidistant
/// arc-length targets.
///
/// Each target maps to the first index whose cumulative length is at
/// least the target. Several targets may map to the same index.
fn select_indices(arc_lengths: &[f64], count: usize) -> Vec<bool> {
    let mut selected = vec![false; arc_lengths.len()];
    let (Some(&total), Some(last)) = (arc_lengths.last(), arc_lengths.len().checked_sub(1)) else {
        return selected;
    };
    for target in linspace(0.0, total, count) {
        let idx = arc_lengths.partition_point(|&len| len < target).min(last);
        selected[idx] = true;
    }
    selected
}

/// Generate the spiral pattern for `polygon`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn generate(
    polygon: &Polygon,
    params: &SpiralParams,
    config: &EngineConfig,
    warnings: &mut Warnings,
) -> Generated {
    let bounds = polygon.bounding_box();
    let max_radius = bounds.width().min(bounds.height()) / 2.0;
    let turns = spiral_turns(max_radius, config.minimum_gap, config.initial_turns);

    let curve = sample_curve(&bounds, turns, config.spiral_samples);
    let arc_lengths = cumulative_arc_length(&curve);
    let arc_length = arc_lengths.last().copied().unwrap_or(0.0);
    // Each point needs its own sample, so the sample count caps it too.
    let max_points =
        ((arc_length / config.minimum_gap).floor() as usize).min(config.spiral_samples);
    if is_undersampled(turns, config.spiral_samples) {
        tracing::debug!(
            turns,
            samples = config.spiral_samples,
            "fewer than {MIN_SAMPLES_PER_ROTATION} samples per rotation, the curve is coarse"
        );
    }

    let mut pattern_points = Vec::new();
    let mut ablation_points = Vec::new();
    let mut selected_count = 0;

    match config.spiral_sampling {
        SpiralSampling::Resampled => {
            let requested = requested_count(params.target_point_count, warnings);
            let count = requested.map_or(max_points, |n| n.min(max_points));

            let selected = select_indices(&arc_lengths, count);
            selected_count = selected.iter().filter(|&&s| s).count();

            // Targets closer together than the samples merge into one index.
            if let Some(requested) = requested
                && selected_count < requested
            {
                warnings.push(PatternWarning::PointCountClamped {
                    requested,
                    maximum: selected_count,
                });
            }

            for (p, is_selected) in curve.iter().zip(selected) {
                if !polygon.contains_point(*p) {
                    continue;
                }
                if is_selected {
                    ablation_points.push(*p);
                } else {
                    pattern_points.push(*p);
                }
            }
        }
        SpiralSampling::AllInPolygon => {
            ablation_points.extend(curve.iter().copied().filter(|p| polygon.contains_point(*p)));
        }
    }

    let metrics = PatternMetrics::Spiral {
        max_radius,
        turns,
        samples: curve.len(),
        arc_length,
        max_points,
        selected: selected_count,
        hits: ablation_points.len(),
    };
    tracing::debug!(strategy = metrics.name(), "{}", metrics.details());

    Generated {
        pattern_points,
        ablation_points: with_centroid_fallback(polygon, ablation_points, warnings),
        metrics,
    }
}
