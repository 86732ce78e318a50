//! Bidirectional pattern: fill the polygon interior with a rectangular
//! lattice of ablation points.
//!
//! This module defines the [`LatticeFill`] trait for pluggable lattice
//! traversals and the [`BidirectionalStrategy`] enum for selecting one at
//! runtime.
//!
//! # Strategy pattern
//!
//! Both traversals visit the same lattice spacing but in a different
//! order, which is what matters to the mirror:
//!
//! - [`Raster`](BidirectionalStrategy::Raster) sweeps rows top to bottom,
//!   alternating direction every row (boustrophedon), starting at the
//!   bounding box's top-left corner.
//! - [`LatticeBfs`](BidirectionalStrategy::LatticeBfs) grows outward from
//!   the bounding-box centre in breadth-first order, so consecutive points
//!   stay close and the ablated area expands from the middle.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Axis, PatternMetrics, PatternWarning, Warnings};
use crate::pattern::{BidirectionalParams, Generated, requested_count, with_centroid_fallback};
use crate::polygon::Polygon;
use crate::types::{EngineConfig, Point};

/// Slack added before flooring lattice extents so that a box whose size
/// is an exact multiple of the spacing keeps its last row/column despite
/// rounding.
const LATTICE_EPSILON: f64 = 1e-9;

/// Neighbour offsets in lattice units, in visiting order: up, right,
/// down, left (screen space, y down).
const NEIGHBOURS: [(i64, i64); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Selects which lattice traversal fills the bidirectional pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BidirectionalStrategy {
    /// Row-by-row snake sweep from the top-left corner.
    #[default]
    Raster,

    /// Breadth-first expansion over a 4-connected lattice from the
    /// bounding-box centre.
    LatticeBfs,
}

/// Lattice spacing in pixels, already clamped to the minimum gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    /// Distance between columns.
    pub horizontal: f64,
    /// Distance between rows.
    pub vertical: f64,
}

/// Trait for lattice traversal strategies.
///
/// Implementations return inside-polygon lattice points in actuation
/// order, stopping after `limit` points when one is given. They never
/// apply the centroid fallback themselves.
pub trait LatticeFill {
    /// Traverse the lattice over `polygon`.
    fn fill(
        &self,
        polygon: &Polygon,
        spacing: Spacing,
        limit: Option<usize>,
    ) -> (Vec<Point>, PatternMetrics);
}

impl LatticeFill for BidirectionalStrategy {
    fn fill(
        &self,
        polygon: &Polygon,
        spacing: Spacing,
        limit: Option<usize>,
    ) -> (Vec<Point>, PatternMetrics) {
        match *self {
            Self::Raster => fill_raster(polygon, spacing, limit),
            Self::LatticeBfs => fill_lattice_bfs(polygon, spacing, limit),
        }
    }
}

/// Generate the bidirectional pattern for `polygon`.
///
/// Spacings below `config.minimum_gap` are clamped with a warning; an
/// empty traversal falls back to the centroid with a warning.
pub(crate) fn generate(
    polygon: &Polygon,
    params: &BidirectionalParams,
    config: &EngineConfig,
    warnings: &mut Warnings,
) -> Generated {
    let spacing = Spacing {
        horizontal: clamp_spacing(
            params.horizontal_spacing,
            Axis::Horizontal,
            config.minimum_gap,
            warnings,
        ),
        vertical: clamp_spacing(
            params.vertical_spacing,
            Axis::Vertical,
            config.minimum_gap,
            warnings,
        ),
    };
    let limit = requested_count(params.target_point_count, warnings);

    let (points, metrics) = config.bidirectional_strategy.fill(polygon, spacing, limit);
    tracing::debug!(strategy = metrics.name(), "{}", metrics.details());

    Generated {
        pattern_points: Vec::new(),
        ablation_points: with_centroid_fallback(polygon, points, warnings),
        metrics,
    }
}

/// Replace a spacing smaller than the minimum gap by the gap itself.
pub(crate) fn clamp_spacing(
    requested: u32,
    axis: Axis,
    minimum_gap: f64,
    warnings: &mut Warnings,
) -> f64 {
    let value = f64::from(requested);
    if value < minimum_gap {
        warnings.push(PatternWarning::SpacingClamped {
            axis,
            requested,
            applied: minimum_gap,
        });
        minimum_gap
    } else {
        value
    }
}

/// Number of lattice positions `0, spacing, 2*spacing, ...` that fit in
/// `extent`. Saturates at `usize::MAX` for spacings tiny next to the
/// extent.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lattice_steps(extent: f64, spacing: f64) -> usize {
    ((extent / spacing + LATTICE_EPSILON).floor() as usize).saturating_add(1)
}

/// Boustrophedon sweep over the bounding-box lattice.
///
/// Even rows run left to right, odd rows right to left, over the same
/// column positions so the result is a true lattice.
#[allow(clippy::cast_precision_loss)]
fn fill_raster(
    polygon: &Polygon,
    spacing: Spacing,
    limit: Option<usize>,
) -> (Vec<Point>, PatternMetrics) {
    let bounds = polygon.bounding_box();
    let columns = lattice_steps(bounds.width(), spacing.horizontal);
    let rows = lattice_steps(bounds.height(), spacing.vertical);

    let mut points = Vec::new();
    let mut tested = 0;

    'sweep: for row in 0..rows {
        let y = (row as f64).mul_add(spacing.vertical, bounds.min_y);
        let left_to_right = row % 2 == 0;

        for step in 0..columns {
            if limit.is_some_and(|n| points.len() >= n) {
                break 'sweep;
            }
            let column = if left_to_right {
                step
            } else {
                columns - 1 - step
            };
            let x = (column as f64).mul_add(spacing.horizontal, bounds.min_x);
            let p = Point::new(x, y);
            tested += 1;
            if polygon.contains_point(p) {
                points.push(p);
            }
        }
    }

    let hits = points.len();
    (
        points,
        PatternMetrics::Raster {
            horizontal_spacing: spacing.horizontal,
            vertical_spacing: spacing.vertical,
            rows,
            columns,
            tested,
            hits,
        },
    )
}

/// Breadth-first traversal of the lattice anchored at the centroid.
///
/// Lattice nodes are tracked by integer offsets from the centroid so
/// floating-point positions never need to be hashed.
#[allow(clippy::cast_precision_loss)]
fn fill_lattice_bfs(
    polygon: &Polygon,
    spacing: Spacing,
    limit: Option<usize>,
) -> (Vec<Point>, PatternMetrics) {
    let origin = polygon.centroid();
    let position = |(col, row): (i64, i64)| {
        Point::new(
            (col as f64).mul_add(spacing.horizontal, origin.x),
            (row as f64).mul_add(spacing.vertical, origin.y),
        )
    };

    let mut points = Vec::new();
    let mut discovered: HashSet<(i64, i64)> = HashSet::new();
    let mut queue: VecDeque<(i64, i64)> = VecDeque::new();

    if polygon.contains_point(origin) {
        discovered.insert((0, 0));
        queue.push_back((0, 0));
    }

    while !limit.is_some_and(|n| points.len() >= n) {
        let Some(node) = queue.pop_front() else {
            break;
        };
        points.push(position(node));

        for (dc, dr) in NEIGHBOURS {
            let next = (node.0 + dc, node.1 + dr);
            if !discovered.contains(&next) && polygon.contains_point(position(next)) {
                discovered.insert(next);
                queue.push_back(next);
            }
        }
    }

    let hits = points.len();
    (
        points,
        PatternMetrics::LatticeBfs {
            horizontal_spacing: spacing.horizontal,
            vertical_spacing: spacing.vertical,
            discovered: discovered.len(),
            hits,
            frontier_exhausted: queue.is_empty(),
        },
    )
}
