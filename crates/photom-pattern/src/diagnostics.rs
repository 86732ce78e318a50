//! Pattern diagnostics: the structured warning channel and per-generator
//! metrics.
//!
//! Recoverable conditions (clamped spacing, clamped point count, the
//! centroid fallback) never fail a generation. They are recorded as
//! [`PatternWarning`]s on the returned [`PatternOutput`](crate::PatternOutput)
//! and logged through `tracing` at `warn` level, so a caller that cannot
//! accept a degenerate result can inspect them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Point;

/// Which spacing parameter a warning refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Column spacing.
    Horizontal,
    /// Row spacing.
    Vertical,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => f.write_str("horizontal"),
            Self::Vertical => f.write_str("vertical"),
        }
    }
}

/// A recoverable condition met while generating a pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PatternWarning {
    /// A spacing below the minimum gap was replaced by the gap.
    SpacingClamped {
        /// Which spacing was clamped.
        axis: Axis,
        /// Value supplied by the caller.
        requested: u32,
        /// Value actually used.
        applied: f64,
    },

    /// A spacing text input was not a positive integer.
    InvalidSpacingInput {
        /// Which spacing input was rejected.
        axis: Axis,
        /// The raw text.
        input: String,
    },

    /// A point count text input (or value) was not a positive integer and
    /// was ignored.
    InvalidPointCount {
        /// The raw text or value.
        input: String,
    },

    /// The spiral could not fit the requested number of points at the
    /// minimum gap.
    PointCountClamped {
        /// Requested point count.
        requested: usize,
        /// Largest achievable count.
        maximum: usize,
    },

    /// No point satisfied the constraints; the bounding-box centre was
    /// returned instead.
    CentroidFallback {
        /// The point that was returned.
        centroid: Point,
    },
}

impl fmt::Display for PatternWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpacingClamped {
                axis,
                requested,
                applied,
            } => write!(
                f,
                "{axis} spacing {requested} is below the minimum gap, using {applied}"
            ),
            Self::InvalidSpacingInput { axis, input } => {
                write!(f, "invalid {axis} spacing input {input:?}, using the minimum gap")
            }
            Self::InvalidPointCount { input } => {
                write!(f, "invalid point count {input:?}, ignoring it")
            }
            Self::PointCountClamped { requested, maximum } => write!(
                f,
                "{requested} points do not fit at the minimum gap, using {maximum}"
            ),
            Self::CentroidFallback { centroid } => write!(
                f,
                "spacing configuration is too large for the shape, using centroid ({:.1}, {:.1})",
                centroid.x, centroid.y
            ),
        }
    }
}

/// Collector for [`PatternWarning`]s.
///
/// Every pushed warning is also emitted as a `tracing` event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Warnings(Vec<PatternWarning>);

impl Warnings {
    /// Create an empty collector.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Record a warning.
    pub fn push(&mut self, warning: PatternWarning) {
        tracing::warn!("{warning}");
        self.0.push(warning);
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of recorded warnings.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Recorded warnings in order.
    #[must_use]
    pub fn as_slice(&self) -> &[PatternWarning] {
        &self.0
    }

    /// Consume the collector.
    #[must_use]
    pub fn into_vec(self) -> Vec<PatternWarning> {
        self.0
    }
}

/// Generator-specific counts describing how a pattern was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PatternMetrics {
    /// Boustrophedon raster sweep.
    Raster {
        /// Column spacing used (after clamping).
        horizontal_spacing: f64,
        /// Row spacing used (after clamping).
        vertical_spacing: f64,
        /// Lattice rows spanning the bounding box.
        rows: usize,
        /// Lattice columns spanning the bounding box.
        columns: usize,
        /// Lattice positions tested before the sweep ended.
        tested: usize,
        /// Positions that passed the containment test.
        hits: usize,
    },
    /// Breadth-first expansion from the centre.
    LatticeBfs {
        /// Column spacing used (after clamping).
        horizontal_spacing: f64,
        /// Row spacing used (after clamping).
        vertical_spacing: f64,
        /// Lattice nodes discovered inside the polygon.
        discovered: usize,
        /// Nodes emitted as ablation points.
        hits: usize,
        /// Whether the traversal ran out of reachable nodes (as opposed
        /// to stopping at the point limit).
        frontier_exhausted: bool,
    },
    /// Archimedean spiral.
    Spiral {
        /// Half the smaller bounding-box extent.
        max_radius: f64,
        /// Number of half-turns the parameter sweeps (`theta` ends at
        /// `turns * pi`).
        turns: u32,
        /// Parametric samples along the curve.
        samples: usize,
        /// Arc length of the rescaled curve in pixels.
        arc_length: f64,
        /// Largest point count the minimum gap allows.
        max_points: usize,
        /// Distinct sample indices chosen by arc-length resampling
        /// (zero in all-in-polygon mode).
        selected: usize,
        /// Selected samples that were inside the polygon.
        hits: usize,
    },
}

impl PatternMetrics {
    /// Short generator name for reports.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Raster { .. } => "Raster",
            Self::LatticeBfs { .. } => "LatticeBfs",
            Self::Spiral { .. } => "Spiral",
        }
    }

    /// Format the metrics into a one-line detail string.
    #[must_use]
    pub fn details(&self) -> String {
        match self {
            Self::Raster {
                horizontal_spacing,
                vertical_spacing,
                rows,
                columns,
                tested,
                hits,
            } => format!(
                "spacing={horizontal_spacing}x{vertical_spacing} lattice={columns}x{rows} tested={tested} hits={hits}",
            ),
            Self::LatticeBfs {
                horizontal_spacing,
                vertical_spacing,
                discovered,
                hits,
                frontier_exhausted,
            } => format!(
                "spacing={horizontal_spacing}x{vertical_spacing} discovered={discovered} hits={hits} exhausted={frontier_exhausted}",
            ),
            Self::Spiral {
                max_radius,
                turns,
                samples,
                arc_length,
                max_points,
                selected,
                hits,
            } => format!(
                "r={max_radius:.1} turns={turns} samples={samples} arc={arc_length:.1}px max_points={max_points} selected={selected} hits={hits}",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_collect_in_order() {
        let mut w = Warnings::new();
        assert!(w.is_empty());
        w.push(PatternWarning::InvalidPointCount {
            input: "abc".to_string(),
        });
        w.push(PatternWarning::PointCountClamped {
            requested: 50,
            maximum: 12,
        });
        assert_eq!(w.len(), 2);
        assert!(matches!(
            w.as_slice()[1],
            PatternWarning::PointCountClamped { maximum: 12, .. }
        ));
        assert_eq!(w.into_vec().len(), 2);
    }

    #[test]
    fn spacing_warning_display() {
        let w = PatternWarning::SpacingClamped {
            axis: Axis::Vertical,
            requested: 1,
            applied: 5.0,
        };
        assert_eq!(
            w.to_string(),
            "vertical spacing 1 is below the minimum gap, using 5"
        );
    }

    #[test]
    fn fallback_warning_display() {
        let w = PatternWarning::CentroidFallback {
            centroid: Point::new(5.0, 7.5),
        };
        assert!(w.to_string().ends_with("using centroid (5.0, 7.5)"));
    }

    #[test]
    fn metrics_details_mention_counts() {
        let m = PatternMetrics::Raster {
            horizontal_spacing: 10.0,
            vertical_spacing: 10.0,
            rows: 11,
            columns: 11,
            tested: 121,
            hits: 121,
        };
        assert_eq!(m.name(), "Raster");
        assert!(m.details().contains("lattice=11x11"));
        assert!(m.details().contains("hits=121"));
    }
}
