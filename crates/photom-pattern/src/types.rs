//! Shared types for the photom scan-pattern engine.

use serde::{Deserialize, Serialize};

use crate::bidirectional::BidirectionalStrategy;
use crate::spiral::SpiralSampling;

/// A 2D point in pixel coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Returns `true` if both coordinates are finite.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned bounding box of a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Smallest x coordinate.
    pub min_x: f64,
    /// Largest x coordinate.
    pub max_x: f64,
    /// Smallest y coordinate (top edge in screen space).
    pub min_y: f64,
    /// Largest y coordinate (bottom edge in screen space).
    pub max_y: f64,
}

impl BoundingBox {
    /// Compute the box enclosing `points`.
    ///
    /// Returns `None` for an empty slice.
    #[must_use]
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let init = Self {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        Some(points[1..].iter().fold(init, |b, p| Self {
            min_x: b.min_x.min(p.x),
            max_x: b.max_x.max(p.x),
            min_y: b.min_y.min(p.y),
            max_y: b.max_y.max(p.y),
        }))
    }

    /// Horizontal extent.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Vertical extent.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Midpoint of the box.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            f64::midpoint(self.min_x, self.max_x),
            f64::midpoint(self.min_y, self.max_y),
        )
    }

    /// The box as a `(min_x, max_x, min_y, max_y)` tuple.
    #[must_use]
    pub const fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.min_x, self.max_x, self.min_y, self.max_y)
    }
}

/// Engine-wide configuration.
///
/// The defaults match the values the laser control GUI has always used:
/// a 5 pixel minimum gap, a spiral of at least 4 turns sampled at 1000
/// parameter steps, the raster sweep and the arc-length resampled spiral.
///
/// Fields are public; call [`validate`](Self::validate) (done implicitly
/// by [`generate`](crate::generate)) before using a hand-built config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum distance in pixels between neighbouring scan points.
    ///
    /// Must be finite and strictly positive.
    pub minimum_gap: f64,

    /// Lower bound on the number of spiral turns.
    pub initial_turns: u32,

    /// Number of parametric samples taken along the spiral.
    pub spiral_samples: usize,

    /// Which traversal fills the bidirectional pattern.
    pub bidirectional_strategy: BidirectionalStrategy,

    /// How spiral samples are turned into ablation points.
    pub spiral_sampling: SpiralSampling,
}

impl EngineConfig {
    /// Default minimum gap between scan points in pixels.
    pub const DEFAULT_MINIMUM_GAP: f64 = 5.0;

    /// Default lower bound on spiral turns.
    pub const DEFAULT_INITIAL_TURNS: u32 = 4;

    /// Default number of spiral samples.
    pub const DEFAULT_SPIRAL_SAMPLES: usize = 1000;

    /// Check the invariants the generators rely on.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidConfig`] if `minimum_gap` is not a
    /// finite positive number, `initial_turns` is zero, or fewer than two
    /// spiral samples are requested.
    pub fn validate(&self) -> Result<(), PatternError> {
        if !self.minimum_gap.is_finite() || self.minimum_gap <= 0.0 {
            return Err(PatternError::InvalidConfig(format!(
                "minimum_gap must be finite and positive, got {}",
                self.minimum_gap
            )));
        }
        if self.initial_turns == 0 {
            return Err(PatternError::InvalidConfig(
                "initial_turns must be at least 1".to_string(),
            ));
        }
        if self.spiral_samples < 2 {
            return Err(PatternError::InvalidConfig(format!(
                "spiral_samples must be at least 2, got {}",
                self.spiral_samples
            )));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            minimum_gap: Self::DEFAULT_MINIMUM_GAP,
            initial_turns: Self::DEFAULT_INITIAL_TURNS,
            spiral_samples: Self::DEFAULT_SPIRAL_SAMPLES,
            bidirectional_strategy: BidirectionalStrategy::default(),
            spiral_sampling: SpiralSampling::default(),
        }
    }
}

/// Hard failures. Everything recoverable goes to the warning channel
/// instead (see [`crate::diagnostics::PatternWarning`]).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatternError {
    /// Fewer than three boundary points were supplied.
    #[error("boundary needs at least 3 points, got {points}")]
    DegenerateBoundary {
        /// Number of distinct points received.
        points: usize,
    },

    /// The boundary points all lie on one horizontal or vertical line.
    #[error("boundary has an empty bounding box ({width} x {height})")]
    CollapsedBoundary {
        /// Bounding-box width.
        width: f64,
        /// Bounding-box height.
        height: f64,
    },

    /// A boundary coordinate was NaN or infinite.
    #[error("boundary point {index} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Position of the offending point in the boundary.
        index: usize,
    },

    /// Engine configuration is invalid.
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
}
