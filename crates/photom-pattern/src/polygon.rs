//! ROI boundary polygon: containment and bounding box.
//!
//! A [`Polygon`] is built once from the points of a user-drawn shape and
//! never mutated afterwards. It only answers two questions: which box
//! encloses it, and whether a point is inside it.
//!
//! # Containment rule
//!
//! Containment uses the even-odd rule: a horizontal ray cast from the
//! point crosses the boundary an odd number of times iff the point is
//! inside. Points lying on the boundary itself (on an edge or a vertex,
//! within [`BOUNDARY_TOLERANCE`]) count as **inside**, i.e. the polygon is
//! treated as a closed set. Lattices aligned with an axis-aligned
//! boundary therefore keep their outermost rows and columns.

use serde::{Deserialize, Serialize};

use crate::types::{BoundingBox, PatternError, Point};

/// Distance in pixels within which a point is considered to lie on the
/// boundary.
pub const BOUNDARY_TOLERANCE: f64 = 1e-9;

/// A closed, immutable boundary of at least three points.
///
/// The last point implicitly connects back to the first. Serialized as a
/// plain list of points; deserialization re-runs validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Polygon {
    points: Vec<Point>,
    bounds: BoundingBox,
}

impl Polygon {
    /// Build a polygon from its boundary points.
    ///
    /// A trailing point equal to the first one (a shape that was closed
    /// explicitly by re-adding its start point) is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::NonFiniteCoordinate`] if any coordinate is
    /// NaN or infinite, [`PatternError::DegenerateBoundary`] if fewer
    /// than three points remain, and [`PatternError::CollapsedBoundary`]
    /// if the bounding box has zero width or height.
    pub fn new(mut points: Vec<Point>) -> Result<Self, PatternError> {
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(PatternError::NonFiniteCoordinate { index });
        }

        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }

        if points.len() < 3 {
            return Err(PatternError::DegenerateBoundary {
                points: points.len(),
            });
        }

        let bounds = BoundingBox::from_points(&points).ok_or(PatternError::DegenerateBoundary {
            points: points.len(),
        })?;

        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return Err(PatternError::CollapsedBoundary {
                width: bounds.width(),
                height: bounds.height(),
            });
        }

        Ok(Self { points, bounds })
    }

    /// Build a polygon from `(x, y)` pairs.
    ///
    /// # Errors
    ///
    /// Same as [`Polygon::new`].
    pub fn from_coords(coords: &[(f64, f64)]) -> Result<Self, PatternError> {
        Self::new(coords.iter().copied().map(Point::from).collect())
    }

    /// The boundary points in drawing order (without a closing duplicate).
    #[must_use]
    pub fn border_points(&self) -> &[Point] {
        &self.points
    }

    /// Number of boundary points.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: a valid polygon has at least three points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Axis-aligned box enclosing every boundary point.
    #[must_use]
    pub const fn bounding_box(&self) -> BoundingBox {
        self.bounds
    }

    /// Centre of the bounding box.
    ///
    /// This is the point the generators fall back to when no lattice or
    /// spiral point lands inside the shape. For concave shapes it may lie
    /// outside the polygon.
    #[must_use]
    pub fn centroid(&self) -> Point {
        self.bounds.center()
    }

    /// Even-odd containment test; boundary points count as inside.
    #[must_use]
    pub fn contains_point(&self, p: Point) -> bool {
        if !p.is_finite() {
            return false;
        }
        if p.x < self.bounds.min_x - BOUNDARY_TOLERANCE
            || p.x > self.bounds.max_x + BOUNDARY_TOLERANCE
            || p.y < self.bounds.min_y - BOUNDARY_TOLERANCE
            || p.y > self.bounds.max_y + BOUNDARY_TOLERANCE
        {
            return false;
        }
        if self.edges().any(|(a, b)| on_segment(p, a, b)) {
            return true;
        }
        self.crossings(p) % 2 == 1
    }

    /// Iterate over the closed edge list `(p[i-1], p[i])`, starting with
    /// the closing edge from the last point to the first.
    fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[(i + n - 1) % n], self.points[i]))
    }

    /// Count boundary crossings of a ray cast from `p` towards +x.
    ///
    /// Each edge is half-open in y, so a ray passing exactly through a
    /// vertex is counted once.
    fn crossings(&self, p: Point) -> usize {
        self.edges()
            .filter(|&(a, b)| {
                (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x
            })
            .count()
    }
}

impl TryFrom<Vec<Point>> for Polygon {
    type Error = PatternError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<Polygon> for Vec<Point> {
    fn from(polygon: Polygon) -> Self {
        polygon.points
    }
}

/// Returns `true` if `p` lies within [`BOUNDARY_TOLERANCE`] of segment `ab`.
fn on_segment(p: Point, a: Point, b: Point) -> bool {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx.mul_add(dx, dy * dy);
    let closest = if len_sq == 0.0 {
        a
    } else {
        let t = ((p.x - a.x).mul_add(dx, (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
        Point::new(t.mul_add(dx, a.x), t.mul_add(dy, a.y))
    };
    p.distance_squared(closest) <= BOUNDARY_TOLERANCE * BOUNDARY_TOLERANCE
}
