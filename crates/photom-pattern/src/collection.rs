//! The set of shapes drawn during a session.

use std::collections::BTreeMap;

use crate::polygon::Polygon;
use crate::trace::{ShapeId, ShapeTrace};
use crate::types::{PatternError, Point};

/// Owns every [`ShapeTrace`] of a session, keyed by [`ShapeId`].
///
/// Ids come from a running counter; removing a shape never frees its id
/// for reuse. Iteration is in id order, which is drawing order.
#[derive(Debug, Clone, Default)]
pub struct ShapeCollection {
    shapes: BTreeMap<ShapeId, ShapeTrace>,
    next_id: u64,
}

impl ShapeCollection {
    /// Create an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            shapes: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Add a shape from its boundary points and return its id.
    ///
    /// # Errors
    ///
    /// Returns the [`Polygon::new`] error if the boundary is invalid. No
    /// id is consumed in that case.
    pub fn insert(&mut self, boundary: Vec<Point>) -> Result<ShapeId, PatternError> {
        let polygon = Polygon::new(boundary)?;
        Ok(self.insert_polygon(polygon))
    }

    /// Add an already validated polygon and return its id.
    pub fn insert_polygon(&mut self, polygon: Polygon) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        tracing::debug!(shape = %id, vertices = polygon.len(), "shape added");
        self.shapes.insert(id, ShapeTrace::new(id, polygon));
        id
    }

    /// Look up a shape.
    #[must_use]
    pub fn get(&self, id: ShapeId) -> Option<&ShapeTrace> {
        self.shapes.get(&id)
    }

    /// Look up a shape for modification (e.g. to apply a pattern).
    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut ShapeTrace> {
        self.shapes.get_mut(&id)
    }

    /// Delete a shape, returning it if it existed.
    pub fn remove(&mut self, id: ShapeId) -> Option<ShapeTrace> {
        let removed = self.shapes.remove(&id);
        if removed.is_some() {
            tracing::debug!(shape = %id, "shape removed");
        }
        removed
    }

    /// Number of shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if the collection holds no shapes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shapes in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ShapeTrace> {
        self.shapes.values()
    }

    /// Shapes in id order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ShapeTrace> {
        self.shapes.values_mut()
    }
}

impl<'a> IntoIterator for &'a ShapeCollection {
    type Item = &'a ShapeTrace;
    type IntoIter = std::collections::btree_map::Values<'a, ShapeId, ShapeTrace>;

    fn into_iter(self) -> Self::IntoIter {
        self.shapes.values()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pattern::{PatternSpec, SpiralParams};
    use crate::trace::TraceState;
    use crate::types::EngineConfig;

    fn triangle(offset: f64) -> Vec<Point> {
        vec![
            Point::new(offset, 0.0),
            Point::new(offset + 50.0, 0.0),
            Point::new(offset, 50.0),
        ]
    }

    #[test]
    fn ids_increase_and_are_not_reused() {
        let mut shapes = ShapeCollection::new();
        let a = shapes.insert(triangle(0.0)).unwrap();
        let b = shapes.insert(triangle(100.0)).unwrap();
        assert_eq!((a, b), (ShapeId(0), ShapeId(1)));

        assert!(shapes.remove(b).is_some());
        let c = shapes.insert(triangle(200.0)).unwrap();
        assert_eq!(c, ShapeId(2));
        assert_eq!(shapes.len(), 2);
    }

    #[test]
    fn invalid_boundary_consumes_no_id() {
        let mut shapes = ShapeCollection::new();
        let err = shapes
            .insert(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)])
            .unwrap_err();
        assert_eq!(err, PatternError::DegenerateBoundary { points: 2 });
        assert!(shapes.is_empty());
        assert_eq!(shapes.insert(triangle(0.0)).unwrap(), ShapeId(0));
    }

    #[test]
    fn remove_missing_is_none() {
        let mut shapes = ShapeCollection::new();
        assert!(shapes.remove(ShapeId(4)).is_none());
    }

    #[test]
    fn patterns_are_applied_through_get_mut() {
        let mut shapes = ShapeCollection::new();
        let id = shapes.insert(triangle(0.0)).unwrap();
        let spec = PatternSpec::Spiral(SpiralParams::default());
        shapes
            .get_mut(id)
            .unwrap()
            .apply_pattern(&spec, &EngineConfig::default())
            .unwrap();
        assert_eq!(shapes.get(id).unwrap().state(), TraceState::Patterned);
    }

    #[test]
    fn iteration_is_in_drawing_order() {
        let mut shapes = ShapeCollection::new();
        for i in 0..4 {
            shapes.insert(triangle(f64::from(i) * 60.0)).unwrap();
        }
        shapes.remove(ShapeId(1));
        let ids: Vec<ShapeId> = shapes.iter().map(ShapeTrace::id).collect();
        assert_eq!(ids, vec![ShapeId(0), ShapeId(2), ShapeId(3)]);
        assert_eq!((&shapes).into_iter().count(), 3);
    }
}
