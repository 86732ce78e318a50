//! Shape traces: a drawn boundary plus the pattern last applied to it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::diagnostics::PatternWarning;
use crate::pattern::{self, PatternOutput, PatternSpec};
use crate::polygon::Polygon;
use crate::types::{EngineConfig, PatternError, Point};

/// Identifier of a shape within a [`ShapeCollection`](crate::ShapeCollection).
///
/// Assigned in increasing order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShapeId(pub u64);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of a trace. Removal from the collection is the terminal
/// state and has no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceState {
    /// Boundary only.
    Drawn,
    /// A pattern has been applied.
    Patterned,
}

/// A drawn ROI and its optional pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeTrace {
    id: ShapeId,
    polygon: Polygon,
    pattern: Option<AppliedPattern>,
}

/// The spec a pattern was generated from, kept with its result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct AppliedPattern {
    spec: PatternSpec,
    output: PatternOutput,
}

impl ShapeTrace {
    /// Wrap a polygon in a trace with no pattern.
    #[must_use]
    pub const fn new(id: ShapeId, polygon: Polygon) -> Self {
        Self {
            id,
            polygon,
            pattern: None,
        }
    }

    /// Generate `spec` over this trace's polygon, replacing any previous
    /// pattern.
    ///
    /// Applying the same spec and config twice leaves the trace in the
    /// same state.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidConfig`] if `config` is invalid. The
    /// previous pattern is cleared in that case too.
    pub fn apply_pattern(
        &mut self,
        spec: &PatternSpec,
        config: &EngineConfig,
    ) -> Result<&PatternOutput, PatternError> {
        self.pattern = None;
        let output = pattern::generate(&self.polygon, spec, config)?;
        tracing::debug!(
            shape = %self.id,
            ablation = output.ablation_points.len(),
            preview = output.pattern_points.len(),
            "pattern applied"
        );
        let applied = self.pattern.insert(AppliedPattern {
            spec: *spec,
            output,
        });
        Ok(&applied.output)
    }

    /// Drop the pattern, returning to [`TraceState::Drawn`].
    pub fn clear_pattern(&mut self) {
        self.pattern = None;
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TraceState {
        if self.pattern.is_some() {
            TraceState::Patterned
        } else {
            TraceState::Drawn
        }
    }

    /// Identifier assigned by the owning collection.
    #[must_use]
    pub const fn id(&self) -> ShapeId {
        self.id
    }

    /// The boundary polygon.
    #[must_use]
    pub const fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Boundary points in drawing order.
    #[must_use]
    pub fn border_points(&self) -> &[Point] {
        self.polygon.border_points()
    }

    /// The spec of the applied pattern, if any.
    #[must_use]
    pub fn spec(&self) -> Option<&PatternSpec> {
        self.pattern.as_ref().map(|p| &p.spec)
    }

    /// The applied pattern, if any.
    #[must_use]
    pub fn output(&self) -> Option<&PatternOutput> {
        self.pattern.as_ref().map(|p| &p.output)
    }

    /// Preview points; empty when no pattern is applied.
    #[must_use]
    pub fn pattern_points(&self) -> &[Point] {
        self.output().map_or(&[], |o| &o.pattern_points)
    }

    /// Actuation path; empty when no pattern is applied.
    #[must_use]
    pub fn ablation_points(&self) -> &[Point] {
        self.output().map_or(&[], |o| &o.ablation_points)
    }

    /// Warnings from the last application; empty when no pattern is
    /// applied.
    #[must_use]
    pub fn warnings(&self) -> &[PatternWarning] {
        self.output().map_or(&[], |o| &o.warnings)
    }
}
