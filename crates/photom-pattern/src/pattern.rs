//! Pattern specifications, outputs and the generator entry point.

use serde::{Deserialize, Serialize};

use crate::diagnostics::{PatternMetrics, PatternWarning, Warnings};
use crate::polygon::Polygon;
use crate::types::{EngineConfig, PatternError, Point};
use crate::{bidirectional, spiral};

/// Which generator produced (or should produce) a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternKind {
    /// Rectangular lattice fill.
    Bidirectional,
    /// Archimedean spiral.
    Spiral,
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bidirectional => f.write_str("Bidirectional"),
            Self::Spiral => f.write_str("Spiral"),
        }
    }
}

/// Parameters of the bidirectional (lattice) pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidirectionalParams {
    /// Column spacing in pixels.
    pub horizontal_spacing: u32,
    /// Row spacing in pixels.
    pub vertical_spacing: u32,
    /// Stop after this many points. `None` fills the whole shape.
    #[serde(default)]
    pub target_point_count: Option<usize>,
}

/// Parameters of the spiral pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpiralParams {
    /// Number of ablation points. `None` places as many as the minimum
    /// gap allows.
    #[serde(default)]
    pub target_point_count: Option<usize>,
}

/// A pattern request: which generator to run and with what parameters.
///
/// Serialized with a `kind` tag:
///
/// ```json
/// {"kind": "bidirectional", "horizontal_spacing": 10, "vertical_spacing": 10}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatternSpec {
    /// Lattice fill.
    Bidirectional(BidirectionalParams),
    /// Spiral.
    Spiral(SpiralParams),
}

impl PatternSpec {
    /// The generator this spec selects.
    #[must_use]
    pub const fn kind(&self) -> PatternKind {
        match self {
            Self::Bidirectional(_) => PatternKind::Bidirectional,
            Self::Spiral(_) => PatternKind::Spiral,
        }
    }
}

/// Result of generating a pattern over one polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternOutput {
    /// Generator that produced the points.
    pub kind: PatternKind,

    /// Preview points shown to the operator but not actuated. Order is
    /// not meaningful.
    pub pattern_points: Vec<Point>,

    /// Points the mirror visits, in actuation order. Never empty.
    pub ablation_points: Vec<Point>,

    /// Recoverable conditions met during generation.
    pub warnings: Vec<PatternWarning>,

    /// Generator-specific counts.
    pub metrics: PatternMetrics,
}

impl PatternOutput {
    /// Returns `true` if no point fit the constraints and the centroid
    /// was substituted.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, PatternWarning::CentroidFallback { .. }))
    }

    /// Format a human-readable summary.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("{} Pattern Report\n{}", self.kind, "=".repeat(60)));
        lines.push(format!("Ablation points: {}", self.ablation_points.len()));
        lines.push(format!("Pattern points:  {}", self.pattern_points.len()));
        if let (Some(first), Some(last)) =
            (self.ablation_points.first(), self.ablation_points.last())
        {
            lines.push(format!(
                "Path: ({:.1}, {:.1}) -> ({:.1}, {:.1}), travel {:.1}px",
                first.x,
                first.y,
                last.x,
                last.y,
                travel_length(&self.ablation_points),
            ));
        }
        lines.push(String::new());

        lines.push(format!("{:<12} {}", "Generator", "Details"));
        lines.push("-".repeat(60));
        lines.push(format!(
            "{:<12} {}",
            self.metrics.name(),
            self.metrics.details()
        ));

        if !self.warnings.is_empty() {
            lines.push(String::new());
            lines.push(format!("Warnings ({})", self.warnings.len()));
            lines.push("-".repeat(60));
            for w in &self.warnings {
                lines.push(format!("  {w}"));
            }
        }

        lines.join("\n")
    }
}

/// Total length of the path through `points` in order.
fn travel_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Generate a scan pattern over `polygon`.
///
/// Pure: the same inputs always produce the same output. Recoverable
/// conditions are reported in [`PatternOutput::warnings`].
///
/// # Errors
///
/// Returns [`PatternError::InvalidConfig`] if `config` fails
/// [`EngineConfig::validate`].
pub fn generate(
    polygon: &Polygon,
    spec: &PatternSpec,
    config: &EngineConfig,
) -> Result<PatternOutput, PatternError> {
    config.validate()?;

    let _span = tracing::debug_span!("generate", kind = %spec.kind(), vertices = polygon.len())
        .entered();

    let mut warnings = Warnings::new();
    let generated = match spec {
        PatternSpec::Bidirectional(params) => {
            bidirectional::generate(polygon, params, config, &mut warnings)
        }
        PatternSpec::Spiral(params) => spiral::generate(polygon, params, config, &mut warnings),
    };

    Ok(PatternOutput {
        kind: spec.kind(),
        pattern_points: generated.pattern_points,
        ablation_points: generated.ablation_points,
        warnings: warnings.into_vec(),
        metrics: generated.metrics,
    })
}

/// Raw generator output before warnings are attached.
#[derive(Debug)]
pub(crate) struct Generated {
    pub pattern_points: Vec<Point>,
    pub ablation_points: Vec<Point>,
    pub metrics: PatternMetrics,
}

/// Normalize a requested point count: zero means "no count given".
pub(crate) fn requested_count(requested: Option<usize>, warnings: &mut Warnings) -> Option<usize> {
    match requested {
        Some(0) => {
            warnings.push(PatternWarning::InvalidPointCount {
                input: "0".to_string(),
            });
            None
        }
        other => other,
    }
}

/// Substitute the polygon centroid when no point was produced.
pub(crate) fn with_centroid_fallback(
    polygon: &Polygon,
    points: Vec<Point>,
    warnings: &mut Warnings,
) -> Vec<Point> {
    if points.is_empty() {
        let centroid = polygon.centroid();
        warnings.push(PatternWarning::CentroidFallback { centroid });
        vec![centroid]
    } else {
        points
    }
}
