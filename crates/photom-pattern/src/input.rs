//! Lenient parsing of pattern parameters typed by an operator.
//!
//! Bad input never aborts pattern generation: an unusable spacing is
//! replaced by the minimum gap and an unusable point count is dropped,
//! each with a warning.

use crate::diagnostics::{Axis, PatternWarning, Warnings};
use crate::types::EngineConfig;

/// Parse a spacing field.
///
/// Accepts a positive integer number of pixels, surrounding whitespace
/// allowed. Anything else yields the minimum gap (rounded up to whole
/// pixels) and an [`PatternWarning::InvalidSpacingInput`] warning.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_spacing(
    text: &str,
    axis: Axis,
    config: &EngineConfig,
    warnings: &mut Warnings,
) -> u32 {
    match text.trim().parse::<u32>() {
        Ok(value) if value > 0 => value,
        _ => {
            warnings.push(PatternWarning::InvalidSpacingInput {
                axis,
                input: text.to_string(),
            });
            config.minimum_gap.ceil().clamp(1.0, f64::from(u32::MAX)) as u32
        }
    }
}

/// Parse an optional point-count field.
///
/// An empty field means "no count". A positive integer is returned as
/// is. Anything else is ignored with an
/// [`PatternWarning::InvalidPointCount`] warning.
#[must_use]
pub fn parse_point_count(text: &str, warnings: &mut Warnings) -> Option<usize> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<usize>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            warnings.push(PatternWarning::InvalidPointCount {
                input: text.to_string(),
            });
            None
        }
    }
}
