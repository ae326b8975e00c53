//! Normalize stage: one row per individual refactoring.
//!
//! ```text
//! "Extract Method + Rename Variable", regression, small
//!     → "Extract Method",  regression, small   (split_index 0)
//!     → "Rename Variable", regression, small   (split_index 1)
//! ```
//!
//! Output order is (input row, split index).

use crate::error::{PipelineError, PipelineResult, Stage};
use crate::models::{ExpandedObservation, Observation, REFACTORINGS_COLUMN};

/// Separator between refactorings applied in a single observation.
pub const DEFAULT_SPLIT_DELIMITER: &str = " + ";

/// Split a refactoring list into trimmed identifiers.
///
/// A value without the delimiter yields a single identifier, and so does
/// an empty delimiter.
pub fn split_refactorings<'a>(value: &'a str, delimiter: &str) -> Vec<&'a str> {
    if delimiter.is_empty() {
        return vec![value.trim()];
    }
    value.split(delimiter).map(str::trim).collect()
}

/// Expand every observation into one row per refactoring it lists.
pub fn explode_refactorings(
    observations: &[Observation],
    delimiter: &str,
) -> PipelineResult<Vec<ExpandedObservation>> {
    let mut expanded = Vec::with_capacity(observations.len());

    for obs in observations {
        let refactorings = obs
            .refactorings
            .as_deref()
            .ok_or_else(|| PipelineError::MissingField {
                stage: Stage::Normalize,
                line: obs.line,
                field: REFACTORINGS_COLUMN,
                context: format!(
                    "change_type {:?}, effect size {:?}",
                    obs.change_type, obs.effect_size_interpretation
                ),
            })?;

        for (split_index, refactoring) in split_refactorings(refactorings, delimiter).into_iter().enumerate() {
            expanded.push(ExpandedObservation {
                line: obs.line,
                split_index,
                refactoring: refactoring.to_string(),
                change_type: obs.change_type.clone(),
                effect_size_interpretation: obs.effect_size_interpretation.clone(),
            });
        }
    }

    Ok(expanded)
}
