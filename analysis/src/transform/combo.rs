//! Derive-key stage: `change_effect_combo = change_type + "_" + effect_size`.

use crate::error::{PipelineError, PipelineResult, Stage};
use crate::models::{ComboRecord, ExpandedObservation, CHANGE_TYPE_COLUMN, EFFECT_SIZE_COLUMN};

/// Build the combo key for one pair of labels.
pub fn combo_key(change_type: &str, effect_size: &str) -> String {
    format!("{}_{}", change_type, effect_size)
}

/// Attach a combo key to every expanded row.
///
/// A null source field is an error; it is never rendered as a placeholder.
pub fn derive_combos(rows: Vec<ExpandedObservation>) -> PipelineResult<Vec<ComboRecord>> {
    rows.into_iter()
        .map(|row| {
            let missing = |field: &'static str| PipelineError::MissingField {
                stage: Stage::DeriveKey,
                line: row.line,
                field,
                context: format!("refactoring '{}'", row.refactoring),
            };

            let change_type = row.change_type.as_deref().ok_or_else(|| missing(CHANGE_TYPE_COLUMN))?;
            let effect_size = row
                .effect_size_interpretation
                .as_deref()
                .ok_or_else(|| missing(EFFECT_SIZE_COLUMN))?;

            Ok(ComboRecord {
                line: row.line,
                combo: combo_key(change_type, effect_size),
                refactoring: row.refactoring.clone(),
            })
        })
        .collect()
}
