//! Filter stage: keep observations whose effect size is in the accepted set.
//!
//! Matching is exact and case-sensitive. Empty (null) values never match.
//! Dropped rows are not errors; they are only logged at debug level.

use tracing::debug;

use crate::models::Observation;

/// Effect sizes retained by default.
pub const DEFAULT_EFFECT_SIZES: [&str; 2] = ["large", "small"];

/// Return `true` if `effect_size` is exactly one of `accepted`.
pub fn is_retained(effect_size: Option<&str>, accepted: &[String]) -> bool {
    match effect_size {
        Some(value) => accepted.iter().any(|a| a == value),
        None => false,
    }
}

/// Keep only the observations whose `effect_size_interpretation` is accepted.
pub fn filter_by_effect_size(observations: Vec<Observation>, accepted: &[String]) -> Vec<Observation> {
    observations
        .into_iter()
        .filter(|obs| {
            let keep = is_retained(obs.effect_size_interpretation.as_deref(), accepted);
            if !keep {
                debug!(
                    line = obs.line,
                    effect_size = ?obs.effect_size_interpretation,
                    "dropping row"
                );
            }
            keep
        })
        .collect()
}
