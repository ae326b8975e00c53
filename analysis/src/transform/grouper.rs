//! Aggregate stage: count rows per (refactoring, combo) pair.
//!
//! ```text
//! Combo records (long)                 →  Counts (long)
//! ┌──────────────────────────────────┐    ┌──────────────────────────────────────┐
//! │ Inline Method, improvement_large │    │ Inline Method, improvement_large, 2  │
//! │ Inline Method, improvement_large │ →  │ Extract Method, regression_small, 1  │
//! │ Extract Method, regression_small │    └──────────────────────────────────────┘
//! └──────────────────────────────────┘
//! ```
//!
//! Only observed pairs are emitted, never the full cross product.

use std::collections::BTreeMap;

use crate::models::{ComboCount, ComboRecord};

/// Group records by (refactoring, combo) and count them.
///
/// Output is sorted by refactoring, then combo.
pub fn count_combos(records: &[ComboRecord]) -> Vec<ComboCount> {
    let mut counts: BTreeMap<(&str, &str), u64> = BTreeMap::new();

    for record in records {
        *counts
            .entry((record.refactoring.as_str(), record.combo.as_str()))
            .or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|((refactoring, combo), count)| ComboCount {
            refactoring: refactoring.to_string(),
            combo: combo.to_string(),
            count,
        })
        .collect()
}
