//! Domain models for the contingency-matrix pipeline.
//!
//! ```text
//! Observation ──filter──▶ Observation ──explode──▶ ExpandedObservation
//!     ──combo──▶ ComboRecord ──group──▶ ComboCount ──pivot──▶ ContingencyMatrix
//! ```
//!
//! Empty CSV fields are modelled as `None` (null).

use serde::{Deserialize, Serialize};

/// Column holding the `" + "`-joined refactoring identifiers.
pub const REFACTORINGS_COLUMN: &str = "refactorings";
/// Column holding the change category (e.g. improvement, regression).
pub const CHANGE_TYPE_COLUMN: &str = "change_type";
/// Column holding the effect size bucket.
pub const EFFECT_SIZE_COLUMN: &str = "effect_size_interpretation";
/// Name of the derived column axis.
pub const COMBO_COLUMN: &str = "change_effect_combo";

/// Columns the input must carry.
pub const REQUIRED_COLUMNS: [&str; 3] = [REFACTORINGS_COLUMN, CHANGE_TYPE_COLUMN, EFFECT_SIZE_COLUMN];

/// One input row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// 1-based line in the input file (the header is line 1)
    pub line: u64,
    pub refactorings: Option<String>,
    pub change_type: Option<String>,
    pub effect_size_interpretation: Option<String>,
}

/// One (observation, refactoring) pair after splitting the multi-valued field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedObservation {
    pub line: u64,
    /// Position of this identifier inside the original list
    pub split_index: usize,
    pub refactoring: String,
    pub change_type: Option<String>,
    pub effect_size_interpretation: Option<String>,
}

/// An expanded row carrying its `change_effect_combo` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboRecord {
    pub line: u64,
    pub refactoring: String,
    pub combo: String,
}

/// Long-format aggregate: one per observed (refactoring, combo) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboCount {
    pub refactoring: String,
    pub combo: String,
    pub count: u64,
}

/// Dense wide matrix: refactorings down, combos across.
///
/// `cells[r][c]` is the count for `row_labels[r]` x `column_labels[c]`;
/// absent combinations hold 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContingencyMatrix {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub cells: Vec<Vec<u64>>,
}

impl ContingencyMatrix {
    /// Matrix with no rows and no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty()
    }

    /// Cell value by labels, `None` if either label is unknown.
    pub fn get(&self, row: &str, column: &str) -> Option<u64> {
        let r = self.row_labels.iter().position(|l| l == row)?;
        let c = self.column_labels.iter().position(|l| l == column)?;
        self.cells.get(r)?.get(c).copied()
    }

    /// Sum over all cells.
    pub fn total(&self) -> u64 {
        self.cells.iter().flatten().sum()
    }
}

/// Row counts observed at each stage of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStats {
    pub rows_loaded: usize,
    pub rows_retained: usize,
    pub rows_expanded: usize,
    pub distinct_refactorings: usize,
    pub distinct_combos: usize,
    pub total_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ContingencyMatrix {
        ContingencyMatrix {
            row_labels: vec!["Extract Method".into(), "Inline Method".into()],
            column_labels: vec!["improvement_large".into(), "regression_small".into()],
            cells: vec![vec![2, 0], vec![1, 3]],
        }
    }

    #[test]
    fn test_get_by_labels() {
        let m = sample();
        assert_eq!(m.get("Inline Method", "regression_small"), Some(3));
        assert_eq!(m.get("Extract Method", "regression_small"), Some(0));
        assert_eq!(m.get("Rename Variable", "regression_small"), None);
    }

    #[test]
    fn test_total() {
        assert_eq!(sample().total(), 6);
        assert_eq!(ContingencyMatrix::empty().total(), 0);
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let stats = PipelineStats {
            rows_loaded: 4,
            ..Default::default()
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["rowsLoaded"], 4);
        assert_eq!(json["totalCount"], 0);
    }
}
