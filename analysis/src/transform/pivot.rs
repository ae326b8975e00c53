//! Reshape stage: long-format counts to a dense wide matrix.
//!
//! Cells are looked up in a `(row, column) → count` index while walking the
//! cross product of observed row and column labels; absent pairs become 0.

use std::collections::{BTreeSet, HashMap};

use crate::error::{PipelineError, PipelineResult};
use crate::models::{ComboCount, ContingencyMatrix};

/// Pivot counts into a [`ContingencyMatrix`].
///
/// Row and column labels are the distinct values present in `counts`,
/// sorted ascending. Two different counts for the same cell is a
/// [`PipelineError::PivotConflict`]; a repeated identical count is accepted.
pub fn pivot_counts(counts: &[ComboCount]) -> PipelineResult<ContingencyMatrix> {
    let mut index: HashMap<(&str, &str), u64> = HashMap::with_capacity(counts.len());
    let mut rows: BTreeSet<&str> = BTreeSet::new();
    let mut columns: BTreeSet<&str> = BTreeSet::new();

    for entry in counts {
        let key = (entry.refactoring.as_str(), entry.combo.as_str());
        if let Some(&existing) = index.get(&key) {
            if existing != entry.count {
                return Err(PipelineError::PivotConflict {
                    row: entry.refactoring.clone(),
                    column: entry.combo.clone(),
                    existing,
                    incoming: entry.count,
                });
            }
            continue;
        }
        index.insert(key, entry.count);
        rows.insert(key.0);
        columns.insert(key.1);
    }

    let cells = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| index.get(&(*row, *column)).copied().unwrap_or(0))
                .collect()
        })
        .collect();

    Ok(ContingencyMatrix {
        row_labels: rows.into_iter().map(String::from).collect(),
        column_labels: columns.into_iter().map(String::from).collect(),
        cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(refactoring: &str, combo: &str, count: u64) -> ComboCount {
        ComboCount {
            refactoring: refactoring.into(),
            combo: combo.into(),
            count,
        }
    }

    #[test]
    fn test_dense_fill_with_zero() {
        let matrix = pivot_counts(&[
            count("Inline Method", "improvement_large", 2),
            count("Extract Method", "regression_small", 1),
        ])
        .unwrap();

        assert_eq!(matrix.row_labels, vec!["Extract Method", "Inline Method"]);
        assert_eq!(matrix.column_labels, vec!["improvement_large", "regression_small"]);
        assert_eq!(matrix.cells, vec![vec![0, 1], vec![2, 0]]);
    }

    #[test]
    fn test_empty_counts_give_empty_matrix() {
        let matrix = pivot_counts(&[]).unwrap();
        assert!(matrix.is_empty());
        assert!(matrix.column_labels.is_empty());
    }

    #[test]
    fn test_conflicting_counts_rejected() {
        let err = pivot_counts(&[
            count("Inline Method", "improvement_large", 2),
            count("Inline Method", "improvement_large", 5),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::PivotConflict { existing: 2, incoming: 5, .. }
        ));
    }

    #[test]
    fn test_identical_duplicate_accepted() {
        let matrix = pivot_counts(&[
            count("Inline Method", "improvement_large", 2),
            count("Inline Method", "improvement_large", 2),
        ])
        .unwrap();
        assert_eq!(matrix.total(), 2);
    }
}
