//! Emit stage: render the matrix for the console and persist it as CSV.
//!
//! The CSV file is built fully in memory, written to a temporary file in the
//! destination directory and renamed over the target, so a failed run never
//! leaves a half-written file behind. An existing file is replaced.

use std::io::Write;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::models::{ContingencyMatrix, COMBO_COLUMN, REFACTORINGS_COLUMN};

/// Column gap in the text rendering.
const GAP: &str = "  ";

/// Render the matrix as an aligned text table.
///
/// ```text
/// change_effect_combo  improvement_large  regression_small
/// refactorings
/// Extract Method                       1                 1
/// ```
pub fn render_text(matrix: &ContingencyMatrix) -> String {
    let label_width = matrix
        .row_labels
        .iter()
        .map(|l| l.chars().count())
        .chain([COMBO_COLUMN.len(), REFACTORINGS_COLUMN.len()])
        .max()
        .unwrap_or(0);

    let column_widths: Vec<usize> = matrix
        .column_labels
        .iter()
        .enumerate()
        .map(|(c, label)| {
            let widest_cell = matrix
                .cells
                .iter()
                .filter_map(|row| row.get(c))
                .map(|v| v.to_string().len())
                .max()
                .unwrap_or(1);
            label.chars().count().max(widest_cell)
        })
        .collect();

    let mut lines = Vec::with_capacity(matrix.row_labels.len() + 2);

    let mut header = pad_right(COMBO_COLUMN, label_width);
    for (label, width) in matrix.column_labels.iter().zip(&column_widths) {
        header.push_str(GAP);
        header.push_str(&pad_left(label, *width));
    }
    lines.push(header);
    lines.push(REFACTORINGS_COLUMN.to_string());

    for (label, row) in matrix.row_labels.iter().zip(&matrix.cells) {
        let mut line = pad_right(label, label_width);
        for (value, width) in row.iter().zip(&column_widths) {
            line.push_str(GAP);
            line.push_str(&pad_left(&value.to_string(), *width));
        }
        lines.push(line);
    }

    lines
        .iter()
        .map(|l| l.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

fn pad_right(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{}", s, " ".repeat(width.saturating_sub(len)))
}

fn pad_left(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{}", " ".repeat(width.saturating_sub(len)), s)
}

/// Render the matrix as pretty JSON.
pub fn render_json(matrix: &ContingencyMatrix) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(matrix)
}

/// Serialize the matrix to CSV: label column first, then one column per combo.
pub fn to_csv_bytes(matrix: &ContingencyMatrix) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let mut header = Vec::with_capacity(matrix.column_labels.len() + 1);
    header.push(REFACTORINGS_COLUMN);
    header.extend(matrix.column_labels.iter().map(String::as_str));
    writer.write_record(&header)?;

    for (label, row) in matrix.row_labels.iter().zip(&matrix.cells) {
        let mut record = Vec::with_capacity(row.len() + 1);
        record.push(label.clone());
        record.extend(row.iter().map(u64::to_string));
        writer.write_record(&record)?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))
}

/// Write the matrix to `path`, replacing any existing file.
pub fn write_csv(matrix: &ContingencyMatrix, path: &Path) -> PipelineResult<()> {
    let write_err = |source: std::io::Error| PipelineError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let bytes = to_csv_bytes(matrix).map_err(|e| write_err(std::io::Error::other(e)))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(&bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ContingencyMatrix {
        ContingencyMatrix {
            row_labels: vec!["Extract Method".into(), "Rename Variable".into()],
            column_labels: vec!["improvement_large".into(), "regression_small".into()],
            cells: vec![vec![12, 1], vec![0, 1]],
        }
    }

    #[test]
    fn test_csv_layout() {
        let csv = String::from_utf8(to_csv_bytes(&sample()).unwrap()).unwrap();
        assert_eq!(
            csv,
            "refactorings,improvement_large,regression_small\n\
             Extract Method,12,1\n\
             Rename Variable,0,1\n"
        );
    }

    #[test]
    fn test_csv_empty_matrix_has_header() {
        let csv = String::from_utf8(to_csv_bytes(&ContingencyMatrix::empty()).unwrap()).unwrap();
        assert_eq!(csv, "refactorings\n");
    }

    #[test]
    fn test_csv_quotes_labels_with_delimiter() {
        let matrix = ContingencyMatrix {
            row_labels: vec!["Move, Rename".into()],
            column_labels: vec!["improvement_large".into()],
            cells: vec![vec![1]],
        };
        let csv = String::from_utf8(to_csv_bytes(&matrix).unwrap()).unwrap();
        assert!(csv.contains("\"Move, Rename\",1"));
    }

    #[test]
    fn test_text_alignment() {
        let text = render_text(&sample());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("change_effect_combo"));
        assert_eq!(lines[1], "refactorings");
        assert!(lines[2].starts_with("Extract Method"));
        assert!(lines[2].ends_with(" 1"));
        // value columns line up with their headers
        assert_eq!(lines[0].len(), lines[2].len());
        assert_eq!(lines[0].len(), lines[3].len());
    }

    #[test]
    fn test_text_empty_matrix() {
        let text = render_text(&ContingencyMatrix::empty());
        assert_eq!(text, "change_effect_combo\nrefactorings");
    }

    #[test]
    fn test_json_render() {
        let json: serde_json::Value = serde_json::from_str(&render_json(&sample()).unwrap()).unwrap();
        assert_eq!(json["row_labels"][0], "Extract Method");
        assert_eq!(json["cells"][0][0], 12);
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale contents that are longer than the new file\n").unwrap();

        write_csv(&sample(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("refactorings,"));
        assert!(!written.contains("stale"));
    }

    #[test]
    fn test_write_missing_parent_is_output_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let err = write_csv(&sample(), &path).unwrap_err();
        assert!(matches!(err, PipelineError::OutputWrite { .. }));
        assert!(!path.exists());
    }
}
