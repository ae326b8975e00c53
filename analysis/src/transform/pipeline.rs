//! High-level pipeline API.
//!
//! Runs the stages in order, each feeding the next:
//!
//! 1. Load (parse the delimited input)
//! 2. Filter (keep accepted effect sizes)
//! 3. Normalize (one row per refactoring)
//! 4. Derive key (`change_effect_combo`)
//! 5. Aggregate (long-format counts)
//! 6. Reshape (dense matrix, absent pairs = 0)
//! 7. Emit (write CSV; printing is left to the caller)
//!
//! # Example
//!
//! ```rust,ignore
//! use perfevo::{run_pipeline, PipelineOptions};
//! use std::path::Path;
//!
//! let options = PipelineOptions {
//!     output_path: "combo.csv".into(),
//!     ..Default::default()
//! };
//! let outcome = run_pipeline(Path::new("observations.csv"), &options)?;
//! println!("{}", perfevo::render_text(&outcome.matrix));
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::combo::derive_combos;
use super::explode::{explode_refactorings, DEFAULT_SPLIT_DELIMITER};
use super::filter::{filter_by_effect_size, DEFAULT_EFFECT_SIZES};
use super::grouper::count_combos;
use super::pivot::pivot_counts;
use crate::error::{PipelineError, PipelineResult};
use crate::logs::{log_error, log_info, log_success, log_warning};
use crate::models::{ContingencyMatrix, PipelineStats};
use crate::output::write_csv;
use crate::parser::{parse_bytes, parse_file, ParseResult};

/// Output location used when none is given, relative to the working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "../../refactorings_change_effect_combo.csv";

/// Options for a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Where the matrix CSV is written
    pub output_path: PathBuf,

    /// Input delimiter; auto-detected when `None`
    pub delimiter: Option<char>,

    /// Effect sizes retained by the filter stage
    pub effect_sizes: Vec<String>,

    /// Separator inside the `refactorings` field
    pub split_delimiter: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            delimiter: None,
            effect_sizes: DEFAULT_EFFECT_SIZES.iter().map(|s| s.to_string()).collect(),
            split_delimiter: DEFAULT_SPLIT_DELIMITER.to_string(),
        }
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub matrix: ContingencyMatrix,
    pub stats: PipelineStats,
    /// File the matrix was written to
    pub output_path: PathBuf,
}

/// Run the pipeline on a file.
pub fn run_pipeline(input: &Path, options: &PipelineOptions) -> PipelineResult<PipelineOutcome> {
    log_info(format!("📖 Reading {}", input.display()));
    let parsed = parse_file(input, options.delimiter).map_err(report)?;
    run_parsed(parsed, options)
}

/// Run the pipeline on in-memory bytes.
pub fn run_pipeline_bytes(bytes: &[u8], options: &PipelineOptions) -> PipelineResult<PipelineOutcome> {
    let parsed = parse_bytes(bytes, options.delimiter, Path::new("<memory>")).map_err(report)?;
    run_parsed(parsed, options)
}

/// Build the matrix from loaded observations without writing anything.
pub fn build_matrix(
    parsed: ParseResult,
    options: &PipelineOptions,
) -> PipelineResult<(ContingencyMatrix, PipelineStats)> {
    log_success(format!(
        "Loaded {} rows (encoding {}, delimiter '{}')",
        parsed.observations.len(),
        parsed.encoding,
        format_delimiter(parsed.delimiter)
    ));
    let rows_loaded = parsed.observations.len();

    let retained = filter_by_effect_size(parsed.observations, &options.effect_sizes);
    log_info(format!(
        "🔎 Kept {} of {} rows with effect size in [{}]",
        retained.len(),
        rows_loaded,
        options.effect_sizes.join(", ")
    ));
    if retained.is_empty() {
        log_warning("No rows left after filtering; the matrix will be empty");
    }
    let rows_retained = retained.len();

    let expanded = explode_refactorings(&retained, &options.split_delimiter)?;
    log_info(format!("✂️  Expanded into {} refactoring rows", expanded.len()));
    let rows_expanded = expanded.len();

    let records = derive_combos(expanded)?;
    let counts = count_combos(&records);
    log_info(format!("📊 {} distinct (refactoring, combo) pairs", counts.len()));

    let matrix = pivot_counts(&counts)?;
    log_success(format!(
        "Matrix {} x {}",
        matrix.row_labels.len(),
        matrix.column_labels.len()
    ));

    let stats = PipelineStats {
        rows_loaded,
        rows_retained,
        rows_expanded,
        distinct_refactorings: matrix.row_labels.len(),
        distinct_combos: matrix.column_labels.len(),
        total_count: matrix.total(),
    };

    Ok((matrix, stats))
}

fn run_parsed(parsed: ParseResult, options: &PipelineOptions) -> PipelineResult<PipelineOutcome> {
    let (matrix, stats) = build_matrix(parsed, options).map_err(report)?;

    write_csv(&matrix, &options.output_path).map_err(report)?;
    log_success(format!("💾 Written to {}", options.output_path.display()));

    Ok(PipelineOutcome {
        matrix,
        stats,
        output_path: options.output_path.clone(),
    })
}

fn report(err: PipelineError) -> PipelineError {
    log_error(format!("{} stage failed", err.stage()));
    err
}

/// Format delimiter for display
fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options_in(dir: &tempfile::TempDir) -> PipelineOptions {
        PipelineOptions {
            output_path: dir.path().join("out.csv"),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_options() {
        let opts = PipelineOptions::default();
        assert_eq!(opts.output_path, PathBuf::from(DEFAULT_OUTPUT_PATH));
        assert_eq!(opts.effect_sizes, vec!["large", "small"]);
        assert_eq!(opts.split_delimiter, " + ");
        assert!(opts.delimiter.is_none());
    }

    #[test]
    fn test_options_partial_deserialize() {
        let opts: PipelineOptions = serde_json::from_str(r#"{"output_path": "x.csv"}"#).unwrap();
        assert_eq!(opts.output_path, PathBuf::from("x.csv"));
        assert_eq!(opts.effect_sizes.len(), 2);
    }

    #[test]
    fn test_run_bytes_end_to_end() {
        let dir = tempfile::TempDir::new().unwrap();
        let csv = "refactorings,change_type,effect_size_interpretation\n\
                   Extract Method + Rename Variable,regression,small\n\
                   Inline Method,improvement,large\n\
                   Inline Method,improvement,large\n\
                   Extract Method,improvement,medium\n";

        let outcome = run_pipeline_bytes(csv.as_bytes(), &options_in(&dir)).unwrap();

        assert_eq!(outcome.stats.rows_loaded, 4);
        assert_eq!(outcome.stats.rows_retained, 3);
        assert_eq!(outcome.stats.rows_expanded, 4);
        assert_eq!(outcome.matrix.total(), 4);
        assert_eq!(outcome.matrix.get("Inline Method", "improvement_large"), Some(2));
        assert_eq!(outcome.matrix.get("Inline Method", "regression_small"), Some(0));

        let written = std::fs::read_to_string(&outcome.output_path).unwrap();
        assert_eq!(
            written,
            "refactorings,improvement_large,regression_small\n\
             Extract Method,0,1\n\
             Inline Method,2,0\n\
             Rename Variable,0,1\n"
        );
    }

    #[test]
    fn test_utf8_labels_reach_matrix_and_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let csv = "refactorings,change_type,effect_size_interpretation\n\
                   Renommer Méthode + Move Method → Class,amélioration,large\n\
                   Renommer Méthode,amélioration,small\n";

        let outcome = run_pipeline_bytes(csv.as_bytes(), &options_in(&dir)).unwrap();

        assert_eq!(outcome.matrix.row_labels, vec!["Move Method → Class", "Renommer Méthode"]);
        assert_eq!(outcome.matrix.column_labels, vec!["amélioration_large", "amélioration_small"]);

        let written = std::fs::read_to_string(&outcome.output_path).unwrap();
        assert_eq!(
            written,
            "refactorings,amélioration_large,amélioration_small\n\
             Move Method → Class,1,0\n\
             Renommer Méthode,1,1\n"
        );
    }

    #[test]
    fn test_empty_split_delimiter_does_not_split() {
        let dir = tempfile::TempDir::new().unwrap();
        let options = PipelineOptions {
            split_delimiter: String::new(),
            ..options_in(&dir)
        };
        let csv = "refactorings,change_type,effect_size_interpretation\nAB,improvement,large\n";

        let outcome = run_pipeline_bytes(csv.as_bytes(), &options).unwrap();
        assert_eq!(outcome.stats.rows_expanded, 1);
        assert_eq!(outcome.matrix.row_labels, vec!["AB"]);
    }

    #[test]
    fn test_null_change_type_aborts_without_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let options = options_in(&dir);
        let csv = "refactorings,change_type,effect_size_interpretation\nExtract Method,,large\n";

        let err = run_pipeline_bytes(csv.as_bytes(), &options).unwrap_err();
        assert!(matches!(err, PipelineError::MissingField { field: "change_type", .. }));
        assert!(!options.output_path.exists());
    }

    #[test]
    fn test_null_change_type_in_dropped_row_is_ignored() {
        let dir = tempfile::TempDir::new().unwrap();
        let csv = "refactorings,change_type,effect_size_interpretation\n\
                   Extract Method,,medium\n\
                   Inline Method,improvement,large\n";

        let outcome = run_pipeline_bytes(csv.as_bytes(), &options_in(&dir)).unwrap();
        assert_eq!(outcome.matrix.row_labels, vec!["Inline Method"]);
    }

    #[test]
    fn test_format_delimiter() {
        assert_eq!(format_delimiter('\t'), "\\t");
        assert_eq!(format_delimiter(','), ",");
    }
}
