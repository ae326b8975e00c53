//! Error types for the contingency-matrix pipeline.
//!
//! Every failure is fatal for the run. Each [`PipelineError`] variant names
//! the [`Stage`] it came from and carries enough context (file path, line
//! number, key values) to locate the offending input without re-running.
//!
//! - [`PipelineError::InputNotFound`] - input path missing or unreadable
//! - [`PipelineError::Schema`] - required column absent from the header
//! - [`PipelineError::Parse`] - malformed row (e.g. wrong field count)
//! - [`PipelineError::MissingField`] - empty value where one is required
//! - [`PipelineError::PivotConflict`] - two counts for one matrix cell
//! - [`PipelineError::OutputWrite`] - destination unwritable

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::parser::CsvError;

// =============================================================================
// Stages
// =============================================================================

/// Pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Filter,
    Normalize,
    DeriveKey,
    Aggregate,
    Reshape,
    Emit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Load => "load",
            Self::Filter => "filter",
            Self::Normalize => "normalize",
            Self::DeriveKey => "derive key",
            Self::Aggregate => "aggregate",
            Self::Reshape => "reshape",
            Self::Emit => "emit",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Pipeline Errors
// =============================================================================

/// Errors returned by [`crate::transform::pipeline::run_pipeline`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input file missing or unreadable.
    #[error("load: cannot read input file '{}': {source}", .path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Header lacks one or more required columns.
    #[error(
        "load: input '{}' is missing required column(s): {} (found: {})",
        .path.display(),
        .missing.join(", "),
        .found.join(", ")
    )]
    Schema {
        path: PathBuf,
        missing: Vec<String>,
        found: Vec<String>,
    },

    /// Malformed row structure.
    #[error("load: malformed input '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: CsvError,
    },

    /// A field that must be present at the point of use is empty.
    #[error("{stage}: line {line}: required field '{field}' is empty ({context})")]
    MissingField {
        stage: Stage,
        line: u64,
        field: &'static str,
        context: String,
    },

    /// The same matrix cell would receive two different counts.
    #[error(
        "reshape: conflicting counts for cell ('{row}', '{column}'): {existing} vs {incoming}"
    )]
    PivotConflict {
        row: String,
        column: String,
        existing: u64,
        incoming: u64,
    },

    /// Destination could not be written.
    #[error("emit: cannot write output file '{}': {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Stage that raised this error.
    pub fn stage(&self) -> Stage {
        match self {
            Self::InputNotFound { .. } | Self::Schema { .. } | Self::Parse { .. } => Stage::Load,
            Self::MissingField { stage, .. } => *stage,
            Self::PivotConflict { .. } => Stage::Reshape,
            Self::OutputWrite { .. } => Stage::Emit,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
