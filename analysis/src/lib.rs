//! # Perfevo - refactoring vs. performance-change contingency tables
//!
//! Reads the study's observation table and counts how often each
//! refactoring type co-occurs with each (change type, effect size) outcome.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────┐   ┌──────────┐   ┌─────────┐   ┌─────────┐   ┌─────────┐
//! │  CSV File   │──▶│ Filter  │──▶│ Explode  │──▶│  Combo  │──▶│  Group  │──▶│  Pivot  │──▶ CSV + stdout
//! │ (auto-enc)  │   │ (l / s) │   │ (" + ")  │   │ (a_b)   │   │ (long)  │   │ (dense) │
//! └─────────────┘   └─────────┘   └──────────┘   └─────────┘   └─────────┘   └─────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use perfevo::{run_pipeline, render_text, PipelineOptions};
//! use std::path::Path;
//!
//! let outcome = run_pipeline(Path::new("observations.csv"), &PipelineOptions::default())?;
//! println!("{}", render_text(&outcome.matrix));
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy and failing stage
//! - [`models`] - Observation, intermediate records, matrix
//! - [`parser`] - Load stage with encoding/delimiter detection
//! - [`transform`] - Filter, explode, combo, group, pivot and the pipeline
//! - [`output`] - Text/JSON rendering and atomic CSV writer
//! - [`logs`] - stderr logging

// Core modules
pub mod error;
pub mod models;

// Loading
pub mod parser;

// Transformation
pub mod transform;

// Emission
pub mod output;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{PipelineError, PipelineResult, Stage};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    ComboCount,
    ComboRecord,
    ContingencyMatrix,
    ExpandedObservation,
    Observation,
    PipelineStats,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_content,
    detect_delimiter,
    detect_encoding,
    parse_bytes,
    parse_file,
    CsvError,
    ParseResult,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    build_matrix,
    run_pipeline,
    run_pipeline_bytes,
    PipelineOptions,
    PipelineOutcome,
    DEFAULT_OUTPUT_PATH,
};

// =============================================================================
// Re-exports - Output
// =============================================================================

pub use output::{render_json, render_text, to_csv_bytes, write_csv};
