//! Transformation module.
//!
//! One submodule per pipeline stage after loading:
//! - Filter: keep accepted effect sizes
//! - Explode: split the multi-valued refactorings field
//! - Combo: derive the `change_effect_combo` key
//! - Grouper: long-format counts
//! - Pivot: dense wide matrix
//! - Pipeline: runs the stages in order

pub mod combo;
pub mod explode;
pub mod filter;
pub mod grouper;
pub mod pivot;
pub mod pipeline;

pub use combo::{combo_key, derive_combos};
pub use explode::{explode_refactorings, split_refactorings, DEFAULT_SPLIT_DELIMITER};
pub use filter::{filter_by_effect_size, is_retained, DEFAULT_EFFECT_SIZES};
pub use grouper::count_combos;
pub use pivot::pivot_counts;
pub use pipeline::*;
