//! Score post-processing: word-level calibration and edit comparison.

pub mod edit;
pub mod word;

pub use edit::{edit_ops, EditKind, EditOp};
pub use word::word_level_min_scores;
