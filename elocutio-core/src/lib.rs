//! # elocutio-core
//!
//! Pronunciation scoring engine: forced alignment of an expected
//! transcript onto an acoustic model's emission matrix, with per-symbol
//! confidence calibration and an edit-distance comparison against the
//! model's greedy decoding.
//!
//! ## Architecture
//!
//! ```text
//! logits [T×V] ─► Calibrator ─► TrellisBuilder ─► Backtracker ─► SegmentMerger
//!       │                                                             │
//!       └─► GreedyDecoder ─► EditAligner                   WordScoreCalibrator
//!                                 │                                   │
//!                                 └──────────► ScoreReport ◄──────────┘
//! ```
//!
//! The acoustic model and the transport layer are external collaborators:
//! this crate starts at the emission matrix and ends at the serializable
//! report. Every operation is a synchronous pure function over its inputs.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod align;
pub mod calibrate;
pub mod decode;
pub mod engine;
pub mod error;
pub mod report;
pub mod scoring;
pub mod text;

// Convenience re-exports for downstream crates
pub use align::{AlignedPath, AlignmentStatus, PathPoint, Segment};
pub use engine::{Scorer, ScorerConfig};
pub use error::{Result, ScoreError};
pub use report::ScoreReport;
pub use scoring::{EditKind, EditOp};
pub use text::{normalize, spaced, Vocabulary, WORD_DELIMITER};
