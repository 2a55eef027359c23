//! Forced alignment of a token sequence onto an emission matrix.
//!
//! The alignment model is monotone and blank-tolerant: each frame either
//! stays on the current token (explained as blank) or advances to the next
//! token — positions never decrease and never skip.
//!
//! ```text
//! build_trellis ─► backtrack ─► merge_repeats
//!   [T+1 × N+1]     PathPoint*     Segment*
//! ```

pub mod backtrack;
pub mod segments;
pub mod trellis;

pub use backtrack::{backtrack, AlignedPath, AlignmentStatus, PathPoint};
pub use segments::{merge_repeats, Segment};
pub use trellis::build_trellis;
