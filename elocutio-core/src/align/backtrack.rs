//! Trellis backtracking with boundary context extension.

use ndarray::Array2;
use tracing::warn;

/// A single frame's assignment on the best alignment path.
///
/// `time_index` and `token_index` are in emission/transcript coordinates
/// (the trellis's extra boundary row/column already subtracted out).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub token_index: usize,
    pub time_index: usize,
    /// Probability of whichever symbol — token or blank — explains this
    /// frame on the chosen path.
    pub all_score: f32,
    /// Probability of the token itself at this frame, regardless of which
    /// branch won.
    pub token_score: f32,
}

/// Whether the walk anchored the start of the transcript to the audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentStatus {
    /// The leading edge was anchored and the context countdown completed.
    Complete,
    /// The walk exhausted the frames first; the path is partial and may be
    /// truncated. Recoverable — the caller decides whether a partial score
    /// is acceptable.
    Incomplete,
}

/// Best path through the trellis, oldest frame first.
#[derive(Debug, Clone)]
pub struct AlignedPath {
    pub points: Vec<PathPoint>,
    pub status: AlignmentStatus,
}

impl AlignedPath {
    pub fn is_complete(&self) -> bool {
        self.status == AlignmentStatus::Complete
    }
}

/// Walk the trellis back from its best endpoint, producing a frame-by-frame
/// path.
///
/// The walk starts at the frame maximizing the last trellis column (first
/// maximum wins), extended forward by `extra_frames` to capture trailing
/// context, clamped to the last frame. A mirrored leading extension holds
/// the walk on the first token for `extra_frames` steps once it first tries
/// to advance past it.
///
/// Ties between advancing and staying favor staying on blank.
pub fn backtrack(
    trellis: &Array2<f32>,
    emission: &Array2<f32>,
    tokens: &[usize],
    blank_id: usize,
    extra_frames: usize,
) -> AlignedPath {
    if tokens.is_empty() {
        return AlignedPath {
            points: Vec::new(),
            status: AlignmentStatus::Complete,
        };
    }

    let mut j = trellis.ncols() - 1;

    // Best frame at which the whole token sequence is explained.
    let mut t_start = 0usize;
    let mut best = f32::NEG_INFINITY;
    for (t, &score) in trellis.column(j).iter().enumerate() {
        if score > best {
            best = score;
            t_start = t;
        }
    }
    // Trailing context window, clamped to the final frame.
    let t_start = (t_start + extra_frames).min(trellis.nrows() - 1);

    let mut countdown = extra_frames;
    let mut anchored = false;
    let mut complete = false;
    let mut points = Vec::with_capacity(t_start);

    for t in (1..=t_start).rev() {
        let stay = trellis[[t - 1, j]] + emission[[t - 1, blank_id]];
        let advance = trellis[[t - 1, j - 1]] + emission[[t - 1, tokens[j - 1]]];
        let advancing = advance > stay;

        let explained = if advancing { tokens[j - 1] } else { blank_id };
        points.push(PathPoint {
            token_index: j - 1,
            time_index: t - 1,
            all_score: emission[[t - 1, explained]].exp(),
            token_score: emission[[t - 1, tokens[j - 1]]].exp(),
        });

        if advancing {
            if !anchored && j == 1 {
                // First attempt to step past the first token: hold here and
                // run out the leading context window instead.
                anchored = true;
            } else {
                j -= 1;
            }
        }

        if anchored {
            if countdown == 0 {
                complete = true;
                break;
            }
            countdown -= 1;
            if countdown == 0 {
                complete = true;
                break;
            }
        }
    }

    let status = if complete {
        AlignmentStatus::Complete
    } else {
        warn!(
            frames = emission.nrows(),
            tokens = tokens.len(),
            "alignment failed to anchor the transcript start; returning partial path"
        );
        AlignmentStatus::Incomplete
    };

    points.reverse();
    AlignedPath { points, status }
}
