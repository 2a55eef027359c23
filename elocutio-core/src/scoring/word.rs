//! Word-gated symbol scores.
//!
//! A word's perceived correctness is gated by its weakest symbol, not the
//! average: every symbol inside a word takes the minimum segment score
//! observed anywhere in that word. Delimiter symbols keep their own score.

use crate::align::Segment;
use crate::error::{Result, ScoreError};

/// Re-derive per-symbol scores so each word's symbols share the word
/// minimum.
///
/// `segments` must line up one-to-one with the characters of `transcript`.
///
/// # Errors
/// [`ScoreError::SegmentCountMismatch`] when the lengths differ.
pub fn word_level_min_scores(
    segments: &[Segment],
    transcript: &str,
    delimiter: char,
) -> Result<Vec<f32>> {
    let chars: Vec<char> = transcript.chars().collect();
    if segments.len() != chars.len() {
        return Err(ScoreError::SegmentCountMismatch {
            segments: segments.len(),
            transcript: chars.len(),
        });
    }

    let mut out = Vec::with_capacity(chars.len());
    let mut word: Vec<f32> = Vec::new();

    for (seg, &ch) in segments.iter().zip(&chars) {
        if ch == delimiter {
            flush(&mut out, &mut word);
            // The delimiter keeps its own segment score.
            out.push(seg.score);
        } else {
            word.push(seg.score);
        }
    }
    flush(&mut out, &mut word);

    Ok(out)
}

/// Replace every buffered score with the buffer minimum, count-for-count.
fn flush(out: &mut Vec<f32>, word: &mut Vec<f32>) {
    if word.is_empty() {
        return;
    }
    let min = word.iter().copied().fold(f32::INFINITY, f32::min);
    out.extend(std::iter::repeat(min).take(word.len()));
    word.clear();
}
