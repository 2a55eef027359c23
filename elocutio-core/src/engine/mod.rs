//! `Scorer` — per-request scoring pipeline.
//!
//! ## Pipeline stages (per request)
//!
//! ```text
//! logits [T×V] ──► calibrate ──► build_trellis ──► backtrack ──► merge_repeats
//!      │                                                              │
//!      │                                              word_level_min_scores
//!      │                                                              │
//!      └──► greedy_decode ──► edit_ops ◄── normalized transcript      │
//!                 │               │                                   │
//!                 └───────────────┴───────────► ScoreReport ◄─────────┘
//! ```
//!
//! Every stage is a synchronous pure function; the scorer holds nothing
//! but its configuration, so one instance may serve concurrent requests
//! from parallel workers without locking. The trellis is the dominant
//! transient allocation (O(T·N) floats) and is dropped before this
//! function returns.

use ndarray::Array2;
use tracing::{debug, warn};

use crate::align::{backtrack, build_trellis, merge_repeats, AlignmentStatus, Segment};
use crate::calibrate::calibrate;
use crate::decode::greedy_decode;
use crate::error::{Result, ScoreError};
use crate::report::ScoreReport;
use crate::scoring::{edit_ops, word_level_min_scores};
use crate::text::{normalize, spaced, Vocabulary, WORD_DELIMITER};

/// Configuration for [`Scorer`].
#[derive(Debug, Clone)]
pub struct ScorerConfig {
    /// Softmax temperature applied to raw logits. Must be positive.
    /// Default: 1.0.
    pub temperature: f32,
    /// Size of the per-frame top-k calibration window. Values covering the
    /// whole vocabulary degenerate to plain log-softmax. Default: 3.
    pub top_k: usize,
    /// Boundary context window: frames appended past the best alignment
    /// endpoint and held before its start. Default: 2.
    pub extra_frames: usize,
    /// Score segments by their best token frame rather than the mean over
    /// blank-explained frames. Default: true.
    pub ignore_blank: bool,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_k: 3,
            extra_frames: 2,
            ignore_blank: true,
        }
    }
}

/// Alignment outcome before score post-processing.
#[derive(Debug, Clone)]
pub struct AlignmentResult {
    pub segments: Vec<Segment>,
    pub status: AlignmentStatus,
}

/// The scoring pipeline orchestrator.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    config: ScorerConfig,
}

impl Scorer {
    pub fn new(config: ScorerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Score a spoken utterance against its expected transcript.
    ///
    /// `logits` is the acoustic model's raw emission matrix, `transcript`
    /// the expected text (raw or already normalized — normalization is
    /// idempotent).
    ///
    /// # Errors
    /// The `InvalidArgument` family: empty transcript or emission, unknown
    /// transcript symbol, vocabulary indices outside the emission width,
    /// non-positive temperature. An unanchored alignment is *not* an
    /// error; it surfaces as `alignment_complete = false` with the partial
    /// scores.
    pub fn score(
        &self,
        logits: &Array2<f32>,
        vocab: &Vocabulary,
        transcript: &str,
    ) -> Result<ScoreReport> {
        let normalized = normalize(transcript);
        if normalized.is_empty() {
            return Err(ScoreError::EmptyTranscript);
        }
        if logits.nrows() == 0 {
            return Err(ScoreError::EmptyEmission);
        }

        let tokens = vocab.token_ids(&normalized)?;
        let blank = vocab.blank_id();
        let width = logits.ncols();
        for &id in tokens.iter().chain(std::iter::once(&blank)) {
            if id >= width {
                return Err(ScoreError::VocabularyMismatch { id, width });
            }
        }

        let alignment = self.align(logits, vocab, &normalized, &tokens)?;

        let transcript_len = normalized.chars().count();
        let complete = alignment.status == AlignmentStatus::Complete
            && alignment.segments.len() == transcript_len;

        let scores = if complete {
            word_level_min_scores(&alignment.segments, &normalized, WORD_DELIMITER)?
        } else {
            warn!(
                segments = alignment.segments.len(),
                symbols = transcript_len,
                "partial alignment; returning raw segment scores"
            );
            alignment.segments.iter().map(|s| s.score).collect()
        };

        let prediction = greedy_decode(logits, vocab);
        let ops = edit_ops(&spaced(&normalized), &prediction);

        debug!(
            frames = logits.nrows(),
            symbols = transcript_len,
            edit_ops = ops.len(),
            complete,
            "scored utterance"
        );

        Ok(ScoreReport {
            prediction,
            scores,
            edit_ops: ops,
            alignment_complete: complete,
        })
    }

    /// Run calibration and forced alignment only, without decode or score
    /// post-processing.
    pub fn align(
        &self,
        logits: &Array2<f32>,
        vocab: &Vocabulary,
        normalized: &str,
        tokens: &[usize],
    ) -> Result<AlignmentResult> {
        let emission = calibrate(logits, self.config.temperature, self.config.top_k)?;
        let trellis = build_trellis(&emission, tokens, vocab.blank_id());
        let path = backtrack(
            &trellis,
            &emission,
            tokens,
            vocab.blank_id(),
            self.config.extra_frames,
        );
        let segments = merge_repeats(normalized, &path.points, self.config.ignore_blank);

        Ok(AlignmentResult {
            segments,
            status: path.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use ndarray::Array2;

    use super::*;

    fn vocab() -> Vocabulary {
        let mut m = HashMap::new();
        m.insert('a', 1);
        m.insert('b', 2);
        m.insert('|', 3);
        Vocabulary::new(m, 0)
    }

    fn emission_from_plan(plan: &[usize], vocab_size: usize) -> Array2<f32> {
        let rest = 0.1 / (vocab_size - 1) as f32;
        Array2::from_shape_fn((plan.len(), vocab_size), |(t, v)| {
            if plan[t] == v {
                0.9f32.ln()
            } else {
                rest.ln()
            }
        })
    }

    #[test]
    fn empty_transcript_is_rejected() {
        let logits = emission_from_plan(&[0, 1], 4);
        let err = Scorer::default().score(&logits, &vocab(), "  ").unwrap_err();
        assert!(matches!(err, ScoreError::EmptyTranscript));
    }

    #[test]
    fn empty_emission_is_rejected() {
        let logits = Array2::<f32>::zeros((0, 4));
        let err = Scorer::default().score(&logits, &vocab(), "a").unwrap_err();
        assert!(matches!(err, ScoreError::EmptyEmission));
    }

    #[test]
    fn unknown_symbol_is_rejected() {
        let logits = emission_from_plan(&[0, 1], 4);
        let err = Scorer::default().score(&logits, &vocab(), "aq").unwrap_err();
        assert!(matches!(err, ScoreError::UnknownSymbol { symbol: 'q' }));
    }

    #[test]
    fn vocabulary_wider_than_emission_is_rejected() {
        // 'b' has index 2 but the emission only has 2 columns.
        let logits = emission_from_plan(&[0, 1], 2);
        let err = Scorer::default().score(&logits, &vocab(), "b").unwrap_err();
        assert!(matches!(
            err,
            ScoreError::VocabularyMismatch { id: 2, width: 2 }
        ));
    }

    #[test]
    fn non_positive_temperature_propagates() {
        let logits = emission_from_plan(&[0, 1], 4);
        let scorer = Scorer::new(ScorerConfig {
            temperature: 0.0,
            ..ScorerConfig::default()
        });
        let err = scorer.score(&logits, &vocab(), "a").unwrap_err();
        assert!(matches!(err, ScoreError::NonPositiveTemperature(_)));
    }

    #[test]
    fn matching_utterance_scores_cleanly() {
        let logits = emission_from_plan(&[0, 0, 1, 1, 2], 4);
        let report = Scorer::default()
            .score(&logits, &vocab(), "ab")
            .expect("valid request");

        assert!(report.alignment_complete);
        assert_eq!(report.prediction, "ab");
        assert!(report.edit_ops.is_empty());
        assert_eq!(report.scores.len(), 2);
        // Single word: both symbols share the word minimum.
        assert_eq!(report.scores[0], report.scores[1]);
    }

    #[test]
    fn dropped_symbol_shows_up_in_the_edit_script() {
        // Model heard "b" where the transcript expects "ab".
        let logits = emission_from_plan(&[0, 2, 2, 0], 4);
        let report = Scorer::default()
            .score(&logits, &vocab(), "ab")
            .expect("valid request");
        assert_eq!(report.prediction, "b");
        assert_eq!(report.edit_ops.len(), 1);
        assert_eq!(report.edit_ops[0].kind, crate::scoring::EditKind::Delete);
        assert_eq!(report.edit_ops[0].reference_index, 0);
    }
}
