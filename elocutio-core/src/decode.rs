//! Greedy decoding of an emission matrix.
//!
//! Per-frame argmax followed by the CTC collapse rule: consecutive
//! identical indices merge, the blank drops out, and surviving indices map
//! back through the vocabulary. The word delimiter renders as a space so
//! the result reads as ordinary text.
//!
//! Argmax is unaffected by softmax or temperature scaling, so this works
//! identically on raw logits and calibrated log-probabilities.

use ndarray::Array2;

use crate::text::{Vocabulary, WORD_DELIMITER};

/// Decode the most likely symbol per frame into text.
pub fn greedy_decode(emission: &Array2<f32>, vocab: &Vocabulary) -> String {
    let mut text = String::new();
    let mut prev: Option<usize> = None;

    for row in emission.rows() {
        let mut best = 0usize;
        let mut best_score = f32::NEG_INFINITY;
        for (id, &score) in row.iter().enumerate() {
            if score > best_score {
                best_score = score;
                best = id;
            }
        }

        if prev != Some(best) && best != vocab.blank_id() {
            if let Some(symbol) = vocab.symbol(best) {
                text.push(if symbol == WORD_DELIMITER { ' ' } else { symbol });
            }
        }
        prev = Some(best);
    }

    text
}
