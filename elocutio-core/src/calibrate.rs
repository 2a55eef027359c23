//! Probability calibration: temperature scaling + top-k renormalization.
//!
//! ## Procedure (per frame)
//!
//! 1. Divide every logit by the temperature.
//! 2. Softmax over the vocabulary axis.
//! 3. Rescale the `top_k` largest probabilities by the single largest one,
//!    so the frame's top symbol lands at exactly 1.0 and the rest of the
//!    window scales down in proportion. Slots outside the window keep
//!    their raw probability.
//! 4. Natural log of the result.
//!
//! The output is deliberately *not* a probability distribution — rows do
//! not sum to 1. Downstream code only reads it in log space as relative
//! scores, which is what the alignment recurrence wants.

use std::cmp::Ordering;

use ndarray::{Array2, Axis};

use crate::error::{Result, ScoreError};

/// Floor applied before the final `ln`. An exact-zero probability (fully
/// saturated softmax in f32) must not reach `ln` and inject `-inf` into
/// the emission matrix, where it would be indistinguishable from the
/// trellis's unreachable-state marker.
const PROB_FLOOR: f32 = 1e-12;

/// Rescale raw logits into calibrated log-probabilities.
///
/// When `top_k` covers the whole vocabulary there is nothing to rescale
/// against and the result is the plain log-softmax.
///
/// # Errors
/// [`ScoreError::NonPositiveTemperature`] if `temperature <= 0`,
/// [`ScoreError::ZeroTopK`] if `top_k == 0`.
pub fn calibrate(logits: &Array2<f32>, temperature: f32, top_k: usize) -> Result<Array2<f32>> {
    if temperature <= 0.0 {
        return Err(ScoreError::NonPositiveTemperature(temperature));
    }
    if top_k == 0 {
        return Err(ScoreError::ZeroTopK);
    }

    let vocab = logits.ncols();
    let mut out = logits.mapv(|x| x / temperature);

    for mut row in out.axis_iter_mut(Axis(0)) {
        // Stable softmax over the vocabulary axis.
        let max = row.fold(f32::NEG_INFINITY, |m, &x| m.max(x));
        let mut sum = 0.0f32;
        for x in row.iter_mut() {
            *x = (*x - max).exp();
            sum += *x;
        }
        for x in row.iter_mut() {
            *x /= sum;
        }

        if top_k < vocab {
            // Rank vocabulary slots by probability, index order breaking
            // ties, so the top-k window and the untouched remainder are
            // disjoint and together cover the vocabulary.
            let mut order: Vec<usize> = (0..vocab).collect();
            order.sort_unstable_by(|&a, &b| match row[b].total_cmp(&row[a]) {
                Ordering::Equal => a.cmp(&b),
                other => other,
            });
            let top1 = row[order[0]];
            if top1 > 0.0 {
                for &i in &order[..top_k] {
                    row[i] /= top1;
                }
            }
        }

        for x in row.iter_mut() {
            *x = x.max(PROB_FLOOR).ln();
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    use super::*;

    /// Logits whose softmax reproduces the given probabilities
    /// (`softmax(ln p) = p` when the row sums to 1).
    fn logits_for(probs: &[f32]) -> Array2<f32> {
        Array2::from_shape_vec((1, probs.len()), probs.iter().map(|p| p.ln()).collect())
            .expect("shape matches")
    }

    #[test]
    fn zero_temperature_is_rejected_for_any_shape() {
        for shape in [(1, 2), (5, 3), (0, 4)] {
            let logits = Array2::<f32>::zeros(shape);
            let err = calibrate(&logits, 0.0, 1).unwrap_err();
            assert!(matches!(err, ScoreError::NonPositiveTemperature(_)));
        }
    }

    #[test]
    fn negative_temperature_is_rejected() {
        let logits = array![[0.3f32, 0.7]];
        assert!(calibrate(&logits, -1.0, 1).is_err());
    }

    #[test]
    fn zero_top_k_is_rejected() {
        let logits = array![[0.3f32, 0.7]];
        assert!(matches!(
            calibrate(&logits, 1.0, 0),
            Err(ScoreError::ZeroTopK)
        ));
    }

    #[test]
    fn full_vocabulary_window_is_plain_log_softmax() {
        let logits = array![[2.0f32, 0.5, -1.0], [0.0, 0.0, 0.0]];
        let out = calibrate(&logits, 1.0, 3).expect("valid arguments");
        for t in 0..logits.nrows() {
            let row = logits.row(t);
            let max = row.fold(f32::NEG_INFINITY, |m, &x| m.max(x));
            let sum: f32 = row.iter().map(|&x| (x - max).exp()).sum();
            for v in 0..logits.ncols() {
                let expected = logits[[t, v]] - max - sum.ln();
                assert_abs_diff_eq!(out[[t, v]], expected, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn full_vocabulary_calibration_is_a_fixed_point() {
        let logits = array![[1.2f32, -0.3, 0.8, 0.0]];
        let once = calibrate(&logits, 1.0, 4).expect("valid arguments");
        let twice = calibrate(&once, 1.0, 4).expect("valid arguments");
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-5);
        }
    }

    #[test]
    fn top_k_rescales_against_the_frame_maximum() {
        let out = calibrate(&logits_for(&[0.5, 0.3, 0.15, 0.05]), 1.0, 2)
            .expect("valid arguments");
        // Top-2 divided by top-1 (0.5); bottom slots untouched.
        assert_abs_diff_eq!(out[[0, 0]].exp(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(out[[0, 1]].exp(), 0.6, epsilon = 1e-5);
        assert_abs_diff_eq!(out[[0, 2]].exp(), 0.15, epsilon = 1e-5);
        assert_abs_diff_eq!(out[[0, 3]].exp(), 0.05, epsilon = 1e-5);
    }

    #[test]
    fn near_full_window_writes_every_slot_exactly_once() {
        // top_k = V - 1: only the single smallest slot stays raw.
        let out = calibrate(&logits_for(&[0.4, 0.3, 0.2, 0.1]), 1.0, 3)
            .expect("valid arguments");
        assert_abs_diff_eq!(out[[0, 0]].exp(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(out[[0, 1]].exp(), 0.75, epsilon = 1e-5);
        assert_abs_diff_eq!(out[[0, 2]].exp(), 0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(out[[0, 3]].exp(), 0.1, epsilon = 1e-5);
    }

    #[test]
    fn higher_temperature_softens_the_distribution() {
        let logits = array![[4.0f32, 0.0]];
        let sharp = calibrate(&logits, 1.0, 2).expect("valid arguments");
        let soft = calibrate(&logits, 4.0, 2).expect("valid arguments");
        // Softer distribution gives the runner-up more mass.
        assert!(soft[[0, 1]] > sharp[[0, 1]]);
    }

    #[test]
    fn saturated_rows_stay_finite() {
        // A huge logit gap drives the loser's probability to exact zero in
        // f32; the floor must keep the log finite.
        let logits = array![[200.0f32, -200.0]];
        let out = calibrate(&logits, 1.0, 1).expect("valid arguments");
        assert!(out.iter().all(|x| x.is_finite()));
    }
}
