//! Dynamic-programming score lattice over (frame, token-position).

use ndarray::Array2;

/// Build the alignment trellis for `tokens` against `emission`.
///
/// `trellis[[t, n]]` holds the best cumulative log-score under which the
/// first `t` frames explain the first `n` tokens. Row 0 and column 0 are
/// boundary conditions: zero frames cannot explain any token (`-inf`), and
/// any number of leading blank frames may precede the first token at zero
/// cost.
///
/// O(T·N) time and space; no error conditions.
pub fn build_trellis(emission: &Array2<f32>, tokens: &[usize], blank_id: usize) -> Array2<f32> {
    let frames = emission.nrows();
    let width = tokens.len() + 1;

    let mut trellis = Array2::from_elem((frames + 1, width), f32::NEG_INFINITY);
    for t in 0..=frames {
        trellis[[t, 0]] = 0.0;
    }

    for t in 0..frames {
        for n in 1..width {
            // Stay on token n, consuming the frame as blank,
            // or advance from token n-1, consuming it as that token.
            let stay = trellis[[t, n]] + emission[[t, blank_id]];
            let advance = trellis[[t, n - 1]] + emission[[t, tokens[n - 1]]];
            trellis[[t + 1, n]] = stay.max(advance);
        }
    }

    trellis
}
