//! Result payload handed to the serving layer.
//!
//! The host encodes [`ScoreReport`] as a JSON document verbatim; HTTP
//! status mapping and request limits stay on the host's side of the
//! boundary.

use serde::{Deserialize, Serialize};

use crate::scoring::EditOp;

/// Per-request scoring result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    /// Greedy decoding of the emission matrix.
    pub prediction: String,
    /// One confidence score per normalized-transcript symbol. Word-gated
    /// when the alignment is complete; raw per-segment scores otherwise.
    pub scores: Vec<f32>,
    /// Edit script transforming the expected text into the prediction.
    pub edit_ops: Vec<EditOp>,
    /// `false` when the aligner could not anchor the transcript start and
    /// the scores are partial. The caller decides whether to surface this
    /// as an error or accept the degraded result.
    pub alignment_complete: bool,
}
