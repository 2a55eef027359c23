use thiserror::Error;

/// All errors produced by elocutio-core.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("temperature must be positive, got {0}")]
    NonPositiveTemperature(f32),

    #[error("top-k must be at least 1")]
    ZeroTopK,

    #[error("transcript symbol {symbol:?} is missing from the model vocabulary")]
    UnknownSymbol { symbol: char },

    #[error("transcript is empty after normalization")]
    EmptyTranscript,

    #[error("emission matrix has no frames")]
    EmptyEmission,

    #[error("vocabulary index {id} is outside the emission matrix ({width} columns)")]
    VocabularyMismatch { id: usize, width: usize },

    #[error("segment count {segments} does not match transcript length {transcript}")]
    SegmentCountMismatch { segments: usize, transcript: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ScoreError>;
