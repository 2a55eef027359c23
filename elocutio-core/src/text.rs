//! Transcript normalization and vocabulary lookup.
//!
//! The acoustic model's tokenizer reserves one symbol as a word delimiter
//! (conventionally `|`). Normalized transcripts carry that delimiter in
//! place of whitespace so every character — delimiter included — maps to
//! exactly one vocabulary index.

use std::collections::HashMap;

use crate::error::{Result, ScoreError};

/// Reserved symbol standing in for whitespace in normalized transcripts.
pub const WORD_DELIMITER: char = '|';

/// Lowercase a transcript and substitute whitespace with [`WORD_DELIMITER`].
///
/// Runs of whitespace collapse to a single delimiter; leading and trailing
/// whitespace is dropped. This is the only text normalization the core
/// performs — anything richer (punctuation stripping, number expansion)
/// belongs to the upstream normalizer.
pub fn normalize(transcript: &str) -> String {
    transcript
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(&WORD_DELIMITER.to_string())
}

/// Render a normalized transcript back with spaces for human-readable
/// comparison (the inverse of the delimiter substitution).
pub fn spaced(normalized: &str) -> String {
    normalized.replace(WORD_DELIMITER, " ")
}

/// Symbol ↔ index mapping supplied by the acoustic model.
///
/// Wraps the tokenizer vocabulary together with the blank (pad) index.
/// The delimiter is an ordinary symbol with its own index, never the blank.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    index: HashMap<char, usize>,
    /// Reverse lookup table; `None` for indices with no character symbol
    /// (blank, special tokens).
    symbols: Vec<Option<char>>,
    blank_id: usize,
}

impl Vocabulary {
    /// Build a vocabulary from a symbol→index map and the blank index.
    pub fn new(index: HashMap<char, usize>, blank_id: usize) -> Self {
        let width = index
            .values()
            .copied()
            .max()
            .map(|m| m + 1)
            .unwrap_or(0)
            .max(blank_id + 1);
        let mut symbols = vec![None; width];
        for (&c, &id) in &index {
            symbols[id] = Some(c);
        }
        Self {
            index,
            symbols,
            blank_id,
        }
    }

    pub fn blank_id(&self) -> usize {
        self.blank_id
    }

    /// Number of indices the vocabulary addresses (highest index + 1).
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn id_of(&self, symbol: char) -> Option<usize> {
        self.index.get(&symbol).copied()
    }

    pub fn symbol(&self, id: usize) -> Option<char> {
        self.symbols.get(id).copied().flatten()
    }

    /// Map every character of a normalized transcript to its vocabulary
    /// index.
    ///
    /// # Errors
    /// [`ScoreError::UnknownSymbol`] on the first character outside the
    /// vocabulary.
    pub fn token_ids(&self, normalized: &str) -> Result<Vec<usize>> {
        normalized
            .chars()
            .map(|c| {
                self.id_of(c)
                    .ok_or(ScoreError::UnknownSymbol { symbol: c })
            })
            .collect()
    }
}
