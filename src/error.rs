//! Error type shared by the encoder and the decoder.

use std::io;

use crate::frequency::Symbol;

/// Everything that can go wrong while compressing or decompressing.
#[derive(Debug, thiserror::Error)]
pub enum HuffmanError {
    /// Reading the source or writing the destination failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The artifact header is not a valid frequency table.
    #[error("malformed header: {0}")]
    Header(String),

    /// The payload ran out before the end-of-stream code was read.
    #[error("compressed stream ended before the end-of-stream marker")]
    Truncated,

    /// The source read differently on the encoding pass than on the
    /// counting pass.
    #[error("input changed between the counting and encoding passes")]
    Changed,

    /// The payload walked into a leaf that no encoder can produce.
    #[error("payload references symbol {0}, which has no code")]
    UnassignedSymbol(Symbol),
}

impl HuffmanError {
    /// Returns true if the artifact itself is bad, as opposed to the I/O
    /// around it or the source being encoded.
    pub fn is_corrupt(&self) -> bool {
        !matches!(self, HuffmanError::Io(_) | HuffmanError::Changed)
    }
}

pub type Result<T> = std::result::Result<T, HuffmanError>;
