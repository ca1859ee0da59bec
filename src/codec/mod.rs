//! Sliding-window decompression for the LZ77/LZSS family.
//!
//! The corpus contains dozens of near-duplicate decompressors differing only
//! in frame size, initial fill, bit order, control polarity and field
//! layout. A single engine, [`SlidingWindowDecompressor`], is driven by a
//! per-format [`LzssConfig`] instead; new formats become data, not code.

mod lzss;
mod window;
pub use lzss::*;
pub use window::*;

use crate::bits::BitError;

/// The error type returned by decompression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// Input ran out mid-stream and the format does not declare end-of-input
    /// a valid terminator.
    Truncated { byte_pos: usize },
    /// A parameter combination the engine cannot express.
    UnsupportedVariant(&'static str),
}

impl From<BitError> for CodecError {
    fn from(e: BitError) -> Self {
        match e {
            BitError::Truncated { byte_pos } => return CodecError::Truncated { byte_pos },
            BitError::TooWide { .. } => {
                return CodecError::UnsupportedVariant("bit field wider than 24 bits")
            }
        }
    }
}
