//! The format-plugin contract, plus two reference plugins.
//!
//! Per-game index layouts are trivial struct decoding and live outside the
//! core; a plugin is a function that recognizes its container, parses the
//! index and hands back an [`ArchiveLayout`]. The plugins in this module are
//! reference implementations of that contract, chosen to exercise the whole
//! pipeline: a nom-parsed index with a checksum and a compression bitmap
//! ([`vnpk`]), and an enciphered hand-walked index with externally keyed
//! entry prefixes ([`rokudat`]).

pub mod rokudat;
pub mod vnpk;
#[cfg(test)]
mod test;

use alloc::string::String;
use alloc::vec::Vec;

use bitvec::prelude::*;
use nom::bytes::complete::take;
use nom::error::{ContextError, ErrorKind, ParseError};
use widestring::U16Str;

use crate::codec::LzssConfig;
use crate::entry::{CipherStep, EntryDescriptor};

/// The kinds of errors an index parser may report.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexErrorKind<I> {
    Nom(I, ErrorKind),
    /// The container carries a version this plugin does not understand.
    UnsupportedVersion(u16),
    // Crc(expected, got)
    Crc { expected: u32, got: u32 },
    /// The format requires an externally supplied key.
    KeyMissing,
    /// An entry name failed to decode.
    BadName,
    /// The declared entry count cannot fit in the index region.
    TooManyEntries { declared: u64, limit: u64 },
    /// The index ended before parsing completed.
    Truncated,
}

/// The error type returned by all index parsers.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexError<I> {
    /// What kind of error this is.
    pub kind: IndexErrorKind<I>,
    /// All the context accumulated on the way out.
    pub ctx: Vec<(I, &'static str)>,
}

impl<I> IndexError<I> {
    pub fn new(kind: IndexErrorKind<I>) -> IndexError<I> {
        return IndexError {
            kind,
            ctx: Vec::new(),
        };
    }
}

impl<I> ParseError<I> for IndexError<I> {
    fn from_error_kind(input: I, kind: ErrorKind) -> Self {
        return IndexError::new(IndexErrorKind::Nom(input, kind));
    }

    fn append(_: I, _: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<I> ContextError<I> for IndexError<I> {
    fn add_context(input: I, ctx: &'static str, mut other: Self) -> Self {
        other.ctx.push((input, ctx));
        return other;
    }
}

/// Result type shared by all index parsers.
pub type IndexResult<'i, T> = nom::IResult<&'i [u8], T, IndexError<&'i [u8]>>;

/// Unwrap a nom result into the plugin contract's return shape.
pub fn complete<'i, T>(result: IndexResult<'i, T>) -> Result<T, IndexError<&'i [u8]>> {
    match result {
        Ok((_, value)) => return Ok(value),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => return Err(e),
        Err(nom::Err::Incomplete(_)) => {
            return Err(IndexError::new(IndexErrorKind::Truncated))
        }
    }
}

/// Everything a plugin derives from a container: the validated-entry
/// candidates plus archive-level cipher and decompressor parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveLayout {
    pub entries: Vec<EntryDescriptor>,
    /// Archive-level cipher shared by entries that carry none of their own.
    pub archive_cipher: Option<CipherStep>,
    /// Decompressor parameters for this format's packed entries.
    pub decompressor: Option<LzssConfig>,
}

/// The index-parsing function a plugin supplies to the core. The second
/// argument is an externally provided key for formats that need one.
pub type IndexParser =
    for<'i> fn(&'i [u8], Option<&[u8]>) -> Result<ArchiveLayout, IndexError<&'i [u8]>>;

/// Parse `count` flag bits from the index, packed LSB-first within each
/// byte, dropping any leftover bits of the final byte.
pub(crate) fn flag_bits(input: &[u8], count: usize) -> IndexResult<BitVec> {
    let num_bytes = (count + 7) / 8;
    let (input, raw) = take(num_bytes)(input)?;
    let mut bits: BitVec = raw.view_bits::<Lsb0>().iter().by_vals().collect();
    bits.truncate(count);
    return Ok((input, bits));
}

/// Parse a UTF-16LE name of `units` code units, trimming trailing NULs.
pub(crate) fn utf16_name(input: &[u8], units: usize) -> IndexResult<String> {
    let (input, raw) = take(units * 2)(input)?;
    let mut code_units: Vec<u16> = raw
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    while code_units.last() == Some(&0) {
        code_units.pop();
    }
    let name = match U16Str::from_slice(&code_units).to_string() {
        Ok(name) => name,
        Err(_) => {
            return Err(nom::Err::Failure(IndexError::new(IndexErrorKind::BadName)))
        }
    };
    return Ok((input, name));
}
