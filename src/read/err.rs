//! The top-level error type for archive reading.

use alloc::string::String;
use core::convert::From;

use crate::cipher::CipherError;
use crate::codec::CodecError;
use crate::entry::PlacementError;
use crate::formats::IndexError;
use crate::source::SourceError;

/// The top-level error type for this crate.
///
/// Index errors borrow the container bytes where parsing failed, so the
/// container must live at least as long as the error.
#[derive(Debug, Clone)]
pub enum Error<'a> {
    Source(SourceError),
    Codec(CodecError),
    Cipher(CipherError),
    Placement(PlacementError),
    Index(IndexError<&'a [u8]>),
    NoSuchEntryName(String),
}

impl<'a> From<SourceError> for Error<'a> {
    fn from(e: SourceError) -> Self {
        return Error::Source(e);
    }
}

impl<'a> From<CodecError> for Error<'a> {
    fn from(e: CodecError) -> Self {
        return Error::Codec(e);
    }
}

impl<'a> From<CipherError> for Error<'a> {
    fn from(e: CipherError) -> Self {
        return Error::Cipher(e);
    }
}

impl<'a> From<PlacementError> for Error<'a> {
    fn from(e: PlacementError) -> Self {
        return Error::Placement(e);
    }
}

impl<'a> From<IndexError<&'a [u8]>> for Error<'a> {
    fn from(e: IndexError<&'a [u8]>) -> Self {
        return Error::Index(e);
    }
}
