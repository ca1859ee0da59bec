//! This module provides a "simplistic" API for reading containers.
//!
//! It trades off precise control for ease of use.

use alloc::string::String;
use alloc::vec::Vec;

use super::err::Error;
use super::ArchiveHandle;

use crate::formats::IndexParser;
use crate::source::BoundedSource;

/// Extract the entry with the given `name` into a data buffer.
///
/// This parses the whole index and materializes the entry, so it's the
/// convenient path, not the efficient one; hosts extracting many entries
/// should hold an [`ArchiveHandle`] instead.
pub fn extract_entry<'a>(
    name: &str,
    archive_data: &'a [u8],
    parser: IndexParser,
    key: Option<&[u8]>,
) -> Result<Vec<u8>, Error<'a>> {
    let layout = parser(archive_data, key)?;
    let archive = ArchiveHandle::new(BoundedSource::new(archive_data), layout)?;
    let entry = match archive.by_name(name) {
        Some(entry) => entry,
        None => return Err(Error::NoSuchEntryName(String::from(name))),
    };
    return entry.extract_vec();
}
