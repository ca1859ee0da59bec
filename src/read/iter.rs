use super::{ArchiveHandle, EntryHandle};

use core::iter::Iterator;

/// Iterates over each entry in the archive.
/// Actual decoding occurs only once an entry's contents are requested.
#[derive(Debug, Clone)]
pub struct EntryIterator<'h, 'a> {
    archive: &'h ArchiveHandle<'a>,
    index: usize,
}

impl<'h, 'a> EntryIterator<'h, 'a> {
    /// Create a new iterator over the given archive handle.
    pub fn new(archive: &'h ArchiveHandle<'a>) -> EntryIterator<'h, 'a> {
        return EntryIterator { archive, index: 0 };
    }
}

impl<'h, 'a> Iterator for EntryIterator<'h, 'a> {
    type Item = EntryHandle<'h, 'a>;

    fn next(&mut self) -> Option<EntryHandle<'h, 'a>> {
        let handle = self.archive.entry(self.index)?;
        self.index += 1;
        return Some(handle);
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.archive.len().saturating_sub(self.index);
        return (left, Some(left));
    }
}
