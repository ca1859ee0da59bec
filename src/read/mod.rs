//! This module implements the interface for reading opened containers.

mod chain;
mod err;
mod iter;
mod simplistic;

pub use chain::*;
pub use err::*;
pub use iter::*;
pub use simplistic::*;

use alloc::vec::Vec;

use crate::codec::LzssConfig;
use crate::entry::{validate_entry, CipherStep, EntryDescriptor};
use crate::formats::ArchiveLayout;
use crate::source::BoundedSource;

/// An opened container plus its validated entry list.
///
/// The source is an immutable borrow of the container bytes and each decode
/// builds its own frame, cursor and cipher state, so handles may be shared
/// across threads and independent entries decoded concurrently.
#[derive(Debug, Clone)]
pub struct ArchiveHandle<'a> {
    source: BoundedSource<'a>,
    entries: Vec<EntryDescriptor>,
    archive_cipher: Option<CipherStep>,
    decompressor: Option<LzssConfig>,
}

impl<'a> ArchiveHandle<'a> {
    /// Open with strict validation: the first entry failing placement checks
    /// aborts the whole open.
    pub fn new(source: BoundedSource<'a>, layout: ArchiveLayout) -> Result<ArchiveHandle<'a>, Error<'a>> {
        for entry in &layout.entries {
            validate_entry(entry, source.len())?;
        }
        return Ok(ArchiveHandle {
            source,
            entries: layout.entries,
            archive_cipher: layout.archive_cipher,
            decompressor: layout.decompressor,
        });
    }

    /// Open keeping only the entries that pass placement validation.
    /// Invalid entries are omitted rather than exposed with unchecked
    /// bounds.
    pub fn new_lossy(source: BoundedSource<'a>, mut layout: ArchiveLayout) -> ArchiveHandle<'a> {
        layout
            .entries
            .retain(|entry| validate_entry(entry, source.len()).is_ok());
        return ArchiveHandle {
            source,
            entries: layout.entries,
            archive_cipher: layout.archive_cipher,
            decompressor: layout.decompressor,
        };
    }

    pub fn source(&self) -> &BoundedSource<'a> {
        return &self.source;
    }

    pub fn entries(&self) -> &[EntryDescriptor] {
        return &self.entries;
    }

    pub fn len(&self) -> usize {
        return self.entries.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.entries.is_empty();
    }

    /// Handle for the entry at `index`.
    pub fn entry(&self, index: usize) -> Option<EntryHandle<'_, 'a>> {
        if index >= self.entries.len() {
            return None;
        }
        return Some(EntryHandle {
            archive: self,
            index,
        });
    }

    /// Handle for the first entry with the given name.
    pub fn by_name(&self, name: &str) -> Option<EntryHandle<'_, 'a>> {
        let index = self.entries.iter().position(|e| e.name == name)?;
        return self.entry(index);
    }

    /// Iterate over each entry in the archive.
    pub fn iter(&self) -> EntryIterator<'_, 'a> {
        return EntryIterator::new(self);
    }
}

/// The handle for one entry within an archive.
///
/// Holds only metadata; decoding happens when the contents are requested.
/// Can't live independently of its underlying archive handle.
#[derive(Debug, Clone, Copy)]
pub struct EntryHandle<'h, 'a> {
    archive: &'h ArchiveHandle<'a>,
    index: usize,
}

impl<'h, 'a> EntryHandle<'h, 'a> {
    pub fn descriptor(&self) -> &'h EntryDescriptor {
        return &self.archive.entries[self.index];
    }

    pub fn name(&self) -> &'h str {
        return &self.descriptor().name;
    }

    /// Run the entry through its transform chain.
    ///
    /// Plain unciphered entries come back as borrows of the container; only
    /// packed or ciphered content is materialized.
    pub fn extract(&self) -> Result<EntryBytes<'a>, Error<'a>> {
        return decode_entry(
            self.descriptor(),
            &self.archive.source,
            self.archive.archive_cipher.as_ref(),
            self.archive.decompressor.as_ref(),
        );
    }

    /// Extract into a single vector.
    ///
    /// Note that this materializes the entire entry; check the descriptor's
    /// `output_size` first if the archive is untrusted or large.
    pub fn extract_vec(&self) -> Result<Vec<u8>, Error<'a>> {
        let bytes = self.extract()?;
        return Ok(bytes.to_vec());
    }
}
