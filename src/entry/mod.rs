//! Uniform entry records produced by index parsers, and the placement
//! checks that gate them.

mod placement;
pub use placement::*;

use alloc::string::String;

use crate::cipher::CipherSpec;

/// Whether an entry's payload is stored raw or compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Plain,
    Packed,
}

/// One cipher application within an entry's transform chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherStep {
    pub spec: CipherSpec,
    /// `None` covers the whole entry. `Some(k)` covers only the leading `k`
    /// bytes, the remainder passing through untouched; several formats
    /// encrypt just an entry's header region.
    pub prefix_len: Option<u64>,
}

impl CipherStep {
    /// A step covering the whole entry.
    pub fn whole(spec: CipherSpec) -> CipherStep {
        return CipherStep {
            spec,
            prefix_len: None,
        };
    }

    /// A step covering only the leading `len` bytes.
    pub fn prefix(spec: CipherSpec, len: u64) -> CipherStep {
        return CipherStep {
            spec,
            prefix_len: Some(len),
        };
    }
}

/// Uniform record for one logical file inside a container.
///
/// Produced by a format's index parser at archive-open time, validated by
/// [`validate_entry`] before being exposed, immutable thereafter. Entries
/// never outlive the archive handle that owns them.
///
/// Format-specific side data (per-entry key words, block tables and the
/// like) stays in the plugin's own wrapper types; the core only sees what it
/// needs to place and decode the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDescriptor {
    pub name: String,
    pub kind: EntryKind,
    /// Absolute offset of the stored payload within the container.
    pub offset: u64,
    /// Stored (packed) size in bytes.
    pub size: u64,
    /// Declared size after decompression. Meaningful only when `kind` is
    /// [`EntryKind::Packed`].
    pub unpacked_size: u64,
    pub cipher: Option<CipherStep>,
}

impl EntryDescriptor {
    pub fn plain(name: String, offset: u64, size: u64) -> EntryDescriptor {
        return EntryDescriptor {
            name,
            kind: EntryKind::Plain,
            offset,
            size,
            unpacked_size: size,
            cipher: None,
        };
    }

    pub fn packed(name: String, offset: u64, size: u64, unpacked_size: u64) -> EntryDescriptor {
        return EntryDescriptor {
            name,
            kind: EntryKind::Packed,
            offset,
            size,
            unpacked_size,
            cipher: None,
        };
    }

    pub fn with_cipher(mut self, step: CipherStep) -> EntryDescriptor {
        self.cipher = Some(step);
        return self;
    }

    /// Size of the decoded output: `unpacked_size` for packed entries,
    /// `size` otherwise.
    pub fn output_size(&self) -> u64 {
        match self.kind {
            EntryKind::Plain => return self.size,
            EntryKind::Packed => return self.unpacked_size,
        }
    }
}
