//! The transform chain: cipher step(s) first, then decompression.

use alloc::vec::Vec;
use core::convert::TryFrom;

use super::err::Error;
use crate::cipher::{CipherError, EntryContext};
use crate::codec::{CodecError, LzssConfig, SlidingWindowDecompressor};
use crate::entry::{validate_entry, CipherStep, EntryDescriptor, EntryKind};
use crate::source::BoundedSource;

/// Decoded entry contents.
///
/// Plain entries with no cipher borrow straight from the container. Plain
/// entries whose cipher covers only a bounded prefix materialize just the
/// head; the untouched remainder stays a borrow of the container, so a small
/// ciphered header never forces a copy of a large payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryBytes<'a> {
    Borrowed(&'a [u8]),
    Prefixed { head: Vec<u8>, tail: &'a [u8] },
    Owned(Vec<u8>),
}

impl<'a> EntryBytes<'a> {
    pub fn len(&self) -> usize {
        match self {
            EntryBytes::Borrowed(data) => return data.len(),
            EntryBytes::Prefixed { head, tail } => return head.len() + tail.len(),
            EntryBytes::Owned(data) => return data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        return self.len() == 0;
    }

    /// The decoded bytes as contiguous segments, in order. The second
    /// segment is empty unless the contents are split.
    pub fn segments(&self) -> [&[u8]; 2] {
        match self {
            EntryBytes::Borrowed(data) => return [data, &[]],
            EntryBytes::Prefixed { head, tail } => return [head.as_slice(), tail],
            EntryBytes::Owned(data) => return [data.as_slice(), &[]],
        }
    }

    /// Materialize into a single vector.
    pub fn to_vec(&self) -> Vec<u8> {
        let [head, tail] = self.segments();
        let mut out = Vec::with_capacity(head.len() + tail.len());
        out.extend_from_slice(head);
        out.extend_from_slice(tail);
        return out;
    }
}

fn apply_step(
    step: &CipherStep,
    buf: &mut [u8],
    ctx: EntryContext,
) -> Result<(), CipherError> {
    // Compared in u64 so oversized prefixes clamp instead of truncating on
    // narrow targets.
    let covered = match step.prefix_len {
        Some(prefix_len) => prefix_len.min(buf.len() as u64) as usize,
        None => buf.len(),
    };
    return step.spec.decode(&mut buf[..covered], 0, ctx);
}

/// Decode one entry: read its payload through the bounds-checked source,
/// apply the declared cipher step (the entry's own, or the archive-level one
/// when the entry carries none), then decompress if the entry is packed.
///
/// Placement is re-validated here so the chain is safe even when handed an
/// entry list that skipped archive-open validation.
pub fn decode_entry<'a>(
    entry: &EntryDescriptor,
    source: &BoundedSource<'a>,
    archive_cipher: Option<&CipherStep>,
    decompressor: Option<&LzssConfig>,
) -> Result<EntryBytes<'a>, Error<'a>> {
    validate_entry(entry, source.len())?;
    let raw = source.read(entry.offset, entry.size)?;
    let ctx = EntryContext {
        offset: entry.offset,
        size: entry.size,
    };
    let step = entry.cipher.as_ref().or(archive_cipher);

    match entry.kind {
        EntryKind::Plain => {
            let step = match step {
                None => return Ok(EntryBytes::Borrowed(raw)),
                Some(step) => step,
            };
            match step.prefix_len {
                Some(prefix_len) if prefix_len < raw.len() as u64 => {
                    let split = prefix_len as usize;
                    let mut head = raw[..split].to_vec();
                    step.spec.decode(&mut head, 0, ctx)?;
                    return Ok(EntryBytes::Prefixed {
                        head,
                        tail: &raw[split..],
                    });
                }
                _ => {
                    let mut buf = raw.to_vec();
                    apply_step(step, &mut buf, ctx)?;
                    return Ok(EntryBytes::Owned(buf));
                }
            }
        }
        EntryKind::Packed => {
            let config = match decompressor {
                Some(config) => config,
                None => {
                    return Err(Error::Codec(CodecError::UnsupportedVariant(
                        "packed entry without decompressor parameters",
                    )))
                }
            };
            let engine = SlidingWindowDecompressor::new(*config)?;
            // Validated against ALLOC_CEILING above, so the cast holds.
            let unpacked_size = match usize::try_from(entry.unpacked_size) {
                Ok(size) => size,
                Err(_) => {
                    return Err(Error::Codec(CodecError::UnsupportedVariant(
                        "unpacked size exceeds address width",
                    )))
                }
            };
            let out = match step {
                None => engine.decode(raw, unpacked_size)?,
                Some(step) => {
                    let mut buf = raw.to_vec();
                    apply_step(step, &mut buf, ctx)?;
                    engine.decode(&buf, unpacked_size)?
                }
            };
            return Ok(EntryBytes::Owned(out));
        }
    }
}
