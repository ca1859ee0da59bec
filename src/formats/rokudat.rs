//! The ROKUDAT reference container.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! magic       "ROK0"
//! index_seed  u32   seed for the index cipher
//! index_size  u32   byte length of the enciphered index that follows
//! index       index_size bytes, RotatingXor-enciphered:
//!     count   u32
//!     records count * { offset u32, size u32, name_len u8, name UTF-8 }
//! ```
//!
//! The index accumulator starts at `index_seed * 9 + 3` and steps
//! `k = k * 7 + 3` per word. Entries are stored uncompressed, but the first
//! 256 bytes of each payload are ciphered with a rolling position key seeded
//! by an externally supplied 4-byte archive key XORed with the entry offset;
//! opening without a key fails with `KeyMissing`.

use alloc::string::String;
use alloc::vec::Vec;

use super::{ArchiveLayout, IndexError, IndexErrorKind};
use crate::cipher::{CipherSpec, RotatingXor};
use crate::entry::{CipherStep, EntryDescriptor};
use crate::source::BoundedSource;

/// Header magic bytes.
const MAGIC: [u8; 4] = *b"ROK0";

/// Bytes of ciphered payload prefix per entry.
const CIPHERED_PREFIX: u64 = 256;

/// Smallest possible record: offset + size + name_len + one name byte.
const MIN_RECORD_LEN: u64 = 10;

/// Parse a ROKUDAT index. `IndexParser`-compatible; requires a 4-byte
/// archive key.
pub fn parse_index<'i>(
    input: &'i [u8],
    key: Option<&[u8]>,
) -> Result<ArchiveLayout, IndexError<&'i [u8]>> {
    let key = match key {
        Some(key) if key.len() >= 4 => key,
        _ => return Err(IndexError::new(IndexErrorKind::KeyMissing)),
    };
    let archive_key = u32::from_le_bytes([key[0], key[1], key[2], key[3]]);

    let header = BoundedSource::new(input);
    let truncated = || IndexError::new(IndexErrorKind::Truncated);

    let magic = header.read(0, 4).map_err(|_| truncated())?;
    if magic != MAGIC {
        return Err(IndexError::new(IndexErrorKind::Nom(
            input,
            nom::error::ErrorKind::Tag,
        )));
    }
    let index_seed = header.read_u32_le(4).map_err(|_| truncated())?;
    let index_size = header.read_u32_le(8).map_err(|_| truncated())?;

    let mut index = header
        .read(12, u64::from(index_size))
        .map_err(|_| truncated())?
        .to_vec();
    let mut cipher = RotatingXor::new(index_seed.wrapping_mul(9).wrapping_add(3), 7, 3, false);
    cipher.decode(&mut index);

    let entries = parse_records(&index, archive_key).map_err(|kind| IndexError::new(kind))?;

    return Ok(ArchiveLayout {
        entries,
        archive_cipher: None,
        decompressor: None,
    });
}

/// Walk the deciphered index. Errors here carry no input slice because the
/// deciphered buffer is local to the parse.
fn parse_records<I>(
    index: &[u8],
    archive_key: u32,
) -> Result<Vec<EntryDescriptor>, IndexErrorKind<I>> {
    let index = BoundedSource::new(index);
    let truncated = || IndexErrorKind::Truncated;

    let count = u64::from(index.read_u32_le(0).map_err(|_| truncated())?);
    let limit = (index.len().saturating_sub(4)) / MIN_RECORD_LEN;
    if count > limit {
        return Err(IndexErrorKind::TooManyEntries {
            declared: count,
            limit,
        });
    }

    let mut entries: Vec<EntryDescriptor> = Vec::with_capacity(count as usize);
    let mut pos: u64 = 4;
    for _ in 0..count {
        let offset = u64::from(index.read_u32_le(pos).map_err(|_| truncated())?);
        let size = u64::from(index.read_u32_le(pos + 4).map_err(|_| truncated())?);
        let name_len = u64::from(index.read_u8(pos + 8).map_err(|_| truncated())?);
        let raw_name = index.read(pos + 9, name_len).map_err(|_| truncated())?;
        pos += 9 + name_len;

        let name = match String::from_utf8(raw_name.to_vec()) {
            Ok(name) => name,
            Err(_) => return Err(IndexErrorKind::BadName),
        };

        let step = CipherStep::prefix(
            CipherSpec::RollingPositionKey {
                seed: archive_key ^ (offset as u32),
                feedback: false,
            },
            CIPHERED_PREFIX.min(size),
        );
        entries.push(EntryDescriptor::plain(name, offset, size).with_cipher(step));
    }
    return Ok(entries);
}
