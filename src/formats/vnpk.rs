//! The VNPK reference container.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! magic      "VNPK"
//! version    u16 (must be 1)
//! count      u16
//! index_crc  u32   CRC-32 of everything from the flags bitmap
//!                  through the last record
//! flags      ceil(count / 8) bytes; bit i set = entry i is LZSS-packed
//! records    count * { offset u32, size u32, unpacked u32,
//!                      name_units u8, name UTF-16LE }
//! ```
//!
//! Packed entries use the classic Okumura parameter set.

use alloc::string::String;
use alloc::vec::Vec;

use crc::{Crc, CRC_32_ISO_HDLC};
use nom::bytes::complete::tag;
use nom::error::context;
use nom::number::complete::{le_u16, le_u32, u8};

use super::{
    complete, flag_bits, utf16_name, ArchiveLayout, IndexError, IndexErrorKind, IndexResult,
};
use crate::codec::LzssConfig;
use crate::entry::EntryDescriptor;

/// Header magic bytes.
const MAGIC: [u8; 4] = *b"VNPK";

/// Checksum over the index region.
pub fn index_crc(input: &[u8]) -> u32 {
    let algo = Crc::<u32>::new(&CRC_32_ISO_HDLC);
    let mut digest = algo.digest();
    digest.update(input);
    return digest.finalize();
}

/// Parse a VNPK index. `IndexParser`-compatible; VNPK needs no external key.
pub fn parse_index<'i>(
    input: &'i [u8],
    _key: Option<&[u8]>,
) -> Result<ArchiveLayout, IndexError<&'i [u8]>> {
    return complete(archive_layout(input));
}

fn archive_layout(input: &[u8]) -> IndexResult<ArchiveLayout> {
    let (input, _) = context("vnpk magic", tag(MAGIC))(input)?;
    let (input, version) = context("vnpk version", le_u16)(input)?;
    if version != 1 {
        return Err(nom::Err::Failure(IndexError::new(
            IndexErrorKind::UnsupportedVersion(version),
        )));
    }
    let (input, count) = context("vnpk entry count", le_u16)(input)?;
    let (input, declared_crc) = context("vnpk index crc", le_u32)(input)?;

    // The checksummed region runs from here through the last record.
    let body = input;
    let count = usize::from(count);

    let (input, packed_flags) = context("vnpk packed flags", |x| flag_bits(x, count))(input)?;

    let mut entries: Vec<EntryDescriptor> = Vec::with_capacity(count);
    let mut input_mut = input;
    for i in 0..count {
        let (rest, (offset, size, unpacked, name)) =
            context("vnpk record", entry_record)(input_mut)?;
        input_mut = rest;
        let entry = if packed_flags[i] {
            EntryDescriptor::packed(name, u64::from(offset), u64::from(size), u64::from(unpacked))
        } else {
            EntryDescriptor::plain(name, u64::from(offset), u64::from(size))
        };
        entries.push(entry);
    }
    let input = input_mut;

    let consumed = body.len() - input.len();
    let calculated_crc = index_crc(&body[..consumed]);
    if calculated_crc != declared_crc {
        return Err(nom::Err::Failure(IndexError::new(IndexErrorKind::Crc {
            expected: declared_crc,
            got: calculated_crc,
        })));
    }

    return Ok((
        input,
        ArchiveLayout {
            entries,
            archive_cipher: None,
            decompressor: Some(LzssConfig::okumura()),
        },
    ));
}

fn entry_record(input: &[u8]) -> IndexResult<(u32, u32, u32, String)> {
    let (input, offset) = context("record offset", le_u32)(input)?;
    let (input, size) = context("record size", le_u32)(input)?;
    let (input, unpacked) = context("record unpacked size", le_u32)(input)?;
    let (input, name_units) = context("record name length", u8)(input)?;
    let (input, name) = context("record name", |x| utf16_name(x, usize::from(name_units)))(input)?;
    return Ok((input, (offset, size, unpacked, name)));
}
