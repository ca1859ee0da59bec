use super::*;

use alloc::vec;
use alloc::vec::Vec;

use crate::cipher::{rolling_encode, RotatingXor};
use crate::read::{ArchiveHandle, EntryBytes};
use crate::source::BoundedSource;

fn push_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn push_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn push_utf16(out: &mut Vec<u8>, name: &str) {
    for unit in name.encode_utf16() {
        push_u16(out, unit);
    }
}

/// The Okumura fixture from the codec tests: decodes to
/// "ABCDEFGHABCDEFGHABC".
const PACKED_INPUT: [u8; 12] = [
    0xFF, b'A', b'B', b'C', b'D', b'E', b'F', b'G', b'H', 0x00, 0xEE, 0xF8,
];
const PACKED_OUTPUT: &[u8] = b"ABCDEFGHABCDEFGHABC";
const PLAIN_DATA: &[u8] = b"hello from vnpk";

/// Two entries: "readme.txt" stored plain, "script.bin" LZSS-packed.
fn build_vnpk() -> Vec<u8> {
    let record = |offset: u32, size: u32, unpacked: u32, name: &str| -> Vec<u8> {
        let mut out = vec![];
        push_u32(&mut out, offset);
        push_u32(&mut out, size);
        push_u32(&mut out, unpacked);
        out.push(name.encode_utf16().count() as u8);
        push_utf16(&mut out, name);
        return out;
    };

    let mut body = vec![0b0000_0010u8]; // entry 1 is packed
    let header_len = 4 + 2 + 2 + 4;
    let body_len = 1 + (13 + 20) * 2;
    let data_start = (header_len + body_len) as u32;
    body.extend_from_slice(&record(data_start, PLAIN_DATA.len() as u32, 0, "readme.txt"));
    body.extend_from_slice(&record(
        data_start + PLAIN_DATA.len() as u32,
        PACKED_INPUT.len() as u32,
        PACKED_OUTPUT.len() as u32,
        "script.bin",
    ));
    assert_eq!(body.len(), body_len);

    let mut archive = b"VNPK".to_vec();
    push_u16(&mut archive, 1);
    push_u16(&mut archive, 2);
    push_u32(&mut archive, vnpk::index_crc(&body));
    archive.extend_from_slice(&body);
    archive.extend_from_slice(PLAIN_DATA);
    archive.extend_from_slice(&PACKED_INPUT);
    return archive;
}

#[test]
fn vnpk_parses_and_extracts_both_entries() {
    let archive_data = build_vnpk();
    let layout = vnpk::parse_index(&archive_data, None).unwrap();
    assert_eq!(layout.entries.len(), 2);

    let archive = ArchiveHandle::new(BoundedSource::new(&archive_data), layout).unwrap();

    let readme = archive.by_name("readme.txt").unwrap().extract().unwrap();
    // Plain unciphered entries stay a borrow of the container.
    assert!(matches!(readme, EntryBytes::Borrowed(_)));
    assert_eq!(readme.to_vec(), PLAIN_DATA);

    let script = archive.by_name("script.bin").unwrap().extract_vec().unwrap();
    assert_eq!(script, PACKED_OUTPUT);
}

#[test]
fn vnpk_iterates_in_index_order() {
    let archive_data = build_vnpk();
    let layout = vnpk::parse_index(&archive_data, None).unwrap();
    let archive = ArchiveHandle::new(BoundedSource::new(&archive_data), layout).unwrap();
    let names: Vec<&str> = archive.iter().map(|e| e.name()).collect();
    assert_eq!(names, ["readme.txt", "script.bin"]);
}

#[test]
fn vnpk_rejects_corrupted_index() {
    let mut archive_data = build_vnpk();
    // Flip a bit inside the first record's offset field.
    archive_data[14] ^= 0x01;
    let err = vnpk::parse_index(&archive_data, None).unwrap_err();
    assert!(matches!(err.kind, IndexErrorKind::Crc { .. }));
}

#[test]
fn vnpk_rejects_unknown_version() {
    let mut archive_data = build_vnpk();
    archive_data[4] = 9;
    let err = vnpk::parse_index(&archive_data, None).unwrap_err();
    assert!(matches!(err.kind, IndexErrorKind::UnsupportedVersion(9)));
}

#[test]
fn vnpk_rejects_truncated_index() {
    let archive_data = build_vnpk();
    assert!(vnpk::parse_index(&archive_data[..20], None).is_err());
}

const ROKU_KEY: [u8; 4] = [0x44, 0x33, 0x22, 0x11];

/// One plain entry, "voice.pcm", with its first 256 bytes ciphered.
fn build_rokudat() -> (Vec<u8>, Vec<u8>) {
    let name = b"voice.pcm";
    let payload: Vec<u8> = (0..300u32).map(|i| (i * 7 + 1) as u8).collect();

    let index_len = 4 + 4 + 4 + 1 + name.len();
    let data_offset = (12 + index_len) as u32;

    let mut index = vec![];
    push_u32(&mut index, 1); // count
    push_u32(&mut index, data_offset);
    push_u32(&mut index, payload.len() as u32);
    index.push(name.len() as u8);
    index.extend_from_slice(name);

    let index_seed = 0x0BAD_F00D;
    let mut enciphered = index.clone();
    RotatingXor::new(index_seed * 9 + 3, 7, 3, false).encode(&mut enciphered);

    let mut ciphered_payload = payload.clone();
    let archive_key = u32::from_le_bytes(ROKU_KEY);
    rolling_encode(
        &mut ciphered_payload[..256],
        archive_key ^ data_offset,
        0,
        false,
    );

    let mut archive = b"ROK0".to_vec();
    push_u32(&mut archive, index_seed);
    push_u32(&mut archive, index.len() as u32);
    archive.extend_from_slice(&enciphered);
    archive.extend_from_slice(&ciphered_payload);
    return (archive, payload);
}

#[test]
fn rokudat_deciphers_index_and_entry_prefix() {
    let (archive_data, payload) = build_rokudat();
    let layout = rokudat::parse_index(&archive_data, Some(&ROKU_KEY)).unwrap();
    assert_eq!(layout.entries.len(), 1);

    let archive = ArchiveHandle::new(BoundedSource::new(&archive_data), layout).unwrap();
    let entry = archive.by_name("voice.pcm").unwrap().extract().unwrap();

    // Only the 256-byte head is materialized; the tail stays borrowed.
    match &entry {
        EntryBytes::Prefixed { head, tail } => {
            assert_eq!(head.len(), 256);
            assert_eq!(tail.len(), payload.len() - 256);
        }
        other => panic!("expected a prefixed entry, got {:?}", other),
    }
    assert_eq!(entry.to_vec(), payload);
}

#[test]
fn rokudat_requires_an_archive_key() {
    let (archive_data, _) = build_rokudat();
    let err = rokudat::parse_index(&archive_data, None).unwrap_err();
    assert!(matches!(err.kind, IndexErrorKind::KeyMissing));
    let err = rokudat::parse_index(&archive_data, Some(&[0x01])).unwrap_err();
    assert!(matches!(err.kind, IndexErrorKind::KeyMissing));
}

#[test]
fn rokudat_rejects_implausible_entry_counts() {
    let name = b"x";
    let mut index = vec![];
    push_u32(&mut index, 0xFFFF_FFFF);
    push_u32(&mut index, 64);
    push_u32(&mut index, 1);
    index.push(name.len() as u8);
    index.extend_from_slice(name);

    let index_seed = 5u32;
    let mut enciphered = index.clone();
    RotatingXor::new(index_seed * 9 + 3, 7, 3, false).encode(&mut enciphered);

    let mut archive = b"ROK0".to_vec();
    push_u32(&mut archive, index_seed);
    push_u32(&mut archive, index.len() as u32);
    archive.extend_from_slice(&enciphered);

    let err = rokudat::parse_index(&archive, Some(&ROKU_KEY)).unwrap_err();
    assert!(matches!(err.kind, IndexErrorKind::TooManyEntries { .. }));
}

#[test]
fn flag_bits_unpack_lsb_first() {
    let (rest, bits) = flag_bits(&[0b0000_0101, 0xFF], 3).unwrap();
    assert_eq!(rest, &[0xFF]);
    assert_eq!(bits.len(), 3);
    assert!(bits[0]);
    assert!(!bits[1]);
    assert!(bits[2]);
}

#[test]
fn utf16_names_trim_trailing_nuls() {
    let mut raw = vec![];
    push_utf16(&mut raw, "se01.ogg");
    push_u16(&mut raw, 0);
    let (_, name) = utf16_name(&raw, 9).unwrap();
    assert_eq!(name, "se01.ogg");
}
