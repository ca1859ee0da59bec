//! End-to-end checks of the transform chain on synthetic containers.

use either::Either;

use vnarc::bits::BitOrder;
use vnarc::cipher::{static_xor, CipherSpec};
use vnarc::codec::{CopyCoding, LzssConfig, OffsetOrigin};
use vnarc::entry::{CipherStep, EntryDescriptor};
use vnarc::formats::ArchiveLayout;
use vnarc::read::{decode_entry, ArchiveHandle};
use vnarc::source::BoundedSource;

/// LSB-first bit assembler for building compressed fixtures.
struct BitWriter {
    bytes: Vec<u8>,
    bit: u8,
}

impl BitWriter {
    fn new() -> BitWriter {
        BitWriter { bytes: vec![], bit: 0 }
    }

    fn push_bits(&mut self, val: u32, n: u8) {
        for i in 0..n {
            if self.bit == 0 {
                self.bytes.push(0);
            }
            let b = ((val >> i) & 1) as u8;
            let last = self.bytes.len() - 1;
            self.bytes[last] |= b << self.bit;
            self.bit = (self.bit + 1) % 8;
        }
    }
}

/// A 256-byte-frame bitstream variant: 8-bit absolute offsets, 4-bit counts.
fn small_frame_config() -> LzssConfig {
    LzssConfig {
        window_capacity: 256,
        fill_byte: 0x20,
        initial_pos: 0xF0,
        bit_order: BitOrder::LsbFirst,
        literal_on_set: true,
        coding: CopyCoding::BitFields {
            offset_bits: 8,
            count_bits: 4,
        },
        offset_bias: 0,
        count_bias: 3,
        offset_origin: OffsetOrigin::Absolute,
        eof_is_terminator: true,
    }
}

/// Compress "ABCDEFGH" * 5 for `small_frame_config`: eight literals, then
/// two copies of 16 bytes each from the literals' frame position.
fn compress_reference_plaintext() -> Vec<u8> {
    let mut w = BitWriter::new();
    for byte in *b"ABCDEFGH" {
        w.push_bits(1, 1);
        w.push_bits(u32::from(byte), 8);
    }
    for _ in 0..2 {
        w.push_bits(0, 1);
        w.push_bits(0xF0, 8);
        w.push_bits(13, 4);
    }
    w.bytes
}

#[test]
fn ciphered_compressed_entry_decodes_to_reference_plaintext() {
    let plaintext: Vec<u8> = b"ABCDEFGH".repeat(5);
    assert_eq!(plaintext.len(), 40);

    // Synthetic 64-byte container holding one entry at offset 16, size 32:
    // LZSS-compressed, then XORed with 0xFF.
    let mut payload = compress_reference_plaintext();
    assert!(payload.len() <= 32);
    payload.resize(32, 0);
    static_xor(&mut payload, &[0xFF], 0);

    let mut container = vec![0u8; 64];
    container[16..48].copy_from_slice(&payload);

    let entry = EntryDescriptor::packed("voice.bin".into(), 16, 32, 40).with_cipher(
        CipherStep::whole(CipherSpec::StaticXor {
            key: Either::Left(vec![0xFF]),
        }),
    );

    let source = BoundedSource::new(&container);
    let out = decode_entry(&entry, &source, None, Some(&small_frame_config())).unwrap();
    assert_eq!(out.to_vec(), plaintext);
}

#[test]
fn packed_entry_without_decompressor_parameters_fails() {
    let container = [0u8; 64];
    let entry = EntryDescriptor::packed("a".into(), 0, 16, 32);
    let source = BoundedSource::new(&container);
    assert!(decode_entry(&entry, &source, None, None).is_err());
}

#[test]
fn decode_rechecks_placement() {
    let container = [0u8; 64];
    let entry = EntryDescriptor::plain("a".into(), 60, 8);
    let source = BoundedSource::new(&container);
    assert!(decode_entry(&entry, &source, None, None).is_err());
}

#[test]
fn oversized_archive_level_prefix_covers_the_whole_entry() {
    // Archive-level steps are not bounded by per-entry validation; a prefix
    // length wider than 32 bits must clamp to the entry, not wrap to a small
    // split point on narrow targets.
    let mut container = b"eight by".to_vec();
    static_xor(&mut container, &[0x77], 0);
    let entry = EntryDescriptor::plain("a".into(), 0, 8);
    let step = CipherStep::prefix(
        CipherSpec::StaticXor {
            key: Either::Left(vec![0x77]),
        },
        (1u64 << 32) + 4,
    );

    let source = BoundedSource::new(&container);
    let out = decode_entry(&entry, &source, Some(&step), None).unwrap();
    assert_eq!(out.to_vec(), b"eight by");
}

/// Build a container with one plain, one ciphered and one packed entry.
fn build_mixed_archive() -> (Vec<u8>, ArchiveLayout) {
    let plain = b"plain entry data";
    let mut ciphered = b"ciphered entry data".to_vec();
    static_xor(&mut ciphered, &[0x5A, 0xA5], 0);
    let mut packed = compress_reference_plaintext();
    packed.resize(32, 0);

    let mut container = vec![];
    let mut entries = vec![];

    let offset = container.len() as u64;
    container.extend_from_slice(plain);
    entries.push(EntryDescriptor::plain("plain.txt".into(), offset, plain.len() as u64));

    let offset = container.len() as u64;
    container.extend_from_slice(&ciphered);
    entries.push(
        EntryDescriptor::plain("ciphered.txt".into(), offset, ciphered.len() as u64).with_cipher(
            CipherStep::whole(CipherSpec::StaticXor {
                key: Either::Left(vec![0x5A, 0xA5]),
            }),
        ),
    );

    let offset = container.len() as u64;
    container.extend_from_slice(&packed);
    entries.push(EntryDescriptor::packed("packed.bin".into(), offset, 32, 40));

    let layout = ArchiveLayout {
        entries,
        archive_cipher: None,
        decompressor: Some(small_frame_config()),
    };
    (container, layout)
}

#[test]
fn concurrent_decode_matches_sequential() {
    let (container, layout) = build_mixed_archive();
    let archive = ArchiveHandle::new(BoundedSource::new(&container), layout).unwrap();

    let sequential: Vec<Vec<u8>> = archive
        .iter()
        .map(|entry| entry.extract_vec().unwrap())
        .collect();

    // Same handle shared across threads, every thread decoding every entry.
    std::thread::scope(|scope| {
        let mut workers = vec![];
        for _ in 0..4 {
            workers.push(scope.spawn(|| {
                archive
                    .iter()
                    .map(|entry| entry.extract_vec().unwrap())
                    .collect::<Vec<Vec<u8>>>()
            }));
        }
        for worker in workers {
            assert_eq!(worker.join().unwrap(), sequential);
        }
    });
}

#[test]
fn lossy_open_omits_invalid_entries_and_keeps_the_rest() {
    let (container, mut layout) = build_mixed_archive();
    layout
        .entries
        .push(EntryDescriptor::plain("out-of-bounds.bin".into(), 1 << 40, 128));
    let valid = layout.entries.len() - 1;

    assert!(ArchiveHandle::new(BoundedSource::new(&container), layout.clone()).is_err());

    let archive = ArchiveHandle::new_lossy(BoundedSource::new(&container), layout);
    assert_eq!(archive.len(), valid);
    assert!(archive.by_name("out-of-bounds.bin").is_none());
    assert!(archive.by_name("plain.txt").is_some());
}
