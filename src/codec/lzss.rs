//! The generalized LZ77/LZSS decoding engine.

use alloc::vec::Vec;

use super::{CodecError, Window};
use crate::bits::{BitCursor, BitError, BitOrder};

/// How a copy instruction's offset/count pair is laid out in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyCoding {
    /// Offset then count as contiguous bit fields read through the cursor.
    BitFields { offset_bits: u8, count_bits: u8 },
    /// The Okumura `lzss.c` byte pair, shared verbatim by many engines:
    /// two raw bytes `lo`, `hi` with `offset = lo | (hi & 0xF0) << 4` and
    /// `count = hi & 0x0F`. Literals are raw bytes as well.
    BytePair,
}

/// What a copy instruction's offset is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetOrigin {
    /// The offset indexes the window directly (classic LZSS).
    Absolute,
    /// The offset counts back from the moving write cursor.
    BehindCursor,
}

/// Full parameter set for one format's decompressor.
///
/// There is no `Default`: control polarity in particular is inconsistent
/// across formats (and in at least one case empirically discovered), so every
/// format spells out its parameters or uses a named preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LzssConfig {
    /// Frame capacity in bytes, typically 4096-16384.
    pub window_capacity: usize,
    /// Value the frame is pre-filled with, commonly 0x20 or 0x00.
    pub fill_byte: u8,
    /// Write cursor position when decoding starts.
    pub initial_pos: usize,
    pub bit_order: BitOrder,
    /// Whether a set control bit selects the literal branch.
    pub literal_on_set: bool,
    pub coding: CopyCoding,
    /// Added to the decoded offset field before use.
    pub offset_bias: usize,
    /// Added to the decoded count field before use.
    pub count_bias: usize,
    pub offset_origin: OffsetOrigin,
    /// Whether running out of input simply ends the stream. Some formats
    /// terminate precisely on the declared output size, others loop until
    /// input runs dry; stopping early must not be an error for the latter.
    pub eof_is_terminator: bool,
}

impl LzssConfig {
    /// The classic Okumura `lzss.c` parameter set: 4 KiB frame filled with
    /// spaces, cursor starting at 0xFEE, set control bit = literal.
    pub fn okumura() -> LzssConfig {
        return LzssConfig {
            window_capacity: 0x1000,
            fill_byte: 0x20,
            initial_pos: 0xFEE,
            bit_order: BitOrder::LsbFirst,
            literal_on_set: true,
            coding: CopyCoding::BytePair,
            offset_bias: 0,
            count_bias: 3,
            offset_origin: OffsetOrigin::Absolute,
            eof_is_terminator: true,
        };
    }

    /// The bitmap-plus-back-reference family: a zero-filled frame the size of
    /// the offset range, offsets counted back from the cursor (minimum
    /// distance 1), clear control bit = literal.
    pub fn backref16(offset_bits: u8) -> LzssConfig {
        return LzssConfig {
            window_capacity: 1usize << offset_bits,
            fill_byte: 0x00,
            initial_pos: 0,
            bit_order: BitOrder::LsbFirst,
            literal_on_set: false,
            coding: CopyCoding::BitFields {
                offset_bits,
                count_bits: 16 - offset_bits,
            },
            offset_bias: 1,
            count_bias: 3,
            offset_origin: OffsetOrigin::BehindCursor,
            eof_is_terminator: true,
        };
    }
}

/// Two-state (literal/copy) decoder over a configured window.
///
/// Owns nothing between calls; every [`SlidingWindowDecompressor::decode`]
/// allocates its own frame and cursor, so one engine value may serve
/// concurrent decodes.
#[derive(Debug, Clone)]
pub struct SlidingWindowDecompressor {
    config: LzssConfig,
}

impl SlidingWindowDecompressor {
    /// Validate the parameter set and build an engine for it.
    pub fn new(config: LzssConfig) -> Result<SlidingWindowDecompressor, CodecError> {
        if config.window_capacity == 0 {
            return Err(CodecError::UnsupportedVariant("zero window capacity"));
        }
        if let CopyCoding::BitFields {
            offset_bits,
            count_bits,
        } = config.coding
        {
            if offset_bits == 0 || offset_bits > 24 {
                return Err(CodecError::UnsupportedVariant("offset field width"));
            }
            if count_bits == 0 || count_bits > 24 {
                return Err(CodecError::UnsupportedVariant("count field width"));
            }
        }
        return Ok(SlidingWindowDecompressor { config });
    }

    pub fn config(&self) -> &LzssConfig {
        return &self.config;
    }

    /// Decode `input` into at most `unpacked_size` bytes.
    ///
    /// Returns exactly `unpacked_size` bytes unless the format declares
    /// end-of-input a terminator, in which case the output may stop short.
    /// Truncation anywhere else propagates as an error rather than being
    /// silently turned into partial output.
    pub fn decode(&self, input: &[u8], unpacked_size: usize) -> Result<Vec<u8>, CodecError> {
        let cfg = &self.config;
        let mut window = Window::new(cfg.window_capacity, cfg.fill_byte, cfg.initial_pos)?;
        let mut cursor = BitCursor::new(input, cfg.bit_order);
        let mut out: Vec<u8> = Vec::with_capacity(unpacked_size);

        while out.len() < unpacked_size {
            let bit = match cursor.get_bits(1) {
                Ok(bit) => bit,
                Err(BitError::Truncated { .. }) if cfg.eof_is_terminator => break,
                Err(e) => return Err(e.into()),
            };
            let is_literal = (bit == 1) == cfg.literal_on_set;
            if is_literal {
                let byte = match self.read_literal(&mut cursor) {
                    Ok(byte) => byte,
                    Err(BitError::Truncated { .. }) if cfg.eof_is_terminator => break,
                    Err(e) => return Err(e.into()),
                };
                out.push(byte);
                window.push(byte);
            } else {
                let (offset, count) = match self.read_copy(&mut cursor) {
                    Ok(pair) => pair,
                    Err(BitError::Truncated { .. }) if cfg.eof_is_terminator => break,
                    Err(e) => return Err(e.into()),
                };
                let offset = offset + cfg.offset_bias;
                let count = (count + cfg.count_bias).min(unpacked_size - out.len());
                let src = match cfg.offset_origin {
                    OffsetOrigin::Absolute => offset,
                    OffsetOrigin::BehindCursor => window.behind(offset),
                };
                window.copy_overlapped(src, count, &mut out);
            }
        }
        return Ok(out);
    }

    fn read_literal(&self, cursor: &mut BitCursor) -> Result<u8, BitError> {
        match self.config.coding {
            CopyCoding::BytePair => return cursor.read_byte_raw(),
            CopyCoding::BitFields { .. } => {
                let v = cursor.get_bits(8)?;
                return Ok(v as u8);
            }
        }
    }

    fn read_copy(&self, cursor: &mut BitCursor) -> Result<(usize, usize), BitError> {
        match self.config.coding {
            CopyCoding::BytePair => {
                let lo = usize::from(cursor.read_byte_raw()?);
                let hi = usize::from(cursor.read_byte_raw()?);
                return Ok((lo | ((hi & 0xF0) << 4), hi & 0x0F));
            }
            CopyCoding::BitFields {
                offset_bits,
                count_bits,
            } => {
                let offset = cursor.get_bits(offset_bits)? as usize;
                let count = cursor.get_bits(count_bits)? as usize;
                return Ok((offset, count));
            }
        }
    }
}
