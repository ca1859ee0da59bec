//! Sequential bit-level reading over a byte stream.
//!
//! Compressed streams in this corpus interleave bit-granular control fields
//! with byte-aligned data. [`BitCursor`] buffers at most 31 bits at a time,
//! refilling one byte exactly when a request exceeds what is buffered, and
//! additionally exposes [`BitCursor::read_byte_raw`] which reads from the
//! underlying stream while leaving the bit buffer untouched. That models the
//! classic LZSS layout where a consumed control byte supplies eight flags
//! while literal and offset/count bytes follow byte-aligned.

/// Which end of each refilled byte is consumed first.
///
/// Format-selectable, never auto-detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOrder {
    MsbFirst,
    LsbFirst,
}

/// The error type returned by [`BitCursor`] reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitError {
    /// The stream ran out of bytes before the request completed.
    /// Zero bits are never fabricated; formats that treat end-of-stream as an
    /// implicit terminator handle this at the decompressor layer.
    Truncated { byte_pos: usize },
    /// `get_bits` serves at most 24 bits per request; wider reads are
    /// decomposed by the caller.
    TooWide { requested: u8 },
}

/// Sequential bit reader over a byte slice.
#[derive(Debug, Clone)]
pub struct BitCursor<'a> {
    data: &'a [u8],
    bit_buffer: u32,
    bits_available: u8,
    byte_pos: usize,
    order: BitOrder,
}

impl<'a> BitCursor<'a> {
    pub fn new(data: &'a [u8], order: BitOrder) -> BitCursor<'a> {
        return BitCursor {
            data,
            bit_buffer: 0,
            bits_available: 0,
            byte_pos: 0,
            order,
        };
    }

    pub fn order(&self) -> BitOrder {
        return self.order;
    }

    /// Position of the next byte to be pulled from the underlying stream.
    pub fn byte_pos(&self) -> usize {
        return self.byte_pos;
    }

    /// True once the buffer is drained and no bytes remain in the stream.
    pub fn is_exhausted(&self) -> bool {
        return self.bits_available == 0 && self.byte_pos >= self.data.len();
    }

    fn refill_byte(&mut self) -> Result<(), BitError> {
        let byte = match self.data.get(self.byte_pos) {
            Some(b) => *b,
            None => {
                return Err(BitError::Truncated {
                    byte_pos: self.byte_pos,
                })
            }
        };
        self.byte_pos += 1;
        match self.order {
            BitOrder::MsbFirst => {
                self.bit_buffer = (self.bit_buffer << 8) | u32::from(byte);
            }
            BitOrder::LsbFirst => {
                self.bit_buffer |= u32::from(byte) << self.bits_available;
            }
        }
        self.bits_available += 8;
        return Ok(());
    }

    /// Read `n` bits (`n <= 24`), refilling from the stream as needed.
    ///
    /// MSB-first consumes the high bit of each refilled byte first and packs
    /// the first bit read into the result's high position; LSB-first consumes
    /// the low bit first and packs the first bit read into bit 0.
    pub fn get_bits(&mut self, n: u8) -> Result<u32, BitError> {
        if n > 24 {
            return Err(BitError::TooWide { requested: n });
        }
        if n == 0 {
            return Ok(0);
        }
        // bits_available stays below 32: at most 23 buffered before a refill.
        while self.bits_available < n {
            self.refill_byte()?;
        }
        let mask = (1u32 << n) - 1;
        match self.order {
            BitOrder::MsbFirst => {
                self.bits_available -= n;
                let val = (self.bit_buffer >> self.bits_available) & mask;
                self.bit_buffer &= (1u32 << self.bits_available) - 1;
                return Ok(val);
            }
            BitOrder::LsbFirst => {
                let val = self.bit_buffer & mask;
                self.bit_buffer >>= n;
                self.bits_available -= n;
                return Ok(val);
            }
        }
    }

    /// Look at the next bit without consuming it.
    pub fn peek_bit(&mut self) -> Result<u32, BitError> {
        if self.bits_available == 0 {
            self.refill_byte()?;
        }
        match self.order {
            BitOrder::MsbFirst => {
                return Ok((self.bit_buffer >> (self.bits_available - 1)) & 1);
            }
            BitOrder::LsbFirst => {
                return Ok(self.bit_buffer & 1);
            }
        }
    }

    /// Discard any buffered bits so the next bit read starts on a byte
    /// boundary.
    pub fn align_to_byte(&mut self) {
        self.bit_buffer = 0;
        self.bits_available = 0;
    }

    /// Read one byte from the underlying stream position, bypassing (and
    /// preserving) the bit buffer.
    pub fn read_byte_raw(&mut self) -> Result<u8, BitError> {
        let byte = match self.data.get(self.byte_pos) {
            Some(b) => *b,
            None => {
                return Err(BitError::Truncated {
                    byte_pos: self.byte_pos,
                })
            }
        };
        self.byte_pos += 1;
        return Ok(byte);
    }
}
