//! The circular history buffer ("frame") used for back-references.

use alloc::vec;
use alloc::vec::Vec;

use super::CodecError;

/// Ring buffer of fixed capacity with a write cursor.
///
/// The buffer is pre-filled with the format's fill byte, so back-references
/// into slots no instruction has written yet are defined to produce the fill
/// value rather than being an error; the source formats never validate
/// against "uninitialized" window reads and some rely on reading the fill.
///
/// One `Window` lives per decompression call. Formats reset frame state per
/// entry, so there is no cross-entry reuse.
#[derive(Debug, Clone)]
pub struct Window {
    buf: Vec<u8>,
    pos: usize,
}

impl Window {
    /// `capacity` must be non-zero.
    pub fn new(capacity: usize, fill: u8, initial_pos: usize) -> Result<Window, CodecError> {
        if capacity == 0 {
            return Err(CodecError::UnsupportedVariant("zero window capacity"));
        }
        return Ok(Window {
            buf: vec![fill; capacity],
            pos: initial_pos % capacity,
        });
    }

    pub fn capacity(&self) -> usize {
        return self.buf.len();
    }

    /// Current write cursor.
    pub fn pos(&self) -> usize {
        return self.pos;
    }

    /// Write one byte at the cursor and advance it, wrapping modulo capacity.
    pub fn push(&mut self, byte: u8) {
        self.buf[self.pos] = byte;
        self.pos = (self.pos + 1) % self.buf.len();
    }

    /// Read the slot at `index`, wrapped modulo capacity.
    pub fn get(&self, index: usize) -> u8 {
        return self.buf[index % self.buf.len()];
    }

    /// Index of the slot `distance` positions behind the write cursor.
    pub fn behind(&self, distance: usize) -> usize {
        let cap = self.buf.len();
        return (self.pos + cap - (distance % cap)) % cap;
    }

    /// Copy `count` bytes starting at window index `src` into both `out` and
    /// the window itself, one byte at a time.
    ///
    /// Each copied byte is written into the window before the next source
    /// byte is read, so copies whose source region overlaps the cursor expand
    /// as run-length patterns. A block-memory copy would get overlaps wrong;
    /// this is deliberately byte-by-byte.
    pub fn copy_overlapped(&mut self, src: usize, count: usize, out: &mut Vec<u8>) {
        let cap = self.buf.len();
        let mut src = src % cap;
        for _ in 0..count {
            let byte = self.buf[src];
            src = (src + 1) % cap;
            out.push(byte);
            self.push(byte);
        }
    }
}
