//! Bounds-checked random access into a raw container.
//!
//! Every offset that originates in an archive index must be routed through
//! [`BoundedSource`]; it is the sole gate between untrusted index fields and
//! out-of-bounds reads.

use core::convert::TryFrom;

/// The error type returned by [`BoundedSource`] reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceError {
    /// A read would extend past the end of the container,
    /// or its end position is not representable.
    OutOfRange { offset: u64, len: u64, bound: u64 },
}

/// Read-only, randomly-addressable view over a fixed-length byte container.
///
/// All reads are range-checked against the container length and either return
/// exactly the requested bytes or fail with [`SourceError::OutOfRange`];
/// partial reads are never returned silently. The view is immutable, so it
/// may be shared freely between threads decoding independent entries.
#[derive(Debug, Clone, Copy)]
pub struct BoundedSource<'a> {
    data: &'a [u8],
}

impl<'a> BoundedSource<'a> {
    /// Create a view over the given container bytes.
    pub fn new(data: &'a [u8]) -> BoundedSource<'a> {
        return BoundedSource { data };
    }

    /// Length of the underlying container in bytes.
    pub fn len(&self) -> u64 {
        return self.data.len() as u64;
    }

    pub fn is_empty(&self) -> bool {
        return self.data.is_empty();
    }

    /// Read exactly `len` bytes starting at `offset`.
    pub fn read(&self, offset: u64, len: u64) -> Result<&'a [u8], SourceError> {
        let out_of_range = SourceError::OutOfRange {
            offset,
            len,
            bound: self.len(),
        };
        let end = match offset.checked_add(len) {
            Some(end) => end,
            None => return Err(out_of_range),
        };
        if end > self.len() {
            return Err(out_of_range);
        }
        // Both fit in usize: end <= data.len(), which came from a slice.
        let start = match usize::try_from(offset) {
            Ok(s) => s,
            Err(_) => return Err(out_of_range),
        };
        let end = match usize::try_from(end) {
            Ok(e) => e,
            Err(_) => return Err(out_of_range),
        };
        return Ok(&self.data[start..end]);
    }

    pub fn read_u8(&self, offset: u64) -> Result<u8, SourceError> {
        let b = self.read(offset, 1)?;
        return Ok(b[0]);
    }

    pub fn read_u16_le(&self, offset: u64) -> Result<u16, SourceError> {
        let b = self.read(offset, 2)?;
        return Ok(u16::from_le_bytes([b[0], b[1]]));
    }

    pub fn read_u16_be(&self, offset: u64) -> Result<u16, SourceError> {
        let b = self.read(offset, 2)?;
        return Ok(u16::from_be_bytes([b[0], b[1]]));
    }

    pub fn read_u32_le(&self, offset: u64) -> Result<u32, SourceError> {
        let b = self.read(offset, 4)?;
        return Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]));
    }

    pub fn read_u32_be(&self, offset: u64) -> Result<u32, SourceError> {
        let b = self.read(offset, 4)?;
        return Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]));
    }

    pub fn read_u64_le(&self, offset: u64) -> Result<u64, SourceError> {
        let b = self.read(offset, 8)?;
        return Ok(u64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]));
    }

    pub fn read_u64_be(&self, offset: u64) -> Result<u64, SourceError> {
        let b = self.read(offset, 8)?;
        return Ok(u64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]));
    }
}
