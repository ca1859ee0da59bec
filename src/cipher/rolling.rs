//! Per-byte keys derived from the absolute stream position.
//!
//! A handful of engines never carry key material at all; each byte's key is
//! recomputed from where the byte sits in the file (and sometimes how much of
//! the entry remains), mixed through wrapping multiplications and rotations
//! seeded by an archive-level constant.

/// Key byte for absolute position `pos` with `remaining` bytes left in the
/// entry, under archive constant `seed`.
pub fn rolling_key_byte(seed: u32, pos: u64, remaining: u64) -> u8 {
    let p = pos as u32;
    let r = remaining as u32;
    let mut k = seed ^ p.wrapping_mul(0x0808_8405).wrapping_add(1);
    k = k.rotate_left((p & 7) + 1) ^ r.wrapping_mul(0x0003_43FD);
    return (k ^ (k >> 16) ^ (k >> 24)) as u8;
}

/// Decode `buf` in place. `base_offset` is the absolute position of `buf[0]`.
///
/// The feedback variant XORs each key byte with the previously *decoded*
/// byte, so it must run forward; the plain variant is stateless across bytes
/// and is its own inverse.
pub fn rolling_decode(buf: &mut [u8], seed: u32, base_offset: u64, feedback: bool) {
    let total = buf.len() as u64;
    let mut prev = (seed & 0xFF) as u8;
    for (i, b) in buf.iter_mut().enumerate() {
        let pos = base_offset + i as u64;
        let remaining = total - i as u64;
        let mut key = rolling_key_byte(seed, pos, remaining);
        if feedback {
            key ^= prev;
        }
        let plain = *b ^ key;
        if feedback {
            prev = plain;
        }
        *b = plain;
    }
}

/// Forward pass over plaintext; inverse of [`rolling_decode`].
pub fn rolling_encode(buf: &mut [u8], seed: u32, base_offset: u64, feedback: bool) {
    let total = buf.len() as u64;
    let mut prev = (seed & 0xFF) as u8;
    for (i, b) in buf.iter_mut().enumerate() {
        let pos = base_offset + i as u64;
        let remaining = total - i as u64;
        let mut key = rolling_key_byte(seed, pos, remaining);
        if feedback {
            key ^= prev;
            prev = *b;
        }
        *b ^= key;
    }
}
