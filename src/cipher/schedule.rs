//! RC4-style key-scheduled permutation.

/// A 256-entry permutation table built from a key via the standard
/// key-scheduling swap loop.
///
/// The table held here is the immutable archive-level base state; every
/// decode call works on its own copy, so concurrent entries decode
/// independently without interference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySchedule {
    state: [u8; 256],
}

impl KeySchedule {
    /// Build the schedule. Behavior with an empty key is undefined by the
    /// source formats; callers reject empty keys before reaching here.
    pub fn new(key: &[u8]) -> KeySchedule {
        let mut state = [0u8; 256];
        for (i, slot) in state.iter_mut().enumerate() {
            *slot = i as u8;
        }
        if !key.is_empty() {
            let mut j: u8 = 0;
            for i in 0..256 {
                j = j
                    .wrapping_add(state[i])
                    .wrapping_add(key[i % key.len()]);
                state.swap(i, usize::from(j));
            }
        }
        return KeySchedule { state };
    }

    /// XOR `buf` with the keystream, in place. Self-inverse per position:
    /// the same `(key, skip)` pair always produces the same keystream.
    pub fn decode(&self, buf: &mut [u8]) {
        self.decode_at(buf, 0);
    }

    /// Like [`KeySchedule::decode`], but first discards `skip` keystream
    /// bytes so that `buf[0]` lines up with absolute stream position `skip`.
    pub fn decode_at(&self, buf: &mut [u8], skip: u64) {
        // Entry-local copy of the base state.
        let mut state = self.state;
        let mut i: u8 = 0;
        let mut j: u8 = 0;
        let mut keystream = move |state: &mut [u8; 256]| -> u8 {
            i = i.wrapping_add(1);
            j = j.wrapping_add(state[usize::from(i)]);
            state.swap(usize::from(i), usize::from(j));
            let idx = state[usize::from(i)].wrapping_add(state[usize::from(j)]);
            return state[usize::from(idx)];
        };
        for _ in 0..skip {
            let _ = keystream(&mut state);
        }
        for b in buf.iter_mut() {
            *b ^= keystream(&mut state);
        }
    }
}
