//! XOR-family transforms: repeating key and rotating accumulator.

/// Repeating-key XOR. `base_offset` phases the key so that decoding a slice
/// cut from the middle of a stream matches decoding the whole stream.
pub fn static_xor(buf: &mut [u8], key: &[u8], base_offset: u64) {
    if key.is_empty() {
        return;
    }
    let klen = key.len() as u64;
    let mut phase = (base_offset % klen) as usize;
    for b in buf.iter_mut() {
        *b ^= key[phase];
        phase += 1;
        if phase == key.len() {
            phase = 0;
        }
    }
}

/// Rotating 32-bit XOR state.
///
/// The accumulator covers four bytes at a time (little-endian) and steps
/// `k = k * step_mul + step_add` between words. The feedback variant
/// additionally folds the ciphertext word into the step, so it can only be
/// decoded forward from the stream origin. A trailing partial word consumes
/// the accumulator's low bytes without stepping it.
#[derive(Debug, Clone)]
pub struct RotatingXor {
    key: u32,
    step_mul: u32,
    step_add: u32,
    feedback: bool,
}

impl RotatingXor {
    pub fn new(seed: u32, step_mul: u32, step_add: u32, feedback: bool) -> RotatingXor {
        return RotatingXor {
            key: seed,
            step_mul,
            step_add,
            feedback,
        };
    }

    /// Current accumulator value.
    pub fn key(&self) -> u32 {
        return self.key;
    }

    fn step(&mut self, cipher_word: u32) {
        self.key = self.key.wrapping_mul(self.step_mul).wrapping_add(self.step_add);
        if self.feedback {
            self.key ^= cipher_word;
        }
    }

    /// Advance the accumulator as if `n` words had been processed.
    /// Only meaningful for the non-feedback variant, which does not depend on
    /// the skipped ciphertext.
    pub fn skip_words(&mut self, n: u64) {
        for _ in 0..n {
            self.step(0);
        }
    }

    /// Decode a slice whose first byte sits `phase` bytes into the current
    /// word: the remaining key bytes of that word are consumed first, then
    /// the word loop continues aligned. Like [`RotatingXor::skip_words`],
    /// only meaningful for the non-feedback variant.
    pub fn decode_at(&mut self, buf: &mut [u8], phase: usize) {
        let phase = phase % 4;
        if phase == 0 {
            self.decode(buf);
            return;
        }
        let key_bytes = self.key.to_le_bytes();
        let head_len = (4 - phase).min(buf.len());
        let (head, tail) = buf.split_at_mut(head_len);
        for (i, b) in head.iter_mut().enumerate() {
            *b ^= key_bytes[phase + i];
        }
        // A buffer ending inside the word leaves the accumulator unstepped,
        // matching the trailing-partial-word rule of `decode`.
        if head_len == 4 - phase {
            self.step(0);
            self.decode(tail);
        }
    }

    /// Decode `buf` in place, consuming it as little-endian 32-bit words.
    pub fn decode(&mut self, buf: &mut [u8]) {
        let mut chunks = buf.chunks_exact_mut(4);
        for chunk in &mut chunks {
            let cipher_word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            let plain = cipher_word ^ self.key;
            chunk.copy_from_slice(&plain.to_le_bytes());
            self.step(cipher_word);
        }
        let key_bytes = self.key.to_le_bytes();
        for (i, b) in chunks.into_remainder().iter_mut().enumerate() {
            *b ^= key_bytes[i];
        }
    }

    /// Encode is the forward pass over plaintext; identical to decode except
    /// that the feedback step folds the word this pass produced.
    pub fn encode(&mut self, buf: &mut [u8]) {
        let mut chunks = buf.chunks_exact_mut(4);
        for chunk in &mut chunks {
            let plain_word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            let cipher_word = plain_word ^ self.key;
            chunk.copy_from_slice(&cipher_word.to_le_bytes());
            self.step(cipher_word);
        }
        let key_bytes = self.key.to_le_bytes();
        for (i, b) in chunks.into_remainder().iter_mut().enumerate() {
            *b ^= key_bytes[i];
        }
    }
}
