// crates/zt_core/src/rng.rs
//
// Deterministic hash-stream RNG for tie-breaking and shuffles.
//
// The stream is a SHA-256 digest sliced into 4-byte big-endian words; when
// the digest is exhausted it is re-hashed and slicing restarts. No platform
// PRNG is involved: any implementation with the same hash primitive produces
// a bit-identical stream, so tie-break assignments reproduce across
// languages and architectures.
//
// The initial digest is SHA-256 of the seed's decimal string (not its raw
// bytes) — this matches the legacy wire contract and must not change.

use alloc::string::ToString;
use alloc::vec::Vec;

use sha2::{Digest, Sha256};

/// Deterministic word stream seeded from a 64-bit seed.
#[derive(Debug, Clone)]
pub struct HashStream {
    digest: [u8; 32],
    cursor: usize,
    words_drawn: u64,
}

impl HashStream {
    /// Construct from a 64-bit seed. The mapping is explicit: the stream
    /// starts at SHA-256 of the seed formatted in decimal.
    pub fn from_seed_u64(seed: u64) -> Self {
        let digest: [u8; 32] = Sha256::digest(seed.to_string().as_bytes()).into();
        Self { digest, cursor: 0, words_drawn: 0 }
    }

    /// Total number of 32-bit words drawn so far (draw counter).
    #[inline]
    pub fn words_drawn(&self) -> u64 {
        self.words_drawn
    }

    /// Next 4 bytes of the digest stream as a big-endian u32; re-hashes the
    /// digest when fewer than 4 bytes remain.
    pub fn next_u32(&mut self) -> u32 {
        if self.cursor + 4 > self.digest.len() {
            self.digest = Sha256::digest(self.digest).into();
            self.cursor = 0;
        }
        let b = &self.digest[self.cursor..self.cursor + 4];
        self.cursor += 4;
        self.words_drawn = self.words_drawn.saturating_add(1);
        u32::from_be_bytes([b[0], b[1], b[2], b[3]])
    }

    /// Unbiased integer in [0, n) via rejection sampling (threshold trick:
    /// accept x >= 2^32 mod n, then x % n is uniform). `None` if `n == 0`.
    pub fn gen_range(&mut self, n: u32) -> Option<u32> {
        if n == 0 {
            return None;
        }
        let threshold = n.wrapping_neg() % n; // == (2^32 % n)
        loop {
            let x = self.next_u32();
            if x >= threshold {
                return Some(x % n);
            }
        }
    }

    /// Deterministic in-place Fisher–Yates shuffle.
    pub fn shuffle_in_place<T>(&mut self, slice: &mut [T]) {
        let len = slice.len();
        if len <= 1 {
            return;
        }
        let mut i = len - 1;
        loop {
            let j = match self.gen_range((i as u32) + 1) {
                Some(v) => v as usize,
                None => unreachable!("gen_range(>0) must return Some"),
            };
            slice.swap(i, j);
            if i == 1 {
                break;
            }
            i -= 1;
        }
    }

    /// One tie-break word per entry, drawn in order. Callers must present
    /// entries in a canonical order (e.g., participants sorted by id).
    pub fn tie_breaks(&mut self, count: usize) -> Vec<u32> {
        (0..count).map(|_| self.next_u32()).collect()
    }
}
