//! belt-hash: the 256-bit hash of STB 34.101.31, built from the belt-based compression
//! function sigma1/sigma2. The compression function is shared with key diversification.

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::belt::block::encrypt_words;
use crate::belt::error::*;
use crate::belt::key::ExpandedKey;
use crate::belt::util::{block_from_words, words_from_block};

/// The belt compression function on a 64-byte input `X1 || X2 || X3 || X4`, with
/// `(X3, X4)` passed as the 8-word `h`. Returns `(sigma1, sigma2)`:
///
/// ```text
/// sigma1 = F_{X3 || X4}(X1 ^ X2) ^ X1 ^ X2
/// sigma2 = F_{sigma1 || X4}(X1) ^ X1  ||  F_{~sigma1 || X3}(X2) ^ X2
/// ```
///
/// The three cipher invocations are keyed by the 256-bit strings `X3 || X4`,
/// `sigma1 || X4`, and `~sigma1 || X3` used directly as belt keys (the named half
/// occupies the leading 16 key bytes); the data halves `X1` and `X2` are the
/// plaintexts, each folded back into its own ciphertext.
pub(crate) fn compress(x1: &[u32; 4], x2: &[u32; 4], h: &[u32; 8]) -> ([u32; 4], [u32; 8]) {
    let x3 = [h[0], h[1], h[2], h[3]];
    let x4 = [h[4], h[5], h[6], h[7]];

    let t = [x1[0] ^ x2[0], x1[1] ^ x2[1], x1[2] ^ x2[2], x1[3] ^ x2[3]];
    let mut s1 = t;
    encrypt_words(&mut s1, &theta(&x3, &x4));
    for i in 0..4 {
        s1[i] ^= t[i];
    }

    let mut y1 = *x1;
    encrypt_words(&mut y1, &theta(&s1, &x4));
    for i in 0..4 {
        y1[i] ^= x1[i];
    }

    let ns1 = [!s1[0], !s1[1], !s1[2], !s1[3]];
    let mut y2 = *x2;
    encrypt_words(&mut y2, &theta(&ns1, &x3));
    for i in 0..4 {
        y2[i] ^= x2[i];
    }

    (
        s1,
        [y1[0], y1[1], y1[2], y1[3], y2[0], y2[1], y2[2], y2[3]],
    )
}

/// Forms the 256-bit belt key `first || second` from two 128-bit halves.
#[inline(always)]
fn theta(first: &[u32; 4], second: &[u32; 4]) -> ExpandedKey {
    ExpandedKey([
        first[0], first[1], first[2], first[3], second[0], second[1], second[2], second[3],
    ])
}

// the initial hash value from the standard:
// B194BAC80A08F53B366D008E584A5DE4BE32971343FC9A48A02A885F194B09A1
const HASH_IV: [u32; 8] = [
    0xC8BA94B1, 0x3BF5080A, 0x8E006D36, 0xE45D4A58, 0x139732BE, 0x489AFC43, 0x5F882AA0, 0xA1094B19,
];

/// Streaming **belt-hash** state producing a 256-bit digest.
///
/// Absorbs input in 32-byte blocks; the running state is the pair `(h, s)` plus a bit
/// counter, and finalisation (zero-padding the residue and folding in the length) runs
/// on copies, so [`digest`](Self::digest) and [`verify`](Self::verify) can be read at
/// any point and the stream continued afterwards.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct BeltHash {
    h: [u32; 8],
    s: [u32; 4],
    bit_len: u64,
    block: [u8; 32],
    filled: usize,
}

impl Default for BeltHash {
    fn default() -> Self {
        Self::new()
    }
}

impl BeltHash {
    /// Creates an empty hash state.
    pub fn new() -> Self {
        Self {
            h: HASH_IV,
            s: [0u32; 4],
            bit_len: 0,
            block: [0u8; 32],
            filled: 0,
        }
    }

    /// Absorbs message bytes. Any chunking is accepted.
    pub fn update(&mut self, mut data: &[u8]) {
        self.bit_len = self.bit_len.wrapping_add(8 * data.len() as u64);
        if self.filled > 0 {
            let take = (32 - self.filled).min(data.len());
            self.block[self.filled..self.filled + take].copy_from_slice(&data[..take]);
            self.filled += take;
            data = &data[take..];
            if self.filled < 32 {
                return;
            }
            let block = self.block;
            self.absorb_block(&block);
            self.filled = 0;
        }
        while data.len() >= 32 {
            let (chunk, rest) = data.split_at(32);
            self.absorb_block(chunk.try_into().unwrap()); // split_at guarantees 32 bytes
            data = rest;
        }
        self.block[..data.len()].copy_from_slice(data);
        self.filled = data.len();
    }

    fn absorb_block(&mut self, chunk: &[u8; 32]) {
        let x1 = words_from_block(&chunk[..16]);
        let x2 = words_from_block(&chunk[16..]);
        let (s1, h) = compress(&x1, &x2, &self.h);
        for i in 0..4 {
            self.s[i] ^= s1[i];
        }
        self.h = h;
    }

    /// Produces the 32-byte digest of everything absorbed so far. Idempotent: the
    /// stream may continue with further [`update`](Self::update) calls afterwards.
    pub fn digest(&self) -> [u8; 32] {
        let mut s = self.s;
        let mut h = self.h;
        if self.filled > 0 {
            let mut last = [0u8; 32];
            last[..self.filled].copy_from_slice(&self.block[..self.filled]);
            let x1 = words_from_block(&last[..16]);
            let x2 = words_from_block(&last[16..]);
            let (s1, h1) = compress(&x1, &x2, &h);
            for i in 0..4 {
                s[i] ^= s1[i];
            }
            h = h1;
        }
        // finalisation: sigma2(<bit length>_128 || s || h)
        let len_block = [self.bit_len as u32, (self.bit_len >> 32) as u32, 0, 0];
        let (_, out) = compress(&len_block, &s, &h);
        let mut digest = [0u8; 32];
        digest[..16].copy_from_slice(&block_from_words(&[out[0], out[1], out[2], out[3]]));
        digest[16..].copy_from_slice(&block_from_words(&[out[4], out[5], out[6], out[7]]));
        digest
    }

    /// Writes the first `out.len()` digest bytes (1..=32) into `out`.
    ///
    /// # Panics
    /// Panics if `out` is empty or longer than 32 bytes.
    pub fn digest_truncated(&self, out: &mut [u8]) {
        assert!(
            (1..=32).contains(&out.len()),
            "belt-hash digests are 1 to 32 bytes"
        );
        out.copy_from_slice(&self.digest()[..out.len()]);
    }

    /// Compares the expected digest against the computed one in constant time.
    pub fn verify(&self, expected: &[u8; 32]) -> bool {
        self.digest()[..].ct_eq(&expected[..]).into()
    }

    /// Compares the first `expected.len()` digest bytes (1..=32) in constant time.
    ///
    /// # Panics
    /// Panics if `expected` is empty or longer than 32 bytes.
    pub fn verify_truncated(&self, expected: &[u8]) -> bool {
        assert!(
            (1..=32).contains(&expected.len()),
            "belt-hash digests are 1 to 32 bytes"
        );
        self.digest()[..expected.len()].ct_eq(expected).into()
    }
}

/// One-shot belt-hash of `data`.
pub fn belt_hash(data: &[u8]) -> [u8; 32] {
    let mut state = BeltHash::new();
    state.update(data);
    state.digest()
}

/// Hashes `data` and compares against `expected` in constant time, returning
/// [`HashMismatch`](crate::Error::HashMismatch) on disagreement.
pub fn belt_hash_verify(data: &[u8], expected: &[u8; 32]) -> Result<()> {
    let mut state = BeltHash::new();
    state.update(data);
    if state.verify(expected) {
        Ok(())
    } else {
        Err(Error::HashMismatch)
    }
}
