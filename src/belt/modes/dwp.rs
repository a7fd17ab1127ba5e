use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::belt::block::encrypt_words;
use crate::belt::key::{ExpandedKey, Key};
use crate::belt::modes::ctr::BeltCtr;
use crate::belt::util::{block_from_words, gf128_mul};

/*
Encrypt-then-authenticate, per STB 34.101.31:

s = belt(IV)                       (the CTR base; data blocks use s+1, s+2, ...)
r = belt(0)                        (the GF(2^128) multiplier, from an all-zero block)
t = 0
for each 16-byte chunk b of AAD || CT (each part zero-padded to a block):
    t = (t ^ b) * r
t = (t ^ (bitlen(AAD)_64 || bitlen(CT)_64)) * r
tag = first 8 bytes of t ^ belt(s)

belt(s), the encrypted initial counter, acts as the authentication key masking the
polynomial accumulator; the counter value s itself is never used for the keystream.
*/

/// Streaming **DWP** authenticated encryption state.
///
/// Combines CTR encryption with a GF(2^128) polynomial MAC over the associated data and
/// the ciphertext. All associated data must be absorbed before the first
/// [`encrypt`](Self::encrypt) / [`decrypt`](Self::decrypt) /
/// [`absorb_ciphertext`](Self::absorb_ciphertext) call. On the sealing side, every
/// encrypted region must also be passed to `absorb_ciphertext` for the tag to cover it;
/// on the opening side, absorb the ciphertext and check [`verify`](Self::verify) before
/// decrypting.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct BeltDwp {
    ctr: BeltCtr,
    r: u128,
    mask: u128,
    t: u128,
    block: [u8; 16],
    filled: usize,
    aad_bits: u64,
    data_bits: u64,
    aad_finished: bool,
}

impl BeltDwp {
    /// Creates a DWP state from the provided key and IV.
    pub fn new(key: &Key, iv: &[u8; 16]) -> Self {
        Self::with_key(ExpandedKey::new(key), iv)
    }

    pub(crate) fn with_key(key: ExpandedKey, iv: &[u8; 16]) -> Self {
        let ctr = BeltCtr::with_key(key.clone(), iv);
        // the GF(2^128) multiplier comes from an encrypted all-zero block
        let mut r = [0u32; 4];
        encrypt_words(&mut r, &key);
        // the authentication key masking the tag is the encrypted initial counter
        let mut mask = ctr.ctr;
        encrypt_words(&mut mask, &key);
        Self {
            ctr,
            r: u128::from_le_bytes(block_from_words(&r)),
            mask: u128::from_le_bytes(block_from_words(&mask)),
            t: 0,
            block: [0u8; 16],
            filled: 0,
            aad_bits: 0,
            data_bits: 0,
            aad_finished: false,
        }
    }

    /// Absorbs associated data into the MAC. Must precede any ciphertext operation.
    pub fn absorb_aad(&mut self, data: &[u8]) {
        debug_assert!(
            !self.aad_finished,
            "associated data must precede any ciphertext operation"
        );
        self.aad_bits = self.aad_bits.wrapping_add(8 * data.len() as u64);
        self.absorb(data);
    }

    /// Encrypts `buf` in place in CTR mode. Arbitrary chunking.
    pub fn encrypt(&mut self, buf: &mut [u8]) {
        self.close_aad();
        self.ctr.apply_keystream(buf);
    }

    /// Decrypts `buf` in place in CTR mode. Arbitrary chunking.
    pub fn decrypt(&mut self, buf: &mut [u8]) {
        self.close_aad();
        self.ctr.apply_keystream(buf);
    }

    /// Absorbs ciphertext into the MAC. Arbitrary chunking.
    pub fn absorb_ciphertext(&mut self, data: &[u8]) {
        self.close_aad();
        self.data_bits = self.data_bits.wrapping_add(8 * data.len() as u64);
        self.absorb(data);
    }

    /// Zero-pads and folds in any buffered associated data when the data phase begins.
    fn close_aad(&mut self) {
        if !self.aad_finished {
            if self.filled > 0 {
                self.t = gf128_mul(self.t ^ self.padded_residue(), self.r);
                self.filled = 0;
            }
            self.aad_finished = true;
        }
    }

    fn absorb(&mut self, mut data: &[u8]) {
        if self.filled > 0 {
            let take = (16 - self.filled).min(data.len());
            self.block[self.filled..self.filled + take].copy_from_slice(&data[..take]);
            self.filled += take;
            data = &data[take..];
            if self.filled < 16 {
                return;
            }
            self.t = gf128_mul(self.t ^ u128::from_le_bytes(self.block), self.r);
            self.filled = 0;
        }
        while data.len() >= 16 {
            let x = u128::from_le_bytes(data[..16].try_into().unwrap()); // loop guarantees 16 bytes
            self.t = gf128_mul(self.t ^ x, self.r);
            data = &data[16..];
        }
        self.block[..data.len()].copy_from_slice(data);
        self.filled = data.len();
    }

    fn padded_residue(&self) -> u128 {
        let mut last = [0u8; 16];
        last[..self.filled].copy_from_slice(&self.block[..self.filled]);
        u128::from_le_bytes(last)
    }

    /// Produces the 8-byte tag over everything absorbed so far. Idempotent.
    pub fn tag(&self) -> [u8; 8] {
        let mut t = self.t;
        if self.filled > 0 {
            t = gf128_mul(t ^ self.padded_residue(), self.r);
        }
        let lengths = (self.aad_bits as u128) | ((self.data_bits as u128) << 64);
        t = gf128_mul(t ^ lengths, self.r);
        let mut out = [0u8; 8];
        out.copy_from_slice(&(t ^ self.mask).to_le_bytes()[..8]);
        out
    }

    /// Compares the expected tag against the computed one in constant time.
    pub fn verify(&self, expected: &[u8; 8]) -> bool {
        self.tag()[..].ct_eq(&expected[..]).into()
    }
}
