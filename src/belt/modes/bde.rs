use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::belt::block::{decrypt_block, encrypt_block};
use crate::belt::error::*;
use crate::belt::key::{ExpandedKey, Key};
use crate::belt::util::{block_at, gf128_mul_x, xor_bytes};

/// Streaming **block disk encryption** state.
///
/// An XEX-style sector mode: the tweak starts as belt(IV) and is multiplied by x in
/// GF(2^128) before every block; each block is encrypted as `belt(X ^ s) ^ s`. Input
/// must be a whole number of 16-byte blocks, in any chunking.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct BeltBde {
    key: ExpandedKey,
    tweak: u128,
}

impl BeltBde {
    /// Creates a BDE state from the provided key and IV.
    pub fn new(key: &Key, iv: &[u8; 16]) -> Self {
        Self::with_key(ExpandedKey::new(key), iv)
    }

    pub(crate) fn with_key(key: ExpandedKey, iv: &[u8; 16]) -> Self {
        let mut s = *iv;
        encrypt_block(&mut s, &key);
        Self {
            key,
            tweak: u128::from_le_bytes(s),
        }
    }

    /// Encrypts `buf` (a multiple of 16 bytes) in place.
    pub fn encrypt(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.len() % 16 != 0 {
            return Err(Error::InvalidLength {
                len: buf.len(),
                context: "BDE processes whole 16-byte blocks",
            });
        }
        for off in (0..buf.len()).step_by(16) {
            self.tweak = gf128_mul_x(self.tweak);
            let s = self.tweak.to_le_bytes();
            xor_bytes(&mut buf[off..off + 16], &s);
            encrypt_block(block_at(buf, off), &self.key);
            xor_bytes(&mut buf[off..off + 16], &s);
        }
        Ok(())
    }

    /// Decrypts `buf` (a multiple of 16 bytes) in place.
    pub fn decrypt(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.len() % 16 != 0 {
            return Err(Error::InvalidLength {
                len: buf.len(),
                context: "BDE processes whole 16-byte blocks",
            });
        }
        for off in (0..buf.len()).step_by(16) {
            self.tweak = gf128_mul_x(self.tweak);
            let s = self.tweak.to_le_bytes();
            xor_bytes(&mut buf[off..off + 16], &s);
            decrypt_block(block_at(buf, off), &self.key);
            xor_bytes(&mut buf[off..off + 16], &s);
        }
        Ok(())
    }
}
