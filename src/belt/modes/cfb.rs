use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::belt::block::encrypt_block;
use crate::belt::key::{ExpandedKey, Key};

/// Streaming **cipher feedback** state.
///
/// The previous ciphertext block (the IV at the start) is encrypted to produce a
/// keystream block which is XOR-ed into the data; ciphertext bytes then replace the
/// corresponding feedback bytes. Works on any input length with arbitrary chunking:
/// unused keystream bytes are retained and consumed first on the next call.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct BeltCfb {
    key: ExpandedKey,
    block: [u8; 16],
    reserved: usize,
}

impl BeltCfb {
    /// Creates a CFB state from the provided key and IV.
    pub fn new(key: &Key, iv: &[u8; 16]) -> Self {
        Self::with_key(ExpandedKey::new(key), iv)
    }

    pub(crate) fn with_key(key: ExpandedKey, iv: &[u8; 16]) -> Self {
        Self {
            key,
            block: *iv,
            reserved: 0,
        }
    }

    /// Encrypts `buf` in place.
    pub fn encrypt(&mut self, buf: &mut [u8]) {
        let mut i = 0;
        // keystream left over from the previous call
        while self.reserved > 0 && i < buf.len() {
            let j = 16 - self.reserved;
            buf[i] ^= self.block[j];
            self.block[j] = buf[i];
            self.reserved -= 1;
            i += 1;
        }
        while buf.len() - i >= 16 {
            encrypt_block(&mut self.block, &self.key);
            for j in 0..16 {
                buf[i + j] ^= self.block[j];
                self.block[j] = buf[i + j];
            }
            i += 16;
        }
        if i < buf.len() {
            encrypt_block(&mut self.block, &self.key);
            let tail = buf.len() - i;
            for j in 0..tail {
                buf[i + j] ^= self.block[j];
                self.block[j] = buf[i + j];
            }
            self.reserved = 16 - tail;
        }
    }

    /// Decrypts `buf` in place.
    pub fn decrypt(&mut self, buf: &mut [u8]) {
        let mut i = 0;
        while self.reserved > 0 && i < buf.len() {
            let j = 16 - self.reserved;
            let ct = buf[i];
            buf[i] ^= self.block[j];
            self.block[j] = ct;
            self.reserved -= 1;
            i += 1;
        }
        while buf.len() - i >= 16 {
            encrypt_block(&mut self.block, &self.key);
            for j in 0..16 {
                let ct = buf[i + j];
                buf[i + j] ^= self.block[j];
                self.block[j] = ct;
            }
            i += 16;
        }
        if i < buf.len() {
            encrypt_block(&mut self.block, &self.key);
            let tail = buf.len() - i;
            for j in 0..tail {
                let ct = buf[i + j];
                buf[i + j] ^= self.block[j];
                self.block[j] = ct;
            }
            self.reserved = 16 - tail;
        }
    }
}
