use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::belt::block::encrypt_words;
use crate::belt::key::{ExpandedKey, Key};
use crate::belt::util::{block_from_words, words_from_block, xor_bytes};

/// Streaming **counter mode** state.
///
/// The counter is initialised by encrypting the IV, then incremented as a 128-bit
/// little-endian integer (wrapping) before each keystream block is produced. Encryption
/// and decryption are the same keystream XOR; works on any input length with arbitrary
/// chunking, retaining unused keystream bytes between calls.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct BeltCtr {
    pub(crate) key: ExpandedKey,
    pub(crate) ctr: [u32; 4],
    gamma: [u8; 16],
    reserved: usize,
}

impl BeltCtr {
    /// Creates a CTR state from the provided key and IV.
    pub fn new(key: &Key, iv: &[u8; 16]) -> Self {
        Self::with_key(ExpandedKey::new(key), iv)
    }

    pub(crate) fn with_key(key: ExpandedKey, iv: &[u8; 16]) -> Self {
        let mut ctr = words_from_block(iv);
        encrypt_words(&mut ctr, &key);
        Self {
            key,
            ctr,
            gamma: [0u8; 16],
            reserved: 0,
        }
    }

    /// XORs the keystream into `buf` in place.
    pub fn apply_keystream(&mut self, buf: &mut [u8]) {
        let mut i = 0;
        if self.reserved > 0 {
            let take = self.reserved.min(buf.len());
            let start = 16 - self.reserved;
            xor_bytes(&mut buf[..take], &self.gamma[start..start + take]);
            self.reserved -= take;
            i = take;
        }
        while buf.len() - i >= 16 {
            self.next_gamma();
            xor_bytes(&mut buf[i..i + 16], &self.gamma);
            i += 16;
        }
        if i < buf.len() {
            self.next_gamma();
            let tail = buf.len() - i;
            xor_bytes(&mut buf[i..], &self.gamma[..tail]);
            self.reserved = 16 - tail;
        }
    }

    /// Advances the 128-bit counter and produces the next keystream block.
    fn next_gamma(&mut self) {
        for w in self.ctr.iter_mut() {
            *w = w.wrapping_add(1);
            if *w != 0 {
                break;
            }
        }
        let mut g = self.ctr;
        encrypt_words(&mut g, &self.key);
        self.gamma = block_from_words(&g);
    }
}
