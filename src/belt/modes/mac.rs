use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::belt::block::encrypt_words;
use crate::belt::key::{ExpandedKey, Key};
use crate::belt::util::{block_from_words, words_from_block};

/// Streaming **belt-MAC** state producing a 64-bit tag.
///
/// A CBC-MAC variant: complete message blocks are folded into the chaining value, and the
/// final block (complete or padded) is additionally masked with one of two values derived
/// from the key before the last encryption. The most recent 1..=16 message bytes stay in
/// the residue buffer until more data arrives, so [`tag`](Self::tag) and
/// [`verify`](Self::verify) can be called at any point without disturbing the stream:
/// further [`update`](Self::update) calls continue as if the tag had never been read.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct BeltMac {
    key: ExpandedKey,
    s: [u32; 4],
    r: [u32; 4],
    block: [u8; 16],
    filled: usize,
}

impl BeltMac {
    /// Creates a MAC state from the provided key.
    pub fn new(key: &Key) -> Self {
        Self::with_key(ExpandedKey::new(key))
    }

    pub(crate) fn with_key(key: ExpandedKey) -> Self {
        let mut r = [0u32; 4];
        encrypt_words(&mut r, &key);
        Self {
            key,
            s: [0u32; 4],
            r,
            block: [0u8; 16],
            filled: 0,
        }
    }

    /// Absorbs message bytes. Any chunking is accepted.
    pub fn update(&mut self, mut data: &[u8]) {
        if data.is_empty() {
            return;
        }
        if self.filled < 16 {
            let take = (16 - self.filled).min(data.len());
            self.block[self.filled..self.filled + take].copy_from_slice(&data[..take]);
            self.filled += take;
            data = &data[take..];
            if data.is_empty() {
                return;
            }
        }
        // more data follows, so the buffered block cannot be the final one
        self.absorb_buffered();
        while data.len() > 16 {
            let w = words_from_block(&data[..16]);
            for i in 0..4 {
                self.s[i] ^= w[i];
            }
            encrypt_words(&mut self.s, &self.key);
            data = &data[16..];
        }
        self.block[..data.len()].copy_from_slice(data);
        self.filled = data.len();
    }

    fn absorb_buffered(&mut self) {
        let w = words_from_block(&self.block);
        for i in 0..4 {
            self.s[i] ^= w[i];
        }
        encrypt_words(&mut self.s, &self.key);
    }

    /// The full MAC block; the public readers truncate it.
    fn tag_block(&self) -> [u8; 16] {
        let mut mac = self.s;
        let mut block = self.block;
        if self.filled == 16 {
            let w = words_from_block(&block);
            mac[0] ^= w[0] ^ self.r[1];
            mac[1] ^= w[1] ^ self.r[2];
            mac[2] ^= w[2] ^ self.r[3];
            mac[3] ^= w[3] ^ self.r[0] ^ self.r[1];
        } else {
            block[self.filled] = 0x80;
            for b in &mut block[self.filled + 1..] {
                *b = 0;
            }
            let w = words_from_block(&block);
            mac[0] ^= w[0] ^ self.r[0] ^ self.r[3];
            mac[1] ^= w[1] ^ self.r[0];
            mac[2] ^= w[2] ^ self.r[1];
            mac[3] ^= w[3] ^ self.r[2];
        }
        encrypt_words(&mut mac, &self.key);
        block_from_words(&mac)
    }

    /// Produces the 8-byte tag over everything absorbed so far. Idempotent: the stream
    /// may continue with further [`update`](Self::update) calls afterwards.
    pub fn tag(&self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out.copy_from_slice(&self.tag_block()[..8]);
        out
    }

    /// Writes the first `out.len()` tag bytes (1..=8) into `out`.
    ///
    /// # Panics
    /// Panics if `out` is empty or longer than 8 bytes.
    pub fn tag_truncated(&self, out: &mut [u8]) {
        assert!(
            (1..=8).contains(&out.len()),
            "belt-MAC tags are 1 to 8 bytes"
        );
        out.copy_from_slice(&self.tag_block()[..out.len()]);
    }

    /// Compares the expected tag against the computed one in constant time.
    pub fn verify(&self, expected: &[u8; 8]) -> bool {
        self.tag_block()[..8].ct_eq(&expected[..]).into()
    }

    /// Compares the first `expected.len()` tag bytes (1..=8) in constant time.
    ///
    /// # Panics
    /// Panics if `expected` is empty or longer than 8 bytes.
    pub fn verify_truncated(&self, expected: &[u8]) -> bool {
        assert!(
            (1..=8).contains(&expected.len()),
            "belt-MAC tags are 1 to 8 bytes"
        );
        self.tag_block()[..expected.len()].ct_eq(expected).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::belt::block::h_table;
    use hex_literal::hex;

    #[test]
    fn mac_reference() {
        // STB 34.101.31 appendix, table A.17
        let h = h_table();
        let mut mac = BeltMac::with_key(ExpandedKey::try_from_slice(&h[128..160]).unwrap());
        mac.update(&h[..13]);
        assert_eq!(mac.tag(), hex!("7260DA60138F96C9"));
        assert!(mac.verify(&hex!("7260DA60138F96C9")));
        assert!(!mac.verify(&hex!("7260DA60138F96C8")));
    }

    #[test]
    fn mac_reads_do_not_consume_residue() {
        // STB 34.101.31 appendix, table A.18: read a tag mid-stream, then continue
        let h = h_table();
        let key = ExpandedKey::try_from_slice(&h[128..160]).unwrap();
        let mut mac = BeltMac::with_key(key.clone());
        mac.update(&h[..27]);
        let mid = mac.tag();
        let mut expected_mid = BeltMac::with_key(key.clone());
        expected_mid.update(&h[..27]);
        assert_eq!(mid, expected_mid.tag());
        mac.update(&h[27..48]);
        assert_eq!(mac.tag(), hex!("2DAB59771B4B16D0"));
        assert!(mac.verify_truncated(&hex!("2DAB59")));
    }

    #[test]
    fn mac_chunking_is_equivalent() {
        let h = h_table();
        let key = ExpandedKey::try_from_slice(&h[160..192]).unwrap();
        let mut whole = BeltMac::with_key(key.clone());
        whole.update(&h[..48]);
        let mut pieces = BeltMac::with_key(key);
        for chunk in [&h[..1], &h[1..16], &h[16..17], &h[17..48]] {
            pieces.update(chunk);
        }
        assert_eq!(whole.tag(), pieces.tag());
    }
}
