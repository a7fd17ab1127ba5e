//! Core belt block cipher: encryption and decryption of a 16-byte block through eight
//! rounds, per STB 34.101.31. The block is processed as four little-endian 32-bit words.

use crate::belt::key::ExpandedKey;
use crate::belt::util::{block_from_words, words_from_block};

/// The H substitution table from STB 34.101.31 Appendix A. A fixed permutation of the
/// 256 byte values. The same 256 bytes double as the standard's reference test data
/// (plaintexts, keys, and IVs in the appendix are all slices of this table); see
/// [`h_table`].
const H: [u8; 256] = [
    0xB1, 0x94, 0xBA, 0xC8, 0x0A, 0x08, 0xF5, 0x3B, 0x36, 0x6D, 0x00, 0x8E, 0x58, 0x4A, 0x5D, 0xE4,
    0x85, 0x04, 0xFA, 0x9D, 0x1B, 0xB6, 0xC7, 0xAC, 0x25, 0x2E, 0x72, 0xC2, 0x02, 0xFD, 0xCE, 0x0D,
    0x5B, 0xE3, 0xD6, 0x12, 0x17, 0xB9, 0x61, 0x81, 0xFE, 0x67, 0x86, 0xAD, 0x71, 0x6B, 0x89, 0x0B,
    0x5C, 0xB0, 0xC0, 0xFF, 0x33, 0xC3, 0x56, 0xB8, 0x35, 0xC4, 0x05, 0xAE, 0xD8, 0xE0, 0x7F, 0x99,
    0xE1, 0x2B, 0xDC, 0x1A, 0xE2, 0x82, 0x57, 0xEC, 0x70, 0x3F, 0xCC, 0xF0, 0x95, 0xEE, 0x8D, 0xF1,
    0xC1, 0xAB, 0x76, 0x38, 0x9F, 0xE6, 0x78, 0xCA, 0xF7, 0xC6, 0xF8, 0x60, 0xD5, 0xBB, 0x9C, 0x4F,
    0xF3, 0x3C, 0x65, 0x7B, 0x63, 0x7C, 0x30, 0x6A, 0xDD, 0x4E, 0xA7, 0x79, 0x9E, 0xB2, 0x3D, 0x31,
    0x3E, 0x98, 0xB5, 0x6E, 0x27, 0xD3, 0xBC, 0xCF, 0x59, 0x1E, 0x18, 0x1F, 0x4C, 0x5A, 0xB7, 0x93,
    0xE9, 0xDE, 0xE7, 0x2C, 0x8F, 0x0C, 0x0F, 0xA6, 0x2D, 0xDB, 0x49, 0xF4, 0x6F, 0x73, 0x96, 0x47,
    0x06, 0x07, 0x53, 0x16, 0xED, 0x24, 0x7A, 0x37, 0x39, 0xCB, 0xA3, 0x83, 0x03, 0xA9, 0x8B, 0xF6,
    0x92, 0xBD, 0x9B, 0x1C, 0xE5, 0xD1, 0x41, 0x01, 0x54, 0x45, 0xFB, 0xC9, 0x5E, 0x4D, 0x0E, 0xF2,
    0x68, 0x20, 0x80, 0xAA, 0x22, 0x7D, 0x64, 0x2F, 0x26, 0x87, 0xF9, 0x34, 0x90, 0x40, 0x55, 0x11,
    0xBE, 0x32, 0x97, 0x13, 0x43, 0xFC, 0x9A, 0x48, 0xA0, 0x2A, 0x88, 0x5F, 0x19, 0x4B, 0x09, 0xA1,
    0x7E, 0xCD, 0xA4, 0xD0, 0x15, 0x44, 0xAF, 0x8C, 0xA5, 0x84, 0x50, 0xBF, 0x66, 0xD2, 0xE8, 0x8A,
    0xA2, 0xD7, 0x46, 0x52, 0x42, 0xA8, 0xDF, 0xB3, 0x69, 0x74, 0xC5, 0x51, 0xEB, 0x23, 0x29, 0x21,
    0xD4, 0xEF, 0xD9, 0xB4, 0x3A, 0x62, 0x28, 0x75, 0x91, 0x14, 0x10, 0xEA, 0x77, 0x6C, 0xDA, 0x1D,
];

/// Returns the H table from STB 34.101.31 Appendix A.
///
/// Besides being the cipher's substitution table, these 256 bytes are the source of every
/// reference input in the standard's test appendix, so they are exposed for test and
/// interoperability purposes.
pub fn h_table() -> &'static [u8; 256] {
    &H
}

/// The round transform `G_r`: substitute each byte of the word through H, then rotate the
/// word left by `r` bits.
#[inline(always)]
fn g(u: u32, r: u32) -> u32 {
    let b = u.to_le_bytes();
    u32::from_le_bytes([
        H[b[0] as usize],
        H[b[1] as usize],
        H[b[2] as usize],
        H[b[3] as usize],
    ])
    .rotate_left(r)
}

#[inline(always)]
fn g5(u: u32) -> u32 {
    g(u, 5)
}

#[inline(always)]
fn g13(u: u32) -> u32 {
    g(u, 13)
}

#[inline(always)]
fn g21(u: u32) -> u32 {
    g(u, 21)
}

/// Word-oriented block encryption. Round `i` (1-based) draws its seven subkeys cyclically
/// from the eight expanded key words starting at position `7(i-1) mod 8`.
pub(crate) fn encrypt_words(w: &mut [u32; 4], key: &ExpandedKey) {
    let k = key.words();
    let (mut a, mut b, mut c, mut d) = (w[0], w[1], w[2], w[3]);
    for i in 1..=8u32 {
        let base = 7 * (i as usize - 1);
        let sub = |n: usize| k[(base + n) % 8];

        b ^= g5(a.wrapping_add(sub(0)));
        c ^= g21(d.wrapping_add(sub(1)));
        a = a.wrapping_sub(g13(b.wrapping_add(sub(2))));
        let e = g21(b.wrapping_add(c).wrapping_add(sub(3))) ^ i;
        b = b.wrapping_add(e);
        c = c.wrapping_sub(e);
        d = d.wrapping_add(g13(c.wrapping_add(sub(4))));
        b ^= g21(a.wrapping_add(sub(5)));
        c ^= g5(d.wrapping_add(sub(6)));

        // word order is permuted at the end of each round
        std::mem::swap(&mut a, &mut b);
        std::mem::swap(&mut c, &mut d);
        std::mem::swap(&mut b, &mut c);
    }
    *w = [b, d, a, c];
}

/// Word-oriented block decryption. Subkeys are consumed in the reverse order, rounds run
/// from 8 down to 1, and the end-of-round permutation differs from encryption.
pub(crate) fn decrypt_words(w: &mut [u32; 4], key: &ExpandedKey) {
    let k = key.words();
    let (mut a, mut b, mut c, mut d) = (w[0], w[1], w[2], w[3]);
    for i in (1..=8u32).rev() {
        let top = 7 * i as usize;
        let sub = |n: usize| k[(top - n - 1) % 8];

        b ^= g5(a.wrapping_add(sub(0)));
        c ^= g21(d.wrapping_add(sub(1)));
        a = a.wrapping_sub(g13(b.wrapping_add(sub(2))));
        let e = g21(b.wrapping_add(c).wrapping_add(sub(3))) ^ i;
        b = b.wrapping_add(e);
        c = c.wrapping_sub(e);
        d = d.wrapping_add(g13(c.wrapping_add(sub(4))));
        b ^= g21(a.wrapping_add(sub(5)));
        c ^= g5(d.wrapping_add(sub(6)));

        std::mem::swap(&mut a, &mut b);
        std::mem::swap(&mut c, &mut d);
        std::mem::swap(&mut a, &mut d);
    }
    *w = [c, a, d, b];
}

/// Encrypts a 16-byte block in place under the expanded key.
pub fn encrypt_block(block: &mut [u8; 16], key: &ExpandedKey) {
    let mut w = words_from_block(block);
    encrypt_words(&mut w, key);
    *block = block_from_words(&w);
}

/// Decrypts a 16-byte block in place under the expanded key.
pub fn decrypt_block(block: &mut [u8; 16], key: &ExpandedKey) {
    let mut w = words_from_block(block);
    decrypt_words(&mut w, key);
    *block = block_from_words(&w);
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn key1() -> ExpandedKey {
        ExpandedKey::try_from_slice(&H[128..160]).unwrap()
    }

    fn key2() -> ExpandedKey {
        ExpandedKey::try_from_slice(&H[160..192]).unwrap()
    }

    #[test]
    fn block_encrypt_reference() {
        // STB 34.101.31 appendix, table A.1
        let mut block: [u8; 16] = H[..16].try_into().unwrap();
        encrypt_block(&mut block, &key1());
        assert_eq!(block, hex!("69CCA1C93557C9E3D66BC3E0FA88FA6E"));
        decrypt_block(&mut block, &key1());
        assert_eq!(block, H[..16]);
    }

    #[test]
    fn block_decrypt_reference() {
        // STB 34.101.31 appendix, table A.4
        let mut block: [u8; 16] = H[64..80].try_into().unwrap();
        decrypt_block(&mut block, &key2());
        assert_eq!(block, hex!("0DC5300600CAB840B38448E5E993F421"));
        encrypt_block(&mut block, &key2());
        assert_eq!(block, H[64..80]);
    }

    #[test]
    fn word_and_byte_forms_agree() {
        let mut block: [u8; 16] = H[..16].try_into().unwrap();
        let mut w = crate::belt::util::words_from_block(&block);
        encrypt_block(&mut block, &key1());
        encrypt_words(&mut w, &key1());
        assert_eq!(block, crate::belt::util::block_from_words(&w));
    }

    #[test]
    fn h_is_a_permutation() {
        let mut seen = [false; 256];
        for &b in h_table().iter() {
            assert!(!seen[b as usize]);
            seen[b as usize] = true;
        }
    }
}
