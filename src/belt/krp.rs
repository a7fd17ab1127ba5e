//! belt-KRP key diversification: deterministically derives a 128-, 192-, or 256-bit key
//! from a master key, a 12-byte level descriptor, and a 16-byte header.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::belt::error::*;
use crate::belt::hash::compress;
use crate::belt::key::{ExpandedKey, Key};
use crate::belt::util::{block_from_words, words_from_block};

/// **Key diversification** state.
///
/// The derived key is the leading 16/24/32 bytes of
/// `sigma2(<derived bits>_32 || level || header || K)`, where sigma2 is the belt-hash
/// compression function: the block `<derived bits>_32 || level` and the header are its
/// two data halves, and the expanded master key occupies the key slots. Stateless
/// beyond the key and level: any number of keys may be derived under different headers.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct BeltKrp {
    key: ExpandedKey,
    level: [u8; 12],
}

impl BeltKrp {
    /// Creates a diversification state from the master key and level descriptor.
    pub fn new(key: &Key, level: &[u8; 12]) -> Self {
        Self::with_key(ExpandedKey::new(key), level)
    }

    pub(crate) fn with_key(key: ExpandedKey, level: &[u8; 12]) -> Self {
        Self { key, level: *level }
    }

    /// Derives `out.len()` bytes (16, 24, or 32) of key material for `header`.
    pub fn derive_into(&self, out: &mut [u8], header: &[u8; 16]) -> Result<()> {
        let n = out.len();
        if n != 16 && n != 24 && n != 32 {
            return Err(Error::InvalidKeyLength { len: n });
        }
        let mut head = [0u8; 16];
        head[..4].copy_from_slice(&((8 * n) as u32).to_le_bytes());
        head[4..].copy_from_slice(&self.level);
        let x1 = words_from_block(&head);
        let x2 = words_from_block(header);
        let (_, y) = compress(&x1, &x2, self.key.words());
        let mut derived = [0u8; 32];
        derived[..16].copy_from_slice(&block_from_words(&[y[0], y[1], y[2], y[3]]));
        derived[16..].copy_from_slice(&block_from_words(&[y[4], y[5], y[6], y[7]]));
        out.copy_from_slice(&derived[..n]);
        derived.zeroize();
        Ok(())
    }

    /// Derives a fresh `len`-byte (16, 24, or 32) key for `header`.
    pub fn derive(&self, len: usize, header: &[u8; 16]) -> Result<Vec<u8>> {
        let mut out = vec![0u8; len];
        self.derive_into(&mut out, header)?;
        Ok(out)
    }
}
