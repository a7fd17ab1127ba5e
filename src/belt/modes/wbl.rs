use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::belt::block::encrypt_block;
use crate::belt::error::*;
use crate::belt::key::{ExpandedKey, Key};
use crate::belt::util::{xor_block, xor_bytes};

/*
Length-preserving transform on n >= 32 bytes, per STB 34.101.31. With the data split
into m = ceil(n/16) blocks r1..rm (rm possibly short), each of the 2m rounds does:

    s = r1 ^ r2 ^ ... ^ r(m-1)
    drop r1 from the front
    xor belt(s) ^ <i>_128 into the last 16 bytes of the shortened data
    append s

For m = 2 this is the plain Feistel round (L, R) -> (R ^ belt(L) ^ <i>, L).
*/

/// **Wide-block** transform state.
///
/// An invertible, length-preserving permutation of any buffer of at least 32 bytes,
/// built from a Feistel-like network over 16-byte blocks with belt as the round
/// function. Underlies the key wrap ([`BeltKwp`](crate::BeltKwp)). Each call transforms
/// one complete message.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct BeltWbl {
    key: ExpandedKey,
}

impl BeltWbl {
    /// Creates a wide-block state from the provided key.
    pub fn new(key: &Key) -> Self {
        Self::with_key(ExpandedKey::new(key))
    }

    pub(crate) fn with_key(key: ExpandedKey) -> Self {
        Self { key }
    }

    /// Applies the forward transform to `buf` in place.
    pub fn encrypt(&self, buf: &mut [u8]) -> Result<()> {
        let n = buf.len();
        if n < 32 {
            return Err(Error::InvalidLength {
                len: n,
                context: "wide-block transform requires at least 32 bytes",
            });
        }
        let m = n.div_ceil(16);
        for i in 1..=(2 * m) as u32 {
            let mut s: [u8; 16] = buf[..16].try_into().unwrap(); // n >= 32
            for blk in 1..m - 1 {
                xor_block(&mut s, &buf[blk * 16..]);
            }
            let mut t = s;
            encrypt_block(&mut t, &self.key);
            xor_bytes(&mut t[..4], &i.to_le_bytes());
            buf.copy_within(16.., 0);
            xor_bytes(&mut buf[n - 32..n - 16], &t);
            buf[n - 16..].copy_from_slice(&s);
        }
        Ok(())
    }

    /// Applies the inverse transform to `buf` in place.
    pub fn decrypt(&self, buf: &mut [u8]) -> Result<()> {
        let n = buf.len();
        if n < 32 {
            return Err(Error::InvalidLength {
                len: n,
                context: "wide-block transform requires at least 32 bytes",
            });
        }
        let m = n.div_ceil(16);
        for i in (1..=(2 * m) as u32).rev() {
            let s: [u8; 16] = buf[n - 16..].try_into().unwrap(); // n >= 32
            let mut t = s;
            encrypt_block(&mut t, &self.key);
            xor_bytes(&mut t[..4], &i.to_le_bytes());
            xor_bytes(&mut buf[n - 32..n - 16], &t);
            buf.copy_within(..n - 16, 16);
            let mut head = s;
            for blk in 1..m - 1 {
                xor_block(&mut head, &buf[blk * 16..]);
            }
            buf[..16].copy_from_slice(&head);
        }
        Ok(())
    }
}
