use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::belt::block::{decrypt_block, encrypt_block};
use crate::belt::error::*;
use crate::belt::key::{ExpandedKey, Key};
use crate::belt::util::block_at;

/// Streaming **electronic codebook** state.
///
/// Data is transformed in place, 16 bytes per block. A message whose length is not a
/// multiple of 16 is handled with ciphertext stealing: the tail of the penultimate
/// ciphertext block is swapped with the plaintext remainder and re-encrypted, so the
/// output length equals the input length. The total message must be at least 16 bytes.
///
/// The final call may carry any number of bytes (>= 16 in total across all calls);
/// every call before it must carry a multiple of 16 bytes, since a ragged length is what
/// triggers stealing and thereby finalises the stream.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct BeltEcb {
    key: ExpandedKey,
}

impl BeltEcb {
    /// Creates an ECB state from the provided key.
    pub fn new(key: &Key) -> Self {
        Self::with_key(ExpandedKey::new(key))
    }

    pub(crate) fn with_key(key: ExpandedKey) -> Self {
        Self { key }
    }

    /// Encrypts `buf` in place. See the type-level docs for the chunking contract.
    pub fn encrypt(&self, buf: &mut [u8]) -> Result<()> {
        if buf.len() < 16 {
            return Err(Error::InvalidLength {
                len: buf.len(),
                context: "ECB consumes at least 16 bytes per call",
            });
        }
        let mut off = 0;
        let mut rem = buf.len();
        while rem >= 32 || rem == 16 {
            encrypt_block(block_at(buf, off), &self.key);
            off += 16;
            rem -= 16;
        }
        // 17..=31 ragged bytes remain: steal from the penultimate ciphertext block
        if rem > 0 {
            encrypt_block(block_at(buf, off), &self.key);
            for j in 0..rem - 16 {
                buf.swap(off + j, off + 16 + j);
            }
            encrypt_block(block_at(buf, off), &self.key);
        }
        Ok(())
    }

    /// Decrypts `buf` in place. See the type-level docs for the chunking contract.
    pub fn decrypt(&self, buf: &mut [u8]) -> Result<()> {
        if buf.len() < 16 {
            return Err(Error::InvalidLength {
                len: buf.len(),
                context: "ECB consumes at least 16 bytes per call",
            });
        }
        let mut off = 0;
        let mut rem = buf.len();
        while rem >= 32 || rem == 16 {
            decrypt_block(block_at(buf, off), &self.key);
            off += 16;
            rem -= 16;
        }
        if rem > 0 {
            decrypt_block(block_at(buf, off), &self.key);
            for j in 0..rem - 16 {
                buf.swap(off + j, off + 16 + j);
            }
            decrypt_block(block_at(buf, off), &self.key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::belt::block::h_table;
    use hex_literal::hex;

    #[test]
    fn ecb_steals_on_ragged_length() -> Result<()> {
        // STB 34.101.31 appendix, table A.7: 47 bytes, split 16 + 31
        let h = h_table();
        let ecb = BeltEcb::with_key(ExpandedKey::try_from_slice(&h[128..160])?);
        let mut buf = h[..47].to_vec();
        ecb.encrypt(&mut buf[..16])?;
        ecb.encrypt(&mut buf[16..])?;
        assert_eq!(
            buf,
            hex!(
                "69CCA1C93557C9E3D66BC3E0FA88FA"
                "6E36F00CFED6D1CA1498C12798F4BE"
                "B2075F23102EF109710775017F7380"
                "6DA9"
            )
        );
        Ok(())
    }

    #[test]
    fn ecb_round_trip_ragged() -> Result<()> {
        let h = h_table();
        let ecb = BeltEcb::with_key(ExpandedKey::try_from_slice(&h[128..160])?);
        for len in [16, 17, 23, 32, 36, 47, 48, 64] {
            let mut buf = h[..len].to_vec();
            ecb.encrypt(&mut buf)?;
            ecb.decrypt(&mut buf)?;
            assert_eq!(buf, h[..len], "round trip failed for {len} bytes");
        }
        Ok(())
    }

    #[test]
    fn ecb_rejects_short_input() {
        let ecb = BeltEcb::with_key(ExpandedKey::try_from_slice(&h_table()[128..160]).unwrap());
        let mut buf = [0u8; 15];
        assert!(ecb.encrypt(&mut buf).is_err());
    }
}
