use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::belt::block::{decrypt_block, encrypt_block};
use crate::belt::error::*;
use crate::belt::key::{ExpandedKey, Key};
use crate::belt::util::xor_block;

/// Streaming **cipher block chaining** state.
///
/// Each plaintext block is XOR-ed with the previous ciphertext block (the IV for the
/// first block) before encryption. Ragged message lengths are handled with ciphertext
/// stealing, so the output length equals the input length and the total message must be
/// at least 16 bytes.
///
/// The chunking contract matches [`BeltEcb`](crate::BeltEcb): only the final call may
/// carry a length that is not a multiple of 16 bytes.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct BeltCbc {
    key: ExpandedKey,
    link: [u8; 16],
}

impl BeltCbc {
    /// Creates a CBC state from the provided key and IV.
    pub fn new(key: &Key, iv: &[u8; 16]) -> Self {
        Self::with_key(ExpandedKey::new(key), iv)
    }

    pub(crate) fn with_key(key: ExpandedKey, iv: &[u8; 16]) -> Self {
        Self { key, link: *iv }
    }

    /// Encrypts `buf` in place, chaining across calls.
    pub fn encrypt(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.len() < 16 {
            return Err(Error::InvalidLength {
                len: buf.len(),
                context: "CBC consumes at least 16 bytes per call",
            });
        }
        let mut off = 0;
        let mut rem = buf.len();
        while rem >= 32 || rem == 16 {
            xor_block(&mut self.link, &buf[off..]);
            encrypt_block(&mut self.link, &self.key);
            buf[off..off + 16].copy_from_slice(&self.link);
            off += 16;
            rem -= 16;
        }
        // ragged tail: y = F(X[m-1] ^ link); emit lo(y) as the short final block and
        // re-encrypt y ^ (X[m] || 0..0) as the penultimate block
        if rem > 0 {
            let r = rem - 16;
            xor_block(&mut self.link, &buf[off..]);
            encrypt_block(&mut self.link, &self.key);
            for j in 0..r {
                let x = buf[off + 16 + j];
                buf[off + 16 + j] = self.link[j];
                self.link[j] ^= x;
            }
            encrypt_block(&mut self.link, &self.key);
            buf[off..off + 16].copy_from_slice(&self.link);
        }
        Ok(())
    }

    /// Decrypts `buf` in place, chaining across calls.
    pub fn decrypt(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.len() < 16 {
            return Err(Error::InvalidLength {
                len: buf.len(),
                context: "CBC consumes at least 16 bytes per call",
            });
        }
        let mut off = 0;
        let mut rem = buf.len();
        while rem >= 32 || rem == 16 {
            let ct: [u8; 16] = buf[off..off + 16].try_into().unwrap(); // loop guarantees 16 bytes
            let mut pt = ct;
            decrypt_block(&mut pt, &self.key);
            xor_block(&mut pt, &self.link);
            buf[off..off + 16].copy_from_slice(&pt);
            self.link = ct;
            off += 16;
            rem -= 16;
        }
        if rem > 0 {
            let r = rem - 16;
            // t = D(Y[m-1]) = y ^ (X[m] || 0..0); the short block Y[m] holds lo(y)
            let mut t: [u8; 16] = buf[off..off + 16].try_into().unwrap();
            decrypt_block(&mut t, &self.key);
            let mut y = t;
            for j in 0..r {
                let ym = buf[off + 16 + j];
                buf[off + 16 + j] = t[j] ^ ym;
                y[j] = ym;
            }
            decrypt_block(&mut y, &self.key);
            xor_block(&mut y, &self.link);
            buf[off..off + 16].copy_from_slice(&y);
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
    fn cbc_steals_on_ragged_length() -> Result<()> {
        // STB 34.101.31 appendix, table A.11: 36 bytes, split 16 + 20
        let h = h_table();
        let iv: [u8; 16] = h[192..208].try_into().unwrap();
        let mut cbc = BeltCbc::with_key(ExpandedKey::try_from_slice(&h[128..160])?, &iv);
        let mut buf = h[..36].to_vec();
        cbc.encrypt(&mut buf[..16])?;
        cbc.encrypt(&mut buf[16..])?;
        assert_eq!(
            buf,
            hex!(
                "10116EFAE6AD58EE14852E11DA1B8A74"
                "6A9BBADCAF73F968F875DEDC0A44F6B1"
                "5CF2480E"
            )
        );
        Ok(())
    }

    #[test]
    fn cbc_round_trip_ragged() -> Result<()> {
        let h = h_table();
        let iv: [u8; 16] = h[192..208].try_into().unwrap();
        let key = ExpandedKey::try_from_slice(&h[128..160])?;
        for len in [16, 17, 23, 32, 36, 47, 48, 64] {
            let mut buf = h[..len].to_vec();
            BeltCbc::with_key(key.clone(), &iv).encrypt(&mut buf)?;
            BeltCbc::with_key(key.clone(), &iv).decrypt(&mut buf)?;
            assert_eq!(buf, h[..len], "round trip failed for {len} bytes");
        }
        Ok(())
    }
}
