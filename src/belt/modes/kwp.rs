use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::belt::error::*;
use crate::belt::key::{ExpandedKey, Key};
use crate::belt::modes::wbl::BeltWbl;

const ZERO_HEADER: [u8; 16] = [0u8; 16];

/// **Key wrap** state.
///
/// Wraps a key of at least 16 bytes together with a 16-byte header (zeros when no header
/// is supplied) by running the wide-block transform over `key || header`. Unwrapping
/// inverts the transform and verifies the trailing 16 bytes against the expected header
/// in constant time; on mismatch the plaintext is wiped and
/// [`BadKeyToken`](crate::Error::BadKeyToken) is returned.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct BeltKwp {
    wbl: BeltWbl,
}

impl BeltKwp {
    /// Creates a key-wrap state from the provided key-encryption key.
    pub fn new(key: &Key) -> Self {
        Self::with_key(ExpandedKey::new(key))
    }

    pub(crate) fn with_key(key: ExpandedKey) -> Self {
        Self {
            wbl: BeltWbl::with_key(key),
        }
    }

    /// Transforms a prepared `key || header` buffer (>= 32 bytes) in place. Equal to the
    /// wide-block forward transform.
    pub fn encrypt(&self, buf: &mut [u8]) -> Result<()> {
        self.wbl.encrypt(buf)
    }

    /// Inverts [`encrypt`](Self::encrypt) in place without checking the header.
    pub fn decrypt(&self, buf: &mut [u8]) -> Result<()> {
        self.wbl.decrypt(buf)
    }

    /// Wraps `key_data` (>= 16 bytes), producing a token 16 bytes longer.
    pub fn wrap(&self, key_data: &[u8], header: Option<&[u8; 16]>) -> Result<Vec<u8>> {
        if key_data.len() < 16 {
            return Err(Error::InvalidLength {
                len: key_data.len(),
                context: "wrapped keys must be at least 16 bytes",
            });
        }
        let mut token = Vec::with_capacity(key_data.len() + 16);
        token.extend_from_slice(key_data);
        token.extend_from_slice(header.unwrap_or(&ZERO_HEADER));
        self.wbl.encrypt(&mut token)?;
        Ok(token)
    }

    /// Unwraps a token produced by [`wrap`](Self::wrap), verifying its integrity.
    pub fn unwrap(&self, token: &[u8], header: Option<&[u8; 16]>) -> Result<Vec<u8>> {
        if token.len() < 32 {
            return Err(Error::InvalidLength {
                len: token.len(),
                context: "key tokens are at least 32 bytes",
            });
        }
        let mut buf = token.to_vec();
        self.wbl.decrypt(&mut buf)?;
        let tail = buf.len() - 16;
        let ok: bool = buf[tail..].ct_eq(header.unwrap_or(&ZERO_HEADER)).into();
        if !ok {
            buf.zeroize();
            return Err(Error::BadKeyToken);
        }
        buf.truncate(tail);
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::belt::block::h_table;

    #[test]
    fn kwp_round_trip_with_and_without_header() -> Result<()> {
        let h = h_table();
        let kwp = BeltKwp::with_key(ExpandedKey::try_from_slice(&h[128..160])?);
        let header: [u8; 16] = h[32..48].try_into().unwrap();
        for len in [16, 24, 32, 41] {
            let token = kwp.wrap(&h[..len], Some(&header))?;
            assert_eq!(token.len(), len + 16);
            assert_eq!(kwp.unwrap(&token, Some(&header))?, h[..len]);

            let token = kwp.wrap(&h[..len], None)?;
            assert_eq!(kwp.unwrap(&token, None)?, h[..len]);
        }
        Ok(())
    }

    #[test]
    fn kwp_detects_tampering() -> Result<()> {
        let h = h_table();
        let kwp = BeltKwp::with_key(ExpandedKey::try_from_slice(&h[128..160])?);
        let header: [u8; 16] = h[32..48].try_into().unwrap();
        let token = kwp.wrap(&h[..32], Some(&header))?;
        for i in 0..token.len() {
            let mut bad = token.clone();
            bad[i] ^= 0x04;
            assert!(matches!(
                kwp.unwrap(&bad, Some(&header)),
                Err(Error::BadKeyToken)
            ));
        }
        // the right token under the wrong header must also fail
        assert!(kwp.unwrap(&token, None).is_err());
        Ok(())
    }

    #[test]
    fn kwp_rejects_short_inputs() {
        let kwp = BeltKwp::with_key(ExpandedKey::try_from_slice(&h_table()[128..160]).unwrap());
        assert!(kwp.wrap(&[0u8; 15], None).is_err());
        assert!(kwp.unwrap(&[0u8; 31], None).is_err());
    }
}
