use crate::belt::error::*;
use crate::belt::key::{ExpandedKey, Key};
use crate::belt::krp::BeltKrp;
use crate::belt::modes::*;

/// Provides one-shot encryption, decryption, authentication, and key-management
/// operations for every belt mode: [ECB](crate::Cipher::encrypt_ecb),
/// [CBC](crate::Cipher::encrypt_cbc), [CFB](crate::Cipher::encrypt_cfb),
/// [CTR](crate::Cipher::encrypt_ctr), [BDE](crate::Cipher::encrypt_bde),
/// [MAC](crate::Cipher::mac), [DWP](crate::Cipher::encrypt_dwp),
/// [KWP](crate::Cipher::wrap_key), and [KRP](crate::Cipher::derive_key).
/// Instantiated with a belt [Key], which is expanded once and stored in the instance.
///
/// Each one-shot drives the corresponding streaming state over the whole input, so the
/// results are identical to an incremental computation over any chunking of the data.
pub struct Cipher {
    key: ExpandedKey,
}

impl Cipher {
    /// Expands the provided key and stores it in the returned instance.
    pub fn new(key: &Key) -> Self {
        Self {
            key: ExpandedKey::new(key),
        }
    }

    /// Getter for the internal expanded key.
    pub fn expanded_key(&self) -> &ExpandedKey {
        &self.key
    }

    /// **Electronic codebook** encryption.
    ///
    /// Encrypts each 16-byte block independently; a ragged tail is handled with
    /// ciphertext stealing. Requires at least 16 bytes of input.
    /// **Equal plaintext blocks produce equal ciphertext blocks** -- prefer an
    /// IV-based mode unless a codebook is exactly what is needed.
    pub fn encrypt_ecb(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut out = plaintext.to_vec();
        BeltEcb::with_key(self.key.clone()).encrypt(&mut out)?;
        Ok(out)
    }

    /// **Electronic codebook** decryption.
    pub fn decrypt_ecb(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let mut out = ciphertext.to_vec();
        BeltEcb::with_key(self.key.clone()).decrypt(&mut out)?;
        Ok(out)
    }

    /// **Cipher block chaining** encryption under the given IV, with ciphertext
    /// stealing for ragged lengths. Requires at least 16 bytes of input.
    pub fn encrypt_cbc(&self, plaintext: &[u8], iv: &[u8; 16]) -> Result<Vec<u8>> {
        let mut out = plaintext.to_vec();
        BeltCbc::with_key(self.key.clone(), iv).encrypt(&mut out)?;
        Ok(out)
    }

    /// **Cipher block chaining** decryption.
    pub fn decrypt_cbc(&self, ciphertext: &[u8], iv: &[u8; 16]) -> Result<Vec<u8>> {
        let mut out = ciphertext.to_vec();
        BeltCbc::with_key(self.key.clone(), iv).decrypt(&mut out)?;
        Ok(out)
    }

    /// **Cipher feedback** encryption under the given IV. Accepts any input length.
    pub fn encrypt_cfb(&self, plaintext: &[u8], iv: &[u8; 16]) -> Vec<u8> {
        let mut out = plaintext.to_vec();
        BeltCfb::with_key(self.key.clone(), iv).encrypt(&mut out);
        out
    }

    /// **Cipher feedback** decryption.
    pub fn decrypt_cfb(&self, ciphertext: &[u8], iv: &[u8; 16]) -> Vec<u8> {
        let mut out = ciphertext.to_vec();
        BeltCfb::with_key(self.key.clone(), iv).decrypt(&mut out);
        out
    }

    /// **Counter mode** encryption under the given IV. Accepts any input length.
    ///
    /// **Important**: the same IV must never be reused with the same key.
    pub fn encrypt_ctr(&self, plaintext: &[u8], iv: &[u8; 16]) -> Vec<u8> {
        let mut out = plaintext.to_vec();
        BeltCtr::with_key(self.key.clone(), iv).apply_keystream(&mut out);
        out
    }

    /// **Counter mode** decryption (the same keystream XOR as encryption).
    pub fn decrypt_ctr(&self, ciphertext: &[u8], iv: &[u8; 16]) -> Vec<u8> {
        self.encrypt_ctr(ciphertext, iv)
    }

    /// **Block disk encryption**: XEX-style sector encryption under the given IV.
    /// The input must be a whole number of 16-byte blocks.
    pub fn encrypt_bde(&self, plaintext: &[u8], iv: &[u8; 16]) -> Result<Vec<u8>> {
        let mut out = plaintext.to_vec();
        BeltBde::with_key(self.key.clone(), iv).encrypt(&mut out)?;
        Ok(out)
    }

    /// **Block disk encryption** decryption.
    pub fn decrypt_bde(&self, ciphertext: &[u8], iv: &[u8; 16]) -> Result<Vec<u8>> {
        let mut out = ciphertext.to_vec();
        BeltBde::with_key(self.key.clone(), iv).decrypt(&mut out)?;
        Ok(out)
    }

    /// Computes the 8-byte **belt-MAC** tag of `data`.
    pub fn mac(&self, data: &[u8]) -> [u8; 8] {
        let mut mac = BeltMac::with_key(self.key.clone());
        mac.update(data);
        mac.tag()
    }

    /// **DWP** authenticated encryption.
    ///
    /// Encrypts the plaintext in CTR mode and authenticates `aad || ciphertext` with a
    /// polynomial MAC, returning the ciphertext and the 8-byte tag.
    ///
    /// **Important**: the same IV must never be reused with the same key.
    pub fn encrypt_dwp(&self, plaintext: &[u8], aad: &[u8], iv: &[u8; 16]) -> (Vec<u8>, [u8; 8]) {
        let mut dwp = BeltDwp::with_key(self.key.clone(), iv);
        dwp.absorb_aad(aad);
        let mut ct = plaintext.to_vec();
        dwp.encrypt(&mut ct);
        dwp.absorb_ciphertext(&ct);
        let tag = dwp.tag();
        (ct, tag)
    }

    /// **DWP** authenticated decryption.
    ///
    /// The tag is recomputed over `aad || ciphertext` and compared in constant time
    /// before any plaintext is produced. Returns
    /// [AuthFailed](crate::Error::AuthFailed) if the comparison fails.
    pub fn decrypt_dwp(
        &self,
        ciphertext: &[u8],
        aad: &[u8],
        tag: &[u8; 8],
        iv: &[u8; 16],
    ) -> Result<Vec<u8>> {
        let mut dwp = BeltDwp::with_key(self.key.clone(), iv);
        dwp.absorb_aad(aad);
        dwp.absorb_ciphertext(ciphertext);
        if !dwp.verify(tag) {
            return Err(Error::AuthFailed);
        }
        let mut pt = ciphertext.to_vec();
        dwp.decrypt(&mut pt);
        Ok(pt)
    }

    /// **KWP** key wrap: protects `key_data` (>= 16 bytes) and an optional 16-byte
    /// header, producing a token 16 bytes longer than the key.
    pub fn wrap_key(&self, key_data: &[u8], header: Option<&[u8; 16]>) -> Result<Vec<u8>> {
        BeltKwp::with_key(self.key.clone()).wrap(key_data, header)
    }

    /// **KWP** key unwrap. Returns [BadKeyToken](crate::Error::BadKeyToken) and no
    /// plaintext if the token fails its integrity check.
    pub fn unwrap_key(&self, token: &[u8], header: Option<&[u8; 16]>) -> Result<Vec<u8>> {
        BeltKwp::with_key(self.key.clone()).unwrap(token, header)
    }

    /// **KRP** key diversification: derives a `len`-byte (16, 24, or 32) key for the
    /// given 12-byte level descriptor and 16-byte header.
    pub fn derive_key(&self, len: usize, level: &[u8; 12], header: &[u8; 16]) -> Result<Vec<u8>> {
        BeltKrp::with_key(self.key.clone(), level).derive(len, header)
    }
}
