//! Defines the [`Key`] struct, which holds a valid belt key of 128, 192, or 256 bits,
//! and the [`ExpandedKey`] produced from it by the key expansion rule of STB 34.101.31.
//! Keys can be randomly generated or constructed from an existing byte slice.

use rand::TryRngCore;
use rand::rngs::OsRng;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::belt::error::{Error, Result};

#[derive(Clone, PartialEq, Eq, Debug, Zeroize, ZeroizeOnDrop)]
enum KeyBytes {
    K128([u8; 16]),
    K192([u8; 24]),
    K256([u8; 32]),
}

/// Contains a valid belt key. Can be instantiated with a random key, or built from a slice
/// of bytes that is 16, 24, or 32 bytes long.
/// A `Key` object is required to instantiate a [Cipher](crate::Cipher).
///
/// ## Examples
/// ```
/// # fn main() -> beltcrypt::Result<()> {
/// use beltcrypt::Key;
///
/// // Instantiate random keys:
/// let rk_128 = Key::rand_key_128()?;
/// let rk_192 = Key::rand_key_192()?;
/// let rk_256 = Key::rand_key_256()?;
///
/// // Instantiate keys from slice:
/// let key_bytes: [u8; 32] = [0xBA, 0x32, 0x82, 0x9A, 0x43, 0x8A, 0x48, 0xED,
///                            0xC2, 0xEA, 0x10, 0x73, 0x26, 0xF8, 0xA9, 0x62,
///                            0xDE, 0x82, 0x06, 0xBA, 0x53, 0xC2, 0xC7, 0x55,
///                            0x2C, 0x72, 0xC5, 0x37, 0xBF, 0xD4, 0xDB, 0x5E];
/// let my_key_128 = Key::try_from_slice(&key_bytes[..16])?;
/// let my_key_192 = Key::try_from_slice(&key_bytes[..24])?;
/// let my_key_256 = Key::try_from_slice(&key_bytes[..32])?;
///
/// // Internal bytes of Key objects are accessible and match the original key:
/// assert_eq!(my_key_128.as_bytes(), &key_bytes[..16]);
///
/// // Attempting to instantiate with an invalid key size (not 16, 24, or 32 bytes)
/// // returns an InvalidKeyLength error:
/// assert!(Key::try_from_slice(&key_bytes[..20]).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Zeroize, ZeroizeOnDrop)]
pub struct Key {
    bytes: KeyBytes,
}

impl Key {
    /// Generate a random 128-bit key. Returns Error if OsRng fails.
    pub fn rand_key_128() -> Result<Self> {
        let mut k = [0u8; 16];
        OsRng.try_fill_bytes(&mut k)?;
        Ok(Self {
            bytes: KeyBytes::K128(k),
        })
    }

    /// Generate a random 192-bit key. Returns Error if OsRng fails.
    pub fn rand_key_192() -> Result<Self> {
        let mut k = [0u8; 24];
        OsRng.try_fill_bytes(&mut k)?;
        Ok(Self {
            bytes: KeyBytes::K192(k),
        })
    }

    /// Generate a random 256-bit key. Returns Error if OsRng fails.
    pub fn rand_key_256() -> Result<Self> {
        let mut k = [0u8; 32];
        OsRng.try_fill_bytes(&mut k)?;
        Ok(Self {
            bytes: KeyBytes::K256(k),
        })
    }

    /// Attempts to build a key from a slice of bytes. Will return an InvalidKeyLength error
    /// if the input slice is anything other than 16, 24, or 32 bytes long.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(match bytes.len() {
            16 => Self {
                bytes: KeyBytes::K128(bytes.try_into().unwrap()), // match condition guarantees safe unwrap
            },
            24 => Self {
                bytes: KeyBytes::K192(bytes.try_into().unwrap()),
            },
            32 => Self {
                bytes: KeyBytes::K256(bytes.try_into().unwrap()),
            },
            _ => return Err(Error::InvalidKeyLength { len: bytes.len() }),
        })
    }

    /// Returns a reference to the internal key as an array of bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match &self.bytes {
            KeyBytes::K128(k) => k,
            KeyBytes::K192(k) => k,
            KeyBytes::K256(k) => k,
        }
    }
}

/// A 256-bit expanded belt key: eight little-endian 32-bit words.
///
/// Keys shorter than 256 bits are extended deterministically per STB 34.101.31:
/// a 128-bit key is repeated twice; for a 192-bit key the two remaining words are
/// `k0^k1^k2` and `k3^k4^k5`. A 256-bit key passes through unchanged.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ExpandedKey(pub(crate) [u32; 8]);

impl ExpandedKey {
    /// Expands the provided key into the eight 32-bit round key words.
    pub fn new(key: &Key) -> Self {
        // key byte length is already validated, so the expansion cannot fail
        Self::try_from_slice(key.as_bytes()).expect("Key holds a valid length")
    }

    /// Expands a raw 16-, 24-, or 32-byte secret. Returns an InvalidKeyLength error for
    /// any other length.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self> {
        let mut k = [0u32; 8];
        for (word, chunk) in k.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::from_le_bytes(chunk.try_into().unwrap()); // chunks_exact guarantees 4 bytes
        }
        match bytes.len() {
            16 => {
                k[4] = k[0];
                k[5] = k[1];
                k[6] = k[2];
                k[7] = k[3];
            }
            24 => {
                k[6] = k[0] ^ k[1] ^ k[2];
                k[7] = k[3] ^ k[4] ^ k[5];
            }
            32 => {}
            _ => return Err(Error::InvalidKeyLength { len: bytes.len() }),
        }
        Ok(Self(k))
    }

    /// The eight round key words.
    pub(crate) fn words(&self) -> &[u32; 8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_128_repeats_key() -> Result<()> {
        let bytes: [u8; 16] = [
            0xE9, 0xDE, 0xE7, 0x2C, 0x8F, 0x0C, 0x0F, 0xA6, 0x2D, 0xDB, 0x49, 0xF4, 0x6F, 0x73,
            0x96, 0x47,
        ];
        let k = ExpandedKey::try_from_slice(&bytes)?;
        assert_eq!(k.words()[..4], k.words()[4..]);
        assert_eq!(k.words()[0], u32::from_le_bytes([0xE9, 0xDE, 0xE7, 0x2C]));
        Ok(())
    }

    #[test]
    fn expand_192_derives_tail_words() -> Result<()> {
        let bytes: [u8; 24] = [
            0xE9, 0xDE, 0xE7, 0x2C, 0x8F, 0x0C, 0x0F, 0xA6, 0x2D, 0xDB, 0x49, 0xF4, 0x6F, 0x73,
            0x96, 0x47, 0x06, 0x07, 0x53, 0x16, 0xED, 0x24, 0x7A, 0x37,
        ];
        let k = ExpandedKey::try_from_slice(&bytes)?;
        let w = k.words();
        assert_eq!(w[6], w[0] ^ w[1] ^ w[2]);
        assert_eq!(w[7], w[3] ^ w[4] ^ w[5]);
        Ok(())
    }

    #[test]
    fn expand_256_passes_through() -> Result<()> {
        let key = Key::rand_key_256()?;
        let k = ExpandedKey::new(&key);
        for (word, chunk) in k.words().iter().zip(key.as_bytes().chunks_exact(4)) {
            assert_eq!(*word, u32::from_le_bytes(chunk.try_into().unwrap()));
        }
        Ok(())
    }

    #[test]
    fn rejects_bad_lengths() {
        assert!(ExpandedKey::try_from_slice(&[0u8; 20]).is_err());
        assert!(ExpandedKey::try_from_slice(&[]).is_err());
    }
}
