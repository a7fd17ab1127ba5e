//! belt-HMAC per STB 34.101.47: the standard HMAC construction with belt-hash as the
//! underlying hash and a 32-byte hash input block.

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::belt::hash::{BeltHash, belt_hash};

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5C;

/// Streaming **belt-HMAC** state producing a 256-bit tag.
///
/// Keys longer than 32 bytes are replaced by their belt-hash; shorter keys are
/// zero-padded to 32 bytes. Reads are idempotent, exactly as for
/// [`BeltHash`](crate::BeltHash): the outer hash runs on a copy of the inner state.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct BeltHmac {
    inner: BeltHash,
    opad_key: [u8; 32],
}

impl BeltHmac {
    /// Creates an HMAC state from a key of any length.
    pub fn new(key: &[u8]) -> Self {
        let mut padded = [0u8; 32];
        if key.len() > 32 {
            padded = belt_hash(key);
        } else {
            padded[..key.len()].copy_from_slice(key);
        }

        let mut ipad_key = padded;
        let mut opad_key = padded;
        for (i, o) in ipad_key.iter_mut().zip(opad_key.iter_mut()) {
            *i ^= IPAD;
            *o ^= OPAD;
        }

        let mut inner = BeltHash::new();
        inner.update(&ipad_key);
        ipad_key.zeroize();
        padded.zeroize();
        Self { inner, opad_key }
    }

    /// Absorbs message bytes. Any chunking is accepted.
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Produces the 32-byte tag over everything absorbed so far. Idempotent.
    pub fn tag(&self) -> [u8; 32] {
        let mut outer = BeltHash::new();
        outer.update(&self.opad_key);
        outer.update(&self.inner.digest());
        outer.digest()
    }

    /// Writes the first `out.len()` tag bytes (1..=32) into `out`.
    ///
    /// # Panics
    /// Panics if `out` is empty or longer than 32 bytes.
    pub fn tag_truncated(&self, out: &mut [u8]) {
        assert!(
            (1..=32).contains(&out.len()),
            "belt-HMAC tags are 1 to 32 bytes"
        );
        out.copy_from_slice(&self.tag()[..out.len()]);
    }

    /// Compares the expected tag against the computed one in constant time.
    pub fn verify(&self, expected: &[u8; 32]) -> bool {
        self.tag()[..].ct_eq(&expected[..]).into()
    }

    /// Compares the first `expected.len()` tag bytes (1..=32) in constant time.
    ///
    /// # Panics
    /// Panics if `expected` is empty or longer than 32 bytes.
    pub fn verify_truncated(&self, expected: &[u8]) -> bool {
        assert!(
            (1..=32).contains(&expected.len()),
            "belt-HMAC tags are 1 to 32 bytes"
        );
        self.tag()[..expected.len()].ct_eq(expected).into()
    }
}

/// One-shot belt-HMAC of `data` under `key`.
pub fn belt_hmac(key: &[u8], data: &[u8]) -> [u8; 32] {
    let mut state = BeltHmac::new(key);
    state.update(data);
    state.tag()
}
