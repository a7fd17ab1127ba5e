//! This crate provides an implementation of the Belarusian cryptographic standard
//! STB 34.101.31 ("belt"): the 128-bit belt block cipher together with its standardised
//! modes of operation and derived primitives, plus the companion HMAC construction from
//! STB 34.101.47. The following are supported:
//! - **Confidentiality modes** [ECB](crate::Cipher::encrypt_ecb), [CBC](crate::Cipher::encrypt_cbc),
//!   [CFB](crate::Cipher::encrypt_cfb), and [CTR](crate::Cipher::encrypt_ctr). ECB and CBC handle
//!   ragged message lengths with ciphertext stealing; CFB and CTR accept any length.
//! - **Authentication**: the 64-bit [belt-MAC](crate::Cipher::mac) and the 256-bit
//!   [belt-hash](crate::belt_hash), plus [belt-HMAC](crate::belt_hmac).
//! - **Authenticated encryption** ([DWP](crate::Cipher::encrypt_dwp)): CTR encryption combined
//!   with a polynomial MAC over the associated data and ciphertext.
//! - **Key wrap** ([KWP](crate::Cipher::wrap_key)) built on the wide-block transform
//!   [WBL](crate::BeltWbl), and **key diversification** ([KRP](crate::Cipher::derive_key)).
//! - **Disk encryption** ([BDE](crate::Cipher::encrypt_bde)), an XEX-style sector mode.
//!
//! Every mode is also available as a streaming state (`BeltEcb`, `BeltCtr`, `BeltMac`,
//! `BeltHash`, ...) that absorbs input across arbitrary chunk boundaries and produces
//! exactly the same output as the one-shot form.
//!
//! ## Examples
//! Below is a string encrypted under a random key using belt-CTR, then decrypted back.
//! ```
//! use beltcrypt::{Cipher, Key, random_iv};
//!
//! # fn main() -> beltcrypt::Result<()> {
//! // generate a random 256-bit key and a fresh IV.
//! let key = Key::rand_key_256()?;
//! let iv = random_iv()?;
//!
//! // instantiate a cipher object using that key.
//! let cipher = Cipher::new(&key);
//!
//! // cipher operates on raw bytes.
//! let plaintext = ("Hello, World!").as_bytes();
//!
//! // encrypt and decrypt; CTR accepts any input length.
//! let ciphertext = cipher.encrypt_ctr(plaintext, &iv);
//! let decrypted = cipher.decrypt_ctr(&ciphertext, &iv);
//!
//! // round trip results in the same plaintext as the original message.
//! assert_eq!(plaintext, decrypted);
//! # Ok(())
//! # }
//! ```

mod belt;

pub use belt::{
    BeltBde, BeltCbc, BeltCfb, BeltCtr, BeltDwp, BeltEcb, BeltHash, BeltHmac, BeltKrp, BeltKwp,
    BeltMac, BeltWbl, Cipher, Error, ExpandedKey, Key, Result, belt_hash, belt_hash_verify,
    belt_hmac, decrypt_block, encrypt_block, h_table, random_iv,
};
