mod block;
mod cipher;
mod error;
mod hash;
mod hmac;
mod key;
mod krp;
mod modes;
mod util;

pub use block::{decrypt_block, encrypt_block, h_table};
pub use cipher::Cipher;
pub use error::{Error, Result};
pub use hash::{BeltHash, belt_hash, belt_hash_verify};
pub use hmac::{BeltHmac, belt_hmac};
pub use key::{ExpandedKey, Key};
pub use krp::BeltKrp;
pub use modes::{BeltBde, BeltCbc, BeltCfb, BeltCtr, BeltDwp, BeltEcb, BeltKwp, BeltMac, BeltWbl};
pub use util::random_iv;
