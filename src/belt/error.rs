use rand::rand_core;
use thiserror::Error;

/// Belt Result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Belt Error type.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Computed authentication tag did not match the input tag. Ciphertext and/or AAD has
    /// been modified since it was sealed.
    #[error("authentication failed (invalid tag)")]
    AuthFailed,

    /// Key token failed its integrity check during unwrap. The token and/or header has
    /// been modified since the key was wrapped.
    #[error("key token integrity check failed")]
    BadKeyToken,

    /// Computed digest did not match the expected digest.
    #[error("hash verification failed")]
    HashMismatch,

    /// Attempted to instantiate a belt key with an input size that is not 128, 192, or 256 bits.
    #[error("invalid key length: {len} bytes (expected 16, 24, or 32)")]
    InvalidKeyLength { len: usize },

    /// Provided input whose length is not acceptable for the mode of operation.
    #[error("invalid input length: {len} bytes ({context})")]
    InvalidLength { len: usize, context: &'static str },

    /// OS RNG failed during random key or IV generation.
    #[error("OS RNG failed in random key generation")]
    Rng(#[from] rand_core::OsError),
}
