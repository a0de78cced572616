use thiserror::Error;

use crypto_utils::CryptoError;

/// Key derivation and address encoding errors.
///
/// Every variant is a usage error surfaced synchronously; none is retryable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BtcError {
    #[error("invalid scalar: {0}")]
    InvalidScalar(String),

    #[error("private key not set")]
    PrivateKeyNotSet,

    #[error("public key not generated")]
    PublicKeyNotGenerated,

    #[error("no public key to encode")]
    NoPublicKey,

    #[error("invalid curve point: {0}")]
    InvalidPoint(String),

    #[error("invalid witness version: {0} (expected 0..=16)")]
    InvalidWitnessVersion(u8),

    #[error("invalid witness program: {0}")]
    InvalidWitnessProgram(String),

    #[error("entropy source unavailable: {0}")]
    EntropySourceUnavailable(String),

    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl From<CryptoError> for BtcError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::EntropyUnavailable(msg) => BtcError::EntropySourceUnavailable(msg),
        }
    }
}
