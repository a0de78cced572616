use thiserror::Error;

/// Errors from the entropy and secret-handling utilities.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(String),
}
