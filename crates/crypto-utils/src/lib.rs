//! # crypto-utils
//!
//! Entropy sources and zeroizing secret containers shared by the key
//! derivation crates.

pub mod error;
pub mod random;
pub mod zeroizing;

pub use error::CryptoError;
