//! Bitcoin key derivation and address encoding.
//!
//! Turns a secp256k1 private scalar into its public point and every
//! downstream representation: SEC1 public keys, hash160, P2PKH, WIF,
//! P2SH-wrapped segwit and native bech32 segwit addresses.

pub mod address;
pub mod base58check;
pub mod bech32;
pub mod curve;
pub mod error;
pub mod hash;
pub mod key_material;
pub mod network;
pub mod point;
pub mod report;
pub mod scalar;
pub mod sec;
pub mod segwit;
pub mod wif;

pub use address::AddressKind;
pub use error::BtcError;
pub use key_material::{KeyMaterial, KeyState};
pub use network::BtcNetwork;
pub use point::CurvePoint;
pub use report::KeyReport;
pub use scalar::{Provenance, Scalar};
pub use sec::PointFormat;
