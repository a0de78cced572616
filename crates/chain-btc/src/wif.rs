use crypto_utils::zeroizing::{ZeroizingBytes, ZeroizingString};

use crate::base58check;
use crate::error::BtcError;
use crate::network::BtcNetwork;
use crate::scalar::Scalar;
use crate::sec::PointFormat;

/// Trailing byte marking a key whose public key is used compressed.
const COMPRESSION_FLAG: u8 = 0x01;

/// Wallet Import Format: `base58check(version, key || [0x01 if compressed])`.
pub fn encode(scalar: &Scalar, format: PointFormat, network: BtcNetwork) -> ZeroizingString {
    let key = scalar.to_be_bytes();
    let mut payload = ZeroizingBytes::with_capacity(33);
    payload.extend_from_slice(&*key);
    if format == PointFormat::Compressed {
        payload.extend_from_slice(&[COMPRESSION_FLAG]);
    }

    base58check::encode(&[network.wif_version()], &payload).into()
}

pub fn decode(encoded: &str) -> Result<(Scalar, PointFormat, BtcNetwork), BtcError> {
    let data = base58check::decode(encoded)?;
    let (&version, payload) = data
        .split_first()
        .ok_or_else(|| BtcError::InvalidEncoding("empty WIF payload".into()))?;

    let network = BtcNetwork::from_wif_version(version).ok_or_else(|| {
        BtcError::InvalidEncoding(format!("unknown WIF version byte: {version:#04x}"))
    })?;

    let (key, format) = match payload.len() {
        32 => (payload, PointFormat::Uncompressed),
        33 if payload[32] == COMPRESSION_FLAG => (&payload[..32], PointFormat::Compressed),
        33 => {
            return Err(BtcError::InvalidEncoding(format!(
                "invalid compression flag: {:#04x}",
                payload[32]
            )))
        }
        n => {
            return Err(BtcError::InvalidEncoding(format!(
                "expected 32 or 33 key bytes, got {n}"
            )))
        }
    };

    let mut bytes = zeroize::Zeroizing::new([0u8; 32]);
    bytes.copy_from_slice(key);
    Ok((Scalar::from_be_bytes(&bytes)?, format, network))
}
