use crypto_utils::zeroizing::ZeroizingBytes;

use crate::error::BtcError;
use crate::hash;

const CHECKSUM_LEN: usize = 4;

/// Base58Check: `base58(version || payload || checksum)` where the checksum is
/// the first four bytes of `double_sha256(version || payload)`.
///
/// The buffer is zeroed afterwards since WIF payloads carry private keys.
pub fn encode(version: &[u8], payload: &[u8]) -> String {
    let mut data = ZeroizingBytes::with_capacity(version.len() + payload.len() + CHECKSUM_LEN);
    data.extend_from_slice(version);
    data.extend_from_slice(payload);
    let checksum = hash::checksum(&data);
    data.extend_from_slice(&checksum);

    bs58::encode(&*data).into_string()
}

/// Decodes a Base58Check string and verifies its checksum.
///
/// Returns `version || payload` with the checksum stripped.
pub fn decode(encoded: &str) -> Result<ZeroizingBytes, BtcError> {
    let raw = ZeroizingBytes::new(
        bs58::decode(encoded)
            .into_vec()
            .map_err(|e| BtcError::InvalidEncoding(format!("invalid base58: {e}")))?,
    );

    if raw.len() <= CHECKSUM_LEN {
        return Err(BtcError::InvalidEncoding(format!(
            "too short: expected more than {} bytes, got {}",
            CHECKSUM_LEN,
            raw.len()
        )));
    }

    let (body, checksum) = raw.split_at(raw.len() - CHECKSUM_LEN);
    if checksum != hash::checksum(body) {
        return Err(BtcError::InvalidEncoding("checksum mismatch".into()));
    }

    Ok(ZeroizingBytes::from(body))
}
