use serde::{Deserialize, Serialize};

use crate::error::BtcError;
use crate::point::CurvePoint;

pub const UNCOMPRESSED_LEN: usize = 65;
pub const COMPRESSED_LEN: usize = 33;

/// SEC1 serialization form of a public point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointFormat {
    Uncompressed,
    Compressed,
}

impl PointFormat {
    pub const fn encoded_len(self) -> usize {
        match self {
            PointFormat::Uncompressed => UNCOMPRESSED_LEN,
            PointFormat::Compressed => COMPRESSED_LEN,
        }
    }
}

/// `0x04 || x || y`
pub fn to_uncompressed(point: &CurvePoint) -> [u8; UNCOMPRESSED_LEN] {
    let mut out = [0u8; UNCOMPRESSED_LEN];
    out[0] = 0x04;
    out[1..33].copy_from_slice(point.x());
    out[33..].copy_from_slice(point.y());
    out
}

/// `0x02 || x` for even `y`, `0x03 || x` for odd `y`.
pub fn to_compressed(point: &CurvePoint) -> [u8; COMPRESSED_LEN] {
    let mut out = [0u8; COMPRESSED_LEN];
    out[0] = if point.has_even_y() { 0x02 } else { 0x03 };
    out[1..].copy_from_slice(point.x());
    out
}

/// Serializes an optional point; `None` means no public key has been derived.
pub fn encode(point: Option<&CurvePoint>, format: PointFormat) -> Result<Vec<u8>, BtcError> {
    let point = point.ok_or(BtcError::NoPublicKey)?;
    Ok(match format {
        PointFormat::Uncompressed => to_uncompressed(point).to_vec(),
        PointFormat::Compressed => to_compressed(point).to_vec(),
    })
}
