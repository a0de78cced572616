use std::fmt;

use crypto_utils::zeroizing::ZeroizingString;
use serde::{Serialize, Serializer};

use crate::address::AddressKind;
use crate::error::BtcError;
use crate::key_material::KeyMaterial;
use crate::network::BtcNetwork;
use crate::sec::PointFormat;

/// Every representation of one key, rendered as text.
///
/// The private key renderings are held as [`ZeroizingString`]: wiped on drop
/// and redacted from `Debug`. `Display` and `Serialize` print them in full.
#[derive(Debug, Clone, Serialize)]
pub struct KeyReport {
    pub network: BtcNetwork,
    #[serde(serialize_with = "reveal")]
    pub private_key: ZeroizingString,
    #[serde(serialize_with = "reveal")]
    pub private_key_hex: ZeroizingString,
    pub public_point_x: String,
    pub public_point_y: String,
    pub uncompressed_public_key: String,
    pub compressed_public_key: String,
    pub uncompressed_hash160: String,
    pub compressed_hash160: String,
    pub uncompressed_address: String,
    pub compressed_address: String,
    #[serde(serialize_with = "reveal")]
    pub uncompressed_wif: ZeroizingString,
    #[serde(serialize_with = "reveal")]
    pub compressed_wif: ZeroizingString,
    pub p2sh_segwit: String,
    pub p2wpkh: String,
}

fn reveal<S: Serializer>(secret: &ZeroizingString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.as_str())
}

impl KeyReport {
    /// Builds the report from a key whose public point has been derived.
    pub fn new(
        key: &KeyMaterial,
        network: BtcNetwork,
        witness_version: u8,
    ) -> Result<Self, BtcError> {
        let point = key.public_point()?;
        let scalar = key.scalar()?;
        let (uncompressed, compressed) = key.cached_public_keys()?;

        Ok(Self {
            network,
            private_key: scalar.to_dec_string(),
            private_key_hex: scalar.to_hex(),
            public_point_x: hex::encode(point.x()),
            public_point_y: hex::encode(point.y()),
            uncompressed_public_key: hex::encode(uncompressed),
            compressed_public_key: hex::encode(compressed),
            uncompressed_hash160: hex::encode(key.hash160(PointFormat::Uncompressed)?),
            compressed_hash160: hex::encode(key.hash160(PointFormat::Compressed)?),
            uncompressed_address: key
                .address(AddressKind::Legacy(PointFormat::Uncompressed), network)?,
            compressed_address: key.address(AddressKind::Legacy(PointFormat::Compressed), network)?,
            uncompressed_wif: key.wif(PointFormat::Uncompressed, network)?,
            compressed_wif: key.wif(PointFormat::Compressed, network)?,
            p2sh_segwit: key.address(AddressKind::P2shSegwit, network)?,
            p2wpkh: key.address(AddressKind::NativeSegwit { witness_version }, network)?,
        })
    }
}

impl fmt::Display for KeyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Network: {}", self.network)?;
        writeln!(f, "Private key: {}", self.private_key)?;
        writeln!(f, "Private key hex: {}", self.private_key_hex)?;
        writeln!(
            f,
            "Public key point: x: {} y: {}",
            self.public_point_x, self.public_point_y
        )?;
        writeln!(f, "Uncompressed public key: {}", self.uncompressed_public_key)?;
        writeln!(f, "Compressed public key: {}", self.compressed_public_key)?;
        writeln!(f, "Uncompressed hash160: {}", self.uncompressed_hash160)?;
        writeln!(f, "Compressed hash160: {}", self.compressed_hash160)?;
        writeln!(f, "Uncompressed address: {}", self.uncompressed_address)?;
        writeln!(f, "Compressed address: {}", self.compressed_address)?;
        writeln!(f, "Uncompressed WIF: {}", self.uncompressed_wif)?;
        writeln!(f, "Compressed WIF: {}", self.compressed_wif)?;
        writeln!(f, "Segwit P2SH: {}", self.p2sh_segwit)?;
        write!(f, "Segwit P2WPKH: {}", self.p2wpkh)
    }
}
