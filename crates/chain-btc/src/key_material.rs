use std::fmt;
use std::sync::OnceLock;

use crypto_utils::zeroizing::ZeroizingString;
use tracing::debug;

use crate::address::{self, AddressKind};
use crate::error::BtcError;
use crate::hash;
use crate::network::BtcNetwork;
use crate::point::{self, CurvePoint};
use crate::scalar::Scalar;
use crate::sec::{self, PointFormat};
use crate::wif;

/// Lifecycle of a [`KeyMaterial`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Empty,
    HasPrivateKey,
    HasPublicKey,
}

/// Serialized public keys and their hashes, computed once per public point.
#[derive(Clone)]
struct DerivedKeys {
    uncompressed: [u8; sec::UNCOMPRESSED_LEN],
    compressed: [u8; sec::COMPRESSED_LEN],
    uncompressed_hash160: [u8; 20],
    compressed_hash160: [u8; 20],
}

impl DerivedKeys {
    fn compute(point: &CurvePoint) -> Self {
        let uncompressed = sec::to_uncompressed(point);
        let compressed = sec::to_compressed(point);
        Self {
            uncompressed_hash160: hash::hash160(&uncompressed),
            compressed_hash160: hash::hash160(&compressed),
            uncompressed,
            compressed,
        }
    }
}

/// A private key, its public point once derived, and every representation
/// derived from the two.
///
/// Derived values are pure functions of `(scalar, public point)`. The
/// serialized keys and hashes are memoized behind a `OnceLock`, so a shared
/// `&KeyMaterial` fills the cache once and serves concurrent readers after
/// that. Replacing the scalar or regenerating the point clears the cache.
#[derive(Clone, Default)]
pub struct KeyMaterial {
    scalar: Option<Scalar>,
    public_point: Option<CurvePoint>,
    derived: OnceLock<DerivedKeys>,
}

impl KeyMaterial {
    /// An empty key: no scalar, no public point.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scalar(scalar: Scalar) -> Self {
        let mut key = Self::new();
        key.set_scalar(scalar);
        key
    }

    /// Installs a new private key, discarding any previously derived point.
    pub fn set_scalar(&mut self, scalar: Scalar) {
        debug!(provenance = ?scalar.provenance(), "private key set");
        self.scalar = Some(scalar);
        self.public_point = None;
        self.derived = OnceLock::new();
    }

    pub fn state(&self) -> KeyState {
        match (&self.scalar, &self.public_point) {
            (None, _) => KeyState::Empty,
            (Some(_), None) => KeyState::HasPrivateKey,
            (Some(_), Some(_)) => KeyState::HasPublicKey,
        }
    }

    pub fn scalar(&self) -> Result<&Scalar, BtcError> {
        self.scalar.as_ref().ok_or(BtcError::PrivateKeyNotSet)
    }

    /// Derives `scalar * G` if it has not been derived yet.
    ///
    /// Idempotent: later calls return the stored point without recomputing.
    pub fn derive_public_key(&mut self) -> Result<&CurvePoint, BtcError> {
        if self.public_point.is_none() {
            let point = point::public_point(self.scalar()?)?;
            debug!("public key derived");
            self.public_point = Some(point);
        }
        self.public_point()
    }

    /// Recomputes the public point even if one is already stored.
    pub fn regenerate_public_key(&mut self) -> Result<&CurvePoint, BtcError> {
        let point = point::public_point(self.scalar()?)?;
        debug!("public key regenerated");
        self.public_point = Some(point);
        self.derived = OnceLock::new();
        self.public_point()
    }

    pub fn public_point(&self) -> Result<&CurvePoint, BtcError> {
        self.public_point.as_ref().ok_or(BtcError::PublicKeyNotGenerated)
    }

    fn derived(&self) -> Result<&DerivedKeys, BtcError> {
        let point = self.public_point()?;
        Ok(self.derived.get_or_init(|| {
            debug!("filling derived key cache");
            DerivedKeys::compute(point)
        }))
    }

    /// SEC1 serialization of the public key.
    pub fn public_key(&self, format: PointFormat) -> Result<Vec<u8>, BtcError> {
        sec::encode(self.public_point.as_ref(), format).map_err(|e| match e {
            BtcError::NoPublicKey => BtcError::PublicKeyNotGenerated,
            other => other,
        })
    }

    /// RIPEMD-160(SHA-256(public key)) for the given serialization.
    pub fn hash160(&self, format: PointFormat) -> Result<[u8; 20], BtcError> {
        let derived = self.derived()?;
        Ok(match format {
            PointFormat::Uncompressed => derived.uncompressed_hash160,
            PointFormat::Compressed => derived.compressed_hash160,
        })
    }

    pub fn address(&self, kind: AddressKind, network: BtcNetwork) -> Result<String, BtcError> {
        let derived = self.derived()?;
        address::encode(
            kind,
            &derived.uncompressed_hash160,
            &derived.compressed_hash160,
            network,
        )
    }

    /// Wallet Import Format of the private key. Needs only the scalar.
    pub fn wif(&self, format: PointFormat, network: BtcNetwork) -> Result<ZeroizingString, BtcError> {
        Ok(wif::encode(self.scalar()?, format, network))
    }

    /// The private key as 64 lowercase hex digits.
    pub fn private_key_hex(&self) -> Result<ZeroizingString, BtcError> {
        Ok(self.scalar()?.to_hex())
    }

    pub(crate) fn cached_public_keys(&self) -> Result<(&[u8], &[u8]), BtcError> {
        let derived = self.derived()?;
        Ok((&derived.uncompressed, &derived.compressed))
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("state", &self.state())
            .field("scalar", &self.scalar)
            .field("public_point", &self.public_point)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve;

    fn key_one() -> KeyMaterial {
        let mut key = KeyMaterial::with_scalar(Scalar::from_u64(1).unwrap());
        key.derive_public_key().unwrap();
        key
    }

    #[test]
    fn lifecycle_states() {
        let mut key = KeyMaterial::new();
        assert_eq!(key.state(), KeyState::Empty);

        key.set_scalar(Scalar::from_u64(1).unwrap());
        assert_eq!(key.state(), KeyState::HasPrivateKey);

        key.derive_public_key().unwrap();
        assert_eq!(key.state(), KeyState::HasPublicKey);
    }

    #[test]
    fn empty_key_accessors_fail() {
        let key = KeyMaterial::new();
        let net = BtcNetwork::Mainnet;
        assert_eq!(
            key.address(AddressKind::Legacy(PointFormat::Compressed), net),
            Err(BtcError::PublicKeyNotGenerated)
        );
        assert_eq!(
            key.public_key(PointFormat::Compressed),
            Err(BtcError::PublicKeyNotGenerated)
        );
        assert_eq!(
            key.wif(PointFormat::Compressed, net).unwrap_err(),
            BtcError::PrivateKeyNotSet
        );
        assert_eq!(key.private_key_hex().unwrap_err(), BtcError::PrivateKeyNotSet);
    }

    #[test]
    fn derive_without_scalar_fails_without_mutation() {
        let mut key = KeyMaterial::new();
        assert_eq!(key.derive_public_key().unwrap_err(), BtcError::PrivateKeyNotSet);
        assert_eq!(key.regenerate_public_key().unwrap_err(), BtcError::PrivateKeyNotSet);
        assert_eq!(key.state(), KeyState::Empty);
    }

    #[test]
    fn public_accessors_require_derivation() {
        let key = KeyMaterial::with_scalar(Scalar::from_u64(1).unwrap());
        let net = BtcNetwork::Mainnet;

        assert_eq!(key.public_point().unwrap_err(), BtcError::PublicKeyNotGenerated);
        assert_eq!(
            key.public_key(PointFormat::Uncompressed),
            Err(BtcError::PublicKeyNotGenerated)
        );
        assert_eq!(
            key.hash160(PointFormat::Compressed),
            Err(BtcError::PublicKeyNotGenerated)
        );
        assert_eq!(
            key.address(AddressKind::P2shSegwit, net),
            Err(BtcError::PublicKeyNotGenerated)
        );
        assert_eq!(
            key.address(AddressKind::NativeSegwit { witness_version: 0 }, net),
            Err(BtcError::PublicKeyNotGenerated)
        );

        // WIF only needs the private key.
        assert_eq!(
            key.wif(PointFormat::Compressed, net).unwrap().as_str(),
            "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn"
        );
    }

    #[test]
    fn derive_is_idempotent() {
        let mut key = KeyMaterial::with_scalar(Scalar::from_seed(42).unwrap());
        let first = *key.derive_public_key().unwrap();
        let second = *key.derive_public_key().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn regenerate_yields_same_point_and_clears_cache() {
        let mut key = KeyMaterial::with_scalar(Scalar::from_seed(7).unwrap());
        key.derive_public_key().unwrap();
        let before = key.address(AddressKind::P2shSegwit, BtcNetwork::Mainnet).unwrap();
        assert!(key.derived.get().is_some());

        let point = *key.regenerate_public_key().unwrap();
        assert!(key.derived.get().is_none());
        assert_eq!(&point, key.public_point().unwrap());
        assert_eq!(
            key.address(AddressKind::P2shSegwit, BtcNetwork::Mainnet).unwrap(),
            before
        );
    }

    #[test]
    fn set_scalar_resets_public_key() {
        let mut key = key_one();
        key.set_scalar(Scalar::from_u64(2).unwrap());
        assert_eq!(key.state(), KeyState::HasPrivateKey);

        key.derive_public_key().unwrap();
        assert_eq!(
            key.address(AddressKind::Legacy(PointFormat::Compressed), BtcNetwork::Mainnet)
                .unwrap(),
            "1cMh228HTCiwS8ZsaakH8A8wze1JR5ZsP"
        );
    }

    #[test]
    fn key_one_public_key_is_generator() {
        let key = key_one();
        assert_eq!(key.public_point().unwrap(), &curve::generator());
        assert_eq!(
            hex::encode(key.public_key(PointFormat::Compressed).unwrap()),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
    }

    #[test]
    fn key_one_hashes() {
        let key = key_one();
        assert_eq!(
            hex::encode(key.hash160(PointFormat::Compressed).unwrap()),
            "751e76e8199196d454941c45d1b3a323f1433bd6"
        );
        assert_eq!(
            hex::encode(key.hash160(PointFormat::Uncompressed).unwrap()),
            "91b24bf9f5288532960ac687abb035127b1d28a5"
        );
    }

    #[test]
    fn cached_keys_match_encoder() {
        let mut key = KeyMaterial::with_scalar(Scalar::from_seed(11).unwrap());
        key.derive_public_key().unwrap();
        let (uncompressed, compressed) = key.cached_public_keys().unwrap();
        assert_eq!(uncompressed, key.public_key(PointFormat::Uncompressed).unwrap());
        assert_eq!(compressed, key.public_key(PointFormat::Compressed).unwrap());
    }

    #[test]
    fn shared_reads_agree_across_threads() {
        let mut key = KeyMaterial::with_scalar(Scalar::from_seed(99).unwrap());
        key.derive_public_key().unwrap();
        let key = std::sync::Arc::new(key);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let key = std::sync::Arc::clone(&key);
                std::thread::spawn(move || {
                    key.address(AddressKind::NativeSegwit { witness_version: 0 }, BtcNetwork::Mainnet)
                        .unwrap()
                })
            })
            .collect();

        let results: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn debug_redacts_private_key() {
        let key = key_one();
        let debug = format!("{:?}", key);
        assert!(debug.contains("HasPublicKey"));
        assert!(debug.contains("REDACTED"));
    }
}
