use std::fmt;

use crypto_utils::random::{try_random_bytes_fixed, SeededStream};
use crypto_utils::zeroizing::ZeroizingString;
use k256::elliptic_curve::subtle::ConstantTimeEq;
use k256::{FieldBytes, NonZeroScalar};
use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

use crate::error::BtcError;
use crate::network::BtcNetwork;
use crate::sec::PointFormat;
use crate::wif;

/// Where a private key came from. Provenance never affects validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    SecureRandom,
    Seeded,
    Explicit,
}

/// A secp256k1 private key: an integer in `[1, n)`.
///
/// Held as a k256 `NonZeroScalar`, so the range invariant holds by
/// construction. The value is zeroized on drop.
#[derive(Clone)]
pub struct Scalar {
    inner: NonZeroScalar,
    provenance: Provenance,
}

impl Scalar {
    /// Draws a uniform scalar from the OS entropy source.
    ///
    /// Candidates are 32 random bytes read big-endian; zero and values
    /// `>= n` are rejected and redrawn.
    pub fn from_secure_random() -> Result<Self, BtcError> {
        loop {
            let candidate = Zeroizing::new(try_random_bytes_fixed::<32>()?);
            if let Some(inner) = to_nonzero(&candidate) {
                debug!("private key drawn from os entropy");
                return Ok(Self {
                    inner,
                    provenance: Provenance::SecureRandom,
                });
            }
        }
    }

    /// Deterministic scalar for `seed`.
    ///
    /// Uses the same rejection loop as [`Scalar::from_secure_random`] over a
    /// [`SeededStream`] (ChaCha20, `seed_from_u64`), so a given seed maps to
    /// the same key on every platform.
    pub fn from_seed(seed: u64) -> Result<Self, BtcError> {
        let mut stream = SeededStream::new(seed);
        loop {
            let candidate = Zeroizing::new(stream.next_bytes::<32>());
            if let Some(inner) = to_nonzero(&candidate) {
                debug!("private key derived from seed");
                return Ok(Self {
                    inner,
                    provenance: Provenance::Seeded,
                });
            }
        }
    }

    /// Explicit 256-bit big-endian value. Fails unless `0 < value < n`.
    pub fn from_be_bytes(value: &[u8; 32]) -> Result<Self, BtcError> {
        let inner = to_nonzero(value).ok_or_else(|| {
            BtcError::InvalidScalar("value must be greater than 0 and less than the curve order".into())
        })?;
        Ok(Self {
            inner,
            provenance: Provenance::Explicit,
        })
    }

    pub fn from_u64(value: u64) -> Result<Self, BtcError> {
        let mut bytes = Zeroizing::new([0u8; 32]);
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        Self::from_be_bytes(&bytes)
    }

    /// Parses a base-10 integer, the form the key generator CLI accepts.
    pub fn from_dec_str(value: &str) -> Result<Self, BtcError> {
        let digits = value.trim();
        if digits.starts_with('-') {
            return Err(BtcError::InvalidScalar("value is negative".into()));
        }
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BtcError::InvalidScalar(format!(
                "not a decimal integer: {digits:?}"
            )));
        }

        let mut bytes = Zeroizing::new([0u8; 32]);
        for digit in digits.bytes().map(|b| u32::from(b - b'0')) {
            let mut carry = digit;
            for byte in bytes.iter_mut().rev() {
                let acc = u32::from(*byte) * 10 + carry;
                *byte = acc as u8;
                carry = acc >> 8;
            }
            if carry != 0 {
                return Err(BtcError::InvalidScalar("value exceeds 256 bits".into()));
            }
        }

        Self::from_be_bytes(&bytes)
    }

    /// Parses a Wallet Import Format string, returning the key together with
    /// the public key form and network it was exported for.
    pub fn from_wif(encoded: &str) -> Result<(Self, PointFormat, BtcNetwork), BtcError> {
        wif::decode(encoded)
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Big-endian 32-byte serialization.
    pub fn to_be_bytes(&self) -> Zeroizing<[u8; 32]> {
        let scalar: k256::Scalar = *self.inner;
        Zeroizing::new(scalar.to_bytes().into())
    }

    /// Lowercase hex, zero-padded to 64 digits.
    pub fn to_hex(&self) -> ZeroizingString {
        hex::encode(*self.to_be_bytes()).into()
    }

    /// Base-10 rendering without leading zeros.
    pub fn to_dec_string(&self) -> ZeroizingString {
        let mut value = self.to_be_bytes();
        let mut digits = Vec::with_capacity(78);

        while value.iter().any(|&b| b != 0) {
            let mut rem = 0u32;
            for byte in value.iter_mut() {
                let acc = (rem << 8) | u32::from(*byte);
                *byte = (acc / 10) as u8;
                rem = acc % 10;
            }
            digits.push(b'0' + rem as u8);
        }
        digits.reverse();

        let rendered = String::from_utf8_lossy(&digits).into_owned();
        digits.zeroize();
        rendered.into()
    }

    pub(crate) fn as_k256(&self) -> k256::Scalar {
        *self.inner
    }
}

fn to_nonzero(bytes: &[u8; 32]) -> Option<NonZeroScalar> {
    Option::from(NonZeroScalar::from_repr(FieldBytes::clone_from_slice(bytes)))
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.inner.ct_eq(&other.inner).into()
    }
}

impl Eq for Scalar {}

impl Drop for Scalar {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scalar")
            .field("value", &"[REDACTED]")
            .field("provenance", &self.provenance)
            .finish()
    }
}
