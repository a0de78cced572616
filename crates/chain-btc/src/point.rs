use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint};
use tracing::trace;

use crate::curve;
use crate::error::BtcError;
use crate::scalar::Scalar;

/// An affine point on secp256k1, coordinates as big-endian 32-byte integers.
///
/// Points produced by [`multiply`] are always finite and on the curve.
/// Points built from caller-supplied coordinates go through [`CurvePoint::new`],
/// which checks the curve equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CurvePoint {
    x: [u8; 32],
    y: [u8; 32],
}

impl CurvePoint {
    /// Builds a point from external coordinates, rejecting anything that does
    /// not satisfy `y^2 = x^3 + 7 (mod p)`.
    pub fn new(x: [u8; 32], y: [u8; 32]) -> Result<Self, BtcError> {
        let point = Self { x, y };
        point.to_affine()?;
        Ok(point)
    }

    pub(crate) const fn from_trusted_coordinates(x: [u8; 32], y: [u8; 32]) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> &[u8; 32] {
        &self.x
    }

    pub fn y(&self) -> &[u8; 32] {
        &self.y
    }

    pub fn has_even_y(&self) -> bool {
        self.y[31] & 1 == 0
    }

    /// Checks the curve equation. Coordinates `>= p` are rejected.
    pub fn is_on_curve(&self) -> bool {
        self.to_affine().is_ok()
    }

    fn to_affine(self) -> Result<AffinePoint, BtcError> {
        let encoded = EncodedPoint::from_affine_coordinates(
            &FieldBytes::clone_from_slice(&self.x),
            &FieldBytes::clone_from_slice(&self.y),
            false,
        );
        Option::from(AffinePoint::from_encoded_point(&encoded))
            .ok_or_else(|| BtcError::InvalidPoint("point does not satisfy the curve equation".into()))
    }

    fn from_affine(point: &AffinePoint) -> Result<Self, BtcError> {
        let encoded = point.to_encoded_point(false);
        let (ex, ey) = match (encoded.x(), encoded.y()) {
            (Some(x), Some(y)) => (x, y),
            _ => return Err(BtcError::InvalidPoint("point at infinity".into())),
        };

        let mut x = [0u8; 32];
        let mut y = [0u8; 32];
        x.copy_from_slice(ex);
        y.copy_from_slice(ey);
        Ok(Self { x, y })
    }
}

/// Multiplies `base` by `scalar` using k256's constant-time projective
/// arithmetic.
///
/// The identity only appears as an intermediate inside k256. Because the
/// group has prime order and the scalar is in `[1, n)`, a valid base never
/// yields infinity; the check remains for externally supplied bases.
pub fn multiply(scalar: &Scalar, base: &CurvePoint) -> Result<CurvePoint, BtcError> {
    let base = base.to_affine()?;
    let product = (ProjectivePoint::from(base) * scalar.as_k256()).to_affine();
    trace!("scalar multiplication complete");
    CurvePoint::from_affine(&product)
}

/// Public point `scalar * G`.
pub fn public_point(scalar: &Scalar) -> Result<CurvePoint, BtcError> {
    multiply(scalar, &curve::generator())
}
