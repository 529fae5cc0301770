//! Elliptic curve groups in affine and Jacobian coordinates.

mod elliptic_curve;
mod jacobian;
pub mod named;

pub use self::{
    elliptic_curve::{EllipticCurve, EllipticCurvePoint, FieldElement, Scalar},
    jacobian::JacobianPoint,
};
use rand::{CryptoRng, RngCore};

/// Object safe source of key material and ephemerals.
pub trait CryptoCoreRng: CryptoRng + RngCore {}

impl<T> CryptoCoreRng for T where T: CryptoRng + RngCore {}
