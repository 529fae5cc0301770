//! SM2-like signatures.
//!
//! Shares the signing and verification equations of SM2 but hashes the bare
//! message: there is no `Z_A` identity binding, so this is not
//! interoperable with standard SM2.

use {
    super::{hash::hash_message, Signer},
    crate::{
        error::{Error, Result},
        groups::{EllipticCurve, EllipticCurvePoint, Scalar},
        mod_ring::{RingRefExt, UintMont},
    },
    tracing::debug,
};

/// SM2-like signature `(r, s)`, both in `[1, n-1]`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Sm2Signature<'a, U: UintMont> {
    pub r: Scalar<'a, U>,
    pub s: Scalar<'a, U>,
}

impl<'a, U: UintMont> Sm2Signature<'a, U> {
    /// # Errors
    ///
    /// [`Error::InvalidSignatureFormat`] if `r` or `s` is outside `[1, n-1]`.
    pub fn from_uints(curve: &'a EllipticCurve<U>, r: U, s: U) -> Result<Self> {
        let field = curve.scalar_field();
        let nonzero = |v: U| field.checked_from(v).filter(|x| !x.is_zero());
        match (nonzero(r), nonzero(s)) {
            (Some(r), Some(s)) => Ok(Self { r, s }),
            _ => Err(Error::InvalidSignatureFormat),
        }
    }
}

impl<'a, U: UintMont> Signer<'a, U> {
    /// `r = (e + (k·G).x) mod n`, `s = (1 + d)⁻¹ (k − r·d) mod n`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPrivateKey`] if `d = 0` or `d = n - 1` (no inverse
    /// of `1 + d`). [`Error::InvalidEphemeral`] if `k = 0`, `r = 0`,
    /// `r + k = n` or `s = 0`.
    pub fn sign_sm2(
        &self,
        private: Scalar<'a, U>,
        message: &[u8],
        k: Scalar<'a, U>,
    ) -> Result<Sm2Signature<'a, U>> {
        self.check_private(private)?;
        let Ok(scale) = (private + self.curve().scalar_field().one()).inverse() else {
            return Err(Error::InvalidPrivateKey);
        };
        let commitment = self.commitment(k)?;
        let x = commitment.x_scalar().ok_or(Error::InvalidEphemeral("k·G = ∞"))?;
        let r = hash_message(self.curve(), message) + x;
        if r.is_zero() || (r + k).is_zero() {
            debug!("sm2: degenerate r, rejecting ephemeral");
            return Err(Error::InvalidEphemeral("r = 0 or r + k = n"));
        }
        let s = scale * (k - r * private);
        if s.is_zero() {
            debug!("sm2: s = 0, rejecting ephemeral");
            return Err(Error::InvalidEphemeral("s = 0"));
        }
        Ok(Sm2Signature { r, s })
    }

    /// Accepts iff `(e + P.x) mod n = r` for `P = s·G + (r + s)·Q`.
    pub fn verify_sm2(
        &self,
        message: &[u8],
        signature: &Sm2Signature<'a, U>,
        public: EllipticCurvePoint<'a, U>,
    ) -> bool {
        let Sm2Signature { r, s } = *signature;
        if !self.accepts_public(public) || !self.owns_scalars(&[r, s]) {
            return false;
        }
        if r.is_zero() || s.is_zero() {
            return false;
        }
        let t = r + s;
        if t.is_zero() {
            return false;
        }
        let point = self.base_mul(s) + self.point_mul(public, t);
        let Some(x) = point.x_scalar() else {
            return false;
        };
        hash_message(self.curve(), message) + x == r
    }
}
