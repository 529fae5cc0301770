//! ECDSA-style signatures.

use {
    super::{hash::hash_message, Signer},
    crate::{
        error::{Error, Result},
        groups::{EllipticCurve, EllipticCurvePoint, Scalar},
        mod_ring::{RingRefExt, UintMont},
    },
    num_traits::Inv,
    tracing::debug,
};

/// ECDSA-style signature `(r, s)`, both in `[1, n-1]`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EcdsaSignature<'a, U: UintMont> {
    pub r: Scalar<'a, U>,
    pub s: Scalar<'a, U>,
}

impl<'a, U: UintMont> EcdsaSignature<'a, U> {
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
    /// Signs the digest `e` with private key `d` and ephemeral `k`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidEphemeral`] if `k = 0`, `k·G = ∞`, `r = 0` or
    /// `s = 0`. The caller must sample a fresh `k`.
    /// [`Error::InvalidPrivateKey`] if `d = 0`.
    pub fn sign_ecdsa_prehashed(
        &self,
        private: Scalar<'a, U>,
        e: Scalar<'a, U>,
        k: Scalar<'a, U>,
    ) -> Result<EcdsaSignature<'a, U>> {
        self.check_private(private)?;
        let commitment = self.commitment(k)?;
        let r = commitment.x_scalar().ok_or(Error::InvalidEphemeral("k·G = ∞"))?;
        if r.is_zero() {
            debug!("ecdsa: r = 0, rejecting ephemeral");
            return Err(Error::InvalidEphemeral("r = 0"));
        }
        let s = k.inverse()? * (e + private * r);
        if s.is_zero() {
            debug!("ecdsa: s = 0, rejecting ephemeral");
            return Err(Error::InvalidEphemeral("s = 0"));
        }
        Ok(EcdsaSignature { r, s })
    }

    /// Accepts iff `(u1·G + u2·Q).x mod n = r` with `w = s⁻¹`, `u1 = e·w`
    /// and `u2 = r·w`. Never fails: malformed input yields `false`.
    pub fn verify_ecdsa_prehashed(
        &self,
        e: Scalar<'a, U>,
        signature: &EcdsaSignature<'a, U>,
        public: EllipticCurvePoint<'a, U>,
    ) -> bool {
        let EcdsaSignature { r, s } = *signature;
        if !self.accepts_public(public) || !self.owns_scalars(&[e, r, s]) || r.is_zero() {
            return false;
        }
        let Some(w) = s.inv() else {
            return false;
        };
        let u1 = e * w;
        let u2 = r * w;
        let point = self.base_mul(u1) + self.point_mul(public, u2);
        point.x_scalar() == Some(r)
    }

    /// # Errors
    ///
    /// See [`Self::sign_ecdsa_prehashed`].
    pub fn sign_ecdsa(
        &self,
        private: Scalar<'a, U>,
        message: &[u8],
        k: Scalar<'a, U>,
    ) -> Result<EcdsaSignature<'a, U>> {
        self.sign_ecdsa_prehashed(private, hash_message(self.curve(), message), k)
    }

    pub fn verify_ecdsa(
        &self,
        message: &[u8],
        signature: &EcdsaSignature<'a, U>,
        public: EllipticCurvePoint<'a, U>,
    ) -> bool {
        self.verify_ecdsa_prehashed(hash_message(self.curve(), message), signature, public)
    }
}

/// Signs an already reduced digest with the default strategy.
///
/// # Errors
///
/// See [`Signer::sign_ecdsa_prehashed`].
pub fn sign_prehashed<'a, U: UintMont>(
    curve: &'a EllipticCurve<U>,
    private: Scalar<'a, U>,
    e: Scalar<'a, U>,
    k: Scalar<'a, U>,
) -> Result<EcdsaSignature<'a, U>> {
    Signer::new(curve).sign_ecdsa_prehashed(private, e, k)
}

pub fn verify_prehashed<'a, U: UintMont>(
    curve: &'a EllipticCurve<U>,
    e: Scalar<'a, U>,
    signature: &EcdsaSignature<'a, U>,
    public: EllipticCurvePoint<'a, U>,
) -> bool {
    Signer::new(curve).verify_ecdsa_prehashed(e, signature, public)
}
