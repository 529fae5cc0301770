//! Signature schemes over a short Weierstrass curve.
//!
//! All three schemes share key generation and the `SHA-256 mod n` digest.
//! Ephemeral scalars are supplied by the caller and must never be reused:
//! see [`crate::misuse`] for what a reused or leaked `k` gives away.

mod ecdsa;
mod hash;
mod schnorr;
mod sm2;

pub use self::{
    ecdsa::{sign_prehashed, verify_prehashed, EcdsaSignature},
    hash::{hash_challenge, hash_message},
    schnorr::SchnorrSignature,
    sm2::Sm2Signature,
};
use {
    crate::{
        error::{Error, Result},
        groups::{CryptoCoreRng, EllipticCurve, EllipticCurvePoint, Scalar},
        mod_ring::{RingRefExt, UintMont},
        scalar_mul::Strategy,
    },
    std::{fmt, str::FromStr},
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Scheme {
    Ecdsa,
    Schnorr,
    /// SM2-like toy variant, see [`Sm2Signature`].
    Sm2,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Signature<'a, U: UintMont> {
    Ecdsa(EcdsaSignature<'a, U>),
    Schnorr(SchnorrSignature<'a, U>),
    Sm2(Sm2Signature<'a, U>),
}

/// Private scalar `d ∈ [1, n-1]` and its public point `Q = d·G`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct KeyPair<'a, U: UintMont> {
    pub private: Scalar<'a, U>,
    pub public:  EllipticCurvePoint<'a, U>,
}

/// Signs and verifies on one curve with a chosen multiplication strategy.
#[derive(Clone, Copy, Debug)]
pub struct Signer<'a, U: UintMont> {
    curve:    &'a EllipticCurve<U>,
    strategy: Strategy,
}

impl Scheme {
    pub const ALL: [Self; 3] = [Self::Ecdsa, Self::Schnorr, Self::Sm2];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ecdsa => "ecdsa",
            Self::Schnorr => "schnorr",
            Self::Sm2 => "sm2",
        }
    }
}

impl<'a, U: UintMont> Signature<'a, U> {
    pub const fn scheme(&self) -> Scheme {
        match self {
            Self::Ecdsa(_) => Scheme::Ecdsa,
            Self::Schnorr(_) => Scheme::Schnorr,
            Self::Sm2(_) => Scheme::Sm2,
        }
    }
}

impl<'a, U: UintMont> KeyPair<'a, U> {
    pub fn generate(curve: &'a EllipticCurve<U>, rng: &mut dyn CryptoCoreRng) -> Self {
        let private = curve.scalar_field().random_nonzero(rng);
        Self {
            private,
            public: Strategy::FixedBase.mul_generator(curve, private),
        }
    }

    /// # Errors
    ///
    /// [`Error::InvalidPrivateKey`] unless `1 ≤ d < n`.
    pub fn from_private(curve: &'a EllipticCurve<U>, private: U) -> Result<Self> {
        let field = curve.scalar_field();
        if private.is_zero() || private >= field.modulus() {
            return Err(Error::InvalidPrivateKey);
        }
        let private = field.from(private);
        Ok(Self {
            private,
            public: Strategy::FixedBase.mul_generator(curve, private),
        })
    }
}

impl<'a, U: UintMont> Signer<'a, U> {
    pub const fn new(curve: &'a EllipticCurve<U>) -> Self {
        Self {
            curve,
            strategy: Strategy::FixedBase,
        }
    }

    #[must_use]
    pub const fn with_strategy(self, strategy: Strategy) -> Self {
        Self { strategy, ..self }
    }

    pub const fn curve(&self) -> &'a EllipticCurve<U> {
        self.curve
    }

    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// `k·G` with the configured strategy.
    pub fn base_mul(&self, k: Scalar<'a, U>) -> EllipticCurvePoint<'a, U> {
        self.strategy.mul_generator(self.curve, k)
    }

    pub fn point_mul(
        &self,
        point: EllipticCurvePoint<'a, U>,
        k: Scalar<'a, U>,
    ) -> EllipticCurvePoint<'a, U> {
        self.strategy.mul_scalar(point, k)
    }

    /// # Errors
    ///
    /// See the scheme specific signing methods.
    pub fn sign(
        &self,
        scheme: Scheme,
        private: Scalar<'a, U>,
        message: &[u8],
        k: Scalar<'a, U>,
    ) -> Result<Signature<'a, U>> {
        Ok(match scheme {
            Scheme::Ecdsa => Signature::Ecdsa(self.sign_ecdsa(private, message, k)?),
            Scheme::Schnorr => Signature::Schnorr(self.sign_schnorr(private, message, k)?),
            Scheme::Sm2 => Signature::Sm2(self.sign_sm2(private, message, k)?),
        })
    }

    /// `false` if the signature belongs to a different scheme.
    pub fn verify(
        &self,
        scheme: Scheme,
        message: &[u8],
        signature: &Signature<'a, U>,
        public: EllipticCurvePoint<'a, U>,
    ) -> bool {
        match (scheme, signature) {
            (Scheme::Ecdsa, Signature::Ecdsa(signature)) => {
                self.verify_ecdsa(message, signature, public)
            }
            (Scheme::Schnorr, Signature::Schnorr(signature)) => {
                self.verify_schnorr(message, signature, public)
            }
            (Scheme::Sm2, Signature::Sm2(signature)) => self.verify_sm2(message, signature, public),
            _ => false,
        }
    }

    fn check_private(&self, private: Scalar<'a, U>) -> Result<()> {
        if !self.owns_scalars(&[private]) || private.is_zero() {
            return Err(Error::InvalidPrivateKey);
        }
        Ok(())
    }

    /// `R = k·G` for a usable ephemeral.
    fn commitment(&self, k: Scalar<'a, U>) -> Result<EllipticCurvePoint<'a, U>> {
        if k.is_zero() {
            return Err(Error::InvalidEphemeral("k = 0"));
        }
        let commitment = self.base_mul(k);
        if commitment.is_infinity() {
            return Err(Error::InvalidEphemeral("k·G = ∞"));
        }
        Ok(commitment)
    }

    fn accepts_public(&self, public: EllipticCurvePoint<'a, U>) -> bool {
        public.curve() == self.curve && !public.is_infinity()
    }

    /// Scalars reduced modulo another curve's order are never accepted.
    fn owns_scalars(&self, scalars: &[Scalar<'a, U>]) -> bool {
        scalars
            .iter()
            .all(|scalar| scalar.ring() == self.curve.scalar_field())
    }
}

pub fn generate_keypair<'a, U: UintMont>(
    curve: &'a EllipticCurve<U>,
    rng: &mut dyn CryptoCoreRng,
) -> KeyPair<'a, U> {
    KeyPair::generate(curve, rng)
}

/// # Errors
///
/// [`Error::InvalidEphemeral`] when `k` yields a degenerate signature, the
/// caller must resample. [`Error::InvalidPrivateKey`] for `d = 0`, and for
/// SM2 also `d = n - 1`.
pub fn sign<'a, U: UintMont>(
    curve: &'a EllipticCurve<U>,
    scheme: Scheme,
    private: Scalar<'a, U>,
    message: &[u8],
    k: Scalar<'a, U>,
) -> Result<Signature<'a, U>> {
    Signer::new(curve).sign(scheme, private, message, k)
}

pub fn verify<'a, U: UintMont>(
    curve: &'a EllipticCurve<U>,
    scheme: Scheme,
    message: &[u8],
    signature: &Signature<'a, U>,
    public: EllipticCurvePoint<'a, U>,
) -> bool {
    Signer::new(curve).verify(scheme, message, signature, public)
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ecdsa" => Ok(Self::Ecdsa),
            "schnorr" => Ok(Self::Schnorr),
            "sm2" | "sm2-like" => Ok(Self::Sm2),
            _ => Err(format!("unknown scheme {s:?}, expected ecdsa, schnorr or sm2")),
        }
    }
}
