//! Schnorr-style signatures `(R, s, e)` with `s = k + e·d`.

use {
    super::{hash::hash_challenge, Signer},
    crate::{
        error::{Error, Result},
        groups::{EllipticCurvePoint, Scalar},
        mod_ring::UintMont,
    },
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SchnorrSignature<'a, U: UintMont> {
    /// The commitment `R = k·G`.
    pub commitment: EllipticCurvePoint<'a, U>,
    pub s:          Scalar<'a, U>,
    /// The challenge `e = H(R.x ‖ m) mod n`, carried for convenience.
    /// Verification recomputes it.
    pub e:          Scalar<'a, U>,
}

impl<'a, U: UintMont> Signer<'a, U> {
    /// # Errors
    ///
    /// [`Error::InvalidEphemeral`] if `k = 0` or `k·G = ∞`,
    /// [`Error::InvalidPrivateKey`] if `d = 0`.
    pub fn sign_schnorr(
        &self,
        private: Scalar<'a, U>,
        message: &[u8],
        k: Scalar<'a, U>,
    ) -> Result<SchnorrSignature<'a, U>> {
        self.check_private(private)?;
        let commitment = self.commitment(k)?;
        let x = commitment.x().ok_or(Error::InvalidEphemeral("k·G = ∞"))?;
        let e = hash_challenge(self.curve(), x, message);
        Ok(SchnorrSignature {
            commitment,
            s: k + e * private,
            e,
        })
    }

    /// Accepts iff the carried challenge matches `H(R.x ‖ m)` and
    /// `s·G = R + e·Q`.
    pub fn verify_schnorr(
        &self,
        message: &[u8],
        signature: &SchnorrSignature<'a, U>,
        public: EllipticCurvePoint<'a, U>,
    ) -> bool {
        let SchnorrSignature { commitment, s, e } = *signature;
        if !self.accepts_public(public)
            || commitment.curve() != self.curve()
            || !self.owns_scalars(&[s, e])
        {
            return false;
        }
        let Some(x) = commitment.x() else {
            return false;
        };
        if hash_challenge(self.curve(), x, message) != e {
            return false;
        }
        self.base_mul(s) == commitment + self.point_mul(public, e)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            groups::named::{secp256k1, sm2p256v1, toy_p17},
            mod_ring::RingRefExt,
            scalar_mul::Strategy,
        },
    };

    #[test]
    fn test_toy_vector() {
        let curve = toy_p17();
        let field = curve.scalar_field();
        let signer = Signer::new(&curve);
        let d = field.from_u64(7);
        let signature = signer
            .sign_schnorr(d, b"cross-scheme message", field.from_u64(5))
            .unwrap();
        assert_eq!(signature.commitment, curve.from_uints(ruint::aliases::U64::from(9_u64), ruint::aliases::U64::from(16_u64)).unwrap());
        assert_eq!(signature.e, field.from_u64(13));
        // 5 + 13 · 7 = 96 = 1 mod 19
        assert_eq!(signature.s, field.from_u64(1));

        let public = curve.generator().mul_uint(7_u64);
        assert!(signer.verify_schnorr(b"cross-scheme message", &signature, public));
    }

    #[test]
    fn test_tampered() {
        let curve = secp256k1();
        let field = curve.scalar_field();
        let mut rng = rand::thread_rng();
        let signer = Signer::new(&curve).with_strategy(Strategy::Jacobian);
        let d = field.random_nonzero(&mut rng);
        let public = signer.base_mul(d);
        let signature = signer
            .sign_schnorr(d, b"hello", field.random_nonzero(&mut rng))
            .unwrap();
        assert!(signer.verify_schnorr(b"hello", &signature, public));
        assert!(!signer.verify_schnorr(b"hello!", &signature, public));

        let wrong_s = SchnorrSignature {
            s: signature.s + field.one(),
            ..signature
        };
        assert!(!signer.verify_schnorr(b"hello", &wrong_s, public));

        let wrong_e = SchnorrSignature {
            e: signature.e + field.one(),
            ..signature
        };
        assert!(!signer.verify_schnorr(b"hello", &wrong_e, public));

        let at_infinity = SchnorrSignature {
            commitment: curve.infinity(),
            ..signature
        };
        assert!(!signer.verify_schnorr(b"hello", &at_infinity, public));
    }

    #[test]
    fn test_foreign_scalars() {
        let curve = secp256k1();
        let other = sm2p256v1();
        let mut rng = rand::thread_rng();
        let signer = Signer::new(&curve);
        let d = curve.scalar_field().random_nonzero(&mut rng);
        let public = signer.base_mul(d);
        let signature = signer
            .sign_schnorr(d, b"hello", curve.scalar_field().random_nonzero(&mut rng))
            .unwrap();
        let foreign = SchnorrSignature {
            s: other.scalar_field().from_reduced(signature.s.to_uint()),
            e: other.scalar_field().from_reduced(signature.e.to_uint()),
            ..signature
        };
        assert!(!signer.verify_schnorr(b"hello", &foreign, public));
    }

    #[test]
    fn test_all_strategies() {
        let curve = sm2p256v1();
        let field = curve.scalar_field();
        let mut rng = rand::thread_rng();
        for strategy in Strategy::ALL {
            let signer = Signer::new(&curve).with_strategy(strategy);
            let d = field.random_nonzero(&mut rng);
            let public = signer.base_mul(d);
            let signature = signer
                .sign_schnorr(d, b"message", field.random_nonzero(&mut rng))
                .unwrap();
            assert!(signer.verify_schnorr(b"message", &signature, public));
        }
    }
}
