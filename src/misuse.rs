//! Private key recovery from ephemeral scalar misuse.
//!
//! Every function works from public data (messages, signatures, public
//! keys) plus the side information named in its documentation. Nothing
//! here checks that the stated precondition actually holds: if it does not,
//! the algebra still produces a scalar, just the wrong one. Results are
//! therefore wrapped in [`Recovered`] and should be confirmed against the
//! public key before use.

use {
    crate::{
        groups::{CryptoCoreRng, EllipticCurve, EllipticCurvePoint, Scalar},
        mod_ring::{RingRefExt, UintMont},
        scalar_mul::Strategy,
        signature::{hash_message, EcdsaSignature, SchnorrSignature, Sm2Signature},
    },
    num_traits::Inv,
    tracing::{debug, warn},
};

/// A value derived algebraically, not yet checked against anything.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[must_use]
pub struct Recovered<T>(T);

/// A message together with its ECDSA-style signature.
#[derive(Clone, Copy, Debug)]
pub struct SignedMessage<'m, 'a, U: UintMont> {
    pub message:   &'m [u8],
    pub signature: EcdsaSignature<'a, U>,
}

/// Source of the ephemeral scalar shared by a group of signatures.
#[derive(Clone, Copy, Debug)]
pub enum NonceWitness<'m, 'a, U: UintMont> {
    /// Two signatures from the same signer on different messages.
    Reused {
        first:  SignedMessage<'m, 'a, U>,
        second: SignedMessage<'m, 'a, U>,
    },

    /// One signature made by a signer whose own key is known, e.g. a
    /// colluding participant of a threshold or batch signing service.
    Insider {
        signed:  SignedMessage<'m, 'a, U>,
        private: Scalar<'a, U>,
    },
}

/// ECDSA-style signature `(r, s)` valid for the digest `e` under the target
/// public key. No message with digest `e` is known.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Forgery<'a, U: UintMont> {
    pub signature: EcdsaSignature<'a, U>,
    pub digest:    Scalar<'a, U>,
}

impl<T> Recovered<T> {
    /// The value without confirmation.
    pub fn into_unverified(self) -> T {
        self.0
    }

    pub const fn unverified(&self) -> &T {
        &self.0
    }
}

impl<'a, U: UintMont> Recovered<Scalar<'a, U>> {
    /// Returns the private key if `d·G` equals `public`.
    pub fn confirm_private(self, public: EllipticCurvePoint<'a, U>) -> Option<Scalar<'a, U>> {
        let candidate = self.0;
        let derived = Strategy::FixedBase.mul_generator(public.curve(), candidate);
        (derived == public).then_some(candidate)
    }

    /// Returns the nonce if `(k·G).x mod n` equals `r`.
    pub fn confirm_nonce(
        self,
        curve: &'a EllipticCurve<U>,
        r: Scalar<'a, U>,
    ) -> Option<Scalar<'a, U>> {
        let candidate = self.0;
        let commitment = Strategy::FixedBase.mul_generator(curve, candidate);
        (commitment.x_scalar() == Some(r)).then_some(candidate)
    }
}

impl<'m, 'a, U: UintMont> SignedMessage<'m, 'a, U> {
    pub const fn new(message: &'m [u8], signature: EcdsaSignature<'a, U>) -> Self {
        Self { message, signature }
    }
}

/// `d = r⁻¹ (k·s − e)` from one ECDSA-style signature and its leaked nonce.
pub fn recover_from_leaked_nonce<'a, U: UintMont>(
    curve: &'a EllipticCurve<U>,
    message: &[u8],
    signature: &EcdsaSignature<'a, U>,
    k: Scalar<'a, U>,
) -> Option<Recovered<Scalar<'a, U>>> {
    let e = hash_message(curve, message);
    private_from_nonce(e, signature, k)
}

/// `k = (e1 − e2)(s1 − s2)⁻¹` for two signatures sharing one signer and
/// one nonce.
///
/// `None` if `s1 = s2`, which for a shared nonce means `e1 = e2`.
pub fn recover_reused_nonce<'a, U: UintMont>(
    curve: &'a EllipticCurve<U>,
    first: SignedMessage<'_, 'a, U>,
    second: SignedMessage<'_, 'a, U>,
) -> Option<Recovered<Scalar<'a, U>>> {
    if first.signature.r != second.signature.r {
        warn!("signatures have different r, they do not share a nonce");
    }
    let e1 = hash_message(curve, first.message);
    let e2 = hash_message(curve, second.message);
    let denominator = first.signature.s - second.signature.s;
    let k = ((e1 - e2) / denominator)?;
    Some(Recovered(k))
}

/// Recovers the signer's private key from two signatures made with the same
/// nonce.
pub fn recover_nonce_reuse<'a, U: UintMont>(
    curve: &'a EllipticCurve<U>,
    first: SignedMessage<'_, 'a, U>,
    second: SignedMessage<'_, 'a, U>,
) -> Option<Recovered<Scalar<'a, U>>> {
    let k = recover_reused_nonce(curve, first, second)?.into_unverified();
    private_from_nonce(hash_message(curve, first.message), &first.signature, k)
}

/// Recovers the private key behind every signature in `victims`, all of
/// which used the nonce exposed by `witness`.
///
/// The nonce must come from a witness: differences of signatures by two
/// different keys do not cancel the keys out. Results are in the order of
/// `victims`; `None` if the witness does not yield a nonce.
pub fn recover_shared_nonce_keys<'a, U: UintMont>(
    curve: &'a EllipticCurve<U>,
    witness: NonceWitness<'_, 'a, U>,
    victims: &[SignedMessage<'_, 'a, U>],
) -> Option<Vec<Recovered<Scalar<'a, U>>>> {
    let k = match witness {
        NonceWitness::Reused { first, second } => {
            recover_reused_nonce(curve, first, second)?.into_unverified()
        }
        NonceWitness::Insider { signed, private } => {
            let e = hash_message(curve, signed.message);
            let SignedMessage { signature, .. } = signed;
            ((e + private * signature.r) / signature.s)?
        }
    };
    debug!(victims = victims.len(), "recovering keys sharing a nonce");
    victims
        .iter()
        .map(|victim| {
            if victim.signature.r != signature_r(witness) {
                warn!("victim signature has a different r than the witness");
            }
            private_from_nonce(hash_message(curve, victim.message), &victim.signature, k)
        })
        .collect()
}

/// Recovers `d` from an ECDSA-style and a Schnorr-style signature on the
/// same message with the same key and nonce:
/// `d = (s_schnorr·s_ecdsa − e_ecdsa)(r_ecdsa + e_schnorr·s_ecdsa)⁻¹`.
pub fn recover_cross_scheme<'a, U: UintMont>(
    curve: &'a EllipticCurve<U>,
    message: &[u8],
    ecdsa: &EcdsaSignature<'a, U>,
    schnorr: &SchnorrSignature<'a, U>,
) -> Option<Recovered<Scalar<'a, U>>> {
    if ecdsa.r != schnorr.commitment.x_scalar()? {
        warn!("ECDSA r does not match the Schnorr commitment, nonces differ");
    }
    let e = hash_message(curve, message);
    let numerator = schnorr.s * ecdsa.s - e;
    let denominator = ecdsa.r + schnorr.e * ecdsa.s;
    Some(Recovered((numerator / denominator)?))
}

/// `d = (k − s)(s + r)⁻¹` from one SM2-like signature and its leaked nonce.
pub fn recover_sm2_leaked_nonce<'a, U: UintMont>(
    signature: &Sm2Signature<'a, U>,
    k: Scalar<'a, U>,
) -> Option<Recovered<Scalar<'a, U>>> {
    let Sm2Signature { r, s } = *signature;
    Some(Recovered(((k - s) / (s + r))?))
}

/// Message-free ECDSA forgery.
///
/// Picks random `u, v ∈ [1, n-1]`, sets `R = u·G + v·Q`, `r = R.x mod n`,
/// `s = r·v⁻¹` and `e = r·u·v⁻¹`. The pair `(r, s)` verifies for digest `e`
/// under `Q`, but `e` is an output of the construction: this is not a
/// forgery on a chosen message. `None` if `R = ∞` or `r = 0`.
pub fn forge_without_message<'a, U: UintMont>(
    curve: &'a EllipticCurve<U>,
    public: EllipticCurvePoint<'a, U>,
    rng: &mut dyn CryptoCoreRng,
) -> Option<Forgery<'a, U>> {
    let field = curve.scalar_field();
    let u = field.random_nonzero(rng);
    let v = field.random_nonzero(rng);
    let point =
        Strategy::FixedBase.mul_generator(curve, u) + Strategy::Jacobian.mul_scalar(public, v);
    let r = point.x_scalar()?;
    if r.is_zero() {
        return None;
    }
    let v_inv = v.inv()?;
    let s = r * v_inv;
    Some(Forgery {
        signature: EcdsaSignature { r, s },
        digest:    r * u * v_inv,
    })
}

fn private_from_nonce<'a, U: UintMont>(
    e: Scalar<'a, U>,
    signature: &EcdsaSignature<'a, U>,
    k: Scalar<'a, U>,
) -> Option<Recovered<Scalar<'a, U>>> {
    Some(Recovered(((k * signature.s - e) / signature.r)?))
}

fn signature_r<'a, U: UintMont>(witness: NonceWitness<'_, 'a, U>) -> Scalar<'a, U> {
    match witness {
        NonceWitness::Reused { first, .. } => first.signature.r,
        NonceWitness::Insider { signed, .. } => signed.signature.r,
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            groups::named::{secp256k1, toy_p17},
            signature::{verify_prehashed, KeyPair, Signer},
        },
        ruint::aliases::U64,
    };

    #[test]
    fn test_toy_leaked_nonce() {
        let curve = toy_p17();
        let field = curve.scalar_field();
        let pair = KeyPair::from_private(&curve, U64::from(7)).unwrap();
        let k = field.from_u64(5);
        let signature = Signer::new(&curve)
            .sign_ecdsa(pair.private, b"important message", k)
            .unwrap();
        let recovered = recover_from_leaked_nonce(&curve, b"important message", &signature, k)
            .unwrap();
        assert_eq!(recovered.unverified(), &field.from_u64(7));
        assert_eq!(recovered.confirm_private(pair.public), Some(field.from_u64(7)));
    }

    #[test]
    fn test_toy_nonce_reuse() {
        let curve = toy_p17();
        let field = curve.scalar_field();
        let signer = Signer::new(&curve);
        let d = field.from_u64(7);
        let k = field.from_u64(5);
        let first = SignedMessage::new(
            b"first message",
            signer.sign_ecdsa(d, b"first message", k).unwrap(),
        );
        let second = SignedMessage::new(
            b"second message",
            signer.sign_ecdsa(d, b"second message", k).unwrap(),
        );
        assert_eq!(first.signature.s, field.from_u64(3));
        assert_eq!(second.signature.s, field.from_u64(10));

        let nonce = recover_reused_nonce(&curve, first, second).unwrap();
        assert_eq!(nonce.confirm_nonce(&curve, first.signature.r), Some(k));
        let private = recover_nonce_reuse(&curve, first, second).unwrap();
        assert_eq!(private.into_unverified(), d);
    }

    #[test]
    fn test_same_s_has_no_answer() {
        let curve = toy_p17();
        let field = curve.scalar_field();
        let signature = Signer::new(&curve)
            .sign_ecdsa(field.from_u64(7), b"first message", field.from_u64(5))
            .unwrap();
        let signed = SignedMessage::new(b"first message", signature);
        assert_eq!(recover_reused_nonce(&curve, signed, signed), None);
    }

    #[test]
    fn test_wrong_nonce_is_not_confirmed() {
        let curve = toy_p17();
        let field = curve.scalar_field();
        let pair = KeyPair::from_private(&curve, U64::from(7)).unwrap();
        let signature = Signer::new(&curve)
            .sign_ecdsa(pair.private, b"important message", field.from_u64(5))
            .unwrap();
        let recovered =
            recover_from_leaked_nonce(&curve, b"important message", &signature, field.from_u64(6))
                .unwrap();
        assert_ne!(recovered.unverified(), &pair.private);
        assert_eq!(recovered.confirm_private(pair.public), None);
    }

    #[test]
    fn test_insider_witness() {
        let curve = secp256k1();
        let field = curve.scalar_field();
        let mut rng = rand::thread_rng();
        let signer = Signer::new(&curve);
        let insider = KeyPair::generate(&curve, &mut rng);
        let victims: Vec<_> = (0..3).map(|_| KeyPair::generate(&curve, &mut rng)).collect();
        let k = field.random_nonzero(&mut rng);

        let insider_signature = signer.sign_ecdsa(insider.private, b"insider", k).unwrap();
        let witness = NonceWitness::Insider {
            signed:  SignedMessage::new(b"insider", insider_signature),
            private: insider.private,
        };
        let signed: Vec<_> = victims
            .iter()
            .map(|victim| {
                let signature = signer.sign_ecdsa(victim.private, b"victim", k).unwrap();
                SignedMessage::new(b"victim", signature)
            })
            .collect();
        let recovered = recover_shared_nonce_keys(&curve, witness, &signed).unwrap();
        assert_eq!(recovered.len(), victims.len());
        for (victim, recovered) in victims.iter().zip(recovered) {
            assert_eq!(recovered.confirm_private(victim.public), Some(victim.private));
        }
    }

    #[test]
    fn test_toy_cross_scheme() {
        let curve = toy_p17();
        let field = curve.scalar_field();
        let signer = Signer::new(&curve);
        let d = field.from_u64(7);
        let k = field.from_u64(5);
        let message = b"cross-scheme message";
        let ecdsa = signer.sign_ecdsa(d, message, k).unwrap();
        let schnorr = signer.sign_schnorr(d, message, k).unwrap();
        assert_eq!((ecdsa.r, ecdsa.s), (field.from_u64(9), field.from_u64(13)));
        let recovered = recover_cross_scheme(&curve, message, &ecdsa, &schnorr).unwrap();
        assert_eq!(recovered.into_unverified(), d);
    }

    #[test]
    fn test_sm2_leaked_nonce() {
        let curve = secp256k1();
        let field = curve.scalar_field();
        let mut rng = rand::thread_rng();
        let pair = KeyPair::generate(&curve, &mut rng);
        let k = field.random_nonzero(&mut rng);
        let signature = Signer::new(&curve).sign_sm2(pair.private, b"sm2", k).unwrap();
        let recovered = recover_sm2_leaked_nonce(&signature, k).unwrap();
        assert_eq!(recovered.confirm_private(pair.public), Some(pair.private));
    }

    #[test]
    fn test_toy_forgery() {
        let curve = toy_p17();
        let mut rng = rand::thread_rng();
        let pair = KeyPair::generate(&curve, &mut rng);
        let mut forged = 0;
        for _ in 0..200 {
            let Some(forgery) = forge_without_message(&curve, pair.public, &mut rng) else {
                continue;
            };
            forged += 1;
            assert!(verify_prehashed(&curve, forgery.digest, &forgery.signature, pair.public));
        }
        assert!(forged >= 100);
    }
}
