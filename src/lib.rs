//! Elliptic curve signatures over short Weierstrass curves, and the key
//! recovery attacks that follow from mishandled ephemeral scalars.
//!
//! Layers, leaf first:
//!
//! * [`mod_ring`]: Montgomery arithmetic modulo a runtime odd modulus,
//! * [`groups`]: the curve group in affine and Jacobian coordinates,
//! * [`scalar_mul`]: three interchangeable scalar multiplication strategies,
//! * [`signature`]: ECDSA-style, Schnorr-style and SM2-like signatures,
//! * [`misuse`]: private key recovery from nonce leaks and reuse, and
//!   message-free forgery.
//!
//! ```
//! use {
//!     ecsig::{groups::named::secp256r1, mod_ring::RingRefExt, signature::*},
//!     rand::thread_rng,
//! };
//!
//! let curve = secp256r1();
//! let mut rng = thread_rng();
//! let pair = generate_keypair(&curve, &mut rng);
//! let k = curve.scalar_field().random_nonzero(&mut rng);
//! let signature = sign(&curve, Scheme::Ecdsa, pair.private, b"hello", k).unwrap();
//! assert!(verify(&curve, Scheme::Ecdsa, b"hello", &signature, pair.public));
//! ```

pub mod codec;
mod error;
pub mod groups;
pub mod misuse;
pub mod mod_ring;
pub mod scalar_mul;
pub mod signature;

pub use self::{
    error::{Error, Result},
    groups::{EllipticCurve, EllipticCurvePoint},
    scalar_mul::{scalar_mul, Strategy},
    signature::{generate_keypair, sign, verify, Scheme},
};
