//! Message digests reduced into the scalar field.

use {
    crate::{
        codec::{BigEndianCodec, Codec},
        groups::{EllipticCurve, FieldElement, Scalar},
        mod_ring::{RingRefExt, UintMont},
    },
    sha2::{Digest, Sha256},
};

/// `e = SHA-256(m) mod n`, reading the digest as a big-endian integer.
pub fn hash_message<'a, U: UintMont>(curve: &'a EllipticCurve<U>, message: &[u8]) -> Scalar<'a, U> {
    let digest = Sha256::digest(message);
    curve.scalar_field().from_be_bytes_reduced(&digest)
}

/// Schnorr challenge `e = SHA-256(R.x ‖ m) mod n` with `R.x` in its fixed
/// width field encoding.
pub fn hash_challenge<'a, U: UintMont>(
    curve: &'a EllipticCurve<U>,
    commitment_x: FieldElement<'a, U>,
    message: &[u8],
) -> Scalar<'a, U> {
    let digest = Sha256::new()
        .chain_update(BigEndianCodec.to_vec(commitment_x))
        .chain_update(message)
        .finalize();
    curve.scalar_field().from_be_bytes_reduced(&digest)
}
