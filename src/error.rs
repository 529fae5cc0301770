use thiserror::Error;

/// Errors reported by curve construction, signing and decoding.
///
/// Verification never returns an error: malformed or non-verifying
/// signatures yield `false`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The element shares a factor with the modulus.
    #[error("element is not invertible modulo the ring modulus")]
    NotInvertible,

    /// The ephemeral scalar produced a degenerate commitment or signature.
    /// The caller must sample a fresh nonce.
    #[error("degenerate ephemeral scalar: {0}")]
    InvalidEphemeral(&'static str),

    /// A signature component lies outside `[1, n-1]`.
    #[error("signature component out of range")]
    InvalidSignatureFormat,

    /// Domain parameters rejected at construction.
    #[error("invalid curve parameters: {0}")]
    InvalidCurve(&'static str),

    #[error("private key must lie in [1, n-1]")]
    InvalidPrivateKey,

    #[error("point is not on the curve")]
    PointNotOnCurve,

    #[error("invalid encoding: {0}")]
    InvalidEncoding(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
