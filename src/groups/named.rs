//! Named domain parameters.
//!
//! Parameters are plain configuration values; each constructor validates
//! them through [`EllipticCurve::new`].

use {
    super::EllipticCurve,
    crate::{error::Error, mod_ring::UintMont},
    ruint::{
        aliases::{U256, U64},
        uint,
    },
    std::{fmt, str::FromStr},
};

/// Short Weierstrass domain parameters `(p, a, b, G, n)`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CurveParameters<U> {
    pub modulus:   U,
    pub param_a:   U,
    pub param_b:   U,
    pub generator: (U, U),
    pub order:     U,
}

/// Textbook curve `y^2 = x^3 + 2x + 2` over `F_17` with a generator of
/// order 19. Small enough to enumerate every point in tests.
pub const TOY_P17: CurveParameters<U64> = uint!(CurveParameters {
    modulus:   17_U64,
    param_a:   2_U64,
    param_b:   2_U64,
    generator: (5_U64, 1_U64),
    order:     19_U64,
});

/// NIST P-256, secp256r1
pub const SECP256R1: CurveParameters<U256> = uint!(CurveParameters {
    modulus:   0xffffffff_00000001_00000000_00000000_00000000_ffffffff_ffffffff_ffffffff_U256,
    param_a:   0xffffffff_00000001_00000000_00000000_00000000_ffffffff_ffffffff_fffffffc_U256,
    param_b:   0x5ac635d8_aa3a93e7_b3ebbd55_769886bc_651d06b0_cc53b0f6_3bce3c3e_27d2604b_U256,
    generator: (
        0x6b17d1f2_e12c4247_f8bce6e5_63a440f2_77037d81_2deb33a0_f4a13945_d898c296_U256,
        0x4fe342e2_fe1a7f9b_8ee7eb4a_7c0f9e16_2bce3357_6b315ece_cbb64068_37bf51f5_U256,
    ),
    order:     0xffffffff_00000000_ffffffff_ffffffff_bce6faad_a7179e84_f3b9cac2_fc632551_U256,
});

/// SEC 2 secp256k1
pub const SECP256K1: CurveParameters<U256> = uint!(CurveParameters {
    modulus:   0xffffffff_ffffffff_ffffffff_ffffffff_ffffffff_ffffffff_fffffffe_fffffc2f_U256,
    param_a:   0_U256,
    param_b:   7_U256,
    generator: (
        0x79be667e_f9dcbbac_55a06295_ce870b07_029bfcdb_2dce28d9_59f2815b_16f81798_U256,
        0x483ada77_26a3c465_5da4fbfc_0e1108a8_fd17b448_a6855419_9c47d08f_fb10d4b8_U256,
    ),
    order:     0xffffffff_ffffffff_ffffffff_fffffffe_baaedce6_af48a03b_bfd25e8c_d0364141_U256,
});

/// GB/T 32918.5 recommended curve, sm2p256v1
pub const SM2P256V1: CurveParameters<U256> = uint!(CurveParameters {
    modulus:   0xfffffffe_ffffffff_ffffffff_ffffffff_ffffffff_00000000_ffffffff_ffffffff_U256,
    param_a:   0xfffffffe_ffffffff_ffffffff_ffffffff_ffffffff_00000000_ffffffff_fffffffc_U256,
    param_b:   0x28e9fa9e_9d9f5e34_4d5a9e4b_cf6509a7_f39789f5_15ab8f92_ddbcbd41_4d940e93_U256,
    generator: (
        0x32c4ae2c_1f198119_5f990446_6a39c994_8fe30bbf_f2660be1_715a4589_334c74c7_U256,
        0xbc3736a2_f4f6779c_59bdcee3_6b692153_d0a9877c_c62a4740_02df32e5_2139f0a0_U256,
    ),
    order:     0xfffffffe_ffffffff_ffffffff_ffffffff_7203df6b_21c6052b_53bbf409_39d54123_U256,
});

impl<U: UintMont> TryFrom<CurveParameters<U>> for EllipticCurve<U> {
    type Error = Error;

    fn try_from(value: CurveParameters<U>) -> Result<Self, Self::Error> {
        Self::new(
            value.modulus,
            value.param_a,
            value.param_b,
            value.generator.0,
            value.generator.1,
            value.order,
        )
    }
}

pub fn toy_p17() -> EllipticCurve<U64> {
    EllipticCurve::try_from(TOY_P17).unwrap()
}

pub fn secp256r1() -> EllipticCurve<U256> {
    EllipticCurve::try_from(SECP256R1).unwrap()
}

pub fn secp256k1() -> EllipticCurve<U256> {
    EllipticCurve::try_from(SECP256K1).unwrap()
}

pub fn sm2p256v1() -> EllipticCurve<U256> {
    EllipticCurve::try_from(SM2P256V1).unwrap()
}

/// Curve selector for configuration and command line use.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CurveName {
    ToyP17,
    Secp256r1,
    Secp256k1,
    Sm2p256v1,
}

impl CurveName {
    pub const ALL: [Self; 4] = [Self::ToyP17, Self::Secp256r1, Self::Secp256k1, Self::Sm2p256v1];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToyP17 => "toy-p17",
            Self::Secp256r1 => "secp256r1",
            Self::Secp256k1 => "secp256k1",
            Self::Sm2p256v1 => "sm2p256v1",
        }
    }
}

impl fmt::Display for CurveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurveName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "toy" | "toy-p17" => Ok(Self::ToyP17),
            "p256" | "p-256" | "secp256r1" | "prime256v1" => Ok(Self::Secp256r1),
            "k256" | "secp256k1" => Ok(Self::Secp256k1),
            "sm2" | "sm2p256v1" => Ok(Self::Sm2p256v1),
            _ => Err(format!(
                "unknown curve {s:?}, expected one of toy-p17, secp256r1, secp256k1, sm2p256v1"
            )),
        }
    }
}
