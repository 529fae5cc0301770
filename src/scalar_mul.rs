//! Interchangeable scalar multiplication strategies.
//!
//! Every strategy computes the same `k · P` for any non-negative `k`; they
//! differ only in cost.

use {
    crate::{
        groups::{EllipticCurve, EllipticCurvePoint, JacobianPoint, Scalar},
        mod_ring::{UintExp, UintMont},
    },
    std::{fmt, str::FromStr},
    tracing::trace,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Strategy {
    /// Affine double-and-add from the most significant bit. One field
    /// inversion per group operation.
    #[default]
    DoubleAndAdd,

    /// Sum of precomputed `2^i G` for the set bits of `k`. Only applies to the
    /// curve generator, other points fall back to [`Strategy::DoubleAndAdd`].
    FixedBase,

    /// Double-and-add in Jacobian coordinates with a single inversion at the
    /// end.
    Jacobian,
}

impl Strategy {
    pub const ALL: [Self; 3] = [Self::DoubleAndAdd, Self::FixedBase, Self::Jacobian];

    pub fn mul<'a, U, W>(self, point: EllipticCurvePoint<'a, U>, k: W) -> EllipticCurvePoint<'a, U>
    where
        U: UintMont,
        W: UintExp + Into<U>,
    {
        match self {
            Self::DoubleAndAdd => point.mul_uint(k),
            Self::FixedBase => fixed_base_mul(point, k.into()),
            Self::Jacobian => JacobianPoint::mul_uint(point, k).to_affine(),
        }
    }

    /// Multiplication by a scalar field element.
    pub fn mul_scalar<'a, U: UintMont>(
        self,
        point: EllipticCurvePoint<'a, U>,
        k: Scalar<'a, U>,
    ) -> EllipticCurvePoint<'a, U> {
        assert_eq!(k.ring(), point.curve().scalar_field());
        self.mul(point, k.to_uint())
    }

    /// `k · G` for the curve generator.
    pub fn mul_generator<'a, U: UintMont>(
        self,
        curve: &'a EllipticCurve<U>,
        k: Scalar<'a, U>,
    ) -> EllipticCurvePoint<'a, U> {
        self.mul_scalar(curve.generator(), k)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DoubleAndAdd => "double-and-add",
            Self::FixedBase => "fixed-base",
            Self::Jacobian => "jacobian",
        }
    }
}

/// `scalar_mul(curve, strategy, k, P)`.
pub fn scalar_mul<'a, U: UintMont>(
    curve: &'a EllipticCurve<U>,
    strategy: Strategy,
    k: U,
    point: EllipticCurvePoint<'a, U>,
) -> EllipticCurvePoint<'a, U> {
    assert_eq!(curve, point.curve());
    strategy.mul(point, k)
}

fn fixed_base_mul<U: UintMont>(
    point: EllipticCurvePoint<'_, U>,
    k: U,
) -> EllipticCurvePoint<'_, U> {
    let curve = point.curve();
    if point != curve.generator() {
        trace!("fixed-base multiplication on non-generator, using double-and-add");
        return point.mul_uint(k);
    }
    // G has order n, so only k mod n matters and the table covers every bit.
    let k = k.reduce(curve.order());
    curve
        .generator_table()
        .enumerate()
        .filter(|(i, _)| k.bit_vartime(*i))
        .fold(curve.infinity(), |acc, (_, entry)| acc + entry)
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "double-and-add" | "naive" | "affine" => Ok(Self::DoubleAndAdd),
            "fixed-base" | "precomputed" => Ok(Self::FixedBase),
            "jacobian" | "projective" => Ok(Self::Jacobian),
            _ => Err(format!(
                "unknown strategy {s:?}, expected double-and-add, fixed-base or jacobian"
            )),
        }
    }
}
