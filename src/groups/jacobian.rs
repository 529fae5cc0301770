//! Jacobian coordinates `(X, Y, Z)` for `(X / Z^2, Y / Z^3)`.
//!
//! Group operations avoid field inversions entirely; the single inversion
//! happens in [`JacobianPoint::to_affine`].

use {
    super::{EllipticCurve, EllipticCurvePoint, FieldElement},
    crate::{
        error::{Error, Result},
        mod_ring::{RingRefExt, UintExp, UintMont},
    },
    num_traits::Inv,
    std::{
        fmt::{self, Debug, Formatter},
        ops::{Add, AddAssign, Neg},
    },
};

#[derive(Clone, Copy)]
pub struct JacobianPoint<'a, U: UintMont> {
    curve: &'a EllipticCurve<U>,
    x:     FieldElement<'a, U>,
    y:     FieldElement<'a, U>,
    z:     FieldElement<'a, U>,
}

impl<'a, U: UintMont> JacobianPoint<'a, U> {
    /// The identity, `(1, 1, 0)`.
    pub fn identity(curve: &'a EllipticCurve<U>) -> Self {
        let field = curve.base_field();
        Self {
            curve,
            x: field.one(),
            y: field.one(),
            z: field.zero(),
        }
    }

    pub fn from_affine(point: EllipticCurvePoint<'a, U>) -> Self {
        let curve = point.curve();
        match point.coordinates() {
            None => Self::identity(curve),
            Some((x, y)) => Self {
                curve,
                x,
                y,
                z: curve.base_field().one(),
            },
        }
    }

    /// # Errors
    ///
    /// [`Error::PointNotOnCurve`] unless `Y^2 = X^3 + a X Z^4 + b Z^6` with
    /// all coordinates in the base field.
    pub fn from_coordinates(
        curve: &'a EllipticCurve<U>,
        x: FieldElement<'a, U>,
        y: FieldElement<'a, U>,
        z: FieldElement<'a, U>,
    ) -> Result<Self> {
        let field = curve.base_field();
        if [x, y, z].iter().any(|c| c.ring() != field) {
            return Err(Error::PointNotOnCurve);
        }
        let z2 = z.square();
        let z4 = z2.square();
        if y.square() != x.pow(3) + curve.a() * x * z4 + curve.b() * z4 * z2 {
            return Err(Error::PointNotOnCurve);
        }
        Ok(Self::new_unchecked(curve, x, y, z))
    }

    const fn new_unchecked(
        curve: &'a EllipticCurve<U>,
        x: FieldElement<'a, U>,
        y: FieldElement<'a, U>,
        z: FieldElement<'a, U>,
    ) -> Self {
        Self { curve, x, y, z }
    }

    pub const fn curve(&self) -> &'a EllipticCurve<U> {
        self.curve
    }

    pub const fn coordinates(
        &self,
    ) -> (FieldElement<'a, U>, FieldElement<'a, U>, FieldElement<'a, U>) {
        (self.x, self.y, self.z)
    }

    pub fn is_identity(&self) -> bool {
        self.z.is_zero()
    }

    /// Converts back using exactly one field inversion.
    pub fn to_affine(self) -> EllipticCurvePoint<'a, U> {
        let Some(z_inv) = self.z.inv() else {
            return self.curve.infinity();
        };
        let z_inv2 = z_inv.square();
        let x = self.x * z_inv2;
        let y = self.y * z_inv2 * z_inv;
        self.curve.from_affine_unchecked(x, y)
    }

    /// `dbl-2007-bl` style doubling for general `a`.
    #[must_use]
    pub fn double(self) -> Self {
        if self.is_identity() || self.y.is_zero() {
            return Self::identity(self.curve);
        }
        let field = self.curve.base_field();
        let yy = self.y.square();
        let s = field.from_u64(4) * self.x * yy;
        let m = field.from_u64(3) * self.x.square() + self.curve.a() * self.z.square().square();
        let x3 = m.square() - s - s;
        let y3 = m * (s - x3) - field.from_u64(8) * yy.square();
        let z3 = field.from_u64(2) * self.y * self.z;
        Self::new_unchecked(self.curve, x3, y3, z3)
    }

    /// Adds an affine point, the inner step of double-and-add.
    #[must_use]
    pub fn add_affine(self, other: EllipticCurvePoint<'a, U>) -> Self {
        self + Self::from_affine(other)
    }

    /// Binary double-and-add from the most significant bit.
    pub fn mul_uint<W: UintExp>(point: EllipticCurvePoint<'a, U>, scalar: W) -> Self {
        let mut result = Self::identity(point.curve());
        for i in (0..scalar.significant_bits()).rev() {
            result = result.double();
            if scalar.bit_vartime(i) {
                result = result.add_affine(point);
            }
        }
        result
    }
}

impl<U: UintMont> Add for JacobianPoint<'_, U> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        assert_eq!(self.curve, other.curve);
        if self.is_identity() {
            return other;
        }
        if other.is_identity() {
            return self;
        }
        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let u1 = self.x * z2z2;
        let u2 = other.x * z1z1;
        let s1 = self.y * z2z2 * other.z;
        let s2 = other.y * z1z1 * self.z;

        if u1 == u2 {
            // Same affine x: either the same point or its negation. A zero
            // `h` must never reach the general formula.
            return if s1 == s2 {
                self.double()
            } else {
                Self::identity(self.curve)
            };
        }

        let h = u2 - u1;
        let r = s2 - s1;
        let hh = h.square();
        let hhh = hh * h;
        let u1hh = u1 * hh;
        let x3 = r.square() - hhh - u1hh - u1hh;
        let y3 = r * (u1hh - x3) - s1 * hhh;
        let z3 = h * self.z * other.z;
        Self::new_unchecked(self.curve, x3, y3, z3)
    }
}

impl<U: UintMont> AddAssign for JacobianPoint<'_, U> {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl<U: UintMont> Neg for JacobianPoint<'_, U> {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            y: -self.y,
            ..self
        }
    }
}

/// Equality of the represented affine points, independent of scaling.
impl<U: UintMont> PartialEq for JacobianPoint<'_, U> {
    fn eq(&self, other: &Self) -> bool {
        assert_eq!(self.curve, other.curve);
        match (self.is_identity(), other.is_identity()) {
            (true, true) => true,
            (false, false) => {
                let z1z1 = self.z.square();
                let z2z2 = other.z.square();
                self.x * z2z2 == other.x * z1z1
                    && self.y * z2z2 * other.z == other.y * z1z1 * self.z
            }
            _ => false,
        }
    }
}

impl<U: UintMont> Eq for JacobianPoint<'_, U> {}

impl<U: UintMont> Debug for JacobianPoint<'_, U> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "({:?} : {:?} : {:?})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::{super::named::{secp256r1, toy_p17}, *},
        crate::mod_ring::ModRing,
        rand::Rng,
        ruint::aliases::U64,
    };

    #[test]
    fn test_round_trip() {
        let curve = toy_p17();
        for k in 1..19_u64 {
            let point = curve.generator().mul_uint(k);
            assert_eq!(point.to_jacobian().to_affine(), point);
        }
        assert!(curve.infinity().to_jacobian().is_identity());
        assert_eq!(curve.infinity().to_jacobian().to_affine(), curve.infinity());
    }

    #[test]
    fn test_scaled_representative() {
        let curve = toy_p17();
        let field = curve.base_field();
        let point = curve.generator().mul_uint(5_u64);
        let (x, y) = point.coordinates().unwrap();
        let lambda = field.from_u64(7);
        let scaled =
            JacobianPoint::from_coordinates(&curve, x * lambda.square(), y * lambda.pow(3), lambda)
                .unwrap();
        assert_eq!(scaled, point.to_jacobian());
        assert_eq!(scaled.to_affine(), point);
    }

    #[test]
    fn test_rejects_off_curve_coordinates() {
        let curve = toy_p17();
        let field = curve.base_field();
        let lambda = field.from_u64(3);
        // (5, 2) is not on the curve, in any representative.
        let (x, y) = (field.from_u64(5), field.from_u64(2));
        let (x3, y3) = (x * lambda.square(), y * lambda.pow(3));
        assert_eq!(
            JacobianPoint::from_coordinates(&curve, x3, y3, lambda),
            Err(Error::PointNotOnCurve)
        );
        let other = ModRing::from_modulus(U64::from(23));
        let foreign = (&other).one();
        assert_eq!(
            JacobianPoint::from_coordinates(&curve, x, y, foreign),
            Err(Error::PointNotOnCurve)
        );
    }

    #[test]
    fn test_group_law_matches_affine() {
        let curve = toy_p17();
        let g = curve.generator();
        for i in 0..19_u64 {
            for j in 0..19_u64 {
                let p = g.mul_uint(i);
                let q = g.mul_uint(j);
                let sum = p.to_jacobian() + q.to_jacobian();
                assert_eq!(sum.to_affine(), p + q, "{i} G + {j} G");
            }
            assert_eq!(g.mul_uint(i).to_jacobian().double().to_affine(), g.mul_uint(2 * i));
        }
    }

    #[test]
    fn test_coinciding_projections_route_to_doubling() {
        let curve = toy_p17();
        let field = curve.base_field();
        let point = curve.generator().mul_uint(3_u64);
        let (x, y) = point.coordinates().unwrap();
        let lambda = field.from_u64(5);
        let scaled =
            JacobianPoint::from_coordinates(&curve, x * lambda.square(), y * lambda.pow(3), lambda)
                .unwrap();
        let sum = point.to_jacobian() + scaled;
        assert_eq!(sum.to_affine(), point.double());
        assert!((point.to_jacobian() + (-scaled)).is_identity());
    }

    #[test]
    fn test_mul_matches_affine_p256() {
        let curve = secp256r1();
        let mut rng = rand::thread_rng();
        for _ in 0..4 {
            let k: u64 = rng.gen();
            let expected = curve.generator().mul_uint(k);
            assert_eq!(JacobianPoint::mul_uint(curve.generator(), k).to_affine(), expected);
        }
    }
}
