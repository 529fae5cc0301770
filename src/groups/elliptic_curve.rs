use {
    super::JacobianPoint,
    crate::{
        error::{Error, Result},
        mod_ring::{ModRing, ModRingElementRef, RingRefExt, UintExp, UintMont},
    },
    std::{
        fmt::{self, Debug, Formatter},
        ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
    },
    tracing::debug,
};

/// Short Weierstrass curve `y^2 = x^3 + a x + b` over a prime field, with a
/// generator of prime order `n`.
///
/// Immutable once constructed. Points and scalars borrow the curve, so a
/// single instance can be shared by any number of readers.
#[derive(Clone)]
pub struct EllipticCurve<U: UintMont> {
    base_field:      ModRing<U>,
    scalar_field:    ModRing<U>,
    a_monty:         U,
    b_monty:         U,
    generator_monty: (U, U),

    // `2^i G` for `i` in `0..bits(n)`, built once by repeated doubling.
    generator_table: Vec<Option<(U, U)>>,
}

pub type FieldElement<'a, U> = ModRingElementRef<'a, U>;
pub type Scalar<'a, U> = ModRingElementRef<'a, U>;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct EllipticCurvePoint<'a, U: UintMont> {
    curve:       &'a EllipticCurve<U>,
    coordinates: Coordinates<'a, U>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Coordinates<'a, U: UintMont> {
    Infinity,
    Affine(FieldElement<'a, U>, FieldElement<'a, U>),
}

impl<U: UintMont> EllipticCurve<U> {
    /// Validates the domain parameters and precomputes the generator table.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCurve`] if a coordinate or coefficient is outside the
    /// field, the curve is singular or anomalous, the generator is not on the
    /// curve, or the generator does not have order `order`.
    pub fn new(modulus: U, a: U, b: U, x: U, y: U, order: U) -> Result<Self> {
        let three = U::from_u64(3);
        if modulus <= three || !modulus.bit_vartime(0) {
            return Err(Error::InvalidCurve("modulus must be an odd prime"));
        }
        if order <= three || !order.bit_vartime(0) {
            return Err(Error::InvalidCurve("order must be an odd prime"));
        }
        if a >= modulus || b >= modulus {
            return Err(Error::InvalidCurve("coefficient not in field"));
        }
        if x >= modulus || y >= modulus {
            return Err(Error::InvalidCurve("generator not in field"));
        }
        let base_field = ModRing::from_modulus(modulus);
        let scalar_field = ModRing::from_modulus(order);
        let a = base_field.from(a);
        let b = base_field.from(b);
        let x = base_field.from(x);
        let y = base_field.from(y);
        // TODO: Check if modulus and order are prime.

        // Ensure non-singular
        let c4 = base_field.from_u64(4);
        let c27 = base_field.from_u64(27);
        if (c4 * a.pow(3) + c27 * b.pow(2)).is_zero() {
            return Err(Error::InvalidCurve("singular curve"));
        }

        // Ensure not anomalous
        if modulus == order {
            return Err(Error::InvalidCurve("anomalous curve"));
        }

        // Ensure generator is on curve
        if y.pow(2) != x.pow(3) + a * x + b {
            return Err(Error::InvalidCurve("generator not on curve"));
        }

        let mut curve = Self {
            base_field,
            scalar_field,
            a_monty: a.as_montgomery(),
            b_monty: b.as_montgomery(),
            generator_monty: (x.as_montgomery(), y.as_montgomery()),
            generator_table: Vec::new(),
        };

        // Ensure generator has order `order`
        if !curve.generator().mul_uint(order).is_infinity() {
            return Err(Error::InvalidCurve("generator order mismatch"));
        }

        let bits = curve.scalar_field.bits();
        let mut table = Vec::with_capacity(bits);
        let mut power = curve.generator();
        for _ in 0..bits {
            table.push(power.as_monty());
            power = power.double();
        }
        curve.generator_table = table;
        debug!(
            field_bits = curve.base_field.bits(),
            order_bits = bits,
            "constructed curve"
        );
        Ok(curve)
    }

    pub const fn base_field(&self) -> &ModRing<U> {
        &self.base_field
    }

    pub const fn scalar_field(&self) -> &ModRing<U> {
        &self.scalar_field
    }

    /// Order `n` of the generator.
    pub const fn order(&self) -> U {
        self.scalar_field.modulus()
    }

    pub fn a(&self) -> FieldElement<'_, U> {
        self.base_field.from_montgomery(self.a_monty)
    }

    pub fn b(&self) -> FieldElement<'_, U> {
        self.base_field.from_montgomery(self.b_monty)
    }

    pub fn generator(&self) -> EllipticCurvePoint<'_, U> {
        EllipticCurvePoint {
            curve:       self,
            coordinates: Coordinates::Affine(
                self.base_field.from_montgomery(self.generator_monty.0),
                self.base_field.from_montgomery(self.generator_monty.1),
            ),
        }
    }

    /// Point at infinity
    pub const fn infinity(&self) -> EllipticCurvePoint<'_, U> {
        EllipticCurvePoint {
            curve:       self,
            coordinates: Coordinates::Infinity,
        }
    }

    /// The precomputed doublings `2^i G`, lowest power first.
    pub fn generator_table(&self) -> impl ExactSizeIterator<Item = EllipticCurvePoint<'_, U>> {
        self.generator_table
            .iter()
            .map(|entry| self.from_monty_unchecked(*entry))
    }

    /// Checks the curve equation `y^2 = x^3 + ax + b`.
    pub fn contains<'a>(&'a self, x: FieldElement<'a, U>, y: FieldElement<'a, U>) -> bool {
        x.ring() == &self.base_field
            && y.ring() == &self.base_field
            && y.pow(2) == x.pow(3) + self.a() * x + self.b()
    }

    /// # Errors
    ///
    /// [`Error::PointNotOnCurve`] if `(x, y)` does not satisfy the curve
    /// equation.
    pub fn from_affine<'a>(
        &'a self,
        x: FieldElement<'a, U>,
        y: FieldElement<'a, U>,
    ) -> Result<EllipticCurvePoint<'a, U>> {
        if !self.contains(x, y) {
            return Err(Error::PointNotOnCurve);
        }
        Ok(EllipticCurvePoint {
            curve:       self,
            coordinates: Coordinates::Affine(x, y),
        })
    }

    /// Point from canonical integer coordinates.
    ///
    /// # Errors
    ///
    /// [`Error::PointNotOnCurve`] if a coordinate is not reduced or the point
    /// does not satisfy the curve equation.
    pub fn from_uints(&self, x: U, y: U) -> Result<EllipticCurvePoint<'_, U>> {
        let modulus = self.base_field.modulus();
        if x >= modulus || y >= modulus {
            return Err(Error::PointNotOnCurve);
        }
        self.from_affine(self.base_field.from(x), self.base_field.from(y))
    }

    /// Skips the curve equation check for coordinates produced by the group
    /// law.
    pub(super) const fn from_affine_unchecked<'a>(
        &'a self,
        x: FieldElement<'a, U>,
        y: FieldElement<'a, U>,
    ) -> EllipticCurvePoint<'a, U> {
        EllipticCurvePoint {
            curve:       self,
            coordinates: Coordinates::Affine(x, y),
        }
    }

    fn from_monty_unchecked(&self, coordinates: Option<(U, U)>) -> EllipticCurvePoint<'_, U> {
        match coordinates {
            Some((x, y)) => EllipticCurvePoint {
                curve:       self,
                coordinates: Coordinates::Affine(
                    self.base_field.from_montgomery(x),
                    self.base_field.from_montgomery(y),
                ),
            },
            None => self.infinity(),
        }
    }
}

impl<U: UintMont> PartialEq for EllipticCurve<U> {
    /// The generator table is derived data and does not take part.
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
            || (self.base_field == other.base_field
                && self.scalar_field == other.scalar_field
                && self.a_monty == other.a_monty
                && self.b_monty == other.b_monty
                && self.generator_monty == other.generator_monty)
    }
}

impl<U: UintMont> Eq for EllipticCurve<U> {}

impl<U: UintMont> Debug for EllipticCurve<U> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("EllipticCurve")
            .field("modulus", &self.base_field.modulus())
            .field("a", &self.a())
            .field("b", &self.b())
            .field("generator", &self.generator())
            .field("order", &self.order())
            .finish_non_exhaustive()
    }
}

impl<'a, U: UintMont> EllipticCurvePoint<'a, U> {
    pub const fn curve(&self) -> &'a EllipticCurve<U> {
        self.curve
    }

    pub const fn is_infinity(&self) -> bool {
        matches!(self.coordinates, Coordinates::Infinity)
    }

    pub const fn as_monty(&self) -> Option<(U, U)> {
        match self.coordinates {
            Coordinates::Infinity => None,
            Coordinates::Affine(x, y) => Some((x.as_montgomery(), y.as_montgomery())),
        }
    }

    pub const fn coordinates(&self) -> Option<(FieldElement<'a, U>, FieldElement<'a, U>)> {
        match self.coordinates {
            Coordinates::Infinity => None,
            Coordinates::Affine(x, y) => Some((x, y)),
        }
    }

    pub const fn x(&self) -> Option<FieldElement<'a, U>> {
        match self.coordinates {
            Coordinates::Infinity => None,
            Coordinates::Affine(x, _) => Some(x),
        }
    }

    pub const fn y(&self) -> Option<FieldElement<'a, U>> {
        match self.coordinates {
            Coordinates::Infinity => None,
            Coordinates::Affine(_, y) => Some(y),
        }
    }

    /// `x mod n`, the value the signature schemes use as `r`.
    pub fn x_scalar(&self) -> Option<Scalar<'a, U>> {
        self.x()
            .map(|x| self.curve.scalar_field().from_reduced(x.to_uint()))
    }

    /// Tangent rule. A point with `y = 0` has a vertical tangent and doubles
    /// to infinity.
    #[must_use]
    pub fn double(self) -> Self {
        let Coordinates::Affine(x1, y1) = self.coordinates else {
            return self;
        };
        let field = self.curve.base_field();
        let numerator = field.from_u64(3) * x1.square() + self.curve.a();
        let Ok(lambda) = numerator.checked_div(field.from_u64(2) * y1) else {
            return self.curve.infinity();
        };
        let x3 = lambda.square() - x1 - x1;
        let y3 = lambda * (x1 - x3) - y1;
        self.with_coordinates(x3, y3)
    }

    /// Binary double-and-add, scanning from the most significant bit.
    ///
    /// Accepts any non-negative integer, `0 · P` is infinity. Run time
    /// depends on the scalar.
    #[must_use]
    pub fn mul_uint<W: UintExp>(self, scalar: W) -> Self {
        let mut result = self.curve.infinity();
        for i in (0..scalar.significant_bits()).rev() {
            result = result.double();
            if scalar.bit_vartime(i) {
                result += self;
            }
        }
        result
    }

    pub fn to_jacobian(self) -> JacobianPoint<'a, U> {
        JacobianPoint::from_affine(self)
    }

    const fn with_coordinates(self, x: FieldElement<'a, U>, y: FieldElement<'a, U>) -> Self {
        Self {
            curve:       self.curve,
            coordinates: Coordinates::Affine(x, y),
        }
    }
}

macro_rules! forward_fmt {
    ($($trait:path),+) => {
        $(
            impl<'a, U: UintMont + $trait> $trait for EllipticCurvePoint<'a, U> {
                fn fmt(&self, f: &mut Formatter) -> fmt::Result {
                    match self.coordinates {
                        Coordinates::Infinity => write!(f, "Infinity"),
                        Coordinates::Affine(x, y) => {
                            write!(f, "(")?;
                            <FieldElement<'_, U> as $trait>::fmt(&x, f)?;
                            write!(f, ", ")?;
                            <FieldElement<'_, U> as $trait>::fmt(&y, f)?;
                            write!(f, ")")
                        }
                    }
                }
            }
        )+
    };
}

forward_fmt!(fmt::Debug, fmt::Display, fmt::LowerHex, fmt::UpperHex);

impl<U: UintMont> Add for EllipticCurvePoint<'_, U> {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        assert_eq!(self.curve, other.curve);
        match (self.coordinates, other.coordinates) {
            (Coordinates::Infinity, _) => other,
            (_, Coordinates::Infinity) => self,
            (Coordinates::Affine(x1, y1), Coordinates::Affine(x2, y2)) => {
                // https://hyperelliptic.org/EFD/g1p/auto-shortw.html
                if x1 == x2 && (y1 + y2).is_zero() {
                    // Vertical chord, P + (-P)
                    return self.curve.infinity();
                }
                if y1 == y2 && x1 == x2 {
                    return self.double();
                }
                let Ok(lambda) = (y2 - y1).checked_div(x2 - x1) else {
                    return self.curve.infinity();
                };
                let x3 = lambda.square() - x1 - x2;
                let y3 = lambda * (x1 - x3) - y1;
                self.with_coordinates(x3, y3)
            }
        }
    }
}

impl<U: UintMont> AddAssign for EllipticCurvePoint<'_, U> {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl<U: UintMont> Neg for EllipticCurvePoint<'_, U> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self.coordinates {
            Coordinates::Infinity => self,
            Coordinates::Affine(x, y) => self.with_coordinates(x, -y),
        }
    }
}

impl<U: UintMont> Sub for EllipticCurvePoint<'_, U> {
    type Output = Self;

    #[allow(clippy::suspicious_arithmetic_impl)]
    fn sub(self, other: Self) -> Self::Output {
        self + other.neg()
    }
}

impl<U: UintMont> SubAssign for EllipticCurvePoint<'_, U> {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl<'a, U: UintMont> Mul<Scalar<'a, U>> for EllipticCurvePoint<'a, U> {
    type Output = Self;

    fn mul(self, scalar: Scalar<'a, U>) -> Self::Output {
        assert_eq!(scalar.ring(), self.curve.scalar_field());
        self.mul_uint(scalar.to_uint())
    }
}

impl<'a, U: UintMont> MulAssign<Scalar<'a, U>> for EllipticCurvePoint<'a, U> {
    fn mul_assign(&mut self, scalar: Scalar<'a, U>) {
        *self = *self * scalar;
    }
}
