use {
    super::{uint_exp::UintExp, ModRing, RingRef, RingRefExt, UintMont},
    crate::error::{Error, Result},
    num_traits::Inv,
    std::{
        fmt::{self, Formatter},
        ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign},
    },
    subtle::{Choice, ConditionallySelectable, ConstantTimeEq},
};

/// Element of a [`ModRing`].
#[derive(Clone, Copy)]
pub struct ModRingElement<Ring: RingRef> {
    ring:  Ring,
    value: Ring::Uint,
}

/// ModRingElement with the ring parameters by embedded reference.
pub type ModRingElementRef<'a, Uint> = ModRingElement<&'a ModRing<Uint>>;

impl<Ring: RingRef> ModRingElement<Ring> {
    #[inline]
    #[must_use]
    pub const fn from_montgomery(ring: Ring, value: Ring::Uint) -> Self {
        Self { ring, value }
    }

    #[inline]
    #[must_use]
    pub fn ring(&self) -> &ModRing<Ring::Uint> {
        &self.ring
    }

    #[inline]
    #[must_use]
    pub const fn as_montgomery(self) -> Ring::Uint {
        self.value
    }

    // Note: We can not implement `From<Ring::Uint>` for `ModRingElement<Ring>`
    // because this conflicts with `impl T From<T> for T` and we can't tell
    // the compiler that `Ring` and `Ring::Uint` are not the same type.
    #[inline]
    #[must_use]
    pub fn to_uint(self) -> Ring::Uint {
        self.ring.mont_mul(self.value, Ring::Uint::from_u64(1))
    }

    /// Zero is the same in Montgomery and canonical form.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    #[inline]
    #[must_use]
    pub fn square(mut self) -> Self {
        self.value = self.ring.mont_square(self.value);
        self
    }

    /// Small exponentiation
    ///
    /// Run time may depend on the exponent, use [`Self::pow_ct`] if constant
    /// time or large exponents are required.
    #[inline]
    #[must_use]
    pub fn pow(self, exponent: usize) -> Self {
        match exponent {
            0 => self.ring.one(),
            1 => self,
            n if n % 2 == 0 => self.pow(n / 2).square(),
            n => self * self.pow(n / 2).square(),
        }
    }

    /// Multiplicative inverse by the extended Euclidean algorithm.
    ///
    /// # Errors
    ///
    /// [`Error::NotInvertible`] if the element shares a factor with the
    /// modulus, which for a prime modulus means it is zero.
    pub fn inverse(self) -> Result<Self> {
        self.inv().ok_or(Error::NotInvertible)
    }

    /// Multiplicative inverse by Fermat's little theorem, `a^(p-2)`.
    ///
    /// Only meaningful when the modulus is prime, in which case it agrees
    /// with [`Self::inverse`].
    ///
    /// # Errors
    ///
    /// [`Error::NotInvertible`] for zero.
    pub fn inverse_fermat(self) -> Result<Self> {
        if self.is_zero() {
            return Err(Error::NotInvertible);
        }
        let modulus = self.ring.modulus();
        let exponent = modulus.sub_mod(Ring::Uint::from_u64(2), modulus);
        Ok(self.pow_ct(exponent))
    }

    /// Division that reports a zero divisor as an error.
    ///
    /// # Errors
    ///
    /// [`Error::NotInvertible`] if `other` is not invertible.
    pub fn checked_div(self, other: Self) -> Result<Self> {
        (self / other).ok_or(Error::NotInvertible)
    }

    /// Constant-time exponentation with arbitrary unsigned int exponent.
    #[must_use]
    pub fn pow_ct<U: UintExp>(self, exponent: U) -> Self {
        let mut result = self.ring.one();
        let mut power = self;
        // We use `bit_len` here as an optimization when B >> log_2 exponent.
        // However, this does result in leaking the number of leading zeros.
        for i in 0..exponent.bit_len() {
            let product = result * power;
            result.conditional_assign(&product, exponent.bit_ct(i));
            power *= power;
        }
        result
    }
}

macro_rules! forward_fmt {
    ($($trait:path),+) => {
        $(
            impl<Ring: RingRef> $trait for ModRingElement<Ring> where Ring::Uint: $trait {
                fn fmt(&self, f: &mut Formatter) -> fmt::Result {
                    let uint = self.to_uint();
                    <Ring::Uint as $trait>::fmt(&uint, f)
                }
            }
        )+
    };
}

forward_fmt!(fmt::Debug, fmt::Display, fmt::LowerHex, fmt::UpperHex);

impl<Ring: RingRef> PartialEq for ModRingElement<Ring> {
    fn eq(&self, other: &Self) -> bool {
        assert_eq!(*self.ring, *other.ring);
        self.value.ct_eq(&other.value).into()
    }
}

impl<Ring: RingRef> Eq for ModRingElement<Ring> {}

impl<Ring: RingRef> Add for ModRingElement<Ring> {
    type Output = Self;

    #[inline(always)]
    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl<Ring: RingRef> Sub for ModRingElement<Ring> {
    type Output = Self;

    #[inline(always)]
    fn sub(mut self, other: Self) -> Self {
        self -= other;
        self
    }
}

impl<Ring: RingRef> Mul for ModRingElement<Ring> {
    type Output = Self;

    #[inline(always)]
    fn mul(mut self, other: Self) -> Self {
        self *= other;
        self
    }
}

impl<Ring: RingRef> Neg for ModRingElement<Ring> {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        self.ring.zero() - self
    }
}

impl<Ring: RingRef> Inv for ModRingElement<Ring> {
    type Output = Option<Self>;

    fn inv(self) -> Self::Output {
        let value = self.value.inv_mod(self.ring.modulus())?;
        let value = self.ring.mont_mul(value, self.ring.montgomery_r3());
        Some(self.ring.from_montgomery(value))
    }
}

impl<Ring: RingRef> Div for ModRingElement<Ring> {
    type Output = Option<Self>;

    /// Division
    ///
    /// Run time may depend on the value of the divisor.
    #[inline(always)]
    fn div(self, other: Self) -> Option<Self> {
        assert_eq!(self.ring(), other.ring());
        other.inv().map(|inv| self * inv)
    }
}

impl<Ring: RingRef> AddAssign for ModRingElement<Ring> {
    #[inline(always)]
    fn add_assign(&mut self, other: Self) {
        assert_eq!(self.ring(), other.ring());
        self.value = self.value.add_mod(other.value, self.ring.modulus());
    }
}

impl<Ring: RingRef> SubAssign for ModRingElement<Ring> {
    #[inline(always)]
    fn sub_assign(&mut self, other: Self) {
        assert_eq!(self.ring(), other.ring());
        self.value = self.value.sub_mod(other.value, self.ring.modulus());
    }
}

impl<Ring: RingRef> MulAssign for ModRingElement<Ring> {
    #[inline(always)]
    fn mul_assign(&mut self, other: Self) {
        assert_eq!(self.ring(), other.ring());
        self.value = self.ring.mont_mul(self.value, other.value);
    }
}

impl<Ring: RingRef> ConditionallySelectable for ModRingElement<Ring>
where
    Ring::Uint: ConditionallySelectable,
{
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        assert_eq!(a.ring(), b.ring());
        let value = Ring::Uint::conditional_select(&a.value, &b.value, choice);
        a.ring.from_montgomery(value)
    }
}

impl<Ring: RingRef> ConstantTimeEq for ModRingElement<Ring>
where
    Ring::Uint: ConstantTimeEq,
{
    fn ct_eq(&self, other: &Self) -> Choice {
        assert_eq!(self.ring(), other.ring());
        self.value.ct_eq(&other.value)
    }
}
