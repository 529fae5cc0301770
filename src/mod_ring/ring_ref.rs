use {
    super::{ModRing, ModRingElement, UintMont},
    rand::Rng,
    std::ops::Deref,
};

/// Handle to the parameters of a [`ModRing`].
///
/// Every field element and scalar carries one, which is how a point or a
/// signature knows which curve it belongs to.
pub trait RingRef: Copy + Deref<Target = ModRing<Self::Uint>> {
    type Uint: UintMont;
}

impl<Uint: UintMont> RingRef for &ModRing<Uint> {
    type Uint = Uint;
}

/// Element constructors, available on any [`RingRef`].
#[allow(clippy::wrong_self_convention)]
pub trait RingRefExt: RingRef {
    fn from_montgomery(self, value: Self::Uint) -> ModRingElement<Self>;
    fn zero(self) -> ModRingElement<Self>;
    fn one(self) -> ModRingElement<Self>;
    fn from_u64(self, value: u64) -> ModRingElement<Self>;

    /// # Panics
    ///
    /// If `value` is not reduced.
    fn from<T: Into<Self::Uint>>(self, value: T) -> ModRingElement<Self>;

    /// `None` unless `value` is reduced.
    fn checked_from(self, value: Self::Uint) -> Option<ModRingElement<Self>>;

    fn from_reduced(self, value: Self::Uint) -> ModRingElement<Self>;

    /// Big-endian byte string, e.g. a digest, taken mod the modulus.
    fn from_be_bytes_reduced(self, bytes: &[u8]) -> ModRingElement<Self>;

    /// Uniform in `[0, modulus)`.
    fn random<R: Rng + ?Sized>(self, rng: &mut R) -> ModRingElement<Self>;

    /// Uniform in `[1, modulus)`. Keys and ephemerals are drawn this way.
    fn random_nonzero<R: Rng + ?Sized>(self, rng: &mut R) -> ModRingElement<Self>;
}

impl<Ring: RingRef> RingRefExt for Ring {
    #[inline(always)]
    fn from_montgomery(self, value: Ring::Uint) -> ModRingElement<Self> {
        debug_assert!(self.contains(value));
        ModRingElement::from_montgomery(self, value)
    }

    #[inline(always)]
    fn zero(self) -> ModRingElement<Self> {
        self.from_montgomery(Ring::Uint::from_u64(0))
    }

    #[inline(always)]
    fn one(self) -> ModRingElement<Self> {
        self.from_montgomery(self.montgomery_r())
    }

    #[inline(always)]
    fn from_u64(self, value: u64) -> ModRingElement<Self> {
        self.from_reduced(Ring::Uint::from_u64(value))
    }

    fn from<T: Into<Self::Uint>>(self, value: T) -> ModRingElement<Self> {
        let value = value.into();
        assert!(self.contains(value), "value not reduced");
        self.from_montgomery(self.mont_mul(value, self.montgomery_r2()))
    }

    fn checked_from(self, value: Self::Uint) -> Option<ModRingElement<Self>> {
        self.contains(value).then(|| self.from(value))
    }

    fn from_reduced(self, value: Self::Uint) -> ModRingElement<Self> {
        self.from(value.reduce(self.modulus()))
    }

    fn from_be_bytes_reduced(self, bytes: &[u8]) -> ModRingElement<Self> {
        self.from(Ring::Uint::from_be_bytes_mod(bytes, self.modulus()))
    }

    fn random<R: Rng + ?Sized>(self, rng: &mut R) -> ModRingElement<Self> {
        self.from_montgomery(Ring::Uint::random(rng, self.modulus()))
    }

    fn random_nonzero<R: Rng + ?Sized>(self, rng: &mut R) -> ModRingElement<Self> {
        loop {
            let value = self.random(rng);
            if !value.is_zero() {
                return value;
            }
        }
    }
}
