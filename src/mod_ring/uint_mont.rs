use {
    super::{ModRing, UintExp},
    rand::Rng,
    ruint::Uint,
    std::fmt::Debug,
    subtle::{ConditionallySelectable, ConstantTimeEq},
};

/// Trait for Uint backends supporting Montgomery multiplication.
///
/// The only implemented backed is Ruint, but the code is cleaner
/// if we abstract this, otherwise we would have to pass along the
/// const-generic parameters everywhere.
pub trait UintMont:
    Sized
    + Copy
    + PartialEq
    + Eq
    + PartialOrd
    + Debug
    + ConstantTimeEq
    + ConditionallySelectable
    + UintExp
{
    fn parameters_from_modulus(modulus: Self) -> ModRing<Self>;
    fn from_u64(value: u64) -> Self;
    fn random<R: Rng + ?Sized>(rng: &mut R, max: Self) -> Self;
    fn add_mod(self, other: Self, modulus: Self) -> Self;
    fn sub_mod(self, other: Self, modulus: Self) -> Self;
    fn mul_redc(self, other: Self, modulus: Self, mod_inv: u64) -> Self;
    fn square_redc(self, modulus: Self, mod_inv: u64) -> Self;
    fn inv_mod(self, modulus: Self) -> Option<Self>;

    /// Reduce an arbitrary value into `[0, modulus)`.
    fn reduce(self, modulus: Self) -> Self;

    /// Interpret big-endian bytes of any length as an integer reduced modulo
    /// `modulus`.
    fn from_be_bytes_mod(bytes: &[u8], modulus: Self) -> Self;

    /// Big-endian bytes, left padded or trimmed to exactly `size` bytes.
    /// Returns `None` if the value does not fit.
    fn to_be_bytes_sized(self, size: usize) -> Option<Vec<u8>>;

    /// Parse big-endian bytes, `None` if the value does not fit.
    fn try_from_be_bytes(bytes: &[u8]) -> Option<Self>;

    fn is_zero(&self) -> bool {
        *self == Self::from_u64(0)
    }
}

impl<const BITS: usize, const LIMBS: usize> UintMont for Uint<BITS, LIMBS> {
    fn parameters_from_modulus(modulus: Self) -> ModRing<Self> {
        assert!(modulus.bit(0), "Modulus not an odd positive integer.");

        // -1 / modulus mod 2^64 by Newton iteration, each step doubles the
        // number of correct low bits.
        let low = modulus.as_limbs()[0];
        let mut inv = 1_u64;
        for _ in 0..6 {
            inv = inv.wrapping_mul(2_u64.wrapping_sub(low.wrapping_mul(inv)));
        }
        let mod_inv = inv.wrapping_neg();

        // montgomery_r2 = 2^(128 * LIMBS) mod modulus.
        let mut montgomery_r2 = Self::ZERO;
        montgomery_r2.set_bit(32 * LIMBS, true);
        montgomery_r2 = montgomery_r2.mul_mod(montgomery_r2, modulus);
        montgomery_r2 = montgomery_r2.mul_mod(montgomery_r2, modulus);
        ModRing::from_parameters(modulus, montgomery_r2, mod_inv)
    }

    #[inline]
    fn from_u64(value: u64) -> Self {
        Self::from(value)
    }

    /// Uniform in `[0, max)` by rejection sampling.
    fn random<R: Rng + ?Sized>(rng: &mut R, max: Self) -> Self {
        let leading_zeros = max.leading_zeros();
        loop {
            let mut value = rng.gen::<Self>();
            value >>= leading_zeros;
            if value < max {
                return value;
            }
        }
    }

    #[inline]
    fn add_mod(self, other: Self, modulus: Self) -> Self {
        let (sum, carry) = self.overflowing_add(other);
        let (reduced, borrow) = sum.overflowing_sub(modulus);
        if carry | !borrow {
            reduced
        } else {
            sum
        }
    }

    #[inline]
    fn sub_mod(self, other: Self, modulus: Self) -> Self {
        let (result, borrow) = self.overflowing_sub(other);
        if borrow {
            result.wrapping_add(modulus)
        } else {
            result
        }
    }

    #[inline]
    fn mul_redc(self, other: Self, modulus: Self, mod_inv: u64) -> Self {
        Self::mul_redc(self, other, modulus, mod_inv)
    }

    #[inline]
    fn square_redc(self, modulus: Self, mod_inv: u64) -> Self {
        Self::mul_redc(self, self, modulus, mod_inv)
    }

    #[inline]
    fn inv_mod(self, modulus: Self) -> Option<Self> {
        Self::inv_mod(self, modulus)
    }

    #[inline]
    fn reduce(self, modulus: Self) -> Self {
        self.reduce_mod(modulus)
    }

    fn from_be_bytes_mod(bytes: &[u8], modulus: Self) -> Self {
        let radix = Self::from(256_u64).reduce_mod(modulus);
        bytes.iter().fold(Self::ZERO, |acc, &byte| {
            acc.mul_mod(radix, modulus)
                .add_mod(Self::from(u64::from(byte)), modulus)
        })
    }

    fn to_be_bytes_sized(self, size: usize) -> Option<Vec<u8>> {
        if self.byte_len() > size {
            return None;
        }
        let bytes = self.to_be_bytes_vec();
        let trim = bytes.len().saturating_sub(size);
        let mut result = vec![0; size.saturating_sub(bytes.len())];
        result.extend_from_slice(&bytes[trim..]);
        Some(result)
    }

    fn try_from_be_bytes(bytes: &[u8]) -> Option<Self> {
        Self::try_from_be_slice(bytes)
    }
}
