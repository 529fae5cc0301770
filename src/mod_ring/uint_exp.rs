use {
    ruint::Uint,
    subtle::{Choice, ConstantTimeEq},
};

/// Trait for Uint backends that can be used for exponentiation and scalar
/// multiplication.
pub trait UintExp {
    /// Returns an upper bound for the highest bit set.
    /// Ideally this should not depend on the value.
    fn bit_len(&self) -> usize;

    /// Number of significant bits, i.e. the index of the highest set bit plus
    /// one. Zero for zero.
    fn significant_bits(&self) -> usize;

    /// Is the `index`th bit set in the binary expansion of `self`.
    fn bit_ct(&self, index: usize) -> Choice;

    /// Variable time version of [`UintExp::bit_ct`].
    fn bit_vartime(&self, index: usize) -> bool {
        self.bit_ct(index).into()
    }
}

impl<const BITS: usize, const LIMBS: usize> UintExp for Uint<BITS, LIMBS> {
    fn bit_len(&self) -> usize {
        BITS
    }

    fn significant_bits(&self) -> usize {
        Self::bit_len(self)
    }

    fn bit_ct(&self, index: usize) -> Choice {
        Choice::from(u8::from(self.bit(index)))
    }
}

macro_rules! impl_uint_exp {
    ($($t:ty),+) => {
        $(
            impl UintExp for $t {
                fn bit_len(&self) -> usize {
                    <$t>::BITS as usize
                }

                fn significant_bits(&self) -> usize {
                    (<$t>::BITS - self.leading_zeros()) as usize
                }

                fn bit_ct(&self, index: usize) -> Choice {
                    let bit: $t = 1 << index;
                    (*self & bit).ct_eq(&bit)
                }
            }
        )+
    };
}

impl_uint_exp!(u32, u64, u128);

#[cfg(test)]
mod tests {
    use {super::*, ruint::aliases::U256};

    #[test]
    fn test_bits() {
        assert_eq!(0_u64.significant_bits(), 0);
        assert_eq!(19_u64.significant_bits(), 5);
        assert!(19_u64.bit_vartime(4));
        assert!(!19_u64.bit_vartime(3));
        let big = U256::from(19_u64) << 200_usize;
        assert_eq!(big.significant_bits(), 205);
        assert_eq!(UintExp::bit_len(&big), 256);
        assert!(big.bit_vartime(204));
    }
}
