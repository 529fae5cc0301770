//! Fixed-width big-endian encodings.
//!
//! * scalars and field elements: `⌈bits(modulus) / 8⌉` bytes,
//! * points: `0x00` for infinity, otherwise `0x04 ‖ x ‖ y`,
//! * ECDSA and SM2-like signatures: `r ‖ s`,
//! * Schnorr signatures: `R ‖ s ‖ e`.
use {
    super::Codec,
    crate::{
        error::{Error, Result},
        groups::{EllipticCurve, EllipticCurvePoint},
        mod_ring::{ModRing, ModRingElement, RingRef, RingRefExt, UintMont},
        signature::{EcdsaSignature, SchnorrSignature, Scheme, Signature, Sm2Signature},
    },
    bytes::{Buf, BufMut},
};

#[derive(Clone, Copy, Debug, Default)]
pub struct BigEndianCodec;

const TAG_INFINITY: u8 = 0x00;
const TAG_UNCOMPRESSED: u8 = 0x04;

fn put_uint<U: UintMont, B: BufMut>(buffer: &mut B, value: U, size: usize) {
    let bytes = value
        .to_be_bytes_sized(size)
        .expect("Invalid byte length for uint");
    buffer.put_slice(&bytes);
}

fn get_uint<U: UintMont, B: Buf>(buffer: &mut B, size: usize) -> Result<U> {
    if buffer.remaining() < size {
        return Err(Error::InvalidEncoding("insufficient bytes remaining"));
    }
    let bytes = buffer.copy_to_bytes(size);
    U::try_from_be_bytes(&bytes).ok_or(Error::InvalidEncoding("value too large for target uint"))
}

/// Reads `r ‖ s` without range checks.
fn get_pair<U: UintMont, B: Buf>(buffer: &mut B, field: &ModRing<U>) -> Result<(U, U)> {
    let r = get_uint(buffer, field.byte_len())?;
    let s = get_uint(buffer, field.byte_len())?;
    Ok((r, s))
}

impl<R: RingRef> Codec<ModRingElement<R>> for BigEndianCodec {
    type Parent = R;

    fn encode<B: BufMut>(&self, buffer: &mut B, value: ModRingElement<R>) {
        put_uint(buffer, value.to_uint(), value.ring().byte_len());
    }

    /// Rejects values that are not reduced.
    fn decode<B: Buf>(&self, buffer: &mut B, ring: Self::Parent) -> Result<ModRingElement<R>> {
        let value = get_uint(buffer, ring.byte_len())?;
        ring.checked_from(value).ok_or(Error::InvalidEncoding("element not reduced"))
    }
}

impl<'a, U: UintMont> Codec<EllipticCurvePoint<'a, U>> for BigEndianCodec {
    type Parent = &'a EllipticCurve<U>;

    fn encode<B: BufMut>(&self, buffer: &mut B, value: EllipticCurvePoint<'a, U>) {
        match value.coordinates() {
            None => buffer.put_u8(TAG_INFINITY),
            Some((x, y)) => {
                buffer.put_u8(TAG_UNCOMPRESSED);
                self.encode(buffer, x);
                self.encode(buffer, y);
            }
        }
    }

    fn decode<B: Buf>(
        &self,
        buffer: &mut B,
        curve: Self::Parent,
    ) -> Result<EllipticCurvePoint<'a, U>> {
        if !buffer.has_remaining() {
            return Err(Error::InvalidEncoding("empty point"));
        }
        match buffer.get_u8() {
            TAG_INFINITY => Ok(curve.infinity()),
            TAG_UNCOMPRESSED => {
                let size = curve.base_field().byte_len();
                let x = get_uint(buffer, size)?;
                let y = get_uint(buffer, size)?;
                curve.from_uints(x, y)
            }
            _ => Err(Error::InvalidEncoding("unsupported point tag")),
        }
    }
}

impl<'a, U: UintMont> Codec<EcdsaSignature<'a, U>> for BigEndianCodec {
    type Parent = &'a EllipticCurve<U>;

    fn encode<B: BufMut>(&self, buffer: &mut B, value: EcdsaSignature<'a, U>) {
        self.encode(buffer, value.r);
        self.encode(buffer, value.s);
    }

    fn decode<B: Buf>(&self, buffer: &mut B, curve: Self::Parent) -> Result<EcdsaSignature<'a, U>> {
        let (r, s) = get_pair(buffer, curve.scalar_field())?;
        EcdsaSignature::from_uints(curve, r, s)
    }
}

impl<'a, U: UintMont> Codec<Sm2Signature<'a, U>> for BigEndianCodec {
    type Parent = &'a EllipticCurve<U>;

    fn encode<B: BufMut>(&self, buffer: &mut B, value: Sm2Signature<'a, U>) {
        self.encode(buffer, value.r);
        self.encode(buffer, value.s);
    }

    fn decode<B: Buf>(&self, buffer: &mut B, curve: Self::Parent) -> Result<Sm2Signature<'a, U>> {
        let (r, s) = get_pair(buffer, curve.scalar_field())?;
        Sm2Signature::from_uints(curve, r, s)
    }
}

impl<'a, U: UintMont> Codec<SchnorrSignature<'a, U>> for BigEndianCodec {
    type Parent = &'a EllipticCurve<U>;

    fn encode<B: BufMut>(&self, buffer: &mut B, value: SchnorrSignature<'a, U>) {
        self.encode(buffer, value.commitment);
        self.encode(buffer, value.s);
        self.encode(buffer, value.e);
    }

    fn decode<B: Buf>(
        &self,
        buffer: &mut B,
        curve: Self::Parent,
    ) -> Result<SchnorrSignature<'a, U>> {
        let commitment: EllipticCurvePoint<'a, U> = self.decode(buffer, curve)?;
        let field = curve.scalar_field();
        let (s, e) = get_pair(buffer, field)?;
        match (field.checked_from(s), field.checked_from(e)) {
            (Some(s), Some(e)) => Ok(SchnorrSignature { commitment, s, e }),
            _ => Err(Error::InvalidSignatureFormat),
        }
    }
}

impl<'a, U: UintMont> Codec<Signature<'a, U>> for BigEndianCodec {
    type Parent = (&'a EllipticCurve<U>, Scheme);

    fn encode<B: BufMut>(&self, buffer: &mut B, value: Signature<'a, U>) {
        match value {
            Signature::Ecdsa(signature) => self.encode(buffer, signature),
            Signature::Schnorr(signature) => self.encode(buffer, signature),
            Signature::Sm2(signature) => self.encode(buffer, signature),
        }
    }

    fn decode<B: Buf>(
        &self,
        buffer: &mut B,
        (curve, scheme): Self::Parent,
    ) -> Result<Signature<'a, U>> {
        Ok(match scheme {
            Scheme::Ecdsa => Signature::Ecdsa(self.decode(buffer, curve)?),
            Scheme::Schnorr => Signature::Schnorr(self.decode(buffer, curve)?),
            Scheme::Sm2 => Signature::Sm2(self.decode(buffer, curve)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            groups::{
                named::{secp256k1, secp256r1, toy_p17},
                Scalar,
            },
            signature::Signer,
        },
        hex_literal::hex,
        ruint::aliases::{U256, U64},
    };

    fn decode_point<'a>(
        curve: &'a EllipticCurve<U64>,
        data: &[u8],
    ) -> Result<EllipticCurvePoint<'a, U64>> {
        BigEndianCodec.from_slice(data, curve)
    }

    fn decode_signature<'a>(
        curve: &'a EllipticCurve<U64>,
        scheme: Scheme,
        data: &[u8],
    ) -> Result<Signature<'a, U64>> {
        BigEndianCodec.from_slice(data, (curve, scheme))
    }

    #[test]
    fn test_toy_widths() {
        let curve = toy_p17();
        let codec = BigEndianCodec;
        let g = curve.generator();
        assert_eq!(codec.to_vec(g), vec![0x04, 5, 1]);
        assert_eq!(codec.to_vec(curve.infinity()), vec![0x00]);
        assert_eq!(codec.encoded_size(curve.scalar_field().from_u64(18)), 1);
        assert_eq!(decode_point(&curve, &[0x04, 5, 1]), Ok(g));
        assert_eq!(decode_point(&curve, &[0x00]), Ok(curve.infinity()));
    }

    #[test]
    fn test_p256_generator() {
        let curve = secp256r1();
        let encoded = BigEndianCodec.to_vec(curve.generator());
        assert_eq!(
            encoded,
            hex!(
                "04"
                "6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296"
                "4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5"
            )
        );
    }

    #[test]
    fn test_rejects_malformed_points() {
        let curve = toy_p17();
        let decode = |data: &[u8]| decode_point(&curve, data);
        assert_eq!(decode(&[]), Err(Error::InvalidEncoding("empty point")));
        assert_eq!(decode(&[0x02, 5]), Err(Error::InvalidEncoding("unsupported point tag")));
        assert_eq!(
            decode(&[0x04, 5]),
            Err(Error::InvalidEncoding("insufficient bytes remaining"))
        );
        assert_eq!(decode(&[0x04, 5, 2]), Err(Error::PointNotOnCurve));
        assert_eq!(decode(&[0x04, 22, 1]), Err(Error::PointNotOnCurve));
        assert_eq!(decode(&[0x00, 0x00]), Err(Error::InvalidEncoding("trailing bytes")));
    }

    #[test]
    fn test_signature_ranges() {
        let curve = toy_p17();
        let field = curve.scalar_field();
        assert_eq!(
            decode_signature(&curve, Scheme::Ecdsa, &[9, 10]),
            Ok(Signature::Ecdsa(EcdsaSignature {
                r: field.from_u64(9),
                s: field.from_u64(10),
            }))
        );
        for data in [[0, 10], [9, 19]] {
            assert_eq!(
                decode_signature(&curve, Scheme::Ecdsa, &data),
                Err(Error::InvalidSignatureFormat)
            );
            assert_eq!(
                decode_signature(&curve, Scheme::Sm2, &data),
                Err(Error::InvalidSignatureFormat)
            );
        }
        // R = 5 G, e = n
        assert_eq!(
            decode_signature(&curve, Scheme::Schnorr, &[0x04, 9, 16, 1, 19]),
            Err(Error::InvalidSignatureFormat)
        );
        assert!(decode_signature(&curve, Scheme::Schnorr, &[0x04, 9, 16, 1, 13]).is_ok());
    }

    #[test]
    fn test_element_not_reduced() {
        let curve = secp256k1();
        let decoded: Result<Scalar<'_, U256>> =
            BigEndianCodec.from_slice(&[0xff_u8; 32], curve.scalar_field());
        assert_eq!(decoded, Err(Error::InvalidEncoding("element not reduced")));
    }

    #[test]
    fn test_signature_roundtrip() {
        let curve = secp256r1();
        let field = curve.scalar_field();
        let mut rng = rand::thread_rng();
        let signer = Signer::new(&curve);
        let d = field.random_nonzero(&mut rng);
        for scheme in Scheme::ALL {
            let k = field.random_nonzero(&mut rng);
            let signature = signer.sign(scheme, d, b"encode me", k).unwrap();
            let bytes = BigEndianCodec.to_vec(signature);
            let expected = match scheme {
                Scheme::Ecdsa | Scheme::Sm2 => 64,
                Scheme::Schnorr => 65 + 32 + 32,
            };
            assert_eq!(bytes.len(), expected);
            let decoded: Result<Signature<'_, U256>> =
                BigEndianCodec.from_slice(&bytes, (&curve, scheme));
            assert_eq!(decoded, Ok(signature));
        }
    }
}
