//! Byte encodings of scalars, points and signatures.

mod big_endian;

pub use self::big_endian::BigEndianCodec;
use {
    crate::error::{Error, Result},
    bytes::{Buf, BufMut, BytesMut},
};

pub trait Codec<T> {
    type Parent;

    fn encoded_size(&self, value: T) -> usize {
        let mut buffer = BytesMut::new();
        self.encode(&mut buffer, value);
        buffer.len()
    }

    fn encode<B: BufMut>(&self, buffer: &mut B, value: T);

    fn decode<B: Buf>(&self, buffer: &mut B, parent: Self::Parent) -> Result<T>;

    fn to_vec(&self, value: T) -> Vec<u8> {
        let mut buffer = Vec::new();
        self.encode(&mut buffer, value);
        buffer
    }

    /// Decodes a complete byte string, rejecting trailing bytes.
    fn from_slice(&self, mut data: &[u8], parent: Self::Parent) -> Result<T> {
        let value = self.decode(&mut data, parent)?;
        if data.has_remaining() {
            return Err(Error::InvalidEncoding("trailing bytes"));
        }
        Ok(value)
    }
}
