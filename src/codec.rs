//! Encoding rules for scalars, byte strings and composite values.

use crate::{BinaryStream, ByteBuffer, ReadStream, Result, StreamError, StreamView};
use alloc::boxed::Box;
use alloc::string::String;

/// Width, in bytes, of the length and count prefixes.
pub const COUNT_PREFIX_LEN: usize = 4;

/// Types that can be written to a [`BinaryStream`].
///
/// Implement this, together with [`Decode`], to make a type of your own part of the wire format.
/// A struct is usually encoded as its fields, one after the other:
///
/// ```
/// use octet_stream::{BinaryStream, Decode, Encode, ReadStream, Result};
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Encode for Point {
///     fn encode(&self, stream: &mut BinaryStream) -> Result<()> {
///         stream.push(&self.x)?.push(&self.y)?;
///         Ok(())
///     }
/// }
///
/// impl Decode for Point {
///     fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Result<Self> {
///         Ok(Point { x: stream.pop()?, y: stream.pop()? })
///     }
/// }
///
/// let mut s = BinaryStream::new();
/// s.push(&Point { x: 1, y: -1 })?;
/// assert_eq!(s.data(), [1, 0, 0, 0, 0xff, 0xff, 0xff, 0xff]);
/// # Ok::<(), octet_stream::StreamError>(())
/// ```
pub trait Encode {
    /// Appends the encoded form of `self` to `stream`.
    fn encode(&self, stream: &mut BinaryStream) -> Result<()>;
}

/// Types that can be read back from a stream.
pub trait Decode: Sized {
    /// Decodes one value from the read cursor.
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Result<Self>;

    /// Decodes one value into an existing one.
    ///
    /// The default replaces `self`. Byte strings, text and streams append the decoded bytes
    /// instead, and containers add the decoded elements. `self` is left unchanged if decoding
    /// fails.
    fn decode_into<S: ReadStream + ?Sized>(&mut self, stream: &mut S) -> Result<()> {
        *self = Self::decode(stream)?;
        Ok(())
    }
}

/// Writes a `u32` length or count prefix.
pub(crate) fn encode_len(len: usize, stream: &mut BinaryStream) -> Result<()> {
    let len = u32::try_from(len).map_err(|_| StreamError::CannotEncode)?;
    stream.push_integer(len);
    Ok(())
}

/// Writes `bytes` in length-prefixed form.
fn encode_bytes(bytes: &[u8], stream: &mut BinaryStream) -> Result<()> {
    encode_len(bytes.len(), stream)?;
    stream.write_bytes(bytes);
    Ok(())
}

/// Reads a length-prefixed byte string. This does not copy.
///
/// Nothing is consumed unless the whole string is present.
fn decode_bytes<S: ReadStream + ?Sized>(stream: &mut S) -> Result<&[u8]> {
    let len = stream.peek_integer::<u32>()? as usize;
    if stream.size() - COUNT_PREFIX_LEN < len {
        return Err(StreamError::NeedsMoreData);
    }
    stream.ignore(COUNT_PREFIX_LEN);
    stream.read_bytes(len)
}

macro_rules! integer_codec {
    ($($t:ty),*) => {
        $(
            impl Encode for $t {
                #[inline(always)]
                fn encode(&self, stream: &mut BinaryStream) -> Result<()> {
                    stream.push_integer(*self);
                    Ok(())
                }
            }

            impl Decode for $t {
                #[inline(always)]
                fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Result<Self> {
                    stream.pop_integer()
                }
            }
        )*
    };
}

integer_codec!(u8, i8, u16, i16, u32, i32, u64, i64, u128, i128);

/// True is encoded as 1, false as 0. Any non-zero byte decodes as true.
impl Encode for bool {
    fn encode(&self, stream: &mut BinaryStream) -> Result<()> {
        stream.push_integer(*self as u8);
        Ok(())
    }
}

impl Decode for bool {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Result<Self> {
        Ok(stream.pop_integer::<u8>()? != 0)
    }
}

/// Floats are written as their IEEE 754 bits in little-endian byte order.
impl Encode for f32 {
    fn encode(&self, stream: &mut BinaryStream) -> Result<()> {
        stream.push_integer(self.to_bits());
        Ok(())
    }
}

impl Decode for f32 {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Result<Self> {
        Ok(f32::from_bits(stream.pop_integer()?))
    }
}

impl Encode for f64 {
    fn encode(&self, stream: &mut BinaryStream) -> Result<()> {
        stream.push_integer(self.to_bits());
        Ok(())
    }
}

impl Decode for f64 {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Result<Self> {
        Ok(f64::from_bits(stream.pop_integer()?))
    }
}

impl Encode for str {
    fn encode(&self, stream: &mut BinaryStream) -> Result<()> {
        encode_bytes(self.as_bytes(), stream)
    }
}

impl Encode for String {
    fn encode(&self, stream: &mut BinaryStream) -> Result<()> {
        encode_bytes(self.as_bytes(), stream)
    }
}

/// The bytes must be well-formed UTF-8, or decoding fails with [`StreamError::Invalid`].
impl Decode for String {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Result<Self> {
        let bytes = decode_bytes(stream)?;
        core::str::from_utf8(bytes)
            .map(String::from)
            .map_err(|_| StreamError::Invalid)
    }

    fn decode_into<S: ReadStream + ?Sized>(&mut self, stream: &mut S) -> Result<()> {
        let bytes = decode_bytes(stream)?;
        let text = core::str::from_utf8(bytes).map_err(|_| StreamError::Invalid)?;
        self.push_str(text);
        Ok(())
    }
}

impl Encode for ByteBuffer {
    fn encode(&self, stream: &mut BinaryStream) -> Result<()> {
        encode_bytes(self.as_slice(), stream)
    }
}

/// A zero length decodes as an unallocated buffer.
impl Decode for ByteBuffer {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Result<Self> {
        let bytes = decode_bytes(stream)?;
        if bytes.is_empty() {
            Ok(ByteBuffer::new())
        } else {
            Ok(ByteBuffer::from_slice(bytes))
        }
    }

    fn decode_into<S: ReadStream + ?Sized>(&mut self, stream: &mut S) -> Result<()> {
        let bytes = decode_bytes(stream)?;
        self.append(bytes);
        Ok(())
    }
}

/// A nested stream is encoded as its unread bytes.
impl Encode for BinaryStream {
    fn encode(&self, stream: &mut BinaryStream) -> Result<()> {
        encode_bytes(self.data(), stream)
    }
}

impl Decode for BinaryStream {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Result<Self> {
        Ok(BinaryStream::from_slice(decode_bytes(stream)?))
    }

    fn decode_into<S: ReadStream + ?Sized>(&mut self, stream: &mut S) -> Result<()> {
        let bytes = decode_bytes(stream)?;
        self.write_bytes(bytes);
        Ok(())
    }
}

impl Encode for StreamView<'_> {
    fn encode(&self, stream: &mut BinaryStream) -> Result<()> {
        encode_bytes(self.data(), stream)
    }
}

#[cfg(feature = "bstr")]
impl Encode for bstr::BStr {
    fn encode(&self, stream: &mut BinaryStream) -> Result<()> {
        encode_bytes(self, stream)
    }
}

#[cfg(feature = "bstr")]
impl Encode for bstr::BString {
    fn encode(&self, stream: &mut BinaryStream) -> Result<()> {
        encode_bytes(self, stream)
    }
}

/// Unlike `String`, no UTF-8 validation is done.
#[cfg(feature = "bstr")]
impl Decode for bstr::BString {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Result<Self> {
        Ok(bstr::BString::from(decode_bytes(stream)?))
    }

    fn decode_into<S: ReadStream + ?Sized>(&mut self, stream: &mut S) -> Result<()> {
        let bytes = decode_bytes(stream)?;
        self.extend_from_slice(bytes);
        Ok(())
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, stream: &mut BinaryStream) -> Result<()> {
        (**self).encode(stream)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, stream: &mut BinaryStream) -> Result<()> {
        (**self).encode(stream)
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Result<Self> {
        T::decode(stream).map(Box::new)
    }
}

/// Tuples are encoded as their components back to back, with no separator.
impl<A: Encode, B: Encode> Encode for (A, B) {
    fn encode(&self, stream: &mut BinaryStream) -> Result<()> {
        self.0.encode(stream)?;
        self.1.encode(stream)
    }
}

impl<A: Decode, B: Decode> Decode for (A, B) {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Result<Self> {
        let a = A::decode(stream)?;
        let b = B::decode(stream)?;
        Ok((a, b))
    }
}

impl<A: Encode, B: Encode, C: Encode> Encode for (A, B, C) {
    fn encode(&self, stream: &mut BinaryStream) -> Result<()> {
        self.0.encode(stream)?;
        self.1.encode(stream)?;
        self.2.encode(stream)
    }
}

impl<A: Decode, B: Decode, C: Decode> Decode for (A, B, C) {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Result<Self> {
        let a = A::decode(stream)?;
        let b = B::decode(stream)?;
        let c = C::decode(stream)?;
        Ok((a, b, c))
    }
}
