use crate::buffer::spaced_hex;
use crate::byteorder::{le_to_host, Integer};
use crate::{BinaryStream, ByteBuffer, Decode, Result, StreamError};
use alloc::string::String;
use core::mem::size_of;

/// Read-side operations shared by [`BinaryStream`] and [`StreamView`].
///
/// An implementation exposes the bytes written so far and a read cursor into them. Everything
/// else (block reads, integer reads, decoding) is provided on top of those three methods.
///
/// No method here ever moves the read cursor past the written bytes, and no failing method moves
/// the read cursor at all.
pub trait ReadStream {
    /// All bytes from the start of storage up to the write cursor, including consumed bytes.
    fn filled(&self) -> &[u8];

    /// The read cursor, as an offset into [`ReadStream::filled`].
    fn read_pos(&self) -> usize;

    /// Moves the read cursor. Positions past the end of [`ReadStream::filled`] are clamped to it.
    fn set_read_pos(&mut self, pos: usize);

    /// Number of unread bytes.
    fn size(&self) -> usize {
        self.filled().len() - self.read_pos()
    }

    /// Returns `true` if every written byte has been read.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// The unread bytes.
    fn data(&self) -> &[u8] {
        &self.filled()[self.read_pos()..]
    }

    /// Copies the next `out.len()` bytes into `out` without consuming them.
    #[inline(always)]
    fn peek_bytes(&self, out: &mut [u8]) -> Result<()> {
        match self.data().get(..out.len()) {
            Some(bytes) => {
                out.copy_from_slice(bytes);
                Ok(())
            }
            None => Err(StreamError::NeedsMoreData),
        }
    }

    /// Copies the next `out.len()` bytes into `out` and consumes them.
    #[inline(always)]
    fn pop_bytes(&mut self, out: &mut [u8]) -> Result<()> {
        self.peek_bytes(out)?;
        self.set_read_pos(self.read_pos() + out.len());
        Ok(())
    }

    /// Consumes the next `len` bytes and returns a slice reference to them. This does not copy.
    #[inline(always)]
    fn read_bytes(&mut self, len: usize) -> Result<&[u8]> {
        let start = self.read_pos();
        if self.size() < len {
            return Err(StreamError::NeedsMoreData);
        }
        self.set_read_pos(start + len);
        Ok(&self.filled()[start..start + len])
    }

    /// Reads up to `out.len()` bytes, returning how many were copied.
    fn read_available(&mut self, out: &mut [u8]) -> usize {
        let n = out.len().min(self.size());
        out[..n].copy_from_slice(&self.data()[..n]);
        self.set_read_pos(self.read_pos() + n);
        n
    }

    /// Skips `n` bytes, or every remaining byte if fewer than `n` are left.
    fn ignore(&mut self, n: usize) -> &mut Self {
        self.set_read_pos(self.read_pos().saturating_add(n));
        self
    }

    /// Steps the read cursor back by `n` bytes so they can be read again.
    ///
    /// The cursor stops at the start of the storage; it never goes further back than that.
    fn unget(&mut self, n: usize) -> &mut Self {
        self.set_read_pos(self.read_pos().saturating_sub(n));
        self
    }

    /// Decodes the next little-endian integer without consuming it.
    #[inline(always)]
    fn peek_integer<T: Integer>(&self) -> Result<T> {
        let bytes = self
            .data()
            .get(..size_of::<T>())
            .ok_or(StreamError::NeedsMoreData)?;
        T::read_from_bytes(bytes)
            .map(le_to_host)
            .map_err(|_| StreamError::Invalid)
    }

    /// Decodes and consumes the next little-endian integer.
    #[inline(always)]
    fn pop_integer<T: Integer>(&mut self) -> Result<T> {
        let value = self.peek_integer::<T>()?;
        self.set_read_pos(self.read_pos() + size_of::<T>());
        Ok(value)
    }

    /// Decodes the next value.
    ///
    /// If decoding fails part way through, the read cursor is put back where it was before the
    /// call.
    fn pop<T: Decode>(&mut self) -> Result<T> {
        let mark = self.read_pos();
        match T::decode(self) {
            Ok(value) => Ok(value),
            Err(e) => {
                self.set_read_pos(mark);
                Err(e)
            }
        }
    }

    /// Decodes the next value into `target`, with the same cursor guarantee as
    /// [`ReadStream::pop`].
    ///
    /// Byte strings, text and streams are appended to; containers are extended. Other types are
    /// overwritten.
    fn pop_into<T: Decode>(&mut self, target: &mut T) -> Result<()> {
        let mark = self.read_pos();
        let result = target.decode_into(self);
        if result.is_err() {
            self.set_read_pos(mark);
        }
        result
    }

    /// Formats the unread bytes as upper-case hex pairs separated by spaces.
    fn hex(&self) -> String {
        spaced_hex(self.data())
    }

    /// Formats the unread bytes as a multi-line hex dump.
    fn hex_dump(&self) -> String {
        pretty_hex::pretty_hex(&self.data())
    }

    /// Copies the unread bytes into a new [`ByteBuffer`].
    fn to_byte_buffer(&self) -> ByteBuffer {
        ByteBuffer::from_slice(self.data())
    }
}

/// A read-only stream over memory owned by someone else.
///
/// Creating a view does not copy. The borrow of the underlying slice keeps that memory alive for
/// as long as the view exists. A view has no write operations at all: if you need to modify
/// the data, copy it into a [`BinaryStream`] with [`StreamView::to_stream`].
#[derive(Clone)]
pub struct StreamView<'a> {
    data: &'a [u8],
    read_pos: usize,
}

impl<'a> StreamView<'a> {
    /// Creates a view over `data`, positioned at its first byte.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, read_pos: 0 }
    }

    /// Creates a view over the contents of `buffer`.
    pub fn from_buffer(buffer: &'a ByteBuffer) -> Self {
        Self::new(buffer.as_slice())
    }

    /// Points the view at different memory and rewinds it.
    pub fn attach(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = data;
        self.read_pos = 0;
        self
    }

    /// Consumes the next `len` bytes and returns them.
    ///
    /// Unlike [`ReadStream::read_bytes`], the returned slice borrows from the underlying memory
    /// rather than from the view, so it stays usable after the view is gone.
    #[inline(always)]
    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let data: &'a [u8] = self.data;
        match data[self.read_pos..].get(..len) {
            Some(bytes) => {
                self.read_pos += len;
                Ok(bytes)
            }
            None => Err(StreamError::NeedsMoreData),
        }
    }

    /// Copies the viewed memory into an owned stream with the same read position.
    pub fn to_stream(&self) -> BinaryStream {
        let mut stream = BinaryStream::from_slice(self.data);
        stream.set_read_pos(self.read_pos);
        stream
    }
}

impl ReadStream for StreamView<'_> {
    fn filled(&self) -> &[u8] {
        self.data
    }

    fn read_pos(&self) -> usize {
        self.read_pos
    }

    fn set_read_pos(&mut self, pos: usize) {
        self.read_pos = pos.min(self.data.len());
    }
}

impl<'a> From<&'a [u8]> for StreamView<'a> {
    fn from(data: &'a [u8]) -> Self {
        Self::new(data)
    }
}

impl<'a> From<&'a ByteBuffer> for StreamView<'a> {
    fn from(buffer: &'a ByteBuffer) -> Self {
        Self::from_buffer(buffer)
    }
}

impl core::fmt::Debug for StreamView<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StreamView")
            .field("read_pos", &self.read_pos)
            .field("len", &self.data.len())
            .finish()
    }
}

#[cfg(feature = "std")]
impl std::io::Read for StreamView<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        Ok(self.read_available(buf))
    }
}
