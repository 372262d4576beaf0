use crate::byteorder::{host_to_le, Integer};
use crate::{ByteBuffer, Encode, ReadStream, Result, StreamView};
use alloc::vec::Vec;
use log::trace;

/// Granularity, in bytes, of every capacity change a [`BinaryStream`] makes.
pub const PAGE_SIZE: usize = 256;

fn round_to_page(n: usize) -> usize {
    n.div_ceil(PAGE_SIZE) * PAGE_SIZE
}

/// An owned, growable byte stream with independent read and write cursors.
///
/// Bytes are appended at the write cursor and consumed from the read cursor; the unread bytes
/// in between are the logical contents of the stream. Consumed bytes stay in storage until the
/// stream is cleared or compacted by [`BinaryStream::insert`], so they can be re-read with
/// [`ReadStream::unget`].
///
/// Storage grows in multiples of [`PAGE_SIZE`], and bytes past the write cursor are always zero.
///
/// All read operations come from [`ReadStream`]. Values are written with
/// [`BinaryStream::push`], which uses the [`Encode`] rules.
#[derive(Clone, Default)]
pub struct BinaryStream {
    /// `buf.len()` is the capacity.
    buf: Vec<u8>,
    read_pos: usize,
    write_pos: usize,
}

impl BinaryStream {
    /// Creates an empty stream. Nothing is allocated until the first write.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty stream with room for at least `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut stream = Self::new();
        stream.reserve(capacity);
        stream
    }

    /// Creates a stream holding a copy of `data`, ready to be read from the start.
    pub fn from_slice(data: &[u8]) -> Self {
        let mut stream = Self::with_capacity(data.len());
        stream.buf[..data.len()].copy_from_slice(data);
        stream.write_pos = data.len();
        stream
    }

    /// Total bytes of storage, consumed and unwritten bytes included.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes that can be written before the stream has to grow.
    pub fn write_capacity(&self) -> usize {
        self.buf.len() - self.write_pos
    }

    /// Makes sure the storage holds at least `capacity` bytes.
    ///
    /// Growth is rounded up to a multiple of [`PAGE_SIZE`] and the new bytes are zero.
    pub fn reserve(&mut self, capacity: usize) {
        if self.buf.len() >= capacity {
            return;
        }
        let new_capacity = round_to_page(capacity);
        trace!(
            "growing stream storage from {} to {} bytes",
            self.buf.len(),
            new_capacity
        );
        self.buf.resize(new_capacity, 0);
        self.buf[self.write_pos..].fill(0);
    }

    /// Releases storage past the write cursor.
    pub fn shrink(&mut self) {
        if self.buf.len() > self.write_pos {
            trace!(
                "shrinking stream storage from {} to {} bytes",
                self.buf.len(),
                self.write_pos
            );
            self.buf.truncate(self.write_pos);
            self.buf.shrink_to_fit();
        }
    }

    /// Discards all content and zeroes the storage. Capacity is kept.
    pub fn clear(&mut self) {
        self.read_pos = 0;
        self.write_pos = 0;
        self.buf.fill(0);
    }

    /// Exchanges the storage and cursors of two streams without copying.
    pub fn swap(&mut self, other: &mut BinaryStream) {
        core::mem::swap(self, other);
    }

    /// Appends `bytes` at the write cursor, growing the storage if needed.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        let end = self.write_pos + bytes.len();
        if self.buf.len() < end {
            self.reserve(end.max(self.buf.len() + PAGE_SIZE));
        }
        self.buf[self.write_pos..end].copy_from_slice(bytes);
        self.write_pos = end;
        self
    }

    /// Inserts `bytes` so that they start at offset `pos` of the unread data.
    ///
    /// Inserting at the front reuses consumed bytes before the read cursor when there are enough
    /// of them. Otherwise the unread data is moved to the start of storage to make room, which
    /// discards the consumed bytes. Inserting at `pos == self.size()` is the same as
    /// [`BinaryStream::write_bytes`].
    ///
    /// # Panics
    ///
    /// Panics if `pos > self.size()`.
    pub fn insert(&mut self, pos: usize, bytes: &[u8]) -> &mut Self {
        let size = self.size();
        assert!(
            pos <= size,
            "insert position {pos} is past the end of the stream ({size} bytes)"
        );
        if pos == size {
            return self.write_bytes(bytes);
        }

        let n = bytes.len();
        if pos == 0 && self.read_pos >= n {
            self.read_pos -= n;
            self.buf[self.read_pos..self.read_pos + n].copy_from_slice(bytes);
            return self;
        }

        self.reserve(size + n);
        let start = self.read_pos;
        let old_end = self.write_pos;
        self.buf.copy_within(start..start + pos, 0);
        self.buf.copy_within(start + pos..old_end, pos + n);
        self.buf[pos..pos + n].copy_from_slice(bytes);
        self.read_pos = 0;
        self.write_pos = size + n;
        if old_end > self.write_pos {
            self.buf[self.write_pos..old_end].fill(0);
        }
        self
    }

    /// Inserts a little-endian integer at offset `pos` of the unread data.
    ///
    /// This is mostly useful for back-patching a length or count in front of data that has
    /// already been written.
    pub fn insert_integer<T: Integer>(&mut self, pos: usize, value: T) -> &mut Self {
        self.insert(pos, host_to_le(value).as_bytes())
    }

    /// Writes an integer in little-endian byte order.
    #[inline(always)]
    pub fn push_integer<T: Integer>(&mut self, value: T) -> &mut Self {
        self.write_bytes(host_to_le(value).as_bytes())
    }

    /// Encodes `value` at the write cursor.
    ///
    /// Returns `self` so that calls can be chained with `?`.
    pub fn push<T: Encode + ?Sized>(&mut self, value: &T) -> Result<&mut Self> {
        value.encode(self)?;
        Ok(self)
    }

    /// Borrows the unread bytes as a [`StreamView`].
    pub fn view(&self) -> StreamView<'_> {
        StreamView::new(self.data())
    }

    /// Extracts the unread bytes.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.buf.copy_within(self.read_pos..self.write_pos, 0);
        self.buf.truncate(self.write_pos - self.read_pos);
        self.buf
    }
}

impl ReadStream for BinaryStream {
    fn filled(&self) -> &[u8] {
        &self.buf[..self.write_pos]
    }

    fn read_pos(&self) -> usize {
        self.read_pos
    }

    fn set_read_pos(&mut self, pos: usize) {
        self.read_pos = pos.min(self.write_pos);
    }
}

impl From<&[u8]> for BinaryStream {
    fn from(data: &[u8]) -> Self {
        Self::from_slice(data)
    }
}

impl From<&ByteBuffer> for BinaryStream {
    fn from(buffer: &ByteBuffer) -> Self {
        Self::from_slice(buffer.as_slice())
    }
}

impl From<&BinaryStream> for ByteBuffer {
    fn from(stream: &BinaryStream) -> Self {
        stream.to_byte_buffer()
    }
}

impl core::fmt::Debug for BinaryStream {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BinaryStream")
            .field("read_pos", &self.read_pos)
            .field("write_pos", &self.write_pos)
            .field("capacity", &self.buf.len())
            .finish()
    }
}

#[cfg(feature = "std")]
impl std::io::Write for BinaryStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.write_bytes(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(feature = "std")]
impl std::io::Read for BinaryStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        Ok(self.read_available(buf))
    }
}
