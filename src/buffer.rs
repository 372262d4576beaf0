use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;
use core::hash::{Hash, Hasher};
use core::ops::{Add, AddAssign};
use log::debug;

/// The allocation behind one or more [`ByteBuffer`] handles.
///
/// `storage.len()` is the capacity. Bytes in `storage[size..]` are always zero.
struct SharedRep {
    storage: Vec<u8>,
    size: usize,
}

impl SharedRep {
    /// Allocates a rep holding `data`, with as much slack again for later appends.
    fn new(data: &[u8]) -> Self {
        let mut storage = vec![0u8; data.len() * 2];
        storage[..data.len()].copy_from_slice(data);
        Self {
            storage,
            size: data.len(),
        }
    }

    fn bytes(&self) -> &[u8] {
        &self.storage[..self.size]
    }

    fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Grows the storage so it can hold at least `size` bytes.
    fn reserve(&mut self, size: usize) {
        if self.capacity() >= size {
            return;
        }
        self.storage.resize(size * 2, 0);
    }

    fn overwrite(&mut self, data: &[u8]) {
        self.reserve(data.len());
        self.storage[..data.len()].copy_from_slice(data);
        if data.len() < self.size {
            self.storage[data.len()..self.size].fill(0);
        }
        self.size = data.len();
    }

    fn append(&mut self, data: &[u8]) {
        let end = self.size + data.len();
        if self.capacity() < end {
            self.reserve(end);
        }
        self.storage[self.size..end].copy_from_slice(data);
        self.size = end;
    }

    fn scrub(&mut self) {
        self.storage[..self.size].fill(0);
        self.size = 0;
    }
}

/// A byte string with copy-on-write sharing.
///
/// Cloning a `ByteBuffer` is cheap: the clone shares the original's allocation and only bumps an
/// atomic reference count. The first mutation made through a shared handle copies the bytes into
/// a private allocation, so no other handle ever observes the change.
///
/// A buffer may also be *unallocated*, which is what [`ByteBuffer::new`] returns. An unallocated
/// buffer is empty, but it is distinct from a buffer that owns a zero-length allocation; see
/// [`ByteBuffer::is_allocated`].
///
/// Buffers compare lexicographically by content. When one buffer is a prefix of the other, the
/// shorter one orders first.
#[derive(Clone, Default)]
pub struct ByteBuffer {
    rep: Option<Arc<SharedRep>>,
}

impl ByteBuffer {
    /// Creates an unallocated, empty buffer.
    pub const fn new() -> Self {
        Self { rep: None }
    }

    /// Creates a buffer holding a copy of `data`.
    ///
    /// The allocation reserves twice the length of `data`. An empty slice still produces an
    /// allocated, zero-length buffer.
    pub fn from_slice(data: &[u8]) -> Self {
        Self {
            rep: Some(Arc::new(SharedRep::new(data))),
        }
    }

    /// Creates a buffer holding the UTF-8 bytes of `text`.
    ///
    /// Unlike [`ByteBuffer::from_slice`], empty text produces an unallocated buffer.
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            Self::new()
        } else {
            Self::from_slice(text.as_bytes())
        }
    }

    /// The contents of the buffer.
    pub fn as_slice(&self) -> &[u8] {
        match &self.rep {
            Some(rep) => rep.bytes(),
            None => &[],
        }
    }

    /// Number of bytes in the buffer.
    pub fn len(&self) -> usize {
        self.rep.as_ref().map_or(0, |rep| rep.size)
    }

    /// Returns `true` if the buffer holds no bytes, whether or not it is allocated.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of bytes the current allocation can hold.
    pub fn capacity(&self) -> usize {
        self.rep.as_ref().map_or(0, |rep| rep.capacity())
    }

    /// Returns `true` if this handle owns an allocation, even a zero-length one.
    pub fn is_allocated(&self) -> bool {
        self.rep.is_some()
    }

    /// Returns `true` if another handle shares this buffer's allocation.
    pub fn is_shared(&self) -> bool {
        self.ref_count() > 1
    }

    /// Number of handles sharing this buffer's allocation, or 0 if it is unallocated.
    pub fn ref_count(&self) -> usize {
        self.rep.as_ref().map_or(0, Arc::strong_count)
    }

    /// Returns the rep for mutation, first copying it if another handle shares it.
    fn rep_mut(&mut self) -> Option<&mut SharedRep> {
        let rep = self.rep.as_mut()?;
        if Arc::get_mut(rep).is_none() {
            debug!(
                "detaching {} shared bytes ({} handles)",
                rep.size,
                Arc::strong_count(rep)
            );
            *rep = Arc::new(SharedRep::new(rep.bytes()));
        }
        Arc::get_mut(rep)
    }

    /// Replaces the contents of the buffer with `data`.
    ///
    /// An unshared allocation is reused when it is large enough. A shared allocation is never
    /// written to; this handle releases it and allocates a new one.
    pub fn assign(&mut self, data: &[u8]) -> &mut Self {
        match &mut self.rep {
            Some(rep) => match Arc::get_mut(rep) {
                Some(rep) => rep.overwrite(data),
                None => *rep = Arc::new(SharedRep::new(data)),
            },
            None => self.rep = Some(Arc::new(SharedRep::new(data))),
        }
        self
    }

    /// Appends `data` to the buffer, detaching from any shared allocation first.
    pub fn append(&mut self, data: &[u8]) -> &mut Self {
        if data.is_empty() {
            return self;
        }
        match self.rep_mut() {
            Some(rep) => rep.append(data),
            None => self.rep = Some(Arc::new(SharedRep::new(data))),
        }
        self
    }

    /// Appends the contents of `other` to the buffer.
    pub fn append_buffer(&mut self, other: &ByteBuffer) -> &mut Self {
        self.append(other.as_slice())
    }

    /// Empties the buffer.
    ///
    /// A shared buffer just lets go of its allocation, leaving the other handles untouched. An
    /// unshared buffer zeroes its bytes before resetting its length.
    pub fn clear(&mut self) {
        if self.is_shared() {
            self.rep = None;
        } else if let Some(rep) = self.rep.as_mut().and_then(Arc::get_mut) {
            rep.scrub();
        }
    }

    /// Exchanges the contents of two buffers without copying.
    pub fn swap(&mut self, other: &mut ByteBuffer) {
        core::mem::swap(&mut self.rep, &mut other.rep);
    }

    /// Compares two buffers byte by byte. See the type-level docs for the ordering rules.
    pub fn compare(&self, other: &ByteBuffer) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }

    /// Formats the contents as upper-case hex pairs separated by spaces, e.g. `"0A FF 10"`.
    pub fn hex(&self) -> String {
        spaced_hex(self.as_slice())
    }

    /// Formats the contents as a multi-line hex dump with offsets and an ASCII column.
    pub fn hex_dump(&self) -> String {
        pretty_hex::pretty_hex(&self.as_slice())
    }

    /// Copies the contents into a new `Vec<u8>`.
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_slice().to_vec()
    }
}

/// Upper-case hex pairs separated by single spaces.
pub(crate) fn spaced_hex(bytes: &[u8]) -> String {
    let pairs = hex::encode_upper(bytes);
    let mut out = String::with_capacity(pairs.len() + bytes.len().saturating_sub(1));
    for (i, pair) in pairs.as_bytes().chunks(2).enumerate() {
        if i != 0 {
            out.push(' ');
        }
        out.extend(pair.iter().map(|&c| char::from(c)));
    }
    out
}

impl core::fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        #[cfg(feature = "bstr")]
        {
            f.debug_tuple("ByteBuffer")
                .field(&bstr::BStr::new(self.as_slice()))
                .finish()
        }
        #[cfg(not(feature = "bstr"))]
        {
            f.debug_tuple("ByteBuffer").field(&self.as_slice()).finish()
        }
    }
}

impl PartialEq for ByteBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for ByteBuffer {}

impl PartialOrd for ByteBuffer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ByteBuffer {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Hash for ByteBuffer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}

impl PartialEq<[u8]> for ByteBuffer {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_slice() == other
    }
}

impl PartialEq<&[u8]> for ByteBuffer {
    fn eq(&self, other: &&[u8]) -> bool {
        self.as_slice() == *other
    }
}

impl PartialEq<str> for ByteBuffer {
    fn eq(&self, other: &str) -> bool {
        self.as_slice() == other.as_bytes()
    }
}

impl PartialEq<&str> for ByteBuffer {
    fn eq(&self, other: &&str) -> bool {
        self.as_slice() == other.as_bytes()
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl Borrow<[u8]> for ByteBuffer {
    fn borrow(&self) -> &[u8] {
        self.as_slice()
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(data: &[u8]) -> Self {
        Self::from_slice(data)
    }
}

impl From<&str> for ByteBuffer {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self::from_slice(&data)
    }
}

impl From<String> for ByteBuffer {
    fn from(text: String) -> Self {
        Self::from_text(&text)
    }
}

impl Add<&ByteBuffer> for &ByteBuffer {
    type Output = ByteBuffer;

    fn add(self, rhs: &ByteBuffer) -> ByteBuffer {
        let mut out = self.clone();
        out.append_buffer(rhs);
        out
    }
}

impl AddAssign<&ByteBuffer> for ByteBuffer {
    fn add_assign(&mut self, rhs: &ByteBuffer) {
        self.append_buffer(rhs);
    }
}

impl Extend<u8> for ByteBuffer {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        let bytes: Vec<u8> = iter.into_iter().collect();
        self.append(&bytes);
    }
}
