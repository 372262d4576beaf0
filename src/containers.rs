//! Encoding rules for sequences, sets and maps.
//!
//! A non-empty container is written as a `u32` element count followed by every element in
//! iteration order. An empty container writes nothing, not even a zero count.
//!
//! On the way back, the count is peeked first. If it is zero, or if fewer than
//! [`COUNT_PREFIX_LEN`] bytes are left, the container is empty and nothing is consumed.
//! Otherwise the count is consumed and elements are decoded until the count is reached or the
//! stream runs dry.
//!
//! There is no dedicated multiset or multimap type; `Vec<T>` and `Vec<(K, V)>` produce the same
//! bytes.

use crate::codec::{encode_len, COUNT_PREFIX_LEN};
use crate::{BinaryStream, Decode, Encode, ReadStream, Result};
use alloc::collections::{BTreeMap, BTreeSet, LinkedList, VecDeque};
use alloc::vec::Vec;
use core::iter;

fn encode_elements<I>(elements: I, stream: &mut BinaryStream) -> Result<()>
where
    I: ExactSizeIterator,
    I::Item: Encode,
{
    if elements.len() == 0 {
        return Ok(());
    }
    encode_len(elements.len(), stream)?;
    for element in elements {
        element.encode(stream)?;
    }
    Ok(())
}

fn decode_elements<S, T>(stream: &mut S, mut add: impl FnMut(T)) -> Result<()>
where
    S: ReadStream + ?Sized,
    T: Decode,
{
    let count = stream.peek_integer::<u32>().unwrap_or(0);
    if count == 0 {
        return Ok(());
    }
    stream.ignore(COUNT_PREFIX_LEN);
    for _ in 0..count {
        if stream.is_empty() {
            break;
        }
        add(T::decode(stream)?);
    }
    Ok(())
}

macro_rules! sequence_codec {
    ($($container:ident),*) => {
        $(
            impl<T: Encode> Encode for $container<T> {
                fn encode(&self, stream: &mut BinaryStream) -> Result<()> {
                    encode_elements(self.iter(), stream)
                }
            }

            impl<T: Decode> Decode for $container<T> {
                fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Result<Self> {
                    let mut out = Self::new();
                    decode_elements(stream, |element: T| out.extend(iter::once(element)))?;
                    Ok(out)
                }

                fn decode_into<S: ReadStream + ?Sized>(&mut self, stream: &mut S) -> Result<()> {
                    let decoded = Self::decode(stream)?;
                    self.extend(decoded);
                    Ok(())
                }
            }
        )*
    };
}

sequence_codec!(Vec, VecDeque, LinkedList);

impl<T: Encode> Encode for [T] {
    fn encode(&self, stream: &mut BinaryStream) -> Result<()> {
        encode_elements(self.iter(), stream)
    }
}

impl<T: Encode> Encode for BTreeSet<T> {
    fn encode(&self, stream: &mut BinaryStream) -> Result<()> {
        encode_elements(self.iter(), stream)
    }
}

impl<T: Decode + Ord> Decode for BTreeSet<T> {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Result<Self> {
        let mut out = BTreeSet::new();
        decode_elements(stream, |element: T| {
            out.insert(element);
        })?;
        Ok(out)
    }

    fn decode_into<S: ReadStream + ?Sized>(&mut self, stream: &mut S) -> Result<()> {
        let decoded = Self::decode(stream)?;
        self.extend(decoded);
        Ok(())
    }
}

/// Each entry is encoded as its key immediately followed by its value.
///
/// Decoding never replaces a value that is already in the map. When a key repeats, the first
/// value seen for it is kept.
impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    fn encode(&self, stream: &mut BinaryStream) -> Result<()> {
        encode_elements(self.iter(), stream)
    }
}

impl<K: Decode + Ord, V: Decode> Decode for BTreeMap<K, V> {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Result<Self> {
        let mut out = BTreeMap::new();
        decode_elements(stream, |(key, value): (K, V)| {
            out.entry(key).or_insert(value);
        })?;
        Ok(out)
    }

    fn decode_into<S: ReadStream + ?Sized>(&mut self, stream: &mut S) -> Result<()> {
        for (key, value) in Self::decode(stream)? {
            self.entry(key).or_insert(value);
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
mod hashed {
    use super::{decode_elements, encode_elements};
    use crate::{BinaryStream, Decode, Encode, ReadStream, Result};
    use core::hash::{BuildHasher, Hash};
    use std::collections::{HashMap, HashSet};

    /// Elements are written in the set's iteration order, which is not stable across instances.
    impl<T: Encode, H> Encode for HashSet<T, H> {
        fn encode(&self, stream: &mut BinaryStream) -> Result<()> {
            encode_elements(self.iter(), stream)
        }
    }

    impl<T, H> Decode for HashSet<T, H>
    where
        T: Decode + Eq + Hash,
        H: BuildHasher + Default,
    {
        fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Result<Self> {
            let mut out = HashSet::default();
            decode_elements(stream, |element: T| {
                out.insert(element);
            })?;
            Ok(out)
        }

        fn decode_into<S: ReadStream + ?Sized>(&mut self, stream: &mut S) -> Result<()> {
            let decoded = Self::decode(stream)?;
            self.extend(decoded);
            Ok(())
        }
    }

    impl<K: Encode, V: Encode, H> Encode for HashMap<K, V, H> {
        fn encode(&self, stream: &mut BinaryStream) -> Result<()> {
            encode_elements(self.iter(), stream)
        }
    }

    impl<K, V, H> Decode for HashMap<K, V, H>
    where
        K: Decode + Eq + Hash,
        V: Decode,
        H: BuildHasher + Default,
    {
        fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Result<Self> {
            let mut out = HashMap::default();
            decode_elements(stream, |(key, value): (K, V)| {
                out.entry(key).or_insert(value);
            })?;
            Ok(out)
        }

        fn decode_into<S: ReadStream + ?Sized>(&mut self, stream: &mut S) -> Result<()> {
            for (key, value) in Self::decode(stream)? {
                self.entry(key).or_insert(value);
            }
            Ok(())
        }
    }
}
