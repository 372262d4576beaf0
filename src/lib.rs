//! Copy-on-write byte buffers and a cursor-based binary stream.
//!
//! [`ByteBuffer`] is a cheaply clonable byte string. Clones share one allocation until one of
//! them is mutated, at which point the mutated handle detaches into a private copy.
//!
//! [`BinaryStream`] owns a growable byte region with independent read and write cursors.
//! [`StreamView`] is its borrowed, read-only counterpart: it wraps caller memory without copying.
//! Both implement [`ReadStream`], which carries every read-side operation.
//!
//! Values move through a stream with the [`Encode`] and [`Decode`] traits. The wire format is:
//!
//! * fixed-width integers and floats in little-endian byte order,
//! * `bool` as a single `0` or `1` byte,
//! * byte strings, text and nested streams as a `u32` length followed by the bytes,
//! * sequences, sets and maps as a `u32` element count followed by each element. An empty
//!   container writes nothing at all.
//!
//! ```
//! use octet_stream::{BinaryStream, ReadStream};
//!
//! let mut s = BinaryStream::new();
//! s.push(&42u16)?.push("hello")?.push(&vec![1i32, -1])?;
//!
//! assert_eq!(s.pop::<u16>()?, 42);
//! assert_eq!(s.pop::<String>()?, "hello");
//! assert_eq!(s.pop::<Vec<i32>>()?, [1, -1]);
//! assert!(s.is_empty());
//! # Ok::<(), octet_stream::StreamError>(())
//! ```

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]
#![forbid(unused_must_use)]
#![warn(missing_docs)]

extern crate alloc;

mod buffer;
pub mod byteorder;
mod codec;
mod containers;
mod error;
mod reader;
mod writer;


pub use buffer::ByteBuffer;
pub use codec::{Decode, Encode, COUNT_PREFIX_LEN};
pub use error::{Result, StreamError};
pub use reader::{ReadStream, StreamView};
pub use writer::{BinaryStream, PAGE_SIZE};
