//! Host byte order detection and conversion for fixed-width integers.
//!
//! Every conversion is its own inverse with respect to its counterpart: `le_to_host(host_to_le(x))
//! == x` on every host. On a little-endian host `host_to_le` and `le_to_host` return their input.

use zerocopy::{FromBytes, Immutable, IntoBytes};

/// `true` when the host stores integers least significant byte first.
pub const IS_HOST_LE: bool = cfg!(target_endian = "little");

mod sealed {
    pub trait Sealed {}
}

/// Fixed-width integers that can be byte-swapped and written to a stream as raw bytes.
///
/// This trait is sealed. `usize` and `isize` are deliberately absent because their width depends
/// on the host.
pub trait Integer: sealed::Sealed + Copy + FromBytes + IntoBytes + Immutable {
    /// Reverses the byte order of `self`.
    fn byte_swap(self) -> Self;
}

macro_rules! integer_impls {
    ($($t:ty),*) => {
        $(
            impl sealed::Sealed for $t {}

            impl Integer for $t {
                #[inline(always)]
                fn byte_swap(self) -> Self {
                    self.swap_bytes()
                }
            }
        )*
    };
}

integer_impls!(u8, i8, u16, i16, u32, i32, u64, i64, u128, i128);

/// Reverses the byte order of `value`.
#[inline(always)]
pub fn byte_swap<T: Integer>(value: T) -> T {
    value.byte_swap()
}

/// Converts `value` from host order to little-endian order.
#[inline(always)]
pub fn host_to_le<T: Integer>(value: T) -> T {
    if IS_HOST_LE {
        value
    } else {
        value.byte_swap()
    }
}

/// Converts `value` from host order to big-endian order.
#[inline(always)]
pub fn host_to_be<T: Integer>(value: T) -> T {
    if IS_HOST_LE {
        value.byte_swap()
    } else {
        value
    }
}

/// Converts `value` from little-endian order to host order.
#[inline(always)]
pub fn le_to_host<T: Integer>(value: T) -> T {
    host_to_le(value)
}

/// Converts `value` from big-endian order to host order.
#[inline(always)]
pub fn be_to_host<T: Integer>(value: T) -> T {
    host_to_be(value)
}
