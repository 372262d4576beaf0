use thiserror::Error;

/// Result type used by every fallible stream operation.
pub type Result<T> = core::result::Result<T, StreamError>;

/// Error type for stream reads and for encoders.
#[derive(Error, Copy, Clone, Eq, PartialEq, Debug)]
pub enum StreamError {
    /// A read needed more bytes than the stream has left.
    ///
    /// The read cursor is left where it was before the failing call, so the caller can give up
    /// on the current value and still use the rest of the stream.
    #[error("not enough data left in the stream")]
    NeedsMoreData,

    /// The bytes were read but do not form a valid value, e.g. a string that is not UTF-8.
    #[error("the stream contains malformed data")]
    Invalid,

    /// A length or element count does not fit in the `u32` prefix.
    #[error("the data cannot be encoded")]
    CannotEncode,
}
