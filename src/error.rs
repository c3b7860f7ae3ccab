//! Error types for the heap-dump decoder.
//!
//! Mirrors the teacher crate's split of errors by concern (`HeaderError`,
//! `ReadError`, `WriteError`) aggregated behind one public `Error`/`Result`.

use std::fmt;

/// Errors raised while parsing the fixed leading header.
#[derive(thiserror::Error, Debug)]
pub enum HeaderError {
    #[error("header version string is not valid ASCII/UTF-8")]
    InvalidVersionString,

    #[error("header version string exceeds the {0}-byte sanity limit without a NUL terminator")]
    VersionStringTooLong(usize),

    #[error("illegal identifier size {0}: must be 4 or 8")]
    InvalidIdentifierSize(u32),
}

/// Errors raised while decoding the record stream (outer or inner).
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("unrecognised outer record tag 0x{0:02x}")]
    UnrecognizedOuterTag(u8),

    #[error("unrecognised heap sub-record tag 0x{0:02x}")]
    UnrecognizedHeapTag(u8),

    #[error("unrecognised basic type byte 0x{0:02x}")]
    UnrecognizedBasicType(u8),

    #[error("OBJECT is not a valid element type inside a primitive array")]
    ObjectInPrimitiveArray,

    #[error("string record payload is not valid UTF-8")]
    InvalidStringEncoding,

    #[error("record length {length} is shorter than the {id_size}-byte identifier it must contain")]
    RecordShorterThanIdentifier { length: u32, id_size: usize },

    #[error("truncated {what}: needed {needed} bytes, {available} available")]
    Truncated {
        what: &'static str,
        needed: usize,
        available: usize,
    },

    #[error(
        "heap-dump frame exhausted with {remaining} byte(s) left over; an inner record stopped \
         short of its declared length"
    )]
    FrameNotDrained { remaining: u64 },

    #[error(
        "array length {length} with element size {element_size} exceeds the {frame_remaining} \
         byte(s) remaining in the enclosing frame"
    )]
    ArrayTooLarge {
        length: u64,
        element_size: usize,
        frame_remaining: u64,
    },
}

/// Errors raised when a scratch buffer is asked to grow past its configured ceiling.
#[derive(thiserror::Error, Debug)]
pub enum ResourceError {
    #[error("buffer '{buffer}' needs {requested} bytes but its configured maximum is {max}")]
    BufferCapacityExceeded {
        buffer: &'static str,
        requested: usize,
        max: usize,
    },
}

/// A boxed visitor error, reported back to the caller of [`crate::Decoder::read`] unchanged in content.
pub struct VisitorError(pub Box<dyn std::error::Error + Send + Sync + 'static>);

impl fmt::Debug for VisitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for VisitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for VisitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.0.as_ref())
    }
}

/// The top-level error type for this crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error("visitor rejected input: {0}")]
    Visitor(#[source] VisitorError),
}

impl Error {
    /// Wraps a visitor-raised error, preserving its message and source chain unchanged.
    pub fn from_visitor<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Visitor(VisitorError(Box::new(err)))
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
