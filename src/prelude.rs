//! Convenience re-export of the types most callers need.

pub use crate::{ByteOrder, Channel, Decoder, DecoderBuilder, DecoderOptions, Error, IdSize, Result, Visitor};
