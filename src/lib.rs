#![allow(clippy::module_inception)]

mod buffer;
mod channel;
mod config;
mod decoder;
mod error;
mod header;
mod id;
mod stream;
mod tags;
mod visitor;

pub mod prelude;

pub use channel::{Channel, LengthFramed, PrependBuffered};
pub use config::{ByteOrder, DecoderBuilder, DecoderOptions};
pub use decoder::Decoder;
pub use error::{DecodeError, Error, HeaderError, ResourceError, Result};
pub use header::Header;
pub use id::IdSize;
pub use stream::DataStream;
pub use tags::{BasicType, HeapTag, OuterTag};
pub use visitor::Visitor;
