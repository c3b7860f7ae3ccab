//! Decoder configuration.
//!
//! Grounded on `binseq::record::config::RecordConfig` (an immutable value
//! struct built once and carried everywhere) and the builder conventions in
//! the teacher's writers (`BinseqWriterBuilder`): a builder collects
//! options, `.build()` freezes them.

use byteorder::{BigEndian, ByteOrder as _, LittleEndian};

/// Byte order used to decode every multi-byte primitive in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// The JVM default; HotSpot-family VMs always emit big-endian hprof files.
    Big,
    Little,
}

impl Default for ByteOrder {
    fn default() -> Self {
        ByteOrder::Big
    }
}

impl ByteOrder {
    #[inline]
    pub fn read_u16(self, buf: &[u8]) -> u16 {
        match self {
            ByteOrder::Big => BigEndian::read_u16(buf),
            ByteOrder::Little => LittleEndian::read_u16(buf),
        }
    }

    #[inline]
    pub fn read_u32(self, buf: &[u8]) -> u32 {
        match self {
            ByteOrder::Big => BigEndian::read_u32(buf),
            ByteOrder::Little => LittleEndian::read_u32(buf),
        }
    }

    #[inline]
    pub fn read_u64(self, buf: &[u8]) -> u64 {
        match self {
            ByteOrder::Big => BigEndian::read_u64(buf),
            ByteOrder::Little => LittleEndian::read_u64(buf),
        }
    }

    #[inline]
    pub fn read_i32(self, buf: &[u8]) -> i32 {
        match self {
            ByteOrder::Big => BigEndian::read_i32(buf),
            ByteOrder::Little => LittleEndian::read_i32(buf),
        }
    }

    #[inline]
    pub fn read_f32(self, buf: &[u8]) -> f32 {
        match self {
            ByteOrder::Big => BigEndian::read_f32(buf),
            ByteOrder::Little => LittleEndian::read_f32(buf),
        }
    }

    #[inline]
    pub fn read_f64(self, buf: &[u8]) -> f64 {
        match self {
            ByteOrder::Big => BigEndian::read_f64(buf),
            ByteOrder::Little => LittleEndian::read_f64(buf),
        }
    }
}

/// Default ceiling, in bytes, for each of the three named scratch buffers.
pub const DEFAULT_MAX_BUFFER_CAPACITY: usize = 65_536;

/// Size each named scratch buffer is pre-allocated to, below its configured maximum.
pub const INITIAL_BUFFER_CAPACITY: usize = 16 * 1024;

/// Immutable decoder configuration, frozen once the decoder is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    pub byte_order: ByteOrder,
    pub max_stack_buffer_capacity: usize,
    pub max_string_buffer_capacity: usize,
    pub max_instance_buffer_capacity: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::default(),
            max_stack_buffer_capacity: DEFAULT_MAX_BUFFER_CAPACITY,
            max_string_buffer_capacity: DEFAULT_MAX_BUFFER_CAPACITY,
            max_instance_buffer_capacity: DEFAULT_MAX_BUFFER_CAPACITY,
        }
    }
}

/// Builder for [`DecoderOptions`] / [`crate::Decoder`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DecoderBuilder {
    options: DecoderOptions,
}

impl DecoderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the byte order every multi-byte primitive is decoded in. Default: big-endian.
    pub fn byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.options.byte_order = byte_order;
        self
    }

    /// Sets the hard ceiling for the stack-frame-id scratch buffer. Default: 65 536 bytes.
    pub fn max_stack_buffer_capacity(mut self, max: usize) -> Self {
        self.options.max_stack_buffer_capacity = max;
        self
    }

    /// Sets the hard ceiling for the UTF-8 string-pool scratch buffer. Default: 65 536 bytes.
    pub fn max_string_buffer_capacity(mut self, max: usize) -> Self {
        self.options.max_string_buffer_capacity = max;
        self
    }

    /// Sets the hard ceiling for the instance-field-bytes scratch buffer. Default: 65 536 bytes.
    pub fn max_instance_buffer_capacity(mut self, max: usize) -> Self {
        self.options.max_instance_buffer_capacity = max;
        self
    }

    /// Freezes the options and constructs a [`crate::Decoder`].
    pub fn build(self) -> crate::Decoder {
        crate::Decoder::from_options(self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let opts = DecoderOptions::default();
        assert_eq!(opts.byte_order, ByteOrder::Big);
        assert_eq!(opts.max_stack_buffer_capacity, 65_536);
        assert_eq!(opts.max_string_buffer_capacity, 65_536);
        assert_eq!(opts.max_instance_buffer_capacity, 65_536);
    }

    #[test]
    fn builder_overrides_apply() {
        let decoder = DecoderBuilder::new()
            .byte_order(ByteOrder::Little)
            .max_stack_buffer_capacity(1024)
            .max_string_buffer_capacity(2048)
            .max_instance_buffer_capacity(4096)
            .build();
        assert_eq!(decoder.options().byte_order, ByteOrder::Little);
        assert_eq!(decoder.options().max_stack_buffer_capacity, 1024);
        assert_eq!(decoder.options().max_string_buffer_capacity, 2048);
        assert_eq!(decoder.options().max_instance_buffer_capacity, 4096);
    }
}
