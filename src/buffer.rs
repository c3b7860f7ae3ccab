//! Bounded, reusable scratch buffers.
//!
//! Grounded on the `Buffer`/`BufferPool` shape in
//! `other_examples/0cea46cd_jafreck-lz4r__src-io-decompress_resources.rs.rs`
//! (capacity, populated length, acquire/release) and on
//! `binseq::context::structs::Ctx`'s named reusable `Vec<u8>` fields cleared
//! and refilled per record rather than reallocated on every call. The
//! grow-to-next-power-of-two-with-ceiling policy is new: spec §3 requires it
//! explicitly, but it follows the same "preallocate, clear, reuse"
//! discipline as both sources.

use crate::error::{ResourceError, Result};

/// A named, growable-with-ceiling byte buffer.
///
/// A request for `size` bytes either reuses the current allocation, grows it
/// to the next power of two (capped at `max_capacity`), or fails with
/// [`ResourceError::BufferCapacityExceeded`] if `size` exceeds the ceiling.
/// The buffer never shrinks.
#[derive(Debug)]
pub struct ScratchBuffer {
    name: &'static str,
    data: Vec<u8>,
    max_capacity: usize,
}

impl ScratchBuffer {
    pub fn new(name: &'static str, initial_capacity: usize, max_capacity: usize) -> Self {
        let initial_capacity = initial_capacity.min(max_capacity);
        Self {
            name,
            data: vec![0u8; initial_capacity],
            max_capacity,
        }
    }

    /// Grows the buffer to at least `size` bytes if needed and returns a
    /// mutable view of exactly `size` bytes at the front.
    pub fn ensure_capacity(&mut self, size: usize) -> Result<&mut [u8]> {
        if size > self.max_capacity {
            return Err(ResourceError::BufferCapacityExceeded {
                buffer: self.name,
                requested: size,
                max: self.max_capacity,
            }
            .into());
        }
        if self.data.len() < size {
            let new_capacity = size.next_power_of_two().min(self.max_capacity).max(size);
            self.data.resize(new_capacity, 0);
        }
        Ok(&mut self.data[..size])
    }

    /// Current allocated capacity, in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// The configured hard ceiling, in bytes.
    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }
}

/// A reusable 4 KiB buffer drawn from a small free-list, used for the
/// 9-byte outer record header and the fixed-layout `LOAD_CLASS`/
/// `STACK_FRAME`/`STACK_TRACE` payloads.
pub const SMALL_BUFFER_SIZE: usize = 4 * 1024;

/// A free-list of pooled [`SMALL_BUFFER_SIZE`]-byte buffers, avoiding churn
/// for the decoder's many short fixed-size reads.
#[derive(Debug, Default)]
pub struct SmallBufferPool {
    free: Vec<Vec<u8>>,
}

impl SmallBufferPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires a zero-length-logical, `SMALL_BUFFER_SIZE`-capacity buffer from the pool.
    pub fn acquire(&mut self) -> Vec<u8> {
        self.free
            .pop()
            .unwrap_or_else(|| vec![0u8; SMALL_BUFFER_SIZE])
    }

    /// Returns a buffer to the pool for reuse.
    pub fn release(&mut self, buf: Vec<u8>) {
        self.free.push(buf);
    }
}
