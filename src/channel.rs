//! Byte-channel abstraction and its two compositional wrappers.
//!
//! Grounded on the layered-reader idiom in
//! `other_examples/3419aaab_pdeljanov-Symphonia__sonata-core-src-io-media_source_stream.rs.rs`
//! (a stateful wrapper that fetches from an inner source on demand) and on
//! `other_examples/73ae08af_ocadaruma-jfrs__src-reader-mod.rs.rs`'s
//! `ByteStream` wrapping an inner reader. Per spec §9, these are expressed
//! as small values holding a mutable reference to an underlying source plus
//! a cursor, not a class hierarchy; the framed adapter borrows its source
//! exclusively for its lifetime, so the borrow checker enforces the "don't
//! touch the source while a frame is live" contract the spec calls out as a
//! linear-resource obligation.

use std::io;

/// A blocking byte source. The decoder never seeks.
///
/// A blanket implementation covers every `R: std::io::Read` (files, sockets,
/// `Cursor<Vec<u8>>` in tests), so callers of [`crate::Decoder::read`] almost
/// never need to implement this by hand.
pub trait Channel {
    /// Reads into `buf`, returning the number of bytes written, or `0` at end-of-stream.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Whether the channel is still usable. Types with no explicit open/closed state report `true`.
    fn is_open(&self) -> bool {
        true
    }

    /// Releases any resources held by the channel. A no-op by default.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<R: io::Read> Channel for R {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(self, buf)
    }
}

/// Re-injects a small already-filled prefix in front of a backing channel.
///
/// Used exactly once per decoding session: the header probe reads a block
/// of bytes directly off the raw channel, and whatever is left over after
/// the header fields are parsed out of that block becomes `prefix` here, so
/// the outer record loop sees one seamless source starting at the first
/// outer record.
pub struct PrependBuffered<'a, S: Channel + ?Sized> {
    prefix: Vec<u8>,
    prefix_pos: usize,
    source: &'a mut S,
}

impl<'a, S: Channel + ?Sized> PrependBuffered<'a, S> {
    pub fn new(prefix: Vec<u8>, prefix_pos: usize, source: &'a mut S) -> Self {
        Self {
            prefix,
            prefix_pos,
            source,
        }
    }
}

impl<'a, S: Channel + ?Sized> Channel for PrependBuffered<'a, S> {
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        if self.prefix_pos < self.prefix.len() {
            let available = self.prefix.len() - self.prefix_pos;
            let want = available.min(dst.len());
            dst[..want].copy_from_slice(&self.prefix[self.prefix_pos..self.prefix_pos + want]);
            self.prefix_pos += want;
            return Ok(want);
        }
        self.source.read(dst)
    }

    fn is_open(&self) -> bool {
        self.source.is_open()
    }

    fn close(&mut self) -> io::Result<()> {
        self.source.close()
    }
}

/// Caps the number of bytes readable from a backing channel to a declared frame length.
///
/// Exclusively borrows `source` for its lifetime: while a frame is live, the
/// caller has no way to read `source` directly, which is how this crate
/// enforces spec §4.1's "the caller is contract-bound not to reuse `S`
/// directly until the frame is drained."
pub struct LengthFramed<'a, S: Channel + ?Sized> {
    source: &'a mut S,
    remaining: u64,
}

impl<'a, S: Channel + ?Sized> LengthFramed<'a, S> {
    pub fn new(source: &'a mut S, length: u64) -> Self {
        Self {
            source,
            remaining: length,
        }
    }

    /// Bytes not yet read out of the frame.
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl<'a, S: Channel + ?Sized> Channel for LengthFramed<'a, S> {
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 {
            return Ok(0);
        }
        let want = self.remaining.min(dst.len() as u64) as usize;
        let n = self.source.read(&mut dst[..want])?;
        self.remaining -= n as u64;
        Ok(n)
    }

    fn is_open(&self) -> bool {
        self.source.is_open()
    }

    fn close(&mut self) -> io::Result<()> {
        self.source.close()
    }
}
