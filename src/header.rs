//! The fixed leading header of an hprof stream.
//!
//! Grounded on `binseq::header::BinseqHeader`'s `from_bytes`/`from_buffer`
//! split (parse a pure byte slice, separately from how those bytes were
//! obtained) but adapted for a variable-length leading C-string instead of
//! a fixed-size array, using `memchr` to find the terminator the way
//! `other_examples/18f22742_M4tthewDE-heapdump-analyzer`'s `read_utf8`
//! helper reads a known-length run of bytes and validates it as UTF-8.

use crate::config::ByteOrder;
use crate::error::{DecodeError, HeaderError, Result};
use crate::id::IdSize;

/// Refuse to scan for the NUL terminator past this many bytes; a real hprof
/// version string ("JAVA PROFILE 1.0.2") is under 32 bytes.
const VERSION_STRING_SANITY_LIMIT: usize = 256;

/// The header record, produced once at the start of a stream: the ASCII
/// version string, the frozen identifier width, and the dump's timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub version: String,
    pub id_size: IdSize,
    pub timestamp_millis: u64,
}

impl Header {
    /// Parses a header from the front of `buf`, returning the header and
    /// the number of bytes it consumed so the caller can re-inject
    /// whatever follows it back in front of the stream.
    pub fn parse(buf: &[u8], byte_order: ByteOrder) -> Result<(Self, usize)> {
        let search_limit = buf.len().min(VERSION_STRING_SANITY_LIMIT + 1);
        let nul_pos = match memchr::memchr(0, &buf[..search_limit]) {
            Some(pos) => pos,
            None if search_limit > VERSION_STRING_SANITY_LIMIT => {
                return Err(HeaderError::VersionStringTooLong(VERSION_STRING_SANITY_LIMIT).into());
            }
            None => {
                return Err(DecodeError::Truncated {
                    what: "header version string",
                    needed: search_limit + 1,
                    available: buf.len(),
                }
                .into());
            }
        };

        let version = std::str::from_utf8(&buf[..nul_pos])
            .map_err(|_| HeaderError::InvalidVersionString)?
            .to_string();

        let mut pos = nul_pos + 1;
        const TAIL_LEN: usize = 4 + 8;
        if buf.len() < pos + TAIL_LEN {
            return Err(DecodeError::Truncated {
                what: "header id_size/timestamp",
                needed: pos + TAIL_LEN,
                available: buf.len(),
            }
            .into());
        }

        let id_size_raw = byte_order.read_u32(&buf[pos..pos + 4]);
        pos += 4;
        let timestamp_millis = byte_order.read_u64(&buf[pos..pos + 8]);
        pos += 8;

        let id_size = IdSize::from_header_value(id_size_raw)?;

        Ok((
            Self {
                version,
                id_size,
                timestamp_millis,
            },
            pos,
        ))
    }
}
