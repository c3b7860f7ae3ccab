//! Identifier-width polymorphism.
//!
//! The header declares identifiers as either 4 or 8 bytes wide; every
//! object/class/loader/field identifier thereafter is read at that width
//! and reported to the visitor as a zero-extended `u64`. Implemented as a
//! small `Copy` descriptor passed by value into every sub-decoder (spec §9)
//! rather than a dynamically dispatched reader, the same way
//! `binseq::record::config::RecordConfig` precomputes per-instance layout
//! facts and carries them by value.

use crate::error::{HeaderError, Result};

/// The width of every identifier in a single decoding session, frozen from the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSize {
    /// 4-byte identifiers, zero-extended to `u64` when reported.
    U4,
    /// 8-byte identifiers.
    U8,
}

impl IdSize {
    /// Resolves the header's `id_size` field, rejecting anything but 4 or 8.
    pub fn from_header_value(value: u32) -> Result<Self> {
        match value {
            4 => Ok(IdSize::U4),
            8 => Ok(IdSize::U8),
            other => Err(HeaderError::InvalidIdentifierSize(other).into()),
        }
    }

    /// The width of one identifier in bytes.
    #[inline]
    pub fn byte_len(self) -> usize {
        match self {
            IdSize::U4 => 4,
            IdSize::U8 => 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_four_and_eight() {
        assert_eq!(IdSize::from_header_value(4).unwrap(), IdSize::U4);
        assert_eq!(IdSize::from_header_value(8).unwrap(), IdSize::U8);
    }

    #[test]
    fn rejects_anything_else() {
        assert!(IdSize::from_header_value(2).is_err());
        assert!(IdSize::from_header_value(0).is_err());
        assert!(IdSize::from_header_value(16).is_err());
    }

    #[test]
    fn byte_len_matches_variant() {
        assert_eq!(IdSize::U4.byte_len(), 4);
        assert_eq!(IdSize::U8.byte_len(), 8);
    }
}
