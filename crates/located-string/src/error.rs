//! Error types for located-string construction and queries.

use thiserror::Error;

/// Result type alias for located-string operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by located-string construction and queries.
///
/// Every failure here is a contract violation detected eagerly — there is no
/// partial success and nothing to retry. Containment testing never produces
/// an error; absence of containment is an ordinary `false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Construction with no offset regions, including construction from
    /// empty input text.
    #[error("located string must have at least one offset region")]
    EmptyRegions,

    /// Bounds disagree with the offsets implied by the region list.
    #[error("bounds are inconsistent with regions: {0}")]
    InconsistentBounds(String),

    /// The region list does not tile the string's positions exactly.
    #[error("regions do not tile the string: {0}")]
    NonContiguousRegions(String),

    /// A region's end precedes its start, in position or in char offset.
    #[error("invalid offset region: {0}")]
    InvalidRegion(String),

    /// No region covers the requested char offset.
    #[error("no offset region covers char offset {0}")]
    OffsetNotFound(usize),

    /// A position range that is inverted or out of bounds.
    #[error("invalid range [{start}, {end}) for string of length {len}")]
    InvalidRange {
        start: usize,
        end: usize,
        len: usize,
    },

    /// Char offsets that fall before the start of this string's bounds.
    #[error("char offsets [{start}, {end}] precede this string's bounds")]
    CharOffsetsOutOfBounds { start: usize, end: usize },
}
