//! Strings that remember where every character came from.
//!
//! Text pipelines slice, transform and recombine strings many times between
//! reading a source document and emitting annotations over it. A
//! [`LocatedString`] carries the text together with the exact origin offsets
//! of every character — byte position, code-point position, a logical
//! position that skips markup and carriage returns, and an optional
//! time-alignment value — so any character of any derived string can be
//! mapped back to where it came from.
//!
//! The mapping is stored as an ordered list of [`OffsetRegion`]s relating
//! string positions to source offsets. Substring extraction re-derives the
//! region list for the extracted window, so provenance survives slicing, and
//! two located strings can be tested for offset-consistent containment.
//!
//! # Example
//!
//! ```rust
//! use located_string::{CharOffset, LocatedString, OffsetGroup};
//!
//! let s = LocatedString::from_text("ab<i>c</i>d", OffsetGroup::at_zero()).unwrap();
//!
//! // Char offsets count every character; logical offsets skip the tags.
//! assert_eq!(s.end_char_offset().value(), 10);
//! assert_eq!(s.end_logical_offset().value(), 3);
//!
//! // A substring keeps its provenance and is contained in its parent.
//! let ab = s.substring_by_position(0, 2).unwrap();
//! assert_eq!(ab.text(), "ab");
//! assert_eq!(ab.end_char_offset(), CharOffset::new(1));
//! assert!(s.contains(&ab));
//! ```

mod error;
mod located;
mod mapping;
mod region;

pub use error::{Error, Result};
pub use located::LocatedString;
pub use region::OffsetRegion;

// Re-export the offset coordinate types so consumers need only this crate.
pub use located_offsets::{
    ByteOffset, CharOffset, LogicalOffset, Offset, OffsetGroup, OffsetGroupRange, OffsetRange,
    TimeAlignment,
};
