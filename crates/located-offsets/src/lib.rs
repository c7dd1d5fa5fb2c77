//! Offset coordinate types for provenance-tracked text.
//!
//! Text that has been read from a source document can be sliced and
//! recombined many times before it is annotated. To keep every character
//! traceable back to its origin, positions are measured in several coordinate
//! systems at once:
//!
//! - [`ByteOffset`]: position in the byte-encoded source (optional — not all
//!   sources track bytes)
//! - [`CharOffset`]: index of the Unicode code point in the source
//! - [`LogicalOffset`]: like [`CharOffset`], except markup runs and carriage
//!   returns do not advance it, so it lines up with annotations made on
//!   "clean" text
//! - [`TimeAlignment`]: externally supplied alignment value (e.g. a speech
//!   timestamp), carried opaquely
//!
//! An [`OffsetGroup`] bundles one value per coordinate system for a single
//! point, and [`OffsetGroupRange`] is an inclusive start/end pair of groups
//! describing the bounds of a span. [`OffsetRange`] is the single-kind
//! inclusive range.
//!
//! # Example
//!
//! ```rust
//! use located_offsets::{CharOffset, LogicalOffset, OffsetGroup};
//!
//! let point = OffsetGroup::new(CharOffset::new(10), LogicalOffset::new(3));
//! assert_eq!(point.char_offset().value(), 10);
//! assert_eq!(point.logical().value(), 3);
//! assert!(point.byte().is_none());
//! ```

pub mod group;
pub mod offset;
pub mod range;

pub use group::OffsetGroup;
pub use offset::{ByteOffset, CharOffset, LogicalOffset, Offset, TimeAlignment};
pub use range::{OffsetGroupRange, OffsetRange};
