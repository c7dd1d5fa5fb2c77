//! Scalar offset types, one per coordinate system.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Common interface over the scalar offset kinds.
///
/// The kinds are deliberately distinct types — a byte offset is never
/// interchangeable with a code-point offset — but range types and offset
/// arithmetic can be written once over this trait.
pub trait Offset: Copy + Eq + Ord {
    /// Wrap a raw value in this offset kind.
    fn from_value(value: usize) -> Self;

    /// The raw value of this offset.
    fn value(self) -> usize;
}

/// Position in the original byte-encoded source.
///
/// A character encoded with three bytes at positions 14, 15 and 16 starts at
/// byte offset 14 and ends (inclusively) at byte offset 16.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ByteOffset(usize);

impl ByteOffset {
    pub const fn new(value: usize) -> Self {
        ByteOffset(value)
    }

    pub const fn value(self) -> usize {
        self.0
    }
}

/// Index of a Unicode code point in the original source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CharOffset(usize);

impl CharOffset {
    pub const fn new(value: usize) -> Self {
        CharOffset(value)
    }

    pub const fn value(self) -> usize {
        self.0
    }
}

/// Content position that does not advance across markup runs or carriage
/// returns.
///
/// Logical offsets align located text with structural annotations made on
/// markup-free text: inside a `<`..`>` run and at `\r` the logical offset
/// stands still while the char offset keeps counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LogicalOffset(usize);

impl LogicalOffset {
    pub const fn new(value: usize) -> Self {
        LogicalOffset(value)
    }

    pub const fn value(self) -> usize {
        self.0
    }
}

/// Externally supplied time-alignment value for a point in the text, e.g. a
/// position in a speech signal. Carried opaquely; never computed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeAlignment(usize);

impl TimeAlignment {
    pub const fn new(value: usize) -> Self {
        TimeAlignment(value)
    }

    pub const fn value(self) -> usize {
        self.0
    }
}

macro_rules! impl_offset {
    ($($ty:ident),*) => {
        $(
            impl Offset for $ty {
                fn from_value(value: usize) -> Self {
                    $ty::new(value)
                }

                fn value(self) -> usize {
                    self.0
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )*
    };
}

impl_offset!(ByteOffset, CharOffset, LogicalOffset, TimeAlignment);
