//! Offset groups: one value per coordinate system for a single point.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::offset::{ByteOffset, CharOffset, LogicalOffset, TimeAlignment};

/// The offsets of a single point in every coordinate system at once.
///
/// Char and logical offsets are always present; byte offset and time
/// alignment are only carried when the source tracks them. Immutable once
/// constructed — the `with_*` methods return a new group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OffsetGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    byte: Option<ByteOffset>,
    #[serde(rename = "char")]
    char_offset: CharOffset,
    logical: LogicalOffset,
    #[serde(skip_serializing_if = "Option::is_none")]
    time: Option<TimeAlignment>,
}

impl OffsetGroup {
    /// Group with char and logical offsets only.
    pub fn new(char_offset: CharOffset, logical: LogicalOffset) -> Self {
        OffsetGroup {
            byte: None,
            char_offset,
            logical,
            time: None,
        }
    }

    /// Group whose char and logical offsets are both `offset`, as at any
    /// point of a text with no markup semantics.
    pub fn matching(offset: usize) -> Self {
        OffsetGroup::new(CharOffset::new(offset), LogicalOffset::new(offset))
    }

    /// The zero point: char and logical offsets both 0, no byte offset, no
    /// time alignment.
    pub fn at_zero() -> Self {
        OffsetGroup::matching(0)
    }

    /// This group with a byte offset attached.
    pub fn with_byte(self, byte: ByteOffset) -> Self {
        OffsetGroup {
            byte: Some(byte),
            ..self
        }
    }

    /// This group with a time-alignment value attached.
    pub fn with_time(self, time: TimeAlignment) -> Self {
        OffsetGroup {
            time: Some(time),
            ..self
        }
    }

    pub fn byte(&self) -> Option<ByteOffset> {
        self.byte
    }

    pub fn char_offset(&self) -> CharOffset {
        self.char_offset
    }

    pub fn logical(&self) -> LogicalOffset {
        self.logical
    }

    pub fn time(&self) -> Option<TimeAlignment> {
        self.time
    }
}

impl fmt::Display for OffsetGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        if let Some(byte) = self.byte {
            write!(f, "b{byte};")?;
        }
        write!(f, "c{};l{}", self.char_offset, self.logical)?;
        if let Some(time) = self.time {
            write!(f, ";t{time}")?;
        }
        write!(f, "]")
    }
}
