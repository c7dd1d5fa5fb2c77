//! Offset regions: contiguous runs of string positions paired with their
//! source offsets.

use std::fmt;

use located_offsets::{CharOffset, LogicalOffset, OffsetGroup};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A contiguous run of string positions `[start_pos, end_pos)` together with
/// the source offset groups at its start and end.
///
/// Positions index code points of the owning string, half-open. The offset
/// groups are inclusive on both ends: a region covering positions `[0, 2)`
/// has the char offset of its first character in `start_offset` and the char
/// offset of its second (last) character in `end_offset`.
///
/// The relationship between positions and offsets varies region to region —
/// inside a markup run, positions and char offsets advance but logical
/// offsets do not. Such a region is a *skip region*: its logical offsets
/// stand still no matter how wide its char span is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRegion")]
pub struct OffsetRegion {
    start_pos: usize,
    end_pos: usize,
    start_offset: OffsetGroup,
    end_offset: OffsetGroup,
}

impl OffsetRegion {
    /// Create a region, validating that it is non-empty and that its char
    /// offsets are ordered.
    pub fn new(
        start_pos: usize,
        end_pos: usize,
        start_offset: OffsetGroup,
        end_offset: OffsetGroup,
    ) -> Result<Self> {
        if end_pos <= start_pos {
            return Err(Error::InvalidRegion(format!(
                "end position {end_pos} does not exceed start position {start_pos}"
            )));
        }
        if end_offset.char_offset() < start_offset.char_offset() {
            return Err(Error::InvalidRegion(format!(
                "end char offset {} precedes start char offset {}",
                end_offset.char_offset(),
                start_offset.char_offset()
            )));
        }
        Ok(OffsetRegion {
            start_pos,
            end_pos,
            start_offset,
            end_offset,
        })
    }

    /// First position covered by this region.
    pub fn start_pos(&self) -> usize {
        self.start_pos
    }

    /// One past the last position covered by this region.
    pub fn end_pos(&self) -> usize {
        self.end_pos
    }

    /// Offsets of the region's first character.
    pub fn start_offset(&self) -> OffsetGroup {
        self.start_offset
    }

    /// Offsets of the region's last character (inclusive).
    pub fn end_offset(&self) -> OffsetGroup {
        self.end_offset
    }

    /// Number of string positions covered.
    pub fn pos_len(&self) -> usize {
        self.end_pos - self.start_pos
    }

    /// Width of the char-offset span. Offsets are inclusive, so this is one
    /// more than the end/start difference.
    pub fn char_len(&self) -> usize {
        self.end_offset.char_offset().value() - self.start_offset.char_offset().value() + 1
    }

    /// Width of the logical-offset span, inclusive like [`char_len`].
    ///
    /// [`char_len`]: OffsetRegion::char_len
    pub fn logical_len(&self) -> usize {
        self.end_offset.logical().value() - self.start_offset.logical().value() + 1
    }

    /// Whether logical offsets stand still across this region.
    ///
    /// True when the region has char width but its start and end logical
    /// offsets are equal — the situation inside markup runs and at carriage
    /// returns. Note that a one-character region also satisfies this (its
    /// inclusive logical endpoints coincide); every consumer of the flag
    /// tolerates that, because a zero in-region delta shifts nothing.
    pub fn is_skip_region(&self) -> bool {
        self.char_len() > 0 && self.start_offset.logical() == self.end_offset.logical()
    }

    /// Clip this region to the substring window `[window_start, window_end)`
    /// and shift its offsets into the window's position space.
    ///
    /// Positions trimmed from either side move that side's char offset by
    /// the trimmed amount. Logical offsets move the same way except in a
    /// skip region, where they never advanced in the first place and so stay
    /// put. A boundary that is shifted at all is rebuilt from its char and
    /// logical values only; an untrimmed boundary keeps its full group,
    /// byte offset and time alignment included.
    ///
    /// The caller must hand us a window that overlaps this region.
    pub(crate) fn clip_to_window(&self, window_start: usize, window_end: usize) -> Result<Self> {
        let skip = self.is_skip_region();

        let new_start_pos = self.start_pos.saturating_sub(window_start);
        let new_end_pos = (self.end_pos - window_start).min(window_end - window_start);

        let trimmed_from_start = window_start.saturating_sub(self.start_pos);
        let new_start_offset = shift_group(self.start_offset, trimmed_from_start as isize, skip);

        let trimmed_from_end = self.end_pos.saturating_sub(window_end);
        let new_end_offset = shift_group(self.end_offset, -(trimmed_from_end as isize), skip);

        OffsetRegion::new(new_start_pos, new_end_pos, new_start_offset, new_end_offset)
    }
}

/// Shift a region boundary by `shift` positions.
///
/// Char offsets always move; logical offsets move only outside skip regions.
/// A zero shift returns the group untouched, which is also what preserves
/// byte offsets and time alignments on untrimmed boundaries.
fn shift_group(group: OffsetGroup, shift: isize, is_skip_region: bool) -> OffsetGroup {
    if shift == 0 {
        return group;
    }
    let char_offset = CharOffset::new(group.char_offset().value().saturating_add_signed(shift));
    let logical = if is_skip_region {
        group.logical()
    } else {
        LogicalOffset::new(group.logical().value().saturating_add_signed(shift))
    };
    OffsetGroup::new(char_offset, logical)
}

impl fmt::Display for OffsetRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OffsetRegion{{pos: [{}, {}); offsets: [{}, {}]}}",
            self.start_pos, self.end_pos, self.start_offset, self.end_offset
        )
    }
}

#[derive(Deserialize)]
struct RawRegion {
    start_pos: usize,
    end_pos: usize,
    start_offset: OffsetGroup,
    end_offset: OffsetGroup,
}

impl TryFrom<RawRegion> for OffsetRegion {
    type Error = Error;

    fn try_from(raw: RawRegion) -> Result<Self> {
        OffsetRegion::new(raw.start_pos, raw.end_pos, raw.start_offset, raw.end_offset)
    }
}
