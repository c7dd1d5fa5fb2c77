//! The located string value type.

use std::fmt;
use std::hash::{Hash, Hasher};

use located_offsets::{CharOffset, LogicalOffset, OffsetGroup, OffsetGroupRange, OffsetRange};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mapping::{LogicalOffsetRule, compute_regions};
use crate::region::OffsetRegion;

/// A string that remembers where every character came from.
///
/// A `LocatedString` pairs text with the source offsets of each character,
/// in every coordinate system at once, so that text can be sliced and
/// recombined without losing the relationship between a character and its
/// origin. The mapping is held as an ordered list of [`OffsetRegion`]s
/// covering the string's positions, plus an overall [`OffsetGroupRange`] of
/// bounds.
///
/// Positions and char offsets count Unicode code points. Offsets in the
/// bounds and in region endpoints are inclusive on both ends: a character
/// that came from a single byte at position 12 has start and end byte
/// offset 12, while a three-byte character starting at 14 spans byte
/// offsets 14 through 16.
///
/// Instances are immutable. Every operation that appears to modify one —
/// substring extraction in particular — builds a new, revalidated instance.
/// The structural hash is computed once on demand and cached; the cache is
/// safe to share across threads.
///
/// # Example
///
/// ```rust
/// use located_string::{LocatedString, OffsetGroup};
///
/// let s = LocatedString::from_text("ab<i>c</i>d", OffsetGroup::at_zero()).unwrap();
/// assert_eq!(s.text(), "ab<i>c</i>d");
/// assert_eq!(s.len(), 11);
/// // Char offsets counted every character; logical offsets skipped the tags.
/// assert_eq!(s.end_char_offset().value(), 10);
/// assert_eq!(s.end_logical_offset().value(), 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawLocatedString")]
pub struct LocatedString {
    content: String,
    bounds: OffsetGroupRange,
    regions: Vec<OffsetRegion>,
    /// Code-point length of `content`. Derived; not part of identity.
    #[serde(skip)]
    char_len: usize,
    /// Lazily computed structural hash.
    #[serde(skip)]
    hash: OnceCell<u64>,
}

impl LocatedString {
    /// Build a located string from raw text, computing the mapping with
    /// markup-aware logical offsets: `<`..`>` runs and carriage returns do
    /// not advance the logical offset.
    ///
    /// `initial` gives the offsets of the first character. Byte offsets are
    /// tracked only if `initial` carries one. Fails on empty `text`.
    pub fn from_text(text: &str, initial: OffsetGroup) -> Result<Self> {
        let regions = compute_regions(text, initial, LogicalOffsetRule::SkipMarkup)?;
        Self::from_derived_bounds(text.to_owned(), regions)
    }

    /// Build a located string from text with no markup semantics: logical
    /// offsets advance with char offsets for every character.
    ///
    /// Fails on empty `text`.
    pub fn from_plain_text(text: &str, initial: OffsetGroup) -> Result<Self> {
        let regions = compute_regions(text, initial, LogicalOffsetRule::TrackCharOffsets)?;
        Self::from_derived_bounds(text.to_owned(), regions)
    }

    /// Build a located string from an already-computed mapping.
    ///
    /// Validates every construction invariant: the region list is non-empty,
    /// bounds are ordered and consistent with the first and last regions'
    /// char offsets, and the regions tile positions `[0, len)` exactly.
    pub fn from_parts(
        content: impl Into<String>,
        bounds: OffsetGroupRange,
        regions: Vec<OffsetRegion>,
    ) -> Result<Self> {
        Self::validated(content.into(), bounds, regions)
    }

    fn from_derived_bounds(content: String, regions: Vec<OffsetRegion>) -> Result<Self> {
        let bounds = bounds_from_regions(&regions)?;
        Self::validated(content, bounds, regions)
    }

    fn validated(
        content: String,
        bounds: OffsetGroupRange,
        regions: Vec<OffsetRegion>,
    ) -> Result<Self> {
        let (first, last) = match (regions.first(), regions.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(Error::EmptyRegions),
        };

        if bounds.start().char_offset() > bounds.end().char_offset() {
            return Err(Error::InconsistentBounds(format!(
                "bounds {bounds} are inverted"
            )));
        }
        if bounds.start().char_offset() > first.start_offset().char_offset() {
            return Err(Error::InconsistentBounds(format!(
                "bounds start char offset {} exceeds first region start char offset {}",
                bounds.start().char_offset(),
                first.start_offset().char_offset()
            )));
        }
        if bounds.end().char_offset() > last.end_offset().char_offset() {
            return Err(Error::InconsistentBounds(format!(
                "bounds end char offset {} exceeds last region end char offset {}",
                bounds.end().char_offset(),
                last.end_offset().char_offset()
            )));
        }

        let char_len = content.chars().count();
        if first.start_pos() != 0 {
            return Err(Error::NonContiguousRegions(format!(
                "first region starts at position {}",
                first.start_pos()
            )));
        }
        for pair in regions.windows(2) {
            if pair[1].start_pos() != pair[0].end_pos() {
                return Err(Error::NonContiguousRegions(format!(
                    "region starting at position {} does not continue the region ending at {}",
                    pair[1].start_pos(),
                    pair[0].end_pos()
                )));
            }
        }
        if last.end_pos() != char_len {
            return Err(Error::NonContiguousRegions(format!(
                "regions end at position {} but the string has {} characters",
                last.end_pos(),
                char_len
            )));
        }

        Ok(LocatedString {
            content,
            bounds,
            regions,
            char_len,
            hash: OnceCell::new(),
        })
    }

    /// The text of this located string. This may or may not match the
    /// original source text it came from.
    pub fn text(&self) -> &str {
        &self.content
    }

    /// Length in code points (string positions), not bytes.
    pub fn len(&self) -> usize {
        self.char_len
    }

    /// A located string always covers at least one character.
    pub fn is_empty(&self) -> bool {
        self.char_len == 0
    }

    /// The source offsets this string corresponds to, both ends inclusive.
    pub fn bounds(&self) -> OffsetGroupRange {
        self.bounds
    }

    /// The position/offset regions, in position order.
    pub fn regions(&self) -> &[OffsetRegion] {
        &self.regions
    }

    pub fn start_char_offset(&self) -> CharOffset {
        self.bounds.start().char_offset()
    }

    pub fn end_char_offset(&self) -> CharOffset {
        self.bounds.end().char_offset()
    }

    pub fn start_logical_offset(&self) -> LogicalOffset {
        self.bounds.start().logical()
    }

    pub fn end_logical_offset(&self) -> LogicalOffset {
        self.bounds.end().logical()
    }

    /// The earliest offset group whose char offset matches `offset`.
    ///
    /// The result carries the requested char offset and the logical offset
    /// derived from the covering region — the region's start logical offset
    /// plus the in-region delta, except in a skip region where logical
    /// offsets never advanced. Byte offsets and time alignments are not
    /// reconstructed.
    ///
    /// Fails with [`Error::OffsetNotFound`] when no region covers the
    /// offset. Coverage is tested against the half-open interval from a
    /// region's start char offset to its (inclusive) end char offset, so the
    /// final character of the string is not resolvable — a long-standing
    /// behavior that downstream offset data depends on.
    pub fn offset_group_for_char_offset(&self, offset: CharOffset) -> Result<OffsetGroup> {
        // Linear scan; binary search over region starts if this ever shows
        // up in a profile.
        for region in &self.regions {
            let start = region.start_offset().char_offset();
            let end = region.end_offset().char_offset();
            if start <= offset && offset < end {
                let delta = offset.value() - start.value();
                let logical = if region.is_skip_region() {
                    region.start_offset().logical()
                } else {
                    LogicalOffset::new(region.start_offset().logical().value() + delta)
                };
                return Ok(OffsetGroup::new(offset, logical));
            }
        }
        Err(Error::OffsetNotFound(offset.value()))
    }

    /// Extract the located substring covering positions `[start, end)`.
    ///
    /// This rebuilds the region metadata for the extracted window and is
    /// therefore significantly more expensive than fetching the text alone;
    /// callers who do not need offsets should use
    /// [`raw_substring_by_position`] instead.
    ///
    /// [`raw_substring_by_position`]: LocatedString::raw_substring_by_position
    pub fn substring_by_position(&self, start: usize, end: usize) -> Result<LocatedString> {
        let text = self.raw_substring_by_position(start, end)?.to_owned();
        let regions = self.regions_for_window(start, end)?;
        Self::from_derived_bounds(text, regions)
    }

    /// Extract the located substring covering source char offsets `start`
    /// through `end`, both inclusive.
    ///
    /// As expensive as [`substring_by_position`]; prefer
    /// [`raw_substring_by_char_offsets`] when only the text is needed.
    ///
    /// [`substring_by_position`]: LocatedString::substring_by_position
    /// [`raw_substring_by_char_offsets`]: LocatedString::raw_substring_by_char_offsets
    pub fn substring_by_char_offsets(
        &self,
        start: CharOffset,
        end: CharOffset,
    ) -> Result<LocatedString> {
        let (start_pos, end_pos) = self.positions_for_char_offsets(start, end)?;
        self.substring_by_position(start_pos, end_pos)
    }

    /// Extract the located substring covering an inclusive char-offset
    /// range.
    pub fn substring_by_char_range(&self, range: OffsetRange<CharOffset>) -> Result<LocatedString> {
        self.substring_by_char_offsets(range.start(), range.end())
    }

    /// The text covering positions `[start, end)`, with no offset work.
    pub fn raw_substring_by_position(&self, start: usize, end: usize) -> Result<&str> {
        self.check_position_range(start, end)?;
        let byte_start = self.byte_index_of_position(start);
        let byte_end = self.byte_index_of_position(end);
        Ok(&self.content[byte_start..byte_end])
    }

    /// The text covering source char offsets `start` through `end`, both
    /// inclusive, with no offset work.
    pub fn raw_substring_by_char_offsets(&self, start: CharOffset, end: CharOffset) -> Result<&str> {
        let (start_pos, end_pos) = self.positions_for_char_offsets(start, end)?;
        self.raw_substring_by_position(start_pos, end_pos)
    }

    /// Whether `other` is a verbatim, offset-consistent substring of this
    /// string.
    ///
    /// Absence of containment is an ordinary `false`; this never fails.
    pub fn contains(&self, other: &LocatedString) -> bool {
        other.is_substring_of(self)
    }

    fn is_substring_of(&self, sup: &LocatedString) -> bool {
        let first_char = match self.regions.first() {
            Some(region) => region.start_offset().char_offset(),
            None => return false,
        };
        let sup_start_pos = match sup.position_of_char_offset(first_char) {
            Some(pos) => pos,
            None => return false,
        };
        if sup_start_pos + self.char_len > sup.char_len {
            return false;
        }

        let own_char_offsets = self.bounds.char_offset_range();
        match sup.char_offset_starting_at(sup_start_pos) {
            Some(start) if start == own_char_offsets.start() => {}
            _ => return false,
        }
        match sup.char_offset_ending_at(sup_start_pos + self.char_len) {
            Some(end) if end.value() == own_char_offsets.end().value() + 1 => {}
            _ => return false,
        }

        match sup.raw_substring_by_position(sup_start_pos, sup_start_pos + self.char_len) {
            Ok(window) => window == self.content,
            Err(_) => false,
        }
    }

    /// The first position whose char offset is `offset`, if any.
    fn position_of_char_offset(&self, offset: CharOffset) -> Option<usize> {
        for region in &self.regions {
            if region.start_offset().char_offset() > offset {
                return None;
            }
            if offset <= region.end_offset().char_offset() {
                return Some(
                    region.start_pos() + (offset.value() - region.start_offset().char_offset().value()),
                );
            }
        }
        None
    }

    /// Char offset at which the character at `pos` starts.
    fn char_offset_starting_at(&self, pos: usize) -> Option<CharOffset> {
        let region = &self.regions[self.last_region_starting_at_or_before(pos)];
        if pos < region.start_pos() || pos + 1 > region.end_pos() {
            return None;
        }
        if pos == region.start_pos() {
            Some(region.start_offset().char_offset())
        } else {
            Some(CharOffset::new(
                region.start_offset().char_offset().value() + (pos - region.start_pos()),
            ))
        }
    }

    /// Char offset at which the character at `pos` ends; `pos` may be one
    /// past the final position, yielding one past the final char offset.
    fn char_offset_ending_at(&self, pos: usize) -> Option<CharOffset> {
        let region = &self.regions[self.last_region_starting_at_or_before(pos)];
        if pos < region.start_pos() || pos > region.end_pos() {
            return None;
        }
        if pos + 1 == region.end_pos() {
            Some(region.end_offset().char_offset())
        } else {
            Some(CharOffset::new(
                region.start_offset().char_offset().value() + (pos - region.start_pos()),
            ))
        }
    }

    /// Regions for the substring window `[start, end)`, clipped and shifted
    /// into the window's position space.
    fn regions_for_window(&self, start: usize, end: usize) -> Result<Vec<OffsetRegion>> {
        self.check_position_range(start, end)?;
        let window_len = end - start;
        let mut clipped = Vec::new();
        for region in &self.regions[self.last_region_starting_at_or_before(start)..] {
            debug_assert!(region.start_pos() < end);
            let piece = region.clip_to_window(start, end)?;
            let covered = piece.end_pos() >= window_len;
            clipped.push(piece);
            if covered {
                break;
            }
        }
        Ok(clipped)
    }

    /// Index of the last region whose start position is at or before `pos`.
    fn last_region_starting_at_or_before(&self, pos: usize) -> usize {
        let mut index = 1;
        while index < self.regions.len() && self.regions[index].start_pos() <= pos {
            index += 1;
        }
        index - 1
    }

    fn check_position_range(&self, start: usize, end: usize) -> Result<()> {
        if start >= end || end > self.char_len {
            return Err(Error::InvalidRange {
                start,
                end,
                len: self.char_len,
            });
        }
        Ok(())
    }

    /// Positions for the inclusive source char-offset range `[start, end]`,
    /// relative to this string's bounds.
    fn positions_for_char_offsets(
        &self,
        start: CharOffset,
        end: CharOffset,
    ) -> Result<(usize, usize)> {
        let base = self.bounds.start().char_offset().value();
        let start_pos = start.value().checked_sub(base);
        let end_pos = end.value().checked_sub(base).map(|pos| pos + 1);
        match (start_pos, end_pos) {
            (Some(start_pos), Some(end_pos)) => Ok((start_pos, end_pos)),
            _ => Err(Error::CharOffsetsOutOfBounds {
                start: start.value(),
                end: end.value(),
            }),
        }
    }

    /// Byte index of code-point position `pos`; `pos` may equal the length,
    /// yielding the byte length.
    fn byte_index_of_position(&self, pos: usize) -> usize {
        self.content
            .char_indices()
            .nth(pos)
            .map_or(self.content.len(), |(index, _)| index)
    }

    fn structural_hash(&self) -> u64 {
        *self.hash.get_or_init(|| {
            let mut hasher = std::collections::hash_map::DefaultHasher::new();
            self.content.hash(&mut hasher);
            self.bounds.hash(&mut hasher);
            self.regions.hash(&mut hasher);
            hasher.finish()
        })
    }
}

fn bounds_from_regions(regions: &[OffsetRegion]) -> Result<OffsetGroupRange> {
    match (regions.first(), regions.last()) {
        (Some(first), Some(last)) => Ok(OffsetGroupRange::new(
            first.start_offset(),
            last.end_offset(),
        )),
        _ => Err(Error::EmptyRegions),
    }
}

/// Equality is strict: the same text with the same bounds and exactly the
/// same interior regions. The cached hash serves as a fast reject.
impl PartialEq for LocatedString {
    fn eq(&self, other: &Self) -> bool {
        if self.structural_hash() != other.structural_hash() {
            return false;
        }
        self.bounds == other.bounds
            && self.content == other.content
            && self.regions == other.regions
    }
}

impl Eq for LocatedString {}

impl Hash for LocatedString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.structural_hash());
    }
}

impl fmt::Display for LocatedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LocatedString{{bounds: {}, content: {:?}}}",
            self.bounds, self.content
        )
    }
}

#[derive(Deserialize)]
struct RawLocatedString {
    content: String,
    bounds: OffsetGroupRange,
    regions: Vec<OffsetRegion>,
}

impl TryFrom<RawLocatedString> for LocatedString {
    type Error = Error;

    fn try_from(raw: RawLocatedString) -> Result<Self> {
        LocatedString::from_parts(raw.content, raw.bounds, raw.regions)
    }
}
