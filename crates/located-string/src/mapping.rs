//! Construction of the position-to-offset mapping from raw text.
//!
//! A single scan over the input produces the ordered region list. All scan
//! state (tag depth, previous character, running offsets) lives in locals of
//! that scan; nothing is shared or retained.

use located_offsets::{ByteOffset, CharOffset, LogicalOffset, OffsetGroup};

use crate::error::Result;
use crate::region::OffsetRegion;

/// How logical offsets advance while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogicalOffsetRule {
    /// Logical offsets stand still inside `<`..`>` runs and at `\r`.
    ///
    /// Markup detection is a bare open/close counter over angle brackets —
    /// deliberately not a parser. A `<` inside already-open tag content just
    /// deepens the counter and a `>` shallows it; malformed or asymmetric
    /// markup gets whatever the counter says. Downstream offset data depends
    /// on this exact behavior, so it must not be made smarter.
    SkipMarkup,
    /// Logical offsets advance with every character, for input with no
    /// markup semantics.
    TrackCharOffsets,
}

/// Scan `text` and produce the ordered, non-empty region list covering it.
///
/// `initial` supplies the offsets of the first character, and is used
/// verbatim as the first region's start group — including its byte offset
/// and time alignment, when present. Byte offsets are tracked through the
/// scan only when `initial` carries one, advancing by the UTF-8 encoded
/// length of each character. Groups synthesized at region boundaries never
/// carry a time alignment; time values are copied from input, never
/// computed.
///
/// Returns an empty list only for empty `text`, which the caller rejects.
pub(crate) fn compute_regions(
    text: &str,
    initial: OffsetGroup,
    rule: LogicalOffsetRule,
) -> Result<Vec<OffsetRegion>> {
    let skip_markup = rule == LogicalOffsetRule::SkipMarkup;
    let mut regions = Vec::new();

    let mut tag_depth: usize = 0;
    let mut byte_offset = initial.byte().map(ByteOffset::value);
    let mut char_offset = initial.char_offset().value();
    let mut logical_offset = initial.logical().value();

    let mut pos = 0usize;
    let mut start_pos = 0usize;
    let mut just_left_tag = false;
    let mut prev_char = '\0';
    let mut start_group = initial;

    for c in text.chars() {
        let at_boundary = skip_markup
            && pos > 0
            && ((tag_depth == 0 && (c == '<' || prev_char == '\r')) || just_left_tag)
            && !(just_left_tag && c == '<');
        if at_boundary {
            // Close the previous region one character back. Logical offsets
            // sit one behind the running counter unless the counter never
            // moved (still zero) or the previous character was a skipped \r.
            let prev_logical = if logical_offset == 0 || prev_char == '\r' {
                logical_offset
            } else {
                logical_offset - 1
            };
            regions.push(OffsetRegion::new(
                start_pos,
                pos,
                start_group,
                scan_group(byte_offset.map(|b| b - 1), char_offset - 1, prev_logical),
            )?);
            start_pos = pos;
            // A boundary at `<` opens a region whose logical offset has
            // already stopped advancing.
            let start_logical = if c == '<' {
                logical_offset.saturating_sub(1)
            } else {
                logical_offset
            };
            start_group = scan_group(byte_offset, char_offset, start_logical);
        }

        char_offset += 1;
        if let Some(byte) = byte_offset.as_mut() {
            *byte += c.len_utf8();
        }
        if !skip_markup || !(tag_depth > 0 || c == '<' || c == '\r') {
            logical_offset += 1;
        }
        if skip_markup {
            just_left_tag = false;
            if c == '<' {
                tag_depth += 1;
            } else if tag_depth > 0 && c == '>' {
                tag_depth -= 1;
                if tag_depth == 0 {
                    just_left_tag = true;
                }
            }
        }
        prev_char = c;
        pos += 1;
    }

    if pos > start_pos {
        let prev_logical = start_group
            .logical()
            .value()
            .max(logical_offset.saturating_sub(1));
        regions.push(OffsetRegion::new(
            start_pos,
            pos,
            start_group,
            scan_group(byte_offset.map(|b| b - 1), char_offset - 1, prev_logical),
        )?);
    }

    Ok(regions)
}

/// Group synthesized mid-scan: char and logical always, byte when tracked,
/// never a time alignment.
fn scan_group(byte: Option<usize>, char_offset: usize, logical: usize) -> OffsetGroup {
    let group = OffsetGroup::new(CharOffset::new(char_offset), LogicalOffset::new(logical));
    match byte {
        Some(byte) => group.with_byte(ByteOffset::new(byte)),
        None => group,
    }
}
