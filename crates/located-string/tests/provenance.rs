//! End-to-end properties of located strings: construction, slicing,
//! containment and provenance lookups working together.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use located_string::{ByteOffset, CharOffset, Error, LocatedString, OffsetGroup};

const SAMPLE_TEXTS: &[&str] = &[
    "plain text with no markup",
    "ab<i>c</i>d",
    "line one\r\nline two",
    "<doc><p>nested-ish</p></doc>",
    "unicode: héllo wörld €",
    "x",
];

fn hash_of(s: &LocatedString) -> u64 {
    let mut hasher = DefaultHasher::new();
    s.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn construction_round_trips_text() {
    for text in SAMPLE_TEXTS {
        let s = LocatedString::from_text(text, OffsetGroup::at_zero()).unwrap();
        assert_eq!(s.text(), *text);
        assert_eq!(s.len(), text.chars().count());

        let plain = LocatedString::from_plain_text(text, OffsetGroup::matching(40)).unwrap();
        assert_eq!(plain.text(), *text);
    }
}

#[test]
fn substring_text_agrees_with_raw_substring() {
    for text in SAMPLE_TEXTS {
        let s = LocatedString::from_text(text, OffsetGroup::at_zero()).unwrap();
        let len = s.len();
        for (start, end) in [(0, len), (0, 1), (len / 2, len), (len / 3, len / 2 + 1)] {
            if start >= end || end > len {
                continue;
            }
            let located = s.substring_by_position(start, end).unwrap();
            let raw = s.raw_substring_by_position(start, end).unwrap();
            assert_eq!(located.text(), raw, "text {text:?} window [{start}, {end})");
        }
    }
}

#[test]
fn full_range_substring_is_identity() {
    for text in SAMPLE_TEXTS {
        let s = LocatedString::from_text(text, OffsetGroup::at_zero()).unwrap();
        let full = s.substring_by_position(0, s.len()).unwrap();
        assert_eq!(full, s);
        assert_eq!(hash_of(&full), hash_of(&s));
    }
}

#[test]
fn containment_is_reflexive() {
    for text in SAMPLE_TEXTS {
        let s = LocatedString::from_text(text, OffsetGroup::at_zero()).unwrap();
        assert!(s.contains(&s), "text {text:?}");
    }
}

#[test]
fn containment_holds_for_every_substring_window() {
    for text in SAMPLE_TEXTS {
        let s = LocatedString::from_text(text, OffsetGroup::at_zero()).unwrap();
        let len = s.len();
        for start in 0..len {
            for end in (start + 1)..=len {
                let sub = s.substring_by_position(start, end).unwrap();
                assert!(
                    s.contains(&sub),
                    "text {text:?} window [{start}, {end})"
                );
            }
        }
    }
}

#[test]
fn skip_regions_have_zero_logical_width() {
    for text in SAMPLE_TEXTS {
        let s = LocatedString::from_text(text, OffsetGroup::at_zero()).unwrap();
        for region in s.regions() {
            if region.is_skip_region() {
                assert_eq!(
                    region.start_offset().logical(),
                    region.end_offset().logical()
                );
                assert_eq!(region.logical_len(), 1);
            }
        }
    }
}

#[test]
fn markup_example_offsets() {
    let s = LocatedString::from_text("ab<i>c</i>d", OffsetGroup::at_zero()).unwrap();

    // Eleven characters scanned; the tags advanced char offsets but froze
    // logical offsets, leaving 'd' at logical 3 and char 10.
    assert_eq!(s.len(), 11);
    assert_eq!(s.end_char_offset(), CharOffset::new(10));
    assert_eq!(s.end_logical_offset().value(), 3);

    let at_start = s.offset_group_for_char_offset(CharOffset::new(0)).unwrap();
    assert_eq!(at_start.char_offset().value(), 0);
    assert_eq!(at_start.logical().value(), 0);

    // Both tag runs are skip regions.
    let skips: Vec<_> = s
        .regions()
        .iter()
        .filter(|region| region.pos_len() > 1 && region.is_skip_region())
        .collect();
    assert_eq!(skips.len(), 2);
}

#[test]
fn markup_example_region_structure_snapshot() {
    let s = LocatedString::from_text("ab<i>c</i>d", OffsetGroup::at_zero()).unwrap();
    let rendered = s
        .regions()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(rendered, @r"
    OffsetRegion{pos: [0, 2); offsets: [[c0;l0], [c1;l1]]}
    OffsetRegion{pos: [2, 5); offsets: [[c2;l1], [c4;l1]]}
    OffsetRegion{pos: [5, 6); offsets: [[c5;l2], [c5;l2]]}
    OffsetRegion{pos: [6, 10); offsets: [[c6;l2], [c9;l2]]}
    OffsetRegion{pos: [10, 11); offsets: [[c10;l3], [c10;l3]]}
    ");
}

#[test]
fn equal_inputs_build_equal_strings() {
    let initial = OffsetGroup::at_zero().with_byte(ByteOffset::new(0));
    let a = LocatedString::from_text("ab<i>c</i>d", initial).unwrap();
    let b = LocatedString::from_text("ab<i>c</i>d", initial).unwrap();
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));

    let c = LocatedString::from_text("ab<i>x</i>d", initial).unwrap();
    assert_ne!(a, c);
}

#[test]
fn lookup_past_the_end_is_an_error() {
    let s = LocatedString::from_text("ab<i>c</i>d", OffsetGroup::at_zero()).unwrap();
    let err = s
        .offset_group_for_char_offset(CharOffset::new(11))
        .unwrap_err();
    assert_eq!(err, Error::OffsetNotFound(11));
}

#[test]
fn serde_round_trip_preserves_identity() {
    for text in SAMPLE_TEXTS {
        let initial = OffsetGroup::at_zero().with_byte(ByteOffset::new(0));
        let s = LocatedString::from_text(text, initial).unwrap();
        let json = serde_json::to_string(&s).unwrap();
        let back: LocatedString = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s, "text {text:?}");
        assert!(s.contains(&back));
    }
}
