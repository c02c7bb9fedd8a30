//! Parser tests.
//!
//! Renderings use inline `insta` snapshots of [`Snap`]'s text form; structural
//! properties are checked with [`invariants`] on every parse.

use pretty_assertions::assert_eq;
use rstest::rstest;
use xi_rope::Rope;

use crate::parsing::{
    parse_conflicts, parse_str,
    rope::{LineRange, Span},
    snapshot::{invariants, normalize},
};

fn parse_checked(text: &str) -> (Rope, Vec<crate::parsing::ConflictRegion>) {
    let rope = Rope::from(text);
    let regions = parse_conflicts(&rope);
    invariants(&rope, &regions);
    (rope, regions)
}

fn render(text: &str) -> String {
    let (rope, regions) = parse_checked(text);
    normalize(&rope, &regions).to_string()
}

const SIMPLE: &str = "a\n<<<<<<< HEAD\nfoo\n=======\nbar\n>>>>>>> branch\nb\n";

#[test]
fn simple_conflict() {
    insta::assert_snapshot!(render(SIMPLE), @r#"
    region 1..6 splitter 3
      current "HEAD" 2..3 "foo\n"
      incoming "branch" 4..5 "bar\n"
    "#);
}

#[test]
fn diff3_conflict_with_common_ancestors() {
    let text = "<<<<<<< ours\na\n||||||| base\nb\n=======\nc\n>>>>>>> theirs\n";
    insta::assert_snapshot!(render(text), @r#"
    region 0..7 splitter 4
      current "ours" 1..2 "a\n"
      base "base" 3..4 "b\n"
      incoming "theirs" 5..6 "c\n"
    "#);
}

#[test]
fn simple_conflict_ranges() {
    let (rope, regions) = parse_checked(SIMPLE);
    assert_eq!(regions.len(), 1);
    let r = &regions[0];

    assert_eq!(r.range, LineRange::new(1, 6));
    assert_eq!(r.header, LineRange::line(1));
    assert_eq!(r.splitter, LineRange::line(3));
    assert_eq!(r.footer, LineRange::line(5));
    assert!(r.common_ancestors.is_empty());

    assert_eq!(rope.slice_to_cow(r.current.content.start..r.current.content.end), "foo\n");
    assert_eq!(rope.slice_to_cow(r.incoming.content.start..r.incoming.content.end), "bar\n");
    assert_eq!(
        rope.slice_to_cow(r.span.start..r.span.end),
        "<<<<<<< HEAD\nfoo\n=======\nbar\n>>>>>>> branch\n"
    );
    assert_eq!(r.incoming.header, r.footer);
}

#[test]
fn decorator_excludes_final_line_break() {
    let (rope, regions) = parse_checked("<<<<<<< a\none\ntwo\n=======\n>>>>>>> b\n");
    let current = &regions[0].current;
    assert_eq!(
        rope.slice_to_cow(current.decorator.start..current.decorator.end),
        "one\ntwo"
    );
    assert_eq!(current.decorator.start, current.content.start);
}

#[test]
fn empty_sections_are_flagged() {
    let (_, regions) = parse_checked("<<<<<<< a\n=======\n>>>>>>> b\n");
    let r = &regions[0];
    assert!(r.current.is_empty);
    assert!(r.incoming.is_empty);
    assert_eq!(r.current.lines, LineRange::new(1, 1));
    assert_eq!(r.current.content, Span::new(10, 10));
    assert!(r.current.decorator.is_empty());
}

#[test]
fn blank_line_section_is_not_empty() {
    let (_, regions) = parse_checked("<<<<<<< a\n\n=======\nx\n>>>>>>> b\n");
    assert!(!regions[0].current.is_empty);
    assert!(regions[0].current.decorator.is_empty());
}

#[rstest]
#[case::unterminated_header("x\n<<<<<<< HEAD\nfoo\n")]
#[case::unterminated_after_splitter("<<<<<<< HEAD\nfoo\n=======\nbar\n")]
#[case::unterminated_in_ancestors("<<<<<<< HEAD\nfoo\n||||||| base\nbar\n")]
#[case::footer_before_splitter("<<<<<<< HEAD\nfoo\n>>>>>>> b\n")]
#[case::footer_inside_ancestors("<<<<<<< HEAD\nfoo\n||||||| base\n>>>>>>> b\n")]
#[case::stray_splitter("foo\n=======\nbar\n")]
#[case::stray_footer(">>>>>>> b\n")]
#[case::empty_document("")]
#[case::no_markers("just\nsome\ntext\n")]
fn malformed_input_yields_no_regions(#[case] text: &str) {
    let (_, regions) = parse_checked(text);
    assert!(regions.is_empty(), "expected no regions, got {regions:?}");
}

#[test]
fn header_inside_conflict_restarts_the_region() {
    let text = "<<<<<<< a\nx\n<<<<<<< b\ny\n=======\nz\n>>>>>>> c\n";
    insta::assert_snapshot!(render(text), @r#"
    region 2..7 splitter 4
      current "b" 3..4 "y\n"
      incoming "c" 5..6 "z\n"
    "#);
}

#[test]
fn header_inside_ancestors_restarts_the_region() {
    let text = "<<<<<<< a\nx\n||||||| base\n<<<<<<< b\ny\n=======\nz\n>>>>>>> c\n";
    let (_, regions) = parse_checked(text);
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].range, LineRange::new(3, 8));
    assert!(regions[0].common_ancestors.is_empty());
}

#[test]
fn unterminated_block_does_not_hide_earlier_conflict() {
    let text = format!("{SIMPLE}<<<<<<< dangling\nmore\n");
    let (_, regions) = parse_checked(&text);
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].range, LineRange::new(1, 6));
}

#[test]
fn splitter_and_ancestor_lines_inside_incoming_are_content() {
    let text = "<<<<<<< a\nx\n=======\ny\n=======\n||||||| z\n>>>>>>> b\n";
    let (_, regions) = parse_checked(text);
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].splitter, LineRange::line(2));
    assert_eq!(regions[0].incoming.lines, LineRange::new(3, 6));
}

#[test]
fn two_conflicts_in_document_order() {
    let text = format!("{SIMPLE}middle\n{SIMPLE}");
    let (_, regions) = parse_checked(&text);
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0].range, LineRange::new(1, 6));
    assert_eq!(regions[1].range, LineRange::new(9, 14));
}

#[test]
fn windows_line_endings_keep_labels_clean() {
    let text = "<<<<<<< HEAD\r\nfoo\r\n=======\r\nbar\r\n>>>>>>> branch\r\n";
    let (rope, regions) = parse_checked(text);
    let r = &regions[0];
    assert_eq!(r.current.label.as_deref(), Some("HEAD"));
    assert_eq!(r.incoming.label.as_deref(), Some("branch"));
    assert_eq!(rope.slice_to_cow(r.current.content.start..r.current.content.end), "foo\r\n");
    assert_eq!(rope.slice_to_cow(r.current.decorator.start..r.current.decorator.end), "foo");
}

#[test]
fn footer_at_end_of_input_without_line_break() {
    let text = "<<<<<<< a\nx\n=======\ny\n>>>>>>> b";
    let (_, regions) = parse_checked(text);
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].span.end, text.len());
    assert_eq!(regions[0].range, LineRange::new(0, 5));
}

#[test]
fn bare_markers_have_no_labels() {
    let (_, regions) = parse_checked("<<<<<<<\nx\n=======\ny\n>>>>>>>\n");
    assert_eq!(regions[0].current.label, None);
    assert_eq!(regions[0].incoming.label, None);
}

#[test]
fn parsing_is_idempotent() {
    let text = format!("{SIMPLE}\n<<<<<<< a\n||||||| b\n=======\nc\n>>>>>>> d\n");
    assert_eq!(parse_str(&text), parse_str(&text));
    assert_eq!(parse_str(&text).len(), 2);
}

#[test]
fn n_blocks_yield_n_regions() {
    for n in 0..6 {
        let text = SIMPLE.repeat(n);
        let (_, regions) = parse_checked(&text);
        assert_eq!(regions.len(), n);
        for (i, r) in regions.iter().enumerate() {
            assert_eq!(r.range.start, i * 7 + 1);
        }
    }
}
