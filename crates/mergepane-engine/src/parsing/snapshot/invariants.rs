use xi_rope::Rope;

use crate::markers::{ConflictMarker, MarkerKind};
use crate::parsing::{
    rope::{LineRange, lines_with_spans},
    types::{ConflictRegion, Section},
};

/// Validates parser output invariants.
///
/// Asserts that:
/// - All spans are within rope bounds
/// - Marker lines are strictly ordered inside each region's range
/// - Section ranges never overlap and contain no marker of their region
/// - Regions are in document order and disjoint
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(rope: &Rope, regions: &[ConflictRegion]) {
    let n = rope.len();
    let lines: Vec<_> = lines_with_spans(rope).collect();

    for r in regions {
        assert!(
            r.span.start <= r.span.end && r.span.end <= n,
            "region span out of bounds: {:?} (rope len: {})",
            r.span,
            n
        );
        assert_eq!(r.range.start, r.header.start, "range must start at header");
        assert_eq!(r.range.end, r.footer.end, "range must end at footer");

        let ancestors_start = r.common_ancestors.first().map(|s| s.header.start);
        if let Some(a) = ancestors_start {
            assert!(
                r.header.start < a && a < r.splitter.start,
                "common ancestors marker out of order in {:?}",
                r.range
            );
        }
        assert!(
            r.header.start < r.splitter.start && r.splitter.start < r.footer.end,
            "markers out of order in {:?}",
            r.range
        );

        let mut sections: Vec<&Section> = vec![&r.current];
        sections.extend(r.common_ancestors.iter());
        sections.push(&r.incoming);
        for pair in sections.windows(2) {
            assert!(
                pair[0].lines.end <= pair[1].lines.start,
                "sections overlap: {:?} and {:?}",
                pair[0].lines,
                pair[1].lines
            );
        }

        for s in sections {
            assert!(
                s.content.end <= n && s.decorator.end <= s.content.end,
                "section spans out of bounds: {:?}",
                s
            );
            assert!(
                r.range.start < s.lines.start && s.lines.end < r.range.end,
                "section {:?} not strictly inside {:?}",
                s.lines,
                r.range
            );
            assert_eq!(s.is_empty, s.content.is_empty());
            assert_no_markers(&lines, s.lines, r);
        }
    }

    for pair in regions.windows(2) {
        assert!(
            pair[0].range.end <= pair[1].range.start,
            "regions out of order: {:?} then {:?}",
            pair[0].range,
            pair[1].range
        );
    }
}

fn assert_no_markers(
    lines: &[crate::parsing::rope::LineRef],
    range: LineRange,
    r: &ConflictRegion,
) {
    for lr in &lines[range.start..range.end.min(lines.len())] {
        let kind = ConflictMarker::sig(&lr.text);
        // The incoming block may legitimately repeat splitter or ancestor text.
        let structural = match kind {
            Some(MarkerKind::Header) => true,
            Some(MarkerKind::Footer) => true,
            Some(MarkerKind::Splitter) => lr.index < r.splitter.start,
            Some(MarkerKind::CommonAncestors) => false,
            None => false,
        };
        assert!(
            !structural,
            "marker line {} inside section {:?}",
            lr.index,
            range
        );
    }
}
