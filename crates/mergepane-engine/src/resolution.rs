//! Accepting one side of a conflict.
//!
//! A commit replaces the whole region, markers included, with the chosen
//! side's content in one edit. The recorded marker lines are checked against
//! the live text first; any mismatch means the parse is stale and nothing is
//! written.

use std::path::Path;

use crate::document::Document;
use crate::error::{AmbiguousBlock, ResolveError, SourceError};
use crate::markers::{ConflictMarker, MarkerKind};
use crate::navigation::find_containing;
use crate::parsing::{ConflictRegion, Side};
use crate::patch::Patch;
use crate::source::DocumentSource;

/// One accept action; consumed by a single commit.
#[derive(Debug, Clone, Copy)]
pub struct AcceptDecision<'a> {
    pub conflict: &'a ConflictRegion,
    pub side: Side,
}

impl<'a> AcceptDecision<'a> {
    pub fn new(conflict: &'a ConflictRegion, side: Side) -> Self {
        Self { conflict, side }
    }
}

/// Apply a decision to an in-memory document.
pub fn commit_edit(
    decision: &AcceptDecision<'_>,
    document: &mut Document,
) -> Result<Patch, ResolveError> {
    let replacement = replacement(decision, document)?;
    Ok(document.replace_lines(decision.conflict.range, &replacement)?)
}

/// Apply a decision through a document source, guarded by the version the
/// markers were verified at.
pub fn commit_in_source<S: DocumentSource + ?Sized>(
    source: &mut S,
    path: &Path,
    decision: &AcceptDecision<'_>,
) -> Result<Patch, ResolveError> {
    let document = source
        .document(path)
        .ok_or_else(|| SourceError::NotOpen(path.to_path_buf()))?;
    let version = document.version();
    let replacement = replacement(decision, document)?;
    Ok(source.apply_edit(path, version, decision.conflict.range, &replacement)?)
}

/// The side implied by a cursor on `line` of `conflict`.
///
/// Lines up to the first marker after the current block mean current, lines
/// after the splitter mean incoming. The common-ancestors block and the
/// splitter itself are ambiguous and refused.
pub fn side_at_cursor(conflict: &ConflictRegion, line: usize) -> Result<Side, ResolveError> {
    if !conflict.contains_line(line) {
        return Err(ResolveError::NoConflictAtCursor { line });
    }
    if line < conflict.token_after_current().start {
        Ok(Side::Current)
    } else if line > conflict.splitter.start {
        Ok(Side::Incoming)
    } else {
        let block = if line == conflict.splitter.start {
            AmbiguousBlock::Splitter
        } else {
            AmbiguousBlock::CommonAncestors
        };
        log::warn!("accept refused: cursor on line {} is in the {block}", line + 1);
        Err(ResolveError::AmbiguousCursorPosition { line, block })
    }
}

/// The decision implied by a cursor on `line`.
pub fn decision_at_cursor(
    regions: &[ConflictRegion],
    line: usize,
) -> Result<AcceptDecision<'_>, ResolveError> {
    let conflict =
        find_containing(line, regions).ok_or(ResolveError::NoConflictAtCursor { line })?;
    let side = side_at_cursor(conflict, line)?;
    Ok(AcceptDecision { conflict, side })
}

fn replacement(decision: &AcceptDecision<'_>, document: &Document) -> Result<String, ResolveError> {
    let conflict = decision.conflict;
    verify_markers(conflict, document)?;

    let mut text = document.text_in_lines(conflict.section(decision.side).lines);
    // A region closing the document without a line break leaves none behind.
    if document.line_break(conflict.footer.start).is_empty() {
        let keep = text
            .strip_suffix("\r\n")
            .or_else(|| text.strip_suffix('\n'))
            .map(str::len);
        if let Some(keep) = keep {
            text.truncate(keep);
        }
    }
    Ok(text)
}

fn verify_markers(conflict: &ConflictRegion, document: &Document) -> Result<(), ResolveError> {
    let mut expected = vec![(
        conflict.header.start,
        MarkerKind::Header,
        conflict.current.label.as_deref(),
    )];
    expected.extend(
        conflict
            .common_ancestors
            .iter()
            .map(|s| (s.header.start, MarkerKind::CommonAncestors, s.label.as_deref())),
    );
    expected.push((conflict.splitter.start, MarkerKind::Splitter, None));
    expected.push((
        conflict.footer.start,
        MarkerKind::Footer,
        conflict.incoming.label.as_deref(),
    ));

    for (line, kind, label) in expected {
        let text = document.line_text(line).unwrap_or_default();
        let matches = ConflictMarker::sig(&text) == Some(kind)
            && (kind == MarkerKind::Splitter || ConflictMarker::label(&text, kind) == label);
        if !matches {
            log::warn!(
                "{}: expected {kind:?} marker at line {}, parse is stale",
                document.path().display(),
                line + 1
            );
            return Err(ResolveError::StaleRange { line, expected: kind });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::rope::LineRange;
    use crate::parsing::{parse_conflicts, parse_str};
    use crate::source::Workspace;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const SIMPLE: &str = "a\n<<<<<<< HEAD\nfoo\n=======\nbar\n>>>>>>> branch\nb\n";
    const DIFF3: &str = "<<<<<<< ours\n1\n||||||| base\n0\n=======\n2\n>>>>>>> theirs\n";

    fn accept(text: &str, side: Side) -> String {
        let mut doc = Document::new("f.txt", text);
        let regions = parse_conflicts(doc.rope());
        commit_edit(&AcceptDecision::new(&regions[0], side), &mut doc).unwrap();
        doc.text()
    }

    #[rstest]
    #[case::current(SIMPLE, Side::Current, "a\nfoo\nb\n")]
    #[case::incoming(SIMPLE, Side::Incoming, "a\nbar\nb\n")]
    #[case::drops_ancestors(DIFF3, Side::Current, "1\n")]
    #[case::empty_side("x\n<<<<<<< a\n=======\ny\n>>>>>>> b\nz\n", Side::Current, "x\nz\n")]
    #[case::no_trailing_newline("<<<<<<< a\n1\n=======\n2\n>>>>>>> b", Side::Incoming, "2")]
    #[case::crlf("<<<<<<< a\r\n1\r\n=======\r\n2\r\n>>>>>>> b\r\nz", Side::Current, "1\r\nz")]
    fn committed_text(#[case] text: &str, #[case] side: Side, #[case] expected: &str) {
        assert_eq!(accept(text, side), expected);
    }

    #[test]
    fn commit_leaves_no_conflict_behind() {
        let text = format!("{SIMPLE}{SIMPLE}");
        let mut doc = Document::new("f.txt", &text);
        let regions = parse_conflicts(doc.rope());
        assert_eq!(regions.len(), 2);

        let decision = AcceptDecision::new(&regions[1], Side::Incoming);
        let patch = commit_edit(&decision, &mut doc).unwrap();
        assert_eq!(patch.version, doc.version());

        let after = parse_conflicts(doc.rope());
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].range, regions[0].range);
        assert_eq!(doc.text(), format!("{SIMPLE}a\nbar\nb\n"));
    }

    #[test]
    fn stale_region_is_refused() {
        let mut doc = Document::new("f.txt", SIMPLE);
        let regions = parse_conflicts(doc.rope());
        doc.replace_lines(LineRange::line(0), "a\nextra\n").unwrap();

        let decision = AcceptDecision::new(&regions[0], Side::Current);
        let err = commit_edit(&decision, &mut doc).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::StaleRange {
                line: 1,
                expected: MarkerKind::Header
            }
        ));
        assert_eq!(
            doc.text(),
            "a\nextra\n<<<<<<< HEAD\nfoo\n=======\nbar\n>>>>>>> branch\nb\n"
        );
    }

    #[test]
    fn relabelled_footer_is_stale() {
        let mut doc = Document::new("f.txt", SIMPLE);
        let regions = parse_conflicts(doc.rope());
        doc.replace_lines(LineRange::line(5), ">>>>>>> other\n").unwrap();

        let decision = AcceptDecision::new(&regions[0], Side::Current);
        let err = commit_edit(&decision, &mut doc).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::StaleRange {
                expected: MarkerKind::Footer,
                ..
            }
        ));
    }

    #[test]
    fn commit_in_source_uses_verified_version() {
        let mut ws = Workspace::new();
        ws.insert(Document::new("f.txt", SIMPLE));
        let path = Path::new("f.txt");
        let regions = parse_conflicts(ws.document(path).unwrap().rope());

        let decision = AcceptDecision::new(&regions[0], Side::Current);
        commit_in_source(&mut ws, path, &decision).unwrap();
        assert_eq!(ws.document(path).unwrap().text(), "a\nfoo\nb\n");

        // The same decision again finds no header where it expects one.
        let again = commit_in_source(&mut ws, path, &decision);
        assert!(matches!(again, Err(ResolveError::StaleRange { .. })));
    }

    #[test]
    fn commit_in_source_requires_open_document() {
        let regions = parse_str(SIMPLE);
        let mut ws = Workspace::new();
        let err = commit_in_source(
            &mut ws,
            Path::new("missing.txt"),
            &AcceptDecision::new(&regions[0], Side::Current),
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::Source(SourceError::NotOpen(_))));
    }

    #[rstest]
    #[case::header(0, Some(Side::Current))]
    #[case::current(1, Some(Side::Current))]
    #[case::ancestors_marker(2, None)]
    #[case::ancestors(3, None)]
    #[case::splitter(4, None)]
    #[case::incoming(5, Some(Side::Incoming))]
    #[case::footer(6, Some(Side::Incoming))]
    fn cursor_side(#[case] line: usize, #[case] expected: Option<Side>) {
        let regions = parse_str(DIFF3);
        assert_eq!(side_at_cursor(&regions[0], line).ok(), expected);
    }

    #[test]
    fn ambiguous_positions_name_the_block() {
        let regions = parse_str(DIFF3);
        assert!(matches!(
            side_at_cursor(&regions[0], 3),
            Err(ResolveError::AmbiguousCursorPosition {
                block: AmbiguousBlock::CommonAncestors,
                ..
            })
        ));
        assert!(matches!(
            side_at_cursor(&regions[0], 4),
            Err(ResolveError::AmbiguousCursorPosition {
                block: AmbiguousBlock::Splitter,
                ..
            })
        ));
    }

    #[test]
    fn decision_outside_any_region() {
        let regions = parse_str(SIMPLE);
        assert!(matches!(
            decision_at_cursor(&regions, 0),
            Err(ResolveError::NoConflictAtCursor { line: 0 })
        ));
        let decision = decision_at_cursor(&regions, 4).unwrap();
        assert_eq!(decision.side, Side::Incoming);
        assert_eq!(decision.conflict.range, LineRange::new(1, 6));
    }
}
