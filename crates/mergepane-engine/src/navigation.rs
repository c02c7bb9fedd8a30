//! Cyclic movement between conflict regions.

use crate::error::NavigateError;
use crate::parsing::ConflictRegion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forwards,
    Backwards,
}

/// The region to move to from `cursor_line`.
///
/// Forwards picks the first region starting after the cursor, backwards the
/// last one starting before it; a region containing the cursor is never a
/// target. Without a target the search wraps around to the first or last
/// region. A lone region holding the cursor yields
/// [`NavigateError::NoOtherConflict`].
pub fn find_for_navigation(
    cursor_line: usize,
    regions: &[ConflictRegion],
    direction: Direction,
) -> Result<&ConflictRegion, NavigateError> {
    if regions.is_empty() {
        return Err(NavigateError::NoConflicts);
    }
    if let [only] = regions
        && only.contains_line(cursor_line)
    {
        return Err(NavigateError::NoOtherConflict);
    }

    let found = match direction {
        Direction::Forwards => regions
            .iter()
            .find(|r| r.range.start > cursor_line && !r.contains_line(cursor_line)),
        Direction::Backwards => regions
            .iter()
            .rev()
            .find(|r| r.range.start < cursor_line && !r.contains_line(cursor_line)),
    };
    let wrapped = match direction {
        Direction::Forwards => regions.first(),
        Direction::Backwards => regions.last(),
    };

    found.or(wrapped).ok_or(NavigateError::NoConflicts)
}

pub fn find_next(cursor_line: usize, regions: &[ConflictRegion]) -> Option<&ConflictRegion> {
    find_for_navigation(cursor_line, regions, Direction::Forwards).ok()
}

pub fn find_previous(cursor_line: usize, regions: &[ConflictRegion]) -> Option<&ConflictRegion> {
    find_for_navigation(cursor_line, regions, Direction::Backwards).ok()
}

/// The region whose lines include `cursor_line`.
pub fn find_containing(cursor_line: usize, regions: &[ConflictRegion]) -> Option<&ConflictRegion> {
    regions.iter().find(|r| r.contains_line(cursor_line))
}
