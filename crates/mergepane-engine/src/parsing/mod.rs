//! # Conflict Parsing
//!
//! Two-phase, single forward pass over a document's lines.
//!
//! ## Parsing Phases
//!
//! 1. **Line Classification** (`classify`): each line is classified into a
//!    `LineClass` holding local facts (span, marker kind, label)
//! 2. **Region Construction** (`builder`): a `ConflictBuilder` state machine
//!    (scanning, in current, in common ancestors, in incoming) emits a
//!    `ConflictRegion` each time a footer closes a well-formed block
//!
//! ## Key Invariants
//!
//! - Output is in document order and a pure function of the text
//! - Malformed or unterminated blocks are dropped, never emitted partially
//! - Section content never includes a marker line

pub mod builder;
pub mod classify;
pub mod rope;
pub mod snapshot;
pub mod types;

#[cfg(test)]
mod tests;

use xi_rope::Rope;

pub use builder::ConflictBuilder;
pub use classify::{LineClass, MarkerLineClassifier};
pub use rope::{LineRange, Span};
pub use types::{ConflictRegion, Section, Side};

/// Parses every well-formed conflict block in the rope.
pub fn parse_conflicts(rope: &Rope) -> Vec<ConflictRegion> {
    let classifier = MarkerLineClassifier;
    let mut builder = ConflictBuilder::new();

    for lr in rope::lines_with_spans(rope) {
        let lc = classifier.classify(&lr);
        builder.push(&lc);
    }

    builder.finish()
}

/// Convenience wrapper over [`parse_conflicts`] for plain strings.
pub fn parse_str(text: &str) -> Vec<ConflictRegion> {
    parse_conflicts(&Rope::from(text))
}
