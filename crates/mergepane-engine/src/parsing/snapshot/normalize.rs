use std::fmt;

use serde::Serialize;
use xi_rope::Rope;

use crate::parsing::{
    rope::{LineRange, slice::preview},
    types::{ConflictRegion, Section},
};

#[derive(Serialize)]
pub struct Snap {
    pub regions: Vec<RegionSnap>,
}

#[derive(Serialize)]
pub struct RegionSnap {
    pub range: (usize, usize),
    pub splitter: usize,
    pub sections: Vec<SectionSnap>,
}

#[derive(Serialize)]
pub struct SectionSnap {
    pub name: &'static str,
    pub label: Option<String>,
    pub lines: (usize, usize),
    pub text: String,
}

pub fn normalize(rope: &Rope, regions: &[ConflictRegion]) -> Snap {
    let regions = regions
        .iter()
        .map(|r| {
            let mut sections = vec![section_snap(rope, "current", &r.current)];
            sections.extend(
                r.common_ancestors
                    .iter()
                    .map(|s| section_snap(rope, "base", s)),
            );
            sections.push(section_snap(rope, "incoming", &r.incoming));

            RegionSnap {
                range: pair(r.range),
                splitter: r.splitter.start,
                sections,
            }
        })
        .collect();

    Snap { regions }
}

fn section_snap(rope: &Rope, name: &'static str, s: &Section) -> SectionSnap {
    SectionSnap {
        name,
        label: s.label.clone(),
        lines: pair(s.lines),
        text: preview(rope, s.content, 60),
    }
}

fn pair(r: LineRange) -> (usize, usize) {
    (r.start, r.end)
}

/// One line per region, one indented line per section:
///
/// ```text
/// region 1..6 splitter 3
///   current "HEAD" 2..3 "foo\n"
/// ```
impl fmt::Display for Snap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in &self.regions {
            writeln!(
                f,
                "region {}..{} splitter {}",
                r.range.0, r.range.1, r.splitter
            )?;
            for s in &r.sections {
                writeln!(
                    f,
                    "  {} {:?} {}..{} {:?}",
                    s.name,
                    s.label.as_deref().unwrap_or(""),
                    s.lines.0,
                    s.lines.1,
                    s.text
                )?;
            }
        }
        Ok(())
    }
}
