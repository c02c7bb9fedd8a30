use mergepane_engine::{
    Highlight, HighlightKind, Side, merged_highlights, projection_highlights,
    with_leading_padding,
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

pub fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .split(rows[0]);

    // Borders take two rows
    app.scroll_to_cursor(rows[0].height.saturating_sub(2) as usize);

    let conflicts = app.conflicts();
    let padding = app.config.leading_padding;
    let side_offset = app.side_scroll();

    for (side, area) in [(Side::Current, panes[0]), (Side::Incoming, panes[2])] {
        let text = with_leading_padding(app.pane_text(side), padding);
        let highlights: Vec<_> = projection_highlights(&conflicts, side)
            .into_iter()
            .map(|h| h.offset(padding))
            .collect();
        let cursor = app.config.sync_scroll.then_some(app.cursor + padding);
        let title = format!("{side} (read-only)");
        f.render_widget(pane(&text, &highlights, cursor, side_offset, &title), area);
    }

    let merged = app.merged_text();
    let title = format!(
        "{}{}",
        app.path().display(),
        if app.dirty { " [modified]" } else { "" }
    );
    f.render_widget(
        pane(
            &merged,
            &merged_highlights(&conflicts),
            Some(app.cursor),
            app.scroll,
            &title,
        ),
        panes[1],
    );

    let status = app.status.clone().unwrap_or_else(|| {
        format!(
            "line {} of {} | {} conflict(s)",
            app.cursor + 1,
            app.line_count(),
            conflicts.len()
        )
    });
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            status,
            Style::default().fg(Color::Yellow),
        ))),
        rows[1],
    );

    let help_text = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k ↓/j: Move | "),
        Span::raw("n/p: Next/Previous conflict | "),
        Span::raw("c/i: Accept current/incoming | "),
        Span::raw("a: Accept at cursor | "),
        Span::raw("J/K: Scroll sides | "),
        Span::raw("s: Save"),
    ]);
    f.render_widget(Paragraph::new(vec![help_text]), rows[2]);
}

fn pane<'a>(
    text: &'a str,
    highlights: &[Highlight],
    cursor: Option<usize>,
    scroll: usize,
    title: &'a str,
) -> Paragraph<'a> {
    let kinds = line_kinds(text.split('\n').count(), highlights);
    let lines: Vec<Line> = text
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            let mut style = kinds[i].map(style_for).unwrap_or_default();
            if cursor == Some(i) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Line::from(Span::styled(line.trim_end_matches('\r'), style))
        })
        .collect();

    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0))
}

/// The highlight kind of every line, later highlights winning.
fn line_kinds(line_count: usize, highlights: &[Highlight]) -> Vec<Option<HighlightKind>> {
    let mut kinds = vec![None; line_count];
    for h in highlights {
        for line in h.lines.start..h.lines.end.min(line_count) {
            kinds[line] = Some(h.kind);
        }
    }
    kinds
}

fn style_for(kind: HighlightKind) -> Style {
    match kind {
        HighlightKind::Marker(_) => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
        HighlightKind::Current => Style::default().fg(Color::Green),
        HighlightKind::CommonAncestors => Style::default().fg(Color::Magenta),
        HighlightKind::Incoming => Style::default().fg(Color::Cyan),
    }
}
