// Status bar widget: save indicator, group/member counts, latest notice.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::NoticeLevel;
use crate::tui::theme::Palette;
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [save indicator] [counts] | [notice]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, palette: &Palette) {
    let mut spans = Vec::new();

    let (dot, dot_color) = save_indicator(state.saved, palette);
    spans.push(Span::styled(format!(" {} ", dot), Style::default().fg(dot_color)));

    spans.push(Span::styled(
        counts_label(state),
        Style::default().fg(palette.foreground),
    ));

    if let Some(notice) = &state.notice {
        spans.push(Span::styled(" | ", palette.muted()));
        let color = match notice.level {
            NoticeLevel::Info => palette.success,
            NoticeLevel::Error => palette.error,
        };
        spans.push(Span::styled(notice.text.clone(), Style::default().fg(color)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(palette.text());
    frame.render_widget(paragraph, area);
}

/// Dot and colour showing whether the last write reached storage.
pub fn save_indicator(saved: bool, palette: &Palette) -> (&'static str, Color) {
    if saved {
        ("●", palette.success)
    } else {
        ("●", palette.error)
    }
}

/// e.g. "Random Roster  2 groups, 7 members"
pub fn counts_label(state: &ViewState) -> String {
    let groups = state.groups.len();
    let members: usize = state.groups.iter().map(|g| g.members.len()).sum();
    format!(
        "Random Roster  {} {}, {} {}",
        groups,
        if groups == 1 { "group" } else { "groups" },
        members,
        if members == 1 { "member" } else { "members" },
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
