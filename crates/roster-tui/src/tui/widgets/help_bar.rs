// Help bar widget: key hints for the current mode.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::theme::Palette;
use crate::tui::{Focus, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, palette: &Palette) {
    let mut spans = Vec::new();
    for (key, action) in hints(state) {
        spans.push(Span::styled(format!(" {} ", key), palette.heading()));
        spans.push(Span::styled(format!("{} ", action), palette.muted()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).style(palette.text()), area);
}

/// Key/action pairs relevant to the current mode.
pub fn hints(state: &ViewState) -> Vec<(&'static str, &'static str)> {
    if state.confirm_quit {
        return vec![("y", "quit"), ("n", "cancel")];
    }
    if state.prompt.is_some() {
        return vec![("Enter", "save"), ("Esc", "cancel")];
    }
    let add = match state.focus {
        Focus::Groups => "add group",
        Focus::Members => "add member",
    };
    let mut hints = vec![
        ("↑↓", "move"),
        ("Tab", "focus"),
        ("a", add),
        ("e", "rename"),
        ("d", "delete"),
    ];
    if state.focus == Focus::Members {
        hints.push(("x", "exclude"));
    }
    hints.extend([
        ("s/o/p/r", "activity"),
        ("+/-", "number"),
        ("Enter", "run"),
        ("i", "import"),
        ("w", "export"),
        ("t", "theme"),
        ("q", "quit"),
    ]);
    hints
}
