// Activity widget: activity picker, numeric argument, and run hint.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use roster_core::activity::Activity;

use crate::tui::theme::Palette;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, palette: &Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(false))
        .title(Span::styled(" Activity ", palette.heading()));

    let mut tabs = Vec::new();
    for activity in Activity::ALL {
        let style = if activity == state.activity {
            palette.selected()
        } else {
            Style::default().fg(palette.foreground)
        };
        tabs.push(Span::styled(
            format!("[{}] {}", activity_key(activity), activity.label()),
            style,
        ));
        tabs.push(Span::raw(" "));
    }

    let mut lines = vec![Line::from(tabs)];
    lines.push(Line::from(Span::styled(eligible_label(state), palette.muted())));
    if let Some(label) = number_label(state) {
        lines.push(Line::from(Span::styled(label, palette.text())));
    }
    lines.push(Line::from(vec![
        Span::styled("Enter", palette.heading()),
        Span::styled(format!(": {}", state.activity.action_text()), palette.text()),
    ]));

    frame.render_widget(Paragraph::new(lines).block(block).style(palette.text()), area);
}

/// Shortcut key that selects an activity.
pub fn activity_key(activity: Activity) -> char {
    match activity {
        Activity::Shuffle => 's',
        Activity::Sort => 'o',
        Activity::Pairs => 'p',
        Activity::Random => 'r',
    }
}

/// How many members the next run will draw from.
pub fn eligible_label(state: &ViewState) -> String {
    match state.current_group() {
        Some(group) => {
            let active = group.members.len() - group.excluded_count();
            format!("{} of {} members eligible", active, group.members.len())
        }
        None => "No group selected".to_string(),
    }
}

/// e.g. "Teams: 3 (2-5)", or None for activities without an argument.
pub fn number_label(state: &ViewState) -> Option<String> {
    let name = match state.activity {
        Activity::Shuffle => "Teams",
        Activity::Random => "Members to pick",
        Activity::Sort | Activity::Pairs => return None,
    };
    let members = state.current_group().map_or(0, |g| g.members.len());
    let bounds = state.activity.number_bounds(members);
    Some(format!(
        "{}: {}  ({}-{}, +/- to change)",
        name,
        state.number,
        bounds.start(),
        bounds.end()
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
