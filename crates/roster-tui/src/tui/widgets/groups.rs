// Groups widget: every group with its member count.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use roster_core::model::Group;

use crate::tui::theme::Palette;
use crate::tui::{Focus, ViewState};

/// Render the group list into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, palette: &Palette) {
    let focused = state.focus == Focus::Groups;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(focused))
        .title(Span::styled(" Groups ", palette.heading()));

    if state.groups.is_empty() {
        let hint = Paragraph::new("  No groups yet. Press 'a' to add one.")
            .style(palette.muted())
            .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let items: Vec<ListItem> = state
        .groups
        .iter()
        .map(|group| {
            ListItem::new(Line::from(vec![
                Span::styled(group.name.clone(), palette.text()),
                Span::styled(format!("  {}", member_summary(group)), palette.muted()),
            ]))
        })
        .collect();

    let highlight = if focused {
        palette.selected()
    } else {
        palette.heading()
    };
    let list = List::new(items)
        .block(block)
        .style(palette.text())
        .highlight_style(highlight)
        .highlight_symbol("> ");

    let mut list_state = ListState::default().with_selected(Some(state.selected_group));
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// e.g. "(5, 1 excluded)" or "(3)".
pub fn member_summary(group: &Group) -> String {
    let excluded = group.excluded_count();
    if excluded == 0 {
        format!("({})", group.members.len())
    } else {
        format!("({}, {} excluded)", group.members.len(), excluded)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
