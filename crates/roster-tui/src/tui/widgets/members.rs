// Members widget: members of the selected group with avatar badges and
// exclusion markers.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use roster_core::model::Member;

use crate::tui::theme::Palette;
use crate::tui::{Focus, ViewState};

/// Render the member list of the selected group.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, palette: &Palette) {
    let focused = state.focus == Focus::Members;
    let title = match state.current_group() {
        Some(group) => format!(" Members of {} ", group.name),
        None => " Members ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(focused))
        .title(Span::styled(title, palette.heading()));

    let Some(group) = state.current_group() else {
        frame.render_widget(Paragraph::new("").block(block), area);
        return;
    };
    if group.members.is_empty() {
        let hint = Paragraph::new("  No members. Tab here and press 'a', or 'i' to import.")
            .style(palette.muted())
            .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let items: Vec<ListItem> = group
        .members
        .iter()
        .map(|member| ListItem::new(member_line(member, palette)))
        .collect();

    let list = List::new(items)
        .block(block)
        .style(palette.text())
        .highlight_style(if focused {
            palette.selected()
        } else {
            Style::default()
        })
        .highlight_symbol("> ");

    let selected = focused.then_some(state.selected_member);
    let mut list_state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// One row: `[AB] Name` with the badge coloured by avatar seed, dimmed and
/// struck through when excluded.
pub fn member_line<'a>(member: &'a Member, palette: &Palette) -> Line<'a> {
    let badge = Span::styled(
        format!("[{}]", initials(&member.name)),
        Style::default()
            .fg(palette.avatar_color(&member.avatar_seed))
            .add_modifier(Modifier::BOLD),
    );
    let name_style = if member.excluded {
        palette.muted().add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(palette.foreground)
    };
    let mut spans = vec![badge, Span::raw(" "), Span::styled(member.name.as_str(), name_style)];
    if member.excluded {
        spans.push(Span::styled(" (excluded)", palette.muted()));
    }
    Line::from(spans)
}

/// Up to two uppercase initials from the first two words, padded to a
/// fixed width.
pub fn initials(name: &str) -> String {
    let mut letters: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();
    if letters.is_empty() {
        letters.push('?');
    }
    format!("{:<2}", letters)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
