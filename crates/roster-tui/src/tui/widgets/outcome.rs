// Outcome widget: renders the latest activity outcome, one layout per kind.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use roster_core::activity::Outcome;
use roster_core::model::Member;

use crate::protocol::OutcomeView;
use crate::tui::theme::Palette;
use crate::tui::widgets::members::initials;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, palette: &Palette) {
    let title = match &state.outcome {
        Some(view) => format!(" {} - {} ", view.activity().label(), view.group_name),
        None => " Result ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(false))
        .title(Span::styled(title, palette.heading()));

    let lines = match &state.outcome {
        Some(view) => outcome_lines(view, palette),
        None => vec![Line::from(Span::styled(
            "  Pick an activity and press Enter.",
            palette.muted(),
        ))],
    };

    let offset = state.scroll_offset.get("outcome").copied().unwrap_or(0);
    let offset = offset.min(lines.len().saturating_sub(1));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(palette.text())
        .wrap(Wrap { trim: false })
        .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0));
    frame.render_widget(paragraph, area);
}

/// Text lines for an outcome.
pub fn outcome_lines<'a>(view: &'a OutcomeView, palette: &Palette) -> Vec<Line<'a>> {
    if view.outcome.member_count() == 0 {
        return vec![Line::from(Span::styled(
            "  No eligible members. Add members or clear exclusions.",
            palette.muted(),
        ))];
    }

    let mut lines = Vec::new();
    match &view.outcome {
        Outcome::Teams(teams) => {
            for (i, team) in teams.iter().enumerate() {
                if i > 0 {
                    lines.push(Line::default());
                }
                lines.push(Line::from(Span::styled(
                    format!("Team {} ({})", i + 1, team.len()),
                    palette.heading(),
                )));
                for member in team {
                    lines.push(member_row("  ", member, palette));
                }
            }
        }
        Outcome::Order(members) => {
            for (i, member) in members.iter().enumerate() {
                lines.push(member_row(&format!("{:>3}. ", i + 1), member, palette));
            }
        }
        Outcome::Pairs(pairs) => {
            for (i, pair) in pairs.iter().enumerate() {
                let mut spans = vec![
                    Span::styled(format!("Pair {}: ", i + 1), palette.heading()),
                    Span::styled(pair.first.name.as_str(), palette.text()),
                ];
                match &pair.second {
                    Some(second) => {
                        spans.push(Span::styled(" & ", palette.muted()));
                        spans.push(Span::styled(second.name.as_str(), palette.text()));
                    }
                    None => spans.push(Span::styled(" (on their own)", palette.muted())),
                }
                lines.push(Line::from(spans));
            }
        }
        Outcome::Selection(members) => {
            lines.push(Line::from(Span::styled(
                format!("Selected {}:", members.len()),
                palette.heading(),
            )));
            for member in members {
                lines.push(member_row("  * ", member, palette));
            }
        }
    }
    lines
}

fn member_row<'a>(prefix: &str, member: &'a Member, palette: &Palette) -> Line<'a> {
    Line::from(vec![
        Span::raw(prefix.to_string()),
        Span::styled(
            format!("[{}] ", initials(&member.name)),
            Style::default().fg(palette.avatar_color(&member.avatar_seed)),
        ),
        Span::styled(member.name.as_str(), palette.text()),
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::ids::GroupId;
    use roster_core::randomize::Pair;

    fn view(outcome: Outcome) -> OutcomeView {
        OutcomeView {
            group_id: GroupId::new(),
            group_name: "Crew".into(),
            outcome,
        }
    }

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn teams_have_headings_and_spacers() {
        let v = view(Outcome::Teams(vec![
            vec![Member::new("Ada"), Member::new("Grace")],
            vec![Member::new("Linus")],
        ]));
        let lines: Vec<String> = outcome_lines(&v, &Palette::dark()).iter().map(plain).collect();
        assert_eq!(lines[0], "Team 1 (2)");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "Team 2 (1)");
        assert!(lines[5].ends_with("Linus"));
    }

    #[test]
    fn order_is_numbered() {
        let v = view(Outcome::Order(vec![Member::new("Ada"), Member::new("Ken")]));
        let lines: Vec<String> = outcome_lines(&v, &Palette::dark()).iter().map(plain).collect();
        assert_eq!(lines[0], "  1. [A ] Ada");
        assert_eq!(lines[1], "  2. [K ] Ken");
    }

    #[test]
    fn odd_pair_is_called_out() {
        let v = view(Outcome::Pairs(vec![
            Pair {
                first: Member::new("A"),
                second: Some(Member::new("B")),
            },
            Pair {
                first: Member::new("C"),
                second: None,
            },
        ]));
        let lines: Vec<String> = outcome_lines(&v, &Palette::dark()).iter().map(plain).collect();
        assert_eq!(lines, vec!["Pair 1: A & B", "Pair 2: C (on their own)"]);
    }

    #[test]
    fn empty_outcome_shows_hint() {
        let v = view(Outcome::Selection(vec![]));
        let lines = outcome_lines(&v, &Palette::dark());
        assert_eq!(lines.len(), 1);
        assert!(plain(&lines[0]).contains("No eligible members"));
    }

    #[test]
    fn render_does_not_panic_with_large_scroll() {
        let backend = ratatui::backend::TestBackend::new(60, 10);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.outcome = Some(view(Outcome::Selection(vec![Member::new("Ada")])));
        state.scroll_offset.insert("outcome".into(), 500);
        terminal
            .draw(|frame| render(frame, frame.area(), &state, &Palette::dark()))
            .unwrap();
    }
}
