// Text prompt overlay for names and file paths.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::quit_confirm::centered_rect;
use crate::tui::theme::Palette;
use crate::tui::{Prompt, PromptKind};

const PROMPT_WIDTH: u16 = 50;
const PROMPT_HEIGHT: u16 = 4;

pub fn render(frame: &mut Frame, area: Rect, prompt: &Prompt, palette: &Palette) {
    let dialog_area = centered_rect(PROMPT_WIDTH, PROMPT_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(true))
        .title(Span::styled(format!(" {} ", prompt.kind.title()), palette.heading()));

    let lines = vec![
        Line::from(vec![
            Span::styled("> ", palette.heading()),
            Span::styled(prompt.text.as_str(), palette.text()),
            Span::styled("_", palette.muted()),
        ]),
        Line::from(Span::styled(hint(prompt.kind), palette.muted())),
    ];

    frame.render_widget(Paragraph::new(lines).block(block).style(palette.text()), dialog_area);
}

fn hint(kind: PromptKind) -> &'static str {
    match kind {
        PromptKind::ImportPath(_) => "CSV with names in the first column",
        _ => "Enter to save, Esc to cancel",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::ids::GroupId;

    #[test]
    fn import_prompt_has_csv_hint() {
        assert!(hint(PromptKind::ImportPath(GroupId::new())).contains("CSV"));
        assert!(hint(PromptKind::NewGroup).contains("Esc"));
    }

    #[test]
    fn render_shows_prompt_text() {
        let backend = ratatui::backend::TestBackend::new(80, 12);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let prompt = Prompt {
            kind: PromptKind::NewGroup,
            text: "Design".into(),
        };
        terminal
            .draw(|frame| render(frame, frame.area(), &prompt, &Palette::dark()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("> Design_"));
        assert!(text.contains("New group"));
    }
}
