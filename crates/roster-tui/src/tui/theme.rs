// Colour palettes for the dark and light themes.

use ratatui::style::{Color, Modifier, Style};

use roster_core::config::Theme;

/// Colours every widget draws from.
#[derive(Debug, Clone)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub border_focused: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub accent: Color,
    pub success: Color,
    pub error: Color,
    /// Badge colours, indexed by avatar seed.
    pub avatar: [Color; 8],
}

impl Palette {
    pub fn dark() -> Self {
        Palette {
            background: Color::Black,
            foreground: Color::White,
            muted: Color::DarkGray,
            border: Color::Gray,
            border_focused: Color::Cyan,
            highlight_fg: Color::Black,
            highlight_bg: Color::Cyan,
            accent: Color::Yellow,
            success: Color::Green,
            error: Color::Red,
            avatar: [
                Color::LightRed,
                Color::LightGreen,
                Color::LightYellow,
                Color::LightBlue,
                Color::LightMagenta,
                Color::LightCyan,
                Color::Rgb(255, 165, 0),
                Color::Rgb(180, 140, 255),
            ],
        }
    }

    pub fn light() -> Self {
        Palette {
            background: Color::White,
            foreground: Color::Black,
            muted: Color::Gray,
            border: Color::DarkGray,
            border_focused: Color::Blue,
            highlight_fg: Color::White,
            highlight_bg: Color::Blue,
            accent: Color::Magenta,
            success: Color::Green,
            error: Color::Red,
            avatar: [
                Color::Red,
                Color::Green,
                Color::Rgb(160, 120, 0),
                Color::Blue,
                Color::Magenta,
                Color::Cyan,
                Color::Rgb(200, 90, 0),
                Color::Rgb(100, 60, 180),
            ],
        }
    }

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Palette::dark(),
            Theme::Light => Palette::light(),
        }
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.highlight_fg)
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn heading(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Border style for a panel, brighter when it has keyboard focus.
    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }

    /// Stable badge colour for an avatar seed.
    pub fn avatar_color(&self, seed: &str) -> Color {
        let sum: usize = seed.bytes().map(usize::from).sum();
        self.avatar[sum % self.avatar.len()]
    }
}
