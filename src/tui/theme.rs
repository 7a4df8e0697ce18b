//! Colour palettes for the dark and light themes.
//!
//! Components never hard-code colours; they take a `Palette` prop so the
//! whole UI flips when the theme is toggled.

use ratatui::style::{Color, Modifier, Style};

use crate::core::config::Theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub fg: Color,
    pub muted: Color,
    pub accent: Color,
    pub user: Color,
    pub system: Color,
    pub error: Color,
    pub border: Color,
    pub selection_bg: Color,
    pub code_fg: Color,
    pub code_bg: Color,
    /// Name of the syntect theme used for fenced code blocks.
    pub syntax_theme: &'static str,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                fg: Color::Gray,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                user: Color::Green,
                system: Color::Blue,
                error: Color::Red,
                border: Color::DarkGray,
                selection_bg: Color::Rgb(45, 50, 60),
                code_fg: Color::White,
                code_bg: Color::DarkGray,
                syntax_theme: "base16-ocean.dark",
            },
            Theme::Light => Self {
                fg: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                user: Color::Rgb(0, 110, 50),
                system: Color::Rgb(30, 60, 160),
                error: Color::Rgb(180, 20, 20),
                border: Color::Gray,
                selection_bg: Color::Rgb(220, 225, 235),
                code_fg: Color::Black,
                code_bg: Color::Rgb(235, 235, 235),
                syntax_theme: "InspiredGitHub",
            },
        }
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.fg)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }
}
