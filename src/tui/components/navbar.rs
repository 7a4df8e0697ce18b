//! # Navbar Component
//!
//! Single-line bar across the top: app name, backend, who is signed in and
//! the active theme, with the sign-in/out chord on the right.
//!
//! Stateless: every field is a prop filled from `App` each frame.
//!
//! ```text
//!  Chatdesk │ http://localhost:8000 │ Ada Lovelace │ dark
//! ```

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::config::Theme;
use crate::tui::component::Component;
use crate::tui::theme::Palette;

pub struct Navbar<'a> {
    pub api: &'a str,
    /// Display name of the signed-in user, `None` when signed out.
    pub user: Option<&'a str>,
    pub theme: Theme,
    pub palette: Palette,
}

impl Component for Navbar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let sep = Span::styled(" │ ", self.palette.dim());
        let user = match self.user {
            Some(name) => Span::styled(
                name.to_string(),
                Style::default().fg(self.palette.user).add_modifier(Modifier::BOLD),
            ),
            None => Span::styled("signed out", self.palette.dim()),
        };

        let line = Line::from(vec![
            Span::styled(" Chatdesk", self.palette.title()),
            sep.clone(),
            Span::styled(self.api.to_string(), self.palette.text()),
            sep.clone(),
            user,
            sep,
            Span::styled(self.theme.label(), self.palette.dim()),
        ]);
        frame.render_widget(Paragraph::new(line), area);

        let hint = if self.user.is_some() {
            "^O sign out "
        } else {
            "^L sign in "
        };
        frame.render_widget(
            Paragraph::new(Span::styled(hint, self.palette.dim())).right_aligned(),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::buffer_text;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(navbar: &mut Navbar<'_>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
        terminal.draw(|f| navbar.render(f, f.area())).unwrap();
        buffer_text(&terminal)
    }

    #[test]
    fn test_navbar_shows_user_and_theme() {
        let mut navbar = Navbar {
            api: "http://localhost:8000",
            user: Some("Ada"),
            theme: Theme::Light,
            palette: Palette::for_theme(Theme::Light),
        };
        let text = draw(&mut navbar);
        assert!(text.contains("Chatdesk"));
        assert!(text.contains("http://localhost:8000"));
        assert!(text.contains("Ada"));
        assert!(text.contains("light"));
        assert!(text.contains("^O sign out"));
    }

    #[test]
    fn test_navbar_signed_out() {
        let mut navbar = Navbar {
            api: "http://x",
            user: None,
            theme: Theme::Dark,
            palette: Palette::for_theme(Theme::Dark),
        };
        let text = draw(&mut navbar);
        assert!(text.contains("signed out"));
        assert!(text.contains("^L sign in"));
    }
}
