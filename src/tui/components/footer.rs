//! # Footer Component
//!
//! Bottom line: the last error if there is one, otherwise the status message,
//! followed by key hints for the focused pane.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;
use crate::tui::theme::Palette;

pub struct Footer<'a> {
    pub status: &'a str,
    pub error: Option<&'a str>,
    pub hints: &'a str,
    pub palette: Palette,
}

impl Component for Footer<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let hints_width = (self.hints.chars().count() as u16 + 1).min(area.width / 2);
        let [left, right] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(hints_width)]).areas(area);

        let message = match self.error {
            Some(error) => Line::from(vec![
                Span::styled(" ✖ ", self.palette.error_style()),
                Span::styled(error.to_string(), self.palette.error_style()),
                Span::styled("  (Esc to dismiss)", self.palette.dim()),
            ]),
            None => Line::from(Span::styled(format!(" {}", self.status), self.palette.text())),
        };
        frame.render_widget(Paragraph::new(message), left);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(self.hints.to_string(), self.palette.dim())))
                .right_aligned(),
            right,
        );
    }
}
