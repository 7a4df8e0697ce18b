//! Modal for naming a new chat. Enter creates, Esc cancels.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    Create(String),
    Cancel,
}

/// Title being typed. Kept in `TuiState` while the dialog is open.
#[derive(Debug, Default)]
pub struct CreateChatState {
    pub title: String,
}

impl CreateChatState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventHandler for CreateChatState {
    type Event = DialogEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar('\n') => None,
            TuiEvent::InputChar(c) => {
                self.title.push(*c);
                None
            }
            TuiEvent::Paste(text) => {
                self.title.extend(text.chars().filter(|c| !c.is_control()));
                None
            }
            TuiEvent::Backspace => {
                self.title.pop();
                None
            }
            // Blank titles are still passed on; the session rejects them with a message.
            TuiEvent::Submit => Some(DialogEvent::Create(self.title.trim().to_string())),
            TuiEvent::Escape => Some(DialogEvent::Cancel),
            _ => None,
        }
    }
}

pub struct CreateChatDialog<'a> {
    pub state: &'a CreateChatState,
    pub palette: Palette,
}

impl Component for CreateChatDialog<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(50, 5, area);
        frame.render_widget(Clear, overlay);

        let palette = self.palette;
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(palette.accent))
            .title(Span::styled(" New chat ", palette.title()))
            .title_bottom(Line::from(Span::styled(" Enter create  Esc cancel ", palette.dim())).centered())
            .padding(Padding::horizontal(1));
        let inner = block.inner(overlay);

        let body = vec![
            Line::from(Span::styled("Title", palette.dim())),
            Line::from(Span::styled(self.state.title.clone(), palette.text())),
        ];
        frame.render_widget(Paragraph::new(body).block(block), overlay);

        let column = (self.state.title.width() as u16).min(inner.width.saturating_sub(1));
        frame.set_cursor_position((inner.x + column, inner.y + 1));
    }
}

/// Rect `percent_x` wide (percentage of `outer`) and `height` rows tall, centered.
fn centered_rect(percent_x: u16, height: u16, outer: Rect) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(middle);
    center
}
