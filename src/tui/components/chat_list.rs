//! # Chat List Component
//!
//! Sidebar with every chat, newest last, the selected one highlighted.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `ChatListState` lives in `TuiState` (list scroll, delete confirmation)
//! - `ChatList` is created each frame with the chats as props
//!
//! Deleting takes two presses of `d` (or Ctrl+D); any other key disarms it.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState, Padding, Paragraph};

use crate::core::models::Chat;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

/// Events emitted by the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatListEvent {
    Move(isize),
    Delete(String),
    NewChat,
    /// Enter: jump to the input box.
    Open,
}

/// Persistent sidebar state.
#[derive(Default)]
pub struct ChatListState {
    /// Selected chat id (prop synced from the session every frame).
    pub selected_id: Option<String>,
    /// Chat armed for deletion by a first `d` press.
    pub confirm_delete: Option<String>,
    list_state: ListState,
}

impl ChatListState {
    pub fn new() -> Self {
        Self::default()
    }

    fn request_delete(&mut self) -> Option<ChatListEvent> {
        let id = self.selected_id.clone()?;
        if self.confirm_delete.as_deref() == Some(id.as_str()) {
            self.confirm_delete = None;
            Some(ChatListEvent::Delete(id))
        } else {
            self.confirm_delete = Some(id);
            None
        }
    }
}

impl EventHandler for ChatListState {
    type Event = ChatListEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let is_delete = matches!(event, TuiEvent::InputChar('d') | TuiEvent::DeleteChat);
        if !is_delete {
            self.confirm_delete = None;
        }

        match event {
            TuiEvent::CursorUp | TuiEvent::InputChar('k') => Some(ChatListEvent::Move(-1)),
            TuiEvent::CursorDown | TuiEvent::InputChar('j') => Some(ChatListEvent::Move(1)),
            TuiEvent::CursorHome => Some(ChatListEvent::Move(isize::MIN / 2)),
            TuiEvent::CursorEnd => Some(ChatListEvent::Move(isize::MAX / 2)),
            TuiEvent::Submit => Some(ChatListEvent::Open),
            TuiEvent::InputChar('n') | TuiEvent::NewChat => Some(ChatListEvent::NewChat),
            TuiEvent::InputChar('d') | TuiEvent::DeleteChat => self.request_delete(),
            _ => None,
        }
    }
}

/// Transient render wrapper for the sidebar.
pub struct ChatList<'a> {
    pub state: &'a mut ChatListState,
    pub chats: &'a [Chat],
    pub focused: bool,
    pub loaded: bool,
    pub palette: Palette,
}

impl Component for ChatList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let palette = self.palette;
        let border = if self.focused {
            Style::default().fg(palette.accent)
        } else {
            Style::default().fg(palette.border)
        };
        let hint = if self.state.confirm_delete.is_some() {
            Line::from(Span::styled(" d again to delete ", palette.error_style()))
        } else {
            Line::from(Span::styled(" n new  d delete ", palette.dim()))
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(Span::styled(" Chats ", palette.title()))
            .title_bottom(hint.centered())
            .padding(Padding::horizontal(1));

        if self.chats.is_empty() {
            let text = if self.loaded { "No chats yet." } else { "Loading..." };
            frame.render_widget(Paragraph::new(text).style(palette.dim()).block(block), area);
            return;
        }

        let selected = self
            .state
            .selected_id
            .as_deref()
            .and_then(|id| self.chats.iter().position(|c| c.id == id));
        self.state.list_state.select(selected);

        let inner_width = area.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = self
            .chats
            .iter()
            .map(|chat| {
                let armed = self.state.confirm_delete.as_deref() == Some(chat.id.as_str());
                let style = if armed {
                    palette.error_style()
                } else {
                    palette.text()
                };
                let date = chat.created_at.format("%b %d").to_string();
                let title_width = inner_width.saturating_sub(date.len() + 1);
                let title = truncate(chat.display_title(), title_width);
                let pad = title_width.saturating_sub(unicode_width::UnicodeWidthStr::width(
                    title.as_str(),
                ));
                ListItem::new(Line::from(vec![
                    Span::styled(title, style),
                    Span::raw(" ".repeat(pad + 1)),
                    Span::styled(date, palette.dim()),
                ]))
            })
            .collect();

        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .bg(palette.selection_bg)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }
}

/// Truncate to `max` display columns, ending with "…" when cut.
pub fn truncate(s: &str, max: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    if unicode_width::UnicodeWidthStr::width(s) <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
