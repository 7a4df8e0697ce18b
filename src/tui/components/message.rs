use chrono::Local;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::models::Message;
use crate::tui::markdown;
use crate::tui::theme::Palette;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// A single chat message: a rounded box titled with the sender, markdown body
/// inside, local send time in the bottom-right corner.
///
/// # Design
///
/// `MessageView` is a **transient component**. The markdown body is rendered
/// once by [`MessageView::layout`] and cached by the parent `MessageList`
/// together with its height, so scrolling never re-parses markdown.
///
/// User messages get the `user` colour, answers the `system` colour.
#[derive(Clone, Copy)]
pub struct MessageView<'a> {
    pub message: &'a Message,
    /// Pre-rendered markdown body.
    pub body: &'a Text<'static>,
    pub palette: Palette,
}

impl<'a> MessageView<'a> {
    pub fn new(message: &'a Message, body: &'a Text<'static>, palette: Palette) -> Self {
        Self {
            message,
            body,
            palette,
        }
    }

    /// Render the markdown body and measure the box height at `width`.
    ///
    /// The height comes from the same `Paragraph` (same wrap settings) that
    /// is drawn later, so measurement and rendering cannot disagree. It is a
    /// `u32` because a single long answer can outgrow a `u16`.
    pub fn layout(message: &Message, width: u16, palette: &Palette) -> (Text<'static>, u32) {
        let body = markdown::render(message.text.trim(), palette.fg, palette);
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return (body, 1);
        }
        if body.lines.is_empty() {
            return (body, u32::from(VERTICAL_OVERHEAD) + 1);
        }
        let lines = Paragraph::new(body.clone())
            .wrap(Wrap { trim: false })
            .line_count(content_width);
        let height = u32::try_from(lines)
            .unwrap_or(u32::MAX)
            .max(1)
            .saturating_add(u32::from(VERTICAL_OVERHEAD));
        (body, height)
    }

    fn sender_label(&self) -> &'static str {
        if self.message.is_from_user() {
            "you"
        } else {
            "assistant"
        }
    }
}

impl Widget for MessageView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colour = if self.message.is_from_user() {
            self.palette.user
        } else {
            self.palette.system
        };
        let border_style = Style::default().fg(colour);
        let timestamp = self
            .message
            .created_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(Span::styled(
                format!(" {} ", self.sender_label()),
                border_style.add_modifier(Modifier::BOLD),
            ))
            .title_bottom(
                Line::from(Span::styled(format!(" {timestamp} "), self.palette.dim()))
                    .right_aligned(),
            )
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.body.clone())
            .style(self.palette.text())
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
