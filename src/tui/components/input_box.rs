//! # InputBox Component
//!
//! Multi-line question editor under the message list.
//!
//! ## Responsibilities
//!
//! - Capture text input (typing, paste, newlines via Shift/Ctrl+Enter)
//! - Cursor movement across wrapped rows
//! - Emit `Submit` on Enter
//!
//! The buffer is NOT cleared on submit: the question stays visible until the
//! answer arrives, and the parent calls [`InputBox::clear`] once it does. A
//! failed question therefore keeps its text for a retry.
//!
//! ## Layout
//!
//! The buffer is split into rows once per call by [`wrap_rows`]. Rendering,
//! cursor placement and vertical movement all read the same rows, so the
//! cursor always lands where the text is drawn.

use std::ops::Range;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

/// Border (2) + padding (2) consumed horizontally by the block
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders
const VERTICAL_OVERHEAD: u16 = 2;
/// Rows shown before the box starts scrolling internally
const MAX_VISIBLE_ROWS: u16 = 6;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Enter pressed with a non-blank buffer
    Submit(String),
    ContentChanged,
}

/// Question editor.
///
/// # Props
///
/// - `disabled`: an answer is pending; typing and submit are ignored
/// - `palette`: colours for the current theme
///
/// # State
///
/// - `buffer`, `cursor` (byte offset into `buffer`), `scroll` (first visible row)
pub struct InputBox {
    pub buffer: String,
    pub disabled: bool,
    pub focused: bool,
    pub palette: Palette,
    cursor: usize,
    scroll: u16,
    /// Width from the last render, used for vertical cursor movement.
    last_width: u16,
}

impl InputBox {
    pub fn new(palette: Palette) -> Self {
        Self {
            buffer: String::new(),
            disabled: false,
            focused: true,
            palette,
            cursor: 0,
            scroll: 0,
            last_width: 0,
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.scroll = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Box height for the current buffer at `width`, borders included.
    pub fn calculate_height(&self, width: u16) -> u16 {
        let rows = wrap_rows(&self.buffer, inner_width(width)).len() as u16;
        rows.clamp(1, MAX_VISIBLE_ROWS) + VERTICAL_OVERHEAD
    }

    fn insert(&mut self, text: &str) -> Option<InputEvent> {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
        Some(InputEvent::ContentChanged)
    }

    /// Move the cursor one row up (`-1`) or down (`1`), keeping its column.
    fn move_vertically(&mut self, direction: isize) -> bool {
        let rows = wrap_rows(&self.buffer, inner_width(self.last_width));
        let current = row_of(&rows, self.cursor);
        let Some(target) = current.checked_add_signed(direction) else {
            return false;
        };
        let Some(target_row) = rows.get(target) else {
            return false;
        };
        let column = self.buffer[rows[current].start..self.cursor].width();
        self.cursor = offset_at_column(&self.buffer, target_row.clone(), column);
        true
    }

    fn line_start(&self) -> usize {
        self.buffer[..self.cursor].rfind('\n').map_or(0, |i| i + 1)
    }

    fn line_end(&self) -> usize {
        self.buffer[self.cursor..]
            .find('\n')
            .map_or(self.buffer.len(), |i| self.cursor + i)
    }

    fn scroll_to_cursor(&mut self, rows: &[Range<usize>]) {
        let total = rows.len() as u16;
        if total <= MAX_VISIBLE_ROWS {
            self.scroll = 0;
            return;
        }
        let line = row_of(rows, self.cursor) as u16;
        if line < self.scroll {
            self.scroll = line;
        } else if line >= self.scroll + MAX_VISIBLE_ROWS {
            self.scroll = line + 1 - MAX_VISIBLE_ROWS;
        }
        self.scroll = self.scroll.min(total - MAX_VISIBLE_ROWS);
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.last_width = area.width;
        let width = inner_width(area.width);
        let rows = wrap_rows(&self.buffer, width);
        self.scroll_to_cursor(&rows);

        let palette = self.palette;
        let (title, border) = if self.disabled {
            (" Waiting for answer… ", palette.dim())
        } else if self.focused {
            (" Ask a question ", Style::default().fg(palette.accent))
        } else {
            (" Ask a question ", Style::default().fg(palette.border))
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(title)
            .title_bottom(
                Line::from(Span::styled(" Enter send  Shift+Enter newline ", palette.dim()))
                    .right_aligned(),
            )
            .padding(Padding::horizontal(1));

        let lines: Vec<Line> = if self.buffer.is_empty() {
            vec![Line::from(Span::styled(
                "Type your question…",
                palette.dim(),
            ))]
        } else {
            let style = if self.disabled {
                palette.dim()
            } else {
                palette.text()
            };
            rows.iter()
                .skip(self.scroll as usize)
                .take(MAX_VISIBLE_ROWS as usize)
                .map(|row| Line::from(Span::styled(self.buffer[row.clone()].to_string(), style)))
                .collect()
        };
        frame.render_widget(Paragraph::new(lines).block(block), area);

        if self.focused && !self.disabled && width > 0 {
            let row = row_of(&rows, self.cursor);
            let column = (self.buffer[rows[row].start..self.cursor].width() as u16).min(width);
            let visible_row = (row as u16).saturating_sub(self.scroll);
            frame.set_cursor_position((area.x + 2 + column, area.y + 1 + visible_row));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.disabled {
            return None;
        }
        match event {
            TuiEvent::InputChar(c) => {
                let mut encoded = [0u8; 4];
                self.insert(c.encode_utf8(&mut encoded))
            }
            TuiEvent::Paste(text) => {
                let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
                self.insert(&normalized)
            }
            TuiEvent::Backspace => {
                let prev = prev_char_boundary(&self.buffer, self.cursor)?;
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete => {
                let next = next_char_boundary(&self.buffer, self.cursor)?;
                self.buffer.drain(self.cursor..next);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft => {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor)?;
                None
            }
            TuiEvent::CursorRight => {
                self.cursor = next_char_boundary(&self.buffer, self.cursor)?;
                None
            }
            TuiEvent::CursorUp => {
                self.move_vertically(-1);
                None
            }
            TuiEvent::CursorDown => {
                self.move_vertically(1);
                None
            }
            TuiEvent::CursorHome => {
                self.cursor = self.line_start();
                None
            }
            TuiEvent::CursorEnd => {
                self.cursor = self.line_end();
                None
            }
            TuiEvent::Submit => {
                let text = self.buffer.trim();
                if text.is_empty() {
                    None
                } else {
                    Some(InputEvent::Submit(text.to_string()))
                }
            }
            _ => None,
        }
    }
}

fn inner_width(width: u16) -> u16 {
    width.saturating_sub(HORIZONTAL_OVERHEAD)
}

fn wrap_options(width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Split `text` into display rows as byte ranges.
///
/// Every `\n` starts a new row (a trailing one yields an empty last row).
/// Long lines are word-wrapped by textwrap; each wrapped piece is located in
/// the source so rows always index into `text`. Whitespace trimmed at a wrap
/// point belongs to no row.
pub fn wrap_rows(text: &str, width: u16) -> Vec<Range<usize>> {
    let mut rows = Vec::new();
    let mut line_start = 0;
    for line in text.split('\n') {
        if width == 0 || line.is_empty() {
            rows.push(line_start..line_start + line.len());
        } else {
            let mut offset = 0;
            for piece in textwrap::wrap(line, wrap_options(width)) {
                let start = line[offset..]
                    .find(piece.as_ref())
                    .map_or(offset, |i| offset + i);
                offset = (start + piece.len()).min(line.len());
                rows.push(line_start + start..line_start + offset);
            }
        }
        line_start += line.len() + 1;
    }
    rows
}

/// Index of the row holding byte offset `pos`.
fn row_of(rows: &[Range<usize>], pos: usize) -> usize {
    rows.iter().rposition(|r| r.start <= pos).unwrap_or(0)
}

/// Byte offset within `row` closest to display column `column`.
fn offset_at_column(text: &str, row: Range<usize>, column: usize) -> usize {
    let mut used = 0;
    for (i, c) in text[row.clone()].char_indices() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > column {
            return row.start + i;
        }
        used += w;
    }
    row.end
}

fn prev_char_boundary(text: &str, pos: usize) -> Option<usize> {
    text[..pos].char_indices().next_back().map(|(i, _)| i)
}

fn next_char_boundary(text: &str, pos: usize) -> Option<usize> {
    text[pos..].chars().next().map(|c| pos + c.len_utf8())
}
