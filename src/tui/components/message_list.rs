//! # MessageList Component
//!
//! Scrollable view of the selected chat's history.
//!
//! ## Responsibilities
//!
//! - Display the messages of the selected chat
//! - Keep the view pinned to the newest message unless the user scrolls up
//! - Cache rendered markdown and heights per message
//! - Show loading, error and empty states
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the message slice (props).
//! Heights are only recomputed for messages whose id, text, width or theme
//! changed.
//!
//! Row positions are kept as `u32`. The scroll canvas is limited to
//! `u16::MAX` rows, so a longer history is drawn from the newest message
//! backwards and the oldest messages that do not fit are left off, with a
//! count in the title bar.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect, Size};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::config::Theme;
use crate::core::models::Message;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageView;
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

/// Tallest canvas `ScrollView` can address.
const CANVAS_MAX_ROWS: u32 = u16::MAX as u32;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// History row shown at canvas row 0 on the last frame.
    canvas_base: u32,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            viewport_height: 0,
            canvas_base: 0,
        }
    }

    /// Jump back to the newest message, e.g. after switching chats.
    pub fn reset(&mut self) {
        self.scroll_state = ScrollViewState::default();
        self.stick_to_bottom = true;
    }

    fn max_offset(&self) -> u16 {
        self.layout
            .canvas_height()
            .saturating_sub(self.viewport_height)
    }

    /// Keep the same history row at the top of the viewport when the canvas
    /// window slides because old messages fell off it.
    fn rebase(&mut self, base: u32) {
        if base == self.canvas_base {
            return;
        }
        let current = self.scroll_state.offset();
        let absolute = self.canvas_base.saturating_add(u32::from(current.y));
        let y = u16::try_from(absolute.saturating_sub(base)).unwrap_or(u16::MAX);
        self.scroll_state.set_offset(Position { x: current.x, y });
        self.canvas_base = base;
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll once the user has scrolled back to the end.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

/// Scrollable message view. Created fresh each frame.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [Message],
    pub has_chat: bool,
    pub is_loading: bool,
    pub error: Option<&'a str>,
    pub title: &'a str,
    pub theme: Theme,
}

impl MessageList<'_> {
    fn placeholder(&self) -> Option<Text<'static>> {
        if !self.has_chat {
            return Some(Text::from("Select or create a chat to get started."));
        }
        if self.messages.is_empty() {
            let text = if self.is_loading {
                "Loading…"
            } else if self.error.is_some() {
                ""
            } else {
                "No messages yet. Ask something below."
            };
            return Some(Text::from(text));
        }
        None
    }
}

impl Component for MessageList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let palette = Palette::for_theme(self.theme);
        let mut block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(ratatui::style::Style::default().fg(palette.border))
            .title(Span::styled(format!(" {} ", self.title), palette.title()));
        if self.is_loading && !self.messages.is_empty() {
            block = block.title_bottom(
                Line::from(Span::styled(" refreshing… ", palette.dim())).right_aligned(),
            );
        }
        let inner = block.inner(area);

        // Error banner on top, history below.
        let banner_height = if self.error.is_some() { 1 } else { 0 };
        let [banner_area, history_area] =
            Layout::vertical([Constraint::Length(banner_height), Constraint::Min(0)]).areas(inner);
        if let Some(error) = self.error {
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(" ✖ ", palette.error_style()),
                    Span::styled(error.to_string(), palette.error_style()),
                ])),
                banner_area,
            );
        }

        if let Some(text) = self.placeholder() {
            frame.render_widget(block, area);
            self.state.layout.clear();
            let [_, middle, _] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(3),
                Constraint::Fill(1),
            ])
            .areas(history_area);
            frame.render_widget(
                Paragraph::new(text)
                    .style(palette.dim())
                    .centered()
                    .wrap(Wrap { trim: true }),
                middle,
            );
            return;
        }

        let content_width = history_area.width.saturating_sub(1); // -1 for the scrollbar
        self.state
            .layout
            .update(self.messages, content_width, self.theme, &palette);
        let layout = &self.state.layout;
        let first = layout.window_start();
        let base = layout.top_of(first);
        let canvas_height = layout.canvas_height();

        if first > 0 {
            block = block.title(
                Line::from(Span::styled(
                    format!(" {first} earlier messages not shown "),
                    palette.dim(),
                ))
                .right_aligned(),
            );
        }
        frame.render_widget(block, area);

        self.state.viewport_height = history_area.height;
        if !self.state.stick_to_bottom {
            self.state.rebase(base);
            self.state.clamp_scroll();
        }
        self.state.canvas_base = base;

        let scroll_offset = base.saturating_add(u32::from(self.state.scroll_state.offset().y));
        let visible = self.state.layout.visible_range(scroll_offset, history_area.height);

        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for i in visible {
            let layout = &self.state.layout;
            let Ok(y) = u16::try_from(layout.top_of(i).saturating_sub(base)) else {
                break;
            };
            let height = u16::try_from(layout.heights[i]).unwrap_or(u16::MAX);
            let rect = Rect::new(0, y, content_width, height.min(canvas_height.saturating_sub(y)));
            let view = MessageView::new(&self.messages[i], &layout.bodies[i], palette);
            scroll_view.render_widget(view, rect);
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }
        frame.render_stateful_widget(scroll_view, history_area, &mut self.state.scroll_state);
    }
}

impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Rendered bodies and heights for the current message list.
///
/// Entries are keyed by message id and text: a refetch that only appends
/// messages keeps every earlier entry, an edited message is laid out again.
#[derive(Default)]
pub struct LayoutCache {
    pub heights: Vec<u32>,
    pub prefix_heights: Vec<u32>,
    pub bodies: Vec<Text<'static>>,
    keys: Vec<(String, String)>,
    content_width: u16,
    theme: Option<Theme>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Number of leading entries still valid for `messages` at this width and theme.
    pub fn reusable_count(&self, messages: &[Message], content_width: u16, theme: Theme) -> usize {
        if self.content_width != content_width || self.theme != Some(theme) {
            return 0;
        }
        self.keys
            .iter()
            .zip(messages)
            .take_while(|((id, text), m)| !id.is_empty() && *id == m.id && *text == m.text)
            .count()
    }

    pub fn update(&mut self, messages: &[Message], content_width: u16, theme: Theme, palette: &Palette) {
        let keep = self.reusable_count(messages, content_width, theme);
        self.heights.truncate(keep);
        self.bodies.truncate(keep);
        self.keys.truncate(keep);

        for message in &messages[keep..] {
            let (body, height) = MessageView::layout(message, content_width, palette);
            self.heights.push(height.min(CANVAS_MAX_ROWS));
            self.bodies.push(body);
            self.keys.push((message.id.clone(), message.text.clone()));
        }
        self.content_width = content_width;
        self.theme = Some(theme);
        self.rebuild_prefix_heights();
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u32, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u32 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// History row where entry `index` starts.
    pub fn top_of(&self, index: usize) -> u32 {
        if index == 0 {
            0
        } else {
            self.prefix_heights.get(index - 1).copied().unwrap_or(0)
        }
    }

    /// First entry that fits on the canvas when filling it from the newest
    /// entry backwards.
    pub fn window_start(&self) -> usize {
        let floor = self.total_height().saturating_sub(CANVAS_MAX_ROWS);
        if floor == 0 {
            return 0;
        }
        let before = self.prefix_heights.partition_point(|&end| end < floor);
        (before + 1).min(self.prefix_heights.len().saturating_sub(1))
    }

    /// Rows from `window_start` to the end; what the scroll canvas holds.
    pub fn canvas_height(&self) -> u16 {
        let rows = self.total_height() - self.top_of(self.window_start());
        u16::try_from(rows).unwrap_or(u16::MAX)
    }

    /// Entries intersecting the viewport, padded by half a screen each way.
    /// `scroll_offset` is a history row, not a canvas row.
    pub fn visible_range(&self, scroll_offset: u32, viewport_height: u16) -> std::ops::Range<usize> {
        let viewport_height = u32::from(viewport_height);
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start.max(self.window_start()).min(end)..end
    }
}
