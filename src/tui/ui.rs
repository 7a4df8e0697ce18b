use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{ChatList, CreateChatDialog, Footer, MessageList, Navbar};
use crate::tui::theme::Palette;
use crate::tui::{Focus, TuiState};

/// Sidebar width in columns (shrinks on narrow terminals).
const SIDEBAR_WIDTH: u16 = 32;

/// ```text
/// ┌ navbar ───────────────────────────────────────┐
/// │ chats     │ messages                          │
/// │           │                                   │
/// │           ├───────────────────────────────────┤
/// │           │ input                             │
/// └ footer ───────────────────────────────────────┘
/// ```
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};

    let palette = Palette::for_theme(app.theme);
    let area = frame.area();
    frame.render_widget(
        ratatui::widgets::Block::new().style(ratatui::style::Style::default().fg(palette.fg)),
        area,
    );

    let [nav_area, body_area, footer_area] =
        Layout::vertical([Length(1), Min(0), Length(1)]).areas(area);
    let sidebar_width = SIDEBAR_WIDTH.min(body_area.width / 3);
    let [sidebar_area, main_area] =
        Layout::horizontal([Length(sidebar_width), Min(0)]).areas(body_area);
    let input_height = tui.input_box.calculate_height(main_area.width);
    let [messages_area, input_area] =
        Layout::vertical([Min(0), Length(input_height)]).areas(main_area);

    Navbar {
        api: &app.api_label,
        user: app.user_label(),
        theme: app.theme,
        palette,
    }
    .render(frame, nav_area);

    ChatList {
        state: &mut tui.chat_list,
        chats: app.session.chats(),
        focused: tui.focus == Focus::Sidebar,
        loaded: app.session.is_loaded(),
        palette,
    }
    .render(frame, sidebar_area);

    let title = app
        .session
        .selected_chat()
        .map(|c| c.display_title())
        .unwrap_or("Chatdesk");
    MessageList {
        state: &mut tui.message_list,
        messages: app.messages.messages(),
        has_chat: app.session.selected_id().is_some(),
        is_loading: app.messages.is_loading(),
        error: app.messages.error(),
        title,
        theme: app.theme,
    }
    .render(frame, messages_area);

    tui.input_box.render(frame, input_area);

    Footer {
        status: &app.status_message,
        error: app.session.error(),
        hints: hints(tui.focus),
        palette,
    }
    .render(frame, footer_area);

    if let Some(dialog) = tui.dialog.as_ref() {
        CreateChatDialog {
            state: dialog,
            palette,
        }
        .render(frame, area);
    }
}

fn hints(focus: Focus) -> &'static str {
    match focus {
        Focus::Sidebar => "↑↓ select  Enter open  Tab input  ^T theme  q quit ",
        Focus::Input => "Tab chats  ^N new  ^R refresh  ^T theme  ^C quit ",
    }
}
