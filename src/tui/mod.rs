//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Effects
//!
//! `update()` returns effects; each one is handed to `Dispatcher::perform` on
//! its own tokio task. The resulting action comes back over an mpsc channel
//! and is fed to `update()` on the next loop turn, so the UI never waits on
//! the network.
//!
//! ## Redraw Strategy
//!
//! - **Busy** (chats, messages or an answer in flight): polls every 50ms so
//!   results show up promptly.
//! - **Idle**: sleeps up to 250ms, only redraws on events or completed work.

mod component;
mod components;
mod event;
mod markdown;
mod theme;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::dispatch::Dispatcher;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{
    ChatListEvent, ChatListState, CreateChatState, DialogEvent, InputBox, InputEvent,
    MessageListState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::theme::Palette;

/// Which pane receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Input,
}

impl Focus {
    fn toggled(self) -> Self {
        match self {
            Focus::Sidebar => Focus::Input,
            Focus::Input => Focus::Sidebar,
        }
    }
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub chat_list: ChatListState,
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub focus: Focus,
    /// New-chat modal (None = hidden)
    pub dialog: Option<CreateChatState>,
    /// Chat whose messages the list was last showing; a change resets scroll.
    shown_chat: Option<String>,
    /// A submitted question is waiting for its answer.
    question_pending: bool,
}

impl TuiState {
    pub fn new(palette: Palette) -> Self {
        Self {
            chat_list: ChatListState::new(),
            message_list: MessageListState::new(),
            input_box: InputBox::new(palette),
            focus: Focus::Input,
            dialog: None,
            shown_chat: None,
            question_pending: false,
        }
    }

    /// Copy the props components need from `App`. Runs before every draw.
    pub fn sync(&mut self, app: &App) {
        let selected = app.session.selected_id().map(str::to_string);
        if selected != self.shown_chat {
            self.message_list.reset();
            self.shown_chat = selected.clone();
        }
        self.chat_list.selected_id = selected;

        self.input_box.palette = Palette::for_theme(app.theme);
        self.input_box.disabled = app.session.is_answering();
        self.input_box.focused = self.focus == Focus::Input && self.dialog.is_none();

        // The session only empties its input once the answer is in. A failed
        // question keeps its text in the box for another try.
        if self.question_pending && !app.session.is_answering() {
            self.question_pending = false;
            if app.session.input().is_empty() {
                self.input_box.clear();
            }
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets Shift+Enter through; terminals without
        // it ignore the request.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste
        );
    }
}

/// Runs `update` and sends every effect off to the dispatcher.
/// Returns true once a quit has been requested.
struct Runner {
    dispatcher: Dispatcher,
    tx: mpsc::Sender<Action>,
}

impl Runner {
    fn apply(&self, app: &mut App, action: Action) -> bool {
        let mut quit = false;
        for effect in update(app, action) {
            if effect == Effect::Quit {
                quit = true;
            } else {
                self.spawn(effect);
            }
        }
        quit
    }

    fn spawn(&self, effect: Effect) {
        debug!("Spawning effect: {:?}", effect);
        let dispatcher = self.dispatcher.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            if let Some(action) = dispatcher.perform(effect).await
                && tx.send(action).is_err()
            {
                warn!("Dropping completed action: receiver gone");
            }
        });
    }
}

pub fn run(config: ResolvedConfig, dispatcher: Dispatcher) -> std::io::Result<()> {
    let mut app = App::from_config(&config);
    let mut tui = TuiState::new(Palette::for_theme(app.theme));

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Completed effects come back over this channel.
    let (tx, rx) = mpsc::channel();
    let runner = Runner { dispatcher, tx };

    let mut should_quit = runner.apply(&mut app, Action::Init);
    let mut needs_redraw = true;

    while !should_quit {
        tui.sync(&app);
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let busy = app.session.is_answering()
            || app.messages.is_loading()
            || !app.session.is_loaded();
        let timeout = if busy {
            Duration::from_millis(50)
        } else {
            Duration::from_millis(250)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(&event, &mut app, &mut tui, &runner) {
                should_quit = true;
                break;
            }
        }

        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            if runner.apply(&mut app, action) {
                should_quit = true;
            }
        }
    }

    info!("Chatdesk shutting down");
    ratatui::restore();
    Ok(())
}

/// Route one terminal event. Returns true if the app should quit.
fn handle_event(event: &TuiEvent, app: &mut App, tui: &mut TuiState, runner: &Runner) -> bool {
    match event {
        TuiEvent::Resize => return false,
        TuiEvent::ForceQuit => return runner.apply(app, Action::Quit),
        _ => {}
    }

    // The modal swallows everything while open.
    if let Some(dialog) = tui.dialog.as_mut() {
        match dialog.handle_event(event) {
            Some(DialogEvent::Create(title)) => {
                tui.dialog = None;
                return runner.apply(app, Action::CreateChat(title));
            }
            Some(DialogEvent::Cancel) => tui.dialog = None,
            None => {}
        }
        return false;
    }

    match event {
        TuiEvent::NewChat => {
            tui.dialog = Some(CreateChatState::new());
            return false;
        }
        TuiEvent::Refresh => {
            return runner.apply(app, Action::Refresh);
        }
        TuiEvent::Login => return runner.apply(app, Action::Login),
        TuiEvent::Logout => return runner.apply(app, Action::Logout),
        TuiEvent::ToggleTheme => return runner.apply(app, Action::ToggleTheme),
        TuiEvent::FocusNext => {
            tui.focus = tui.focus.toggled();
            tui.chat_list.confirm_delete = None;
            return false;
        }
        TuiEvent::Escape => {
            if app.session.error().is_some() {
                return runner.apply(app, Action::DismissError);
            }
            tui.focus = Focus::Sidebar;
            return false;
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(event);
            return false;
        }
        _ => {}
    }

    let delete_chord = matches!(event, TuiEvent::DeleteChat);
    if tui.focus == Focus::Sidebar || delete_chord {
        if tui.focus == Focus::Sidebar && matches!(event, TuiEvent::InputChar('q')) {
            return runner.apply(app, Action::Quit);
        }
        return match tui.chat_list.handle_event(event) {
            Some(ChatListEvent::Move(delta)) => runner.apply(app, Action::MoveSelection(delta)),
            Some(ChatListEvent::Delete(id)) => runner.apply(app, Action::DeleteChat(id)),
            Some(ChatListEvent::NewChat) => {
                tui.dialog = Some(CreateChatState::new());
                false
            }
            Some(ChatListEvent::Open) => {
                tui.focus = Focus::Input;
                false
            }
            None => false,
        };
    }

    match tui.input_box.handle_event(event) {
        Some(InputEvent::Submit(text)) => {
            let quit = runner.apply(app, Action::SubmitQuestion(text));
            tui.question_pending = app.session.is_answering();
            quit
        }
        Some(InputEvent::ContentChanged) | None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Message;
    use crate::test_support::{chat, test_app};

    fn loaded_app() -> App {
        let mut app = test_app();
        update(&mut app, Action::ChatsLoaded(Ok(vec![chat("a", "A"), chat("b", "B")])));
        app
    }

    #[test]
    fn test_sync_resets_scroll_on_chat_change() {
        let mut app = loaded_app();
        let mut tui = TuiState::new(Palette::for_theme(app.theme));
        tui.sync(&app);
        tui.message_list.stick_to_bottom = false;

        update(&mut app, Action::SelectChat("b".into()));
        tui.sync(&app);
        assert!(tui.message_list.stick_to_bottom);
        assert_eq!(tui.chat_list.selected_id.as_deref(), Some("b"));
    }

    #[test]
    fn test_input_cleared_only_after_successful_answer() {
        let mut app = loaded_app();
        let mut tui = TuiState::new(Palette::for_theme(app.theme));
        tui.input_box.buffer = "What is new?".into();

        update(&mut app, Action::SubmitQuestion("What is new?".into()));
        tui.question_pending = app.session.is_answering();
        tui.sync(&app);
        assert!(tui.input_box.disabled);
        assert_eq!(tui.input_box.buffer, "What is new?");

        update(
            &mut app,
            Action::QuestionAnswered {
                chat_id: "a".into(),
                result: Ok(Message::system_reply("a", "Plenty".into())),
            },
        );
        tui.sync(&app);
        assert!(!tui.input_box.disabled);
        assert!(tui.input_box.buffer.is_empty());
    }

    #[test]
    fn test_failed_answer_keeps_input() {
        let mut app = loaded_app();
        let mut tui = TuiState::new(Palette::for_theme(app.theme));
        tui.input_box.buffer = "Retry me".into();

        update(&mut app, Action::SubmitQuestion("Retry me".into()));
        tui.question_pending = app.session.is_answering();
        update(
            &mut app,
            Action::QuestionAnswered {
                chat_id: "a".into(),
                result: Err(crate::api::ApiError::Network("offline".into())),
            },
        );
        tui.sync(&app);
        assert_eq!(tui.input_box.buffer, "Retry me");
        assert!(!tui.question_pending);
    }

    #[test]
    fn test_focus_toggle() {
        assert_eq!(Focus::Input.toggled(), Focus::Sidebar);
        assert_eq!(Focus::Sidebar.toggled(), Focus::Input);
    }
}
