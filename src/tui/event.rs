use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq)]
pub enum TuiEvent {
    // Global commands (Ctrl chords)
    ForceQuit,
    NewChat,
    DeleteChat,
    Refresh,
    Login,
    Logout,
    ToggleTheme,
    FocusNext,

    // Editing and navigation (routed to the focused component)
    Submit,
    Escape,
    InputChar(char),
    Paste(String), // Bracketed paste - preserves newlines
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    CursorHome,
    CursorEnd,

    // Message list scrolling
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,

    Resize,
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: std::time::Duration) -> Option<TuiEvent> {
    if !event::poll(timeout).ok()? {
        return None;
    }
    translate(event::read().ok()?)
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(std::time::Duration::ZERO)
}

/// Map a raw crossterm event to a `TuiEvent`. Unbound keys map to `None`.
pub fn translate(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key) => translate_key(key),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

fn translate_key(key: KeyEvent) -> Option<TuiEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    log::debug!("Key event: {:?} with modifiers {:?}", key.code, key.modifiers);

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(TuiEvent::ForceQuit),
            KeyCode::Char('n') => Some(TuiEvent::NewChat),
            KeyCode::Char('d') => Some(TuiEvent::DeleteChat),
            KeyCode::Char('r') => Some(TuiEvent::Refresh),
            KeyCode::Char('l') => Some(TuiEvent::Login),
            KeyCode::Char('o') => Some(TuiEvent::Logout),
            KeyCode::Char('t') => Some(TuiEvent::ToggleTheme),
            // Ctrl+J inserts newline (ASCII LF; Ctrl+Enter sends this in most terminals)
            KeyCode::Char('j') | KeyCode::Enter => Some(TuiEvent::InputChar('\n')),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => {
            Some(TuiEvent::InputChar('\n'))
        }
        KeyCode::Enter => Some(TuiEvent::Submit),
        KeyCode::Char(c) => Some(TuiEvent::InputChar(c)),
        KeyCode::Backspace => Some(TuiEvent::Backspace),
        KeyCode::Delete => Some(TuiEvent::Delete),
        KeyCode::Esc => Some(TuiEvent::Escape),
        KeyCode::Tab | KeyCode::BackTab => Some(TuiEvent::FocusNext),
        KeyCode::Left => Some(TuiEvent::CursorLeft),
        KeyCode::Right => Some(TuiEvent::CursorRight),
        KeyCode::Up => Some(TuiEvent::CursorUp),
        KeyCode::Down => Some(TuiEvent::CursorDown),
        KeyCode::Home => Some(TuiEvent::CursorHome),
        KeyCode::End => Some(TuiEvent::CursorEnd),
        KeyCode::PageUp => Some(TuiEvent::ScrollPageUp),
        KeyCode::PageDown => Some(TuiEvent::ScrollPageDown),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_ctrl_chords() {
        let ctrl = KeyModifiers::CONTROL;
        assert_eq!(translate(key(KeyCode::Char('c'), ctrl)), Some(TuiEvent::ForceQuit));
        assert_eq!(translate(key(KeyCode::Char('n'), ctrl)), Some(TuiEvent::NewChat));
        assert_eq!(translate(key(KeyCode::Char('d'), ctrl)), Some(TuiEvent::DeleteChat));
        assert_eq!(translate(key(KeyCode::Char('r'), ctrl)), Some(TuiEvent::Refresh));
        assert_eq!(translate(key(KeyCode::Char('l'), ctrl)), Some(TuiEvent::Login));
        assert_eq!(translate(key(KeyCode::Char('o'), ctrl)), Some(TuiEvent::Logout));
        assert_eq!(translate(key(KeyCode::Char('t'), ctrl)), Some(TuiEvent::ToggleTheme));
        assert_eq!(translate(key(KeyCode::Char('j'), ctrl)), Some(TuiEvent::InputChar('\n')));
        assert_eq!(translate(key(KeyCode::Char('x'), ctrl)), None);
    }

    #[test]
    fn test_plain_keys() {
        let none = KeyModifiers::NONE;
        assert_eq!(translate(key(KeyCode::Char('d'), none)), Some(TuiEvent::InputChar('d')));
        assert_eq!(translate(key(KeyCode::Enter, none)), Some(TuiEvent::Submit));
        assert_eq!(translate(key(KeyCode::Tab, none)), Some(TuiEvent::FocusNext));
        assert_eq!(translate(key(KeyCode::Esc, none)), Some(TuiEvent::Escape));
        assert_eq!(
            translate(key(KeyCode::Enter, KeyModifiers::SHIFT)),
            Some(TuiEvent::InputChar('\n'))
        );
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut release = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(translate(Event::Key(release)), None);
    }

    #[test]
    fn test_paste_and_resize() {
        assert_eq!(
            translate(Event::Paste("a\nb".into())),
            Some(TuiEvent::Paste("a\nb".into()))
        );
        assert_eq!(translate(Event::Resize(80, 24)), Some(TuiEvent::Resize));
    }
}
