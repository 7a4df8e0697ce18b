//! # Application State
//!
//! Core state for Chatdesk. Domain logic only, no TUI types.
//!
//! ```text
//! App
//! ├── session: SessionController       // chats, selection, answering flag
//! ├── messages: MessageListController  // messages of the selected chat
//! ├── user: Option<UserProfile>        // signed-in user, if any
//! ├── status_message: String           // footer text
//! ├── theme: Theme                     // dark / light
//! └── api_label: String                // backend shown in the navbar
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::core::config::{ResolvedConfig, Theme};
use crate::core::messages::MessageListController;
use crate::core::models::UserProfile;
use crate::core::session::SessionController;

pub struct App {
    pub session: SessionController,
    pub messages: MessageListController,
    pub user: Option<UserProfile>,
    pub status_message: String,
    pub theme: Theme,
    pub api_label: String,
}

impl App {
    pub fn new(api_label: String, theme: Theme) -> Self {
        Self {
            session: SessionController::new(),
            messages: MessageListController::new(),
            user: None,
            status_message: String::from("Welcome to Chatdesk!"),
            theme,
            api_label,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(config.api_base_url.clone(), config.theme)
    }

    /// The most relevant error to surface, if any.
    pub fn current_error(&self) -> Option<&str> {
        self.session.error().or_else(|| self.messages.error())
    }

    pub fn user_label(&self) -> Option<&str> {
        self.user.as_ref().and_then(UserProfile::display_name)
    }
}
