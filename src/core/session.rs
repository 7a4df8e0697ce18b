//! # Chat Session Controller
//!
//! Owns the loaded chats, the selected chat and the "answer in flight" flag.
//!
//! Invariants:
//! - `selected` is either `None` or the id of a chat present in `chats`.
//! - `answering` is cleared by every completion, success or failure.
//!
//! Operations that need the backend return an [`Effect`]; the matching
//! `*_loaded` / `*_created` / ... method applies the result when it arrives.

use log::{debug, info, warn};

use crate::api::ApiError;
use crate::core::action::Effect;
use crate::core::models::{Chat, Message};

#[derive(Debug, Default)]
pub struct SessionController {
    chats: Vec<Chat>,
    selected: Option<String>,
    answering: bool,
    /// Question text while it is being answered; cleared on success.
    input: String,
    loaded: bool,
    error: Option<String>,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_chat(&self) -> Option<&Chat> {
        let id = self.selected.as_deref()?;
        self.chats.iter().find(|c| c.id == id)
    }

    pub fn selected_index(&self) -> Option<usize> {
        let id = self.selected.as_deref()?;
        self.chats.iter().position(|c| c.id == id)
    }

    pub fn is_answering(&self) -> bool {
        self.answering
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    // ------------------------------------------------------------------
    // Initialization
    // ------------------------------------------------------------------

    pub fn init(&mut self) -> Effect {
        Effect::LoadChats
    }

    pub fn chats_loaded(&mut self, result: Result<Vec<Chat>, ApiError>) {
        self.loaded = true;
        match result {
            Ok(chats) => {
                info!("Session loaded {} chats", chats.len());
                // A reload keeps the current selection if it survived.
                let keep = self
                    .selected
                    .as_deref()
                    .is_some_and(|id| chats.iter().any(|c| c.id == id));
                if !keep {
                    self.selected = chats.first().map(|c| c.id.clone());
                }
                self.chats = chats;
                self.error = None;
            }
            Err(e) => {
                warn!("Failed to load chats: {}", e);
                self.error = Some(format!("Could not load chats: {e}"));
            }
        }
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Select a chat by id. An unknown id clears the selection.
    pub fn select_chat(&mut self, id: &str) {
        if self.chats.iter().any(|c| c.id == id) {
            self.selected = Some(id.to_string());
        } else {
            debug!("select_chat: {:?} not in list, clearing selection", id);
            self.selected = None;
        }
    }

    /// Move the selection by `delta` positions, clamped to the list.
    pub fn select_relative(&mut self, delta: isize) {
        if self.chats.is_empty() {
            return;
        }
        let current = self.selected_index().unwrap_or(0) as isize;
        let last = self.chats.len() as isize - 1;
        let next = (current + delta).clamp(0, last) as usize;
        self.selected = Some(self.chats[next].id.clone());
    }

    // ------------------------------------------------------------------
    // Questions
    // ------------------------------------------------------------------

    /// Ask a question in the selected chat.
    ///
    /// Does nothing with no chat selected, with blank text, or while a
    /// previous answer is still pending.
    pub fn submit_question(&mut self, text: &str) -> Option<Effect> {
        let chat_id = self.selected.clone()?;
        if text.trim().is_empty() {
            return None;
        }
        if self.answering {
            debug!("Ignoring submission while an answer is pending");
            return None;
        }
        self.answering = true;
        self.input = text.to_string();
        self.error = None;
        Some(Effect::AskQuestion {
            chat_id,
            question: text.to_string(),
        })
    }

    /// Apply an answer. Returns `true` when the messages of the selected
    /// chat should be refetched.
    pub fn question_answered(&mut self, chat_id: &str, result: Result<Message, ApiError>) -> bool {
        self.answering = false;
        match result {
            Ok(_) => {
                self.input.clear();
                self.selected.as_deref() == Some(chat_id)
            }
            Err(e) => {
                warn!("Question for chat {} failed: {}", chat_id, e);
                self.error = Some(format!("Could not send question: {e}"));
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Create / delete
    // ------------------------------------------------------------------

    pub fn create_chat(&mut self, title: &str) -> Option<Effect> {
        let title = title.trim();
        if title.is_empty() {
            self.error = Some("Chat title must not be empty".to_string());
            return None;
        }
        Some(Effect::CreateChat {
            title: title.to_string(),
        })
    }

    pub fn chat_created(&mut self, result: Result<Chat, ApiError>) {
        match result {
            Ok(chat) => {
                info!("Created chat {} ({:?})", chat.id, chat.title);
                self.selected = Some(chat.id.clone());
                self.chats.retain(|c| c.id != chat.id);
                self.chats.push(chat);
                self.error = None;
            }
            Err(e) => {
                warn!("Failed to create chat: {}", e);
                self.error = Some(format!("Could not create chat: {e}"));
            }
        }
    }

    pub fn delete_chat(&mut self, id: &str) -> Option<Effect> {
        if id.is_empty() {
            return None;
        }
        Some(Effect::DeleteChat {
            chat_id: id.to_string(),
        })
    }

    pub fn chat_deleted(&mut self, id: &str, result: Result<(), ApiError>) {
        if let Err(e) = result {
            warn!("Failed to delete chat {}: {}", id, e);
            self.error = Some(format!("Could not delete chat: {e}"));
            return;
        }
        info!("Deleted chat {}", id);
        self.chats.retain(|c| c.id != id);
        if self.selected.as_deref() == Some(id) {
            self.selected = self.chats.first().map(|c| c.id.clone());
        }
        self.error = None;
    }
}
