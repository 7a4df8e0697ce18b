//! # Message List Controller
//!
//! Owns the messages of the chat currently on screen plus a loading flag.
//!
//! Fetches are tagged with the chat id and a request number. A response is
//! applied only if both still match: switching chats (or issuing a newer
//! fetch) makes any in-flight response stale, and stale responses are dropped.
//!
//! ```text
//! set_chat_id("a")  -> FetchMessages { a, #1 }
//! set_chat_id("b")  -> FetchMessages { b, #2 }
//! loaded(a, #1)     -> dropped (chat changed)
//! loaded(b, #2)     -> applied, loading = false
//! ```

use log::{debug, warn};

use crate::api::ApiError;
use crate::core::action::Effect;
use crate::core::models::Message;

#[derive(Debug, Default)]
pub struct MessageListController {
    chat_id: String,
    messages: Vec<Message>,
    loading: bool,
    error: Option<String>,
    /// Number of the newest fetch issued; only its response is accepted.
    latest_request: u64,
}

impl MessageListController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Point the list at another chat. Refetches only when the id changed.
    pub fn set_chat_id(&mut self, chat_id: &str) -> Option<Effect> {
        if self.chat_id == chat_id {
            return None;
        }
        debug!("Message list switching chat {:?} -> {:?}", self.chat_id, chat_id);
        self.chat_id = chat_id.to_string();
        self.messages.clear();
        self.error = None;
        self.loading = false;
        self.fetch_messages(false)
    }

    /// Start a fetch for the current chat.
    ///
    /// Without `force_refresh` a fetch already in flight is reused; with it a
    /// new request supersedes the old one. An empty chat id does nothing.
    pub fn fetch_messages(&mut self, force_refresh: bool) -> Option<Effect> {
        if self.chat_id.is_empty() {
            return None;
        }
        if self.loading && !force_refresh {
            debug!("Fetch for chat {} already in flight", self.chat_id);
            return None;
        }
        self.latest_request += 1;
        self.loading = true;
        Some(Effect::FetchMessages {
            chat_id: self.chat_id.clone(),
            request: self.latest_request,
        })
    }

    /// Apply a fetch result. Returns `false` when the result was stale and dropped.
    pub fn messages_loaded(
        &mut self,
        chat_id: &str,
        request: u64,
        result: Result<Vec<Message>, ApiError>,
    ) -> bool {
        if chat_id != self.chat_id || request != self.latest_request {
            debug!(
                "Dropping stale messages for chat {} (request #{}, current {} #{})",
                chat_id, request, self.chat_id, self.latest_request
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(messages) => {
                self.messages = messages;
                self.error = None;
            }
            Err(e) => {
                warn!("Failed to load messages for chat {}: {}", chat_id, e);
                self.error = Some(format!("Could not load messages: {e}"));
            }
        }
        true
    }

    /// Forget everything (no chat selected).
    pub fn clear(&mut self) {
        self.chat_id.clear();
        self.messages.clear();
        self.loading = false;
        self.error = None;
    }
}
