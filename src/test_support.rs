//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::api::{ApiError, ChatApi, MessageApi, UserApi};
use crate::core::auth::NoAuth;
use crate::core::config::Theme;
use crate::core::dispatch::Dispatcher;
use crate::core::models::{Ack, Chat, Message, Sender, UserProfile};
use crate::core::state::App;

pub fn chat(id: &str, title: &str) -> Chat {
    Chat {
        id: id.to_string(),
        title: title.to_string(),
        created_at: Utc.with_ymd_and_hms(2025, 3, 8, 14, 30, 0).unwrap(),
    }
}

pub fn message(id: &str, chat_id: &str, text: &str) -> Message {
    Message {
        id: id.to_string(),
        text: text.to_string(),
        chat_id: chat_id.to_string(),
        created_at: Utc.with_ymd_and_hms(2025, 3, 8, 14, 31, 0).unwrap(),
        sent_by: Some(Sender::User),
    }
}

/// Creates a test App pointed at a dummy backend.
pub fn test_app() -> App {
    App::new("http://test.invalid".to_string(), Theme::Dark)
}

/// Dispatcher over an in-memory backend, with auth disabled.
pub fn test_dispatcher(backend: Arc<FakeBackend>) -> Dispatcher {
    Dispatcher::new(
        backend.clone(),
        backend,
        Arc::new(FakeUsers::ok(UserProfile::default())),
        Arc::new(NoAuth),
    )
}

/// In-memory chat backend. Records every call; operations can be told to fail.
///
/// Asking a question stores the question plus an `echo: <question>` reply.
#[derive(Default)]
pub struct FakeBackend {
    chats: Mutex<Vec<Chat>>,
    messages: Mutex<Vec<Message>>,
    failures: Mutex<HashMap<String, ApiError>>,
    calls: Mutex<Vec<String>>,
    next_id: AtomicUsize,
}

impl FakeBackend {
    pub fn with_chats(chats: Vec<Chat>) -> Self {
        Self {
            chats: Mutex::new(chats),
            ..Self::default()
        }
    }

    pub fn add_message(&self, message: Message) {
        self.messages.lock().unwrap().push(message);
    }

    /// Make every call to `op` (`list_chats`, `list_messages`, `ask`,
    /// `create`, `delete`) fail with `error`.
    pub fn fail(&self, op: &str, error: ApiError) {
        self.failures.lock().unwrap().insert(op.to_string(), error);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    fn record(&self, op: &str, call: String) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().get(op) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl ChatApi for FakeBackend {
    async fn list_chats(&self) -> Result<Vec<Chat>, ApiError> {
        self.record("list_chats", "list_chats".into())?;
        Ok(self.chats.lock().unwrap().clone())
    }

    async fn ask_question(&self, chat_id: &str, question: &str) -> Result<Message, ApiError> {
        self.record("ask", "ask".into())?;
        let mut question_msg = message(&self.next_id("q"), chat_id, question);
        question_msg.sent_by = Some(Sender::User);
        let mut reply = message(&self.next_id("r"), chat_id, &format!("echo: {question}"));
        reply.sent_by = Some(Sender::System);

        let mut messages = self.messages.lock().unwrap();
        messages.push(question_msg);
        messages.push(reply.clone());
        Ok(reply)
    }

    async fn create_chat(&self, title: &str) -> Result<Chat, ApiError> {
        self.record("create", "create".into())?;
        let created = chat(&self.next_id("c"), title);
        self.chats.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn delete_chat(&self, chat_id: &str) -> Result<Ack, ApiError> {
        self.record("delete", format!("delete:{chat_id}"))?;
        self.chats.lock().unwrap().retain(|c| c.id != chat_id);
        self.messages.lock().unwrap().retain(|m| m.chat_id != chat_id);
        Ok(Ack {
            code: Some(200),
            detail: Some("Chat deleted".into()),
        })
    }
}

#[async_trait]
impl MessageApi for FakeBackend {
    async fn list_messages(&self, chat_id: &str) -> Result<Vec<Message>, ApiError> {
        self.record("list_messages", format!("list_messages:{chat_id}"))?;
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect())
    }
}

/// Profile endpoint stub returning a fixed result.
pub struct FakeUsers {
    result: Result<UserProfile, ApiError>,
    calls: AtomicUsize,
}

impl FakeUsers {
    pub fn ok(profile: UserProfile) -> Self {
        Self {
            result: Ok(profile),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: ApiError) -> Self {
        Self {
            result: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserApi for FakeUsers {
    async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

/// Flatten a test terminal's buffer into one string (row after row).
pub fn buffer_text(terminal: &ratatui::Terminal<ratatui::backend::TestBackend>) -> String {
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect()
}
