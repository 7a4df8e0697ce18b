//! # Backend API
//!
//! Stateless wrappers around the chat backend's HTTP surface. Each service
//! is reached through a trait so controllers and tests can swap in fakes.
//!
//! | Method | Path | Service |
//! |---|---|---|
//! | GET | `{chat}/chats` | [`ChatApi::list_chats`] |
//! | GET | `{chat}/{id}/messages` | [`MessageApi::list_messages`] |
//! | POST | `{chat}/{id}/message?question=` | [`ChatApi::ask_question`] |
//! | POST | `{chat}/create?chat_title=` | [`ChatApi::create_chat`] |
//! | DELETE | `{chat}/{id}/delete` | [`ChatApi::delete_chat`] |
//! | GET | `{user}/profile` | [`UserApi::profile`] |
//!
//! Calls are lazy (nothing is sent until the returned future is awaited) and
//! resolve exactly once.

pub mod chat;
pub mod client;
pub mod error;
pub mod message;
pub mod user;

use async_trait::async_trait;

use crate::core::models::{Ack, Chat, Message, UserProfile};

pub use chat::ChatService;
pub use client::{HttpClient, StaticToken, TokenSource};
pub use error::ApiError;
pub use message::MessageService;
pub use user::UserService;

#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn list_chats(&self) -> Result<Vec<Chat>, ApiError>;

    /// Posts a question and returns the produced answer.
    async fn ask_question(&self, chat_id: &str, question: &str) -> Result<Message, ApiError>;

    async fn create_chat(&self, title: &str) -> Result<Chat, ApiError>;

    async fn delete_chat(&self, chat_id: &str) -> Result<Ack, ApiError>;
}

#[async_trait]
pub trait MessageApi: Send + Sync {
    /// Messages of one chat in server order (not re-sorted).
    async fn list_messages(&self, chat_id: &str) -> Result<Vec<Message>, ApiError>;
}

#[async_trait]
pub trait UserApi: Send + Sync {
    async fn profile(&self) -> Result<UserProfile, ApiError>;
}

/// Reject an empty identifier before any request goes out.
pub(crate) fn require_id<'a>(what: &str, id: &'a str) -> Result<&'a str, ApiError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation(format!("{what} must not be empty")));
    }
    Ok(trimmed)
}
