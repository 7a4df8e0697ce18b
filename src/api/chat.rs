use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use serde_json::Value;

use super::client::{HttpClient, extract};
use super::{ApiError, ChatApi, require_id};
use crate::core::models::{Ack, Chat, Message};

/// Chat-level operations against `{base}{prefix}`.
pub struct ChatService {
    http: Arc<HttpClient>,
    prefix: String,
}

impl ChatService {
    pub fn new(http: Arc<HttpClient>, prefix: impl Into<String>) -> Self {
        Self {
            http,
            prefix: prefix.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        self.http.url(&self.prefix, path)
    }
}

#[async_trait]
impl ChatApi for ChatService {
    async fn list_chats(&self) -> Result<Vec<Chat>, ApiError> {
        let url = self.url("chats");
        info!("GET {}", url);
        let chats: Vec<Chat> = extract(self.http.get(&url).await?, "chats")?;
        debug!("Loaded {} chats", chats.len());
        Ok(chats)
    }

    async fn ask_question(&self, chat_id: &str, question: &str) -> Result<Message, ApiError> {
        let chat_id = require_id("chat id", chat_id)?;
        let url = self.http.resource_url(&self.prefix, chat_id, "message")?;
        info!("POST {} (question: {} bytes)", url, question.len());
        let value = self.http.post_query(&url, &[("question", question)]).await?;
        decode_answer(chat_id, value)
    }

    async fn create_chat(&self, title: &str) -> Result<Chat, ApiError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ApiError::Validation("chat title must not be empty".into()));
        }
        let url = self.url("create");
        info!("POST {} (title: {:?})", url, title);
        extract(self.http.post_query(&url, &[("chat_title", title)]).await?, "chat")
    }

    async fn delete_chat(&self, chat_id: &str) -> Result<Ack, ApiError> {
        let chat_id = require_id("chat id", chat_id)?;
        let url = self.http.resource_url(&self.prefix, chat_id, "delete")?;
        info!("DELETE {}", url);
        let value = self.http.delete(&url).await?;
        Ok(Ack {
            code: value
                .get("code")
                .and_then(Value::as_u64)
                .and_then(|c| u16::try_from(c).ok()),
            detail: value
                .get("detail")
                .or_else(|| value.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

/// An answer arrives as `{"message": {...}}`, a bare message, or (when the
/// backend had nothing to retrieve) only an `answer` string.
fn decode_answer(chat_id: &str, value: Value) -> Result<Message, ApiError> {
    if value.get("message").is_some_and(Value::is_object) {
        return fill_chat_id(extract(value, "message")?, chat_id);
    }
    if let Ok(message) = serde_json::from_value::<Message>(value.clone()) {
        return fill_chat_id(message, chat_id);
    }
    match value.get("answer").and_then(Value::as_str) {
        Some(answer) => Ok(Message::system_reply(chat_id, answer.to_string())),
        None => Err(ApiError::Decode(format!("no answer in response: {value}"))),
    }
}

fn fill_chat_id(mut message: Message, chat_id: &str) -> Result<Message, ApiError> {
    if message.chat_id.is_empty() {
        message.chat_id = chat_id.to_string();
    }
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Sender;
    use serde_json::json;

    #[test]
    fn test_decode_answer_from_message_key() {
        let value = json!({
            "code": 200,
            "message": {"id": "m1", "text": "Hi", "created_at": "2025-03-08T14:30:00Z", "sent_by": "system"}
        });
        let msg = decode_answer("a", value).unwrap();
        assert_eq!(msg.id, "m1");
        assert_eq!(msg.chat_id, "a");
    }

    #[test]
    fn test_decode_answer_from_bare_message() {
        let value = json!({"id": "m2", "text": "Hi", "chat_id": "b", "created_at": "2025-03-08T14:30:00Z"});
        let msg = decode_answer("a", value).unwrap();
        assert_eq!(msg.id, "m2");
        assert_eq!(msg.chat_id, "b");
    }

    #[test]
    fn test_decode_answer_only_text() {
        let value = json!({"code": 204, "answer": "No relevant sections found."});
        let msg = decode_answer("a", value).unwrap();
        assert_eq!(msg.text, "No relevant sections found.");
        assert_eq!(msg.sent_by, Some(Sender::System));
    }

    #[test]
    fn test_decode_answer_rejects_unknown_shape() {
        let err = decode_answer("a", json!({"code": 200})).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
