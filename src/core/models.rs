//! # Data Models
//!
//! Chats and messages as the backend stores them. The front end only holds a
//! transient copy per session; every list is replaced wholesale on refetch.
//!
//! ## Canonical schema
//!
//! ```text
//! Chat     { id, chat_title, created_at }
//! Message  { id, text, chat_id, created_at, sent_by? }
//! ```
//!
//! Older payloads are still accepted:
//! - `chatTitle` / `title` are aliases for `chat_title`; a missing title is empty.
//! - Embedded `messages` arrays on a chat are ignored (messages are fetched separately).
//! - A message without `chat_id` gets the requested chat id filled in by the client.
//! - Timestamps without an offset are read as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A titled conversation thread owned by the backend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Chat {
    pub id: String,
    #[serde(rename = "chat_title", alias = "chatTitle", alias = "title", default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Chat {
    /// Title for display; untitled chats still need a label in the sidebar.
    pub fn display_title(&self) -> &str {
        let trimmed = self.title.trim();
        if trimmed.is_empty() { "Untitled" } else { trimmed }
    }
}

/// Who produced a message.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    #[serde(alias = "USER", alias = "User")]
    User,
    #[serde(alias = "SYSTEM", alias = "System", alias = "assistant")]
    System,
}

/// One turn (question or answer) within a chat. `text` is markdown.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub chat_id: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_by: Option<Sender>,
}

impl Message {
    /// Builds the stand-in for an answer-only reply (no stored message behind it).
    pub fn system_reply(chat_id: &str, text: String) -> Self {
        Self {
            id: String::new(),
            text,
            chat_id: chat_id.to_string(),
            created_at: Utc::now(),
            sent_by: Some(Sender::System),
        }
    }

    pub fn is_from_user(&self) -> bool {
        self.sent_by == Some(Sender::User)
    }
}

/// Opaque profile of the signed-in user: the token claims the backend echoes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct UserProfile {
    #[serde(flatten)]
    pub claims: serde_json::Map<String, serde_json::Value>,
}

impl UserProfile {
    /// Best human-readable label: name, then email, then subject.
    pub fn display_name(&self) -> Option<&str> {
        ["name", "nickname", "email", "sub"]
            .iter()
            .find_map(|key| self.claims.get(*key).and_then(|v| v.as_str()))
            .filter(|s| !s.is_empty())
    }
}

/// Opaque acknowledgement returned by mutations that carry no payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ack {
    pub code: Option<u16>,
    pub detail: Option<String>,
}

/// Accepts RFC 3339 or an offset-less ISO-8601 timestamp (read as UTC).
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        None => Ok(DateTime::<Utc>::default()),
        Some(s) => parse_timestamp(&s).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid timestamp: {s}"))
        }),
    }
}

pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_chat_decodes_canonical_shape() {
        let json = r#"{"id":"a","chat_title":"Budget","created_at":"2025-03-08T14:30:00Z"}"#;
        let chat: Chat = serde_json::from_str(json).unwrap();
        assert_eq!(chat.id, "a");
        assert_eq!(chat.title, "Budget");
        assert_eq!(chat.created_at, Utc.with_ymd_and_hms(2025, 3, 8, 14, 30, 0).unwrap());
    }

    #[test]
    fn test_chat_accepts_camel_case_title() {
        let json = r#"{"id":"a","chatTitle":"Budget","created_at":"2025-03-08T14:30:00Z"}"#;
        let chat: Chat = serde_json::from_str(json).unwrap();
        assert_eq!(chat.title, "Budget");
    }

    #[test]
    fn test_chat_ignores_embedded_messages() {
        let json = r#"{"id":"a","messages":["hi","there"],"created_at":"2025-03-08T14:30:00"}"#;
        let chat: Chat = serde_json::from_str(json).unwrap();
        assert_eq!(chat.title, "");
        assert_eq!(chat.display_title(), "Untitled");
    }

    #[test]
    fn test_chat_serializes_canonical_title_key() {
        let chat = Chat {
            id: "a".into(),
            title: "Budget".into(),
            created_at: Utc.with_ymd_and_hms(2025, 3, 8, 14, 30, 0).unwrap(),
        };
        let json = serde_json::to_string(&chat).unwrap();
        assert!(json.contains(r#""chat_title":"Budget""#));
    }

    #[test]
    fn test_message_sender_is_case_insensitive() {
        let json = r#"{"id":"m","text":"hi","chat_id":"a","created_at":"2025-03-08T14:30:00Z","sent_by":"USER"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.sent_by, Some(Sender::User));
        assert!(msg.is_from_user());
    }

    #[test]
    fn test_message_without_sender_or_chat_id() {
        let json = r#"{"id":"m","text":"**hi**","created_at":"2025-03-08T14:30:00.123456"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.sent_by, None);
        assert!(msg.chat_id.is_empty());
        assert!(!msg.is_from_user());
    }

    #[test]
    fn test_parse_timestamp_with_offset() {
        let dt = parse_timestamp("2025-03-08T16:30:00+02:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 3, 8, 14, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_profile_display_name_prefers_name() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"sub":"auth0|1","email":"a@b.c","name":"Ada"}"#).unwrap();
        assert_eq!(profile.display_name(), Some("Ada"));

        let profile: UserProfile = serde_json::from_str(r#"{"sub":"auth0|1"}"#).unwrap();
        assert_eq!(profile.display_name(), Some("auth0|1"));
    }

    #[test]
    fn test_system_reply_is_tagged_system() {
        let msg = Message::system_reply("a", "No relevant sections found.".to_string());
        assert_eq!(msg.sent_by, Some(Sender::System));
        assert_eq!(msg.chat_id, "a");
        assert!(msg.id.is_empty());
    }
}
