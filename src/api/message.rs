use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use super::client::{HttpClient, extract};
use super::{ApiError, MessageApi, require_id};
use crate::core::models::Message;

pub struct MessageService {
    http: Arc<HttpClient>,
    prefix: String,
}

impl MessageService {
    pub fn new(http: Arc<HttpClient>, prefix: impl Into<String>) -> Self {
        Self {
            http,
            prefix: prefix.into(),
        }
    }
}

#[async_trait]
impl MessageApi for MessageService {
    async fn list_messages(&self, chat_id: &str) -> Result<Vec<Message>, ApiError> {
        let chat_id = require_id("chat id", chat_id)?;
        let url = self.http.resource_url(&self.prefix, chat_id, "messages")?;
        info!("GET {}", url);

        let mut messages: Vec<Message> = extract(self.http.get(&url).await?, "messages")?;
        for message in messages.iter_mut().filter(|m| m.chat_id.is_empty()) {
            message.chat_id = chat_id.to_string();
        }
        debug!("Loaded {} messages for chat {}", messages.len(), chat_id);
        Ok(messages)
    }
}
