use std::sync::Arc;

use async_trait::async_trait;
use log::info;

use super::client::{HttpClient, extract};
use super::{ApiError, UserApi};
use crate::core::models::UserProfile;

/// Read-only access to the signed-in user's profile.
pub struct UserService {
    http: Arc<HttpClient>,
    prefix: String,
}

impl UserService {
    pub fn new(http: Arc<HttpClient>, prefix: impl Into<String>) -> Self {
        Self {
            http,
            prefix: prefix.into(),
        }
    }
}

#[async_trait]
impl UserApi for UserService {
    async fn profile(&self) -> Result<UserProfile, ApiError> {
        let url = self.http.url(&self.prefix, "profile");
        info!("GET {}", url);
        // The backend echoes the verified token claims under `auth`.
        extract(self.http.get(&url).await?, "auth")
    }
}
