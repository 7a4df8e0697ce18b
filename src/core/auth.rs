//! # Authentication
//!
//! The identity provider itself (login pages, token lifecycle) is external.
//! Chatdesk only needs a narrow capability: is someone signed in, who, and a
//! bearer token to attach to backend requests.
//!
//! - [`TokenAuth`]: adapter around an access token issued by the provider.
//!   Login validates the token against the profile endpoint.
//! - [`NoAuth`]: stand-in for offline runs and tests. Never signed in.

use std::fmt;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use log::{info, warn};

use crate::api::{ApiError, TokenSource, UserApi};
use crate::core::models::UserProfile;

#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    /// No access token was configured, so there is nothing to sign in with.
    MissingToken,
    /// The backend refused the token (or could not be reached).
    Rejected(ApiError),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "no access token configured"),
            AuthError::Rejected(e) => write!(f, "sign-in rejected: {e}"),
        }
    }
}

impl std::error::Error for AuthError {}

#[async_trait]
pub trait AuthProvider: TokenSource {
    fn is_authenticated(&self) -> bool;

    fn current_user(&self) -> Option<UserProfile>;

    /// Signs in. `Ok(None)` means the provider has no user concept (mock).
    async fn login(&self) -> Result<Option<UserProfile>, AuthError>;

    fn logout(&self);
}

/// Access-token adapter for the external identity provider.
pub struct TokenAuth {
    configured_token: Option<String>,
    /// Profile probe; must send `configured_token`, not the session token.
    validator: Arc<dyn UserApi>,
    session: RwLock<Option<Session>>,
}

#[derive(Clone)]
struct Session {
    token: String,
    profile: UserProfile,
}

impl TokenAuth {
    pub fn new(configured_token: Option<String>, validator: Arc<dyn UserApi>) -> Self {
        Self {
            configured_token: configured_token.filter(|t| !t.trim().is_empty()),
            validator,
            session: RwLock::new(None),
        }
    }

    fn session(&self) -> Option<Session> {
        self.session.read().ok().and_then(|guard| guard.clone())
    }

    fn set_session(&self, session: Option<Session>) {
        if let Ok(mut guard) = self.session.write() {
            *guard = session;
        }
    }
}

impl TokenSource for TokenAuth {
    fn bearer_token(&self) -> Option<String> {
        self.session().map(|s| s.token)
    }
}

#[async_trait]
impl AuthProvider for TokenAuth {
    fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    fn current_user(&self) -> Option<UserProfile> {
        self.session().map(|s| s.profile)
    }

    async fn login(&self) -> Result<Option<UserProfile>, AuthError> {
        let Some(token) = self.configured_token.clone() else {
            warn!("Login requested but no access token is configured");
            return Err(AuthError::MissingToken);
        };

        match self.validator.profile().await {
            Ok(profile) => {
                info!(
                    "Signed in as {}",
                    profile.display_name().unwrap_or("unknown user")
                );
                self.set_session(Some(Session {
                    token,
                    profile: profile.clone(),
                }));
                Ok(Some(profile))
            }
            Err(e) => {
                warn!("Access token rejected: {}", e);
                self.set_session(None);
                Err(AuthError::Rejected(e))
            }
        }
    }

    fn logout(&self) {
        info!("Signed out");
        self.set_session(None);
    }
}

/// Auth mock: nobody is ever signed in and no token is sent.
pub struct NoAuth;

impl TokenSource for NoAuth {
    fn bearer_token(&self) -> Option<String> {
        None
    }
}

#[async_trait]
impl AuthProvider for NoAuth {
    fn is_authenticated(&self) -> bool {
        false
    }

    fn current_user(&self) -> Option<UserProfile> {
        None
    }

    async fn login(&self) -> Result<Option<UserProfile>, AuthError> {
        Ok(None)
    }

    fn logout(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeUsers;

    fn profile(name: &str) -> UserProfile {
        serde_json::from_value(serde_json::json!({ "sub": "auth0|1", "name": name })).unwrap()
    }

    #[tokio::test]
    async fn test_token_auth_login_caches_profile_and_token() {
        let users = Arc::new(FakeUsers::ok(profile("Ada")));
        let auth = TokenAuth::new(Some("tok".into()), users.clone());
        assert!(!auth.is_authenticated());
        assert_eq!(auth.bearer_token(), None);

        let user = auth.login().await.unwrap();
        assert_eq!(user.unwrap().display_name(), Some("Ada"));
        assert!(auth.is_authenticated());
        assert_eq!(auth.bearer_token().as_deref(), Some("tok"));
        assert_eq!(users.calls(), 1);
    }

    #[tokio::test]
    async fn test_token_auth_without_token_never_calls_backend() {
        let users = Arc::new(FakeUsers::ok(profile("Ada")));
        let auth = TokenAuth::new(Some("  ".into()), users.clone());
        assert_eq!(auth.login().await, Err(AuthError::MissingToken));
        assert_eq!(users.calls(), 0);
    }

    #[tokio::test]
    async fn test_token_auth_rejected_token() {
        let users = Arc::new(FakeUsers::failing(ApiError::Status {
            status: 401,
            message: "Invalid token".into(),
        }));
        let auth = TokenAuth::new(Some("tok".into()), users);
        assert!(matches!(auth.login().await, Err(AuthError::Rejected(_))));
        assert!(!auth.is_authenticated());
        assert_eq!(auth.current_user(), None);
    }

    #[tokio::test]
    async fn test_logout_forgets_session() {
        let auth = TokenAuth::new(Some("tok".into()), Arc::new(FakeUsers::ok(profile("Ada"))));
        auth.login().await.unwrap();
        auth.logout();
        assert!(!auth.is_authenticated());
        assert_eq!(auth.bearer_token(), None);
    }

    #[test]
    fn test_no_auth_is_never_signed_in() {
        let auth = NoAuth;
        assert_eq!(tokio_test::block_on(auth.login()), Ok(None));
        assert!(!auth.is_authenticated());
        assert_eq!(auth.bearer_token(), None);
        auth.logout();
        assert_eq!(auth.current_user(), None);
    }
}
