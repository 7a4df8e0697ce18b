//! # Effect Dispatch
//!
//! Turns [`Effect`]s into backend calls and their results back into
//! [`Action`]s. Services are injected as trait objects so tests can swap in
//! fakes or point the real HTTP services at a mock server.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use log::{debug, info};

use crate::api::{
    ApiError, ChatApi, ChatService, HttpClient, MessageApi, MessageService, StaticToken,
    TokenSource, UserApi, UserService,
};
use crate::core::action::{Action, Effect, update};
use crate::core::auth::{AuthProvider, NoAuth, TokenAuth};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;

#[derive(Clone)]
pub struct Dispatcher {
    chats: Arc<dyn ChatApi>,
    messages: Arc<dyn MessageApi>,
    users: Arc<dyn UserApi>,
    auth: Arc<dyn AuthProvider>,
}

impl Dispatcher {
    pub fn new(
        chats: Arc<dyn ChatApi>,
        messages: Arc<dyn MessageApi>,
        users: Arc<dyn UserApi>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            chats,
            messages,
            users,
            auth,
        }
    }

    /// Wire the HTTP services and the auth adapter from resolved settings.
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, ApiError> {
        let timeout = Duration::from_secs(config.timeout_secs);

        let (auth, tokens): (Arc<dyn AuthProvider>, Arc<dyn TokenSource>) = if config.use_auth {
            info!(
                "Auth: domain={:?} client_id={:?} audience={:?} token={}",
                config.auth.domain,
                config.auth.client_id,
                config.auth.audience,
                if config.auth.access_token.is_some() { "set" } else { "unset" }
            );
            // Login probes the profile endpoint with the configured token
            // before the session token exists.
            let probe = Arc::new(HttpClient::new(
                &config.api_base_url,
                timeout,
                Arc::new(StaticToken(config.auth.access_token.clone())),
            )?);
            let validator = Arc::new(UserService::new(probe, config.user_prefix.clone()));
            let token_auth = Arc::new(TokenAuth::new(config.auth.access_token.clone(), validator));
            (
                token_auth.clone() as Arc<dyn AuthProvider>,
                token_auth as Arc<dyn TokenSource>,
            )
        } else {
            info!("Auth disabled (--no-auth)");
            let no_auth = Arc::new(NoAuth);
            (
                no_auth.clone() as Arc<dyn AuthProvider>,
                no_auth as Arc<dyn TokenSource>,
            )
        };

        let http = Arc::new(HttpClient::new(&config.api_base_url, timeout, tokens)?);
        let chat_service = Arc::new(ChatService::new(http.clone(), config.chat_prefix.clone()));
        let message_service =
            Arc::new(MessageService::new(http.clone(), config.chat_prefix.clone()));
        let user_service = Arc::new(UserService::new(http, config.user_prefix.clone()));

        Ok(Self::new(chat_service, message_service, user_service, auth))
    }

    pub fn auth(&self) -> &Arc<dyn AuthProvider> {
        &self.auth
    }

    /// Run one effect. `None` for effects with no completion (quit).
    pub async fn perform(&self, effect: Effect) -> Option<Action> {
        debug!("perform: {:?}", effect);
        let action = match effect {
            Effect::Login => Action::AuthResolved(self.auth.login().await),
            Effect::Logout => {
                self.auth.logout();
                Action::LoggedOut
            }
            Effect::LoadProfile => Action::ProfileLoaded(self.users.profile().await),
            Effect::LoadChats => Action::ChatsLoaded(self.chats.list_chats().await),
            Effect::FetchMessages { chat_id, request } => {
                let result = self.messages.list_messages(&chat_id).await;
                Action::MessagesLoaded {
                    chat_id,
                    request,
                    result,
                }
            }
            Effect::AskQuestion { chat_id, question } => {
                let result = self.chats.ask_question(&chat_id, &question).await;
                Action::QuestionAnswered { chat_id, result }
            }
            Effect::CreateChat { title } => {
                Action::ChatCreated(self.chats.create_chat(&title).await)
            }
            Effect::DeleteChat { chat_id } => {
                let result = self.chats.delete_chat(&chat_id).await.map(|ack| {
                    debug!("Delete of {} acknowledged: {:?}", chat_id, ack);
                });
                Action::ChatDeleted { chat_id, result }
            }
            Effect::Quit => return None,
        };
        Some(action)
    }

    /// Feed `action` through the reducer and perform the resulting effects
    /// until nothing is left. Returns true if a quit was requested.
    ///
    /// Effects from one `update` run concurrently; their completions are
    /// queued in the order the effects were issued.
    pub async fn drive(&self, app: &mut App, action: Action) -> bool {
        let mut queue = VecDeque::from([action]);
        let mut quit = false;
        while let Some(action) = queue.pop_front() {
            let mut pending = Vec::new();
            for effect in update(app, action) {
                if effect == Effect::Quit {
                    info!("Quit requested");
                    quit = true;
                } else {
                    pending.push(self.perform(effect));
                }
            }
            queue.extend(join_all(pending).await.into_iter().flatten());
        }
        quit
    }
}
