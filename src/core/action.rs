//! # Actions
//!
//! Everything that can happen in Chatdesk becomes an `Action`.
//! User picks a chat? That's `Action::SelectChat(id)`.
//! Backend answers? That's `Action::QuestionAnswered { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! state and returns the I/O it wants performed as [`Effect`]s. No side effects
//! here. The dispatcher runs effects and feeds their results back as actions.
//!
//! ```text
//! State + Action  →  update()  →  New State + Vec<Effect>
//!                                               │
//!             Action  ←  Dispatcher::perform  ←─┘
//! ```

use log::{debug, info};

use crate::api::ApiError;
use crate::core::auth::AuthError;
use crate::core::models::{Chat, Message, UserProfile};
use crate::core::state::App;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // User intents
    Init,
    Login,
    Logout,
    /// Reload chats, the open chat's messages and (when signed in) the profile.
    Refresh,
    SelectChat(String),
    /// Move the sidebar selection up (negative) or down (positive).
    MoveSelection(isize),
    SubmitQuestion(String),
    CreateChat(String),
    DeleteChat(String),
    DismissError,
    ToggleTheme,
    Quit,

    // Completions
    AuthResolved(Result<Option<UserProfile>, AuthError>),
    LoggedOut,
    ProfileLoaded(Result<UserProfile, ApiError>),
    ChatsLoaded(Result<Vec<Chat>, ApiError>),
    MessagesLoaded {
        chat_id: String,
        request: u64,
        result: Result<Vec<Message>, ApiError>,
    },
    QuestionAnswered {
        chat_id: String,
        result: Result<Message, ApiError>,
    },
    ChatCreated(Result<Chat, ApiError>),
    ChatDeleted {
        chat_id: String,
        result: Result<(), ApiError>,
    },
}

/// I/O requested by the reducer. Each one maps to a single backend or auth call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Login,
    Logout,
    LoadProfile,
    LoadChats,
    FetchMessages { chat_id: String, request: u64 },
    AskQuestion { chat_id: String, question: String },
    CreateChat { title: String },
    DeleteChat { chat_id: String },
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Vec<Effect> {
    debug!("update: {:?}", action);
    match action {
        Action::Init => {
            app.status_message = format!("Connecting to {}", app.api_label);
            vec![Effect::Login]
        }
        Action::Login => vec![Effect::Login],
        Action::Logout => vec![Effect::Logout],
        Action::Refresh => {
            let mut effects = vec![Effect::LoadChats];
            effects.extend(app.messages.fetch_messages(true));
            if app.user.is_some() {
                effects.push(Effect::LoadProfile);
            }
            effects
        }

        Action::AuthResolved(result) => {
            match result {
                Ok(Some(profile)) => {
                    app.status_message = format!(
                        "Signed in as {}",
                        profile.display_name().unwrap_or("unknown user")
                    );
                    app.user = Some(profile);
                }
                Ok(None) => {
                    app.status_message = "Offline mode: not signed in".to_string();
                    app.user = None;
                }
                Err(e) => {
                    app.status_message = format!("Sign-in failed: {e}");
                    app.user = None;
                }
            }
            // The chat list is loaded whether or not sign-in worked; the
            // backend decides what an anonymous caller may see.
            vec![app.session.init()]
        }
        Action::LoggedOut => {
            app.user = None;
            app.status_message = "Signed out".to_string();
            Vec::new()
        }
        Action::ProfileLoaded(result) => {
            match result {
                Ok(profile) => app.user = Some(profile),
                Err(e) => app.status_message = format!("Could not load profile: {e}"),
            }
            Vec::new()
        }

        Action::ChatsLoaded(result) => {
            app.session.chats_loaded(result);
            sync_messages(app)
        }
        Action::SelectChat(id) => {
            app.session.select_chat(&id);
            sync_messages(app)
        }
        Action::MoveSelection(delta) => {
            app.session.select_relative(delta);
            sync_messages(app)
        }

        Action::SubmitQuestion(text) => {
            let effects: Vec<Effect> = app.session.submit_question(&text).into_iter().collect();
            if !effects.is_empty() {
                app.status_message = "Waiting for answer...".to_string();
            }
            effects
        }
        Action::QuestionAnswered { chat_id, result } => {
            let answered = result.is_ok();
            let refresh = app.session.question_answered(&chat_id, result);
            if answered {
                app.status_message = "Answer received".to_string();
            }
            if refresh {
                app.messages.fetch_messages(true).into_iter().collect()
            } else {
                Vec::new()
            }
        }
        Action::MessagesLoaded {
            chat_id,
            request,
            result,
        } => {
            app.messages.messages_loaded(&chat_id, request, result);
            Vec::new()
        }

        Action::CreateChat(title) => app.session.create_chat(&title).into_iter().collect(),
        Action::ChatCreated(result) => {
            app.session.chat_created(result);
            sync_messages(app)
        }
        Action::DeleteChat(id) => app.session.delete_chat(&id).into_iter().collect(),
        Action::ChatDeleted { chat_id, result } => {
            app.session.chat_deleted(&chat_id, result);
            sync_messages(app)
        }

        Action::DismissError => {
            app.session.dismiss_error();
            Vec::new()
        }
        Action::ToggleTheme => {
            app.theme = app.theme.toggled();
            info!("Theme switched to {}", app.theme.label());
            Vec::new()
        }
        Action::Quit => vec![Effect::Quit],
    }
}

/// Point the message list at whatever the session has selected now.
fn sync_messages(app: &mut App) -> Vec<Effect> {
    match app.session.selected_id() {
        Some(id) => {
            let id = id.to_string();
            app.messages.set_chat_id(&id).into_iter().collect()
        }
        None => {
            app.messages.clear();
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Theme;
    use crate::test_support::{chat, message, test_app};

    fn app_with_chats(chats: Vec<Chat>) -> (App, Vec<Effect>) {
        let mut app = test_app();
        let effects = update(&mut app, Action::ChatsLoaded(Ok(chats)));
        (app, effects)
    }

    #[test]
    fn test_init_requests_login_then_chats() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Init), vec![Effect::Login]);
        assert_eq!(
            update(&mut app, Action::AuthResolved(Ok(None))),
            vec![Effect::LoadChats]
        );
        assert!(app.user.is_none());
    }

    #[test]
    fn test_failed_sign_in_still_loads_chats() {
        let mut app = test_app();
        let effects = update(&mut app, Action::AuthResolved(Err(AuthError::MissingToken)));
        assert_eq!(effects, vec![Effect::LoadChats]);
        assert!(app.status_message.contains("Sign-in failed"));
    }

    #[test]
    fn test_chats_loaded_fetches_first_chat() {
        let (app, effects) = app_with_chats(vec![chat("a", "A"), chat("b", "B")]);
        assert_eq!(
            effects,
            vec![Effect::FetchMessages {
                chat_id: "a".into(),
                request: 1
            }]
        );
        assert_eq!(app.messages.chat_id(), "a");
    }

    #[test]
    fn test_empty_chat_list_fetches_nothing() {
        let (app, effects) = app_with_chats(vec![]);
        assert!(effects.is_empty());
        assert!(!app.messages.is_loading());
    }

    #[test]
    fn test_selecting_same_chat_does_not_refetch() {
        let (mut app, _) = app_with_chats(vec![chat("a", "A"), chat("b", "B")]);
        assert!(update(&mut app, Action::SelectChat("a".into())).is_empty());
        assert_eq!(
            update(&mut app, Action::SelectChat("b".into())),
            vec![Effect::FetchMessages {
                chat_id: "b".into(),
                request: 2
            }]
        );
    }

    #[test]
    fn test_answer_triggers_forced_refresh() {
        let (mut app, _) = app_with_chats(vec![chat("a", "A")]);
        update(
            &mut app,
            Action::MessagesLoaded {
                chat_id: "a".into(),
                request: 1,
                result: Ok(vec![]),
            },
        );

        let effects = update(&mut app, Action::SubmitQuestion("hi".into()));
        assert_eq!(
            effects,
            vec![Effect::AskQuestion {
                chat_id: "a".into(),
                question: "hi".into()
            }]
        );
        assert!(app.session.is_answering());

        let effects = update(
            &mut app,
            Action::QuestionAnswered {
                chat_id: "a".into(),
                result: Ok(message("m2", "a", "hello")),
            },
        );
        assert_eq!(
            effects,
            vec![Effect::FetchMessages {
                chat_id: "a".into(),
                request: 2
            }]
        );
        assert!(!app.session.is_answering());
    }

    #[test]
    fn test_failed_answer_does_not_refresh() {
        let (mut app, _) = app_with_chats(vec![chat("a", "A")]);
        update(&mut app, Action::SubmitQuestion("hi".into()));
        let effects = update(
            &mut app,
            Action::QuestionAnswered {
                chat_id: "a".into(),
                result: Err(ApiError::Network("refused".into())),
            },
        );
        assert!(effects.is_empty());
        assert!(!app.session.is_answering());
        assert!(app.session.error().is_some());
    }

    #[test]
    fn test_stale_messages_are_ignored_after_switch() {
        let (mut app, _) = app_with_chats(vec![chat("a", "A"), chat("b", "B")]);
        update(&mut app, Action::SelectChat("b".into()));
        update(
            &mut app,
            Action::MessagesLoaded {
                chat_id: "a".into(),
                request: 1,
                result: Ok(vec![message("1", "a", "old")]),
            },
        );
        assert!(app.messages.messages().is_empty());
        assert!(app.messages.is_loading());
    }

    #[test]
    fn test_deleting_selected_chat_switches_messages() {
        let (mut app, _) = app_with_chats(vec![chat("a", "A"), chat("b", "B")]);
        assert_eq!(
            update(&mut app, Action::DeleteChat("a".into())),
            vec![Effect::DeleteChat { chat_id: "a".into() }]
        );
        let effects = update(
            &mut app,
            Action::ChatDeleted {
                chat_id: "a".into(),
                result: Ok(()),
            },
        );
        assert_eq!(
            effects,
            vec![Effect::FetchMessages {
                chat_id: "b".into(),
                request: 2
            }]
        );
    }

    #[test]
    fn test_deleting_last_chat_clears_messages() {
        let (mut app, _) = app_with_chats(vec![chat("a", "A")]);
        let effects = update(
            &mut app,
            Action::ChatDeleted {
                chat_id: "a".into(),
                result: Ok(()),
            },
        );
        assert!(effects.is_empty());
        assert_eq!(app.messages.chat_id(), "");
    }

    #[test]
    fn test_created_chat_becomes_current() {
        let (mut app, _) = app_with_chats(vec![chat("a", "A")]);
        assert_eq!(
            update(&mut app, Action::CreateChat("New".into())),
            vec![Effect::CreateChat { title: "New".into() }]
        );
        let effects = update(&mut app, Action::ChatCreated(Ok(chat("c", "New"))));
        assert_eq!(app.session.selected_id(), Some("c"));
        assert_eq!(
            effects,
            vec![Effect::FetchMessages {
                chat_id: "c".into(),
                request: 2
            }]
        );
    }

    #[test]
    fn test_logout_forgets_user() {
        let mut app = test_app();
        let profile: UserProfile = serde_json::from_str(r#"{"name":"Ada"}"#).unwrap();
        update(&mut app, Action::AuthResolved(Ok(Some(profile))));
        assert!(app.user.is_some());
        assert_eq!(update(&mut app, Action::Logout), vec![Effect::Logout]);
        update(&mut app, Action::LoggedOut);
        assert!(app.user.is_none());
    }

    #[test]
    fn test_refresh_reloads_everything_visible() {
        let (mut app, _) = app_with_chats(vec![chat("a", "A")]);
        assert_eq!(
            update(&mut app, Action::Refresh),
            vec![
                Effect::LoadChats,
                Effect::FetchMessages {
                    chat_id: "a".into(),
                    request: 2
                }
            ]
        );

        let profile: UserProfile = serde_json::from_str(r#"{"name":"Ada"}"#).unwrap();
        app.user = Some(profile);
        let effects = update(&mut app, Action::Refresh);
        assert_eq!(effects.first(), Some(&Effect::LoadChats));
        assert_eq!(effects.last(), Some(&Effect::LoadProfile));
    }

    #[test]
    fn test_refresh_without_chat_only_reloads_list() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Refresh), vec![Effect::LoadChats]);
    }

    #[test]
    fn test_toggle_theme() {
        let mut app = test_app();
        assert_eq!(app.theme, Theme::Dark);
        update(&mut app, Action::ToggleTheme);
        assert_eq!(app.theme, Theme::Light);
    }

    #[test]
    fn test_quit() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), vec![Effect::Quit]);
    }
}
