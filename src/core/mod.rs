//! # Core Application Logic
//!
//! Chatdesk's business logic. It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Controllers (state)  │
//!                    │  • Action / Effect      │
//!                    │  • update() (reducer)   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │                          │    API     │
//!     │  Adapter   │ ── Effect ─► Dispatcher ─│  services  │
//!     │ (ratatui)  │ ◄─ Action ──             │  (reqwest) │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`models`]: Chat, Message and profile records
//! - [`session`]: chat list, selection and the "answering" flag
//! - [`messages`]: messages of the selected chat, stale-response guard
//! - [`action`]: `Action`, `Effect` and the `update()` reducer
//! - [`state`]: the `App` struct composing the controllers
//! - [`dispatch`]: runs effects against the services
//! - [`auth`]: sign-in capability (real token adapter and offline mock)
//! - [`config`]: layered settings

pub mod action;
pub mod auth;
pub mod config;
pub mod dispatch;
pub mod messages;
pub mod models;
pub mod session;
pub mod state;
