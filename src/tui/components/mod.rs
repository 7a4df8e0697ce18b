//! # TUI Components
//!
//! Every piece of the Chatdesk screen.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Receive everything they draw as struct fields, built fresh each frame:
//! - `Navbar`: top bar with backend, user and theme
//! - `Footer`: status or error line plus key hints
//! - `MessageView`: one message box
//!
//! ### Stateful Components (Event-Driven)
//!
//! Persistent state lives in `TuiState`; a transient wrapper borrows it to render:
//! - `ChatListState` / `ChatList`: sidebar, emits `ChatListEvent`
//! - `MessageListState` / `MessageList`: scrollable history with layout caching
//! - `InputBox`: question editor, emits `InputEvent`
//! - `CreateChatState` / `CreateChatDialog`: modal for a new chat title
//!
//! Components never touch `App` directly. The event loop reads their events
//! and turns them into `Action`s for the reducer.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs                (this file)
//! ├── navbar.rs
//! ├── footer.rs
//! ├── chat_list.rs
//! ├── message.rs
//! ├── message_list.rs
//! ├── input_box.rs
//! └── create_chat_dialog.rs
//! ```

pub mod chat_list;
pub mod create_chat_dialog;
pub mod footer;
pub mod input_box;
pub mod message;
pub mod message_list;
pub mod navbar;

pub use chat_list::{ChatList, ChatListEvent, ChatListState};
pub use create_chat_dialog::{CreateChatDialog, CreateChatState, DialogEvent};
pub use footer::Footer;
pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use navbar::Navbar;
