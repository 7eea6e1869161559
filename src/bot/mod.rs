//! Bot module for the help menu and its Telegram plumbing
//!
//! This module is split into several submodules:
//! - `session`: Transport abstraction answered by every navigation event
//! - `navigation`: Callback data identifiers of menu actions
//! - `ui_builder`: Pagination and keyboard layout
//! - `start_screen`: Start screen records and module selection hooks
//! - `menu_controller`: The navigation state machine
//! - `telegram`: teloxide implementation of the session
//! - `message_handler` / `callback_handler`: Dispatcher endpoints

pub mod callback_handler;
pub mod menu_controller;
pub mod message_handler;
pub mod navigation;
pub mod session;
pub mod start_screen;
pub mod telegram;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::message_handler;

pub use menu_controller::{MenuController, MenuOutcome};
pub use navigation::NavAction;
pub use session::{ChatSession, ChatTarget, ImageRef, Interaction, MessageHandle, RenderOptions, Trigger};
pub use start_screen::{ModuleHook, RenderableScreen, StartScreen, StartScreenOptions};
pub use telegram::TelegramSession;
pub use ui_builder::{create_inline_keyboard, Button, ButtonAction, Keyboard};
