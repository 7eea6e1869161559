//! # Modular Help Menu for Telegram Bots
//!
//! Discovers the bot's modules, shows them as a paginated inline-keyboard
//! help menu, renders per-module help screens, and keeps users' start
//! screens so they can navigate back to them.

pub mod bot;
pub mod flood_control;
pub mod menu_config;
pub mod menu_errors;
pub mod module_registry;
pub mod text_templates;
pub mod theme;

pub use bot::{MenuController, MenuOutcome};
pub use menu_config::MenuConfig;
pub use menu_errors::{MenuError, TransportError};
