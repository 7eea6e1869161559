//! Chat session abstraction
//!
//! A [`ChatSession`] is one inbound navigation event together with the
//! transport able to answer it. The menu layer never talks to a chat API
//! directly; the Telegram implementation lives in `telegram.rs`.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::bot::ui_builder::Keyboard;
use crate::menu_config::RichTextMode;
use crate::menu_errors::TransportError;

/// Chat a message is delivered to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatTarget(pub i64);

/// A message already delivered to a chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHandle {
    pub chat: ChatTarget,
    pub message_id: i32,
}

/// What started the current event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// A fresh command message
    Command,
    /// A button press; `origin` is the message carrying the button when the
    /// transport still has access to it
    Button { origin: Option<MessageHandle> },
}

/// The acting user and where the event happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    pub user_id: u64,
    pub chat: ChatTarget,
    pub trigger: Trigger,
}

impl Interaction {
    pub fn command(user_id: u64, chat: ChatTarget) -> Self {
        Self {
            user_id,
            chat,
            trigger: Trigger::Command,
        }
    }

    pub fn button(user_id: u64, chat: ChatTarget, origin: Option<MessageHandle>) -> Self {
        Self {
            user_id,
            chat,
            trigger: Trigger::Button { origin },
        }
    }

    pub fn is_button(&self) -> bool {
        matches!(self.trigger, Trigger::Button { .. })
    }

    /// Message to edit in place, if any
    pub fn origin(&self) -> Option<MessageHandle> {
        match self.trigger {
            Trigger::Button { origin } => origin,
            Trigger::Command => None,
        }
    }
}

/// Image attached to a screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    Url(String),
    FileId(String),
    Path(PathBuf),
}

/// Markup mode and optional keyboard of a rendered message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub mode: RichTextMode,
    pub keyboard: Option<Keyboard>,
}

impl RenderOptions {
    pub fn new(mode: RichTextMode, keyboard: Option<Keyboard>) -> Self {
        Self { mode, keyboard }
    }
}

/// Transport capability for a single navigation event
#[async_trait]
pub trait ChatSession: Send + Sync {
    /// The event being answered
    fn interaction(&self) -> &Interaction;

    async fn send_message(
        &self,
        chat: ChatTarget,
        text: &str,
        options: &RenderOptions,
    ) -> Result<MessageHandle, TransportError>;

    /// Fails with [`TransportError::NotModified`] when nothing would change
    async fn edit_message(
        &self,
        message: MessageHandle,
        text: &str,
        options: &RenderOptions,
    ) -> Result<(), TransportError>;

    /// Lightweight acknowledgment of a button press; no-op for commands
    async fn acknowledge(&self, text: Option<&str>) -> Result<(), TransportError>;

    async fn send_image(
        &self,
        chat: ChatTarget,
        image: &ImageRef,
        caption: Option<&str>,
        options: &RenderOptions,
    ) -> Result<MessageHandle, TransportError>;
}
