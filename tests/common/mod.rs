//! Shared test doubles for the menu integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Mutex;

use modmenu::bot::{ChatSession, ChatTarget, ImageRef, Interaction, MessageHandle, RenderOptions};
use modmenu::menu_errors::TransportError;

pub const USER: u64 = 42;
pub const CHAT: ChatTarget = ChatTarget(4200);
pub const ORIGIN: MessageHandle = MessageHandle {
    chat: CHAT,
    message_id: 7,
};

/// One transport call observed by [`MockSession`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Send {
        text: String,
        options: RenderOptions,
    },
    Edit {
        message_id: i32,
        text: String,
        options: RenderOptions,
    },
    Ack(Option<String>),
    Image {
        image: ImageRef,
        caption: Option<String>,
    },
}

/// Records every call and fails on demand
pub struct MockSession {
    interaction: Interaction,
    calls: Mutex<Vec<Call>>,
    edit_error: Mutex<Option<TransportError>>,
    send_error: Mutex<Option<TransportError>>,
    next_message_id: Mutex<i32>,
}

impl MockSession {
    pub fn new(interaction: Interaction) -> Self {
        Self {
            interaction,
            calls: Mutex::new(Vec::new()),
            edit_error: Mutex::new(None),
            send_error: Mutex::new(None),
            next_message_id: Mutex::new(100),
        }
    }

    /// A `/start` or `/help` command from [`USER`]
    pub fn command() -> Self {
        Self::new(Interaction::command(USER, CHAT))
    }

    /// A button press on [`ORIGIN`]
    pub fn button() -> Self {
        Self::button_for(USER)
    }

    pub fn button_for(user_id: u64) -> Self {
        Self::new(Interaction::button(user_id, CHAT, Some(ORIGIN)))
    }

    /// Every edit fails with `err`
    pub fn failing_edits(self, err: TransportError) -> Self {
        *self.edit_error.lock().unwrap() = Some(err);
        self
    }

    /// Every send (text or image) fails with `err`
    pub fn failing_sends(self, err: TransportError) -> Self {
        *self.send_error.lock().unwrap() = Some(err);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn acks(&self) -> Vec<Option<String>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Ack(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Text and options of the last send or edit
    pub fn last_render(&self) -> Option<(String, RenderOptions)> {
        self.calls().into_iter().rev().find_map(|call| match call {
            Call::Send { text, options } | Call::Edit { text, options, .. } => Some((text, options)),
            _ => None,
        })
    }

    pub fn renders(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Send { .. } | Call::Edit { .. }))
            .count()
    }

    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_handle(&self, chat: ChatTarget) -> MessageHandle {
        let mut id = self.next_message_id.lock().unwrap();
        *id += 1;
        MessageHandle {
            chat,
            message_id: *id,
        }
    }
}

#[async_trait]
impl ChatSession for MockSession {
    fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    async fn send_message(
        &self,
        chat: ChatTarget,
        text: &str,
        options: &RenderOptions,
    ) -> Result<MessageHandle, TransportError> {
        if let Some(err) = self.send_error.lock().unwrap().clone() {
            return Err(err);
        }
        self.push(Call::Send {
            text: text.to_string(),
            options: options.clone(),
        });
        Ok(self.next_handle(chat))
    }

    async fn edit_message(
        &self,
        message: MessageHandle,
        text: &str,
        options: &RenderOptions,
    ) -> Result<(), TransportError> {
        if let Some(err) = self.edit_error.lock().unwrap().clone() {
            return Err(err);
        }
        self.push(Call::Edit {
            message_id: message.message_id,
            text: text.to_string(),
            options: options.clone(),
        });
        Ok(())
    }

    async fn acknowledge(&self, text: Option<&str>) -> Result<(), TransportError> {
        self.push(Call::Ack(text.map(str::to_string)));
        Ok(())
    }

    async fn send_image(
        &self,
        chat: ChatTarget,
        image: &ImageRef,
        caption: Option<&str>,
        _options: &RenderOptions,
    ) -> Result<MessageHandle, TransportError> {
        if let Some(err) = self.send_error.lock().unwrap().clone() {
            return Err(err);
        }
        self.push(Call::Image {
            image: image.clone(),
            caption: caption.map(str::to_string),
        });
        Ok(self.next_handle(chat))
    }
}
