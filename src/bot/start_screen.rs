//! Start screens and module selection hooks
//!
//! Holds the last start screen sent to each user (for "back to start")
//! and the per-module hooks run after a module detail screen is shown.
//! Sending and editing is done by the menu controller.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::bot::session::{ChatSession, ImageRef};
use crate::bot::ui_builder::{append_help_row, create_inline_keyboard, Button, Keyboard};
use crate::text_templates::TextTemplates;

/// Side effect run after a module's detail screen has been rendered
#[async_trait]
pub trait ModuleHook: Send + Sync {
    async fn on_select(&self, session: &dyn ChatSession, module: &str) -> anyhow::Result<()>;
}

/// Layout and media options of a start screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartScreenOptions {
    pub buttons: Vec<Button>,
    pub columns: usize,
    /// Append an "open help menu" row
    pub include_help: bool,
    pub photo: Option<ImageRef>,
    /// Send the message as the photo caption instead of a separate message
    pub caption_only: bool,
}

impl Default for StartScreenOptions {
    fn default() -> Self {
        Self {
            buttons: Vec::new(),
            columns: 2,
            include_help: false,
            photo: None,
            caption_only: false,
        }
    }
}

/// A start screen as requested by the caller; also the per-user record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartScreen {
    pub message: String,
    pub options: StartScreenOptions,
}

impl StartScreen {
    pub fn new(message: impl Into<String>, options: StartScreenOptions) -> Self {
        Self {
            message: message.into(),
            options,
        }
    }
}

/// A start screen ready for the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderableScreen {
    pub text: String,
    pub keyboard: Keyboard,
    pub photo: Option<ImageRef>,
    pub caption_only: bool,
}

/// Lay out a start screen's buttons, plus the help row when requested
pub fn build_start_screen(screen: &StartScreen, texts: &TextTemplates) -> RenderableScreen {
    let options = &screen.options;
    let mut keyboard = create_inline_keyboard(options.buttons.clone(), options.columns);
    if options.include_help {
        append_help_row(&mut keyboard, texts);
    }

    RenderableScreen {
        text: screen.message.clone(),
        keyboard,
        photo: options.photo.clone(),
        caption_only: options.caption_only,
    }
}

/// Per-user start screen records and per-module hooks
#[derive(Default)]
pub struct StartScreenManager {
    records: Mutex<HashMap<u64, StartScreen>>,
    hooks: RwLock<HashMap<String, Arc<dyn ModuleHook>>>,
}

impl StartScreenManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `screen` as the last start screen of `user_id`
    pub fn record(&self, user_id: u64, screen: StartScreen) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user_id, screen);
    }

    /// Last start screen sent to `user_id`
    pub fn last_screen(&self, user_id: u64) -> Option<StartScreen> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&user_id)
            .cloned()
    }

    /// Register the hook for `module`, replacing any previous one
    pub fn on_module_select(&self, module: &str, hook: Arc<dyn ModuleHook>) {
        self.hooks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(module.to_string(), hook);
    }

    pub fn hook_for(&self, module: &str) -> Option<Arc<dyn ModuleHook>> {
        self.hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(module)
            .cloned()
    }
}

impl std::fmt::Debug for StartScreenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hooks: Vec<String> = self
            .hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        f.debug_struct("StartScreenManager")
            .field("hooks", &hooks)
            .finish_non_exhaustive()
    }
}
