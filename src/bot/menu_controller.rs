//! Menu Controller module orchestrating the help menu screens
//!
//! Every navigation event is handled independently:
//! flood control, registry lookup, layout, theming, then one render
//! request to the [`ChatSession`]. Shared state (registry, flood records,
//! start screens, hooks) is only touched in single-step lock sections that
//! never span a transport call.

use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, error, warn};

use crate::bot::navigation::NavAction;
use crate::bot::session::{ChatSession, ChatTarget, MessageHandle, RenderOptions};
use crate::bot::start_screen::{
    build_start_screen, ModuleHook, RenderableScreen, StartScreen, StartScreenManager,
};
use crate::bot::ui_builder::{
    append_start_back_row, build_menu_keyboard, build_module_keyboard, paginate, total_pages,
    Keyboard,
};
use crate::flood_control::FloodController;
use crate::menu_config::{MenuConfig, TransportErrorMode};
use crate::menu_errors::{MenuError, TransportError};
use crate::module_registry::{DirectorySource, LoadReport, ModuleRegistry, ModuleSource};
use crate::text_templates::{TextKey, TextTemplates};
use crate::theme::{StyleKind, ThemeRegistry};

/// How a navigation event was answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    /// A new message was sent
    Sent,
    /// The originating message was edited in place
    Edited,
    /// The transport reported the content as unchanged
    Unchanged,
    /// Flood control rejected the action
    Throttled,
    /// The requested module or start screen does not exist
    NotFound,
    /// The transport failed and the failure was logged
    Failed,
}

impl MenuOutcome {
    /// Whether the screen is on the user's side after this outcome
    pub fn is_rendered(self) -> bool {
        matches!(self, MenuOutcome::Sent | MenuOutcome::Edited | MenuOutcome::Unchanged)
    }
}

/// Active theme and the texts derived from it
#[derive(Debug)]
struct Appearance {
    themes: ThemeRegistry,
    texts: TextTemplates,
}

/// Help menu orchestration for one bot deployment
#[derive(Debug)]
pub struct MenuController {
    config: MenuConfig,
    registry: RwLock<ModuleRegistry>,
    appearance: RwLock<Appearance>,
    flood: FloodController,
    start_screens: StartScreenManager,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl MenuController {
    /// Create a controller and load modules from the configured directory
    pub fn new(config: MenuConfig) -> Self {
        let source = DirectorySource::from_config(&config);
        Self::with_source(config, &source)
    }

    /// Create a controller and load modules from `source`
    pub fn with_source(config: MenuConfig, source: &dyn ModuleSource) -> Self {
        let mut registry = ModuleRegistry::new();
        registry.load_from_source(source);
        Self::with_registry(config, registry)
    }

    /// Create a controller around an already populated registry
    pub fn with_registry(config: MenuConfig, registry: ModuleRegistry) -> Self {
        let config = config.normalized();
        let themes = ThemeRegistry::new(&config.theme, config.themes.clone());
        let texts = TextTemplates::new(&themes.active().emojis, &config.texts);
        let flood = FloodController::new(config.flood_wait());

        Self {
            config,
            registry: RwLock::new(registry),
            appearance: RwLock::new(Appearance { themes, texts }),
            flood,
            start_screens: StartScreenManager::new(),
        }
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    // Registry

    /// Register or overwrite a module; ignored when either argument is empty
    pub fn register_module(&self, name: &str, help_text: &str) {
        write(&self.registry).register(name, help_text);
    }

    /// Remove a module; true when it existed
    pub fn unregister_module(&self, name: &str) -> bool {
        write(&self.registry).unregister(name)
    }

    /// Replace the registry content with the modules of `source`
    pub fn reload_modules(&self, source: &dyn ModuleSource) -> LoadReport {
        let mut registry = ModuleRegistry::new();
        let report = registry.load_from_source(source);
        *write(&self.registry) = registry;
        report
    }

    /// Module names in menu order
    pub fn module_names(&self) -> Vec<String> {
        read(&self.registry).names()
    }

    pub fn module_count(&self) -> usize {
        read(&self.registry).len()
    }

    // Theming

    /// Switch the active theme and re-derive the texts; false when unknown
    pub fn set_theme(&self, name: &str) -> bool {
        let mut appearance = write(&self.appearance);
        if !appearance.themes.set_active(name) {
            return false;
        }
        appearance.texts = TextTemplates::new(&appearance.themes.active().emojis, &self.config.texts);
        true
    }

    pub fn active_theme(&self) -> String {
        read(&self.appearance).themes.active_name().to_string()
    }

    /// Format `text` with the active theme's template for `kind`
    pub fn format_text(&self, kind: StyleKind, text: &str) -> String {
        read(&self.appearance).themes.format_text(kind, text)
    }

    /// Snapshot of the current texts
    pub fn texts(&self) -> TextTemplates {
        read(&self.appearance).texts.clone()
    }

    // Hooks and start screens

    /// Run `hook` after the detail screen of `module` is shown (replaces any
    /// previous hook for that module)
    pub fn on_module_select(&self, module: &str, hook: impl ModuleHook + 'static) {
        self.start_screens.on_module_select(module, Arc::new(hook));
    }

    /// Lay out a start screen with the current texts
    pub fn build_start_screen(&self, screen: &StartScreen) -> RenderableScreen {
        build_start_screen(screen, &read(&self.appearance).texts)
    }

    // Navigation

    /// Route callback data; `Ok(false)` when it is not a menu action
    pub async fn handle_action(
        &self,
        session: &dyn ChatSession,
        data: &str,
    ) -> Result<bool, MenuError> {
        match NavAction::parse(data) {
            NavAction::Module(name) => self.show_module_help(session, &name).await?,
            NavAction::Page(page) => self.show_help_menu(session, page).await?,
            NavAction::BackToHelp | NavAction::ShowHelp => self.show_help_menu(session, 1).await?,
            NavAction::BackToStart => self.back_to_start(session).await?,
            NavAction::Unknown(_) => return Ok(false),
        };
        Ok(true)
    }

    /// Show page `page` (1-based, clamped) of the help menu
    pub async fn show_help_menu(
        &self,
        session: &dyn ChatSession,
        page: usize,
    ) -> Result<MenuOutcome, MenuError> {
        if self.is_throttled(session).await {
            return Ok(MenuOutcome::Throttled);
        }

        let names = self.module_names();
        if names.is_empty() {
            let text = read(&self.appearance).texts.get(TextKey::NoModulesLoaded).to_string();
            return self.render(session, &text, None, TextKey::ContentUnchanged).await;
        }

        let page_size = self.config.page_size;
        let pages = total_pages(names.len(), page_size);
        let page = page.clamp(1, pages);
        let items = paginate(&names, page_size, page);
        debug!(user_id = session.interaction().user_id, page, pages, "Showing help menu");

        let (text, keyboard) = {
            let appearance = read(&self.appearance);
            let texts = &appearance.texts;
            let title = appearance
                .themes
                .format_text(StyleKind::Title, texts.get(TextKey::HelpMenuTitle));
            let count = names.len().to_string();
            let modules = items.join("\n");
            let intro = texts.render(
                TextKey::HelpMenuIntro,
                &[("count", count.as_str()), ("modules", modules.as_str())],
            );

            let mut keyboard = build_menu_keyboard(items, page, pages, self.config.columns, texts);
            if self.config.include_start_back {
                append_start_back_row(&mut keyboard, texts);
            }
            (format!("{title}\n{intro}"), keyboard)
        };

        self.render(session, &text, Some(keyboard), TextKey::AlreadyOnPage)
            .await
    }

    /// Show the detail screen of `module`, then run its hook if any
    pub async fn show_module_help(
        &self,
        session: &dyn ChatSession,
        module: &str,
    ) -> Result<MenuOutcome, MenuError> {
        if self.is_throttled(session).await {
            return Ok(MenuOutcome::Throttled);
        }

        let help_text = read(&self.registry).help_text(module).map(str::to_string);
        let Some(help_text) = help_text else {
            debug!(user_id = session.interaction().user_id, module = %module, "Unknown module requested");
            self.acknowledge_with(session, TextKey::ModuleNotFound).await;
            return Ok(MenuOutcome::NotFound);
        };

        let (text, keyboard) = {
            let appearance = read(&self.appearance);
            let texts = &appearance.texts;
            let title = appearance.themes.format_text(
                StyleKind::Title,
                &texts.render(TextKey::ModuleHelpTitle, &[("moduleName", module)]),
            );
            let body = texts.render(TextKey::ModuleHelpIntro, &[("helpText", help_text.as_str())]);

            let mut keyboard = build_module_keyboard(texts);
            if self.config.include_start_back {
                append_start_back_row(&mut keyboard, texts);
            }
            (format!("{title}\n{body}"), keyboard)
        };

        let outcome = self
            .render(session, &text, Some(keyboard), TextKey::ContentUnchanged)
            .await?;
        if outcome.is_rendered() {
            self.run_hook(session, module).await;
        }
        Ok(outcome)
    }

    /// Send a start screen and remember it as the user's last one
    pub async fn send_start_screen(
        &self,
        session: &dyn ChatSession,
        screen: StartScreen,
    ) -> Result<MenuOutcome, MenuError> {
        let rendered = self.build_start_screen(&screen);
        let interaction = session.interaction();

        match self.deliver_screen(session, interaction.chat, &rendered).await {
            Ok(_) => {
                self.start_screens.record(interaction.user_id, screen);
                Ok(MenuOutcome::Sent)
            }
            Err(e) => self.transport_failure(e),
        }
    }

    /// Return to the user's last start screen
    pub async fn back_to_start(&self, session: &dyn ChatSession) -> Result<MenuOutcome, MenuError> {
        let interaction = session.interaction();
        let Some(screen) = self.start_screens.last_screen(interaction.user_id) else {
            self.acknowledge_with(session, TextKey::NoPreviousScreen).await;
            return Ok(MenuOutcome::NotFound);
        };

        let rendered = self.build_start_screen(&screen);
        if rendered.photo.is_none() {
            let keyboard = (!rendered.keyboard.is_empty()).then_some(rendered.keyboard);
            return self
                .render(session, &rendered.text, keyboard, TextKey::ContentUnchanged)
                .await;
        }

        // Media cannot be attached by an edit, so the screen is sent again
        match self.deliver_screen(session, interaction.chat, &rendered).await {
            Ok(_) => {
                self.acknowledge(session, None).await;
                Ok(MenuOutcome::Sent)
            }
            Err(e) => {
                self.acknowledge_with(session, TextKey::GenericError).await;
                self.transport_failure(e)
            }
        }
    }

    // Status notices

    /// Send `message` through the `successMessage` template
    pub async fn send_success(
        &self,
        session: &dyn ChatSession,
        message: &str,
    ) -> Result<MenuOutcome, MenuError> {
        self.send_notice(session, TextKey::SuccessMessage, message).await
    }

    pub async fn send_error(
        &self,
        session: &dyn ChatSession,
        message: &str,
    ) -> Result<MenuOutcome, MenuError> {
        self.send_notice(session, TextKey::ErrorMessage, message).await
    }

    pub async fn send_info(
        &self,
        session: &dyn ChatSession,
        message: &str,
    ) -> Result<MenuOutcome, MenuError> {
        self.send_notice(session, TextKey::InfoMessage, message).await
    }

    async fn send_notice(
        &self,
        session: &dyn ChatSession,
        key: TextKey,
        message: &str,
    ) -> Result<MenuOutcome, MenuError> {
        let text = read(&self.appearance).texts.render(key, &[("message", message)]);
        let options = RenderOptions::new(self.config.parse_mode, None);
        match session.send_message(session.interaction().chat, &text, &options).await {
            Ok(_) => Ok(MenuOutcome::Sent),
            Err(e) => self.transport_failure(e),
        }
    }

    // Internals

    /// Flood check for button presses; answers throttled presses itself
    async fn is_throttled(&self, session: &dyn ChatSession) -> bool {
        let interaction = session.interaction();
        if !interaction.is_button() || self.flood.check_and_record(interaction.user_id) {
            return false;
        }
        warn!(user_id = interaction.user_id, "Navigation throttled by flood control");
        self.acknowledge_with(session, TextKey::FloodMessage).await;
        true
    }

    /// Edit the originating message of a button press, or send a new one.
    ///
    /// Unchanged content is acknowledged with `unchanged`; other transport
    /// failures are acknowledged generically and handed to the error policy.
    async fn render(
        &self,
        session: &dyn ChatSession,
        text: &str,
        keyboard: Option<Keyboard>,
        unchanged: TextKey,
    ) -> Result<MenuOutcome, MenuError> {
        let options = RenderOptions::new(self.config.parse_mode, keyboard);
        let interaction = session.interaction();

        let result = match interaction.origin() {
            Some(origin) => session
                .edit_message(origin, text, &options)
                .await
                .map(|()| MenuOutcome::Edited),
            None => session
                .send_message(interaction.chat, text, &options)
                .await
                .map(|_| MenuOutcome::Sent),
        };

        match result {
            Ok(outcome) => {
                self.acknowledge(session, None).await;
                Ok(outcome)
            }
            Err(e) if e.is_not_modified() => {
                self.acknowledge_with(session, unchanged).await;
                Ok(MenuOutcome::Unchanged)
            }
            Err(e) => {
                self.acknowledge_with(session, TextKey::GenericError).await;
                self.transport_failure(e)
            }
        }
    }

    async fn deliver_screen(
        &self,
        session: &dyn ChatSession,
        chat: ChatTarget,
        screen: &RenderableScreen,
    ) -> Result<MessageHandle, TransportError> {
        let keyboard = (!screen.keyboard.is_empty()).then(|| screen.keyboard.clone());
        let options = RenderOptions::new(self.config.parse_mode, keyboard);

        match &screen.photo {
            Some(photo) if screen.caption_only => {
                session
                    .send_image(chat, photo, Some(screen.text.as_str()), &options)
                    .await
            }
            Some(photo) => {
                session
                    .send_image(chat, photo, None, &RenderOptions::new(self.config.parse_mode, None))
                    .await?;
                session.send_message(chat, &screen.text, &options).await
            }
            None => session.send_message(chat, &screen.text, &options).await,
        }
    }

    async fn run_hook(&self, session: &dyn ChatSession, module: &str) {
        let Some(hook) = self.start_screens.hook_for(module) else {
            return;
        };

        match AssertUnwindSafe(hook.on_select(session, module)).catch_unwind().await {
            Ok(Ok(())) => debug!(module = %module, "Module hook completed"),
            Ok(Err(e)) => warn!(module = %module, error = %e, "Module hook failed"),
            Err(_) => error!(module = %module, "Module hook panicked"),
        }
    }

    fn transport_failure(&self, err: TransportError) -> Result<MenuOutcome, MenuError> {
        error!(error = %err, "Failed to render menu");
        match self.config.error_mode {
            TransportErrorMode::Swallow => Ok(MenuOutcome::Failed),
            TransportErrorMode::Propagate => Err(MenuError::Transport(err)),
        }
    }

    async fn acknowledge_with(&self, session: &dyn ChatSession, key: TextKey) {
        let text = read(&self.appearance).texts.get(key).to_string();
        self.acknowledge(session, Some(&text)).await;
    }

    async fn acknowledge(&self, session: &dyn ChatSession, text: Option<&str>) {
        if !session.interaction().is_button() {
            return;
        }
        if let Err(e) = session.acknowledge(text).await {
            warn!(error = %e, "Failed to acknowledge interaction");
        }
    }
}
