use anyhow::{Context, Result};
use async_trait::async_trait;
use std::env;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use modmenu::bot::{
    self, Button, ChatSession, ImageRef, MenuController, ModuleHook, RenderOptions, StartScreen,
    StartScreenOptions,
};
use modmenu::MenuConfig;

/// Sends a short forecast note whenever the Weather module is opened
struct WeatherHook;

#[async_trait]
impl ModuleHook for WeatherHook {
    async fn on_select(&self, session: &dyn ChatSession, _module: &str) -> Result<()> {
        let chat = session.interaction().chat;
        session
            .send_message(
                chat,
                "Try /weather <city> to get the current forecast.",
                &RenderOptions::default(),
            )
            .await?;
        Ok(())
    }
}

fn start_screen() -> StartScreen {
    let photo = env::var("MENU_START_PHOTO").ok().map(ImageRef::Url);

    StartScreen::new(
        "👋 Welcome! Pick a link below or open the help menu.",
        StartScreenOptions {
            buttons: vec![
                Button::url("GitHub", "https://github.com"),
                Button::url("Telegram", "https://telegram.org"),
                Button::callback("Support", "support:contact"),
            ],
            columns: 2,
            include_help: true,
            photo,
            caption_only: false,
        },
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting help menu bot");

    let bot_token = env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;

    let config = match env::var("MENU_CONFIG_FILE") {
        Ok(path) => MenuConfig::from_json_file(&path)
            .with_context(|| format!("Failed to load menu configuration from {path}"))?,
        Err(_) => MenuConfig::from_env().context("Invalid MENU_* environment configuration")?,
    };
    info!(modules_path = %config.modules_path.display(), theme = %config.theme, "Menu configuration loaded");

    let controller = Arc::new(MenuController::new(config));
    if controller.module_count() == 0 {
        controller.register_module(
            "Basic Commands",
            "/start - Show the start screen\n/help - Open this help menu",
        );
    }
    controller.register_module("Weather", "/weather <city> - Current forecast for a city");
    controller.on_module_select("Weather", WeatherHook);
    info!(modules = controller.module_count(), "Modules registered");

    let start = Arc::new(start_screen());
    let bot = Bot::new(bot_token);

    info!("Bot initialized, starting dispatcher");

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint({
            let controller = Arc::clone(&controller);
            let start = Arc::clone(&start);
            move |bot: Bot, msg: Message| {
                let controller = Arc::clone(&controller);
                let start = Arc::clone(&start);
                async move { bot::message_handler(bot, msg, controller, start).await }
            }
        }))
        .branch(Update::filter_callback_query().endpoint({
            let controller = Arc::clone(&controller);
            move |bot: Bot, q: CallbackQuery| {
                let controller = Arc::clone(&controller);
                async move { bot::callback_handler(bot, q, controller).await }
            }
        }));

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
