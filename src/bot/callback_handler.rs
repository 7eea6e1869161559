//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::debug;

use super::menu_controller::MenuController;
use super::session::ChatSession;
use super::telegram::TelegramSession;

/// Route a callback query through the menu controller.
///
/// Presses that carry no menu action are answered silently so the client
/// stops showing its loading indicator.
pub async fn callback_handler(
    bot: Bot,
    q: teloxide::types::CallbackQuery,
    controller: Arc<MenuController>,
) -> Result<()> {
    debug!(user_id = %q.from.id, "Received callback query from user");

    let data = q.data.clone().unwrap_or_default();
    let session = TelegramSession::from_callback(bot, q);

    if !controller.handle_action(&session, &data).await? {
        debug!(data = %data, "Callback data is not a menu action");
        session.acknowledge(None).await?;
    }

    Ok(())
}
