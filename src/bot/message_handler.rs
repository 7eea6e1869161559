//! Message Handler module for the `/start` and `/help` commands

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::debug;

use super::menu_controller::MenuController;
use super::start_screen::StartScreen;
use super::telegram::TelegramSession;

/// Bot command recognised by the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Start,
    Help,
}

/// Extract the menu command of a message text, ignoring a `@botname`
/// suffix and any arguments
pub fn parse_command(text: &str) -> Option<MenuCommand> {
    let command = text.split_whitespace().next()?.strip_prefix('/')?;
    let name = command.split('@').next().unwrap_or(command);

    match name.to_lowercase().as_str() {
        "start" => Some(MenuCommand::Start),
        "help" => Some(MenuCommand::Help),
        _ => None,
    }
}

/// Handle incoming messages; anything but a menu command is ignored
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    controller: Arc<MenuController>,
    start_screen: Arc<StartScreen>,
) -> Result<()> {
    let Some(command) = msg.text().and_then(parse_command) else {
        return Ok(());
    };
    debug!(user_id = %msg.chat.id, command = ?command, "Received menu command");

    let session = TelegramSession::from_message(bot, &msg);
    match command {
        MenuCommand::Help => {
            controller.show_help_menu(&session, 1).await?;
        }
        MenuCommand::Start => {
            controller
                .send_start_screen(&session, start_screen.as_ref().clone())
                .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("/help"), Some(MenuCommand::Help));
        assert_eq!(parse_command("/start"), Some(MenuCommand::Start));
        assert_eq!(parse_command("/help@menu_bot"), Some(MenuCommand::Help));
        assert_eq!(parse_command("/START now"), Some(MenuCommand::Start));
    }

    #[test]
    fn test_ignore_other_text() {
        assert_eq!(parse_command("help"), None);
        assert_eq!(parse_command("/weather"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
    }
}
