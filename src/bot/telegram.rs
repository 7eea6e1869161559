//! Telegram implementation of [`ChatSession`] on top of teloxide

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    CallbackQuery, FileId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId,
    ParseMode, WebAppInfo,
};
use teloxide::RequestError;

use crate::bot::session::{ChatSession, ChatTarget, ImageRef, Interaction, MessageHandle, RenderOptions};
use crate::bot::ui_builder::{Button, ButtonAction, Keyboard};
use crate::menu_config::RichTextMode;
use crate::menu_errors::TransportError;

/// One Telegram update (command message or callback query) plus the bot
pub struct TelegramSession {
    bot: Bot,
    interaction: Interaction,
    query: Option<CallbackQuery>,
}

impl TelegramSession {
    /// Session for a command message
    pub fn from_message(bot: Bot, msg: &Message) -> Self {
        let chat = ChatTarget(msg.chat.id.0);
        let user_id = msg
            .from
            .as_ref()
            .map(|user| user.id.0)
            .unwrap_or(msg.chat.id.0 as u64);

        Self {
            bot,
            interaction: Interaction::command(user_id, chat),
            query: None,
        }
    }

    /// Session for a button press
    pub fn from_callback(bot: Bot, q: CallbackQuery) -> Self {
        let origin = q.message.as_ref().map(|msg| MessageHandle {
            chat: ChatTarget(msg.chat().id.0),
            message_id: msg.id().0,
        });
        let chat = origin
            .map(|handle| handle.chat)
            .unwrap_or(ChatTarget(q.from.id.0 as i64));

        Self {
            bot,
            interaction: Interaction::button(q.from.id.0, chat, origin),
            query: Some(q),
        }
    }
}

#[allow(deprecated)]
fn parse_mode(mode: RichTextMode) -> Option<ParseMode> {
    match mode {
        RichTextMode::Plain => None,
        RichTextMode::Markdown => Some(ParseMode::Markdown),
        RichTextMode::MarkdownV2 => Some(ParseMode::MarkdownV2),
        RichTextMode::Html => Some(ParseMode::Html),
    }
}

fn parse_url(url: &str) -> Result<reqwest::Url, TransportError> {
    reqwest::Url::parse(url).map_err(|e| TransportError::InvalidButton(format!("{url}: {e}")))
}

fn inline_button(button: &Button) -> Result<InlineKeyboardButton, TransportError> {
    let label = button.label.clone();
    Ok(match &button.action {
        ButtonAction::Callback(data) => InlineKeyboardButton::callback(label, data.clone()),
        ButtonAction::Url(url) => InlineKeyboardButton::url(label, parse_url(url)?),
        ButtonAction::WebApp(url) => {
            InlineKeyboardButton::web_app(label, WebAppInfo { url: parse_url(url)? })
        }
    })
}

/// Convert a keyboard into Telegram inline markup
pub fn inline_keyboard(keyboard: &Keyboard) -> Result<InlineKeyboardMarkup, TransportError> {
    let rows = keyboard
        .rows
        .iter()
        .map(|row| row.iter().map(inline_button).collect::<Result<Vec<_>, _>>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(InlineKeyboardMarkup::new(rows))
}

fn input_file(image: &ImageRef) -> Result<InputFile, TransportError> {
    Ok(match image {
        ImageRef::Url(url) => InputFile::url(parse_url(url)?),
        ImageRef::FileId(id) => InputFile::file_id(FileId(id.clone())),
        ImageRef::Path(path) => InputFile::file(path.clone()),
    })
}

fn transport_error(err: RequestError) -> TransportError {
    match err {
        RequestError::Network(e) => TransportError::Network(e.to_string()),
        other => TransportError::from_description(&other.to_string()),
    }
}

#[async_trait]
impl ChatSession for TelegramSession {
    fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    async fn send_message(
        &self,
        chat: ChatTarget,
        text: &str,
        options: &RenderOptions,
    ) -> Result<MessageHandle, TransportError> {
        let mut request = self.bot.send_message(ChatId(chat.0), text);
        if let Some(mode) = parse_mode(options.mode) {
            request = request.parse_mode(mode);
        }
        if let Some(keyboard) = &options.keyboard {
            request = request.reply_markup(inline_keyboard(keyboard)?);
        }

        let sent = request.await.map_err(transport_error)?;
        Ok(MessageHandle {
            chat,
            message_id: sent.id.0,
        })
    }

    async fn edit_message(
        &self,
        message: MessageHandle,
        text: &str,
        options: &RenderOptions,
    ) -> Result<(), TransportError> {
        let mut request = self.bot.edit_message_text(
            ChatId(message.chat.0),
            MessageId(message.message_id),
            text,
        );
        if let Some(mode) = parse_mode(options.mode) {
            request = request.parse_mode(mode);
        }
        if let Some(keyboard) = &options.keyboard {
            request = request.reply_markup(inline_keyboard(keyboard)?);
        }

        request.await.map_err(transport_error)?;
        Ok(())
    }

    async fn acknowledge(&self, text: Option<&str>) -> Result<(), TransportError> {
        let Some(q) = &self.query else {
            return Ok(());
        };

        let mut request = self.bot.answer_callback_query(q.id.clone());
        if let Some(text) = text {
            request = request.text(text);
        }
        request.await.map_err(transport_error)?;
        Ok(())
    }

    async fn send_image(
        &self,
        chat: ChatTarget,
        image: &ImageRef,
        caption: Option<&str>,
        options: &RenderOptions,
    ) -> Result<MessageHandle, TransportError> {
        let mut request = self.bot.send_photo(ChatId(chat.0), input_file(image)?);
        if let Some(caption) = caption {
            request = request.caption(caption);
            if let Some(mode) = parse_mode(options.mode) {
                request = request.parse_mode(mode);
            }
        }
        if let Some(keyboard) = &options.keyboard {
            request = request.reply_markup(inline_keyboard(keyboard)?);
        }

        let sent = request.await.map_err(transport_error)?;
        Ok(MessageHandle {
            chat,
            message_id: sent.id.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_conversion() {
        let keyboard = Keyboard::new(vec![
            vec![
                Button::callback("Echo", "module:Echo"),
                Button::url("GitHub", "https://github.com"),
            ],
            vec![Button::web_app("App", "https://example.com/app")],
        ]);

        let markup = inline_keyboard(&keyboard).unwrap();
        assert_eq!(markup.inline_keyboard.len(), 2);
        assert_eq!(markup.inline_keyboard[0].len(), 2);
        assert_eq!(markup.inline_keyboard[0][0].text, "Echo");
        assert_eq!(markup.inline_keyboard[1][0].text, "App");
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let keyboard = Keyboard::new(vec![vec![Button::url("Broken", "not a url")]]);
        assert!(matches!(
            inline_keyboard(&keyboard),
            Err(TransportError::InvalidButton(_))
        ));
    }

    #[test]
    fn test_parse_mode_mapping() {
        assert_eq!(parse_mode(RichTextMode::Plain), None);
        assert_eq!(parse_mode(RichTextMode::Html), Some(ParseMode::Html));
        assert_eq!(parse_mode(RichTextMode::MarkdownV2), Some(ParseMode::MarkdownV2));
    }
}
