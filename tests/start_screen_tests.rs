//! Integration tests for start screens and "back to start"

mod common;

use anyhow::Result;

use common::{Call, MockSession, CHAT, ORIGIN};
use modmenu::bot::{
    Button, ImageRef, Interaction, MenuController, MenuOutcome, StartScreen, StartScreenOptions,
};
use modmenu::menu_config::MenuConfig;
use modmenu::menu_errors::TransportError;
use modmenu::module_registry::ModuleRegistry;

fn controller() -> MenuController {
    let config = MenuConfig {
        flood_wait_ms: 0,
        ..Default::default()
    };
    let mut registry = ModuleRegistry::new();
    registry.register("Echo", "/echo <text>");
    MenuController::with_registry(config, registry)
}

fn welcome(photo: Option<ImageRef>, caption_only: bool) -> StartScreen {
    StartScreen::new(
        "Welcome!",
        StartScreenOptions {
            buttons: vec![
                Button::url("GitHub", "https://github.com"),
                Button::url("Telegram", "https://telegram.org"),
                Button::callback("Support", "support:contact"),
            ],
            columns: 2,
            include_help: true,
            photo,
            caption_only,
        },
    )
}

#[tokio::test]
async fn test_start_screen_is_sent_and_restored() -> Result<()> {
    let controller = controller();

    let command = MockSession::command();
    assert_eq!(
        controller.send_start_screen(&command, welcome(None, false)).await?,
        MenuOutcome::Sent
    );
    let (text, options) = command.last_render().unwrap();
    assert_eq!(text, "Welcome!");
    let keyboard = options.keyboard.unwrap();
    let widths: Vec<usize> = keyboard.rows.iter().map(Vec::len).collect();
    assert_eq!(widths, vec![2, 1, 1]);
    assert!(keyboard.has_callback("show:help"));

    // Open the help menu from the start screen, then come back
    let help = MockSession::button();
    assert!(controller.handle_action(&help, "show:help").await?);
    assert!(help.last_render().unwrap().0.starts_with("**🛠 Help Menu**"));

    let back = MockSession::button();
    assert!(controller.handle_action(&back, "back:start").await?);
    match &back.calls()[0] {
        Call::Edit {
            message_id, text, ..
        } => {
            assert_eq!(*message_id, ORIGIN.message_id);
            assert_eq!(text, "Welcome!");
        }
        other => panic!("expected an edit, got {other:?}"),
    }
    assert_eq!(back.acks(), vec![None]);
    Ok(())
}

#[tokio::test]
async fn test_back_to_start_without_record() -> Result<()> {
    let controller = controller();

    let session = MockSession::button();
    assert_eq!(controller.back_to_start(&session).await?, MenuOutcome::NotFound);
    assert_eq!(session.calls(), vec![Call::Ack(Some("No previous screen found".to_string()))]);

    // Screens are recorded per user
    controller
        .send_start_screen(&MockSession::command(), welcome(None, false))
        .await?;
    let stranger = MockSession::button_for(9);
    assert_eq!(controller.back_to_start(&stranger).await?, MenuOutcome::NotFound);
    assert_eq!(stranger.renders(), 0);
    Ok(())
}

#[tokio::test]
async fn test_photo_screen_is_sent_again() -> Result<()> {
    let controller = controller();
    let photo = ImageRef::Url("https://example.com/banner.png".to_string());

    let command = MockSession::command();
    controller
        .send_start_screen(&command, welcome(Some(photo.clone()), false))
        .await?;
    let calls = command.calls();
    assert_eq!(
        calls[0],
        Call::Image {
            image: photo.clone(),
            caption: None,
        }
    );
    assert!(matches!(&calls[1], Call::Send { text, .. } if text == "Welcome!"));

    let back = MockSession::button();
    assert_eq!(controller.back_to_start(&back).await?, MenuOutcome::Sent);
    let calls = back.calls();
    assert!(matches!(calls[0], Call::Image { .. }));
    assert!(matches!(calls[1], Call::Send { .. }));
    assert_eq!(calls[2], Call::Ack(None));
    assert!(!calls.iter().any(|call| matches!(call, Call::Edit { .. })));
    Ok(())
}

#[tokio::test]
async fn test_caption_only_screen() -> Result<()> {
    let controller = controller();
    let photo = ImageRef::FileId("AgACAgIAAxkBAAIB".to_string());

    let command = MockSession::command();
    controller
        .send_start_screen(&command, welcome(Some(photo.clone()), true))
        .await?;
    assert_eq!(
        command.calls(),
        vec![Call::Image {
            image: photo,
            caption: Some("Welcome!".to_string()),
        }]
    );
    Ok(())
}

#[tokio::test]
async fn test_failed_delivery_is_not_recorded() -> Result<()> {
    let controller = controller();

    let failing = MockSession::command().failing_sends(TransportError::Network("down".into()));
    assert_eq!(
        controller.send_start_screen(&failing, welcome(None, false)).await?,
        MenuOutcome::Failed
    );

    let back = MockSession::new(Interaction::button(common::USER, CHAT, Some(ORIGIN)));
    assert_eq!(controller.back_to_start(&back).await?, MenuOutcome::NotFound);
    Ok(())
}

#[tokio::test]
async fn test_latest_start_screen_wins() -> Result<()> {
    let controller = controller();
    let command = MockSession::command();

    controller.send_start_screen(&command, welcome(None, false)).await?;
    controller
        .send_start_screen(
            &command,
            StartScreen::new("Second screen", StartScreenOptions::default()),
        )
        .await?;

    let back = MockSession::button();
    controller.back_to_start(&back).await?;
    let (text, options) = back.last_render().unwrap();
    assert_eq!(text, "Second screen");
    assert!(options.keyboard.is_none());
    Ok(())
}
