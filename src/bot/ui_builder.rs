//! UI Builder module for paginating modules and laying out keyboards
//!
//! Keyboards are built as a transport-neutral [`Keyboard`]; the Telegram
//! adapter converts them to inline markup.

use crate::bot::navigation::NavAction;
use crate::text_templates::{TextKey, TextTemplates};

/// What pressing a button does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Send callback data back to the bot
    Callback(String),
    /// Open an external URL
    Url(String),
    /// Open a web app at the URL
    WebApp(String),
}

/// A labelled keyboard button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: ButtonAction,
}

impl Button {
    pub fn callback(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Callback(data.into()),
        }
    }

    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Url(url.into()),
        }
    }

    pub fn web_app(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::WebApp(url.into()),
        }
    }

    fn nav(label: &str, action: NavAction) -> Self {
        Self::callback(label, action.encode())
    }

    /// Callback data, if this is a callback button
    pub fn callback_data(&self) -> Option<&str> {
        match &self.action {
            ButtonAction::Callback(data) => Some(data),
            _ => None,
        }
    }
}

/// Rows of buttons
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new(rows: Vec<Vec<Button>>) -> Self {
        Self { rows }
    }

    pub fn push_row(&mut self, row: Vec<Button>) {
        if !row.is_empty() {
            self.rows.push(row);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All buttons, row by row
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }

    /// Whether any callback button carries `data`
    pub fn has_callback(&self, data: &str) -> bool {
        self.buttons().any(|b| b.callback_data() == Some(data))
    }
}

/// Number of pages needed for `item_count` items
pub fn total_pages(item_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    item_count.div_ceil(page_size)
}

/// Items of the 1-based `page_number`; empty when out of range
pub fn paginate<T>(items: &[T], page_size: usize, page_number: usize) -> &[T] {
    if page_size == 0 || page_number == 0 {
        return &[];
    }
    let start = (page_number - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Lay `buttons` out in rows of `columns` (the last row may be short)
pub fn create_inline_keyboard(buttons: Vec<Button>, columns: usize) -> Keyboard {
    let columns = columns.max(1);
    let mut keyboard = Keyboard::default();
    let mut buttons = buttons.into_iter().peekable();

    while buttons.peek().is_some() {
        keyboard.push_row(buttons.by_ref().take(columns).collect());
    }

    keyboard
}

/// Help menu keyboard: one "select module" button per item, then a
/// navigation row with "previous" / "next" as applicable.
pub fn build_menu_keyboard(
    items: &[String],
    current_page: usize,
    total_pages: usize,
    columns: usize,
    texts: &TextTemplates,
) -> Keyboard {
    let module_buttons = items
        .iter()
        .map(|name| Button::nav(name, NavAction::Module(name.clone())))
        .collect();
    let mut keyboard = create_inline_keyboard(module_buttons, columns);

    let mut navigation = Vec::new();
    if current_page > 1 {
        navigation.push(Button::nav(
            texts.get(TextKey::PrevButton),
            NavAction::Page(current_page - 1),
        ));
    }
    if current_page < total_pages {
        navigation.push(Button::nav(
            texts.get(TextKey::NextButton),
            NavAction::Page(current_page + 1),
        ));
    }
    keyboard.push_row(navigation);

    keyboard
}

/// Module detail keyboard: "back to menu"
pub fn build_module_keyboard(texts: &TextTemplates) -> Keyboard {
    Keyboard::new(vec![vec![Button::nav(
        texts.get(TextKey::BackButton),
        NavAction::BackToHelp,
    )]])
}

/// Append a trailing "back to start" row
pub fn append_start_back_row(keyboard: &mut Keyboard, texts: &TextTemplates) {
    keyboard.push_row(vec![Button::nav(
        texts.get(TextKey::StartBackButton),
        NavAction::BackToStart,
    )]);
}

/// Append a trailing "open help menu" row
pub fn append_help_row(keyboard: &mut Keyboard, texts: &TextTemplates) {
    keyboard.push_row(vec![Button::nav(
        texts.get(TextKey::HelpButton),
        NavAction::ShowHelp,
    )]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use std::collections::HashMap;

    fn texts() -> TextTemplates {
        TextTemplates::new(&Theme::default_theme().emojis, &HashMap::new())
    }

    fn names(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("M{i}")).collect()
    }

    #[test]
    fn test_pages_cover_every_item_once_in_order() {
        for page_size in 1..=7 {
            for count in 0..=20 {
                let items = names(count);
                let pages = total_pages(count, page_size);
                assert_eq!(pages, count.div_ceil(page_size));

                let joined: Vec<String> = (1..=pages)
                    .flat_map(|page| paginate(&items, page_size, page).to_vec())
                    .collect();
                assert_eq!(joined, items, "page_size={page_size} count={count}");
            }
        }
    }

    #[test]
    fn test_paginate_out_of_range_is_empty() {
        let items = names(5);
        assert!(paginate(&items, 2, 0).is_empty());
        assert!(paginate(&items, 2, 4).is_empty());
        assert!(paginate(&items, 2, usize::MAX).is_empty());
        assert!(paginate(&items, 0, 1).is_empty());
        assert_eq!(paginate(&items, 2, 3), &["M5".to_string()]);
    }

    #[test]
    fn test_grid_layout_with_short_last_row() {
        let keyboard = create_inline_keyboard(
            names(5).into_iter().map(|n| Button::callback(n.clone(), n)).collect(),
            2,
        );
        let widths: Vec<usize> = keyboard.rows.iter().map(Vec::len).collect();
        assert_eq!(widths, vec![2, 2, 1]);

        let keyboard = create_inline_keyboard(
            names(6).into_iter().map(|n| Button::callback(n.clone(), n)).collect(),
            3,
        );
        let widths: Vec<usize> = keyboard.rows.iter().map(Vec::len).collect();
        assert_eq!(widths, vec![3, 3]);
    }

    #[test]
    fn test_first_page_has_next_only() {
        let keyboard = build_menu_keyboard(&["A".to_string()], 1, 2, 2, &texts());
        assert!(keyboard.has_callback("module:A"));
        assert!(keyboard.has_callback("page:2"));
        assert!(!keyboard.has_callback("page:0"));
        assert_eq!(keyboard.rows.len(), 2);
    }

    #[test]
    fn test_last_page_has_previous_only() {
        let keyboard = build_menu_keyboard(&["B".to_string()], 2, 2, 2, &texts());
        assert!(keyboard.has_callback("module:B"));
        assert!(keyboard.has_callback("page:1"));
        assert!(!keyboard.has_callback("page:3"));
    }

    #[test]
    fn test_single_page_has_no_navigation_row() {
        let keyboard = build_menu_keyboard(&names(3), 1, 1, 2, &texts());
        assert_eq!(keyboard.rows.len(), 2);
        assert!(keyboard
            .buttons()
            .all(|b| b.callback_data().is_some_and(|d| d.starts_with("module:"))));
    }

    #[test]
    fn test_middle_page_has_both_controls_in_one_row() {
        let keyboard = build_menu_keyboard(&names(2), 2, 3, 2, &texts());
        let nav = keyboard.rows.last().unwrap();
        assert_eq!(nav[0].label, "⬅️ Previous");
        assert_eq!(nav[0].callback_data(), Some("page:1"));
        assert_eq!(nav[1].label, "➡️ Next");
        assert_eq!(nav[1].callback_data(), Some("page:3"));
    }

    #[test]
    fn test_module_keyboard_and_extra_rows() {
        let texts = texts();
        let mut keyboard = build_module_keyboard(&texts);
        assert!(keyboard.has_callback("back:help"));

        append_start_back_row(&mut keyboard, &texts);
        append_help_row(&mut keyboard, &texts);
        assert_eq!(keyboard.rows.len(), 3);
        assert_eq!(keyboard.rows[1][0].label, "◀️ Back to Start");
        assert_eq!(keyboard.rows[2][0].callback_data(), Some("show:help"));
    }
}
