//! # Text Templates Module
//!
//! Single-language message templates with `{placeholder}` tokens.
//!
//! Defaults are derived from the active theme's glyphs; caller overrides
//! are applied on top and always win. Every key accepts a fixed set of
//! placeholders: unknown tokens are left as written, and substituted
//! values are never scanned again.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::collections::HashMap;

use crate::theme::ThemeEmojis;

lazy_static! {
    static ref PLACEHOLDER_REGEX: Regex =
        Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("Placeholder pattern should be valid");
}

/// Semantic keys of the menu texts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextKey {
    HelpMenuTitle,
    HelpMenuIntro,
    ModuleHelpTitle,
    ModuleHelpIntro,
    NoModulesLoaded,
    BackButton,
    PrevButton,
    NextButton,
    FloodMessage,
    HelpButton,
    StartBackButton,
    SuccessMessage,
    ErrorMessage,
    InfoMessage,
    AlreadyOnPage,
    ContentUnchanged,
    GenericError,
    ModuleNotFound,
    NoPreviousScreen,
}

impl TextKey {
    pub const ALL: [TextKey; 19] = [
        TextKey::HelpMenuTitle,
        TextKey::HelpMenuIntro,
        TextKey::ModuleHelpTitle,
        TextKey::ModuleHelpIntro,
        TextKey::NoModulesLoaded,
        TextKey::BackButton,
        TextKey::PrevButton,
        TextKey::NextButton,
        TextKey::FloodMessage,
        TextKey::HelpButton,
        TextKey::StartBackButton,
        TextKey::SuccessMessage,
        TextKey::ErrorMessage,
        TextKey::InfoMessage,
        TextKey::AlreadyOnPage,
        TextKey::ContentUnchanged,
        TextKey::GenericError,
        TextKey::ModuleNotFound,
        TextKey::NoPreviousScreen,
    ];

    /// Placeholders recognised in this key's template
    pub fn placeholders(self) -> &'static [&'static str] {
        match self {
            TextKey::HelpMenuIntro => &["count", "modules"],
            TextKey::ModuleHelpTitle => &["moduleName"],
            TextKey::ModuleHelpIntro => &["helpText"],
            TextKey::SuccessMessage | TextKey::ErrorMessage | TextKey::InfoMessage => &["message"],
            _ => &[],
        }
    }
}

/// Substitute `{name}` tokens found in `args`; everything else is kept verbatim
pub fn render_placeholders(template: &str, args: &[(&str, &str)]) -> String {
    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures<'_>| {
            args.iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Resolved menu texts for one theme plus caller overrides
#[derive(Debug, Clone)]
pub struct TextTemplates {
    templates: HashMap<TextKey, String>,
}

impl TextTemplates {
    /// Derive defaults from `emojis`, then apply `overrides`
    pub fn new(emojis: &ThemeEmojis, overrides: &HashMap<TextKey, String>) -> Self {
        let mut templates = Self::defaults(emojis);
        templates.extend(overrides.iter().map(|(key, text)| (*key, text.clone())));
        Self { templates }
    }

    fn defaults(e: &ThemeEmojis) -> HashMap<TextKey, String> {
        HashMap::from([
            (TextKey::HelpMenuTitle, format!("{} Help Menu", e.help)),
            (
                TextKey::HelpMenuIntro,
                "Available modules ({count}):\n{modules}\n\nTap a module to explore.".to_string(),
            ),
            (TextKey::ModuleHelpTitle, format!("{} {{moduleName}} Commands", e.module)),
            (TextKey::ModuleHelpIntro, "{helpText}".to_string()),
            (TextKey::NoModulesLoaded, format!("{} No modules available.", e.warning)),
            (TextKey::BackButton, format!("{} Back", e.back)),
            (TextKey::PrevButton, format!("{} Previous", e.prev)),
            (TextKey::NextButton, format!("{} Next", e.next)),
            (
                TextKey::FloodMessage,
                format!("{} Please wait a moment before clicking again", e.warning),
            ),
            (TextKey::HelpButton, format!("{} Help", e.help)),
            (TextKey::StartBackButton, format!("{} Back to Start", e.back)),
            (TextKey::SuccessMessage, format!("{} {{message}}", e.success)),
            (TextKey::ErrorMessage, format!("{} {{message}}", e.error)),
            (TextKey::InfoMessage, format!("{} {{message}}", e.info)),
            (TextKey::AlreadyOnPage, "You are already on this page".to_string()),
            (TextKey::ContentUnchanged, "Content hasn't changed".to_string()),
            (TextKey::GenericError, "An error occurred".to_string()),
            (TextKey::ModuleNotFound, "Module not found!".to_string()),
            (TextKey::NoPreviousScreen, "No previous screen found".to_string()),
        ])
    }

    /// Raw template for `key`
    pub fn get(&self, key: TextKey) -> &str {
        self.templates.get(&key).map(String::as_str).unwrap_or_default()
    }

    /// Render `key` with `args`, ignoring arguments the key does not accept
    pub fn render(&self, key: TextKey, args: &[(&str, &str)]) -> String {
        let allowed = key.placeholders();
        let accepted: Vec<(&str, &str)> = args
            .iter()
            .copied()
            .filter(|(name, _)| allowed.contains(name))
            .collect();
        render_placeholders(self.get(key), &accepted)
    }
}
