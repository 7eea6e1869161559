//! # Menu Configuration Module
//!
//! This module defines the configuration surface of the menu layer:
//! module source location, pagination, flood control, theming, rich-text
//! mode and transport error policy.

use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::menu_errors::MenuError;
use crate::text_templates::TextKey;
use crate::theme::Theme;

// Constants for menu configuration
pub const DEFAULT_MODULES_PATH: &str = "./modules";
pub const DEFAULT_PAGE_SIZE: usize = 6;
pub const DEFAULT_COLUMNS: usize = 2;
pub const DEFAULT_FLOOD_WAIT_MS: u64 = 1000;
pub const DEFAULT_THEME: &str = "default";
pub const DEFAULT_MODULE_FIELD: &str = "MODULE";
pub const DEFAULT_HELP_FIELD: &str = "HELP";

/// Text markup mode used when rendering messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum RichTextMode {
    #[serde(alias = "plain")]
    Plain,
    #[default]
    Markdown,
    MarkdownV2,
    #[serde(alias = "HTML")]
    Html,
}

impl RichTextMode {
    /// Parse a mode name as written in configuration (case-insensitive)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "plain" | "none" | "" => Some(RichTextMode::Plain),
            "markdown" => Some(RichTextMode::Markdown),
            "markdownv2" => Some(RichTextMode::MarkdownV2),
            "html" => Some(RichTextMode::Html),
            _ => None,
        }
    }
}

/// What to do with transport failures after the user has been notified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportErrorMode {
    /// Log the failure and report success to the caller
    #[default]
    Swallow,
    /// Return the failure to the caller
    Propagate,
}

/// Configuration structure for the menu controller
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MenuConfig {
    /// Directory scanned for module units
    pub modules_path: PathBuf,
    /// Number of modules per help menu page
    pub page_size: usize,
    /// Number of module buttons per keyboard row
    pub columns: usize,
    /// Minimum interval between two button presses of one user, in milliseconds
    pub flood_wait_ms: u64,
    /// Name of the active theme
    pub theme: String,
    /// Markup mode for rendered messages
    pub parse_mode: RichTextMode,
    /// Field holding the module name in a module unit
    pub module_field: String,
    /// Field holding the help text in a module unit
    pub help_field: String,
    /// Transport failure policy
    pub error_mode: TransportErrorMode,
    /// Append a "back to start" row to menu and module keyboards
    pub include_start_back: bool,
    /// Caller overrides for text templates
    pub texts: HashMap<TextKey, String>,
    /// Caller-supplied themes, merged over the built-in ones
    pub themes: HashMap<String, Theme>,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            modules_path: PathBuf::from(DEFAULT_MODULES_PATH),
            page_size: DEFAULT_PAGE_SIZE,
            columns: DEFAULT_COLUMNS,
            flood_wait_ms: DEFAULT_FLOOD_WAIT_MS,
            theme: DEFAULT_THEME.to_string(),
            parse_mode: RichTextMode::default(),
            module_field: DEFAULT_MODULE_FIELD.to_string(),
            help_field: DEFAULT_HELP_FIELD.to_string(),
            error_mode: TransportErrorMode::default(),
            include_start_back: false,
            texts: HashMap::new(),
            themes: HashMap::new(),
        }
    }
}

impl MenuConfig {
    /// Build a configuration from `MENU_*` environment variables.
    ///
    /// Unset variables keep their defaults. Recognised variables:
    /// `MENU_MODULES_PATH`, `MENU_PAGE_SIZE`, `MENU_COLUMNS`,
    /// `MENU_FLOOD_WAIT_MS`, `MENU_THEME`, `MENU_PARSE_MODE`,
    /// `MENU_MODULE_FIELD`, `MENU_HELP_FIELD`, `MENU_PROPAGATE_ERRORS`,
    /// `MENU_INCLUDE_START_BACK`.
    pub fn from_env() -> Result<Self, MenuError> {
        let mut config = Self::default();

        if let Ok(path) = env::var("MENU_MODULES_PATH") {
            config.modules_path = PathBuf::from(path);
        }
        if let Some(size) = env_number("MENU_PAGE_SIZE")? {
            config.page_size = size as usize;
        }
        if let Some(columns) = env_number("MENU_COLUMNS")? {
            config.columns = columns as usize;
        }
        if let Some(wait) = env_number("MENU_FLOOD_WAIT_MS")? {
            config.flood_wait_ms = wait;
        }
        if let Ok(theme) = env::var("MENU_THEME") {
            config.theme = theme;
        }
        if let Ok(mode) = env::var("MENU_PARSE_MODE") {
            config.parse_mode = RichTextMode::parse(&mode)
                .ok_or_else(|| MenuError::Config(format!("unknown parse mode: {mode}")))?;
        }
        if let Ok(field) = env::var("MENU_MODULE_FIELD") {
            config.module_field = field;
        }
        if let Ok(field) = env::var("MENU_HELP_FIELD") {
            config.help_field = field;
        }
        if env_flag("MENU_PROPAGATE_ERRORS") {
            config.error_mode = TransportErrorMode::Propagate;
        }
        if env_flag("MENU_INCLUDE_START_BACK") {
            config.include_start_back = true;
        }

        Ok(config.normalized())
    }

    /// Load a configuration from a JSON file (camelCase keys)
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MenuError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| MenuError::Config(format!("{}: {e}", path.display())))?;
        let config: MenuConfig = serde_json::from_str(&content)
            .map_err(|e| MenuError::Config(format!("{}: {e}", path.display())))?;
        Ok(config.normalized())
    }

    /// Replace zero page size / column count with their defaults
    pub fn normalized(mut self) -> Self {
        if self.page_size == 0 {
            self.page_size = DEFAULT_PAGE_SIZE;
        }
        if self.columns == 0 {
            self.columns = DEFAULT_COLUMNS;
        }
        self
    }

    /// Flood-control interval as a duration
    pub fn flood_wait(&self) -> Duration {
        Duration::from_millis(self.flood_wait_ms)
    }
}

fn env_number(key: &str) -> Result<Option<u64>, MenuError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| MenuError::Config(format!("{key}={value}: {e}"))),
        Err(_) => Ok(None),
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = MenuConfig::default();
        assert_eq!(config.modules_path, PathBuf::from("./modules"));
        assert_eq!(config.page_size, 6);
        assert_eq!(config.columns, 2);
        assert_eq!(config.flood_wait(), Duration::from_millis(1000));
        assert_eq!(config.theme, "default");
        assert_eq!(config.parse_mode, RichTextMode::Markdown);
        assert_eq!(config.module_field, "MODULE");
        assert_eq!(config.help_field, "HELP");
        assert_eq!(config.error_mode, TransportErrorMode::Swallow);
        assert!(!config.include_start_back);
    }

    #[test]
    fn test_zero_sizes_fall_back_to_defaults() {
        let config = MenuConfig {
            page_size: 0,
            columns: 0,
            ..Default::default()
        }
        .normalized();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.columns, DEFAULT_COLUMNS);
    }

    #[test]
    fn test_parse_mode_names() {
        assert_eq!(RichTextMode::parse("HTML"), Some(RichTextMode::Html));
        assert_eq!(RichTextMode::parse("MarkdownV2"), Some(RichTextMode::MarkdownV2));
        assert_eq!(RichTextMode::parse("plain"), Some(RichTextMode::Plain));
        assert_eq!(RichTextMode::parse("bbcode"), None);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "modulesPath": "./custom-modules",
                "pageSize": 8,
                "columns": 3,
                "theme": "modern",
                "parseMode": "Html",
                "errorMode": "propagate",
                "texts": {{ "helpMenuTitle": "Bot Commands" }}
            }}"#
        )
        .unwrap();

        let config = MenuConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.modules_path, PathBuf::from("./custom-modules"));
        assert_eq!(config.page_size, 8);
        assert_eq!(config.columns, 3);
        assert_eq!(config.theme, "modern");
        assert_eq!(config.parse_mode, RichTextMode::Html);
        assert_eq!(config.error_mode, TransportErrorMode::Propagate);
        assert_eq!(
            config.texts.get(&TextKey::HelpMenuTitle).map(String::as_str),
            Some("Bot Commands")
        );
        // Unset keys keep their defaults
        assert_eq!(config.flood_wait_ms, DEFAULT_FLOOD_WAIT_MS);
    }

    #[test]
    fn test_from_json_file_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            MenuConfig::from_json_file(file.path()),
            Err(MenuError::Config(_))
        ));
    }
}
