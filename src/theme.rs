//! # Theme Module
//!
//! Named bundles of emoji glyphs and text-decoration templates.
//!
//! Three themes are built in (`default`, `minimal`, `modern`); callers may
//! add their own or shadow a built-in one by name. Resolving an unknown
//! name yields the `default` theme.

use lazy_static::lazy_static;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

use crate::text_templates::render_placeholders;

pub const DEFAULT_THEME_NAME: &str = "default";

/// Glyphs used by the menu texts
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ThemeEmojis {
    pub help: String,
    pub module: String,
    pub back: String,
    pub prev: String,
    pub next: String,
    pub warning: String,
    pub success: String,
    pub error: String,
    pub info: String,
}

/// Kinds of text decoration a theme may define
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleKind {
    Title,
    Highlight,
    Code,
    InlineCode,
    Bold,
    Italic,
}

/// A named bundle of glyphs and `{text}` decoration templates
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub emojis: ThemeEmojis,
    #[serde(alias = "style")]
    pub styles: BTreeMap<StyleKind, String>,
}

impl Theme {
    /// Apply the template for `kind` to `text`; pass-through when the theme
    /// has no template for that kind.
    pub fn format_text(&self, kind: StyleKind, text: &str) -> String {
        match self.styles.get(&kind) {
            Some(template) => render_placeholders(template, &[("text", text)]),
            None => text.to_string(),
        }
    }

    fn built_in(emojis: [&str; 9], styles: [(StyleKind, &str); 6]) -> Self {
        let [help, module, back, prev, next, warning, success, error, info] =
            emojis.map(str::to_string);
        Self {
            emojis: ThemeEmojis {
                help,
                module,
                back,
                prev,
                next,
                warning,
                success,
                error,
                info,
            },
            styles: styles
                .into_iter()
                .map(|(kind, template)| (kind, template.to_string()))
                .collect(),
        }
    }

    /// The `default` built-in theme
    pub fn default_theme() -> Self {
        Self::built_in(
            ["🛠", "🔍", "◀️", "⬅️", "➡️", "⚠️", "✅", "❌", "ℹ️"],
            [
                (StyleKind::Title, "**{text}**"),
                (StyleKind::Highlight, "__{text}__"),
                (StyleKind::Code, "`{text}`"),
                (StyleKind::InlineCode, "`{text}`"),
                (StyleKind::Bold, "**{text}**"),
                (StyleKind::Italic, "_{text}_"),
            ],
        )
    }

    /// The `minimal` built-in theme: ASCII glyphs, no decoration
    pub fn minimal() -> Self {
        Self::built_in(
            ["", "", "<", "<", ">", "!", "+", "-", "i"],
            [
                (StyleKind::Title, "{text}"),
                (StyleKind::Highlight, "{text}"),
                (StyleKind::Code, "{text}"),
                (StyleKind::InlineCode, "{text}"),
                (StyleKind::Bold, "{text}"),
                (StyleKind::Italic, "{text}"),
            ],
        )
    }

    /// The `modern` built-in theme
    pub fn modern() -> Self {
        Self::built_in(
            ["📚", "📋", "🔙", "◀️", "▶️", "⚠️", "✨", "💥", "💡"],
            [
                (StyleKind::Title, "*{text}*"),
                (StyleKind::Highlight, "_{text}_"),
                (StyleKind::Code, "```{text}```"),
                (StyleKind::InlineCode, "`{text}`"),
                (StyleKind::Bold, "*{text}*"),
                (StyleKind::Italic, "_{text}_"),
            ],
        )
    }
}

/// Set of known themes plus the name of the active one
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    themes: HashMap<String, Theme>,
    active: String,
}

impl ThemeRegistry {
    /// Create a registry from the built-ins merged with `extra` (extra wins
    /// on name clashes), activating `active` or falling back to `default`.
    pub fn new(active: &str, extra: HashMap<String, Theme>) -> Self {
        let mut themes = HashMap::from([
            (DEFAULT_THEME_NAME.to_string(), Theme::default_theme()),
            ("minimal".to_string(), Theme::minimal()),
            ("modern".to_string(), Theme::modern()),
        ]);
        themes.extend(extra);

        let active = if themes.contains_key(active) {
            active.to_string()
        } else {
            tracing::warn!(theme = %active, "Unknown theme requested, using default");
            DEFAULT_THEME_NAME.to_string()
        };

        Self { themes, active }
    }

    /// Look up a theme by name, falling back to the default theme
    pub fn resolve_theme(&self, name: &str) -> &Theme {
        self.themes
            .get(name)
            .or_else(|| self.themes.get(DEFAULT_THEME_NAME))
            .unwrap_or(&*FALLBACK_THEME)
    }

    /// The active theme
    pub fn active(&self) -> &Theme {
        self.resolve_theme(&self.active)
    }

    /// Name of the active theme
    pub fn active_name(&self) -> &str {
        &self.active
    }

    /// Switch the active theme; false (and no change) when `name` is unknown
    pub fn set_active(&mut self, name: &str) -> bool {
        if self.themes.contains_key(name) {
            self.active = name.to_string();
            true
        } else {
            false
        }
    }

    /// Format `text` with the active theme's template for `kind`
    pub fn format_text(&self, kind: StyleKind, text: &str) -> String {
        self.active().format_text(kind, text)
    }

    /// Names of all known themes, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.themes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_THEME_NAME, HashMap::new())
    }
}

// `ThemeRegistry::new` always registers "default"; this only keeps lookups infallible.
lazy_static! {
    static ref FALLBACK_THEME: Theme = Theme::default_theme();
}
