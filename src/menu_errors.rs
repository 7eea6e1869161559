//! # Menu Error Types Module
//!
//! This module defines the error types used throughout the menu layer.
//! Lookup misses and throttled clicks are not errors; they are answered
//! to the user directly. What remains here is configuration, module
//! loading and transport failures.

/// Errors reported by a chat transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The edited content is byte-identical to the current message
    NotModified,
    /// The chat API rejected the request
    Api(String),
    /// The request never reached the chat API
    Network(String),
    /// A keyboard button could not be encoded (e.g. malformed URL)
    InvalidButton(String),
}

impl TransportError {
    /// Whether this is the "content unchanged" condition
    pub fn is_not_modified(&self) -> bool {
        matches!(self, TransportError::NotModified)
    }

    /// Classify a raw transport error description.
    ///
    /// Telegram reports unchanged edits as an API error whose description
    /// contains "message is not modified".
    pub fn from_description(description: &str) -> Self {
        if description.contains("message is not modified")
            || description.contains("exactly the same")
        {
            TransportError::NotModified
        } else {
            TransportError::Api(description.to_string())
        }
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::NotModified => write!(f, "message is not modified"),
            TransportError::Api(msg) => write!(f, "API error: {msg}"),
            TransportError::Network(msg) => write!(f, "Network error: {msg}"),
            TransportError::InvalidButton(msg) => write!(f, "Invalid button: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Errors surfaced by the menu layer
#[derive(Debug, Clone)]
pub enum MenuError {
    /// Invalid or unreadable configuration
    Config(String),
    /// The module source could not be enumerated
    ModuleSource(String),
    /// A single module unit could not be turned into a module
    ModuleUnit { unit: String, reason: String },
    /// Rendering through the transport failed
    Transport(TransportError),
}

impl std::fmt::Display for MenuError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MenuError::Config(msg) => write!(f, "Configuration error: {msg}"),
            MenuError::ModuleSource(msg) => write!(f, "Module source error: {msg}"),
            MenuError::ModuleUnit { unit, reason } => {
                write!(f, "Failed to load module unit {unit}: {reason}")
            }
            MenuError::Transport(err) => write!(f, "Transport error: {err}"),
        }
    }
}

impl std::error::Error for MenuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MenuError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TransportError> for MenuError {
    fn from(err: TransportError) -> Self {
        MenuError::Transport(err)
    }
}
