//! Structured error types for the proxy generator.
//!
//! Only run-fatal conditions live here: unreadable input, unusable fonts,
//! broken output paths. Per-card failures (a name that doesn't resolve, a
//! malformed token line) are *not* errors; they become [`Diagnostic`]s and
//! the run continues without that card.
//!
//! [`Diagnostic`]: crate::model::Diagnostic

use std::fmt;

/// The unified error type returned by all public proxyprint API functions.
#[derive(Debug)]
pub enum ProxyError {
    /// The decklist file could not be read.
    Decklist { path: String, source: std::io::Error },
    /// A font file could not be read or parsed.
    Font(String),
    /// The set icon image could not be read or decoded.
    Icon(String),
    /// Bitmap allocation or encoding failed.
    Render(String),
    /// A page or cache file could not be written.
    Output { path: String, source: std::io::Error },
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyError::Decklist { path, source } => {
                write!(f, "Failed to read decklist '{}': {}", path, source)
            }
            ProxyError::Font(msg) => write!(f, "Font error: {}", msg),
            ProxyError::Icon(msg) => write!(f, "Icon error: {}", msg),
            ProxyError::Render(msg) => write!(f, "Render error: {}", msg),
            ProxyError::Output { path, source } => {
                write!(f, "Failed to write '{}': {}", path, source)
            }
        }
    }
}

impl std::error::Error for ProxyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProxyError::Decklist { source, .. } => Some(source),
            ProxyError::Output { source, .. } => Some(source),
            _ => None,
        }
    }
}
