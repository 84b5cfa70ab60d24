use thiserror::Error;
use tracing::warn;

use crate::snippet::SnippetParseError;

/// Error severity for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Warning, // recoverable, defaults used
    Error,   // operation aborted
}

/// Domain-specific errors for snippet insertion
#[derive(Error, Debug)]
pub enum EmmetError {
    #[error("Failed to parse snippet placeholders: {0}")]
    Parse(#[from] SnippetParseError),

    #[error("Range {start}..{end} is invalid for buffer of length {len}")]
    Range { start: usize, end: usize, len: usize },

    #[error("I/O failed for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EmmetError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Parse(_) => ErrorSeverity::Error,
            Self::Range { .. } => ErrorSeverity::Error,
            Self::Io { .. } => ErrorSeverity::Error,
            Self::Config(_) => ErrorSeverity::Warning,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Parse(e) => format!("Snippet has malformed placeholders: {}", e),
            Self::Range { start, end, .. } => {
                format!("Cannot insert at {}..{}: outside the document", start, end)
            }
            Self::Io { path, .. } => format!("Could not access {}", path),
            Self::Config(msg) => format!("Configuration issue: {}", msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, EmmetError>;

/// Extension trait for logging recoverable errors with caller location tracking.
/// Use when the operation has a sensible fallback and the user doesn't need to know.
///
/// # Examples
///
/// ```
/// use emmet_editor::config::{try_load_config_from, Config};
/// use emmet_editor::error::ResultExt;
///
/// let dir = std::env::temp_dir().join("emmet-editor-doctest");
/// std::fs::create_dir_all(&dir).unwrap();
/// let path = dir.join("broken.json");
/// std::fs::write(&path, "{ noIndent: ").unwrap();
///
/// // Malformed file: logged as a warning, then replaced by defaults
/// let config = try_load_config_from(&path).warn_on_err().unwrap_or_default();
/// assert_eq!(config, Config::default());
/// ```
pub trait ResultExt<T> {
    /// Log as warning with caller location and return None
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = %error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_converts() {
        let err: EmmetError = SnippetParseError::Unterminated { offset: 4 }.into();
        assert!(matches!(err, EmmetError::Parse(_)));
        assert_eq!(err.severity(), ErrorSeverity::Error);
        assert!(err.to_string().contains("offset 4"));
    }

    #[test]
    fn test_range_error_message() {
        let err = EmmetError::Range {
            start: 8,
            end: 3,
            len: 5,
        };
        assert_eq!(
            err.to_string(),
            "Range 8..3 is invalid for buffer of length 5"
        );
        assert!(err.user_message().contains("8..3"));
    }

    #[test]
    fn test_config_error_is_warning() {
        let err = EmmetError::Config("bad profile".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert_eq!(err.user_message(), "Configuration issue: bad profile");
    }

    #[test]
    fn test_warn_on_err_converts_to_option() {
        let ok: Result<u8> = Ok(3);
        assert_eq!(ok.warn_on_err(), Some(3));
        let err: Result<u8> = Err(EmmetError::Config("nope".to_string()));
        assert_eq!(err.warn_on_err(), None);
    }
}
