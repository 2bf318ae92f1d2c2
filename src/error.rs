//! Shared error taxonomy for the orchestration engine
//!
//! Every provider adapter translates its vendor-specific failures into
//! [`MtError`] so the orchestrator and its callers only ever deal with one
//! error surface:
//!
//! - [`MtError::UnsupportedLanguage`] - one or more language codes rejected by
//!   every engine, even after the lenient base-language retry
//! - [`MtError::Timeout`] - a provider call exceeded its network timeout
//! - [`MtError::Provider`] - any other provider-side failure, including
//!   malformed responses
//! - [`MtError::Config`] - the engine list or an adapter could not be built
//!
//! Catalog fetch failures are deliberately *not* part of this taxonomy: they
//! are swallowed at the adapter boundary into an empty list plus a logged
//! error, because an empty catalog is a valid (if degraded) operating state.

use thiserror::Error;

/// Unified error type for translation operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MtError {
    /// One or more language codes are unsupported by every configured engine.
    ///
    /// Carries every requested code that failed even the lenient scan, plus
    /// the caller's interface language so the message can be localized by the
    /// presentation layer.
    #[error("unsupported language(s): {}", codes.join(", "))]
    UnsupportedLanguage {
        codes: Vec<String>,
        interface_language: Option<String>,
    },

    /// A provider call exceeded its network timeout
    #[error("provider request timed out: {0}")]
    Timeout(String),

    /// Any other provider-side failure (HTTP error, malformed response, ...)
    #[error("provider error: {0}")]
    Provider(String),

    /// Invalid or missing configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl MtError {
    /// Build an [`MtError::UnsupportedLanguage`] for a single code
    pub fn unsupported(code: impl Into<String>) -> Self {
        MtError::UnsupportedLanguage {
            codes: vec![code.into()],
            interface_language: None,
        }
    }
}

impl From<reqwest::Error> for MtError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            MtError::Timeout(error.to_string())
        } else {
            MtError::Provider(error.to_string())
        }
    }
}

/// Result type for translation operations
pub type MtResult<T> = Result<T, MtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_language_display_lists_codes() {
        let err = MtError::UnsupportedLanguage {
            codes: vec!["tlh".to_string(), "xx-pirate".to_string()],
            interface_language: Some("nl".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("tlh"));
        assert!(msg.contains("xx-pirate"));
    }

    #[test]
    fn test_unsupported_helper_single_code() {
        let err = MtError::unsupported("tlh");
        match err {
            MtError::UnsupportedLanguage {
                codes,
                interface_language,
            } => {
                assert_eq!(codes, vec!["tlh"]);
                assert!(interface_language.is_none());
            }
            _ => panic!("Expected UnsupportedLanguage"),
        }
    }

    #[test]
    fn test_timeout_display() {
        let err = MtError::Timeout("deadline exceeded".to_string());
        assert!(err.to_string().contains("timed out"));
    }
}
