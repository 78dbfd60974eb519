//! Language-model collaborator: the prompts that ask for the section
//! grammar, and the clients that send them.

pub mod types;
pub mod gemini;
pub mod mock;
pub mod prompt;

pub use types::{ImageAttachment, LanguageModelClient};
pub use gemini::{GeminiClient, GeminiConfig};
pub use mock::MockLanguageModel;
pub use prompt::{PatientCategory, PatientProfile, SymptomFocus};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("Rate limited by the model provider")]
    RateLimited { retry_after: Option<u64> },

    #[error("Content was blocked: {0}")]
    ContentBlocked(String),

    #[error("No valid response from the model")]
    EmptyCandidate,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error("Invalid attachment: {0}")]
    InvalidAttachment(String),
}

impl UpstreamError {
    /// Failures worth a dismissible notification; the user may simply retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(UpstreamError::RateLimited { retry_after: Some(3) }.is_transient());
        assert!(UpstreamError::Transport("timeout".into()).is_transient());
        assert!(!UpstreamError::EmptyCandidate.is_transient());
        assert!(!UpstreamError::ContentBlocked("SAFETY".into()).is_transient());
        assert!(!UpstreamError::Api { status: 400, message: "bad".into() }.is_transient());
        assert!(!UpstreamError::MissingApiKey.is_transient());
    }

    #[test]
    fn error_messages_carry_provider_detail() {
        let err = UpstreamError::ContentBlocked("SAFETY".into());
        assert_eq!(err.to_string(), "Content was blocked: SAFETY");
        let err = UpstreamError::Api { status: 403, message: "API key invalid".into() };
        assert_eq!(err.to_string(), "API error (403): API key invalid");
    }
}
