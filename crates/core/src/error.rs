//! Error types for newsdesk operations.
//!
//! This module defines [`NewsdeskError`], the taxonomy shared by every
//! pipeline stage: input validation, configuration, content processing,
//! network fetches, generation-backend calls, and file archiving.
//!
//! Variants carry an optional `details` string (the underlying cause) and
//! an optional `suggestion` string (a next step for the operator). The CLI
//! reports these separately from the main message.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the newsdesk pipeline.
#[derive(Error, Debug)]
pub enum NewsdeskError {
    /// Malformed or missing input (bad URL, empty file, short text).
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<String>,
        suggestion: Option<String>,
    },

    /// Missing or invalid credentials and setup (API keys, account config).
    #[error("{message}")]
    Configuration {
        message: String,
        details: Option<String>,
        suggestion: Option<String>,
    },

    /// Extraction, parsing, or file-read failure.
    #[error("{message}")]
    ContentProcessing {
        message: String,
        details: Option<String>,
        suggestion: Option<String>,
    },

    /// Fetch failed after all retries were exhausted.
    #[error("Network error for '{url}': {message}")]
    Network {
        url: String,
        message: String,
        details: Option<String>,
        suggestion: Option<String>,
    },

    /// A generation or publishing backend call failed or returned nothing.
    #[error("{backend} API error: {message}")]
    Api {
        backend: String,
        status: Option<u16>,
        message: String,
        suggestion: Option<String>,
    },

    /// File write or permission failure.
    #[error("Failed to {operation} '{}': {message}", path.display())]
    FileOperation {
        path: PathBuf,
        operation: String,
        message: String,
    },
}

impl NewsdeskError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into(), details: None, suggestion: None }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into(), details: None, suggestion: None }
    }

    pub fn content_processing(message: impl Into<String>) -> Self {
        Self::ContentProcessing { message: message.into(), details: None, suggestion: None }
    }

    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network { url: url.into(), message: message.into(), details: None, suggestion: None }
    }

    /// Builds an API error carrying the backend name and an optional HTTP status.
    pub fn api(backend: impl Into<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if let Some(code) = status {
            message.push_str(&format!(" (status {})", code));
        }
        Self::Api { backend: backend.into(), status, message, suggestion: None }
    }

    pub fn file_operation(path: impl Into<PathBuf>, operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileOperation { path: path.into(), operation: operation.into(), message: message.into() }
    }

    /// Attaches an underlying-cause string to variants that carry one.
    pub fn with_details(mut self, text: impl Into<String>) -> Self {
        match &mut self {
            Self::Validation { details, .. }
            | Self::Configuration { details, .. }
            | Self::ContentProcessing { details, .. }
            | Self::Network { details, .. } => *details = Some(text.into()),
            Self::Api { .. } | Self::FileOperation { .. } => {}
        }
        self
    }

    /// Attaches a human-readable next step to variants that carry one.
    pub fn with_suggestion(mut self, text: impl Into<String>) -> Self {
        match &mut self {
            Self::Validation { suggestion, .. }
            | Self::Configuration { suggestion, .. }
            | Self::ContentProcessing { suggestion, .. }
            | Self::Network { suggestion, .. }
            | Self::Api { suggestion, .. } => *suggestion = Some(text.into()),
            Self::FileOperation { .. } => {}
        }
        self
    }

    pub fn details(&self) -> Option<&str> {
        match self {
            Self::Validation { details, .. }
            | Self::Configuration { details, .. }
            | Self::ContentProcessing { details, .. }
            | Self::Network { details, .. } => details.as_deref(),
            Self::Api { .. } | Self::FileOperation { .. } => None,
        }
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Validation { suggestion, .. }
            | Self::Configuration { suggestion, .. }
            | Self::ContentProcessing { suggestion, .. }
            | Self::Network { suggestion, .. }
            | Self::Api { suggestion, .. } => suggestion.as_deref(),
            Self::FileOperation { .. } => None,
        }
    }
}

/// Result type alias for [`NewsdeskError`].
pub type Result<T> = std::result::Result<T, NewsdeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = NewsdeskError::validation("input too short");
        assert_eq!(err.to_string(), "input too short");
    }

    #[test]
    fn test_api_error_includes_status() {
        let err = NewsdeskError::api("Gemini", Some(429), "rate limited");
        assert!(err.to_string().contains("Gemini API error"));
        assert!(err.to_string().contains("429"));
    }

    #[test]
    fn test_network_error_includes_url() {
        let err = NewsdeskError::network("https://example.com", "connection refused");
        assert!(err.to_string().contains("https://example.com"));
    }

    #[test]
    fn test_suggestion_round_trip() {
        let err = NewsdeskError::configuration("API key not found").with_suggestion("set GEMINI_API_KEY");
        assert_eq!(err.suggestion(), Some("set GEMINI_API_KEY"));
        assert_eq!(err.details(), None);
    }

    #[test]
    fn test_file_operation_display() {
        let err = NewsdeskError::file_operation("/tmp/out.txt", "write", "permission denied");
        let text = err.to_string();
        assert!(text.contains("write"));
        assert!(text.contains("/tmp/out.txt"));
    }
}
