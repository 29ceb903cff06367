//! Environment-backed settings.
//!
//! Settings come from the process environment, with a `.env` file loaded
//! first when present. CLI flags override these values at the call sites
//! that consume them.

use std::env;
use std::fmt;
use std::path::PathBuf;

/// Everything the pipeline reads from the environment.
#[derive(Clone, Default)]
pub struct Settings {
    /// Generation backend API key (`GEMINI_API_KEY`, or `GOOGLE_API_KEY`).
    pub api_key: Option<String>,
    /// Archive directory (`NEWSDESK_OUTPUT_DIR`).
    pub output_dir: Option<PathBuf>,
    /// Slug override for archive filenames (`NEWSDESK_FORCED_SLUG`).
    pub forced_slug: Option<String>,
    /// Skip interactive confirmations (`NEWSDESK_NON_INTERACTIVE`).
    pub non_interactive: bool,
    /// Bluesky account handle (`BLUESKY_HANDLE`).
    pub bluesky_handle: Option<String>,
    /// Bluesky app password (`BLUESKY_APP_PASSWORD`).
    pub bluesky_password: Option<String>,
    /// AT Protocol service endpoint override (`BLUESKY_SERVICE`).
    pub bluesky_service: Option<String>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("output_dir", &self.output_dir)
            .field("forced_slug", &self.forced_slug)
            .field("non_interactive", &self.non_interactive)
            .field("bluesky_handle", &self.bluesky_handle)
            .field("bluesky_password", &self.bluesky_password.as_ref().map(|_| "<redacted>"))
            .field("bluesky_service", &self.bluesky_service)
            .finish()
    }
}

impl Settings {
    /// Loads settings from a `.env` file (if present) and the environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            api_key: env::var("GEMINI_API_KEY").or_else(|_| env::var("GOOGLE_API_KEY")).ok(),
            output_dir: env::var("NEWSDESK_OUTPUT_DIR").ok().map(PathBuf::from),
            forced_slug: env::var("NEWSDESK_FORCED_SLUG").ok().filter(|s| !s.trim().is_empty()),
            non_interactive: env::var("NEWSDESK_NON_INTERACTIVE")
                .map(|v| truthy(&v))
                .unwrap_or(false),
            bluesky_handle: env::var("BLUESKY_HANDLE").ok(),
            bluesky_password: env::var("BLUESKY_APP_PASSWORD").ok(),
            bluesky_service: env::var("BLUESKY_SERVICE").ok(),
        }
    }
}

fn truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthy_values() {
        assert!(truthy("1"));
        assert!(truthy("true"));
        assert!(truthy("YES"));
        assert!(!truthy("0"));
        assert!(!truthy("no"));
        assert!(!truthy(""));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let settings = Settings {
            api_key: Some("secret-key".to_string()),
            bluesky_password: Some("secret-pass".to_string()),
            ..Settings::default()
        };
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("secret-key"));
        assert!(!debug.contains("secret-pass"));
        assert!(debug.contains("<redacted>"));
    }
}
