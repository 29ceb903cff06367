//! Fetching article HTML from URLs, with retries.
//!
//! [`WebExtractor`] layers network policy on top of the pure extractor in
//! [`crate::extract`]: a fixed per-request timeout, three attempts with a
//! one-second pause between them, and one special-cased rewrite that strips
//! a leading `/es/` path segment when the known host answers 404 for the
//! localized path.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};
use url::Url;

use crate::extract::extract_article_text;
use crate::validate::validate_url;
use crate::{NewsdeskError, Result};

/// Host whose `/es/`-prefixed pages are retried without the prefix on 404.
const LOCALIZED_PATH_HOST: &str = "diis.unizar.es";

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Number of attempts before giving up.
    pub retries: u32,
    /// Pause between attempts in seconds.
    pub retry_delay: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
    /// Minimum character count the extracted text must reach.
    pub min_content_chars: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 10,
            retries: 3,
            retry_delay: 1,
            user_agent: "Mozilla/5.0 (compatible; Newsdesk/1.0)".to_string(),
            min_content_chars: 10,
        }
    }
}

/// Downloads pages and extracts their main article text.
#[derive(Debug, Clone)]
pub struct WebExtractor {
    config: FetchConfig,
    client: Client,
}

impl WebExtractor {
    pub fn new() -> Result<Self> {
        Self::with_config(FetchConfig::default())
    }

    pub fn with_config(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| NewsdeskError::configuration("Failed to build HTTP client").with_details(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Fetches a URL and extracts its main content.
    ///
    /// Retries the GET up to the configured attempt count, then fails with a
    /// `Network` error; succeeds only when the extracted text clears the
    /// configured content floor, failing with `ContentProcessing` otherwise.
    pub async fn extract(&self, url: &str) -> Result<String> {
        let parsed = validate_url(url)?;
        info!(url, "extracting content from URL");

        let mut last_error = String::new();
        for attempt in 1..=self.config.retries {
            match self.fetch_html(&parsed).await {
                Ok(html) => {
                    let content = extract_article_text(&html);
                    let length = content.trim().chars().count();
                    if length < self.config.min_content_chars {
                        return Err(NewsdeskError::content_processing("Insufficient content extracted from URL")
                            .with_details(format!("content length: {} characters", length))
                            .with_suggestion("Check if the URL contains substantial text content"));
                    }
                    info!(chars = length, "successfully extracted content");
                    return Ok(content);
                }
                Err(message) => {
                    warn!(attempt, error = %message, "fetch attempt failed");
                    last_error = message;
                    if attempt < self.config.retries {
                        tokio::time::sleep(Duration::from_secs(self.config.retry_delay)).await;
                    }
                }
            }
        }

        Err(NewsdeskError::network(
            url,
            format!("Failed to fetch content after {} attempts", self.config.retries),
        )
        .with_details(last_error)
        .with_suggestion("Check your internet connection and verify the URL is accessible"))
    }

    /// Performs one GET. On a 404 for the known localized host, the `/es/`
    /// path prefix is stripped and the page fetched once more.
    async fn fetch_html(&self, url: &Url) -> std::result::Result<String, String> {
        let response = self.client.get(url.clone()).send().await.map_err(|e| e.to_string())?;

        if response.status() == StatusCode::NOT_FOUND
            && let Some(fallback) = localized_path_fallback(url)
        {
            debug!(fallback = %fallback, "404 for localized path, retrying without prefix");
            let retry = self.client.get(fallback).send().await.map_err(|e| e.to_string())?;
            if retry.status().is_success() {
                return retry.text().await.map_err(|e| e.to_string());
            }
        }

        let response = response.error_for_status().map_err(|e| e.to_string())?;
        response.text().await.map_err(|e| e.to_string())
    }
}

/// Builds the `/es/`-stripped variant of a URL for the known host, if the
/// URL is eligible for the rewrite.
fn localized_path_fallback(url: &Url) -> Option<Url> {
    let host = url.host_str()?;
    if !host.contains(LOCALIZED_PATH_HOST) || !url.path().starts_with("/es/") {
        return None;
    }

    let mut fallback = url.clone();
    let stripped = url.path().replacen("/es/", "/", 1);
    fallback.set_path(&stripped);
    Some(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 10);
        assert_eq!(config.retries, 3);
        assert_eq!(config.retry_delay, 1);
        assert!(config.user_agent.contains("Newsdesk"));
    }

    #[test]
    fn test_localized_path_fallback_applies() {
        let url = Url::parse("https://diis.unizar.es/es/node/123").unwrap();
        let fallback = localized_path_fallback(&url).unwrap();
        assert_eq!(fallback.as_str(), "https://diis.unizar.es/node/123");
    }

    #[test]
    fn test_localized_path_fallback_wrong_host() {
        let url = Url::parse("https://example.com/es/node/123").unwrap();
        assert!(localized_path_fallback(&url).is_none());
    }

    #[test]
    fn test_localized_path_fallback_wrong_path() {
        let url = Url::parse("https://diis.unizar.es/node/123").unwrap();
        assert!(localized_path_fallback(&url).is_none());
    }

    #[tokio::test]
    async fn test_extract_rejects_invalid_url() {
        let extractor = WebExtractor::new().unwrap();
        let result = extractor.extract("not-a-url").await;
        assert!(matches!(result, Err(NewsdeskError::Validation { .. })));
    }
}
