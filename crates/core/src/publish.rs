//! Publishing posts to social networks.
//!
//! [`SocialPublisher`] is the seam; [`BlueskyClient`] implements it over the
//! AT Protocol XRPC endpoints: `createSession` with handle and app password,
//! then `createRecord` into the account's `app.bsky.feed.post` collection.

use std::fmt;

use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{NewsdeskError, Result};

/// Default AT Protocol service endpoint.
pub const DEFAULT_SERVICE: &str = "https://bsky.social";

/// Splits a post into its text and a trailing link, if one is present.
///
/// The last `http(s)` URL in the text is taken as the link; every occurrence
/// of it is removed from the text, which is then whitespace-trimmed.
pub fn split_post_link(text: &str) -> (String, Option<String>) {
    let url_pattern = Regex::new(r"https?://\S+").expect("valid regex");

    let Some(link) = url_pattern.find_iter(text).last().map(|m| m.as_str().to_string()) else {
        return (text.trim().to_string(), None);
    };

    let stripped = text.replace(&link, "");
    (stripped.trim().to_string(), Some(link))
}

/// A publishing backend: post text plus optional link in, record URI out.
#[async_trait]
pub trait SocialPublisher: Send + Sync {
    /// Backend name used in logs and API errors.
    fn name(&self) -> &str;

    /// Publishes a post, returning an identifier for the created record.
    async fn publish(&self, text: &str, link: Option<&str>) -> Result<String>;
}

/// Client for publishing posts to Bluesky.
pub struct BlueskyClient {
    handle: String,
    app_password: String,
    service: String,
    client: Client,
}

impl fmt::Debug for BlueskyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlueskyClient")
            .field("handle", &self.handle)
            .field("app_password", &"<redacted>")
            .field("service", &self.service)
            .finish()
    }
}

#[derive(Serialize)]
struct SessionRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    access_jwt: String,
    did: String,
}

#[derive(Serialize)]
struct CreateRecordRequest<'a> {
    repo: &'a str,
    collection: &'a str,
    record: PostRecord<'a>,
}

#[derive(Serialize)]
struct PostRecord<'a> {
    #[serde(rename = "$type")]
    record_type: &'a str,
    text: &'a str,
    #[serde(rename = "createdAt")]
    created_at: String,
}

#[derive(Deserialize)]
struct CreateRecordResponse {
    uri: String,
}

impl BlueskyClient {
    /// Creates a client for a handle and app password on the default service.
    pub fn new(handle: impl Into<String>, app_password: impl Into<String>) -> Result<Self> {
        Self::with_service(handle, app_password, DEFAULT_SERVICE)
    }

    pub fn with_service(
        handle: impl Into<String>, app_password: impl Into<String>, service: impl Into<String>,
    ) -> Result<Self> {
        let handle = handle.into();
        let app_password = app_password.into();
        if handle.trim().is_empty() || app_password.trim().is_empty() {
            return Err(NewsdeskError::configuration("Bluesky credentials not configured")
                .with_suggestion("Set BLUESKY_HANDLE and BLUESKY_APP_PASSWORD in your .env file"));
        }

        Ok(Self { handle, app_password, service: service.into(), client: Client::new() })
    }

    async fn create_session(&self) -> Result<SessionResponse> {
        let url = format!("{}/xrpc/com.atproto.server.createSession", self.service);
        let request = SessionRequest { identifier: &self.handle, password: &self.app_password };

        debug!(handle = %self.handle, "creating Bluesky session");
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| NewsdeskError::network(&url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NewsdeskError::api(self.name(), Some(status.as_u16()), body)
                .with_suggestion("Verify the handle and app password are correct"));
        }

        response
            .json()
            .await
            .map_err(|e| NewsdeskError::api(self.name(), None, format!("unexpected session response: {}", e)))
    }
}

#[async_trait]
impl SocialPublisher for BlueskyClient {
    fn name(&self) -> &str {
        "Bluesky"
    }

    async fn publish(&self, text: &str, link: Option<&str>) -> Result<String> {
        let session = self.create_session().await?;

        let full_text = match link {
            Some(link) => format!("{} {}", text.trim(), link),
            None => text.trim().to_string(),
        };

        let url = format!("{}/xrpc/com.atproto.repo.createRecord", self.service);
        let request = CreateRecordRequest {
            repo: &session.did,
            collection: "app.bsky.feed.post",
            record: PostRecord {
                record_type: "app.bsky.feed.post",
                text: &full_text,
                created_at: Utc::now().to_rfc3339(),
            },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&session.access_jwt)
            .json(&request)
            .send()
            .await
            .map_err(|e| NewsdeskError::network(&url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NewsdeskError::api(self.name(), Some(status.as_u16()), body)
                .with_suggestion("Check the post length (300 characters maximum) and account status"));
        }

        let created: CreateRecordResponse = response
            .json()
            .await
            .map_err(|e| NewsdeskError::api(self.name(), None, format!("unexpected record response: {}", e)))?;

        info!(uri = %created.uri, "published post");
        Ok(created.uri)
    }
}
