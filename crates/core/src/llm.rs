//! Generation backends.
//!
//! [`TextGenerator`] is the single seam to the generative-text service: one
//! call that takes a fully composed prompt string and returns free-form
//! text. [`GeminiClient`] talks to Google's Generative Language REST API;
//! [`StaticGenerator`] returns a canned response for tests and offline runs.

use std::env;
use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::validate::validate_api_key;
use crate::{NewsdeskError, Result};

/// The style and output-grammar instructions sent ahead of every input.
pub const SYSTEM_PROMPT: &str = "\
You are a news-writing assistant. From the provided text, produce a news article and a social post \
following these guidelines:

**General style:**
*   **Active voice:** Use the active voice whenever possible; avoid excessive passive voice so the \
text reads direct and energetic.
*   **Neutral tone:** Keep the tone informative and objective.

**Output format:**
1.  **Title:** Must contain the main subject and the names of the protagonists. Keep it concise and \
avoid acronyms or internal codes; prefer a general term such as \"award winners\" over a call \
identifier.
2.  **Text:** An opening paragraph with the fundamentals, naming the protagonists together with the \
project or activity, followed by one or more paragraphs of detail about the people and the \
organizations involved. Group protagonists with their supervisors where possible. If the source \
contains a summary, abstract, or biography, include it at the end of the text.
3.  **Links:** A list of relevant URLs if any are mentioned.
4.  **Bluesky:** A short post (300 characters maximum) for the Bluesky social network, neutral and \
informative, naming the protagonists, using relevant hashtags, and ending with a link to the full \
story (a placeholder such as '[link to the news]' is fine).

Format the output EXACTLY like this, with no additional text before or after:
Title: [generated title]
Text: [generated text]
Links:
- [link 1]
- [link 2]
Bluesky: [generated post]";

/// Builds the narrower instruction block used for social-only generation.
pub fn social_only_prompt(url: &str) -> String {
    format!(
        "Produce ONLY a short post (300 characters maximum) for the Bluesky social network, with a \
         neutral and informative tone, naming the protagonists by surname only, giving the date \
         (abbreviate it as dd/mm hh; drop the :00 for on-the-hour times) and the place (for \
         example, seminar room abc at xyz). If the source announces a thesis, follow this template: \
         \"PhD defence of [Name] [Surname], [dd]/[m] [hh]h, [venue] will host the defence of the \
         thesis \"[Title]\"\". End the post with the link to the news: {}",
        url
    )
}

/// A generation backend: one prompt string in, free-form text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Backend name used in logs and API errors.
    fn name(&self) -> &str;

    /// Generates text from a fully composed prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// Client for Google's Generative Language API.
pub struct GeminiClient {
    api_key: String,
    model: String,
    client: Client,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GeminiClient {
    /// Creates a client with an explicit API key and the default model.
    pub fn new(api_key: &str) -> Result<Self> {
        let api_key = validate_api_key(Some(api_key), "Gemini")?;
        Ok(Self { api_key, model: DEFAULT_MODEL.to_string(), client: Client::new() })
    }

    /// Creates a client from `GEMINI_API_KEY`, falling back to
    /// `GOOGLE_API_KEY` for configurations predating the rename.
    pub fn from_env() -> Result<Self> {
        let key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("GOOGLE_API_KEY"))
            .map_err(|_| {
                NewsdeskError::configuration("Gemini API key not found")
                    .with_suggestion("Set GEMINI_API_KEY in your .env file or environment")
            })?;
        Self::new(&key)
    }

    /// Overrides the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/{}:generateContent?key={}", GEMINI_ENDPOINT, self.model, self.api_key);
        let request = GenerateRequest {
            contents: vec![RequestContent { parts: vec![RequestPart { text: prompt }] }],
        };

        debug!(model = %self.model, prompt_chars = prompt.chars().count(), "calling generation backend");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| NewsdeskError::api(self.name(), None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NewsdeskError::api(self.name(), Some(status.as_u16()), body)
                .with_suggestion("Verify the API key and model name are valid"));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| NewsdeskError::api(self.name(), None, format!("unexpected response shape: {}", e)))?;

        let text = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(NewsdeskError::api(self.name(), None, "empty response from model")
                .with_suggestion("Retry the request or try a different model"));
        }

        Ok(text)
    }
}

/// A backend that always returns the same text.
///
/// Useful for tests and for dry runs without credentials.
#[derive(Debug, Clone)]
pub struct StaticGenerator {
    response: String,
}

impl StaticGenerator {
    pub fn new(response: impl Into<String>) -> Self {
        Self { response: response.into() }
    }
}

#[async_trait]
impl TextGenerator for StaticGenerator {
    fn name(&self) -> &str {
        "static"
    }

    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(self.response.clone())
    }
}
