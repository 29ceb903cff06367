//! Generation orchestration.
//!
//! [`NewsGenerator`] decides which generation mode to run for a given input
//! (full article, or social-post-only for configured domains), composes the
//! prompt, invokes the backend, and parses the response into a
//! [`GeneratedContent`].

use std::path::Path;

use regex::Regex;
use tracing::info;

use crate::content::GeneratedContent;
use crate::fetch::WebExtractor;
use crate::llm::{SYSTEM_PROMPT, TextGenerator, social_only_prompt};
use crate::parser::parse_generated;
use crate::validate::{MIN_INPUT_CHARS, validate_input_file, validate_text};
use crate::{NewsdeskError, Result};

/// Bracketed tokens the backend may leave where the source URL belongs.
const LINK_PLACEHOLDERS: &[&str] = &["[link to the news]", "[news link]", "[enlace a la noticia]"];

/// Orchestrator configuration.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Hosts for which only a social post is generated.
    pub social_only_domains: Vec<String>,
    /// Minimum trimmed input length accepted.
    pub min_input_chars: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            social_only_domains: vec!["diis.unizar.es".to_string()],
            min_input_chars: MIN_INPUT_CHARS,
        }
    }
}

/// Turns an input source into generated news content via a backend.
pub struct NewsGenerator {
    backend: Box<dyn TextGenerator>,
    extractor: WebExtractor,
    config: GeneratorConfig,
}

impl NewsGenerator {
    pub fn new(backend: Box<dyn TextGenerator>) -> Result<Self> {
        Ok(Self { backend, extractor: WebExtractor::new()?, config: GeneratorConfig::default() })
    }

    pub fn with_config(backend: Box<dyn TextGenerator>, extractor: WebExtractor, config: GeneratorConfig) -> Self {
        Self { backend, extractor, config }
    }

    /// True when the URL belongs to a configured social-only domain.
    pub fn is_social_only(&self, url: &str) -> bool {
        self.config.social_only_domains.iter().any(|domain| url.contains(domain))
    }

    /// Generates news from a text file.
    pub async fn generate_from_file(&self, path: &Path, extra: Option<&str>) -> Result<GeneratedContent> {
        let content = validate_input_file(path, self.config.min_input_chars).map_err(|e| {
            NewsdeskError::content_processing(format!("Failed to generate news from file {}", path.display()))
                .with_details(e.to_string())
                .with_suggestion("Check that the file exists and contains readable text")
        })?;

        self.generate_from_text(&content, extra, None).await
    }

    /// Generates news from inline text, optionally tagged with its source URL.
    pub async fn generate_from_text(
        &self, text: &str, extra: Option<&str>, source_url: Option<&str>,
    ) -> Result<GeneratedContent> {
        validate_text(text, self.config.min_input_chars)?;

        let prompt = compose_prompt(text, extra, source_url);
        info!(backend = self.backend.name(), "generating news content");
        let raw = self.backend.generate(&prompt).await?;

        let parsed = parse_generated(&raw);
        Ok(GeneratedContent::article(
            parsed.title,
            parsed.body,
            parsed.social_post,
            parsed.links,
            raw,
            source_url.map(str::to_string),
        ))
    }

    /// Generates news from a URL: extracts the page content, then produces
    /// either a social-only post (for configured domains) or a full article.
    pub async fn generate_from_url(&self, url: &str, extra: Option<&str>) -> Result<GeneratedContent> {
        let content = self.extractor.extract(url).await?;

        if self.is_social_only(url) {
            self.generate_social_only(&content, url).await
        } else {
            self.generate_from_text(&content, extra, Some(url)).await
        }
    }

    async fn generate_social_only(&self, content: &str, url: &str) -> Result<GeneratedContent> {
        info!(backend = self.backend.name(), url, "generating social-only post");

        let prompt = compose_prompt(content, Some(&social_only_prompt(url)), Some(url));
        let raw = self.backend.generate(&prompt).await?;

        let parsed = parse_generated(&raw);
        let social_post = parsed
            .social_post
            .map(|post| substitute_link_placeholders(&post, url));

        Ok(GeneratedContent::social(social_post, raw, Some(url.to_string())))
    }
}

/// Composes the full prompt: system prompt, optional additional
/// instructions, optional source URL, then the input content, separated by
/// blank lines.
pub fn compose_prompt(input: &str, extra: Option<&str>, source_url: Option<&str>) -> String {
    let mut prompt = SYSTEM_PROMPT.to_string();

    if let Some(extra) = extra {
        prompt.push_str("\n\n**Additional instructions:** ");
        prompt.push_str(extra);
    }

    if let Some(url) = source_url {
        prompt.push_str("\n\n**Source URL:** ");
        prompt.push_str(url);
    }

    prompt.push_str("\n\n--- Input text ---\n");
    prompt.push_str(input);
    prompt
}

/// Replaces link placeholders with the source URL and normalizes the result.
///
/// Each known bracketed token is replaced case-insensitively with the URL.
/// Afterwards whitespace runs collapse to single spaces and an immediately
/// repeated URL collapses to one occurrence; the collapse repeats until a
/// fixed point is reached, then the text is trimmed.
pub fn substitute_link_placeholders(text: &str, url: &str) -> String {
    let mut substituted = text.to_string();
    for placeholder in LINK_PLACEHOLDERS {
        let pattern = Regex::new(&format!("(?i){}", regex::escape(placeholder))).expect("valid regex");
        // NoExpand keeps `$` in the URL from being read as a group reference.
        substituted = pattern.replace_all(&substituted, regex::NoExpand(url)).into_owned();
    }

    let whitespace = Regex::new(r"\s+").expect("valid regex");
    let mut collapsed = whitespace.replace_all(&substituted, " ").into_owned();

    let doubled = format!("{} {}", url, url);
    while collapsed.contains(&doubled) {
        collapsed = collapsed.replace(&doubled, url);
    }

    collapsed.trim().to_string()
}
