//! The generated-content record produced by one pipeline invocation.

use serde::Serialize;

/// Everything one generation run produced.
///
/// One struct with optional members rather than an enum: the fields co-occur
/// by convention, not by exclusive case (a full article may also carry a
/// social post). The one hard invariant is that `social_only == true`
/// implies `title` and `body` are `None` and `links` is empty; the converse
/// does not hold.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedContent {
    /// Article headline.
    pub title: Option<String>,
    /// Multi-paragraph article body.
    pub body: Option<String>,
    /// Short social post (≤ 300 characters by convention, not enforced).
    pub social_post: Option<String>,
    /// Link lines in appearance order, each a literal `- <url>` line.
    pub links: Vec<String>,
    /// The unparsed backend response, always retained.
    pub raw_output: String,
    /// True when only a social post was requested and produced.
    pub social_only: bool,
    /// The URL the content was generated from, when there was one.
    pub source_url: Option<String>,
}

impl GeneratedContent {
    /// Builds a full-article result.
    pub fn article(
        title: Option<String>, body: Option<String>, social_post: Option<String>, links: Vec<String>,
        raw_output: String, source_url: Option<String>,
    ) -> Self {
        Self { title, body, social_post, links, raw_output, social_only: false, source_url }
    }

    /// Builds a social-only result, upholding the absent-article invariant.
    pub fn social(social_post: Option<String>, raw_output: String, source_url: Option<String>) -> Self {
        Self {
            title: None,
            body: None,
            social_post,
            links: Vec::new(),
            raw_output,
            social_only: true,
            source_url,
        }
    }

    /// True when there is a title and body worth archiving as an article.
    ///
    /// A label parsed with nothing after it yields `Some("")`, so presence
    /// alone is not enough: both fields must be non-empty after trimming.
    pub fn has_article(&self) -> bool {
        !self.social_only
            && self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
            && self.body.as_deref().is_some_and(|b| !b.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_social_constructor_upholds_invariant() {
        let content = GeneratedContent::social(
            Some("Post text".to_string()),
            "raw".to_string(),
            Some("https://example.com".to_string()),
        );
        assert!(content.social_only);
        assert!(content.title.is_none());
        assert!(content.body.is_none());
        assert!(content.links.is_empty());
        assert!(!content.has_article());
    }

    #[test]
    fn test_article_may_carry_social_post() {
        let content = GeneratedContent::article(
            Some("Title".to_string()),
            Some("Body".to_string()),
            Some("Post".to_string()),
            vec!["- https://example.com".to_string()],
            "raw".to_string(),
            None,
        );
        assert!(!content.social_only);
        assert!(content.has_article());
        assert!(content.social_post.is_some());
    }

    #[test]
    fn test_blank_title_or_body_is_not_an_article() {
        let blank_title = GeneratedContent::article(
            Some("".to_string()),
            Some("Body".to_string()),
            None,
            Vec::new(),
            "raw".to_string(),
            None,
        );
        assert!(!blank_title.has_article());

        let blank_body = GeneratedContent::article(
            Some("Title".to_string()),
            Some("   ".to_string()),
            None,
            Vec::new(),
            "raw".to_string(),
            None,
        );
        assert!(!blank_body.has_article());

        let missing_title = GeneratedContent::article(
            None,
            Some("Body".to_string()),
            None,
            Vec::new(),
            "raw".to_string(),
            None,
        );
        assert!(!missing_title.has_article());
    }
}
