//! Offline end-to-end tests of the public API, driven by a static backend.

use std::fs;

use newsdesk_core::{
    DUPLICATE_THRESHOLD, FileArchiver, GeneratedContent, NewsGenerator, PostHistory, ReviewSession,
    ReviewState, StaticGenerator, parse_generated, similarity_ratio, split_post_link,
    substitute_link_placeholders,
};
use tempfile::TempDir;

const BACKEND_RESPONSE: &str = "\
Title: Ana Torres wins the regional robotics prize
Text: Ana Torres, a researcher in the robotics group, received the regional prize for her work on \
legged locomotion. The jury highlighted the maturity of the prototype.
Links:
- https://example.com/prize
Bluesky: Ana Torres wins the regional robotics prize! #robotics [link to the news]";

fn generator() -> NewsGenerator {
    NewsGenerator::new(Box::new(StaticGenerator::new(BACKEND_RESPONSE))).unwrap()
}

#[tokio::test]
async fn generate_from_text_produces_full_article() {
    let content = generator()
        .generate_from_text("Press release about Ana Torres and the robotics prize.", None, None)
        .await
        .unwrap();

    assert_eq!(content.title.as_deref(), Some("Ana Torres wins the regional robotics prize"));
    assert!(content.body.as_deref().unwrap().starts_with("Ana Torres, a researcher"));
    assert_eq!(content.links, vec!["- https://example.com/prize"]);
    assert!(content.social_post.as_deref().unwrap().contains("#robotics"));
    assert!(content.has_article());
}

#[tokio::test]
async fn generated_article_archives_a_single_news_file() {
    let dir = TempDir::new().unwrap();
    let content = generator()
        .generate_from_text("Press release about Ana Torres and the robotics prize.", None, None)
        .await
        .unwrap();

    let archiver =
        FileArchiver::new(Some(dir.path().to_path_buf()), Some("robotics-prize".to_string())).unwrap();
    let written = archiver.archive(&content, "input text").unwrap();
    assert_eq!(written.len(), 1);

    let news_text = fs::read_to_string(&written[0].path).unwrap();
    assert!(news_text.starts_with("Title: Ana Torres wins the regional robotics prize\n\nText: "));
    assert!(news_text.contains("\nLinks:\n- https://example.com/prize\n"));

    // The social post travels with the article but is not archived; the
    // *_blsky.txt namespace stays reserved for social-only runs.
    let history = PostHistory::new(dir.path());
    assert!(history.recent_posts(10).is_empty());
}

#[test]
fn social_only_archive_is_found_in_history() {
    let dir = TempDir::new().unwrap();
    let content = GeneratedContent::social(
        Some("Ana Torres wins the regional robotics prize! https://example.com/prize".to_string()),
        "raw".to_string(),
        Some("https://example.com/prize".to_string()),
    );

    let archiver =
        FileArchiver::new(Some(dir.path().to_path_buf()), Some("robotics-prize".to_string())).unwrap();
    let written = archiver.archive(&content, "input text").unwrap();
    assert_eq!(written.len(), 1);

    let history = PostHistory::new(dir.path());
    let matches = history.find_similar("https://example.com/news/robotics-prize");
    assert_eq!(matches.len(), 1);
    assert!(matches[0].to_string_lossy().ends_with("-robotics-prize_blsky.txt"));
}

#[test]
fn history_matches_url_slug_against_dated_filename() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("2025-01-01-test-paper_blsky.txt");
    fs::write(&path, "An archived post about the test paper\n").unwrap();

    let history = PostHistory::new(dir.path());
    let matches = history.find_similar("https://diis.unizar.es/noticias/test-paper");
    assert_eq!(matches, vec![path.clone()]);

    let found = history
        .find_by_content("anything", Some("https://diis.unizar.es/noticias/test-paper"), DUPLICATE_THRESHOLD)
        .unwrap();
    assert_eq!(found.as_deref(), Some("An archived post about the test paper"));
}

#[test]
fn near_duplicate_posts_are_detected_by_similarity() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("2025-01-01-story_blsky.txt"),
        "Ana Torres wins the regional robotics prize! #robotics\n",
    )
    .unwrap();

    let history = PostHistory::new(dir.path());
    let duplicate = history
        .find_by_content("Ana Torres wins the regional robotics prize!! #robotics", None, DUPLICATE_THRESHOLD)
        .unwrap();
    assert!(duplicate.is_some());

    assert!(similarity_ratio("Ana Torres wins", "Ana Torres wins") == 1.0);
}

#[test]
fn social_post_placeholder_resolves_to_source_url() {
    let parsed = parse_generated(BACKEND_RESPONSE);
    let post = substitute_link_placeholders(&parsed.social_post.unwrap(), "https://example.com/prize");
    assert!(post.ends_with("https://example.com/prize"));
    assert!(!post.contains("[link to the news]"));

    let (text, link) = split_post_link(&post);
    assert_eq!(link.as_deref(), Some("https://example.com/prize"));
    assert!(text.starts_with("Ana Torres wins"));
}

#[test]
fn review_session_drives_an_edit_then_publish_flow() {
    let content = GeneratedContent::social(
        Some("Draft post https://example.com/prize".to_string()),
        "raw".to_string(),
        None,
    );

    let mut session = ReviewSession::new(content.social_post.unwrap());
    session.request_edit().unwrap();
    session.submit_edit("Final post https://example.com/prize").unwrap();
    session.approve().unwrap();

    assert_eq!(session.state(), ReviewState::Approved);
    let (text, link) = split_post_link(session.content());
    assert_eq!(text, "Final post");
    assert_eq!(link.as_deref(), Some("https://example.com/prize"));
}
