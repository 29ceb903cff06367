//! End-to-end tests of the newsdesk binary that need no network access.

use assert_cmd::Command;
use predicates::prelude::*;

fn newsdesk() -> Command {
    let mut cmd = Command::cargo_bin("newsdesk").unwrap();
    // Isolate from the developer's environment and any .env file.
    cmd.env_remove("GEMINI_API_KEY")
        .env_remove("GOOGLE_API_KEY")
        .env_remove("NEWSDESK_OUTPUT_DIR")
        .env_remove("NEWSDESK_FORCED_SLUG")
        .env_remove("NEWSDESK_NON_INTERACTIVE")
        .current_dir(std::env::temp_dir());
    cmd
}

#[test]
fn help_lists_subcommands() {
    newsdesk()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("publish"))
        .stdout(predicate::str::contains("history"));
}

#[test]
fn generate_without_api_key_fails_with_hint() {
    newsdesk()
        .args(["generate", "--text", "some source text long enough", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Gemini API key not found"))
        .stderr(predicate::str::contains("GEMINI_API_KEY"));
}

#[test]
fn generate_rejects_short_text_before_calling_backend() {
    newsdesk()
        .env("GEMINI_API_KEY", "AIza-test_key_0123")
        .args(["generate", "--text", "short", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input text too short"));
}

#[test]
fn generate_without_input_fails() {
    newsdesk()
        .env("GEMINI_API_KEY", "AIza-test_key_0123")
        .args(["generate", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No input given"));
}

#[test]
fn generate_offers_reuse_of_archived_post_for_seen_url() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("2025-01-01-test-paper_blsky.txt"),
        "Archived post about the test paper https://example.com/news/test-paper\n",
    )
    .unwrap();

    newsdesk()
        .env("GEMINI_API_KEY", "AIza-test_key_0123")
        .args(["generate", "https://example.com/news/test-paper"])
        .arg("--output-dir")
        .arg(dir.path())
        .write_stdin("r\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Archived post about the test paper"))
        .stderr(predicate::str::contains("Reusing archived post"));
}

#[test]
fn generate_can_be_cancelled_when_url_was_seen() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("2025-01-01-test-paper_blsky.txt"), "post\n").unwrap();

    newsdesk()
        .env("GEMINI_API_KEY", "AIza-test_key_0123")
        .args(["generate", "https://example.com/news/test-paper"])
        .arg("--output-dir")
        .arg(dir.path())
        .write_stdin("n\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Generation cancelled"));
}

#[test]
fn history_reports_matching_archive_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("2025-01-01-test-paper_blsky.txt"), "post\n").unwrap();

    newsdesk()
        .args(["history", "https://example.com/news/test-paper"])
        .arg("--dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("test-paper_blsky.txt"));
}

#[test]
fn history_with_no_matches_succeeds_quietly() {
    let dir = tempfile::tempdir().unwrap();

    newsdesk()
        .args(["history", "https://example.com/news/unseen-story"])
        .arg("--dir")
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("No archived posts match"));
}

#[test]
fn publish_with_empty_archive_fails() {
    let dir = tempfile::tempdir().unwrap();

    newsdesk()
        .arg("publish")
        .arg("--dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No archived social posts found"));
}
