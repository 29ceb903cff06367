//! Parsing of generated text into structured news fields.
//!
//! The generation backend is instructed to emit a line-oriented block with
//! `Title:`, `Text:`, `Links:` and `Bluesky:` labels. This parser recovers
//! those fields and never fails: unparseable input simply yields an empty
//! [`ParsedNews`]. Spanish labels (`Título:`, `Texto:`, `Enlaces:`) are
//! accepted for output produced by historical prompts.

/// Structured fields recovered from a generated-text blob.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedNews {
    /// Article headline, if a `Title:` line was present.
    pub title: Option<String>,
    /// Article body, newline-joined from the final `Text:` block.
    pub body: Option<String>,
    /// Short social post from the `Bluesky:` line.
    pub social_post: Option<String>,
    /// Link lines (kept verbatim, including the leading `-`), in order.
    pub links: Vec<String>,
}

const TITLE_LABELS: &[&str] = &["Title:", "Título:"];
const TEXT_LABELS: &[&str] = &["Text:", "Texto:"];
const LINKS_LABELS: &[&str] = &["Links:", "Enlaces:"];
const SOCIAL_LABELS: &[&str] = &["Bluesky:"];

#[derive(PartialEq)]
enum Mode {
    Idle,
    Body,
    Links,
}

/// Returns the rest of the line after a matching label prefix.
fn strip_label<'a>(line: &'a str, labels: &[&str]) -> Option<&'a str> {
    labels.iter().find_map(|label| line.strip_prefix(label))
}

/// Parses a generated-text blob into its structured fields.
///
/// Grammar notes, all intentional:
/// - blank lines are skipped everywhere;
/// - a second `Text:` line discards any previously buffered body, so only
///   the contiguous final block survives (a quirk kept from the prompt
///   format, not a bug to fix);
/// - a second `Links:` line resets the accumulated links (last block wins);
/// - in link mode, lines not starting with `-` are dropped without leaving
///   link mode;
/// - a label with nothing after it yields `Some("")` for that field.
pub fn parse_generated(text: &str) -> ParsedNews {
    let mut parsed = ParsedNews::default();
    let mut buffer: Vec<String> = Vec::new();
    let mut mode = Mode::Idle;

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = strip_label(line, TITLE_LABELS) {
            parsed.title = Some(rest.trim().to_string());
            mode = Mode::Idle;
        } else if let Some(rest) = strip_label(line, TEXT_LABELS) {
            mode = Mode::Body;
            buffer.clear();
            let seed = rest.trim();
            if !seed.is_empty() {
                buffer.push(seed.to_string());
            }
        } else if strip_label(line, LINKS_LABELS).is_some() {
            mode = Mode::Links;
            parsed.links.clear();
        } else if let Some(rest) = strip_label(line, SOCIAL_LABELS) {
            parsed.social_post = Some(rest.trim().to_string());
            mode = Mode::Idle;
        } else if mode == Mode::Body {
            buffer.push(line.to_string());
        } else if mode == Mode::Links && line.starts_with('-') {
            parsed.links.push(line.to_string());
        }
    }

    if !buffer.is_empty() {
        parsed.body = Some(buffer.join("\n").trim().to_string());
    }

    parsed
}
