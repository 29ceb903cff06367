//! Heuristic extraction of the main article text from raw HTML.
//!
//! The extractor tries an ordered series of fallbacks, each only consulted
//! when the previous one yields too little text:
//!
//! 1. the first `<article>` element, if its visible text exceeds 200 chars;
//! 2. the `<div>` or `<section>` with the longest visible text, same floor;
//! 3. the `<body>` visible text, same floor;
//! 4. the whole document's visible text, regardless of length.
//!
//! "Visible text" is every text node, trimmed, empty nodes dropped, joined
//! with newlines. No boilerplate deduplication is attempted.

use scraper::{ElementRef, Html, Selector};

/// Character floor a candidate element must clear before it is accepted.
const CANDIDATE_MIN_CHARS: usize = 200;

/// Collects the visible text of an element: text nodes trimmed and
/// newline-joined, with empty nodes dropped.
fn visible_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extracts the likely main article text from an HTML document.
///
/// Pure function of the HTML string; never fails for non-empty input. The
/// final fallback returns the whole document's visible text even when it is
/// short, so length policy belongs to the caller (see
/// [`WebExtractor::extract`](crate::fetch::WebExtractor::extract)).
pub fn extract_article_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let article = Selector::parse("article").expect("valid selector");
    if let Some(element) = document.select(&article).next() {
        let text = visible_text(element);
        if text.chars().count() > CANDIDATE_MIN_CHARS {
            return text;
        }
    }

    let containers = Selector::parse("div, section").expect("valid selector");
    let mut best = String::new();
    for element in document.select(&containers) {
        let text = visible_text(element);
        if text.chars().count() > best.chars().count() {
            best = text;
        }
    }
    if best.chars().count() > CANDIDATE_MIN_CHARS {
        return best;
    }

    let body = Selector::parse("body").expect("valid selector");
    if let Some(element) = document.select(&body).next() {
        let text = visible_text(element);
        if text.chars().count() > CANDIDATE_MIN_CHARS {
            return text;
        }
    }

    visible_text(document.root_element())
}
