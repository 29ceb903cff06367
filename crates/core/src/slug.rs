//! Slug and date utilities for archive filenames.
//!
//! Pure functions: next-business-day calculation, heuristic person-name
//! extraction, and slug generation. The name heuristics are deliberately
//! approximate (title-cased bigrams match capitalized non-name phrases too);
//! archive filenames depend on reproducing this exact behavior, so the
//! patterns should not be "improved" into a smarter name extractor.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use regex::Regex;

/// Returns the next business day (Monday through Friday) strictly after `date`.
pub fn next_business_day(date: NaiveDate) -> NaiveDate {
    let mut next = date + Duration::days(1);
    while matches!(next.weekday(), Weekday::Sat | Weekday::Sun) {
        next += Duration::days(1);
    }
    next
}

/// Extracts likely person names from text using title-cased patterns.
///
/// Names are returned in first-appearance order, deduplicated. Known false
/// positives: any capitalized bigram ("Machine Learning") matches the plain
/// pair pattern. Known false negatives: accented names ("Pérez") escape the
/// ASCII character classes.
pub fn extract_person_names(text: &str) -> Vec<String> {
    let patterns = [
        r"\b(?:Dr\.|Dra\.|Prof\.|Profesora)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\b",
        r"\b([A-Z][a-z]+)\s+(?:and|y|e)\s+([A-Z][a-z]+)\b",
        r"\b([A-Z][a-z]+)\s+([A-Z][a-z]+)\b",
        r"\b(?:the|el|la)\s+([A-Z][a-z]+)\s+([A-Z][a-z]+)\b",
    ];

    let mut names: Vec<String> = Vec::new();
    for pattern in patterns {
        let re = Regex::new(pattern).expect("valid name pattern");
        for captures in re.captures_iter(text) {
            for group in captures.iter().skip(1).flatten() {
                let name = group.as_str().trim();
                if name.chars().count() > 2 && !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
    }

    names
}

/// Converts text to a lowercase ASCII slug of at most `max_words` words.
///
/// Accented characters are folded to their ASCII base, other non-ASCII
/// characters are dropped, and punctuation is stripped before splitting
/// on whitespace.
pub fn slugify(text: &str, max_words: usize) -> String {
    let folded = fold_ascii(&text.to_lowercase());
    let cleaned = Regex::new(r"[^\w\s-]").expect("valid regex").replace_all(&folded, "");

    cleaned
        .split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join("-")
}

/// Like [`slugify`], but prefixes up to two person names to the slug.
///
/// When names are present, one word of the `max_words` budget is given up
/// to keep filenames from growing unbounded.
pub fn slugify_with_names(text: &str, max_words: usize, person_names: &[String]) -> String {
    if person_names.is_empty() {
        return slugify(text, max_words);
    }

    let name_slug = person_names
        .iter()
        .take(2)
        .map(|name| slugify(name, usize::MAX))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if name_slug.is_empty() {
        return slugify(text, max_words);
    }

    let words = slugify(text, max_words.saturating_sub(1));
    if words.is_empty() { name_slug } else { format!("{}-{}", name_slug, words) }
}

/// Builds the special-case slug for thesis announcement titles.
///
/// Titles shaped like `PhD Thesis of <First> <Last> ... "<Thesis Title>"`
/// (the Spanish prefix `Lectura de Tesis de` is accepted for titles produced
/// by historical prompts) yield `first-last` plus the first two words of the
/// quoted thesis title. Returns `None` when the title does not match the
/// template, letting callers fall back to the generic slug.
pub fn thesis_slug(title: &str) -> Option<String> {
    let prefix = Regex::new(concat!(
        r"^(?:PhD Thesis of|Lectura de Tesis de)\s+",
        r"([A-Za-zÁÉÍÓÚáéíóúüÜñÑ]+)\s+([A-Za-zÁÉÍÓÚáéíóúüÜñÑ]+)"
    ))
    .expect("valid thesis pattern");

    let captures = prefix.captures(title)?;
    let mut slug = slugify(&format!("{} {}", &captures[1], &captures[2]), 4);

    let quoted = Regex::new(r#""([^"]+)""#).expect("valid regex");
    if let Some(title_match) = quoted.captures(title) {
        let keywords = slugify(&title_match[1], 2);
        if !keywords.is_empty() {
            slug.push('-');
            slug.push_str(&keywords);
        }
    }

    Some(slug)
}

/// Folds accented Latin characters to ASCII and drops other non-ASCII input.
fn fold_ascii(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            'á' | 'à' | 'ä' | 'â' | 'ã' | 'å' => Some('a'),
            'é' | 'è' | 'ë' | 'ê' => Some('e'),
            'í' | 'ì' | 'ï' | 'î' => Some('i'),
            'ó' | 'ò' | 'ö' | 'ô' | 'õ' => Some('o'),
            'ú' | 'ù' | 'ü' | 'û' => Some('u'),
            'ñ' => Some('n'),
            'ç' => Some('c'),
            c if c.is_ascii() => Some(c),
            _ => None,
        })
        .collect()
}
