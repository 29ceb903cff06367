//! Lookup of previously archived social posts.
//!
//! [`PostHistory`] answers two questions about an archive directory: has a
//! URL been posted about before (filename slug match), and does a candidate
//! post duplicate an archived one (content similarity). Similarity is the
//! classic matching-blocks ratio `2*M / (len(a) + len(b))` where `M` counts
//! characters in common substrings found by recursive longest-match.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use regex::Regex;
use tracing::debug;

use crate::Result;

/// Suffix shared by every archived social post file.
const SOCIAL_SUFFIX: &str = "_blsky.txt";

/// Content similarity above which two posts count as duplicates.
pub const DUPLICATE_THRESHOLD: f64 = 0.8;

/// Reads archived social posts from an output directory.
#[derive(Debug, Clone)]
pub struct PostHistory {
    dir: PathBuf,
}

impl PostHistory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Finds archived posts whose filename matches the URL's slug segment.
    ///
    /// The first pass requires an exact (case-sensitive) substring match on
    /// the file stem; when that finds nothing, a second pass strips the
    /// leading date prefix and compares case-insensitively.
    pub fn find_similar(&self, url: &str) -> Vec<PathBuf> {
        let Some(segment) = url_slug_segment(url) else {
            return Vec::new();
        };

        let files = self.social_files();
        let mut matches: Vec<PathBuf> = files
            .iter()
            .filter(|path| stem_of(path).contains(&segment))
            .cloned()
            .collect();

        if matches.is_empty() {
            let date_prefix = Regex::new(r"^\d{4}-\d{2}-\d{2}-").expect("valid regex");
            let needle = segment.to_lowercase();
            matches = files
                .into_iter()
                .filter(|path| {
                    let stem = stem_of(path);
                    date_prefix.replace(&stem, "").to_lowercase().contains(&needle)
                })
                .collect();
        }

        debug!(url, count = matches.len(), "history slug lookup");
        matches
    }

    /// Returns the text of an archived post duplicating `content`, if any.
    ///
    /// With a URL, filename matches are checked first and the most recent one
    /// returned directly. Otherwise every recent post is compared by
    /// lowercased similarity against `threshold` ([`DUPLICATE_THRESHOLD`] is
    /// the usual choice).
    pub fn find_by_content(&self, content: &str, url: Option<&str>, threshold: f64) -> Result<Option<String>> {
        if let Some(url) = url {
            let mut matches = self.find_similar(url);
            sort_by_mtime_desc(&mut matches);
            if let Some(path) = matches.first()
                && let Ok(text) = fs::read_to_string(path)
            {
                return Ok(Some(text.trim().to_string()));
            }
        }

        let needle = content.trim().to_lowercase();
        for path in self.recent_posts(usize::MAX) {
            let Ok(text) = fs::read_to_string(&path) else {
                continue;
            };
            let ratio = similarity_ratio(&needle, &text.trim().to_lowercase());
            if ratio >= threshold {
                debug!(path = %path.display(), ratio, "found near-duplicate post");
                return Ok(Some(text.trim().to_string()));
            }
        }

        Ok(None)
    }

    /// Archived social post files, most recently modified first.
    pub fn recent_posts(&self, count: usize) -> Vec<PathBuf> {
        let mut files = self.social_files();
        sort_by_mtime_desc(&mut files);
        files.truncate(count);
        files
    }

    fn social_files(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };

        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.ends_with(SOCIAL_SUFFIX))
            })
            .collect()
    }
}

/// The slug-bearing segment of a URL path: the last segment, or the one
/// before it when the last is too short to identify a story.
fn url_slug_segment(url: &str) -> Option<String> {
    let trimmed = url.trim_end_matches('/');
    let mut segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

    let last = segments.pop()?;
    if last.chars().count() > 3 {
        return Some(last.to_string());
    }
    segments.pop().map(str::to_string)
}

fn stem_of(path: &Path) -> String {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or_default().to_string()
}

fn sort_by_mtime_desc(files: &mut [PathBuf]) {
    files.sort_by_key(|path| {
        std::cmp::Reverse(
            fs::metadata(path)
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH),
        )
    });
}

/// Matching-blocks similarity of two strings: `2*M / (len(a) + len(b))`,
/// with `M` the total length of common substrings found by recursively
/// taking the longest common substring and matching what lies on either
/// side of it. Two empty strings are fully similar.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched = matching_chars(&a, &b);
    2.0 * matched as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (a_start, b_start, length) = longest_match(a, b);
    if length == 0 {
        return 0;
    }

    length
        + matching_chars(&a[..a_start], &b[..b_start])
        + matching_chars(&a[a_start + length..], &b[b_start + length..])
}

/// Longest common substring of two char slices, as (start in a, start in b,
/// length). Returns the earliest such match on ties.
fn longest_match(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    // lengths[j] holds the common-suffix length ending at (i, j)
    let mut lengths = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        let mut prev = 0;
        for (j, &cb) in b.iter().enumerate() {
            let current = lengths[j + 1];
            lengths[j + 1] = if ca == cb { prev + 1 } else { 0 };
            prev = current;
            if lengths[j + 1] > best.2 {
                best = (i + 1 - lengths[j + 1], j + 1 - lengths[j + 1], lengths[j + 1]);
            }
        }
    }

    best
}
