//! Deterministic file archiving for generated content.
//!
//! Archive filenames are a pure function of the content and the clock:
//! article files are dated to the next business day (news are published the
//! following working morning), social files to today. Existing files are
//! silently overwritten so a regenerated story replaces its earlier draft.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use crate::content::GeneratedContent;
use crate::slug::{extract_person_names, next_business_day, slugify, slugify_with_names, thesis_slug};
use crate::validate::validate_output_dir;
use crate::{NewsdeskError, Result};

/// Which kind of record a written archive file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// Full article: title, body, optional links block.
    News,
    /// Short social post only.
    Social,
}

/// One file written by [`FileArchiver::archive`].
#[derive(Debug, Clone)]
pub struct ArchivedFile {
    pub path: PathBuf,
    pub kind: ArchiveKind,
}

/// Writes generated content to dated, slug-named text files.
#[derive(Debug, Clone)]
pub struct FileArchiver {
    output_dir: Option<PathBuf>,
    forced_slug: Option<String>,
}

impl FileArchiver {
    /// Creates an archiver. With no output directory, [`archive`](Self::archive)
    /// is a no-op. A forced slug overrides every derived slug.
    pub fn new(output_dir: Option<PathBuf>, forced_slug: Option<String>) -> Result<Self> {
        if let Some(dir) = &output_dir {
            validate_output_dir(dir)?;
        }
        Ok(Self { output_dir, forced_slug })
    }

    /// Writes the archive files for one generation run and returns them.
    ///
    /// An article produces only a news file, even when a social post came
    /// with it; the social file is written for social-only runs, so the
    /// `*_blsky.txt` namespace holds exactly the posts meant for
    /// publishing. `input_text` seeds the social slug when no forced slug
    /// is set.
    pub fn archive(&self, content: &GeneratedContent, input_text: &str) -> Result<Vec<ArchivedFile>> {
        let Some(dir) = &self.output_dir else {
            return Ok(Vec::new());
        };

        let today = Local::now().date_naive();
        let mut written = Vec::new();

        if content.has_article() {
            let path = self.write_news_file(dir, content, today)?;
            written.push(ArchivedFile { path, kind: ArchiveKind::News });
        }

        if content.social_only
            && let Some(post) = content.social_post.as_deref()
            && !post.trim().is_empty()
        {
            let path = self.write_social_file(dir, post, input_text, today)?;
            written.push(ArchivedFile { path, kind: ArchiveKind::Social });
        }

        Ok(written)
    }

    fn write_news_file(&self, dir: &Path, content: &GeneratedContent, today: NaiveDate) -> Result<PathBuf> {
        let title = content.title.as_deref().unwrap_or_default();
        let body = content.body.as_deref().unwrap_or_default();

        let slug = self.news_slug(title, body);
        let date = next_business_day(today);
        let path = dir.join(format!("{}-{}.txt", date.format("%Y-%m-%d"), slug));

        let mut text = format!("Title: {}\n\nText: {}\n", title, body);
        if !content.links.is_empty() {
            text.push_str("\nLinks:\n");
            for line in &content.links {
                text.push_str(line);
                text.push('\n');
            }
        }

        write_archive_file(&path, &text)?;
        info!(path = %path.display(), "archived news article");
        Ok(path)
    }

    fn write_social_file(&self, dir: &Path, post: &str, input_text: &str, today: NaiveDate) -> Result<PathBuf> {
        let slug = match &self.forced_slug {
            Some(forced) => forced.clone(),
            None => slugify(input_text, 3),
        };
        let path = dir.join(format!("{}-{}_blsky.txt", today.format("%Y-%m-%d"), slug));

        write_archive_file(&path, &format!("{}\n", post))?;
        info!(path = %path.display(), "archived social post");
        Ok(path)
    }

    /// Derives the article slug: forced slug, then the thesis template, then
    /// a generic slug prefixed with up to two extracted person names.
    fn news_slug(&self, title: &str, body: &str) -> String {
        if let Some(forced) = &self.forced_slug {
            return forced.clone();
        }
        if let Some(slug) = thesis_slug(title) {
            return slug;
        }

        let names = extract_person_names(&format!("{} {}", title, body));
        slugify_with_names(title, 3, &names)
    }
}

fn write_archive_file(path: &Path, text: &str) -> Result<()> {
    if path.exists() {
        warn!(path = %path.display(), "overwriting existing archive file");
    }
    fs::write(path, text)
        .map_err(|e| NewsdeskError::file_operation(path, "write", e.to_string()))
}
