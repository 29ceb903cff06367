//! Input validation helpers.
//!
//! Small, early checks applied at the pipeline boundary: URLs, input files,
//! inline text, output directories, and API keys. Each failure produces a
//! [`NewsdeskError`] with a suggestion the CLI can surface.

use std::fs;
use std::path::Path;

use regex::Regex;
use url::Url;

use crate::{NewsdeskError, Result};

/// Minimum number of characters an input document must contain.
pub const MIN_INPUT_CHARS: usize = 10;

/// Validates that a string is a well-formed HTTP or HTTPS URL.
pub fn validate_url(url: &str) -> Result<Url> {
    if url.trim().is_empty() {
        return Err(NewsdeskError::validation("Invalid URL")
            .with_details("empty string")
            .with_suggestion("Provide a non-empty URL"));
    }

    let parsed = Url::parse(url).map_err(|e| {
        NewsdeskError::validation(format!("Invalid URL format: {}", url))
            .with_details(e.to_string())
            .with_suggestion("Add 'http://' or 'https://' to the beginning of the URL")
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(NewsdeskError::validation("Unsupported URL protocol")
            .with_details(format!("protocol: {}", parsed.scheme()))
            .with_suggestion("Use HTTP or HTTPS URLs only"));
    }

    if parsed.host_str().is_none() {
        return Err(NewsdeskError::validation("Invalid URL format")
            .with_details(format!("URL: {}", url))
            .with_suggestion("Ensure the URL has a valid domain name"));
    }

    Ok(parsed)
}

/// Reads and validates an input file: it must exist, be a regular file,
/// decode as UTF-8, and contain at least `min_length` characters after
/// trimming. Returns the trimmed content.
pub fn validate_input_file(path: &Path, min_length: usize) -> Result<String> {
    if !path.exists() {
        return Err(NewsdeskError::validation(format!("File does not exist: {}", path.display()))
            .with_suggestion("Check the file path and ensure the file exists"));
    }

    if !path.is_file() {
        return Err(NewsdeskError::validation(format!("Path is not a file: {}", path.display()))
            .with_details("the path exists but points to a directory or other non-file object")
            .with_suggestion("Provide a path to a regular file"));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        NewsdeskError::validation(format!("Cannot read file: {}", path.display()))
            .with_details(e.to_string())
            .with_suggestion("Ensure the file is a valid UTF-8 text file with read permission")
    })?;

    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(NewsdeskError::validation(format!("File is empty: {}", path.display()))
            .with_suggestion("Add some content to the file before processing"));
    }

    if trimmed.chars().count() < min_length {
        return Err(NewsdeskError::validation(format!("File content too short: {}", path.display()))
            .with_details(format!(
                "content length: {}, minimum required: {}",
                trimmed.chars().count(),
                min_length
            ))
            .with_suggestion("Add more content to the file"));
    }

    Ok(trimmed.to_string())
}

/// Validates inline input text against a minimum trimmed length.
pub fn validate_text(text: &str, min_length: usize) -> Result<()> {
    let trimmed = text.trim();
    if trimmed.chars().count() < min_length {
        return Err(NewsdeskError::validation("Input text too short")
            .with_details(format!(
                "content length: {}, minimum required: {}",
                trimmed.chars().count(),
                min_length
            ))
            .with_suggestion("Provide more source text to work with"));
    }
    Ok(())
}

/// Validates an output directory, creating it (parents included) when missing.
pub fn validate_output_dir(path: &Path) -> Result<()> {
    if path.exists() && !path.is_dir() {
        return Err(NewsdeskError::validation(format!(
            "Path exists but is not a directory: {}",
            path.display()
        ))
        .with_suggestion("Choose a different path or remove the existing file"));
    }

    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| {
            NewsdeskError::validation(format!("Failed to create directory: {}", path.display()))
                .with_details(e.to_string())
                .with_suggestion("Check permissions or choose a different location")
        })?;
    }

    Ok(())
}

/// Validates an API key: present, at least 8 characters, and made of the
/// usual key alphabet. Returns the trimmed key.
pub fn validate_api_key(api_key: Option<&str>, service: &str) -> Result<String> {
    let key = api_key.map(str::trim).filter(|k| !k.is_empty()).ok_or_else(|| {
        NewsdeskError::configuration(format!("{} key not found", service))
            .with_suggestion(format!("Set the {} key in your .env file or environment", service))
    })?;

    if key.chars().count() < 8 {
        return Err(NewsdeskError::configuration(format!("{} key too short", service))
            .with_details(format!("key length: {}", key.chars().count()))
            .with_suggestion(format!("Verify you have the complete {} key", service)));
    }

    let pattern = Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid regex");
    if !pattern.is_match(key) {
        return Err(NewsdeskError::configuration(format!("Invalid {} key format", service))
            .with_details("key contains invalid characters")
            .with_suggestion(format!("Verify the {} key is copied correctly", service)));
    }

    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validate_url_ok() {
        assert!(validate_url("https://example.com/news/item").is_ok());
        assert!(validate_url("http://example.com").is_ok());
    }

    #[test]
    fn test_validate_url_rejects_missing_scheme() {
        assert!(matches!(validate_url("example.com"), Err(NewsdeskError::Validation { .. })));
    }

    #[test]
    fn test_validate_url_rejects_other_schemes() {
        assert!(matches!(validate_url("ftp://example.com"), Err(NewsdeskError::Validation { .. })));
    }

    #[test]
    fn test_validate_input_file_missing() {
        let result = validate_input_file(Path::new("/nonexistent/input.txt"), MIN_INPUT_CHARS);
        assert!(matches!(result, Err(NewsdeskError::Validation { .. })));
    }

    #[test]
    fn test_validate_input_file_too_short() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "short").unwrap();
        let result = validate_input_file(file.path(), MIN_INPUT_CHARS);
        assert!(matches!(result, Err(NewsdeskError::Validation { .. })));
    }

    #[test]
    fn test_validate_input_file_ok() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "  a perfectly reasonable input document  ").unwrap();
        let content = validate_input_file(file.path(), MIN_INPUT_CHARS).unwrap();
        assert_eq!(content, "a perfectly reasonable input document");
    }

    #[test]
    fn test_validate_text_minimum() {
        assert!(validate_text("123456789", 10).is_err());
        assert!(validate_text("1234567890", 10).is_ok());
    }

    #[test]
    fn test_validate_output_dir_creates_missing() {
        let tmp = tempfile::TempDir::new().unwrap();
        let nested = tmp.path().join("a/b/c");
        validate_output_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_validate_output_dir_rejects_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(validate_output_dir(file.path()).is_err());
    }

    #[test]
    fn test_validate_api_key() {
        assert!(validate_api_key(None, "Gemini").is_err());
        assert!(validate_api_key(Some("short"), "Gemini").is_err());
        assert!(validate_api_key(Some("has spaces in it"), "Gemini").is_err());
        assert_eq!(validate_api_key(Some(" AIza-test_key "), "Gemini").unwrap(), "AIza-test_key");
    }
}
