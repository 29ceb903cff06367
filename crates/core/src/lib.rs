pub mod archive;
pub mod config;
pub mod content;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod generator;
pub mod history;
pub mod llm;
pub mod parser;
pub mod publish;
pub mod review;
pub mod slug;
pub mod validate;

pub use archive::{ArchiveKind, ArchivedFile, FileArchiver};
pub use config::Settings;
pub use content::GeneratedContent;
pub use error::{NewsdeskError, Result};
pub use extract::extract_article_text;
pub use fetch::{FetchConfig, WebExtractor};
pub use generator::{GeneratorConfig, NewsGenerator, substitute_link_placeholders};
pub use history::{DUPLICATE_THRESHOLD, PostHistory, similarity_ratio};
pub use llm::{GeminiClient, StaticGenerator, TextGenerator};
pub use parser::{ParsedNews, parse_generated};
pub use publish::{BlueskyClient, SocialPublisher, split_post_link};
pub use review::{ReviewSession, ReviewState};
pub use slug::{extract_person_names, next_business_day, slugify, slugify_with_names, thesis_slug};
pub use validate::{validate_api_key, validate_input_file, validate_output_dir, validate_text, validate_url};
