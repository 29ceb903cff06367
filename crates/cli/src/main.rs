use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Command, ExitCode};

use anyhow::Context;
use clap::{Parser, Subcommand};
use newsdesk_core::{
    BlueskyClient, DUPLICATE_THRESHOLD, FileArchiver, GeminiClient, GeneratedContent, NewsGenerator,
    NewsdeskError, PostHistory, ReviewSession, ReviewState, Settings, SocialPublisher, split_post_link,
};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Turn source documents into news articles and social posts
#[derive(Parser, Debug)]
#[command(name = "newsdesk")]
#[command(version = VERSION)]
#[command(about = "Generate, archive and publish news content", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a news article and social post from a source document
    Generate {
        /// URL to fetch, text file to read, or "-" for stdin
        #[arg(value_name = "INPUT")]
        input: Option<String>,

        /// Inline source text instead of INPUT
        #[arg(short, long, value_name = "TEXT", conflicts_with = "input")]
        text: Option<String>,

        /// Additional instructions passed to the generation backend
        #[arg(short, long, value_name = "TEXT")]
        extra: Option<String>,

        /// Archive directory (default: NEWSDESK_OUTPUT_DIR)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Slug override for archive filenames
        #[arg(short, long, value_name = "SLUG")]
        slug: Option<String>,

        /// Skip confirmation prompts
        #[arg(short, long)]
        yes: bool,
    },

    /// Review and publish the most recent archived social post to Bluesky
    Publish {
        /// Archive directory (default: NEWSDESK_OUTPUT_DIR)
        #[arg(short, long, value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Bluesky handle (default: BLUESKY_HANDLE)
        #[arg(long, value_name = "HANDLE")]
        handle: Option<String>,
    },

    /// List archived posts matching a URL
    History {
        /// URL whose slug is matched against archive filenames
        #[arg(value_name = "URL")]
        url: String,

        /// Archive directory (default: NEWSDESK_OUTPUT_DIR)
        #[arg(short, long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
}

/// Options for the generate subcommand after merging flags with settings.
struct GenerateOptions {
    input: Option<String>,
    text: Option<String>,
    extra: Option<String>,
    output_dir: Option<PathBuf>,
    slug: Option<String>,
    assume_yes: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "newsdesk=debug" } else { "newsdesk=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_writer(io::stderr)
        .init();

    if args.verbose {
        echo::print_banner();
    }

    let settings = Settings::from_env();
    let result = match args.command {
        Commands::Generate { input, text, extra, output_dir, slug, yes } => {
            let options = GenerateOptions {
                input,
                text,
                extra,
                output_dir: output_dir.or_else(|| settings.output_dir.clone()),
                slug: slug.or_else(|| settings.forced_slug.clone()),
                assume_yes: yes || settings.non_interactive,
            };
            run_generate(&settings, options).await
        }
        Commands::Publish { dir, handle } => run_publish(&settings, dir, handle).await,
        Commands::History { url, dir } => run_history(&settings, &url, dir),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report_error(&error);
            ExitCode::FAILURE
        }
    }
}

/// Print an error, surfacing details and suggestions for pipeline errors.
fn report_error(error: &anyhow::Error) {
    if let Some(pipeline) = error.downcast_ref::<NewsdeskError>() {
        echo::print_error(&pipeline.to_string());
        if let Some(details) = pipeline.details() {
            eprintln!("  {} {}", "Details:".dimmed(), details);
        }
        if let Some(suggestion) = pipeline.suggestion() {
            eprintln!("  {} {}", "Hint:".dimmed(), suggestion);
        }
    } else {
        echo::print_error(&format!("{:#}", error));
    }
}

async fn run_generate(settings: &Settings, options: GenerateOptions) -> anyhow::Result<()> {
    let api_key = settings.api_key.as_deref().ok_or_else(|| {
        NewsdeskError::configuration("Gemini API key not found")
            .with_suggestion("Set GEMINI_API_KEY in your .env file or environment")
    })?;
    let backend = GeminiClient::new(api_key)?;
    let generator = NewsGenerator::new(Box::new(backend))?;

    echo::print_step(1, 3, "Generating content");
    let (content, input_text) = match (&options.text, &options.input) {
        (Some(text), _) => {
            let content = generator.generate_from_text(text, options.extra.as_deref(), None).await?;
            (content, text.clone())
        }
        (None, Some(input)) if input == "-" => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).context("Failed to read from stdin")?;
            let content = generator.generate_from_text(&buffer, options.extra.as_deref(), None).await?;
            (content, buffer)
        }
        (None, Some(input)) if input.starts_with("http://") || input.starts_with("https://") => {
            if let HistoryDecision::Reuse(post) = check_history(&options, input)? {
                echo::print_success("Reusing archived post; nothing regenerated");
                println!("{}", post);
                return Ok(());
            }
            let content = generator.generate_from_url(input, options.extra.as_deref()).await?;
            (content, input.clone())
        }
        (None, Some(input)) => {
            let path = PathBuf::from(input);
            let content = generator.generate_from_file(&path, options.extra.as_deref()).await?;
            let text = fs::read_to_string(&path).unwrap_or_else(|_| input.clone());
            (content, text)
        }
        (None, None) => {
            anyhow::bail!("No input given. Pass a URL, a file path, \"-\" for stdin, or --text");
        }
    };

    echo::print_step(2, 3, "Reviewing generated content");
    display_content(&content);

    if !options.assume_yes && !confirm("Archive this content?")? {
        echo::print_warning("Discarded without archiving");
        return Ok(());
    }

    echo::print_step(3, 3, "Archiving");
    let archiver = FileArchiver::new(options.output_dir.clone(), options.slug.clone())?;
    let written = archiver.archive(&content, &input_text)?;

    if written.is_empty() {
        echo::print_info("No archive directory configured; nothing written");
    } else {
        for file in &written {
            echo::print_success(&format!("Wrote {}", file.path.display().bright_white()));
        }
    }

    Ok(())
}

/// What the history check decided about a URL that was seen before.
enum HistoryDecision {
    /// No archived match, or the operator chose to regenerate.
    Proceed,
    /// Republish the archived post instead of regenerating.
    Reuse(String),
}

/// When the URL already has archived posts, offer to reuse the most recent
/// one instead of regenerating. Non-interactive runs always regenerate.
fn check_history(options: &GenerateOptions, url: &str) -> anyhow::Result<HistoryDecision> {
    let Some(dir) = &options.output_dir else {
        return Ok(HistoryDecision::Proceed);
    };

    let history = PostHistory::new(dir);
    let matches = history.find_similar(url);
    if matches.is_empty() || options.assume_yes {
        return Ok(HistoryDecision::Proceed);
    }

    echo::print_warning(&format!("{} archived post(s) already match this URL:", matches.len()));
    for path in &matches {
        eprintln!("  {}", path.display().dimmed());
    }

    loop {
        match prompt("Generate anyway? [y]es / [r]euse latest / [n]o")?.to_lowercase().as_str() {
            "y" | "yes" => return Ok(HistoryDecision::Proceed),
            "r" | "reuse" => {
                let post = history
                    .find_by_content("", Some(url), DUPLICATE_THRESHOLD)?
                    .ok_or_else(|| anyhow::anyhow!("Could not read the archived post"))?;
                return Ok(HistoryDecision::Reuse(post));
            }
            "n" | "no" => anyhow::bail!("Generation cancelled"),
            other => echo::print_warning(&format!("Unrecognized choice '{}'", other)),
        }
    }
}

fn display_content(content: &GeneratedContent) {
    echo::print_section("Generated Content");
    if let Some(title) = &content.title {
        eprintln!("{} {}", "Title:".bold(), title.bright_white());
    }
    if let Some(body) = &content.body {
        eprintln!("\n{}", body);
    }
    if !content.links.is_empty() {
        eprintln!("\n{}", "Links:".bold());
        for link in &content.links {
            eprintln!("{}", link);
        }
    }
    if let Some(post) = &content.social_post {
        eprintln!("\n{} {}", "Bluesky:".bold(), post.bright_cyan());
    }
    eprintln!();
}

async fn run_publish(settings: &Settings, dir: Option<PathBuf>, handle: Option<String>) -> anyhow::Result<()> {
    let dir = dir.or_else(|| settings.output_dir.clone()).ok_or_else(|| {
        NewsdeskError::configuration("No archive directory configured")
            .with_suggestion("Pass --dir or set NEWSDESK_OUTPUT_DIR")
    })?;

    let history = PostHistory::new(&dir);
    let latest = history.recent_posts(1).into_iter().next().ok_or_else(|| {
        NewsdeskError::validation(format!("No archived social posts found in '{}'", dir.display()))
            .with_suggestion("Run `newsdesk generate` first to create one")
    })?;

    let post = fs::read_to_string(&latest)
        .with_context(|| format!("Failed to read {}", latest.display()))?
        .trim()
        .to_string();
    echo::print_info(&format!("Reviewing {}", latest.display()));

    let mut session = ReviewSession::new(post);
    while !session.is_terminal() {
        echo::print_section("Post Under Review");
        eprintln!("{}\n", session.content().bright_cyan());

        match prompt("Publish this post? [y]es / [e]dit / [n]o")?.to_lowercase().as_str() {
            "y" | "yes" => session.approve()?,
            "e" | "edit" => {
                session.request_edit()?;
                let edited = edit_in_editor(session.content())?;
                session.submit_edit(&edited)?;
            }
            "n" | "no" => session.abort()?,
            other => echo::print_warning(&format!("Unrecognized choice '{}'", other)),
        }
    }

    if session.state() == ReviewState::Aborted {
        echo::print_warning("Publishing aborted");
        return Ok(());
    }

    let handle = handle.or_else(|| settings.bluesky_handle.clone()).unwrap_or_default();
    let password = settings.bluesky_password.clone().unwrap_or_default();
    let publisher = match &settings.bluesky_service {
        Some(service) => BlueskyClient::with_service(handle, password, service)?,
        None => BlueskyClient::new(handle, password)?,
    };

    let (text, link) = split_post_link(session.content());
    let uri = publisher.publish(&text, link.as_deref()).await?;
    echo::print_success(&format!("Published: {}", uri.bright_white()));

    Ok(())
}

fn run_history(settings: &Settings, url: &str, dir: Option<PathBuf>) -> anyhow::Result<()> {
    let dir = dir.or_else(|| settings.output_dir.clone()).ok_or_else(|| {
        NewsdeskError::configuration("No archive directory configured")
            .with_suggestion("Pass --dir or set NEWSDESK_OUTPUT_DIR")
    })?;

    let matches = PostHistory::new(&dir).find_similar(url);
    if matches.is_empty() {
        echo::print_info("No archived posts match this URL");
        return Ok(());
    }

    echo::print_success(&format!("{} archived post(s) match:", matches.len()));
    for path in &matches {
        println!("{}", path.display());
    }
    Ok(())
}

/// Ask a yes/no question on stderr and read the answer from stdin.
fn confirm(question: &str) -> anyhow::Result<bool> {
    let answer = prompt(&format!("{} [y/N]", question))?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

fn prompt(question: &str) -> anyhow::Result<String> {
    eprint!("{} ", question.bold());
    io::stderr().flush().ok();

    let mut line = String::new();
    io::stdin().read_line(&mut line).context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}

/// Open the text in `$EDITOR` (falling back to vi) via a temporary file.
fn edit_in_editor(text: &str) -> anyhow::Result<String> {
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

    let file = tempfile::Builder::new()
        .prefix("newsdesk-post-")
        .suffix(".txt")
        .tempfile()
        .context("Failed to create temporary file")?;
    fs::write(file.path(), text).context("Failed to write temporary file")?;

    let status = Command::new(&editor)
        .arg(file.path())
        .status()
        .with_context(|| format!("Failed to launch editor '{}'", editor))?;
    if !status.success() {
        anyhow::bail!("Editor '{}' exited with {}", editor, status);
    }

    fs::read_to_string(file.path()).context("Failed to read edited file")
}
