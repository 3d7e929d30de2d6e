//! # psdocs CLI Application
//!
//! This module implements the command-line interface for the psdocs library,
//! exposing its search and answering capabilities over documentation pages
//! on disk through a set of subcommands.
//!
//! ## Key Components
//!
//! - CLI argument parsing with clap
//! - Subcommands for the different operations:
//!   - `search`: rank a query against a page's indexed fragments
//!   - `fragments`: list the fragments a page indexes into
//!   - `filter`: apply the card filter to an overview page
//!   - `ask`: answer one question through the chat flow
//!   - `chat`: interactive TUI-based chat interface
//!   - `config`: inspect and update persisted settings
//!
//! Both JSON and text output formats are supported where results are
//! printed; settings live under a configurable directory and follow the
//! defaults-on-malformed-data rule of the settings store.

mod telemetry;
mod tui;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use psdocs::cards::{self, Visibility};
use psdocs::chat::ChatSession;
use psdocs::kb::KnowledgeBase;
use psdocs::llm::LlmBackend;
use psdocs::page::PageIndex;
use psdocs::search::{QueryOutcome, run_query};
use psdocs::settings::{SettingsStore, ThemePreference};
use tracing::instrument;

#[derive(Parser)]
#[command(author, version, about = "Search and FAQ answering for PowerShell driver class documentation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search a documentation page
    Search(SearchArgs),

    /// List the fragments a page indexes into
    Fragments(FragmentsArgs),

    /// Apply the card filter to an overview page
    Filter(FilterArgs),

    /// Answer a single question
    Ask(AskArgs),

    /// Start an interactive chat session
    Chat(ChatArgs),

    /// Inspect or update persisted settings
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Search query
    #[arg(required = true)]
    query: String,

    /// Path to the HTML page to search
    #[arg(short, long)]
    page: PathBuf,

    /// Output format (text|json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,
}

#[derive(Args, Debug)]
struct FragmentsArgs {
    /// Path to the HTML page to index
    #[arg(short, long)]
    page: PathBuf,

    /// Output format (text|json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Filter query (blank resets every card to shown)
    #[arg(default_value = "")]
    query: String,

    /// Path to the HTML overview page
    #[arg(short, long)]
    page: PathBuf,

    /// Output format (text|json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,
}

#[derive(Args, Debug)]
struct AskArgs {
    /// The question to answer
    #[arg(required = true)]
    question: String,

    /// Settings directory
    #[arg(long, default_value = ".psdocs")]
    settings: PathBuf,

    /// Skip the external model even if it is enabled
    #[arg(long)]
    offline: bool,
}

#[derive(Args, Debug)]
struct ChatArgs {
    /// Settings directory
    #[arg(long, default_value = ".psdocs")]
    settings: PathBuf,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Settings directory
    #[arg(long, default_value = ".psdocs")]
    settings: PathBuf,

    /// Enable or disable the external model (true|false)
    #[arg(long)]
    enabled: Option<bool>,

    /// Model server base URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Model name
    #[arg(long)]
    model: Option<String>,

    /// Wire shape (generate|chat-completion|completion)
    #[arg(long, value_parser = ["generate", "chat-completion", "completion"])]
    backend: Option<String>,

    /// Request deadline in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Fall back to the knowledge base on failure (true|false)
    #[arg(long)]
    fallback: Option<bool>,

    /// Theme preference (light|dark)
    #[arg(long, value_parser = ["light", "dark"])]
    theme: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // The chat TUI owns the terminal and logs to a file instead
    if !matches!(cli.command, Some(Commands::Chat(_))) {
        telemetry::init_tracing_subscriber();
    }

    // Execute the appropriate command
    match cli.command {
        Some(Commands::Search(args)) => search_command(args).await?,
        Some(Commands::Fragments(args)) => fragments_command(args).await?,
        Some(Commands::Filter(args)) => filter_command(args).await?,
        Some(Commands::Ask(args)) => ask_command(args).await?,
        Some(Commands::Chat(args)) => chat_command(args).await?,
        Some(Commands::Config(args)) => config_command(args)?,
        None => {
            // If no command is provided, show help
            let _ = Cli::parse_from(["--help"]);
        }
    }

    Ok(())
}

#[instrument]
async fn search_command(args: SearchArgs) -> anyhow::Result<()> {
    let html = tokio::fs::read_to_string(&args.page).await?;
    let index = PageIndex::from_html(&html);

    match run_query(&index, &args.query) {
        QueryOutcome::NotSearched => match args.format.as_str() {
            "json" => println!(
                "{}",
                serde_json::json!({ "searched": false, "results": [] })
            ),
            _ => println!("Query too short; nothing was searched."),
        },
        QueryOutcome::Results(results) => match args.format.as_str() {
            "json" => {
                let payload = serde_json::json!({ "searched": true, "results": results });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            }
            _ => {
                if results.is_empty() {
                    println!("No results for \"{}\"", args.query);
                } else {
                    println!("Found {} results", results.len());
                    for (i, result) in results.iter().enumerate() {
                        println!(
                            "{}. [{}] {} (score {})",
                            i + 1,
                            result.fragment.kind.label(),
                            result.highlighted_text,
                            result.relevance,
                        );
                    }
                }
            }
        },
    }

    Ok(())
}

#[instrument]
async fn fragments_command(args: FragmentsArgs) -> anyhow::Result<()> {
    let html = tokio::fs::read_to_string(&args.page).await?;
    let index = PageIndex::from_html(&html);

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(index.fragments())?),
        _ => {
            println!("Indexed {} fragments", index.len());
            for fragment in index.fragments() {
                println!(
                    "{:>4}  [{}] {}",
                    fragment.ordinal,
                    fragment.kind.label(),
                    fragment.original_text,
                );
            }
        }
    }

    Ok(())
}

#[instrument]
async fn filter_command(args: FilterArgs) -> anyhow::Result<()> {
    let html = tokio::fs::read_to_string(&args.page).await?;
    let mut cards = cards::collect_cards(&html);
    let shown = cards::apply(&mut cards, &args.query);

    match args.format.as_str() {
        "json" => {
            let payload = serde_json::json!({ "shown": shown, "cards": cards });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        _ => {
            for card in &cards {
                let marker = match card.visibility {
                    Visibility::Shown => "+",
                    Visibility::Dimmed => "-",
                };
                let title = card.visible_text.lines().next().unwrap_or_default().trim();
                println!("{marker} {title}");
            }
            if shown == 0 {
                println!("No cards match \"{}\"", args.query);
            } else {
                println!("{shown} of {} cards shown", cards.len());
            }
        }
    }

    Ok(())
}

#[instrument]
async fn ask_command(args: AskArgs) -> anyhow::Result<()> {
    let store = SettingsStore::new(&args.settings);
    let mut config = store.load_llm_config();
    if args.offline {
        config.enabled = false;
    }

    let session = ChatSession::new(KnowledgeBase::new(), config)?;
    let answer = session.answer(&args.question).await;
    println!("{answer}");

    Ok(())
}

async fn chat_command(args: ChatArgs) -> anyhow::Result<()> {
    // Setup file-based logging for the TUI
    tui::logging::setup_logging(Some(args.settings.clone()))?;

    let store = SettingsStore::new(&args.settings);
    let session = ChatSession::new(KnowledgeBase::new(), store.load_llm_config())?;

    // Run the TUI application
    tui::run(session).await
}

#[instrument]
fn config_command(args: ConfigArgs) -> anyhow::Result<()> {
    let store = SettingsStore::new(&args.settings);

    if let Some(theme) = &args.theme {
        let theme = match theme.as_str() {
            "dark" => ThemePreference::Dark,
            _ => ThemePreference::Light,
        };
        store.save_theme(theme)?;
    }

    let mut config = store.load_llm_config();
    let mut changed = false;

    if let Some(enabled) = args.enabled {
        config.enabled = enabled;
        changed = true;
    }
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
        changed = true;
    }
    if let Some(model) = args.model {
        config.model = model;
        changed = true;
    }
    if let Some(backend) = args.backend.as_deref() {
        config.backend = match backend {
            "chat-completion" => LlmBackend::ChatCompletion,
            "completion" => LlmBackend::Completion,
            _ => LlmBackend::Generate,
        };
        changed = true;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.timeout_ms = timeout_ms;
        changed = true;
    }
    if let Some(fallback) = args.fallback {
        config.fallback_on_failure = fallback;
        changed = true;
    }

    if changed {
        store.save_llm_config(&config)?;
    }

    println!("Settings directory: {}", store.dir().display());
    println!("Theme: {}", store.load_theme());
    println!("{}", serde_json::to_string_pretty(&store.load_llm_config())?);

    Ok(())
}
