//! CLI definitions for roci-search.

use clap::{Parser, Subcommand};

/// Search-grounded Gemini assistant
#[derive(Parser, Debug)]
#[command(name = "roci-search", version, about = "Search-grounded Gemini assistant")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive chat session
    Chat(ChatArgs),
    /// Ask a single question and print the answer
    Ask(AskArgs),
}

/// Arguments for the `chat` subcommand.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Gemini model (overrides config and ROCI_SEARCH_MODEL)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Show the session id suffix next to the model name
    #[arg(long)]
    pub show_session: bool,

    /// Append frames instead of clearing the screen
    #[arg(long)]
    pub no_clear: bool,
}

/// Arguments for the `ask` subcommand.
#[derive(Parser, Debug)]
pub struct AskArgs {
    /// Gemini model (overrides config and ROCI_SEARCH_MODEL)
    #[arg(short, long)]
    pub model: Option<String>,

    /// The question
    pub prompt: String,
}
