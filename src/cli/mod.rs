//! CLI module for the study companion
//!
//! Provides command-line interface parsing for the `study-companion` binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod chat;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ADHD Study Companion
///
/// A chat companion that either encourages or explains, picking the right
/// persona for each message.
#[derive(Parser, Debug)]
#[command(
    name = "study-companion",
    version,
    about = "ADHD Study Companion - motivation and teaching agents behind one chat",
    long_about = "A chat companion for students with ADHD. Each message is routed either to a\n\
                  Motivation agent (encouragement) or a Teaching agent (simple explanations).\n\n\
                  Run without arguments to start the HTTP server, or use 'chat' for a terminal session.",
    after_help = "EXAMPLES:\n    \
                  study-companion                         # Start the server (requires companion.toml)\n    \
                  study-companion chat                    # Chat in the terminal\n    \
                  study-companion chat --agent teaching   # Always use the Teaching agent\n    \
                  study-companion config --validate       # Check the configuration"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "companion.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Chat with the companion in the terminal
    ///
    /// Type /agent <auto|motivation|teaching> to switch agents, /clear to
    /// forget the conversation and /quit to leave.
    Chat {
        /// Agent to talk to: auto, motivation or teaching
        #[arg(short, long, default_value = "auto")]
        agent: String,

        /// Name used for rate limiting
        #[arg(short, long, default_value = "student")]
        user: String,
    },

    /// Show configuration information
    Config {
        /// Validate the configuration file
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
