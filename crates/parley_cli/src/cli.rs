//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Preview the prompt a chat participant would send to its model
#[derive(Parser)]
#[command(name = "parley", about, version, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output (debug logs on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format: text (human-readable) or json (machine-readable)
    #[arg(short, long, global = true, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored terminal output for humans
    #[default]
    Text,
    /// Structured JSON for machine consumption
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build the prompt request for a scenario file
    Preview {
        /// Scenario JSON (context, history, personas, lookups, captions)
        scenario: PathBuf,
        /// Pipeline settings in TOML; overrides the scenario's own `config`
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List the personas a scenario defines
    Personas {
        /// Scenario JSON
        scenario: PathBuf,
    },
    /// Print the encoded conversation key
    Key {
        /// Platform name (e.g. aiocqhttp, telegram)
        platform: String,
        /// Group id, or the peer's user id for private chats
        chat_id: String,
        /// Private chat instead of group
        #[arg(long)]
        private: bool,
    },
}
