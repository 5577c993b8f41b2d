//! CLI entry point for parley.

mod cli;
mod commands;
mod output;
mod scenario;

use clap::Parser;
use parley_observability::ObservabilityConfig;

use crate::cli::Cli;

/// Load `.env` from the working directory or the nearest parent that has one.
fn load_dotenv() {
    let Ok(mut dir) = std::env::current_dir() else {
        return;
    };
    loop {
        let env_file = dir.join(".env");
        if env_file.exists() {
            let _ = dotenvy::from_path(&env_file);
            return;
        }
        if !dir.pop() {
            return;
        }
    }
}

#[tokio::main]
async fn main() {
    load_dotenv();
    let cli = Cli::parse();
    output::init(cli.output);

    let mut observability = ObservabilityConfig::from_env();
    if cli.verbose {
        observability = observability.with_log_level("debug");
    } else if observability.log_level.is_none() {
        observability = observability.with_log_level("warn");
    }
    if let Err(e) = parley_observability::init(observability) {
        output::warning(&e.to_string());
    }

    let result = commands::handle(cli).await;
    parley_observability::shutdown();

    if let Err(e) = result {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
