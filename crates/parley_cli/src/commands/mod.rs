//! Command dispatch.

pub mod key;
pub mod personas;
pub mod preview;

use crate::cli::{Cli, Command};
use anyhow::Result;

pub async fn handle(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Preview { scenario, config } => preview::handle(&scenario, config.as_deref()).await,
        Command::Personas { scenario } => personas::handle(&scenario),
        Command::Key {
            platform,
            chat_id,
            private,
        } => key::handle(&platform, &chat_id, private),
    }
}
