//! Tactics LLM Bridge - Entry Point
//!
//! Invoked by the game once per enemy turn. Standard output carries exactly
//! one line, a JSON array of actions (`[]` on any failure); everything else
//! goes to standard error. The process always exits with status 0.

use clap::error::ErrorKind;
use clap::Parser;
use std::io;
use tactics_llm_bridge::core::config::{BridgeConfig, CliArgs};
use tactics_llm_bridge::llm::parser::EMPTY_ACTIONS;
use tactics_llm_bridge::turn;
use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics on stderr only; stdout belongs to the game
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tactics_llm_bridge=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Tactics LLM bridge started");

    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            tracing::error!("Invalid arguments: {}", e);
            turn::write_line(&mut io::stdout().lock(), EMPTY_ACTIONS);
            return;
        }
    };

    let output = turn::run_guarded(|| match BridgeConfig::load(&args) {
        Ok(config) => turn::run(&config),
        Err(e) => {
            tracing::error!(error = %e, "Could not load configuration");
            EMPTY_ACTIONS.to_string()
        }
    });

    turn::write_line(&mut io::stdout().lock(), &output);
}
