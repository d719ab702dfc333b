// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dunlin - an accounts-receivable collections engine.
//!
//! This is the binary entry point for the Dunlin service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

use dunlin_config::DunlinConfig;
use dunlin_core::DunlinError;

mod run;
mod serve;

/// Dunlin - an accounts-receivable collections engine.
#[derive(Parser, Debug)]
#[command(name = "dunlin", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP trigger gateway.
    Serve,
    /// Execute one collections pass and print the summary JSON.
    Run {
        /// Reference date for the pass as YYYY-MM-DD; defaults to today (UTC).
        #[arg(long)]
        as_of: Option<String>,
    },
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match dunlin_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            dunlin_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Run { as_of }) => run::run_once(config, as_of).await,
        Some(Commands::Config) => print_config(&config),
        None => {
            println!("dunlin: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Render the resolved config as TOML with secrets redacted.
fn print_config(config: &DunlinConfig) -> Result<(), DunlinError> {
    let mut redacted = config.clone();
    if redacted.gateway.bearer_token.is_some() {
        redacted.gateway.bearer_token = Some("[redacted]".to_string());
    }
    let rendered =
        toml::to_string_pretty(&redacted).map_err(|e| DunlinError::Internal(e.to_string()))?;
    print!("{rendered}");
    Ok(())
}
