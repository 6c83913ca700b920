// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lagoon - backend for a chat web application.
//!
//! This is the binary entry point for the Lagoon server.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod check;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lagoon_config::LagoonConfig;

/// Lagoon - model catalogs, image generation and quotas for a chat app.
#[derive(Parser, Debug)]
#[command(name = "lagoon", version, about, long_about = None)]
struct Cli {
    /// Load this TOML file instead of the standard search path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server.
    Serve,
    /// Validate configuration and report adapter readiness.
    CheckConfig,
}

fn load_config(path: Option<&std::path::Path>) -> LagoonConfig {
    let loaded = match path {
        Some(path) => lagoon_config::load_and_validate_path(path),
        None => lagoon_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            lagoon_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::CheckConfig) => check::run_check_config(&config).await,
        None => {
            println!("lagoon: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
