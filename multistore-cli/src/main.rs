// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Multistore CLI entry point

use clap::Parser;
use colored::Colorize;

mod cli;
use cli::{Cli, Commands, StoreOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments first to get log level
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else if let Some(level) = cli.log_level {
        level.to_level_filter()
    } else {
        // Default to Warn (can still be overridden by RUST_LOG env var)
        log::LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    let options = StoreOptions {
        root: cli.root,
        name: cli.name,
        store_name: cli.store_name,
        drivers: cli.drivers,
        config: cli.config,
    };

    let result = match cli.command {
        Commands::Version => {
            println!("{} {}", "Multistore".bold().green(), multistore::VERSION);
            println!("Key/value storage over pluggable drivers");
            Ok(())
        }

        Commands::Get { key } => cli::handle_get(options, key).await,
        Commands::Set { key, value } => cli::handle_set(options, key, value).await,
        Commands::Remove { key } => cli::handle_remove(options, key).await,
        Commands::Keys => cli::handle_keys(options).await,
        Commands::Length => cli::handle_length(options).await,
        Commands::Clear { yes } => cli::handle_clear(options, yes).await,
        Commands::Dump { format } => cli::handle_dump(options, format).await,
        Commands::Drivers => cli::handle_drivers(options).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
    Ok(())
}
