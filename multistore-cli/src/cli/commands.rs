// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Command-line argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Inspect and edit multistore stores from the shell
#[derive(Parser, Debug)]
#[command(name = "multistore", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Root directory for file-based drivers
    #[arg(long, global = true, default_value = "./multistore-data")]
    pub root: PathBuf,

    /// Database name
    #[arg(long, global = true)]
    pub name: Option<String>,

    /// Store (namespace) name inside the database
    #[arg(long, global = true)]
    pub store_name: Option<String>,

    /// Driver to try, in priority order (repeatable)
    #[arg(long = "driver", global = true)]
    pub drivers: Vec<String>,

    /// JSON configuration file, overridden by the flags above
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<log::Level>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the value stored under a key
    Get { key: String },

    /// Store a value; VALUE is parsed as JSON and falls back to a plain string
    Set { key: String, value: String },

    /// Remove a key
    Remove { key: String },

    /// List all keys
    Keys,

    /// Print the number of keys
    Length,

    /// Remove every key in the store
    Clear {
        /// Confirm the irreversible clear
        #[arg(long)]
        yes: bool,
    },

    /// Print every entry
    Dump {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// List registered drivers and whether they are usable here
    Drivers,

    /// Show version information
    Version,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}
