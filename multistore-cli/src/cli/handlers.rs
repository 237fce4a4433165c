// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command handlers for multistore

use colored::Colorize;
use multistore::{resolve, DriverRegistry, Storage, StorageConfig};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

use super::commands::OutputFormat;
use super::output::{DriverRow, EntryFormatter};

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Store selection flags shared by every command
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub root: PathBuf,
    pub name: Option<String>,
    pub store_name: Option<String>,
    pub drivers: Vec<String>,
    pub config: Option<PathBuf>,
}

impl StoreOptions {
    /// Configuration file contents with command-line flags applied on top
    pub fn storage_config(&self) -> multistore::StorageResult<StorageConfig> {
        let mut config = match &self.config {
            Some(path) => StorageConfig::from_file(path)?,
            None => StorageConfig::default(),
        };
        if let Some(name) = &self.name {
            config = config.with_name(name.clone());
        }
        if let Some(store_name) = &self.store_name {
            config = config.with_store_name(store_name.clone());
        }
        if !self.drivers.is_empty() {
            config = config.with_driver_order(self.drivers.iter().cloned());
        }
        Ok(config)
    }

    pub fn registry(&self) -> Arc<DriverRegistry> {
        Arc::new(DriverRegistry::with_builtin_drivers(&self.root))
    }

    /// Build the facade and bind a driver
    pub async fn open(&self) -> Result<Storage, Box<dyn std::error::Error>> {
        let storage = Storage::new(self.storage_config()?, self.registry());
        storage.create().await?;
        log::info!("Using driver '{}'", storage.driver().unwrap_or("?"));
        Ok(storage)
    }
}

/// Interpret a command-line value as JSON, or as a plain string when it is not
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Handle the get command
pub async fn handle_get(options: StoreOptions, key: String) -> CliResult {
    let storage = options.open().await?;
    match storage.get(&key).await? {
        Some(value) => println!("{}", EntryFormatter::value_to_string(&value)),
        None => println!("{}", format!("Key '{}' not found", key).yellow()),
    }
    Ok(())
}

/// Handle the set command
pub async fn handle_set(options: StoreOptions, key: String, value: String) -> CliResult {
    let storage = options.open().await?;
    let stored = storage.set(&key, parse_value(&value)).await?;
    println!(
        "{} {} = {}",
        "Stored".green(),
        key.bold(),
        EntryFormatter::value_to_string(&stored)
    );
    Ok(())
}

/// Handle the remove command
pub async fn handle_remove(options: StoreOptions, key: String) -> CliResult {
    let storage = options.open().await?;
    storage.remove(&key).await?;
    println!("{} {}", "Removed".green(), key.bold());
    Ok(())
}

/// Handle the keys command
pub async fn handle_keys(options: StoreOptions) -> CliResult {
    let storage = options.open().await?;
    let keys = storage.keys().await?;
    if keys.is_empty() {
        println!("{}", "Store is empty".yellow());
    }
    for key in keys {
        println!("{}", key);
    }
    Ok(())
}

/// Handle the length command
pub async fn handle_length(options: StoreOptions) -> CliResult {
    let storage = options.open().await?;
    println!("{}", storage.length().await?);
    Ok(())
}

/// Handle the clear command
pub async fn handle_clear(options: StoreOptions, yes: bool) -> CliResult {
    if !yes {
        println!(
            "{}",
            "Clearing removes every key in the store and cannot be undone.".yellow()
        );
        println!("Re-run with --yes to confirm.");
        return Err("Clear not confirmed".into());
    }

    let storage = options.open().await?;
    let removed = storage.length().await?;
    storage.clear().await?;
    println!("{}", format!("Cleared {} keys", removed).green());
    Ok(())
}

/// Handle the dump command
pub async fn handle_dump(options: StoreOptions, format: OutputFormat) -> CliResult {
    let storage = options.open().await?;

    let mut entries = Vec::new();
    storage
        .for_each(|value, key, _| {
            entries.push((key.to_string(), value.clone()));
            None
        })
        .await?;

    print!(
        "{}",
        EntryFormatter::format_entries(storage.driver().unwrap_or("?"), &entries, format)
    );
    Ok(())
}

/// Handle the drivers command
///
/// Does not bind a store; only probes each registered driver.
pub async fn handle_drivers(options: StoreOptions) -> CliResult {
    let registry = options.registry();
    let order = resolve(&options.storage_config()?).driver_order;

    let mut rows = Vec::new();
    for name in registry.names() {
        let supported = match registry.lookup(&name) {
            Some(driver) => driver.is_supported().await,
            None => false,
        };
        rows.push(DriverRow {
            priority: order.iter().position(|n| *n == name).map(|p| p + 1),
            name,
            supported,
        });
    }
    rows.sort_by_key(|row| (row.priority.is_none(), row.priority, row.name.clone()));

    print!("{}", EntryFormatter::format_drivers(&rows));
    Ok(())
}
