// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Storage configuration and resolution
//!
//! Callers hand over a partial [`StorageConfig`]; [`resolve`] merges it over a
//! fresh copy of the built-in defaults to produce a [`ResolvedConfig`]. The
//! merge is shallow: every field the caller sets replaces the default field
//! as a whole.

use crate::drivers::names;
use crate::error::{StorageError, StorageResult};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Default database name
pub const DEFAULT_NAME: &str = "_multistore";

/// Default namespace inside the database
pub const DEFAULT_STORE_NAME: &str = "_multistorekv";

/// Default alias of the encryption key used by secure drivers
pub const DEFAULT_DB_KEY: &str = "_multistorekey";

/// Default driver priority order, first supported wins
pub fn default_driver_order() -> Vec<String> {
    vec![
        names::SLED.to_string(),
        names::FILE_STORE.to_string(),
        names::JSON_FILE.to_string(),
    ]
}

/// Caller-supplied configuration, every field optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    /// Size hint in bytes, interpreted by the driver
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_order: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_key: Option<String>,

    /// Unrecognized keys, forwarded to the bound driver untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StorageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_store_name(mut self, store_name: impl Into<String>) -> Self {
        self.store_name = Some(store_name.into());
        self
    }

    pub fn with_driver_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.driver_order = Some(order.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_db_key(mut self, db_key: impl Into<String>) -> Self {
        self.db_key = Some(db_key.into());
        self
    }

    /// Set an opaque driver option
    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Parse a configuration from a JSON object
    pub fn from_json_str(json: &str) -> StorageResult<Self> {
        serde_json::from_str(json).map_err(|e| StorageError::Config(e.to_string()))
    }

    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            StorageError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&contents)
    }
}

/// Fully resolved configuration; immutable once handed to a facade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub name: String,
    pub store_name: String,
    pub version: Option<u32>,
    pub size: Option<u64>,
    pub description: Option<String>,
    pub driver_order: Vec<String>,
    pub db_key: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            store_name: DEFAULT_STORE_NAME.to_string(),
            version: None,
            size: None,
            description: None,
            driver_order: default_driver_order(),
            db_key: DEFAULT_DB_KEY.to_string(),
            extra: Map::new(),
        }
    }
}

impl ResolvedConfig {
    /// Look up an opaque driver option
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Merge `user` over a fresh copy of the defaults
pub fn resolve(user: &StorageConfig) -> ResolvedConfig {
    let mut resolved = ResolvedConfig::default();

    if let Some(name) = &user.name {
        resolved.name = name.clone();
    }
    if let Some(store_name) = &user.store_name {
        resolved.store_name = store_name.clone();
    }
    if user.version.is_some() {
        resolved.version = user.version;
    }
    if user.size.is_some() {
        resolved.size = user.size;
    }
    if let Some(description) = &user.description {
        resolved.description = Some(description.clone());
    }
    match &user.driver_order {
        Some(order) if order.is_empty() => {
            warn!("Ignoring empty driver order, keeping defaults");
        }
        Some(order) => resolved.driver_order = order.clone(),
        None => {}
    }
    if let Some(db_key) = &user.db_key {
        resolved.db_key = db_key.clone();
    }
    for (key, value) in &user.extra {
        resolved.extra.insert(key.clone(), value.clone());
    }

    resolved
}
