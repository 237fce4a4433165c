// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory storage driver implementation
//!
//! Data lives for the lifetime of the driver instance. Stores opened with the
//! same database name and namespace share one map, so two facades bound to
//! the same driver see each other's writes.

use super::names;
use super::traits::{DriverStore, StorageDriver, Visitor};
use crate::config::ResolvedConfig;
use crate::error::StorageResult;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

type Namespace = Arc<RwLock<BTreeMap<String, Value>>>;

/// In-memory storage driver
#[derive(Default)]
pub struct MemoryDriver {
    namespaces: RwLock<HashMap<(String, String), Namespace>>,
}

/// In-memory store bound to one namespace
pub struct MemoryStore {
    data: Namespace,
}

impl MemoryDriver {
    /// Create a new memory storage driver
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of namespaces opened so far, as `(name, store_name)`
    pub fn namespaces(&self) -> Vec<(String, String)> {
        self.namespaces.read().keys().cloned().collect()
    }
}

#[async_trait]
impl StorageDriver for MemoryDriver {
    fn name(&self) -> &str {
        names::MEMORY
    }

    async fn is_supported(&self) -> bool {
        true
    }

    async fn initialize(&self, config: &ResolvedConfig) -> StorageResult<Box<dyn DriverStore>> {
        let key = (config.name.clone(), config.store_name.clone());
        let data = self
            .namespaces
            .write()
            .entry(key)
            .or_insert_with(|| Arc::new(RwLock::new(BTreeMap::new())))
            .clone();
        Ok(Box::new(MemoryStore { data }))
    }
}

#[async_trait]
impl DriverStore for MemoryStore {
    async fn get_item(&self, key: &str) -> StorageResult<Option<Value>> {
        Ok(self.data.read().get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: Value) -> StorageResult<Value> {
        self.data.write().insert(key.to_string(), value.clone());
        Ok(value)
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.data.write().remove(key);
        Ok(())
    }

    async fn clear(&self) -> StorageResult<()> {
        self.data.write().clear();
        Ok(())
    }

    async fn length(&self) -> StorageResult<usize> {
        Ok(self.data.read().len())
    }

    async fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.data.read().keys().cloned().collect())
    }

    async fn iterate(&self, visit: &mut Visitor<'_>) -> StorageResult<Option<Value>> {
        // Snapshot so the visitor never runs under the lock
        let items: Vec<(String, Value)> = self
            .data
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        for (index, (key, value)) in items.iter().enumerate() {
            if let Some(found) = visit(value, key, index) {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }
}
