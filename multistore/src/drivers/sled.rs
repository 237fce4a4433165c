// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Sled storage driver implementation
//!
//! Each database name maps to one sled database at `<root>/sled/<name>` and
//! each namespace to one sled tree. Values are stored as JSON bytes.
//!
//! Recognized driver options: `cacheCapacity` (bytes), `flushEveryMs`.

use super::names;
use super::traits::{DriverStore, StorageDriver, Visitor};
use crate::config::ResolvedConfig;
use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use log::debug;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Sled driver implementation
pub struct SledDriver {
    root: PathBuf,
    /// Databases opened by this driver; sled holds a file lock per path
    databases: Mutex<HashMap<PathBuf, sled::Db>>,
}

/// Sled tree wrapper that implements DriverStore
pub struct SledStore {
    tree: sled::Tree,
}

fn backend_error(e: sled::Error) -> StorageError {
    StorageError::driver(names::SLED, e)
}

impl SledDriver {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            databases: Mutex::new(HashMap::new()),
        }
    }

    fn open_db(&self, config: &ResolvedConfig) -> StorageResult<sled::Db> {
        let path = self.root.join(names::SLED).join(&config.name);
        let mut databases = self.databases.lock();
        if let Some(db) = databases.get(&path) {
            return Ok(db.clone());
        }

        let mut sled_config = sled::Config::new().path(&path);
        if let Some(capacity) = config.option("cacheCapacity").and_then(Value::as_u64) {
            sled_config = sled_config.cache_capacity(capacity);
        }
        if let Some(ms) = config.option("flushEveryMs").and_then(Value::as_u64) {
            sled_config = sled_config.flush_every_ms(Some(ms));
        }

        let db = sled_config.open().map_err(|e| match e {
            sled::Error::Io(io) => StorageError::DriverUnavailable(format!(
                "cannot open sled database at {:?}: {}",
                path, io
            )),
            other => backend_error(other),
        })?;
        debug!("Opened sled database at {:?}", path);
        databases.insert(path, db.clone());
        Ok(db)
    }
}

#[async_trait]
impl StorageDriver for SledDriver {
    fn name(&self) -> &str {
        names::SLED
    }

    async fn is_supported(&self) -> bool {
        super::root_is_writable(&self.root).await
    }

    async fn initialize(&self, config: &ResolvedConfig) -> StorageResult<Box<dyn DriverStore>> {
        let db = self.open_db(config)?;
        let tree = db.open_tree(&config.store_name).map_err(backend_error)?;
        Ok(Box::new(SledStore { tree }))
    }
}

fn decode_entry(key: &[u8], value: &[u8]) -> StorageResult<(String, Value)> {
    let key = String::from_utf8(key.to_vec())
        .map_err(|e| StorageError::Serialization(format!("non UTF-8 key: {}", e)))?;
    let value = serde_json::from_slice(value)?;
    Ok((key, value))
}

#[async_trait]
impl DriverStore for SledStore {
    async fn get_item(&self, key: &str) -> StorageResult<Option<Value>> {
        match self.tree.get(key.as_bytes()).map_err(backend_error)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn set_item(&self, key: &str, value: Value) -> StorageResult<Value> {
        let bytes = serde_json::to_vec(&value)?;
        self.tree
            .insert(key.as_bytes(), bytes)
            .map_err(backend_error)?;
        Ok(value)
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.tree.remove(key.as_bytes()).map_err(backend_error)?;
        Ok(())
    }

    async fn clear(&self) -> StorageResult<()> {
        self.tree.clear().map_err(backend_error)
    }

    async fn length(&self) -> StorageResult<usize> {
        Ok(self.tree.len())
    }

    async fn keys(&self) -> StorageResult<Vec<String>> {
        self.tree
            .iter()
            .keys()
            .map(|result| {
                let key = result.map_err(backend_error)?;
                String::from_utf8(key.to_vec())
                    .map_err(|e| StorageError::Serialization(format!("non UTF-8 key: {}", e)))
            })
            .collect()
    }

    async fn iterate(&self, visit: &mut Visitor<'_>) -> StorageResult<Option<Value>> {
        // sled iterators are lazy; stopping early never touches the rest of the tree
        for (index, result) in self.tree.iter().enumerate() {
            let (k, v) = result.map_err(backend_error)?;
            let (key, value) = decode_entry(&k, &v)?;
            if let Some(found) = visit(&value, &key, index) {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_sled_store_persists_across_driver_instances() {
        let temp_dir = TempDir::new().unwrap();
        let config = ResolvedConfig::default();

        {
            let driver = SledDriver::new(temp_dir.path());
            assert!(driver.is_supported().await);
            let store = driver.initialize(&config).await.unwrap();
            store
                .set_item("profile", json!({"name": "Max", "tags": ["a", "b"]}))
                .await
                .unwrap();
            store.set_item("count", json!(3)).await.unwrap();
        }
        assert!(temp_dir.path().join(names::SLED).join(&config.name).is_dir());

        let driver = SledDriver::new(temp_dir.path());
        let store = driver.initialize(&config).await.unwrap();
        assert_eq!(
            store.get_item("profile").await.unwrap(),
            Some(json!({"name": "Max", "tags": ["a", "b"]}))
        );
        assert_eq!(store.length().await.unwrap(), 2);
        assert_eq!(store.keys().await.unwrap(), vec!["count", "profile"]);
    }

    #[tokio::test]
    async fn test_sled_reuses_open_database() {
        let temp_dir = TempDir::new().unwrap();
        let driver = SledDriver::new(temp_dir.path());
        let config = ResolvedConfig::default();

        let a = driver.initialize(&config).await.unwrap();
        let b = driver.initialize(&config).await.unwrap();
        a.set_item("k", json!(true)).await.unwrap();
        assert_eq!(b.get_item("k").await.unwrap(), Some(json!(true)));
    }

    #[tokio::test]
    async fn test_sled_clear_and_iterate() {
        let temp_dir = TempDir::new().unwrap();
        let driver = SledDriver::new(temp_dir.path());
        let store = driver
            .initialize(&ResolvedConfig::default())
            .await
            .unwrap();

        store.set_item("a", json!(1)).await.unwrap();
        store.set_item("b", json!(2)).await.unwrap();

        let mut visited = Vec::new();
        let found = store
            .iterate(&mut |_value: &Value, key: &str, index: usize| {
                visited.push((key.to_string(), index));
                None
            })
            .await
            .unwrap();
        assert_eq!(found, None);
        assert_eq!(
            visited,
            vec![("a".to_string(), 0), ("b".to_string(), 1)]
        );

        store.clear().await.unwrap();
        assert_eq!(store.length().await.unwrap(), 0);
        assert!(store.keys().await.unwrap().is_empty());
    }
}
