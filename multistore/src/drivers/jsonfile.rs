// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Single-file JSON driver
//!
//! The whole namespace lives in `<root>/jsonfile/<name>/<store_name>.json` as
//! one JSON object. The document is loaded on first initialize, served from
//! memory and rewritten on every mutation. Stores opened on the same file
//! through one driver share the loaded document. Suitable for small
//! preference-style stores.
//!
//! Recognized driver options: `pretty` (bool).

use super::names;
use super::traits::{DriverStore, StorageDriver, Visitor};
use crate::config::ResolvedConfig;
use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

/// Loaded document; the lock is held across the file write so mutations
/// persist in order
type Document = Arc<Mutex<BTreeMap<String, Value>>>;

/// JSON file driver implementation
pub struct JsonFileDriver {
    root: PathBuf,
    documents: parking_lot::Mutex<HashMap<PathBuf, Document>>,
}

/// Store backed by one JSON file
pub struct JsonFileStore {
    path: PathBuf,
    pretty: bool,
    entries: Document,
}

impl JsonFileDriver {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            documents: parking_lot::Mutex::new(HashMap::new()),
        }
    }

    async fn load(path: &Path) -> StorageResult<BTreeMap<String, Value>> {
        let entries = match fs::read(path).await {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Loaded {} entries from {:?}", entries.len(), path);
        Ok(entries)
    }
}

#[async_trait]
impl StorageDriver for JsonFileDriver {
    fn name(&self) -> &str {
        names::JSON_FILE
    }

    async fn is_supported(&self) -> bool {
        super::root_is_writable(&self.root).await
    }

    async fn initialize(&self, config: &ResolvedConfig) -> StorageResult<Box<dyn DriverStore>> {
        let dir = self.root.join(names::JSON_FILE).join(&config.name);
        fs::create_dir_all(&dir).await.map_err(|e| {
            StorageError::DriverUnavailable(format!("cannot create {:?}: {}", dir, e))
        })?;
        let path = dir.join(format!("{}.json", config.store_name));

        let cached = self.documents.lock().get(&path).cloned();
        let entries = match cached {
            Some(document) => document,
            None => {
                let loaded = Self::load(&path).await?;
                // A concurrent initialize may have loaded the file first
                self.documents
                    .lock()
                    .entry(path.clone())
                    .or_insert_with(|| Arc::new(Mutex::new(loaded)))
                    .clone()
            }
        };

        let pretty = config
            .option("pretty")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        Ok(Box::new(JsonFileStore {
            path,
            pretty,
            entries,
        }))
    }
}

impl JsonFileStore {
    async fn persist(&self, entries: &BTreeMap<String, Value>) -> StorageResult<()> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(entries)?
        } else {
            serde_json::to_vec(entries)?
        };
        let tmp = self
            .path
            .with_extension(format!("json.{:016x}.tmp", fastrand::u64(..)));
        fs::write(&tmp, bytes).await?;
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl DriverStore for JsonFileStore {
    async fn get_item(&self, key: &str) -> StorageResult<Option<Value>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: Value) -> StorageResult<Value> {
        let mut entries = self.entries.lock().await;
        let previous = entries.insert(key.to_string(), value.clone());
        if let Err(e) = self.persist(&entries).await {
            // Keep memory consistent with what is on disk
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(value)
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().await;
        let Some(previous) = entries.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.persist(&entries).await {
            entries.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }

    async fn clear(&self) -> StorageResult<()> {
        let mut entries = self.entries.lock().await;
        self.persist(&BTreeMap::new()).await?;
        entries.clear();
        Ok(())
    }

    async fn length(&self) -> StorageResult<usize> {
        Ok(self.entries.lock().await.len())
    }

    async fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.entries.lock().await.keys().cloned().collect())
    }

    async fn iterate(&self, visit: &mut Visitor<'_>) -> StorageResult<Option<Value>> {
        let snapshot = self.entries.lock().await.clone();
        for (index, (key, value)) in snapshot.iter().enumerate() {
            if let Some(found) = visit(value, key, index) {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }
}
