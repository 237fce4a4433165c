// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Directory-backed document driver
//!
//! Layout: `<root>/filestore/<name>/<store_name>/<hex(key)>.json`, one JSON
//! document per key. Hex names longer than 200 characters are split into
//! nested `<chunk>.d` directories so long keys stay below file-name limits.
//!
//! Writes go to a uniquely named temporary file first and are renamed into
//! place; concurrent writers of one key resolve as last rename wins.

use super::traits::{DriverStore, StorageDriver, Visitor};
use super::{decode_key, encode_key, names};
use crate::config::ResolvedConfig;
use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Maximum hex characters per path segment (even, so bytes never split)
const SEGMENT_LEN: usize = 200;
const DOC_SUFFIX: &str = ".json";
const DIR_SUFFIX: &str = ".d";
const TMP_SUFFIX: &str = ".tmp";

/// Filestore driver implementation
pub struct FileStoreDriver {
    root: PathBuf,
}

/// Store bound to one namespace directory
pub struct FileStore {
    dir: PathBuf,
}

impl FileStoreDriver {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl StorageDriver for FileStoreDriver {
    fn name(&self) -> &str {
        names::FILE_STORE
    }

    async fn is_supported(&self) -> bool {
        super::root_is_writable(&self.root).await
    }

    async fn initialize(&self, config: &ResolvedConfig) -> StorageResult<Box<dyn DriverStore>> {
        let dir = self
            .root
            .join(names::FILE_STORE)
            .join(&config.name)
            .join(&config.store_name);
        fs::create_dir_all(&dir).await.map_err(|e| {
            StorageError::DriverUnavailable(format!("cannot create {:?}: {}", dir, e))
        })?;
        debug!("Filestore namespace at {:?}", dir);
        Ok(Box::new(FileStore { dir }))
    }
}

impl FileStore {
    fn key_path(&self, key: &str) -> PathBuf {
        let encoded = encode_key(key);
        let mut path = self.dir.clone();
        let mut rest = encoded.as_str();
        while rest.len() > SEGMENT_LEN {
            let (head, tail) = rest.split_at(SEGMENT_LEN);
            path.push(format!("{}{}", head, DIR_SUFFIX));
            rest = tail;
        }
        path.push(format!("{}{}", rest, DOC_SUFFIX));
        path
    }

    async fn read_value(&self, path: &Path) -> StorageResult<Option<Value>> {
        match fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_document(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let parent = path.parent().unwrap_or(self.dir.as_path());
        let leaf = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        let tmp = parent.join(format!("{}.{:016x}{}", leaf, fastrand::u64(..), TMP_SUFFIX));

        if parent != self.dir {
            fs::create_dir_all(parent).await?;
        }
        // A concurrent remove may prune the shard directory before the write
        if let Err(e) = fs::write(&tmp, bytes).await {
            if e.kind() != ErrorKind::NotFound {
                return Err(e);
            }
            fs::create_dir_all(parent).await?;
            fs::write(&tmp, bytes).await?;
        }

        if let Err(e) = fs::rename(&tmp, path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e);
        }
        Ok(())
    }

    /// Remove empty shard directories between `path` and the namespace root
    async fn prune_empty_parents(&self, path: &Path) {
        let mut current = path.parent();
        while let Some(dir) = current {
            if dir == self.dir || !dir.starts_with(&self.dir) {
                break;
            }
            if fs::remove_dir(dir).await.is_err() {
                break;
            }
            current = dir.parent();
        }
    }

    /// Every document this driver wrote, as `(key, path)` sorted by key
    ///
    /// Foreign files, in-flight temporary files and unknown directories are
    /// ignored.
    async fn entries(&self) -> StorageResult<Vec<(String, PathBuf)>> {
        let mut found = Vec::new();
        let mut pending = vec![(self.dir.clone(), String::new())];

        while let Some((dir, prefix)) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound && dir != self.dir => continue,
                Err(e) => return Err(e.into()),
            };
            while let Some(entry) = entries.next_entry().await? {
                let file_name = entry.file_name();
                let Some(name) = file_name.to_str() else {
                    continue;
                };
                let file_type = match entry.file_type().await {
                    Ok(file_type) => file_type,
                    Err(e) if e.kind() == ErrorKind::NotFound => continue,
                    Err(e) => return Err(e.into()),
                };

                if file_type.is_dir() {
                    if let Some(chunk) = name.strip_suffix(DIR_SUFFIX) {
                        if chunk.len() == SEGMENT_LEN {
                            pending.push((entry.path(), format!("{}{}", prefix, chunk)));
                        }
                    }
                } else if file_type.is_file() {
                    let Some(chunk) = name.strip_suffix(DOC_SUFFIX) else {
                        continue;
                    };
                    if let Some(key) = decode_key(&format!("{}{}", prefix, chunk)) {
                        found.push((key, entry.path()));
                    }
                }
            }
        }

        found.sort();
        Ok(found)
    }
}

#[async_trait]
impl DriverStore for FileStore {
    async fn get_item(&self, key: &str) -> StorageResult<Option<Value>> {
        self.read_value(&self.key_path(key)).await
    }

    async fn set_item(&self, key: &str, value: Value) -> StorageResult<Value> {
        let bytes = serde_json::to_vec(&value)?;
        self.write_document(&self.key_path(key), &bytes).await?;
        Ok(value)
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        let path = self.key_path(key);
        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.prune_empty_parents(&path).await;
        Ok(())
    }

    async fn clear(&self) -> StorageResult<()> {
        for (_, path) in self.entries().await? {
            match fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            self.prune_empty_parents(&path).await;
        }
        Ok(())
    }

    async fn length(&self) -> StorageResult<usize> {
        Ok(self.entries().await?.len())
    }

    async fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.entries().await?.into_iter().map(|(key, _)| key).collect())
    }

    async fn iterate(&self, visit: &mut Visitor<'_>) -> StorageResult<Option<Value>> {
        // Values are read one at a time, only as far as the visitor goes
        let mut index = 0;
        for (key, path) in self.entries().await? {
            let Some(value) = self.read_value(&path).await? else {
                continue;
            };
            if let Some(found) = visit(&value, &key, index) {
                return Ok(Some(found));
            }
            index += 1;
        }
        Ok(None)
    }
}
