// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Storage facade
//!
//! [`Storage`] is the object applications hold. It resolves its configuration
//! once at construction, binds a driver exactly once in [`Storage::create`] and
//! forwards every data operation to the bound store.
//!
//! # Examples
//!
//! ```ignore
//! use multistore::{DriverRegistry, Storage, StorageConfig};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(DriverRegistry::with_builtin_drivers("./data"));
//! let storage = Storage::new(StorageConfig::default(), registry);
//! storage.create().await?;
//!
//! storage.set("name", "Max".into()).await?;
//! let name = storage.get("name").await?;
//! ```

use super::initializer::{self, BoundStore};
use crate::config::{resolve, ResolvedConfig, StorageConfig};
use crate::drivers::{DriverRegistry, StorageDriver};
use crate::error::{StorageError, StorageResult};
use log::debug;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Key/value storage over whichever driver wins selection
pub struct Storage {
    config: ResolvedConfig,
    registry: Arc<DriverRegistry>,
    /// Set exactly once by `create`; concurrent callers share the attempt
    bound: OnceCell<BoundStore>,
    /// Last defined driver that offers keyed encryption
    secure_driver: RwLock<Option<Arc<dyn StorageDriver>>>,
}

impl Storage {
    /// Create an uninitialized facade
    ///
    /// `config` is merged over the defaults here; the caller keeps ownership
    /// of nothing and later changes to the registry are still visible to
    /// `create`.
    pub fn new(config: StorageConfig, registry: Arc<DriverRegistry>) -> Self {
        Self::with_resolved(resolve(&config), registry)
    }

    /// Create a facade from an already resolved configuration
    pub fn with_resolved(config: ResolvedConfig, registry: Arc<DriverRegistry>) -> Self {
        Self {
            config,
            registry,
            bound: OnceCell::new(),
            secure_driver: RwLock::new(None),
        }
    }

    /// Select a driver and open the store
    ///
    /// Runs selection at most once. Calls made while an attempt is in flight
    /// wait for it; calls after success return immediately. A failed attempt
    /// leaves the facade uninitialized so `create` may be retried.
    pub async fn create(&self) -> StorageResult<&Self> {
        self.bound
            .get_or_try_init(|| initializer::open(&self.config, &self.registry))
            .await?;
        Ok(self)
    }

    /// Whether `create` has completed successfully
    pub fn is_ready(&self) -> bool {
        self.bound.initialized()
    }

    /// Identifier of the bound driver, `None` until `create` succeeds
    pub fn driver(&self) -> Option<&str> {
        self.bound.get().map(BoundStore::driver_name)
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<DriverRegistry> {
        &self.registry
    }

    /// Register a custom driver
    ///
    /// Must happen before `create` for the driver to take part in selection.
    pub fn define_driver(&self, driver: Arc<dyn StorageDriver>) {
        if driver.as_keyed_encryption().is_some() {
            debug!("Remembering secure driver '{}'", driver.name());
            *self.secure_driver.write() = Some(driver.clone());
        }
        self.registry.register(driver);
    }

    fn bound(&self) -> StorageResult<&BoundStore> {
        self.bound.get().ok_or(StorageError::NotInitialized)
    }

    /// Get the value stored under `key`, `None` if absent
    pub async fn get(&self, key: &str) -> StorageResult<Option<Value>> {
        self.bound()?.store().get_item(key).await
    }

    /// Get and deserialize the value stored under `key`
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.get(key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Store `value` under `key`, replacing any previous value
    pub async fn set(&self, key: &str, value: Value) -> StorageResult<Value> {
        self.bound()?.store().set_item(key, value).await
    }

    /// Serialize and store `value` under `key`
    pub async fn set_as<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<Value> {
        let store = self.bound()?.store();
        store.set_item(key, serde_json::to_value(value)?).await
    }

    /// Remove `key`; removing an absent key succeeds
    pub async fn remove(&self, key: &str) -> StorageResult<()> {
        self.bound()?.store().remove_item(key).await
    }

    /// Remove every key in the namespace. Irreversible.
    pub async fn clear(&self) -> StorageResult<()> {
        self.bound()?.store().clear().await
    }

    /// Number of keys stored
    pub async fn length(&self) -> StorageResult<usize> {
        self.bound()?.store().length().await
    }

    /// All keys, in driver-defined order
    pub async fn keys(&self) -> StorageResult<Vec<String>> {
        self.bound()?.store().keys().await
    }

    /// Visit each `(value, key, iteration_number)` until `visit` returns `Some`
    ///
    /// The first `Some` becomes the result; `None` means every entry was
    /// visited. Mutating the store from elsewhere during the walk has
    /// driver-defined effects.
    pub async fn for_each<F>(&self, mut visit: F) -> StorageResult<Option<Value>>
    where
        F: FnMut(&Value, &str, usize) -> Option<Value> + Send,
    {
        self.bound()?.store().iterate(&mut visit).await
    }

    /// Hand an encryption key to the secure driver
    ///
    /// Uses the bound driver when it supports keyed encryption, otherwise the
    /// most recently defined secure driver.
    pub fn set_encryption_key(&self, key: &str) -> StorageResult<()> {
        if let Some(bound) = self.bound.get() {
            if let Some(encryption) = bound.driver().as_keyed_encryption() {
                return encryption.set_encryption_key(key);
            }
        }

        let secure = self.secure_driver.read().clone();
        match secure.as_deref().and_then(|d| d.as_keyed_encryption()) {
            Some(encryption) => encryption.set_encryption_key(key),
            None => Err(StorageError::SecureStorageUnavailable),
        }
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("name", &self.config.name)
            .field("store_name", &self.config.store_name)
            .field("driver", &self.driver())
            .finish()
    }
}
