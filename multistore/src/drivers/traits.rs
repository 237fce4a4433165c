// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Storage driver traits
//!
//! This module defines the capability contract every storage engine must satisfy.
//! A [`StorageDriver`] is the registered, named engine; calling
//! [`StorageDriver::initialize`] binds it to a resolved configuration and yields a
//! [`DriverStore`] that serves the actual key/value operations.

use crate::config::ResolvedConfig;
use crate::error::StorageResult;
use async_trait::async_trait;
use serde_json::Value;

/// Visitor used by [`DriverStore::iterate`]
///
/// Called with `(value, key, iteration_number)`. Returning `Some` stops the
/// traversal and becomes the overall result.
pub type Visitor<'a> = dyn FnMut(&Value, &str, usize) -> Option<Value> + Send + 'a;

/// A named storage engine that can be probed and bound to a configuration
#[async_trait]
pub trait StorageDriver: Send + Sync {
    /// Unique identifier used in driver order lists
    fn name(&self) -> &str;

    /// Whether the runtime environment can host this driver
    async fn is_supported(&self) -> bool;

    /// Open the store described by `config`
    ///
    /// Returns [`StorageError::DriverUnavailable`](crate::StorageError::DriverUnavailable)
    /// when the backend turns out to be unusable, so selection can move on.
    async fn initialize(&self, config: &ResolvedConfig) -> StorageResult<Box<dyn DriverStore>>;

    /// Secondary capability of secure drivers
    fn as_keyed_encryption(&self) -> Option<&dyn KeyedEncryption> {
        None
    }
}

/// Optional capability: drivers that encrypt their data at rest
pub trait KeyedEncryption: Send + Sync {
    fn set_encryption_key(&self, key: &str) -> StorageResult<()>;
}

/// A store bound to one driver and one namespace
#[async_trait]
pub trait DriverStore: Send + Sync {
    /// Get a value by key, `None` when absent
    async fn get_item(&self, key: &str) -> StorageResult<Option<Value>>;

    /// Store `value` under `key`, returning the stored value
    async fn set_item(&self, key: &str, value: Value) -> StorageResult<Value>;

    /// Remove a key; absent keys are not an error
    async fn remove_item(&self, key: &str) -> StorageResult<()>;

    /// Remove every key in the namespace
    async fn clear(&self) -> StorageResult<()>;

    /// Number of keys currently stored
    async fn length(&self) -> StorageResult<usize>;

    /// All current keys
    async fn keys(&self) -> StorageResult<Vec<String>>;

    /// Visit every entry until the visitor returns `Some`
    ///
    /// The default walks `keys()` and fetches each value. Keys removed during
    /// the walk are skipped without consuming an iteration number.
    async fn iterate(&self, visit: &mut Visitor<'_>) -> StorageResult<Option<Value>> {
        let mut index = 0;
        for key in self.keys().await? {
            let Some(value) = self.get_item(&key).await? else {
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
