// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Driver registry implementation
//!
//! The DriverRegistry maps driver identifiers to [`StorageDriver`] implementations.
//! Facades take the registry as an explicit `Arc` so tests can use an isolated
//! registry; applications that want one process-wide registry can share
//! [`DriverRegistry::global`].

use super::memory::MemoryDriver;
use super::noop::NoopDriver;
use super::traits::StorageDriver;
use super::{FileStoreDriver, JsonFileDriver};
use log::{debug, info};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Process-wide registry, created on first access
static GLOBAL_REGISTRY: Lazy<Arc<DriverRegistry>> = Lazy::new(|| {
    let registry = DriverRegistry::new();
    registry.register(Arc::new(MemoryDriver::new()));
    registry.register(Arc::new(NoopDriver::new()));
    Arc::new(registry)
});

/// Registry of storage drivers keyed by identifier
///
/// Entries are never removed. Registering an identifier a second time
/// replaces the earlier implementation.
#[derive(Default)]
pub struct DriverRegistry {
    drivers: RwLock<HashMap<String, Arc<dyn StorageDriver>>>,
}

impl DriverRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in driver rooted at `root`
    ///
    /// File-backed drivers keep their data below `root`; the memory and noop
    /// drivers ignore it.
    pub fn with_builtin_drivers<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        let registry = Self::new();

        #[cfg(feature = "sled-backend")]
        registry.register(Arc::new(super::SledDriver::new(root)));
        registry.register(Arc::new(FileStoreDriver::new(root)));
        registry.register(Arc::new(JsonFileDriver::new(root)));
        registry.register(Arc::new(MemoryDriver::new()));
        registry.register(Arc::new(NoopDriver::new()));

        info!(
            "Registered {} built-in drivers rooted at {:?}",
            registry.len(),
            root
        );
        registry
    }

    /// The process-wide registry
    pub fn global() -> Arc<DriverRegistry> {
        GLOBAL_REGISTRY.clone()
    }

    /// Register a driver under its own identifier
    ///
    /// The driver is eligible for selection as soon as this returns.
    pub fn register(&self, driver: Arc<dyn StorageDriver>) {
        let name = driver.name().to_string();
        if self.drivers.write().insert(name.clone(), driver).is_some() {
            debug!("Replaced storage driver: {}", name);
        } else {
            debug!("Registered storage driver: {}", name);
        }
    }

    /// Get a driver by identifier
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn StorageDriver>> {
        self.drivers.read().get(name).cloned()
    }

    /// Check if a driver is registered
    pub fn is_known(&self, name: &str) -> bool {
        self.drivers.read().contains_key(name)
    }

    /// All registered identifiers, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.drivers.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered drivers
    pub fn len(&self) -> usize {
        self.drivers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.read().is_empty()
    }
}
