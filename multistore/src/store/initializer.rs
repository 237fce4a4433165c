// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Store initializer: driver selection
//!
//! Walks the resolved driver order left to right and binds the first driver
//! that is registered, reports itself supported and initializes successfully.

use crate::config::ResolvedConfig;
use crate::drivers::{DriverRegistry, DriverStore, StorageDriver};
use crate::error::{StorageError, StorageResult};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::sync::Arc;

/// A store bound to the driver that won selection
///
/// The driver identifier is fixed for the life of the value.
pub struct BoundStore {
    driver_name: String,
    driver: Arc<dyn StorageDriver>,
    store: Box<dyn DriverStore>,
}

impl BoundStore {
    pub fn driver_name(&self) -> &str {
        &self.driver_name
    }

    pub fn driver(&self) -> &Arc<dyn StorageDriver> {
        &self.driver
    }

    pub fn store(&self) -> &dyn DriverStore {
        self.store.as_ref()
    }
}

impl std::fmt::Debug for BoundStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundStore")
            .field("driver_name", &self.driver_name)
            .finish_non_exhaustive()
    }
}

/// Select a driver from `config.driver_order` and open the store
///
/// Unknown and unsupported identifiers are skipped, as are drivers whose
/// `initialize` reports [`StorageError::DriverUnavailable`]. Any other
/// initialization error is returned unchanged. Repeated identifiers are only
/// considered at their first position.
pub async fn open(config: &ResolvedConfig, registry: &DriverRegistry) -> StorageResult<BoundStore> {
    let mut seen = HashSet::new();
    let mut tried = Vec::new();

    for name in &config.driver_order {
        if !seen.insert(name.as_str()) {
            continue;
        }
        tried.push(name.clone());

        let Some(driver) = registry.lookup(name) else {
            debug!("Skipping driver '{}': not registered", name);
            continue;
        };
        if !driver.is_supported().await {
            debug!("Skipping driver '{}': not supported here", name);
            continue;
        }

        match driver.initialize(config).await {
            Ok(store) => {
                info!(
                    "Opened store '{}/{}' with driver '{}'",
                    config.name, config.store_name, name
                );
                return Ok(BoundStore {
                    driver_name: name.clone(),
                    driver,
                    store,
                });
            }
            Err(StorageError::DriverUnavailable(reason)) => {
                warn!("Driver '{}' unavailable: {}", name, reason);
            }
            Err(e) => return Err(e),
        }
    }

    Err(StorageError::NoDriverAvailable { tried })
}
