// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Host integration
//!
//! Entry point for host applications that wire a [`Storage`] into their own
//! dependency container. When the host runs without persistent storage (server
//! rendering, headless jobs) the returned facade is bound to the noop driver;
//! callers see the same API either way.

use crate::config::StorageConfig;
use crate::drivers::{names, DriverRegistry, NoopDriver};
use crate::store::Storage;
use log::info;
use std::sync::Arc;

/// Environment variable consulted by [`Platform::detect`]
pub const PLATFORM_ENV: &str = "MULTISTORE_PLATFORM";

/// Execution context of the host application
///
/// # Modes
///
/// - **Client**: interactive application with local persistent storage.
/// - **Server**: no persistent storage; every store is a noop store.
///
/// # Examples
///
/// ```rust,ignore
/// use multistore::host::{provide_storage, Platform};
/// use multistore::DriverRegistry;
///
/// let storage = provide_storage(None, Platform::detect(), DriverRegistry::global());
/// storage.create().await?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    #[default]
    Client,
    Server,
}

impl Platform {
    /// Read the platform from `MULTISTORE_PLATFORM`
    ///
    /// `server` (any case) selects [`Platform::Server`]; anything else,
    /// including an unset variable, selects [`Platform::Client`].
    pub fn detect() -> Self {
        match std::env::var(PLATFORM_ENV) {
            Ok(value) if value.trim().eq_ignore_ascii_case("server") => Platform::Server,
            _ => Platform::Client,
        }
    }

    pub fn is_server(self) -> bool {
        self == Platform::Server
    }
}

/// Build the facade a host application should hand out
///
/// The facade is returned uninitialized; the host still awaits `create()`.
pub fn provide_storage(
    config: Option<StorageConfig>,
    platform: Platform,
    registry: Arc<DriverRegistry>,
) -> Storage {
    let mut config = config.unwrap_or_default();

    if platform.is_server() {
        if !registry.is_known(names::NOOP) {
            registry.register(Arc::new(NoopDriver::new()));
        }
        info!("Server platform detected, storage will not persist");
        config.driver_order = Some(vec![names::NOOP.to_string()]);
    }

    Storage::new(config, registry)
}
