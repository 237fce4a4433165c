// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Multistore - one async key/value API over pluggable storage drivers
//!
//! Multistore picks the first usable storage engine from a priority list at
//! runtime and exposes it behind a single facade.
//!
//! # Features
//!
//! - **Driver Selection**: first registered *and* supported driver in the order wins
//! - **Custom Drivers**: register new engines without touching call sites
//! - **Exactly-once Initialization**: concurrent `create()` calls share one attempt
//! - **Built-in Engines**: sled, per-key files, single JSON file, memory, noop
//! - **Secure Drivers**: optional keyed-encryption capability
//!
//! # Usage
//!
//! ```ignore
//! use multistore::{DriverRegistry, Storage, StorageConfig};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(DriverRegistry::with_builtin_drivers("./data"));
//! let storage = Storage::new(
//!     StorageConfig::new().with_driver_order(["secure", "sled", "jsonfile"]),
//!     registry,
//! );
//! storage.create().await?;
//! println!("using {:?}", storage.driver());
//!
//! storage.set("name", "Max".into()).await?;
//! ```

pub mod config;
pub mod drivers;
pub mod error;
pub mod host;
pub mod store;

pub use config::{resolve, ResolvedConfig, StorageConfig};
pub use drivers::{names, DriverRegistry, DriverStore, KeyedEncryption, StorageDriver, Visitor};
pub use error::{StorageError, StorageResult};
pub use host::{provide_storage, Platform};
pub use store::Storage;

/// Multistore version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Multistore crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
