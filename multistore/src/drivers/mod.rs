// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Storage drivers
//!
//! This module provides the trait-based capability contract for key/value storage
//! engines, the registry that maps driver identifiers to implementations, and the
//! built-in drivers.
//!
//! # Architecture
//!
//! ```text
//! Storage (facade)
//!     ↓
//! DriverRegistry (identifier → StorageDriver)
//!     ↓
//! DriverStore (bound instance: sled, filestore, jsonfile, memory, noop)
//! ```
//!
//! # Example Usage
//!
//! ```ignore
//! use multistore::drivers::{names, DriverRegistry};
//!
//! let registry = DriverRegistry::with_builtin_drivers("./data");
//! assert!(registry.is_known(names::SLED));
//! ```

// Core modules
pub mod registry;
pub mod traits;

// Driver implementations
pub mod filestore;
pub mod jsonfile;
pub mod memory;
pub mod noop;
#[cfg(feature = "sled-backend")]
pub mod sled;

// Public API re-exports
pub use filestore::FileStoreDriver;
pub use jsonfile::JsonFileDriver;
pub use memory::MemoryDriver;
pub use noop::{NoopDriver, UnavailableDriver};
pub use registry::DriverRegistry;
#[cfg(feature = "sled-backend")]
pub use self::sled::SledDriver;
pub use traits::{DriverStore, KeyedEncryption, StorageDriver, Visitor};

/// Well-known driver identifiers
pub mod names {
    /// Durable embedded database
    pub const SLED: &str = "sled";
    /// One document per key in a directory
    pub const FILE_STORE: &str = "filestore";
    /// Single JSON object file
    pub const JSON_FILE: &str = "jsonfile";
    /// Process-local memory
    pub const MEMORY: &str = "memory";
    /// Stores nothing
    pub const NOOP: &str = "noop";
    /// Reserved for an externally supplied encrypted driver
    pub const SECURE_STORAGE: &str = "secure";
}

/// Hex-encode a key into a file-system safe name
pub(crate) fn encode_key(key: &str) -> String {
    key.bytes().map(|b| format!("{:02x}", b)).collect()
}

/// Reverse of [`encode_key`]; `None` for names this crate did not write
pub(crate) fn decode_key(name: &str) -> Option<String> {
    if name.len() % 2 != 0 {
        return None;
    }
    let bytes = (0..name.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(name.get(i..i + 2)?, 16).ok())
        .collect::<Option<Vec<u8>>>()?;
    String::from_utf8(bytes).ok()
}

/// Whether `root` exists or can be created as a directory
pub(crate) async fn root_is_writable(root: &std::path::Path) -> bool {
    tokio::fs::create_dir_all(root).await.is_ok()
}
