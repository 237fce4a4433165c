// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for the storage facade and its drivers
//!
//! The facade only adds its own guard-clause errors (`NotInitialized`,
//! `NoDriverAvailable`, `SecureStorageUnavailable`). Everything a driver
//! returns is passed back to the caller as-is.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    /// A data operation was issued before the store was created
    #[error("Database not created. Must call create() first")]
    NotInitialized,

    /// Every identifier in the driver order was unknown or unsupported
    #[error("No available storage driver (tried: {})", tried.join(", "))]
    NoDriverAvailable { tried: Vec<String> },

    /// `set_encryption_key` was called without a secure driver
    #[error("Secure storage driver not available. Encryption support not available")]
    SecureStorageUnavailable,

    /// The driver's backend cannot be used in this environment
    #[error("Driver unavailable: {0}")]
    DriverUnavailable(String),

    /// Failure raised by a bound driver
    #[error("Storage driver '{driver}' error: {message}")]
    Driver { driver: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StorageError {
    /// Build a driver-level error tagged with the driver identifier
    pub fn driver(driver: impl Into<String>, message: impl ToString) -> Self {
        StorageError::Driver {
            driver: driver.into(),
            message: message.to_string(),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type used throughout the crate
pub type StorageResult<T> = Result<T, StorageError>;
