// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Degenerate drivers
//!
//! - [`NoopDriver`] is always supported and stores nothing. It stands in for
//!   persistent storage where none exists, e.g. server-side rendering.
//! - [`UnavailableDriver`] occupies an identifier whose real backend is absent
//!   and is never selected.

use super::names;
use super::traits::{DriverStore, StorageDriver, Visitor};
use crate::config::ResolvedConfig;
use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use serde_json::Value;

/// Driver whose store accepts everything and keeps nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDriver;

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStore;

impl NoopDriver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StorageDriver for NoopDriver {
    fn name(&self) -> &str {
        names::NOOP
    }

    async fn is_supported(&self) -> bool {
        true
    }

    async fn initialize(&self, _config: &ResolvedConfig) -> StorageResult<Box<dyn DriverStore>> {
        Ok(Box::new(NoopStore))
    }
}

#[async_trait]
impl DriverStore for NoopStore {
    async fn get_item(&self, _key: &str) -> StorageResult<Option<Value>> {
        Ok(None)
    }

    async fn set_item(&self, _key: &str, value: Value) -> StorageResult<Value> {
        Ok(value)
    }

    async fn remove_item(&self, _key: &str) -> StorageResult<()> {
        Ok(())
    }

    async fn clear(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn length(&self) -> StorageResult<usize> {
        Ok(0)
    }

    async fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(Vec::new())
    }

    async fn iterate(&self, _visit: &mut Visitor<'_>) -> StorageResult<Option<Value>> {
        Ok(None)
    }
}

/// Placeholder registered under an identifier whose backend is not present
#[derive(Debug, Clone)]
pub struct UnavailableDriver {
    name: String,
}

impl UnavailableDriver {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl StorageDriver for UnavailableDriver {
    fn name(&self) -> &str {
        &self.name
    }

    async fn is_supported(&self) -> bool {
        false
    }

    async fn initialize(&self, _config: &ResolvedConfig) -> StorageResult<Box<dyn DriverStore>> {
        Err(StorageError::DriverUnavailable(format!(
            "{} is not available",
            self.name
        )))
    }
}
