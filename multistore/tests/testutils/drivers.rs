//! Instrumented drivers for integration tests

use async_trait::async_trait;
use multistore::drivers::MemoryDriver;
use multistore::{
    DriverStore, KeyedEncryption, ResolvedConfig, StorageDriver, StorageResult,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Memory-backed driver that counts `initialize` calls
pub struct CountingDriver {
    name: String,
    supported: bool,
    delay: Duration,
    inner: MemoryDriver,
    initializations: AtomicUsize,
}

impl CountingDriver {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            supported: true,
            delay: Duration::ZERO,
            inner: MemoryDriver::new(),
            initializations: AtomicUsize::new(0),
        }
    }

    pub fn unsupported(name: &str) -> Self {
        Self {
            supported: false,
            ..Self::new(name)
        }
    }

    /// Make `initialize` take `delay` before returning
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn initializations(&self) -> usize {
        self.initializations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageDriver for CountingDriver {
    fn name(&self) -> &str {
        &self.name
    }

    async fn is_supported(&self) -> bool {
        self.supported
    }

    async fn initialize(&self, config: &ResolvedConfig) -> StorageResult<Box<dyn DriverStore>> {
        self.initializations.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.initialize(config).await
    }
}

/// Memory-backed driver that records encryption keys
pub struct FakeSecureDriver {
    inner: MemoryDriver,
    keys: Mutex<Vec<String>>,
}

impl FakeSecureDriver {
    pub fn new() -> Self {
        Self {
            inner: MemoryDriver::new(),
            keys: Mutex::new(Vec::new()),
        }
    }

    /// Keys received so far, oldest first
    pub fn received_keys(&self) -> Vec<String> {
        self.keys.lock().clone()
    }
}

impl KeyedEncryption for FakeSecureDriver {
    fn set_encryption_key(&self, key: &str) -> StorageResult<()> {
        self.keys.lock().push(key.to_string());
        Ok(())
    }
}

#[async_trait]
impl StorageDriver for FakeSecureDriver {
    fn name(&self) -> &str {
        multistore::names::SECURE_STORAGE
    }

    async fn is_supported(&self) -> bool {
        true
    }

    async fn initialize(&self, config: &ResolvedConfig) -> StorageResult<Box<dyn DriverStore>> {
        self.inner.initialize(config).await
    }

    fn as_keyed_encryption(&self) -> Option<&dyn KeyedEncryption> {
        Some(self)
    }
}
