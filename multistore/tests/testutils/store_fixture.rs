//! Test fixture for multistore integration tests
//!
//! Each fixture owns a temporary root directory and its own registry, so tests
//! never observe each other's drivers or data.

use multistore::{DriverRegistry, Storage, StorageConfig};
use std::path::Path;
use std::sync::Arc;

pub struct StoreFixture {
    registry: Arc<DriverRegistry>,
    name: String,
    _temp_dir: tempfile::TempDir,
}

impl StoreFixture {
    /// Create a fixture with all built-in drivers rooted in a temp dir
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let registry = Arc::new(DriverRegistry::with_builtin_drivers(temp_dir.path()));

        StoreFixture {
            registry,
            // Unique database name so shared memory namespaces never collide
            name: format!("test_db_{}", fastrand::u64(..)),
            _temp_dir: temp_dir,
        }
    }

    pub fn root(&self) -> &Path {
        self._temp_dir.path()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> Arc<DriverRegistry> {
        self.registry.clone()
    }

    /// Facade with the given driver order, not yet created
    pub fn storage(&self, order: &[&str]) -> Storage {
        let config = StorageConfig::new()
            .with_name(self.name.clone())
            .with_driver_order(order.iter().copied());
        Storage::new(config, self.registry())
    }

    /// Facade with the given driver order, already created
    pub async fn created(&self, order: &[&str]) -> Storage {
        let storage = self.storage(order);
        storage.create().await.expect("Failed to create storage");
        storage
    }
}
