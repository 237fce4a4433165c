//! Test utilities for multistore integration tests
//!
//! - StoreFixture: isolated root directory with every built-in driver registered
//! - CountingDriver: memory-backed driver that counts initializations
//! - FakeSecureDriver: memory-backed driver with keyed encryption

#![allow(dead_code)]

pub mod drivers;
pub mod store_fixture;

pub use drivers::{CountingDriver, FakeSecureDriver};
pub use store_fixture::StoreFixture;
