// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for multistore
//!
//! Opens a store with the requested driver order and runs one operation
//! against it.

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{Cli, Commands};
pub use handlers::{
    handle_clear, handle_drivers, handle_dump, handle_get, handle_keys, handle_length,
    handle_remove, handle_set, StoreOptions,
};
