// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Store initialization and the public facade

pub mod facade;
pub mod initializer;

pub use facade::Storage;
pub use initializer::{open, BoundStore};
