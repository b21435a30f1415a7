//! Common test utilities and fixtures.
//!
//! This module provides shared value types and a temporary-database wrapper
//! so each test gets its own backing file.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use bucketkv::{Options, Store};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

// =============================================================================
// Value Types
// =============================================================================

/// Bucket used by most tests.
pub const BUCKET: &str = "widgets";

/// Struct with nested collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub name: String,
    pub numbers: Vec<i64>,
    pub tags: BTreeMap<String, u32>,
    pub discontinued: bool,
}

impl Inventory {
    pub fn sample() -> Self {
        let mut tags = BTreeMap::new();
        tags.insert("harry".to_string(), 1);
        tags.insert("emma".to_string(), 2);
        Self {
            name: "gizmo".to_string(),
            numbers: vec![-7, 0, 42, i64::MAX],
            tags,
            discontinued: false,
        }
    }
}

/// Enum with unit, newtype and struct variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Started,
    Progress(f64),
    Finished { code: i32, message: String },
}

// =============================================================================
// Test Database
// =============================================================================

/// A temporary directory holding one database file.
pub struct TestDb {
    pub path: PathBuf,
    _temp_dir: TempDir, // Keep alive for test duration
}

impl TestDb {
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("store.db");
        Ok(Self {
            path,
            _temp_dir: temp_dir,
        })
    }

    /// Open the default bucket with default options.
    pub fn open(&self) -> bucketkv::Result<Store> {
        Store::open(&self.path, BUCKET)
    }

    /// Open `bucket` with default options.
    pub fn open_bucket(&self, bucket: &str) -> bucketkv::Result<Store> {
        Store::open(&self.path, bucket)
    }
}

/// Options with a short lock timeout, for contention tests.
pub fn fast_timeout() -> Options {
    Options::new()
        .lock_timeout(Duration::from_millis(50))
        .lock_poll_interval(Duration::from_millis(5))
}
