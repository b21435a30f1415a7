//! Typed key-value storage over a single-file transactional B+tree.
//!
//! A [`Store`] wraps one [redb](https://docs.rs/redb) database file and one
//! named bucket inside it. Values of any `serde` type are encoded with a
//! [`Codec`] and written in their own transaction; lookups are exact-key only.
//!
//! # Quick Start
//!
//! ```ignore
//! use bucketkv::prelude::*;
//! use std::collections::HashMap;
//!
//! let store = Store::open("app.db", "settings")?;
//!
//! let mut limits = HashMap::new();
//! limits.insert("uploads".to_string(), 10u32);
//! store.put("limits", &limits)?;
//!
//! let back: HashMap<String, u32> = store.fetch("limits")?;
//! assert!(store.contains("limits")?);
//!
//! store.delete("limits")?;
//! store.close()?;
//! ```
//!
//! # Modules
//!
//! - [`kv`] - The store, its options, and the TOML options loader
//! - [`codec`] - Value codecs (CBOR by default, JSON with the `json` feature)
//!
//! # Feature Flags
//!
//! - `json` - Enable [`JsonCodec`] (enabled by default)
//! - `logging` - Enable library-level tracing (consumers provide their own subscriber)
//! - `cli` - Enable the `bucketkv` command-line binary
//! - `full` - Enable all features

pub mod codec;
mod logging;
pub mod kv;
pub mod prelude;

mod error;

// Re-export the unified error type
pub use error::{Error, Result};

pub use codec::{BoxError, CborCodec, Codec, CodecError};
#[cfg(feature = "json")]
pub use codec::JsonCodec;

pub use kv::{ConfigError, Options, Store};

// Re-export the engine so callers of `Store::database` can name its types.
pub use redb;
