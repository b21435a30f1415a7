//! Convenient re-exports for common usage patterns.
//!
//! ```ignore
//! use bucketkv::prelude::*;
//!
//! let store = Store::open("app.db", "settings")?;
//! store.put("theme", "dark")?;
//! ```

// Unified error handling
pub use crate::error::{Error, Result};

// Store and configuration
pub use crate::kv::{Options, Store};

// Codecs
pub use crate::codec::{CborCodec, Codec, CodecError};
#[cfg(feature = "json")]
pub use crate::codec::JsonCodec;
