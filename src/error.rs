//! Unified error type for bucketkv.
//!
//! Every operation on [`Store`](crate::Store) returns [`Result`]. Errors coming
//! from the storage engine or the codec are carried unchanged (their `Display`
//! is forwarded as-is); only a handful of kinds originate in this crate.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::codec::CodecError;
use crate::kv::ConfigError;

/// Errors returned by store operations.
///
/// # Example
///
/// ```ignore
/// use bucketkv::{Error, Store};
///
/// let store = Store::open("data.db", "users")?;
/// match store.fetch::<String>("alice") {
///     Ok(name) => println!("{name}"),
///     Err(Error::KeyNotFound(_)) => println!("no such user"),
///     Err(e) => return Err(e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Another handle holds the backing file and did not release it in time.
    #[error("timed out after {waited:?} waiting for the lock on {}", path.display())]
    LockTimeout { path: PathBuf, waited: Duration },

    /// The key is not present in the bucket.
    #[error("key not found: {0:?}")]
    KeyNotFound(String),

    /// `put` was handed an absent value (`None` or `()`).
    #[error("bad value: refusing to store an absent value")]
    BadValue,

    /// Bucket names must be non-empty.
    #[error("bucket name must not be empty")]
    EmptyBucketName,

    /// The codec could not encode the value.
    #[error(transparent)]
    Encode(CodecError),

    /// The codec could not decode the stored bytes into the destination type.
    #[error(transparent)]
    Decode(CodecError),

    #[error(transparent)]
    Database(#[from] redb::DatabaseError),

    #[error(transparent)]
    Transaction(#[from] redb::TransactionError),

    #[error(transparent)]
    Table(#[from] redb::TableError),

    #[error(transparent)]
    Storage(#[from] redb::StorageError),

    #[error(transparent)]
    Commit(#[from] redb::CommitError),

    /// I/O error opening the backing file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Options file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn key_not_found(key: &str) -> Self {
        Self::KeyNotFound(key.to_string())
    }

    /// Returns `true` if the key was absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound(_))
    }

    /// Returns `true` if the backing file was held by someone else.
    pub fn is_lock_timeout(&self) -> bool {
        matches!(self, Self::LockTimeout { .. })
    }

    /// Returns `true` if `put` rejected an absent value.
    pub fn is_bad_value(&self) -> bool {
        matches!(self, Self::BadValue)
    }

    /// Returns `true` if this is an encode or decode failure.
    pub fn is_codec(&self) -> bool {
        matches!(self, Self::Encode(_) | Self::Decode(_))
    }

    /// Returns `true` if the storage engine reported the failure.
    pub fn is_engine(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::Transaction(_)
                | Self::Table(_)
                | Self::Storage(_)
                | Self::Commit(_)
        )
    }
}
