//! Value codecs.
//!
//! A [`Codec`] turns a typed value into the bytes stored under a key and back.
//! Both shipped codecs are self-describing, so structs, maps, sequences and
//! primitives round-trip without a schema, and decoding into an incompatible
//! type fails instead of producing a truncated value.
//!
//! - [`CborCodec`] - CBOR via `serde_cbor` (the default)
//! - [`JsonCodec`] - JSON via `serde_json` (requires `json` feature)

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Boxed error for codecs implemented outside this crate.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced by a [`Codec`].
#[derive(Error, Debug)]
pub enum CodecError {
    #[error(transparent)]
    Cbor(#[from] serde_cbor::Error),

    #[cfg(feature = "json")]
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Error from a user-supplied codec.
    #[error("{0}")]
    Other(BoxError),
}

impl CodecError {
    /// Wrap an arbitrary error from a custom codec.
    pub fn other(err: impl Into<BoxError>) -> Self {
        Self::Other(err.into())
    }
}

/// Serializes values to bytes and back.
///
/// Implement this to plug a different encoding into
/// [`Store::open_with`](crate::Store::open_with).
pub trait Codec {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Encode a value.
    fn encode<T>(&self, value: &T) -> Result<Vec<u8>, CodecError>
    where
        T: Serialize + ?Sized;

    /// Decode bytes previously produced by [`encode`](Self::encode).
    fn decode<T>(&self, bytes: &[u8]) -> Result<T, CodecError>
    where
        T: DeserializeOwned;
}

/// CBOR codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CborCodec;

impl Codec for CborCodec {
    fn name(&self) -> &'static str {
        "cbor"
    }

    fn encode<T>(&self, value: &T) -> Result<Vec<u8>, CodecError>
    where
        T: Serialize + ?Sized,
    {
        // `&T` is sized even when `T` is not.
        Ok(serde_cbor::to_vec(&value)?)
    }

    fn decode<T>(&self, bytes: &[u8]) -> Result<T, CodecError>
    where
        T: DeserializeOwned,
    {
        Ok(serde_cbor::from_slice(bytes)?)
    }
}

/// JSON codec. Human-readable on disk, larger than CBOR, and map keys are
/// always written as strings.
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode<T>(&self, value: &T) -> Result<Vec<u8>, CodecError>
    where
        T: Serialize + ?Sized,
    {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode<T>(&self, bytes: &[u8]) -> Result<T, CodecError>
    where
        T: DeserializeOwned,
    {
        Ok(serde_json::from_slice(bytes)?)
    }
}
