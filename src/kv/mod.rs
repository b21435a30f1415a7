//! Bucket store over a single redb file.
//!
//! One [`Store`] owns one open database file and one named bucket inside it.
//! Values go through a [`Codec`](crate::Codec) on the way in and out; keys are
//! stored as their UTF-8 bytes.

mod absent;
mod options;
mod store;

pub use options::{ConfigError, Options};
pub use store::Store;
