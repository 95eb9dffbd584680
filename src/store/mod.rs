//! Durable storage for per-group settings.

mod json_file;

pub use json_file::JsonFileStore;

use std::collections::HashMap;
use std::path::PathBuf;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::{host::GroupId, state::GroupConfig};

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Error raised by settings stores regardless of the backing medium.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("settings i/o failed at `{}`", path.display())]
    Io {
        /// Path of the file involved.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
    /// The stored document could not be decoded.
    #[error("settings document at `{}` is not valid JSON", path.display())]
    Decode {
        /// Path of the unreadable document.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
    /// The settings map could not be encoded for writing.
    #[error("settings document could not be encoded")]
    Encode {
        /// Underlying encode error.
        #[source]
        source: serde_json::Error,
    },
}

/// Abstraction over the persistence layer for group settings.
///
/// The document is always handled as a whole map: load on startup, full
/// rewrite on every change. At this size a diff protocol would cost more
/// than it saved.
pub trait ConfigStore: Send + Sync {
    /// Load the full settings map; a missing document is an empty map.
    fn load(&self) -> BoxFuture<'static, StoreResult<HashMap<GroupId, GroupConfig>>>;

    /// Replace the persisted settings document with `configs`.
    fn save(&self, configs: HashMap<GroupId, GroupConfig>) -> BoxFuture<'static, StoreResult<()>>;
}
