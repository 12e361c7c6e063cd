use thiserror::Error;

/// Errors that can occur while persisting or loading cache snapshots.
///
/// These never reach callers of the cache API: every snapshot failure is
/// logged and downgraded to a cache miss. The type exists so snapshot-store
/// implementations have a real error channel instead of stringly I/O.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error while reading or writing the snapshot
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot bytes could not be (de)serialized
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic store error with message
    #[error("{0}")]
    Store(String),
}

impl CacheError {
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }
}
