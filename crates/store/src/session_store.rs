use crate::SessionRecord;
use async_trait::async_trait;

/// Error type for [`SessionStore`] operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// the backing medium failed
    #[error("storage failure: {0}")]
    Storage(#[from] std::io::Error),

    /// a stored entry exists but could not be deserialized
    #[error("stored record could not be decoded: {0}")]
    Decoding(#[source] serde_json::Error),

    /// the record could not be serialized
    #[error("record could not be encoded: {0}")]
    Encoding(#[source] serde_json::Error),

    /// the on-disk version did not match the version the record was
    /// loaded at; another writer got there first
    #[error("version conflict: saving at version {expected}, but storage is at {found}")]
    Conflict {
        /// the version the caller's record was loaded at
        expected: u64,
        /// the version currently in durable storage
        found: u64,
    },

    /// the session identifier contains characters the store does not
    /// accept
    #[error("invalid session identifier {0:?}")]
    InvalidId(String),
}

/// The outcome of a [`SessionStore::load`].
///
/// Callers that only care about "do I have a record" treat `Absent`
/// and `Corrupt` identically, initializing a fresh record. The tag
/// exists so they can log the two distinctly: `Absent` is a new user,
/// `Corrupt` is data loss.
#[derive(Debug)]
pub enum Load {
    /// a record exists and was read back intact
    Found(SessionRecord),
    /// no entry exists for this identifier
    Absent,
    /// an entry exists but could not be read or decoded
    Corrupt(StoreError),
}

/**
Durable mapping from session identifier to [`SessionRecord`].

Modeled as an upsert `save` guarded by a version compare-and-swap,
plus an infallible tagged `load`. Implementations provide no eviction
or expiry: a saved record lives until something outside the store
removes it.
*/
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /**
    Upserts the record: creates the backing entry if absent,
    overwrites it if present at the same version the record was
    loaded at. On success the record's version is advanced to match
    storage. Fails with [`StoreError::Conflict`] if another writer
    saved this identifier since the record was loaded.
    */
    async fn save(&self, record: &mut SessionRecord) -> Result<(), StoreError>;

    /// Fetches the record for `id`, reporting absence and corruption
    /// as distinct [`Load`] variants rather than errors.
    async fn load(&self, id: &str) -> Load;
}
