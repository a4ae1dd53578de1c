use crate::{Load, SessionRecord, SessionStore, StoreError};
use async_trait::async_trait;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

/**
A [`SessionStore`] that keeps one json file per session, addressed
directly by identifier under a root directory. There is no indexing,
compaction, or eviction; entries live until removed out-of-band.

Writes go to a temporary sibling file and are moved into place with a
rename, so a concurrent load observes either the previous record or
the new one, never a partial write.
*/
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Constructs a FileStore rooted at the given directory. The
    /// directory is created on first save if it does not yet exist.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// the directory session files live under
    pub fn root(&self) -> &Path {
        &self.root
    }

    // Identifiers name files directly, so anything beyond the
    // characters a uuid uses is refused rather than interpreted.
    fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(StoreError::InvalidId(String::from(id)));
        }
        Ok(self.root.join(id))
    }

    async fn stored_version(&self, path: &Path) -> Result<Option<u64>, StoreError> {
        match async_fs::read(path).await {
            Ok(bytes) => {
                // an undecodable entry is treated as absent here: the
                // caller already saw Load::Corrupt and is writing a
                // fresh record over it
                Ok(serde_json::from_slice::<SessionRecord>(&bytes)
                    .ok()
                    .map(|record| record.version()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Storage(e)),
        }
    }
}

#[async_trait]
impl SessionStore for FileStore {
    async fn save(&self, record: &mut SessionRecord) -> Result<(), StoreError> {
        let path = self.path_for(record.id())?;
        async_fs::create_dir_all(&self.root).await?;

        if let Some(found) = self.stored_version(&path).await? {
            if found != record.version() {
                return Err(StoreError::Conflict {
                    expected: record.version(),
                    found,
                });
            }
        }

        let mut to_write = record.clone();
        to_write.advance_version();
        let bytes = match serde_json::to_vec_pretty(&to_write) {
            Ok(bytes) => bytes,
            Err(e) => return Err(StoreError::Encoding(e)),
        };

        let tmp = path.with_extension("tmp");
        async_fs::write(&tmp, bytes).await?;
        async_fs::rename(&tmp, &path).await?;
        record.advance_version();
        log::debug!(
            "saved session {} at version {}",
            record.id(),
            record.version()
        );
        Ok(())
    }

    async fn load(&self, id: &str) -> Load {
        let path = match self.path_for(id) {
            Ok(path) => path,
            Err(_) => return Load::Absent,
        };

        match async_fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(record) => Load::Found(record),
                Err(e) => Load::Corrupt(StoreError::Decoding(e)),
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Load::Absent,
            Err(e) => Load::Corrupt(StoreError::Storage(e)),
        }
    }
}
