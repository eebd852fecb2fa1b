//! Directory-backed state store.
//!
//! One `<key>.json` file per record inside a capability-scoped directory;
//! the process never touches paths outside the handle it was opened with.

use crate::storage::{StateKey, StateStore, StoreResult};
use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

/// JSON-file [`StateStore`] over a `cap-std` directory handle.
#[derive(Debug)]
pub struct JsonFileStateStore {
    dir: Dir,
}

impl JsonFileStateStore {
    /// Opens a store rooted at the given directory, which must exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`](crate::storage::StoreError::Io) when
    /// the directory cannot be opened.
    pub fn open(path: &str) -> StoreResult<Self> {
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self { dir })
    }

    /// Creates a store over an already-open directory handle.
    #[must_use]
    pub const fn from_dir(dir: Dir) -> Self {
        Self { dir }
    }

    fn file_name(key: StateKey) -> String {
        format!("{key}.json")
    }
}

#[async_trait]
impl StateStore for JsonFileStateStore {
    async fn read(&self, key: StateKey) -> StoreResult<Option<String>> {
        match self.dir.read_to_string(Self::file_name(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn write(&self, key: StateKey, value: &str) -> StoreResult<()> {
        self.dir.write(Self::file_name(key), value)?;
        Ok(())
    }

    async fn remove(&self, key: StateKey) -> StoreResult<()> {
        match self.dir.remove_file(Self::file_name(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
