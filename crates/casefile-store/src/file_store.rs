//! Directory-backed `KeyValueStore`: one file per key.

use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use casefile_core::error::MissionError;
use casefile_core::store::KeyValueStore;

/// Stores each key as `<dir>/<encoded key>.json`.
///
/// Keys are percent-encoded into file names: ASCII alphanumerics, `_`, `-`
/// and non-leading `.` pass through, every other byte becomes `%XX`. Any
/// non-empty key therefore maps to exactly one file inside `dir`.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory values are stored in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file a key is stored in.
    ///
    /// # Errors
    ///
    /// Returns `MissionError::Infrastructure` for an empty key.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, MissionError> {
        if key.is_empty() {
            return Err(MissionError::Infrastructure("key is empty".into()));
        }
        Ok(self.dir.join(format!("{}.json", encode_file_name(key))))
    }
}

fn encode_file_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    for (i, byte) in key.bytes().enumerate() {
        let plain = byte.is_ascii_alphanumeric()
            || matches!(byte, b'_' | b'-')
            || (byte == b'.' && i > 0);
        if plain {
            name.push(char::from(byte));
        } else {
            let _ = write!(name, "%{byte:02X}");
        }
    }
    name
}

fn io_error(action: &str, path: &Path, e: &std::io::Error) -> MissionError {
    MissionError::Infrastructure(format!("failed to {action} {}: {e}", path.display()))
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, MissionError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error("read", &path, &e)),
        }
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), MissionError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error("create", &self.dir, &e))?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value)
            .await
            .map_err(|e| io_error("write", &tmp, &e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_error("replace", &path, &e))?;
        tracing::trace!(path = %path.display(), bytes = value.len(), "record written");
        Ok(())
    }
}
