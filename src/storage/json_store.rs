use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::StoreError;

/// A named JSON document that is always read whole and replaced whole.
///
/// Replacement goes through a temporary file in the same directory that is
/// renamed over the target, so readers see either the old or the new
/// document and never a torn write.
#[derive(Debug, Clone)]
pub struct JsonStore<T> {
    name: &'static str,
    path: Option<PathBuf>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonStore<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    /// A store without a path fails every load and save with `Uninitialized`.
    pub fn new(name: &'static str, path: Option<PathBuf>) -> Self {
        Self {
            name,
            path,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> Result<&Path, StoreError> {
        self.path
            .as_deref()
            .ok_or(StoreError::Uninitialized(self.name))
    }

    /// Read the whole document.
    /// A missing or unparsable file reads as `T::default()`.
    pub async fn load(&self) -> Result<T, StoreError> {
        let path = self.path()?;

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(store = self.name, path = %path.display(), "store file missing, starting empty");
                return Ok(T::default());
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => {
                debug!(store = self.name, bytes = bytes.len(), "loaded store");
                Ok(value)
            }
            Err(e) => {
                warn!(store = self.name, path = %path.display(), error = %e, "store file unreadable, starting empty");
                Ok(T::default())
            }
        }
    }

    /// Write `value` to a temporary file next to the store and flush it to disk.
    /// Nothing is visible to readers until the returned write is committed.
    pub async fn stage(&self, value: &T) -> Result<StagedWrite, StoreError> {
        let target = self.path()?.to_path_buf();
        let bytes = serde_json::to_vec_pretty(value)?;

        let dir = match target.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let temp = tempfile::Builder::new()
            .prefix(".")
            .suffix(".tmp")
            .tempfile_in(dir)?;

        let mut file = tokio::fs::File::from_std(temp.as_file().try_clone()?);
        file.write_all(&bytes).await?;
        file.flush().await?;
        file.sync_all().await?;

        debug!(store = self.name, bytes = bytes.len(), "staged store write");
        Ok(StagedWrite {
            name: self.name,
            target,
            temp,
        })
    }

    /// Replace the document with `value`.
    pub async fn save(&self, value: &T) -> Result<(), StoreError> {
        self.stage(value).await?.commit()
    }
}

/// A fully written replacement for one store file, not yet in place.
/// Dropping it without committing discards the temporary file.
#[derive(Debug)]
pub struct StagedWrite {
    name: &'static str,
    target: PathBuf,
    temp: NamedTempFile,
}

impl StagedWrite {
    pub fn commit(self) -> Result<(), StoreError> {
        self.temp.persist(&self.target)?;
        debug!(store = self.name, path = %self.target.display(), "committed store write");
        Ok(())
    }
}

/// An ordered group of staged writes, renamed into place one after another.
///
/// Every file is staged before any rename happens, so a failure while
/// staging leaves all stores untouched.
#[derive(Debug, Default)]
pub struct Commit {
    writes: Vec<StagedWrite>,
}

impl Commit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, write: StagedWrite) {
        self.writes.push(write);
    }

    pub fn commit(self) -> Result<(), StoreError> {
        for write in self.writes {
            write.commit()?;
        }
        Ok(())
    }
}
