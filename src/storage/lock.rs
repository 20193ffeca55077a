use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::StoreError;

/// Exclusive advisory lock on a lock file, held until dropped.
///
/// The lock belongs to the open file handle, so it serialises separate
/// processes as well as separate handles within one process, and the OS
/// releases it if the holder dies.
#[derive(Debug)]
pub struct StoreLock {
    file: File,
    path: PathBuf,
}

impl StoreLock {
    /// Block (on a worker thread) until the lock is ours.
    pub async fn acquire(path: &Path) -> Result<Self, StoreError> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }

        let path = path.to_path_buf();
        let lock = tokio::task::spawn_blocking(move || -> io::Result<StoreLock> {
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(&path)?;
            file.lock()?;
            Ok(StoreLock { file, path })
        })
        .await
        .map_err(io::Error::other)??;

        debug!(path = %lock.path.display(), "acquired store lock");
        Ok(lock)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        match self.file.unlock() {
            Ok(()) => debug!(path = %self.path.display(), "released store lock"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to release store lock"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_second_holder_waits_for_release() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.lock");

        let first = StoreLock::acquire(&path).await.unwrap();

        let waiting_path = path.clone();
        let mut second = tokio::spawn(async move { StoreLock::acquire(&waiting_path).await });

        let early = tokio::time::timeout(Duration::from_millis(100), &mut second).await;
        assert!(early.is_err(), "lock was granted while still held");

        drop(first);
        let second = second.await.unwrap().unwrap();
        assert_eq!(second.path(), path.as_path());
    }

    #[tokio::test]
    async fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger.lock");

        let lock = StoreLock::acquire(&path).await.unwrap();
        assert!(lock.path().exists());
    }
}
