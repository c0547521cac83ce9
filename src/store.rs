//! Asset store
//!
//! Persists uploaded payloads as flat files named `{id}{extension}` under a
//! single root directory. Reading the files back is left to the static file
//! handler; the store only guarantees the file exists once a write returns.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

use crate::id::ResourceId;

/// Default copy buffer size for streamed uploads
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// I/O failure while persisting a payload
#[derive(Debug, thiserror::Error)]
#[error("{}: {source}", .path.display())]
pub struct StorageWriteError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl StorageWriteError {
    fn new(path: PathBuf, source: io::Error) -> Self {
        Self { path, source }
    }
}

/// Flat-file asset store rooted at a single directory
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
    chunk_size: usize,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>, chunk_size: usize) -> Self {
        Self {
            root: root.into(),
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root directory if it does not exist yet
    pub async fn ensure_root(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root).await
    }

    /// Derived file name for a resource, relative to the root
    pub fn storage_path(id: &ResourceId, extension: &str) -> String {
        format!("{id}{extension}")
    }

    /// Absolute location of a stored file
    pub fn path_for(&self, storage_path: &str) -> PathBuf {
        self.root.join(storage_path)
    }

    /// Stream `source` into `{id}{extension}` through a bounded buffer.
    ///
    /// Read failures on `source` are reported the same way as write failures.
    /// A partially written file is left behind when the copy aborts.
    pub async fn write_binary<R>(
        &self,
        id: &ResourceId,
        extension: &str,
        mut source: R,
    ) -> Result<String, StorageWriteError>
    where
        R: AsyncRead + Unpin,
    {
        let storage_path = Self::storage_path(id, extension);
        let path = self.path_for(&storage_path);
        let mut file = create_file(&storage_path, &path).await?;

        let mut buf = vec![0u8; self.chunk_size];
        let mut total: u64 = 0;
        loop {
            let n = source
                .read(&mut buf)
                .await
                .map_err(|e| StorageWriteError::new(path.clone(), e))?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n])
                .await
                .map_err(|e| StorageWriteError::new(path.clone(), e))?;
            total += n as u64;
        }

        finish(file, &path).await?;
        tracing::debug!(path = %path.display(), bytes = total, "binary asset written");
        Ok(storage_path)
    }

    /// Write a complete UTF-8 payload to `{id}{extension}`
    pub async fn write_text(
        &self,
        id: &ResourceId,
        extension: &str,
        content: &str,
    ) -> Result<String, StorageWriteError> {
        let storage_path = Self::storage_path(id, extension);
        let path = self.path_for(&storage_path);
        let mut file = create_file(&storage_path, &path).await?;

        file.write_all(content.as_bytes())
            .await
            .map_err(|e| StorageWriteError::new(path.clone(), e))?;

        finish(file, &path).await?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "text asset written");
        Ok(storage_path)
    }
}

/// Open a new file, refusing anything that is not a flat name
async fn create_file(storage_path: &str, path: &Path) -> Result<File, StorageWriteError> {
    if storage_path.contains(['/', '\\']) {
        return Err(StorageWriteError::new(
            path.to_path_buf(),
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid storage name '{storage_path}'"),
            ),
        ));
    }

    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .map_err(|e| StorageWriteError::new(path.to_path_buf(), e))
}

/// Flush and sync so the file is durable before it is registered
async fn finish(mut file: File, path: &Path) -> Result<(), StorageWriteError> {
    file.flush()
        .await
        .map_err(|e| StorageWriteError::new(path.to_path_buf(), e))?;
    file.sync_all()
        .await
        .map_err(|e| StorageWriteError::new(path.to_path_buf(), e))
}
