//! Local filesystem backend for host runs.
//!
//! `LocalFileStorage` implements [`Storage`] and [`CatalogProvider`] using
//! `std::fs`. A host directory stands in for the card: device paths under
//! [`SD_ROOT`] are resolved relative to the `card_root` given at
//! construction.

use std::fs;
use std::io::Read;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use crate::catalog::{CatalogProvider, DirEntry, EntryKind};
use crate::config::SD_ROOT;
use crate::storage::{File, Storage};

/// Error type for local filesystem operations.
#[derive(Debug)]
pub struct LocalStorageError(pub std::io::Error);

impl core::fmt::Display for LocalStorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "local storage error: {}", self.0)
    }
}

impl std::error::Error for LocalStorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// An open file on the local filesystem.
pub struct LocalFile {
    inner: fs::File,
    size: u64,
}

impl File for LocalFile {
    type Error = LocalStorageError;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        Read::read(&mut self.inner, buf).map_err(LocalStorageError)
    }

    fn size(&self) -> u64 {
        self.size
    }
}

/// Card backend over a host directory.
///
/// # Example
/// ```no_run
/// # async fn example() {
/// use platform::storage_local::LocalFileStorage;
/// use platform::Storage;
///
/// let mut card = LocalFileStorage::new("./card");
/// let present = card.exists("/sdcard/welcome.wav").await.unwrap_or(false);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    card_root: PathBuf,
}

impl LocalFileStorage {
    /// Create a backend rooted at `card_root`.
    pub fn new(card_root: impl Into<PathBuf>) -> Self {
        Self {
            card_root: card_root.into(),
        }
    }

    /// Map a device path to the host path.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let relative = path.strip_prefix(SD_ROOT).unwrap_or(path);
        self.card_root.join(relative.trim_start_matches('/'))
    }
}

fn kind_of(file_type: fs::FileType) -> EntryKind {
    if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::File
    } else {
        EntryKind::Unknown
    }
}

impl Storage for LocalFileStorage {
    type Error = LocalStorageError;
    type File = LocalFile;

    async fn open(&mut self, path: &str) -> Result<Self::File, Self::Error> {
        let inner = fs::File::open(self.resolve(path)).map_err(LocalStorageError)?;
        let size = inner.metadata().map_err(LocalStorageError)?.len();
        Ok(LocalFile { inner, size })
    }

    async fn exists(&mut self, path: &str) -> Result<bool, Self::Error> {
        Ok(self.resolve(path).exists())
    }
}

impl CatalogProvider for LocalFileStorage {
    type Error = LocalStorageError;

    async fn read_dir<F>(&mut self, dir: &str, mut visit: F) -> Result<(), Self::Error>
    where
        F: FnMut(DirEntry<'_>) -> ControlFlow<()>,
    {
        for entry in fs::read_dir(self.resolve(dir)).map_err(LocalStorageError)? {
            let entry = entry.map_err(LocalStorageError)?;
            let name = entry.file_name();
            // Non-UTF-8 names cannot be turned into device paths.
            let Some(name) = name.to_str() else {
                continue;
            };
            let kind = entry.file_type().map_or(EntryKind::Unknown, kind_of);
            if visit(DirEntry { name, kind }).is_break() {
                break;
            }
        }
        Ok(())
    }

    async fn metadata(&mut self, path: &str) -> Result<EntryKind, Self::Error> {
        let meta = fs::metadata(self.resolve(path)).map_err(LocalStorageError)?;
        Ok(kind_of(meta.file_type()))
    }

    async fn exists(&mut self, path: &str) -> bool {
        Path::exists(&self.resolve(path))
    }
}
