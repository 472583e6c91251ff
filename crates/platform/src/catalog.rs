//! Directory enumeration for the media catalog.
//!
//! The provider reports each directory entry with the kind the file system
//! advertised. FAT drivers frequently report [`EntryKind::Unknown`]; callers
//! resolve those with an explicit [`CatalogProvider::metadata`] lookup.

use core::ops::ControlFlow;

use crate::config::{ENTRY_NAME_MAX, RESOURCE_PATH_MAX};

/// Absolute path of a resource on the medium.
pub type ResourcePath = heapless::String<RESOURCE_PATH_MAX>;

/// A single path component (folder or track name).
pub type EntryName = heapless::String<ENTRY_NAME_MAX>;

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EntryKind {
    /// Directory
    Directory,
    /// Regular file
    File,
    /// The directory listing did not say; needs a metadata lookup.
    Unknown,
}

/// One entry yielded by [`CatalogProvider::read_dir`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirEntry<'a> {
    /// Entry name without the directory prefix.
    pub name: &'a str,
    /// Kind as reported by the listing.
    pub kind: EntryKind,
}

/// Directory enumeration and metadata, treated as a black box.
pub trait CatalogProvider {
    /// Error type
    type Error: core::fmt::Debug;

    /// Visit the entries of `dir` in listing order.
    ///
    /// The visitor returns [`ControlFlow::Break`] to stop early.
    fn read_dir<F>(
        &mut self,
        dir: &str,
        visit: F,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>
    where
        F: FnMut(DirEntry<'_>) -> ControlFlow<()>;

    /// Resolve the kind of the entry at `path`.
    fn metadata(
        &mut self,
        path: &str,
    ) -> impl core::future::Future<Output = Result<EntryKind, Self::Error>>;

    /// `true` if anything exists at `path`. Lookup failures count as absent.
    fn exists(&mut self, path: &str) -> impl core::future::Future<Output = bool>;
}

/// Path construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CatalogError {
    /// Joined path exceeds [`RESOURCE_PATH_MAX`]
    PathTooLong,
    /// Entry name exceeds [`ENTRY_NAME_MAX`]
    NameTooLong,
}

#[cfg(feature = "std")]
impl std::error::Error for CatalogError {}

impl core::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::PathTooLong => write!(f, "path longer than {RESOURCE_PATH_MAX} bytes"),
            Self::NameTooLong => write!(f, "entry name longer than {ENTRY_NAME_MAX} bytes"),
        }
    }
}

/// Join `dir` and `name` with exactly one `/` between them.
pub fn join_path(dir: &str, name: &str) -> Result<ResourcePath, CatalogError> {
    let mut path = ResourcePath::new();
    path.push_str(dir).map_err(|_| CatalogError::PathTooLong)?;
    if !dir.ends_with('/') {
        path.push('/').map_err(|_| CatalogError::PathTooLong)?;
    }
    path.push_str(name).map_err(|_| CatalogError::PathTooLong)?;
    Ok(path)
}

/// Last component of `path`.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Directory part of `path` (everything before the last `/`).
pub fn parent(path: &str) -> Option<&str> {
    path.rfind('/').and_then(|idx| path.get(..idx))
}

/// Copy a name into fixed-capacity storage.
pub fn entry_name(name: &str) -> Result<EntryName, CatalogError> {
    EntryName::try_from(name).map_err(|_| CatalogError::NameTooLong)
}
