//! File access used by the layer loader
//!
//! The loader never touches the disk directly. [`LocalFileSystem`] reads
//! through `tokio::fs`; [`MemoryFileSystem`] serves documents from memory for
//! tests and embedders.

use crate::{Result, RimeTreeError};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Read access to a directory of documents
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// File names (not paths) of the regular files in `path`
    ///
    /// Fails with [`RimeTreeError::DirectoryRead`] when the directory is
    /// missing or unreadable.
    async fn read_directory(&self, path: &Path) -> Result<Vec<String>>;

    /// Raw content of the file at `path`
    ///
    /// Fails with [`RimeTreeError::FileRead`].
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
}

/// The real file system
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn read_directory(&self, path: &Path) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(path)
            .await
            .map_err(|e| RimeTreeError::directory_read(path, e))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RimeTreeError::directory_read(path, e))?
        {
            // Follows symlinks, so linked documents are listed too
            let is_file = tokio::fs::metadata(entry.path())
                .await
                .map(|m| m.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => tracing::debug!("Skipping non UTF-8 file name {:?}", raw),
            }
        }
        Ok(names)
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| RimeTreeError::file_read(path, e))
    }
}

/// An in-memory file system keyed by full path
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    directories: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty directory
    pub fn add_directory(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.directories.insert(path.into());
        self
    }

    /// Add a file; its parent directory is registered as well
    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> &mut Self {
        let path = path.into();
        if let Some(parent) = path.parent() {
            self.directories.insert(parent.to_path_buf());
        }
        self.files.insert(path, content.into());
        self
    }
}

#[async_trait]
impl FileSystem for MemoryFileSystem {
    async fn read_directory(&self, path: &Path) -> Result<Vec<String>> {
        if !self.directories.contains(path) {
            return Err(RimeTreeError::directory_read(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
            ));
        }
        Ok(self
            .files
            .keys()
            .filter(|file| file.parent() == Some(path))
            .filter_map(|file| file.file_name()?.to_str().map(str::to_string))
            .collect())
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| {
            RimeTreeError::file_read(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            )
        })
    }
}
