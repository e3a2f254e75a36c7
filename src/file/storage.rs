//! File storage for fileshelf.
//!
//! All managed files live directly under one base directory:
//! ```text
//! {base_path}/
//! ├── a.txt
//! ├── b.png
//! └── subdir/      (ignored: not listed, not served)
//! ```
//! Every operation takes a [`FileName`], so only validated single-component
//! names are ever joined onto the base path. No index or cache is kept; the
//! directory listing is the metadata.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::{self, File};

use super::FileName;
use crate::{Result, ShelfError};

/// File storage service rooted at a single flat directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Base directory for file storage.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new FileStorage with the given base path.
    ///
    /// The directory is not touched; call [`FileStorage::ensure_dir`] to create it.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Create the base directory if it doesn't exist.
    pub async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    /// Get the full path for a stored file.
    pub fn path_of(&self, name: &FileName) -> PathBuf {
        self.base_path.join(name.as_str())
    }

    /// List the names of regular files in the storage directory.
    ///
    /// Subdirectories are skipped, as are names that are not valid UTF-8 since
    /// they could not be addressed by any other operation. Order is whatever
    /// the directory read yields.
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut entries = fs::read_dir(&self.base_path).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => {
                    tracing::warn!("Skipping non UTF-8 filename: {:?}", raw);
                }
            }
        }

        Ok(names)
    }

    /// Create (or truncate) a file for writing.
    ///
    /// The storage directory is created first if needed. An existing file with
    /// the same name is overwritten.
    pub async fn create(&self, name: &FileName) -> Result<File> {
        self.ensure_dir().await?;
        let file = File::create(self.path_of(name)).await?;
        Ok(file)
    }

    /// Open a stored file for reading, returning the handle and its size.
    pub async fn open(&self, name: &FileName) -> Result<(File, u64)> {
        let path = self.path_of(name);
        let metadata = self.file_metadata(name, &path).await?;
        let file = match File::open(&path).await {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ShelfError::NotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        Ok((file, metadata.len()))
    }

    /// Delete a stored file.
    pub async fn delete(&self, name: &FileName) -> Result<()> {
        let path = self.path_of(name);
        self.file_metadata(name, &path).await?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(ShelfError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Rename a stored file.
    ///
    /// Fails with `NotFound` if `from` is missing and with `Conflict` if
    /// anything already exists at `to`; an existing file is never replaced.
    pub async fn rename(&self, from: &FileName, to: &FileName) -> Result<()> {
        let from_path = self.path_of(from);
        let to_path = self.path_of(to);

        self.file_metadata(from, &from_path).await?;

        if fs::try_exists(&to_path).await? {
            return Err(ShelfError::Conflict(to.to_string()));
        }

        fs::rename(&from_path, &to_path).await?;
        Ok(())
    }

    /// Metadata of a regular file; directories and missing paths are `NotFound`.
    async fn file_metadata(&self, name: &FileName, path: &Path) -> Result<std::fs::Metadata> {
        match fs::metadata(path).await {
            Ok(m) if m.is_file() => Ok(m),
            Ok(_) => Err(ShelfError::NotFound(name.to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(ShelfError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
