//! File system operations
//!
//! `FileSystem` is the storage collaborator the dispatcher works against.
//! Every path it receives is a virtual absolute path produced by
//! `navigate::resolve_path`. `LocalFileSystem` serves a directory of the
//! host filesystem.

use log::{debug, info};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::PathBuf;

use crate::error::StorageError;
use crate::storage::results::{DirEntry, Metadata};
use crate::storage::validation::virtual_to_real_path;

/// An open file.
pub trait FileHandle: Read + Write {
    /// Size in bytes at the time the file was opened.
    fn size(&self) -> u64;
}

/// Storage backend primitives.
pub trait FileSystem {
    type File: FileHandle;

    fn open_read(&mut self, path: &str) -> Result<Self::File, StorageError>;

    /// Opens `path` for writing, creating or truncating it.
    fn open_write(&mut self, path: &str) -> Result<Self::File, StorageError>;

    fn exists(&self, path: &str) -> bool;

    fn metadata(&self, path: &str) -> Result<Metadata, StorageError>;

    fn remove(&mut self, path: &str) -> Result<(), StorageError>;

    fn rename(&mut self, from: &str, to: &str) -> Result<(), StorageError>;

    fn mkdir(&mut self, path: &str) -> Result<(), StorageError>;

    /// Removes an empty directory.
    fn rmdir(&mut self, path: &str) -> Result<(), StorageError>;

    fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>, StorageError>;
}

/// A file opened through `LocalFileSystem`.
#[derive(Debug)]
pub struct LocalFile {
    file: File,
    size: u64,
}

impl Read for LocalFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for LocalFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl FileHandle for LocalFile {
    fn size(&self) -> u64 {
        self.size
    }
}

/// Serves the directory tree below `root`.
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    root: PathBuf,
}

impl LocalFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        info!("Serving files from {}", root.display());
        Self { root }
    }

    fn real(&self, path: &str) -> Result<PathBuf, StorageError> {
        virtual_to_real_path(&self.root, path)
    }
}

/// Attaches the virtual path to "not found" errors.
fn map_io(path: &str, err: io::Error) -> StorageError {
    match err.kind() {
        io::ErrorKind::NotFound => StorageError::FileNotFound(path.to_string()),
        _ => StorageError::IoError(err),
    }
}

impl FileSystem for LocalFileSystem {
    type File = LocalFile;

    fn open_read(&mut self, path: &str) -> Result<LocalFile, StorageError> {
        let real = self.real(path)?;
        let file = File::open(&real).map_err(|e| map_io(path, e))?;
        let meta = file.metadata().map_err(|e| map_io(path, e))?;
        if meta.is_dir() {
            return Err(StorageError::IsADirectory(path.to_string()));
        }
        debug!("Opened {} for reading ({} bytes)", real.display(), meta.len());
        Ok(LocalFile {
            file,
            size: meta.len(),
        })
    }

    fn open_write(&mut self, path: &str) -> Result<LocalFile, StorageError> {
        let real = self.real(path)?;
        if real.is_dir() {
            return Err(StorageError::IsADirectory(path.to_string()));
        }
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&real)
            .map_err(|e| map_io(path, e))?;
        debug!("Opened {} for writing", real.display());
        Ok(LocalFile { file, size: 0 })
    }

    fn exists(&self, path: &str) -> bool {
        self.real(path).map(|real| real.exists()).unwrap_or(false)
    }

    fn metadata(&self, path: &str) -> Result<Metadata, StorageError> {
        let meta = fs::metadata(self.real(path)?).map_err(|e| map_io(path, e))?;
        Ok(Metadata {
            is_dir: meta.is_dir(),
            size: if meta.is_dir() { 0 } else { meta.len() },
            modified: meta.modified().ok(),
        })
    }

    fn remove(&mut self, path: &str) -> Result<(), StorageError> {
        let real = self.real(path)?;
        if real.is_dir() {
            return Err(StorageError::IsADirectory(path.to_string()));
        }
        fs::remove_file(&real).map_err(|e| map_io(path, e))?;
        info!("Deleted {}", real.display());
        Ok(())
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), StorageError> {
        let real_from = self.real(from)?;
        let real_to = self.real(to)?;
        fs::rename(&real_from, &real_to).map_err(|e| map_io(from, e))?;
        info!("Renamed {} to {}", real_from.display(), real_to.display());
        Ok(())
    }

    fn mkdir(&mut self, path: &str) -> Result<(), StorageError> {
        let real = self.real(path)?;
        fs::create_dir(&real).map_err(|e| map_io(path, e))?;
        info!("Created directory {}", real.display());
        Ok(())
    }

    fn rmdir(&mut self, path: &str) -> Result<(), StorageError> {
        let real = self.real(path)?;
        if !real.is_dir() {
            return Err(StorageError::NotADirectory(path.to_string()));
        }
        if fs::read_dir(&real).map_err(|e| map_io(path, e))?.next().is_some() {
            return Err(StorageError::DirectoryNotEmpty(path.to_string()));
        }
        fs::remove_dir(&real).map_err(|e| map_io(path, e))?;
        info!("Removed directory {}", real.display());
        Ok(())
    }

    fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>, StorageError> {
        let real = self.real(path)?;
        if !real.is_dir() {
            return Err(StorageError::NotADirectory(path.to_string()));
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&real).map_err(|e| map_io(path, e))?.flatten() {
            let Ok(meta) = entry.metadata() else {
                continue;
            };
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                is_dir: meta.is_dir(),
                size: if meta.is_dir() { 0 } else { meta.len() },
                modified: meta.modified().ok(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}
