//! Directory-backed storage

use std::borrow::Cow;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{Storage, StorageError};

/// Storage rooted at a directory on the host filesystem
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Use `root` as the top of the storage tree
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    fn ensure_parent(&self, full: &Path, path: &str) -> Result<(), StorageError> {
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|e| io_error(path, e))?;
        }
        Ok(())
    }
}

fn io_error(path: &str, source: io::Error) -> StorageError {
    if source.kind() == io::ErrorKind::NotFound {
        StorageError::NotFound(path.to_string())
    } else {
        StorageError::Io {
            path: path.to_string(),
            source,
        }
    }
}

impl Storage for FsStorage {
    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }

    fn append_line(&mut self, path: &str, line: &str) -> Result<(), StorageError> {
        let full = self.resolve(path);
        self.ensure_parent(&full, path)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&full)
            .map_err(|e| io_error(path, e))?;
        writeln!(file, "{}", line).map_err(|e| io_error(path, e))?;
        file.flush().map_err(|e| io_error(path, e))
    }

    /// Invalid UTF-8 is replaced rather than failing the whole file, so a
    /// damaged line surfaces as one bad record.
    fn read_lines(&self, path: &str) -> Result<Vec<String>, StorageError> {
        let bytes = fs::read(self.resolve(path)).map_err(|e| io_error(path, e))?;
        let content = String::from_utf8_lossy(&bytes);
        if let Cow::Owned(_) = content {
            tracing::warn!("{} contains invalid UTF-8", path);
        }
        Ok(content.lines().map(str::to_string).collect())
    }

    fn write(&mut self, path: &str, contents: &str) -> Result<(), StorageError> {
        let full = self.resolve(path);
        self.ensure_parent(&full, path)?;
        fs::write(&full, contents).map_err(|e| io_error(path, e))
    }

    fn remove(&mut self, path: &str) -> Result<(), StorageError> {
        fs::remove_file(self.resolve(path)).map_err(|e| io_error(path, e))
    }
}
