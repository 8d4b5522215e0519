//! In-memory storage

use std::collections::BTreeMap;

use super::{Storage, StorageError};

/// Storage held entirely in memory.
///
/// A read-only instance behaves like a write-protected or missing card:
/// reads work, every write fails with [`StorageError::ReadOnly`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: BTreeMap<String, String>,
    read_only: bool,
}

impl MemoryStorage {
    /// Create an empty, writable storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Raw contents of a file
    pub fn contents(&self, path: &str) -> Option<&str> {
        self.files.get(normalize(path)).map(String::as_str)
    }

    /// Paths of all stored files
    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.files.keys()
    }

    fn check_writable(&self, path: &str) -> Result<(), StorageError> {
        if self.read_only {
            Err(StorageError::ReadOnly(path.to_string()))
        } else {
            Ok(())
        }
    }
}

fn normalize(path: &str) -> &str {
    path.trim_start_matches('/')
}

impl Storage for MemoryStorage {
    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(normalize(path))
    }

    fn append_line(&mut self, path: &str, line: &str) -> Result<(), StorageError> {
        self.check_writable(path)?;
        let file = self.files.entry(normalize(path).to_string()).or_default();
        file.push_str(line);
        file.push('\n');
        Ok(())
    }

    fn read_lines(&self, path: &str) -> Result<Vec<String>, StorageError> {
        self.files
            .get(normalize(path))
            .map(|content| content.lines().map(str::to_string).collect())
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    fn write(&mut self, path: &str, contents: &str) -> Result<(), StorageError> {
        self.check_writable(path)?;
        self.files
            .insert(normalize(path).to_string(), contents.to_string());
        Ok(())
    }

    fn remove(&mut self, path: &str) -> Result<(), StorageError> {
        self.check_writable(path)?;
        self.files
            .remove(normalize(path))
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }
}
