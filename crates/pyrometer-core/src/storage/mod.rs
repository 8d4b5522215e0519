//! Persistent storage
//!
//! The device keeps everything in small text files on the SD card (or the
//! internal flash filesystem when no card is fitted). The core only needs
//! line-level access, expressed by the [`Storage`] trait.

mod fs;
mod memory;
pub mod results;

pub use fs::FsStorage;
pub use memory::MemoryStorage;

use std::io;
use thiserror::Error;

/// Errors that can occur reading or writing storage
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Storage is read-only, cannot write '{0}'")]
    ReadOnly(String),
}

/// Line-oriented file access
pub trait Storage {
    /// Whether a file exists
    fn exists(&self, path: &str) -> bool;

    /// Append one line (a newline is added) creating the file if needed
    fn append_line(&mut self, path: &str, line: &str) -> Result<(), StorageError>;

    /// Read every line of a file, without line terminators
    fn read_lines(&self, path: &str) -> Result<Vec<String>, StorageError>;

    /// Replace the whole contents of a file
    fn write(&mut self, path: &str, contents: &str) -> Result<(), StorageError>;

    /// Delete a file
    fn remove(&mut self, path: &str) -> Result<(), StorageError>;
}
