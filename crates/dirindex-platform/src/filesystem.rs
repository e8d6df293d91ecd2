use std::io;
use std::time::SystemTime;

use thiserror::Error;

/// One member of a listed directory, as returned by a single directory read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Raw file name. Always a single path segment.
    pub name: String,
    pub is_dir: bool,
    /// Byte size. Backends report 0 for directories.
    pub size: u64,
    pub modified_at: SystemTime,
}

impl Entry {
    pub fn file(name: impl Into<String>, size: u64, modified_at: SystemTime) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
            size,
            modified_at,
        }
    }

    pub fn dir(name: impl Into<String>, modified_at: SystemTime) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
            size: 0,
            modified_at,
        }
    }
}

/// The directory could not be enumerated.
#[derive(Debug, Error)]
#[error("failed to read dir {location}: {source}")]
pub struct DirectoryReadError {
    location: String,
    #[source]
    source: io::Error,
}

impl DirectoryReadError {
    pub fn new(location: impl Into<String>, source: io::Error) -> Self {
        Self {
            location: location.into(),
            source,
        }
    }

    /// Directory the failed read was issued against
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Kind of the underlying I/O failure
    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }
}

/// An open directory that can be enumerated.
///
/// The handle is owned by the caller and released when dropped, so it is
/// closed on every exit path whether or not the read succeeded.
pub trait DirectoryHandle: Send {
    /// Human-readable location used in logs and errors
    fn location(&self) -> &str;

    /// Read all members in one pass. No ordering is guaranteed.
    fn read_entries(&mut self) -> Result<Vec<Entry>, DirectoryReadError>;
}
