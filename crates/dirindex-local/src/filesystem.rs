use std::fs::{self, DirEntry, ReadDir};
use std::io;
use std::path::Path;
use std::time::SystemTime;

use dirindex_platform::filesystem::{DirectoryHandle, DirectoryReadError, Entry};

/// A directory opened on the local filesystem.
///
/// The handle is single-use: `read_entries` drains it, and the underlying
/// descriptor is released when the read finishes or the handle is dropped.
pub struct LocalDirectory {
    location: String,
    entries: Option<ReadDir>,
}

impl LocalDirectory {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DirectoryReadError> {
        let path = path.as_ref();
        let location = path.display().to_string();
        let entries = fs::read_dir(path).map_err(|e| DirectoryReadError::new(location.clone(), e))?;

        Ok(Self {
            location,
            entries: Some(entries),
        })
    }

    fn read_error(&self, source: io::Error) -> DirectoryReadError {
        DirectoryReadError::new(self.location.clone(), source)
    }

    fn to_entry(entry: &DirEntry) -> io::Result<Entry> {
        // DirEntry::metadata does not follow symlinks
        let meta = entry.metadata()?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let modified_at = mtime_or_epoch(&entry.path(), meta.modified());

        if meta.is_dir() {
            Ok(Entry::dir(name, modified_at))
        } else {
            Ok(Entry::file(name, meta.len(), modified_at))
        }
    }
}

/// Platforms without mtime support report the epoch instead.
fn mtime_or_epoch(path: &Path, modified: io::Result<SystemTime>) -> SystemTime {
    modified.unwrap_or_else(|e| {
        tracing::debug!("no mtime for {}, using epoch: {}", path.display(), e);
        SystemTime::UNIX_EPOCH
    })
}

impl DirectoryHandle for LocalDirectory {
    fn location(&self) -> &str {
        &self.location
    }

    fn read_entries(&mut self) -> Result<Vec<Entry>, DirectoryReadError> {
        let entries = match self.entries.take() {
            Some(entries) => entries,
            None => {
                return Err(self.read_error(io::Error::new(
                    io::ErrorKind::Other,
                    "directory handle already closed",
                )))
            }
        };

        let mut result = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| self.read_error(e))?;

            match Self::to_entry(&entry) {
                Ok(e) => result.push(e),
                // removed between readdir and stat
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!("skipping vanished entry {}: {}", entry.path().display(), e);
                }
                Err(e) => return Err(self.read_error(e)),
            }
        }

        tracing::debug!("read {} entries from {}", result.len(), self.location);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_names(entries: &[Entry]) -> Vec<&str> {
        let mut names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    #[test]
    fn test_read_entries_returns_files_and_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("b.txt"), b"hello").unwrap();
        fs::create_dir(tmp.path().join("a")).unwrap();

        let mut dir = LocalDirectory::open(tmp.path()).unwrap();
        let entries = dir.read_entries().unwrap();

        assert_eq!(sorted_names(&entries), vec!["a", "b.txt"]);

        let file = entries.iter().find(|e| e.name == "b.txt").unwrap();
        assert!(!file.is_dir);
        assert_eq!(file.size, 5);

        let sub = entries.iter().find(|e| e.name == "a").unwrap();
        assert!(sub.is_dir);
        assert_eq!(sub.size, 0);
    }

    #[test]
    fn test_missing_mtime_falls_back_to_epoch() {
        let unsupported = Err(io::Error::new(io::ErrorKind::Unsupported, "no mtime"));
        assert_eq!(mtime_or_epoch(Path::new("x"), unsupported), SystemTime::UNIX_EPOCH);

        let t = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(42);
        assert_eq!(mtime_or_epoch(Path::new("x"), Ok(t)), t);
    }

    #[test]
    fn test_empty_directory_yields_no_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let mut dir = LocalDirectory::open(tmp.path()).unwrap();
        assert!(dir.read_entries().unwrap().is_empty());
    }

    #[test]
    fn test_open_nonexistent_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("definitely_missing");

        let err = LocalDirectory::open(&missing).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(err.location(), missing.display().to_string());
    }

    #[test]
    fn test_open_regular_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();

        assert!(LocalDirectory::open(&file).is_err());
    }

    #[test]
    fn test_second_read_fails_as_closed() {
        let tmp = tempfile::tempdir().unwrap();
        let mut dir = LocalDirectory::open(tmp.path()).unwrap();
        dir.read_entries().unwrap();

        let err = dir.read_entries().unwrap_err();
        assert!(err.to_string().contains("already closed"));
    }

    #[test]
    fn test_location_reports_opened_path() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = LocalDirectory::open(tmp.path()).unwrap();
        assert_eq!(dir.location(), tmp.path().display().to_string());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_to_directory_is_not_classified_as_dir() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("real")).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("link")).unwrap();

        let mut dir = LocalDirectory::open(tmp.path()).unwrap();
        let entries = dir.read_entries().unwrap();

        let link = entries.iter().find(|e| e.name == "link").unwrap();
        assert!(!link.is_dir);
        let real = entries.iter().find(|e| e.name == "real").unwrap();
        assert!(real.is_dir);
    }
}
