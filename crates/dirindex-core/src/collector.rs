use tracing::debug;

use dirindex_platform::filesystem::{DirectoryHandle, DirectoryReadError, Entry};

/// Read every member of an open directory.
///
/// The result is unordered; an empty directory yields an empty vector.
/// Read failures are returned as-is.
pub fn collect_entries(dir: &mut dyn DirectoryHandle) -> Result<Vec<Entry>, DirectoryReadError> {
    let entries = dir.read_entries()?;
    debug!("collected {} entries from {}", entries.len(), dir.location());
    Ok(entries)
}
