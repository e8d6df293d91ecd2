use std::time::SystemTime;

use serde::Serialize;

use dirindex_platform::filesystem::Entry;

use crate::paths::join_display_path;

/// Classification shared by both renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryClass {
    File,
    Dir,
}

impl EntryClass {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryClass::File => "file",
            EntryClass::Dir => "dir",
        }
    }
}

/// A classified directory member with its link target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Raw, unescaped name
    pub name: String,
    /// Request path joined with the name, unescaped
    pub display_path: String,
    pub class: EntryClass,
    /// Byte size; always 0 for directories
    pub size: u64,
    pub modified_at: SystemTime,
}

impl ListingEntry {
    fn from_entry(entry: Entry, current_path: &str) -> Self {
        let display_path = join_display_path(current_path, &entry.name);
        let (class, size) = if entry.is_dir {
            (EntryClass::Dir, 0)
        } else {
            (EntryClass::File, entry.size)
        };

        Self {
            name: entry.name,
            display_path,
            class,
            size,
            modified_at: entry.modified_at,
        }
    }

    /// `"<N> bytes"` for files, `None` for directories
    pub fn size_label(&self) -> Option<String> {
        match self.class {
            EntryClass::File => Some(format!("{} bytes", self.size)),
            EntryClass::Dir => None,
        }
    }

    /// Descriptive text shown next to the link: `dir` or `file, 5 bytes`
    pub fn aux_text(&self) -> String {
        match self.size_label() {
            Some(size) => format!("{}, {}", self.class.as_str(), size),
            None => self.class.as_str().to_string(),
        }
    }
}

/// The request-scoped, sorted view of one directory.
///
/// Built fresh for every request and dropped once the response is rendered.
#[derive(Debug, Clone)]
pub struct Listing {
    current_path: String,
    parent_target: String,
    at_root: bool,
    entries: Vec<ListingEntry>,
}

impl Listing {
    /// Sort `entries` by name (byte-wise) and classify them under `current_path`.
    pub fn build(mut entries: Vec<Entry>, current_path: &str) -> Self {
        // String ordering is ordinal over UTF-8 bytes, not locale-aware
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        let trimmed = current_path.strip_suffix('/').unwrap_or(current_path);
        let at_root = trimmed.len() <= 1;
        let parent_target = format!("{}/..", current_path.trim_end_matches('/'));

        let entries = entries
            .into_iter()
            .map(|e| ListingEntry::from_entry(e, current_path))
            .collect();

        Self {
            current_path: current_path.to_string(),
            parent_target,
            at_root,
            entries,
        }
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    /// The "up one level" link, absent at the root.
    pub fn parent_path(&self) -> Option<&str> {
        if self.at_root {
            None
        } else {
            Some(&self.parent_target)
        }
    }

    /// The up link target computed regardless of depth (`/..` at the root).
    pub fn parent_target(&self) -> &str {
        &self.parent_target
    }

    pub fn is_root(&self) -> bool {
        self.at_root
    }

    pub fn entries(&self) -> &[ListingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
