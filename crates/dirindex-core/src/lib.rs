// Directory listing construction and rendering

pub mod collector;
pub mod config;
pub mod escape;
pub mod format;
pub mod handler;
pub mod listing;
pub mod markup;
pub mod paths;
pub mod response;
pub mod structured;
pub mod timestamp;

pub use dirindex_platform::filesystem::{DirectoryHandle, DirectoryReadError, Entry};
