// Platform-facing types shared by directory backends

pub mod filesystem;
