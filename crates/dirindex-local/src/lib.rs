// Local filesystem backend

pub mod filesystem;

pub use filesystem::LocalDirectory;
