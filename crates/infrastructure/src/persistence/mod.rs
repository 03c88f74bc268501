//! File system persistence for fixtures, sidecars and staged images.

mod file_system;

pub use file_system::TokioFileSystem;
