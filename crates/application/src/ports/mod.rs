//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the harness core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod clock;
mod exchange;
mod file_system;
mod image_diff;

pub use clock::Clock;
pub use exchange::{Exchange, ExchangeError, ExpectedResponse};
pub use file_system::{FileSystem, FileSystemError};
pub use image_diff::{ImageDiff, ImageDiffError, ImageDiffReport};
