//! Pixel difference port

use std::future::Future;
use std::path::Path;

/// Result of a pixel comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageDiffReport {
    /// Whether the images are equal within tolerance.
    pub is_equal: bool,
    /// Normalized difference score reported by the utility (0 means identical).
    pub equality: f64,
}

/// Errors raised by the pixel difference utility.
#[derive(Debug, thiserror::Error)]
pub enum ImageDiffError {
    /// The utility could not be started.
    #[error("failed to run image diff utility: {0}")]
    Spawn(#[from] std::io::Error),

    /// The utility ran but failed or produced unreadable output.
    #[error("image diff utility failed: {0}")]
    Tool(String),
}

/// Port for an external image comparison utility.
pub trait ImageDiff: Send + Sync {
    /// Compares two image files with the given tolerance.
    ///
    /// # Errors
    ///
    /// Returns an error if the utility cannot run or its output cannot be read.
    fn compare(
        &self,
        reference: &Path,
        candidate: &Path,
        tolerance: f64,
    ) -> impl Future<Output = Result<ImageDiffReport, ImageDiffError>> + Send;
}
