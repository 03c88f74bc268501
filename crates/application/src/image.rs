//! Image comparison with tolerance
//!
//! Images are first checked by size, then staged under a content-hash name
//! and handed to the external pixel difference utility.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::ports::{FileSystem, FileSystemError, ImageDiff, ImageDiffError};

/// Default pixel difference tolerance.
pub const DEFAULT_TOLERANCE: f64 = 0.008;

/// Default maximum relative size difference before pixel comparison.
pub const DEFAULT_MAX_SIZE_DELTA: f64 = 0.10;

/// Image comparison settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCompareConfig {
    /// Directory where actual images are staged. Shared by all comparisons.
    pub staging_dir: PathBuf,
    /// Maximum equality score accepted from the diff utility.
    pub tolerance: f64,
    /// Maximum relative byte-size difference.
    pub max_size_delta: f64,
}

impl Default for ImageCompareConfig {
    fn default() -> Self {
        Self {
            staging_dir: std::env::temp_dir().join("replay-image-compare"),
            tolerance: DEFAULT_TOLERANCE,
            max_size_delta: DEFAULT_MAX_SIZE_DELTA,
        }
    }
}

/// Errors raised by the image comparator.
#[derive(Debug, Error)]
pub enum ImageCompareError {
    /// The byte sizes differ by more than the allowed ratio.
    #[error("Image size is too different from fixture: {actual} vs. {reference}")]
    SizeDelta {
        /// Actual image size.
        actual: u64,
        /// Reference image size.
        reference: u64,
    },

    /// The pixel difference exceeds the tolerance.
    #[error("Image is too different from fixture: {equality} > {tolerance}")]
    TooDifferent {
        /// Reported equality score.
        equality: f64,
        /// Configured tolerance.
        tolerance: f64,
    },

    /// The reference could not be read or the staging file not written.
    #[error(transparent)]
    FileSystem(#[from] FileSystemError),

    /// The diff utility failed.
    #[error(transparent)]
    Diff(#[from] ImageDiffError),
}

impl ImageCompareError {
    /// Returns true if the error describes a difference rather than a failure to compare.
    #[must_use]
    pub const fn is_mismatch(&self) -> bool {
        matches!(self, Self::SizeDelta { .. } | Self::TooDifferent { .. })
    }
}

/// Compares image bytes against reference files.
pub struct ImageComparator<F: FileSystem, D: ImageDiff> {
    fs: Arc<F>,
    diff: Arc<D>,
    config: ImageCompareConfig,
}

impl<F: FileSystem, D: ImageDiff> ImageComparator<F, D> {
    /// Creates a comparator.
    pub const fn new(fs: Arc<F>, diff: Arc<D>, config: ImageCompareConfig) -> Self {
        Self { fs, diff, config }
    }

    /// Compares `actual` against the image at `reference`.
    ///
    /// # Errors
    ///
    /// `SizeDelta` and `TooDifferent` report a difference; the other variants
    /// mean the comparison could not be carried out.
    pub async fn compare(&self, actual: &[u8], reference: &Path) -> Result<(), ImageCompareError> {
        let reference_size = self.fs.file_size(reference).await?;
        let actual_size = actual.len() as u64;
        if size_delta(actual_size, reference_size) > self.config.max_size_delta {
            return Err(ImageCompareError::SizeDelta {
                actual: actual_size,
                reference: reference_size,
            });
        }

        let staged = self.stage(actual).await?;
        let report = self
            .diff
            .compare(reference, &staged, self.config.tolerance)
            .await?;

        if report.is_equal && report.equality <= self.config.tolerance {
            Ok(())
        } else {
            Err(ImageCompareError::TooDifferent {
                equality: report.equality,
                tolerance: self.config.tolerance,
            })
        }
    }

    /// Writes `bytes` to the staging directory under their content hash.
    ///
    /// The bytes go to a uniquely named temp file that is then renamed over
    /// the hash name, so a staged file is always complete and concurrent
    /// stagings of the same bytes converge.
    async fn stage(&self, bytes: &[u8]) -> Result<PathBuf, FileSystemError> {
        self.fs.create_dir_all(&self.config.staging_dir).await?;
        let hash = content_hash(bytes);
        let path = self.config.staging_dir.join(&hash);
        let pending = self
            .config
            .staging_dir
            .join(format!("{hash}.{}.tmp", Uuid::new_v4().simple()));
        self.fs.write_file(&pending, bytes).await?;
        self.fs.rename(&pending, &path).await?;
        Ok(path)
    }
}

/// Hex SHA-256 of `bytes`.
#[must_use]
pub fn content_hash(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

#[allow(clippy::cast_precision_loss)]
fn size_delta(actual: u64, reference: u64) -> f64 {
    if reference == 0 {
        return if actual == 0 { 0.0 } else { f64::INFINITY };
    }
    actual.abs_diff(reference) as f64 / reference as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_delta() {
        assert!((size_delta(1000, 1000) - 0.0).abs() < f64::EPSILON);
        assert!((size_delta(1100, 1000) - 0.1).abs() < 1e-9);
        assert!((size_delta(2000, 1000) - 1.0).abs() < f64::EPSILON);
        assert!(size_delta(10, 0).is_infinite());
        assert!((size_delta(0, 0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_content_hash_is_stable() {
        assert_eq!(content_hash(b"png"), content_hash(b"png"));
        assert_ne!(content_hash(b"png"), content_hash(b"jpg"));
        assert_eq!(
            content_hash(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_mismatch_classification() {
        assert!(
            ImageCompareError::SizeDelta {
                actual: 2,
                reference: 1
            }
            .is_mismatch()
        );
        assert!(!ImageCompareError::Diff(ImageDiffError::Tool("gone".into())).is_mismatch());
    }
}
