//! Pixel difference adapter using GraphicsMagick.
//!
//! Runs `gm compare -metric mse <reference> <candidate>` and reads the
//! `Total:` line of its report.

use std::path::{Path, PathBuf};

use replay_application::ports::{ImageDiff, ImageDiffError, ImageDiffReport};
use tokio::process::Command;

/// Default GraphicsMagick executable.
pub const DEFAULT_GM_BINARY: &str = "gm";

/// `ImageDiff` backed by the GraphicsMagick command line.
#[derive(Debug, Clone)]
pub struct GraphicsMagickDiff {
    binary: PathBuf,
}

impl GraphicsMagickDiff {
    /// Creates an adapter running `binary`.
    #[must_use]
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for GraphicsMagickDiff {
    fn default() -> Self {
        Self::new(DEFAULT_GM_BINARY)
    }
}

/// Extracts the total MSE from a `gm compare` report.
fn parse_total(report: &str) -> Option<f64> {
    report.lines().find_map(|line| {
        let rest = line.trim_start().strip_prefix("Total:")?;
        rest.split_whitespace().next()?.parse().ok()
    })
}

impl ImageDiff for GraphicsMagickDiff {
    async fn compare(
        &self,
        reference: &Path,
        candidate: &Path,
        tolerance: f64,
    ) -> Result<ImageDiffReport, ImageDiffError> {
        let output = Command::new(&self.binary)
            .arg("compare")
            .args(["-metric", "mse"])
            .arg(reference)
            .arg(candidate)
            .output()
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ImageDiffError::Tool(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                stderr.trim()
            )));
        }

        let equality = parse_total(&stdout).ok_or_else(|| {
            ImageDiffError::Tool(format!("unreadable compare report: {}", stdout.trim()))
        })?;
        tracing::debug!(reference = %reference.display(), equality, "image compared");

        Ok(ImageDiffReport {
            is_equal: equality <= tolerance,
            equality,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "Image Difference (MeanSquaredError):
           Normalized    Absolute
          ============  ==========
     Red: 0.0000120000        0.8
   Green: 0.0000000000        0.0
    Blue: 0.0000000000        0.0
   Total: 0.0000040000        0.3
";

    #[test]
    fn test_parse_total() {
        let total = parse_total(REPORT).unwrap();
        assert!((total - 0.000_004).abs() < 1e-12);
    }

    #[test]
    fn test_parse_total_missing() {
        assert_eq!(parse_total("gm compare: unable to open image"), None);
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let diff = GraphicsMagickDiff::new("/nonexistent/replay-gm");
        let err = diff
            .compare(Path::new("a.png"), Path::new("b.png"), 0.008)
            .await
            .unwrap_err();
        assert!(matches!(err, ImageDiffError::Spawn(_)));
    }
}
