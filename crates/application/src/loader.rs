//! Fixture discovery

use std::path::Path;
use std::sync::Arc;

use replay_domain::{Fixture, TestDescriptor, is_fixture_file_name};

use crate::error::HarnessResult;
use crate::ports::FileSystem;

/// Loads every fixture in a directory.
pub struct LoadFixtures<F: FileSystem> {
    fs: Arc<F>,
}

impl<F: FileSystem> LoadFixtures<F> {
    /// Creates a loader reading through `fs`.
    pub const fn new(fs: Arc<F>) -> Self {
        Self { fs }
    }

    /// Returns one descriptor per fixture file, in sorted path order.
    ///
    /// Hidden entries, sidecar bodies and other assets are skipped. A fixture
    /// that cannot be read or parsed is logged and skipped so the rest of the
    /// directory still runs.
    ///
    /// # Errors
    ///
    /// Returns an error only if the directory itself cannot be listed.
    pub async fn load(&self, dir: &Path) -> HarnessResult<Vec<TestDescriptor>> {
        let entries = self.fs.read_dir(dir).await?;
        let mut tests = Vec::with_capacity(entries.len());

        for path in entries {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !is_fixture_file_name(name) || !self.fs.is_file(&path).await {
                continue;
            }

            let text = match self.fs.read_file_string(&path).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "failed to read fixture");
                    continue;
                }
            };
            match Fixture::from_json(&text) {
                Ok(fixture) => tests.push(TestDescriptor::new(path, fixture)),
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "failed to parse fixture");
                }
            }
        }

        tracing::debug!(dir = %dir.display(), count = tests.len(), "loaded fixtures");
        Ok(tests)
    }
}
