//! Run Suite Use Case
//!
//! Runs every fixture in a directory, one after another.

use std::path::Path;
use std::sync::Arc;

use crate::error::HarnessResult;
use crate::image::ImageCompareConfig;
use crate::loader::LoadFixtures;
use crate::options::RunOptions;
use crate::ports::{Exchange, FileSystem, ImageDiff};
use crate::run_test::{RunTest, Verdict};

/// Summary of a directory run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteReport {
    /// Names of fixtures that matched.
    pub passed: Vec<String>,
    /// Names of fixtures that were rewritten.
    pub updated: Vec<String>,
    /// Names of failed fixtures with the failure message.
    pub failed: Vec<(String, String)>,
}

impl SuiteReport {
    /// Returns true if no fixture failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total number of fixtures run.
    #[must_use]
    pub fn total(&self) -> usize {
        self.passed.len() + self.updated.len() + self.failed.len()
    }
}

/// Loads and runs a fixture directory.
pub struct RunSuite<E: Exchange, F: FileSystem, D: ImageDiff> {
    loader: LoadFixtures<F>,
    run_test: RunTest<E, F, D>,
}

impl<E: Exchange, F: FileSystem, D: ImageDiff> RunSuite<E, F, D> {
    /// Creates the use case from its ports.
    pub fn new(exchange: Arc<E>, fs: Arc<F>, diff: Arc<D>, images: ImageCompareConfig) -> Self {
        Self {
            loader: LoadFixtures::new(Arc::clone(&fs)),
            run_test: RunTest::new(exchange, fs, diff, images),
        }
    }

    /// Runs every fixture in `dir` in sorted order.
    ///
    /// A failing fixture is recorded and the run continues.
    ///
    /// # Errors
    ///
    /// Returns an error only if the directory cannot be listed.
    pub async fn run(&self, dir: &Path, options: &RunOptions) -> HarnessResult<SuiteReport> {
        let tests = self.loader.load(dir).await?;
        let mut report = SuiteReport::default();

        for test in &tests {
            match self.run_test.run(test, options).await {
                Ok(run) => match run.verdict {
                    Verdict::Passed => {
                        tracing::info!(fixture = %test.id, "{}", test.name);
                        report.passed.push(test.name.clone());
                    }
                    Verdict::Updated(reason) => {
                        tracing::info!(fixture = %test.id, %reason, "{} (updated)", test.name);
                        report.updated.push(test.name.clone());
                    }
                },
                Err(e) => {
                    tracing::error!(fixture = %test.id, error = %e, "{} failed", test.name);
                    report.failed.push((test.name.clone(), e.to_string()));
                }
            }
        }

        tracing::info!(
            passed = report.passed.len(),
            updated = report.updated.len(),
            failed = report.failed.len(),
            "suite finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_success_and_total() {
        let mut report = SuiteReport::default();
        assert!(report.is_success());
        assert_eq!(report.total(), 0);

        report.passed.push("a".into());
        report.updated.push("b".into());
        assert!(report.is_success());

        report.failed.push(("c".into(), "boom".into()));
        assert!(!report.is_success());
        assert_eq!(report.total(), 3);
    }
}
