//! Replay Application - Harness use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits for the HTTP exchange, file access, image diffing and time
//! - Token resolution, cleaning and body comparison
//! - The run-test and run-suite use cases, including fixture rewriting

pub mod clean;
pub mod comparison;
pub mod error;
pub mod image;
pub mod loader;
pub mod options;
pub mod ports;
pub mod run_suite;
pub mod tokens;
pub mod updater;

pub use clean::CleanRegistry;
pub use comparison::{BodyComparator, ComparisonOutcome, ExpectedBody, MismatchReason};
pub use error::{HarnessError, HarnessResult};
pub use image::{ImageCompareConfig, ImageCompareError, ImageComparator};
pub use loader::LoadFixtures;
pub use options::RunOptions;
pub use run_suite::{RunSuite, SuiteReport};
pub use run_test::{DEFAULT_USER_AGENT, RunTest, TestRun, Verdict};
pub use tokens::{TokenHandler, TokenHandlers, TokenResolver};
pub use updater::FixtureUpdater;
