//! Test descriptors derived from fixture files.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::body_kind::BodyKind;
use crate::fixture::Fixture;

/// Extensions of files that live next to fixtures but are not fixtures.
const NON_FIXTURE_EXTENSIONS: &[&str] = &[
    "js", "json", "jsonp", "txt", "png", "jpg", "pbf", "css", "swp", "html", "kml", "body",
];

/// Returns true if a directory entry name should be parsed as a fixture.
///
/// Hidden entries and sidecar/asset extensions are skipped.
#[must_use]
pub fn is_fixture_file_name(name: &str) -> bool {
    if name.starts_with('.') {
        return false;
    }
    match name.rsplit_once('.') {
        Some((_, ext)) => !NON_FIXTURE_EXTENSIONS.contains(&ext),
        None => true,
    }
}

/// One runnable test, derived from a fixture file.
#[derive(Debug, Clone, PartialEq)]
pub struct TestDescriptor {
    /// Basename of the fixture file.
    pub id: String,
    /// Display name: status, method prefix and basename.
    pub name: String,
    /// Path of the fixture file.
    pub path: PathBuf,
    /// Parsed fixture.
    pub fixture: Fixture,
}

impl TestDescriptor {
    /// Builds a descriptor for a parsed fixture.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, fixture: Fixture) -> Self {
        let path = path.into();
        let id = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let method: String = fixture.request.method.chars().take(3).collect();
        let name = format!(
            "{} {} - {}",
            fixture.response.status_code,
            method.to_ascii_uppercase(),
            id
        );

        Self {
            id,
            name,
            path,
            fixture,
        }
    }

    /// Path of the sidecar body file for the given kind.
    #[must_use]
    pub fn sidecar_path(&self, kind: BodyKind) -> PathBuf {
        sidecar_path(&self.path, kind)
    }
}

/// Appends the kind's extension to the fixture path.
#[must_use]
pub fn sidecar_path(fixture_path: &Path, kind: BodyKind) -> PathBuf {
    let mut name = OsString::from(fixture_path.as_os_str());
    name.push(kind.extension());
    PathBuf::from(name)
}
