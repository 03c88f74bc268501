//! Fixture rewriting for update mode
//!
//! When update mode is on and a recoverable mismatch is seen, the fixture
//! is rewritten to match the observed response. A sidecar body, if any, is
//! written before the fixture document itself.

use std::sync::Arc;

use replay_domain::{
    ActualResponse, BodyKind, Fixture, JsonpPayload, TestDescriptor, canonicalize, to_json_stable,
};
use serde_json::Value;

use crate::clean::CleanRegistry;
use crate::comparison::MismatchReason;
use crate::error::{HarnessError, HarnessResult};
use crate::ports::FileSystem;

/// Rewrites fixture files from observed responses.
pub struct FixtureUpdater<F: FileSystem> {
    fs: Arc<F>,
}

impl<F: FileSystem> FixtureUpdater<F> {
    /// Creates an updater writing through `fs`.
    pub const fn new(fs: Arc<F>) -> Self {
        Self { fs }
    }

    /// Rewrites the fixture behind `test` so it records `actual`.
    ///
    /// Status and headers are always replaced. The body goes inline or into
    /// a sidecar depending on `kind`. Returns the updated fixture record.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be written or the fixture cannot be serialized.
    pub async fn update(
        &self,
        test: &TestDescriptor,
        kind: BodyKind,
        actual: &ActualResponse,
        clean: &CleanRegistry,
        reason: &MismatchReason,
    ) -> HarnessResult<Fixture> {
        tracing::warn!(
            fixture = %test.id,
            path = %test.path.display(),
            %reason,
            "*** Updating fixtures (mismatch at {})",
            test.id
        );

        let mut fixture = test.fixture.clone();
        fixture.response.status_code = actual.status;
        fixture.response.headers = actual.headers.clone();

        let sidecar = test.sidecar_path(kind);
        match kind {
            BodyKind::Text => {
                fixture.response.body = Some(Value::String(actual.body_text().into_owned()));
            }
            BodyKind::Json => {
                let text = actual.body_text();
                fixture.response.body = Some(
                    serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text.into_owned())),
                );
            }
            BodyKind::Jsonp => {
                let text = actual.body_text();
                let contents = match JsonpPayload::parse(&text) {
                    Ok(mut body) => {
                        body.payload = canonicalize(&clean.clean_tree(body.payload));
                        body.to_pretty_string()
                    }
                    Err(e) => {
                        tracing::warn!(fixture = %test.id, error = %e, "writing unparsable JSONP body verbatim");
                        text.into_owned()
                    }
                };
                self.fs.write_file(&sidecar, contents.as_bytes()).await?;
                fixture.response.body = None;
            }
            BodyKind::Js | BodyKind::Css | BodyKind::Html => {
                self.fs.write_file(&sidecar, actual.body_text().as_bytes()).await?;
                fixture.response.body = None;
            }
            BodyKind::Png | BodyKind::Jpg | BodyKind::Pbf => {
                self.fs.write_file(&sidecar, &actual.body).await?;
                fixture.response.body = None;
            }
            BodyKind::Kml | BodyKind::Unclassified => {
                fixture.response.body = Some(Value::String(actual.body_text().into_owned()));
            }
        }

        let document = serde_json::to_value(&fixture)
            .map_err(|e| HarnessError::Serialization(e.into()))?;
        let document = canonicalize(&clean.clean_tree(document));
        let text = to_json_stable(&document)?;
        self.fs.write_file(&test.path, text.as_bytes()).await?;

        Ok(fixture)
    }
}
