//! Replay Domain - Fixture and response types
//!
//! This crate defines the data model of the fixture harness: recorded
//! fixtures, resolved requests, observed responses and the closed set of
//! body kinds used to pick a comparison strategy.
//! All types here are pure Rust with no I/O dependencies.

pub mod body_kind;
pub mod descriptor;
pub mod error;
pub mod fixture;
pub mod jsonp;
pub mod request;
pub mod response;
pub mod serialization;

pub use body_kind::BodyKind;
pub use descriptor::{TestDescriptor, is_fixture_file_name};
pub use error::{DomainError, DomainResult};
pub use fixture::{Fixture, FixtureRequest, FixtureResponse, Headers};
pub use jsonp::JsonpPayload;
pub use request::ResolvedRequest;
pub use response::ActualResponse;
pub use serialization::{SerializationError, canonicalize, to_json_stable};
