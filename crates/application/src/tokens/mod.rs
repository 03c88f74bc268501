//! Request token resolution
//!
//! Fixture requests may embed `{handler_argument}` tokens anywhere in their
//! serialized form. Before a request is sent, each token is handed to the
//! handler registered under its name and replaced by the returned value.
//!
//! # Usage
//!
//! ```
//! use replay_application::tokens::{TokenHandlers, TokenResolver, from_fn};
//! use replay_domain::FixtureRequest;
//!
//! # tokio_test_block(async {
//! let handlers = TokenHandlers::new()
//!     .with("id", from_fn(|_, arg| Ok(arg.map(str::to_string))));
//!
//! let request = FixtureRequest::new("GET", "/user/{id_42}");
//! let resolved = TokenResolver::new(&handlers).resolve(&request).await.unwrap();
//! assert_eq!(resolved.path, "/user/42");
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
//! # }
//! ```

pub mod builtins;
pub mod handler;
pub mod resolver;

pub use builtins::{EnvHandler, TimestampHandler, UuidHandler};
pub use handler::{FnHandler, TokenError, TokenHandler, TokenHandlers, from_fn};
pub use resolver::TokenResolver;
