//! Replay Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod persistence;

pub use adapters::{DEFAULT_GM_BINARY, GraphicsMagickDiff, ReqwestExchange, SystemClock};
pub use persistence::TokioFileSystem;
