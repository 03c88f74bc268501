//! Adapters for the harness ports.

mod graphicsmagick;
mod reqwest_exchange;
mod system_clock;

pub use graphicsmagick::{DEFAULT_GM_BINARY, GraphicsMagickDiff};
pub use reqwest_exchange::ReqwestExchange;
pub use system_clock::SystemClock;
