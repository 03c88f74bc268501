//! Per-run configuration

use crate::clean::CleanRegistry;
use crate::tokens::TokenHandlers;

/// Options threaded through every fixture run.
///
/// `update_fixtures` is set once for a whole run and turns recoverable
/// mismatches into fixture rewrites.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Rewrite fixtures on mismatch instead of failing.
    pub update_fixtures: bool,
    /// Cleaners for nondeterministic fields.
    pub clean: CleanRegistry,
    /// Token handlers for request placeholders.
    pub handlers: TokenHandlers,
}

impl RunOptions {
    /// Creates options with update mode off, no cleaners and no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets update mode.
    #[must_use]
    pub fn with_update_fixtures(mut self, update: bool) -> Self {
        self.update_fixtures = update;
        self
    }

    /// Sets the cleaners.
    #[must_use]
    pub fn with_clean(mut self, clean: CleanRegistry) -> Self {
        self.clean = clean;
        self
    }

    /// Sets the token handlers.
    #[must_use]
    pub fn with_handlers(mut self, handlers: TokenHandlers) -> Self {
        self.handlers = handlers;
        self
    }
}
