//! Engine configuration.
//!
//! Controls the debounce window that coalesces mutation-driven reconciliation.
//! Configuration can be loaded from environment variables or constructed
//! programmatically.

use core::time::Duration;
use std::env;

/// Default debounce delay for mutation-driven passes, in milliseconds.
const DEFAULT_DEBOUNCE_MS: u64 = 120;

/// Runtime configuration for the reconciliation engine.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Debounce window in milliseconds for mutation-triggered passes.
    pub debounce_ms: u64,
}

impl EngineConfig {
    /// Construct a config with an explicit debounce window (minimum 1ms).
    #[inline]
    #[must_use]
    pub const fn new(debounce_ms: u64) -> Self {
        let debounce_ms = if debounce_ms < 1 { 1 } else { debounce_ms };
        Self { debounce_ms }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `SCALEMARK_DEBOUNCE_MS` (default: 120, minimum: 1).
    #[inline]
    #[must_use]
    pub fn from_env() -> Self {
        let debounce_ms = env::var("SCALEMARK_DEBOUNCE_MS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_DEBOUNCE_MS)
            .max(1);
        Self { debounce_ms }
    }

    /// The debounce window as a `Duration`.
    #[inline]
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}
