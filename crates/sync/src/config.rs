use std::time::Duration;

/// Default debounce window for coalescing sync triggers.
const DEFAULT_DEBOUNCE_MS: u64 = 3000;

/// Orchestrator configuration, supplied at construction.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Quiet period after the last trigger before a debounced sync fires.
    pub debounce: Duration,
    /// When false, `trigger_sync` is a no-op and `trigger_sync_and_wait`
    /// runs an immediate synchronous cycle.
    pub auto_sync_enabled: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            auto_sync_enabled: true,
        }
    }
}

impl SyncConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var             | Default |
    /// |---------------------|---------|
    /// | `SYNC_DEBOUNCE_MS`  | `3000`  |
    /// | `AUTO_SYNC_ENABLED` | `true`  |
    pub fn from_env() -> Self {
        let debounce_ms: u64 = std::env::var("SYNC_DEBOUNCE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_DEBOUNCE_MS);

        let auto_sync_enabled = std::env::var("AUTO_SYNC_ENABLED")
            .map(|v| !matches!(v.trim(), "false" | "0" | "no"))
            .unwrap_or(true);

        Self {
            debounce: Duration::from_millis(debounce_ms),
            auto_sync_enabled,
        }
    }
}
