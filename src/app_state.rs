// =============================================================================
// Central Application State
// =============================================================================
//
// Shared by every request handler via `Arc<AppState>`.
//
// Thread safety:
//   - Atomic counters for lock-free version and request tracking.
//   - parking_lot::RwLock around the runtime configuration. Handlers copy the
//     parameters they need out of the lock before computing anything.
// =============================================================================

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::runtime_config::RuntimeConfig;

pub struct AppState {
    /// Incremented whenever the runtime configuration changes.
    pub state_version: AtomicU64,

    /// Number of computation requests answered since startup.
    pub requests_served: AtomicU64,

    pub runtime_config: Arc<RwLock<RuntimeConfig>>,

    /// Where configuration updates are persisted.
    pub config_path: PathBuf,

    /// Bearer token for the configuration endpoints. `None` disables them.
    pub admin_token: Option<String>,

    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: RuntimeConfig, config_path: impl Into<PathBuf>, admin_token: Option<String>) -> Self {
        Self {
            state_version: AtomicU64::new(1),
            requests_served: AtomicU64::new(0),
            runtime_config: Arc::new(RwLock::new(config)),
            config_path: config_path.into(),
            admin_token: admin_token.filter(|t| !t.is_empty()),
            start_time: std::time::Instant::now(),
        }
    }

    /// Atomically increment the state version.
    pub fn increment_version(&self) -> u64 {
        self.state_version.fetch_add(1, Ordering::SeqCst)
    }

    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::SeqCst)
    }

    /// Count one served computation request.
    pub fn record_request(&self) {
        self.requests_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests_served(&self) -> u64 {
        self.requests_served.load(Ordering::Relaxed)
    }

    /// Snapshot of the current configuration; the lock is released on return.
    pub fn config_snapshot(&self) -> RuntimeConfig {
        self.runtime_config.read().clone()
    }
}
