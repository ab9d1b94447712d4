//! Shared application state for the ProbViz server.

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::Instant;

/// Shared state available to all request handlers.
pub struct AppState {
    /// Server start time (for uptime reporting).
    pub started_at: Instant,

    /// In-flight request counter.
    pub inflight: AtomicU64,

    /// Total requests served (for /api/health).
    pub total_requests: AtomicU64,

    /// Upper bound on `size` for the sampling endpoints.
    pub max_sample_size: usize,
}

impl AppState {
    pub fn new(max_sample_size: usize) -> Self {
        Self {
            started_at: Instant::now(),
            inflight: AtomicU64::new(0),
            total_requests: AtomicU64::new(0),
            max_sample_size: max_sample_size.max(1),
        }
    }
}

/// Type alias used in axum handlers.
pub type SharedState = Arc<AppState>;
