//! Centralized timeout configuration
//!
//! Default timeout values; all of them can be overridden through [`Settings`].
//!
//! [`Settings`]: super::Settings

use std::time::Duration;

/// Default timeout values for model endpoint calls
pub mod llm {
    use super::*;

    /// Default connection timeout for chat endpoints (30 seconds)
    pub const CONNECTION_SECS: u64 = 30;

    /// Default per-request timeout for chat endpoints (120 seconds)
    pub const REQUEST_SECS: u64 = 120;

    /// Get connection timeout as Duration
    pub fn connection_timeout() -> Duration {
        Duration::from_secs(CONNECTION_SECS)
    }

    /// Get request timeout as Duration
    pub fn request_timeout() -> Duration {
        Duration::from_secs(REQUEST_SECS)
    }
}

/// Default intervals for run supervision
pub mod run {
    use super::*;

    /// How often a watcher polls a run for progress (500 ms)
    pub const POLL_INTERVAL_MS: u64 = 500;

    /// Get poll interval as Duration
    pub fn poll_interval() -> Duration {
        Duration::from_millis(POLL_INTERVAL_MS)
    }
}
