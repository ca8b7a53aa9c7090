//! Configuration types for a correlation session

use std::time::Duration;

use podtrace_common::defaults::{DEFAULT_NAMESPACE, DEFAULT_POLL_INTERVAL_MS};

/// How a session determines the pod assigned to a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum TrackMode {
    /// Poll run state until terminal, then read the pod off the final snapshot
    #[default]
    Wait,
    /// Watch run and pod events live, emit the instant the pod is known
    Watch,
}

/// Configuration for one correlation session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Target namespace, read once at session start
    pub namespace: String,
    /// Tracking variant
    pub mode: TrackMode,
    /// Polling cadence for wait mode
    pub poll_interval: Duration,
    /// Delete the run after a completed session
    pub delete_run: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            mode: TrackMode::Wait,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            delete_run: false,
        }
    }
}

impl SessionConfig {
    /// Session config for the given namespace, other fields defaulted
    pub fn for_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Set the tracking mode
    pub fn with_mode(mut self, mode: TrackMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the wait-mode polling cadence
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}
