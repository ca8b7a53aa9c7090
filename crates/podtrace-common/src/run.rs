//! Run state snapshots
//!
//! A `RunState` is a read-only snapshot of a submitted run as reported by
//! the control plane. The engine never mutates one; it only evaluates the
//! terminal-state predicate and reads the pod assignment off it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::phase::RunPhase;

/// Snapshot of a run's state on the control plane
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    /// Unique run name, assigned at submission time
    pub name: String,
    /// Namespace the run lives in
    pub namespace: String,
    /// Lifecycle phase; `None` when the control plane has not reported one yet
    pub phase: Option<RunPhase>,
    /// Control-plane "done" flag, set alongside terminal phases
    #[serde(default)]
    pub done: bool,
    /// Name of the pod assigned to execute the run, once scheduled
    pub pod_name: Option<String>,
    /// Start time of the assigned pod, once known
    pub pod_start_time: Option<DateTime<Utc>>,
}

impl RunState {
    /// Create a fresh snapshot with no reported phase
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            phase: None,
            done: false,
            pod_name: None,
            pod_start_time: None,
        }
    }

    /// Terminal-state predicate: can this run still transition?
    ///
    /// True when the control plane set the done flag or reported a terminal
    /// phase. An absent or unknown phase is non-terminal; the safe default
    /// is to keep waiting. Total, never panics.
    pub fn is_terminal(&self) -> bool {
        self.done || self.phase.is_some_and(RunPhase::is_terminal)
    }
}
