//! The correlated result accumulator
//!
//! `CorrelatedResult` is the engine's only owned mutable value. It is
//! created at correlation start, filled in as matching events arrive,
//! and consumed the moment it becomes complete. One result per session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pod::PodState;
use crate::run::RunState;

/// Correlated record of a run and the pod that executed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelatedResult {
    /// Namespace the run was submitted to
    pub namespace: String,
    /// Run name, known at submission time
    pub run_name: String,
    /// Assigned pod name; empty until a placement event arrives
    pub pod_name: String,
    /// Pod start time, when the placement event carried one
    pub pod_start_time: Option<DateTime<Utc>>,
}

impl CorrelatedResult {
    /// Seed an accumulator with the identity known at submission time
    pub fn new(namespace: impl Into<String>, run_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            run_name: run_name.into(),
            pod_name: String::new(),
            pod_start_time: None,
        }
    }

    /// Completeness invariant: the pod assignment is the only field that
    /// is genuinely asynchronous, so the result is complete exactly when
    /// the pod name is known.
    pub fn is_complete(&self) -> bool {
        !self.pod_name.is_empty()
    }

    /// Record a run lifecycle event.
    ///
    /// Re-asserts the run name from the event. Never affects completeness.
    pub fn record_run(&mut self, state: &RunState) {
        if !state.name.is_empty() {
            self.run_name = state.name.clone();
        }
    }

    /// Record a pod placement event.
    ///
    /// Monotonic: once a pod name is recorded, later events never clear
    /// or replace it.
    pub fn record_pod(&mut self, pod: &PodState) {
        if self.is_complete() {
            return;
        }
        self.pod_name = pod.name.clone();
        self.pod_start_time = pod.started_at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_fresh_result_is_incomplete() {
        let result = CorrelatedResult::new("default", "run-1");
        assert!(!result.is_complete());
        assert_eq!(result.run_name, "run-1");
    }

    #[test]
    fn test_pod_event_completes() {
        let mut result = CorrelatedResult::new("default", "run-1");
        let started = Utc::now();
        result.record_pod(&PodState::owned_by("pod-a", "run-1", started));
        assert!(result.is_complete());
        assert_eq!(result.pod_name, "pod-a");
        assert_eq!(result.pod_start_time, Some(started));
    }

    #[test]
    fn test_pod_recording_is_monotonic() {
        let mut result = CorrelatedResult::new("default", "run-1");
        let first = Utc::now();
        result.record_pod(&PodState::owned_by("pod-a", "run-1", first));
        result.record_pod(&PodState::owned_by("pod-b", "run-1", Utc::now()));
        assert_eq!(result.pod_name, "pod-a");
        assert_eq!(result.pod_start_time, Some(first));
    }

    #[test]
    fn test_run_event_does_not_complete() {
        let mut result = CorrelatedResult::new("default", "run-1");
        result.record_run(&RunState::new("run-1", "default"));
        assert!(!result.is_complete());
    }

    #[test]
    fn test_run_event_with_empty_name_is_ignored() {
        let mut result = CorrelatedResult::new("default", "run-1");
        result.record_run(&RunState::new("", "default"));
        assert_eq!(result.run_name, "run-1");
    }

    #[test]
    fn test_serialization_shape() {
        let mut result = CorrelatedResult::new("default", "run-1");
        result.record_pod(&PodState {
            name: "pod-a".to_string(),
            owner_run: Some("run-1".to_string()),
            started_at: None,
        });
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["namespace"], "default");
        assert_eq!(json["run_name"], "run-1");
        assert_eq!(json["pod_name"], "pod-a");
        assert!(json["pod_start_time"].is_null());
    }
}
