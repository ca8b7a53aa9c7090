//! Pod placement snapshots
//!
//! A `PodState` describes a pod the control plane placed for some run.
//! The owning run is derived from the `podtrace/owned-by-run` label on
//! the placement object; it can be absent if the object was created
//! outside podtrace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of a pod placement object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodState {
    /// Pod name
    pub name: String,
    /// Name of the run this pod executes, from the owning-run label
    pub owner_run: Option<String>,
    /// Pod start time, once the control plane records it
    pub started_at: Option<DateTime<Utc>>,
}

impl PodState {
    /// Create a placement snapshot owned by the given run
    pub fn owned_by(
        name: impl Into<String>,
        run: impl Into<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            owner_run: Some(run.into()),
            started_at: Some(started_at),
        }
    }

    /// True when this pod's owning-run label matches the given run name
    ///
    /// An absent label counts as a match: a correctly-scoped watch only
    /// delivers pods for the awaited run, so a missing label is trusted.
    pub fn owned_by_run(&self, run_name: &str) -> bool {
        match &self.owner_run {
            Some(owner) => owner == run_name,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_owner_match() {
        let pod = PodState::owned_by("pod-a", "run-1", Utc::now());
        assert!(pod.owned_by_run("run-1"));
        assert!(!pod.owned_by_run("run-2"));
    }

    #[test]
    fn test_absent_owner_is_trusted() {
        let pod = PodState {
            name: "pod-a".to_string(),
            owner_run: None,
            started_at: None,
        };
        assert!(pod.owned_by_run("run-1"));
    }
}
