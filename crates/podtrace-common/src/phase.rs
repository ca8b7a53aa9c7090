//! Run lifecycle phases and the terminal-state predicate
//!
//! Provides a shared `RunPhase` enum used in run snapshots, replacing
//! string-based phase values from the control plane.

use serde::{Deserialize, Serialize};

/// Lifecycle phase of a run as reported by the control plane
///
/// These values are stable wire names:
/// - `Pending`: Accepted, no pod assigned yet
/// - `Running`: Executing on an assigned pod
/// - `Succeeded`: Finished successfully
/// - `Failed`: Finished with an error
/// - `Cancelled`: Stopped before completion
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum RunPhase {
    /// Accepted, not yet scheduled
    #[strum(serialize = "pending")]
    Pending,
    /// Currently executing
    #[strum(serialize = "running")]
    Running,
    /// Successfully completed
    #[strum(serialize = "succeeded", serialize = "complete")]
    Succeeded,
    /// Failed with error
    #[strum(serialize = "failed", serialize = "error")]
    Failed,
    /// Cancelled before completion
    #[strum(serialize = "cancelled", serialize = "canceled")]
    Cancelled,
}

impl RunPhase {
    /// Check if the phase represents a terminal state
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }

    /// Parse from string, returning None for unknown values
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}
