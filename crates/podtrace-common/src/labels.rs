//! Label keys stamped on podtrace-created control-plane objects
//!
//! Pod placement objects carry these labels so that watch subscriptions
//! can be scoped to a single run.
//!
//! ## Label Schema
//!
//! | Label Key | Description |
//! |-----------|-------------|
//! | `podtrace/tool` | Static identifier ("podtrace") |
//! | `podtrace/owned-by-run` | Name of the run the pod executes |

/// Label key for tool identification - all podtrace resources carry this
pub const LABEL_TOOL: &str = "podtrace/tool";

/// Label value for tool identification
pub const LABEL_TOOL_VALUE: &str = "podtrace";

/// Label key identifying the run a pod placement belongs to
pub const LABEL_OWNED_BY_RUN: &str = "podtrace/owned-by-run";

/// Format the owning-run label selector for a run name
pub fn owned_by_selector(run_name: &str) -> String {
    format!("{}={}", LABEL_OWNED_BY_RUN, run_name)
}
