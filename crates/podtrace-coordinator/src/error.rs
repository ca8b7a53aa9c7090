//! Session error taxonomy
//!
//! Typed errors for the correlation engine. Every fatal condition in a
//! session surfaces as exactly one of these; the engine never retries
//! and never swallows an error.

use podtrace_common::ClientError;
use thiserror::Error;

/// The two event channels a correlation session observes
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum WatchChannel {
    /// Run lifecycle events
    #[strum(serialize = "run")]
    Run,
    /// Pod placement events
    #[strum(serialize = "pod")]
    Pod,
}

/// Errors terminating a correlation session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A control-plane call failed (transport or not-found)
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A watch stream ended before the result was complete
    #[error("{channel} watch closed before a pod was correlated")]
    SubscriptionClosed {
        /// Which channel closed
        channel: WatchChannel,
    },

    /// A watch delivered an object kind it must never carry
    #[error("unexpected {got} event on the {channel} watch")]
    ProtocolViolation {
        /// Which channel misbehaved
        channel: WatchChannel,
        /// Kind of the offending payload
        got: &'static str,
    },

    /// The caller abandoned the session
    #[error("correlation session cancelled")]
    Cancelled,

    /// Wait mode: the run finished but its state never named a pod
    #[error("run \"{run}\" reached a terminal state without a recorded pod")]
    PodNotRecorded {
        /// The awaited run
        run: String,
    },
}
