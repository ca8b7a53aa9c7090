//! podtrace-coordinator - run submission and run/pod correlation
//!
//! This crate submits a run to an orchestration control plane and
//! determines, as early as possible, which pod was assigned to execute
//! it, reporting one correlated record per session. Two tracking
//! variants are provided: poll-until-terminal ([`wait`]) and
//! watch-merge-emit-once ([`correlate`]).

pub mod config;
pub mod correlate;
pub mod error;
pub mod output;
pub mod session;
pub mod sim;
pub mod wait;

pub use config::{SessionConfig, TrackMode};
pub use error::{SessionError, WatchChannel};
pub use session::CorrelationSession;
