//! podtrace-common - Shared types and the control-plane client interface
//!
//! This crate provides the data model shared by the correlation engine and
//! any control-plane client implementation, without pulling in a runtime
//! or transport stack.
//!
//! ## Modules
//!
//! - [`client`]: The `ControlPlane` trait and client error types
//! - [`defaults`]: Default configuration values
//! - [`labels`]: Label keys stamped on control-plane objects
//! - [`phase`]: Run lifecycle phases and the terminal-state predicate
//! - [`pod`]: Pod placement snapshots
//! - [`resource`]: Run template and submission definitions
//! - [`result`]: The correlated result accumulator
//! - [`run`]: Run state snapshots
//! - [`watch`]: Watch selectors, events, and subscriptions

pub mod client;
pub mod defaults;
pub mod labels;
pub mod phase;
pub mod pod;
pub mod resource;
pub mod result;
pub mod run;
pub mod watch;

// Re-export commonly used types
pub use client::{ClientError, ControlPlane, ResourceKind};
pub use phase::RunPhase;
pub use pod::PodState;
pub use resource::{RunSubmission, RunTemplate, TemplateStep};
pub use result::CorrelatedResult;
pub use run::RunState;
pub use watch::{EventStream, WatchEvent, WatchSelector, WatchSubscription};
