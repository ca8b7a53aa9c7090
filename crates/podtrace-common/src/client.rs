//! The control-plane client interface
//!
//! The engine consumes a control plane through the [`ControlPlane`]
//! trait; it never constructs the transport itself. Real deployments
//! supply a networked implementation, tests and the CLI use the
//! in-process simulator from the coordinator crate.

use async_trait::async_trait;
use thiserror::Error;

use crate::resource::{RunSubmission, RunTemplate};
use crate::run::RunState;
use crate::watch::{WatchSelector, WatchSubscription};

/// Kinds of objects the control plane manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
pub enum ResourceKind {
    /// A submitted unit of work
    #[strum(serialize = "run")]
    Run,
    /// A reusable run template
    #[strum(serialize = "template")]
    RunTemplate,
    /// A pod placement object
    #[strum(serialize = "pod")]
    Pod,
}

/// Errors surfaced by control-plane calls
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The call failed at the transport layer (network, auth, server)
    #[error("control plane transport error: {message}")]
    Transport {
        /// Human-readable failure description
        message: String,
    },

    /// The requested object does not exist
    #[error("{kind} \"{name}\" not found")]
    NotFound {
        /// Object kind that was requested
        kind: ResourceKind,
        /// Name that was requested
        name: String,
    },
}

impl ClientError {
    /// Create a transport error from any displayable cause
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a not-found error for the given kind and name
    pub fn not_found(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// True when this error is a not-found for the given kind
    pub fn is_not_found(&self, kind: ResourceKind) -> bool {
        matches!(self, Self::NotFound { kind: k, .. } if *k == kind)
    }
}

/// Client interface to the orchestration control plane
///
/// Supplied by the environment; the engine only ever holds a
/// `&dyn ControlPlane` or `Arc<dyn ControlPlane>`.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Fetch the current state of a run
    async fn get_run(&self, namespace: &str, name: &str) -> Result<RunState, ClientError>;

    /// Fetch a run template
    async fn get_template(&self, namespace: &str, name: &str)
        -> Result<RunTemplate, ClientError>;

    /// Create a run template
    async fn create_template(
        &self,
        namespace: &str,
        template: &RunTemplate,
    ) -> Result<(), ClientError>;

    /// Submit a run; the returned state carries the assigned name
    async fn create_run(
        &self,
        namespace: &str,
        submission: &RunSubmission,
    ) -> Result<RunState, ClientError>;

    /// Delete a run
    async fn delete_run(&self, namespace: &str, name: &str) -> Result<(), ClientError>;

    /// Open a watch subscription for objects matching the selector
    async fn watch(
        &self,
        namespace: &str,
        selector: WatchSelector,
    ) -> Result<WatchSubscription, ClientError>;
}
