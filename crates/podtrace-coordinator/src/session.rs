//! Correlation session composition
//!
//! A `CorrelationSession` ties the pieces together for one run:
//! get-or-create the template, submit the run, then track it in wait or
//! watch mode until exactly one correlated result (or one error) comes
//! out.

use std::sync::Arc;

use podtrace_common::{
    ControlPlane, CorrelatedResult, PodState, ResourceKind, RunState, RunSubmission, RunTemplate,
    WatchSelector,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::{SessionConfig, TrackMode};
use crate::correlate::correlate;
use crate::error::SessionError;
use crate::wait::{wait_until_done, WaitConfig};

/// One end-to-end attempt to obtain a correlated result for a single run
pub struct CorrelationSession {
    client: Arc<dyn ControlPlane>,
    config: SessionConfig,
}

impl CorrelationSession {
    /// Create a session against the given control plane
    pub fn new(client: Arc<dyn ControlPlane>, config: SessionConfig) -> Self {
        Self { client, config }
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Create the template unless it already exists.
    ///
    /// Returns true when the template was created by this call.
    pub async fn ensure_template(&self, template: &RunTemplate) -> Result<bool, SessionError> {
        match self
            .client
            .get_template(&self.config.namespace, &template.name)
            .await
        {
            Ok(_) => {
                info!(template = %template.name, "Template already exists, skipping creation");
                Ok(false)
            }
            Err(e) if e.is_not_found(ResourceKind::RunTemplate) => {
                self.client
                    .create_template(&self.config.namespace, template)
                    .await?;
                info!(template = %template.name, "Template created");
                Ok(true)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Submit a run and return its state with the assigned name
    pub async fn submit(&self, submission: &RunSubmission) -> Result<RunState, SessionError> {
        let state = self
            .client
            .create_run(&self.config.namespace, submission)
            .await?;
        info!(
            run = %state.name,
            namespace = %state.namespace,
            template = %submission.template,
            "Run submitted"
        );
        Ok(state)
    }

    /// Track the run until its pod is known, per the configured mode
    pub async fn track(
        &self,
        run_name: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<CorrelatedResult, SessionError> {
        match self.config.mode {
            TrackMode::Wait => self.track_wait(run_name, cancel).await,
            TrackMode::Watch => self.track_watch(run_name, cancel).await,
        }
    }

    /// Wait mode: poll until terminal, read the pod off the final snapshot
    async fn track_wait(
        &self,
        run_name: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<CorrelatedResult, SessionError> {
        let wait_config = WaitConfig {
            poll_interval: self.config.poll_interval,
        };
        let state = wait_until_done(
            self.client.as_ref(),
            &self.config.namespace,
            run_name,
            &wait_config,
            cancel,
        )
        .await?;

        let pod_name = match state.pod_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                return Err(SessionError::PodNotRecorded {
                    run: run_name.to_string(),
                });
            }
        };

        let mut result = CorrelatedResult::new(&self.config.namespace, run_name);
        result.record_run(&state);
        result.record_pod(&PodState {
            name: pod_name,
            owner_run: Some(state.name.clone()),
            started_at: state.pod_start_time,
        });
        Ok(result)
    }

    /// Watch mode: subscribe to both streams and merge until complete
    async fn track_watch(
        &self,
        run_name: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<CorrelatedResult, SessionError> {
        let run_watch = self
            .client
            .watch(
                &self.config.namespace,
                WatchSelector::RunName(run_name.to_string()),
            )
            .await?;
        // If the second subscription fails, dropping the first releases it.
        let pod_watch = self
            .client
            .watch(
                &self.config.namespace,
                WatchSelector::PodOwner(run_name.to_string()),
            )
            .await?;

        correlate(
            run_watch,
            pod_watch,
            &self.config.namespace,
            run_name,
            cancel,
        )
        .await
    }

    /// Post-session cleanup: delete the run when configured to
    pub async fn finish(&self, run_name: &str) -> Result<(), SessionError> {
        if !self.config.delete_run {
            debug!(run = %run_name, "Keeping run on the control plane");
            return Ok(());
        }
        self.client
            .delete_run(&self.config.namespace, run_name)
            .await?;
        info!(run = %run_name, "Run deleted");
        Ok(())
    }
}
