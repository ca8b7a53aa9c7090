//! Poll-until-terminal completion waiting
//!
//! The completion waiter blocks until a single run reaches a terminal
//! state, polling at a fixed cadence with cancellation support. A failed
//! poll is fatal and propagated immediately; there is no built-in
//! iteration cap, the caller bounds the wait through the cancellation
//! token.

use std::time::Duration;

use podtrace_common::defaults::DEFAULT_POLL_INTERVAL_MS;
use podtrace_common::{ControlPlane, RunState};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::SessionError;

/// Configuration for completion waiting
#[derive(Debug, Clone)]
pub struct WaitConfig {
    /// Fixed delay between run-state polls
    pub poll_interval: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

/// Wait until the run reaches a terminal state and return its final snapshot.
///
/// Each iteration checks the cancellation token, fetches the run state,
/// and evaluates the terminal-state predicate. Transport errors and a
/// vanished run are fatal to this call; "not yet terminal" just drives
/// another iteration after `poll_interval`.
pub async fn wait_until_done(
    client: &dyn ControlPlane,
    namespace: &str,
    run_name: &str,
    config: &WaitConfig,
    cancel: Option<&CancellationToken>,
) -> Result<RunState, SessionError> {
    let mut attempts = 0u32;

    loop {
        if let Some(token) = cancel {
            if token.is_cancelled() {
                return Err(SessionError::Cancelled);
            }
        }

        attempts += 1;
        let state = client.get_run(namespace, run_name).await?;

        if state.is_terminal() {
            debug!(
                run = %run_name,
                attempts,
                phase = ?state.phase,
                "Run reached terminal state"
            );
            return Ok(state);
        }

        debug!(
            run = %run_name,
            attempt = attempts,
            phase = ?state.phase,
            delay_ms = config.poll_interval.as_millis() as u64,
            "Run not terminal, polling again"
        );

        // Wait with cancellation support
        tokio::select! {
            _ = tokio::time::sleep(config.poll_interval) => {}
            _ = async {
                if let Some(token) = cancel {
                    token.cancelled().await
                } else {
                    std::future::pending::<()>().await
                }
            } => {
                return Err(SessionError::Cancelled);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimControlPlane;
    use podtrace_common::{ClientError, RunPhase};

    fn fast_config() -> WaitConfig {
        WaitConfig {
            poll_interval: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn test_returns_terminal_snapshot_after_polling() {
        let sim = SimControlPlane::new();
        sim.insert_run("default", "run-1", Some(RunPhase::Running))
            .await;

        let driver = {
            let sim = sim.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(30)).await;
                sim.set_phase("default", "run-1", RunPhase::Succeeded, true)
                    .await;
            })
        };

        let state = wait_until_done(&sim, "default", "run-1", &fast_config(), None)
            .await
            .unwrap();
        assert!(state.is_terminal());
        assert_eq!(state.phase, Some(RunPhase::Succeeded));
        assert!(sim.get_count().await >= 2, "should have polled more than once");
        driver.await.unwrap();
    }

    #[tokio::test]
    async fn test_poll_error_is_fatal_without_another_poll() {
        let sim = SimControlPlane::new();
        sim.insert_run("default", "run-1", Some(RunPhase::Succeeded))
            .await;
        sim.fail_next_get().await;

        let err = wait_until_done(&sim, "default", "run-1", &fast_config(), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Client(ClientError::Transport { .. })
        ));
        // The failed poll is the only poll; a retry would have succeeded.
        assert_eq!(sim.get_count().await, 1);
    }

    #[tokio::test]
    async fn test_vanished_run_is_fatal() {
        let sim = SimControlPlane::new();

        let err = wait_until_done(&sim, "default", "gone", &fast_config(), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Client(ClientError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_cancellation_interrupts_waiting() {
        let sim = SimControlPlane::new();
        sim.insert_run("default", "run-1", Some(RunPhase::Running))
            .await;

        let cancel = CancellationToken::new();
        let canceller = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                cancel.cancel();
            })
        };

        let config = WaitConfig {
            poll_interval: Duration::from_secs(60),
        };
        let err = wait_until_done(&sim, "default", "run-1", &config, Some(&cancel))
            .await
            .unwrap_err();
        assert_eq!(err, SessionError::Cancelled);
        canceller.await.unwrap();
    }
}
