//! Watch-merge-emit-once stream correlation
//!
//! The correlator merges the run lifecycle stream and the pod placement
//! stream into a single accumulator and returns it the instant it is
//! complete, without waiting for the run to finish. One logical consumer
//! services whichever stream has data; the accumulator has exactly one
//! writer.

use podtrace_common::{CorrelatedResult, WatchEvent, WatchSubscription};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{SessionError, WatchChannel};

/// Merge both watch streams until the correlated result is complete.
///
/// Both subscriptions are owned by this call and released on every exit
/// path: completion, stream closure, protocol violation, transport error,
/// and cancellation. A stream ending before completeness means the
/// control plane dropped the subscription and is fatal; a pod event whose
/// owner label names a different run is ignored.
pub async fn correlate(
    mut run_watch: WatchSubscription,
    mut pod_watch: WatchSubscription,
    namespace: &str,
    run_name: &str,
    cancel: Option<&CancellationToken>,
) -> Result<CorrelatedResult, SessionError> {
    let mut result = CorrelatedResult::new(namespace, run_name);

    loop {
        tokio::select! {
            event = run_watch.next_event() => match event {
                Some(Ok(WatchEvent::Run(state))) => {
                    debug!(run = %run_name, phase = ?state.phase, "Run event");
                    result.record_run(&state);
                }
                Some(Ok(other)) => {
                    return Err(SessionError::ProtocolViolation {
                        channel: WatchChannel::Run,
                        got: other.kind(),
                    });
                }
                Some(Err(e)) => return Err(e.into()),
                None => {
                    return Err(SessionError::SubscriptionClosed {
                        channel: WatchChannel::Run,
                    });
                }
            },
            event = pod_watch.next_event() => match event {
                Some(Ok(WatchEvent::Pod(pod))) => {
                    if !pod.owned_by_run(run_name) {
                        debug!(
                            run = %run_name,
                            pod = %pod.name,
                            owner = ?pod.owner_run,
                            "Ignoring pod event for a different run"
                        );
                        continue;
                    }
                    result.record_pod(&pod);
                    if result.is_complete() {
                        info!(
                            run = %run_name,
                            pod = %result.pod_name,
                            "Pod correlated"
                        );
                        return Ok(result);
                    }
                }
                Some(Ok(other)) => {
                    return Err(SessionError::ProtocolViolation {
                        channel: WatchChannel::Pod,
                        got: other.kind(),
                    });
                }
                Some(Err(e)) => return Err(e.into()),
                None => {
                    return Err(SessionError::SubscriptionClosed {
                        channel: WatchChannel::Pod,
                    });
                }
            },
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
