//! In-process simulated control plane
//!
//! Implements [`ControlPlane`] entirely in memory: templates and runs in
//! per-namespace maps, watch subscriptions as bounded channels. The CLI
//! drives a scripted run lifecycle against it and the integration tests
//! use its driver methods to build scenarios (phase changes, pod
//! scheduling, injected transport failures, dropped subscriptions).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use podtrace_common::{
    ClientError, ControlPlane, PodState, ResourceKind, RunPhase, RunState, RunSubmission,
    RunTemplate, WatchEvent, WatchSelector, WatchSubscription,
};
use tokio::sync::{mpsc, Mutex};
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Buffer size for watch subscription channels
const WATCH_BUFFER: usize = 16;

/// One registered watch subscription (producer side)
struct SimWatcher {
    namespace: String,
    selector: WatchSelector,
    tx: mpsc::Sender<Result<WatchEvent, ClientError>>,
    token: CancellationToken,
}

impl SimWatcher {
    fn is_live(&self) -> bool {
        !self.token.is_cancelled() && !self.tx.is_closed()
    }
}

#[derive(Default)]
struct SimInner {
    /// Templates keyed by "namespace/name"
    templates: HashMap<String, RunTemplate>,
    /// Runs keyed by "namespace/name"
    runs: HashMap<String, RunState>,
    watchers: Vec<SimWatcher>,
    /// When set, the next `get_run` fails with a transport error
    fail_next_get: bool,
    /// Number of `get_run` calls served (including injected failures)
    get_count: u64,
}

fn key(namespace: &str, name: &str) -> String {
    format!("{namespace}/{name}")
}

/// In-memory control plane for tests and the CLI
#[derive(Clone)]
pub struct SimControlPlane {
    inner: Arc<Mutex<SimInner>>,
}

impl Default for SimControlPlane {
    fn default() -> Self {
        Self::new()
    }
}

impl SimControlPlane {
    /// Create an empty simulated control plane
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SimInner::default())),
        }
    }

    // ── Scenario drivers ────────────────────────────────────────────────

    /// Insert a run directly, bypassing submission
    pub async fn insert_run(&self, namespace: &str, name: &str, phase: Option<RunPhase>) {
        let mut state = RunState::new(name, namespace);
        state.phase = phase;
        self.inner
            .lock()
            .await
            .runs
            .insert(key(namespace, name), state);
    }

    /// Set a run's phase and done flag, notifying run watchers
    pub async fn set_phase(&self, namespace: &str, name: &str, phase: RunPhase, done: bool) {
        let (state, watchers) = {
            let mut inner = self.inner.lock().await;
            let Some(run) = inner.runs.get_mut(&key(namespace, name)) else {
                return;
            };
            run.phase = Some(phase);
            run.done = done;
            let state = run.clone();
            let watchers = inner.senders_for(namespace, |sel| {
                matches!(sel, WatchSelector::RunName(n) if n == name)
            });
            (state, watchers)
        };
        broadcast(watchers, WatchEvent::Run(state)).await;
    }

    /// Assign a pod to a run, notifying pod watchers for that run
    ///
    /// Also records the assignment on the run state so that wait mode can
    /// read it off the final snapshot.
    pub async fn schedule_pod(
        &self,
        namespace: &str,
        run_name: &str,
        pod_name: &str,
        started_at: DateTime<Utc>,
    ) {
        let pod = PodState::owned_by(pod_name, run_name, started_at);
        let watchers = {
            let mut inner = self.inner.lock().await;
            if let Some(run) = inner.runs.get_mut(&key(namespace, run_name)) {
                run.pod_name = Some(pod_name.to_string());
                run.pod_start_time = Some(started_at);
            }
            inner.senders_for(namespace, |sel| {
                matches!(sel, WatchSelector::PodOwner(r) if r == run_name)
            })
        };
        broadcast(watchers, WatchEvent::Pod(pod)).await;
    }

    /// Make the next `get_run` call fail with a transport error
    pub async fn fail_next_get(&self) {
        self.inner.lock().await.fail_next_get = true;
    }

    /// Number of `get_run` calls served so far
    pub async fn get_count(&self) -> u64 {
        self.inner.lock().await.get_count
    }

    /// Drop the producer ends of all subscriptions matching the selector,
    /// simulating the control plane tearing the watch down
    pub async fn close_watchers(&self, selector: &WatchSelector) {
        self.inner
            .lock()
            .await
            .watchers
            .retain(|w| w.selector != *selector);
    }

    /// Number of live watch subscriptions
    pub async fn watcher_count(&self) -> usize {
        let mut inner = self.inner.lock().await;
        inner.watchers.retain(SimWatcher::is_live);
        inner.watchers.len()
    }
}

impl SimInner {
    /// Collect live senders for watchers in the namespace whose selector
    /// matches, pruning dead ones
    fn senders_for(
        &mut self,
        namespace: &str,
        matches: impl Fn(&WatchSelector) -> bool,
    ) -> Vec<mpsc::Sender<Result<WatchEvent, ClientError>>> {
        self.watchers.retain(SimWatcher::is_live);
        self.watchers
            .iter()
            .filter(|w| w.namespace == namespace && matches(&w.selector))
            .map(|w| w.tx.clone())
            .collect()
    }
}

/// Send an event to each sender, outside the state lock
async fn broadcast(
    watchers: Vec<mpsc::Sender<Result<WatchEvent, ClientError>>>,
    event: WatchEvent,
) {
    for tx in watchers {
        let _ = tx.send(Ok(event.clone())).await;
    }
}

#[async_trait]
impl ControlPlane for SimControlPlane {
    async fn get_run(&self, namespace: &str, name: &str) -> Result<RunState, ClientError> {
        let mut inner = self.inner.lock().await;
        inner.get_count += 1;
        if inner.fail_next_get {
            inner.fail_next_get = false;
            return Err(ClientError::transport("injected failure"));
        }
        inner
            .runs
            .get(&key(namespace, name))
            .cloned()
            .ok_or_else(|| ClientError::not_found(ResourceKind::Run, name))
    }

    async fn get_template(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<RunTemplate, ClientError> {
        self.inner
            .lock()
            .await
            .templates
            .get(&key(namespace, name))
            .cloned()
            .ok_or_else(|| ClientError::not_found(ResourceKind::RunTemplate, name))
    }

    async fn create_template(
        &self,
        namespace: &str,
        template: &RunTemplate,
    ) -> Result<(), ClientError> {
        self.inner
            .lock()
            .await
            .templates
            .insert(key(namespace, &template.name), template.clone());
        Ok(())
    }

    async fn create_run(
        &self,
        namespace: &str,
        submission: &RunSubmission,
    ) -> Result<RunState, ClientError> {
        let mut inner = self.inner.lock().await;

        if !inner.templates.contains_key(&key(namespace, &submission.template)) {
            return Err(ClientError::not_found(
                ResourceKind::RunTemplate,
                &submission.template,
            ));
        }

        let name = match (&submission.name, &submission.generate_name) {
            (Some(name), _) => name.clone(),
            (None, Some(prefix)) => {
                let suffix = uuid::Uuid::new_v4().simple().to_string();
                format!("{}{}", prefix, &suffix[..5])
            }
            (None, None) => {
                return Err(ClientError::transport(
                    "run submission carries neither name nor generate_name",
                ));
            }
        };

        let mut state = RunState::new(&name, namespace);
        state.phase = Some(RunPhase::Pending);
        inner.runs.insert(key(namespace, &name), state.clone());
        debug!(run = %name, namespace = %namespace, "Run created");
        Ok(state)
    }

    async fn delete_run(&self, namespace: &str, name: &str) -> Result<(), ClientError> {
        self.inner
            .lock()
            .await
            .runs
            .remove(&key(namespace, name))
            .map(|_| ())
            .ok_or_else(|| ClientError::not_found(ResourceKind::Run, name))
    }

    async fn watch(
        &self,
        namespace: &str,
        selector: WatchSelector,
    ) -> Result<WatchSubscription, ClientError> {
        let token = CancellationToken::new();
        let (tx, rx) = mpsc::channel(WATCH_BUFFER);

        debug!(namespace = %namespace, selector = %selector, "Watch subscription opened");
        self.inner.lock().await.watchers.push(SimWatcher {
            namespace: namespace.to_string(),
            selector,
            tx,
            token: token.clone(),
        });

        Ok(WatchSubscription::new(
            Box::pin(ReceiverStream::new(rx)),
            token.drop_guard(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_run_generates_name_from_prefix() {
        let sim = SimControlPlane::new();
        sim.create_template("default", &RunTemplate::hello_world())
            .await
            .unwrap();

        let submission = RunSubmission::generated("hello-world-run-", "hello-world");
        let first = sim.create_run("default", &submission).await.unwrap();
        let second = sim.create_run("default", &submission).await.unwrap();

        assert!(first.name.starts_with("hello-world-run-"));
        assert!(first.name.len() > "hello-world-run-".len());
        assert_ne!(first.name, second.name);
        assert_eq!(first.phase, Some(RunPhase::Pending));
    }

    #[tokio::test]
    async fn test_create_run_requires_template() {
        let sim = SimControlPlane::new();
        let err = sim
            .create_run(
                "default",
                &RunSubmission::generated("run-", "missing-template"),
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found(ResourceKind::RunTemplate));
    }

    #[tokio::test]
    async fn test_watch_delivers_matching_events_only() {
        let sim = SimControlPlane::new();
        sim.insert_run("default", "run-1", Some(RunPhase::Pending))
            .await;
        sim.insert_run("default", "run-2", Some(RunPhase::Pending))
            .await;

        let mut sub = sim
            .watch("default", WatchSelector::RunName("run-1".to_string()))
            .await
            .unwrap();

        sim.set_phase("default", "run-2", RunPhase::Running, false)
            .await;
        sim.set_phase("default", "run-1", RunPhase::Running, false)
            .await;

        match sub.next_event().await {
            Some(Ok(WatchEvent::Run(state))) => assert_eq!(state.name, "run-1"),
            other => panic!("expected run-1 event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_schedule_pod_updates_run_state_and_notifies() {
        let sim = SimControlPlane::new();
        sim.insert_run("default", "run-1", Some(RunPhase::Running))
            .await;

        let mut sub = sim
            .watch("default", WatchSelector::PodOwner("run-1".to_string()))
            .await
            .unwrap();

        let started = Utc::now();
        sim.schedule_pod("default", "run-1", "run-1-pod", started)
            .await;

        match sub.next_event().await {
            Some(Ok(WatchEvent::Pod(pod))) => {
                assert_eq!(pod.name, "run-1-pod");
                assert_eq!(pod.owner_run.as_deref(), Some("run-1"));
                assert_eq!(pod.started_at, Some(started));
            }
            other => panic!("expected pod event, got {other:?}"),
        }

        let state = sim.get_run("default", "run-1").await.unwrap();
        assert_eq!(state.pod_name.as_deref(), Some("run-1-pod"));
        assert_eq!(state.pod_start_time, Some(started));
    }

    #[tokio::test]
    async fn test_released_subscription_is_pruned() {
        let sim = SimControlPlane::new();
        let sub = sim
            .watch("default", WatchSelector::RunName("run-1".to_string()))
            .await
            .unwrap();
        assert_eq!(sim.watcher_count().await, 1);

        sub.release();
        assert_eq!(sim.watcher_count().await, 0);
    }

    #[tokio::test]
    async fn test_close_watchers_ends_stream() {
        let sim = SimControlPlane::new();
        let selector = WatchSelector::PodOwner("run-1".to_string());
        let mut sub = sim.watch("default", selector.clone()).await.unwrap();

        sim.close_watchers(&selector).await;
        assert!(sub.next_event().await.is_none());
    }
}
