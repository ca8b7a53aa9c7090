//! podtrace: submit a run and report the pod that executes it
//!
//! Runs one correlation session end to end against the built-in
//! simulated control plane and prints the correlated record. Real
//! deployments supply their own `ControlPlane` implementation and drive
//! the library directly.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use podtrace_common::defaults::{DEFAULT_NAMESPACE, DEFAULT_POLL_INTERVAL_MS, DEFAULT_RUN_NAME_PREFIX};
use podtrace_common::{ControlPlane, RunPhase, RunSubmission, RunTemplate};
use podtrace_coordinator::output::write_result;
use podtrace_coordinator::sim::SimControlPlane;
use podtrace_coordinator::{CorrelationSession, SessionConfig, TrackMode};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "podtrace")]
#[command(about = "Submit a run and correlate the pod assigned to it")]
#[command(version)]
struct Args {
    /// Target namespace
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,

    /// Tracking mode: poll until terminal, or watch both event streams
    #[arg(long, value_enum, default_value_t = TrackMode::Watch)]
    mode: TrackMode,

    /// Polling cadence in milliseconds (wait mode)
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    poll_interval_ms: u64,

    /// Overall session deadline in seconds (0 disables the deadline)
    #[arg(long, default_value = "60")]
    timeout_secs: u64,

    /// Output JSON file for the correlated record
    #[arg(short, long)]
    output: Option<String>,

    /// Keep the run on the control plane after the session
    #[arg(long)]
    keep: bool,

    /// Simulator: delay before the pod is scheduled, in milliseconds
    #[arg(long, default_value = "250")]
    schedule_after_ms: u64,

    /// Simulator: delay before the run completes, in milliseconds
    #[arg(long, default_value = "750")]
    finish_after_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    info!(
        namespace = %args.namespace,
        mode = ?args.mode,
        timeout_secs = args.timeout_secs,
        "Starting podtrace"
    );

    let plane = SimControlPlane::new();
    let config = SessionConfig {
        namespace: args.namespace.clone(),
        mode: args.mode,
        poll_interval: Duration::from_millis(args.poll_interval_ms),
        delete_run: !args.keep,
    };
    let session = CorrelationSession::new(
        Arc::new(plane.clone()) as Arc<dyn ControlPlane>,
        config,
    );

    let template = RunTemplate::hello_world();
    info!(template = %serde_json::to_string(&template)?, "Run template");
    session.ensure_template(&template).await?;

    let run = session
        .submit(&RunSubmission::generated(
            DEFAULT_RUN_NAME_PREFIX,
            &template.name,
        ))
        .await?;

    // Scripted lifecycle: the simulator stands in for a scheduler.
    let driver = tokio::spawn(drive_run(
        plane.clone(),
        args.namespace.clone(),
        run.name.clone(),
        Duration::from_millis(args.schedule_after_ms),
        Duration::from_millis(args.finish_after_ms),
    ));

    let cancel = CancellationToken::new();
    if args.timeout_secs > 0 {
        let deadline = cancel.clone();
        let timeout = Duration::from_secs(args.timeout_secs);
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            warn!(timeout_secs = timeout.as_secs(), "Session deadline reached");
            deadline.cancel();
        });
    }

    let result = session.track(&run.name, Some(&cancel)).await?;
    info!(
        run = %result.run_name,
        pod = %result.pod_name,
        "Correlation complete"
    );
    write_result(&result, args.output.as_deref()).await?;

    let _ = driver.await;
    session.finish(&run.name).await?;

    Ok(())
}

/// Drive the simulated run through its lifecycle: running, pod scheduled,
/// then succeeded.
async fn drive_run(
    plane: SimControlPlane,
    namespace: String,
    run_name: String,
    schedule_after: Duration,
    finish_after: Duration,
) {
    tokio::time::sleep(schedule_after).await;
    plane
        .set_phase(&namespace, &run_name, RunPhase::Running, false)
        .await;
    plane
        .schedule_pod(&namespace, &run_name, &format!("{run_name}-pod"), Utc::now())
        .await;

    tokio::time::sleep(finish_after.saturating_sub(schedule_after)).await;
    plane
        .set_phase(&namespace, &run_name, RunPhase::Succeeded, true)
        .await;
}
