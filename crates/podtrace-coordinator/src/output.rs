//! Correlated result output
//!
//! Serializes the single completed record: pretty JSON to stdout, and to
//! a file when an output path is given. A session emits at most one
//! record; partial results never reach this module.

use anyhow::{Context, Result};
use podtrace_common::CorrelatedResult;
use tracing::info;

/// Write the correlated record to stdout and optionally to a file
pub async fn write_result(result: &CorrelatedResult, output_path: Option<&str>) -> Result<()> {
    let json = serde_json::to_string_pretty(result).context("Failed to serialize result")?;

    println!("{json}");

    if let Some(path) = output_path {
        tokio::fs::write(path, &json)
            .await
            .with_context(|| format!("Failed to write result to {path}"))?;
        info!(path = %path, run = %result.run_name, "Correlated result written");
    }

    Ok(())
}
