//! Build task commands.

use anyhow::{Context, Result};
use pagesmith_build::Task;

use super::{pipeline, Overrides};

/// Run the given tasks in order, stopping at the first failure.
pub async fn run(overrides: &Overrides, tasks: &[Task]) -> Result<()> {
    let file = overrides.resolve()?;
    let pipeline = pipeline(&file)?;

    tracing::info!(
        "Building {} ({})",
        file.site.page_set,
        tasks.iter().map(Task::name).collect::<Vec<_>>().join(" -> ")
    );

    let tasks = tasks.to_vec();
    let reports = tokio::task::spawn_blocking(move || pipeline.run_sequence(&tasks))
        .await
        .context("Build task panicked")??;

    let written: usize = reports.iter().map(|r| r.written).sum();
    let failed: usize = reports.iter().map(|r| r.failed).sum();
    let duration: u64 = reports.iter().map(|r| r.duration_ms).sum();

    if failed > 0 {
        tracing::warn!("{} file(s) failed to compile; previous output kept", failed);
    }

    tracing::info!("Wrote {} file(s) in {}ms", written, duration);
    tracing::info!("Output: {}", file.site.output_root().display());

    Ok(())
}
