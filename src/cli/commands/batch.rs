//! `batch`: package every target in a manifest, concurrently.

use super::{detect_tool, locator_for, report_tool};
use crate::bundler::{self, Bundler, Error, InvocationResult, InvokeOptions};
use crate::cli::{BatchArgs, RuntimeConfig};
use crate::error::{BundlerError, CliError, Result};
use crate::metadata;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Outcome of one manifest target.
struct TargetReport {
    index: usize,
    name: String,
    outcome: bundler::Result<InvocationResult>,
}

/// Executes the batch command.
///
/// Targets share the detected bundler and the manifest overrides, and nothing
/// else. At most `--jobs` bundler processes run at once.
pub async fn execute(
    args: &BatchArgs,
    config: &RuntimeConfig,
    cancel: CancellationToken,
) -> Result<i32> {
    let manifest = metadata::load_manifest(&args.manifest)?;
    let targets = manifest.build_targets()?;
    if targets.is_empty() {
        return Err(CliError::InvalidManifest {
            path: args.manifest.display().to_string(),
            reason: "no [[target]] tables".to_string(),
        }
        .into());
    }

    let jobs = args.jobs.unwrap_or_else(num_cpus::get).max(1);
    let total = targets.len();
    config.section(&format!("Building {total} target(s), {jobs} at a time"))?;

    let tool = detect_tool(&args.tool).await?;
    report_tool(&tool, config)?;
    let bundler = Arc::new(
        Bundler::new(tool, locator_for(&args.tool)).with_overrides(manifest.overrides),
    );
    let semaphore = Arc::new(Semaphore::new(jobs));

    let mut tasks = JoinSet::new();
    for (index, target) in targets.into_iter().enumerate() {
        let bundler = Arc::clone(&bundler);
        let semaphore = Arc::clone(&semaphore);
        let options = InvokeOptions::default()
            .with_timeout(args.tool.timeout())
            .with_cancel(cancel.child_token());

        tasks.spawn(async move {
            let name = target.output_name().to_string();
            let cancel = options.cancel.clone();
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(Error::Cancelled {
                    captured_output: String::new(),
                }),
                permit = semaphore.acquire_owned() => match permit {
                    Ok(_permit) => {
                        log::info!("Building {name}");
                        bundler.bundle(&target, options).await
                    }
                    Err(e) => Err(Error::GenericError(format!(
                        "job limiter closed: {e}"
                    ))),
                },
            };
            TargetReport {
                index,
                name,
                outcome,
            }
        });
    }

    let mut reports = Vec::with_capacity(total);
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(report) => reports.push(report),
            Err(e) => log::error!("Batch task failed to complete: {e}"),
        }
    }
    reports.sort_by_key(|report| report.index);

    summarize(reports, total, config)
}

/// Prints one line per target and folds the outcomes into an exit code.
fn summarize(reports: Vec<TargetReport>, total: usize, config: &RuntimeConfig) -> Result<i32> {
    config.section("Summary")?;

    let mut failed = total - reports.len();
    let mut first_exit_code = None;
    for report in reports {
        match report.outcome {
            Ok(_) => config.success(&report.name)?,
            Err(e) => {
                let message = e.to_string();
                let mut lines = message.lines();
                config.error(&format!("{}: {}", report.name, lines.next().unwrap_or_default()))?;
                for line in lines {
                    config.indent(line)?;
                }
                failed += 1;
                let exit_code = BundlerError::from(e).exit_code();
                first_exit_code.get_or_insert(exit_code);
            }
        }
    }

    if failed == 0 {
        config.success(&format!("All {total} target(s) built"))?;
        return Ok(0);
    }

    Err(CliError::BatchFailed {
        failed,
        total,
        exit_code: first_exit_code.unwrap_or(1),
    }
    .into())
}
