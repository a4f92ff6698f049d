//! `build`: package one GUI script.

use super::{assume_tool, detect_tool, locator_for, report_tool};
use crate::bundler::{Bundler, BuildOverrides, BuildTarget, BuildTargetBuilder, InvokeOptions};
use crate::cli::{BuildArgs, RuntimeConfig};
use crate::error::Result;
use crate::metadata;
use tokio_util::sync::CancellationToken;

/// Executes the build command.
///
/// Returns the process exit code; every failure comes back as an error.
pub async fn execute(
    args: &BuildArgs,
    config: &RuntimeConfig,
    cancel: CancellationToken,
) -> Result<i32> {
    let target = target_from_args(args)?;
    let overrides = match &args.config {
        Some(path) => {
            let manifest = metadata::load_manifest(path)?;
            if !manifest.targets.is_empty() {
                config.warn(&format!(
                    "ignoring {} [[target]] table(s) in {}; build only reads [overrides]",
                    manifest.targets.len(),
                    path.display()
                ))?;
            }
            manifest.overrides
        }
        None => BuildOverrides::default(),
    };

    if args.dry_run {
        return dry_run(args, &target, overrides, config).await;
    }

    config.section(&format!("Building {}", target.output_name()))?;
    let tool = detect_tool(&args.tool).await?;
    report_tool(&tool, config)?;
    let bundler = Bundler::new(tool, locator_for(&args.tool)).with_overrides(overrides);

    let options = InvokeOptions::default()
        .with_timeout(args.tool.timeout())
        .with_cancel(cancel);
    let result = bundler.bundle(&target, options).await?;

    config.verbose_println(result.captured_output.trim_end())?;
    config.success(&format!(
        "Built {} from {}",
        target.output_name(),
        target.script_path().display()
    ))?;
    Ok(result.exit_code)
}

/// Prints the invocation instead of running it. The bundler is not probed.
async fn dry_run(
    args: &BuildArgs,
    target: &BuildTarget,
    overrides: BuildOverrides,
    config: &RuntimeConfig,
) -> Result<i32> {
    let bundler = Bundler::new(assume_tool(&args.tool), locator_for(&args.tool))
        .with_overrides(overrides);
    let descriptor = bundler.prepare(target).await?;

    if args.json {
        let report = serde_json::json!({
            "tool": bundler.tool(),
            "descriptor": descriptor,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        config.verbose_println(&format!("Bundler: {}", bundler.tool().program().display()))?;
        println!("{}", descriptor.command_line());
    }
    Ok(0)
}

/// The target as given on the command line.
///
/// Without `--icon`, a conventional icon under `assets/` next to the script is used.
fn target_from_args(args: &BuildArgs) -> Result<BuildTarget> {
    let icon = args
        .icon
        .clone()
        .or_else(|| metadata::discover_icon(&args.script));

    let mut builder = BuildTargetBuilder::new()
        .script_path(&args.script)
        .toolkit(args.toolkit)
        .one_file(args.onefile)
        .windowed(args.windowed)
        .icon_path(icon)
        .extra_data(args.add_data.iter().cloned())
        .hidden_imports(args.hidden_imports.iter().cloned())
        .clean(args.clean)
        .noconfirm(args.noconfirm);
    if let Some(name) = &args.name {
        builder = builder.output_name(name.clone());
    }

    Ok(builder.build()?)
}
