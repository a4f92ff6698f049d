//! Bundler process execution.
//!
//! Runs one [`InvocationDescriptor`] as a child process, captures its combined
//! output, and classifies the outcome. The child is always reaped before this
//! module returns, and dropping the future kills it. Nothing is retried.

use crate::bundler::command::InvocationDescriptor;
use crate::bundler::error::{Error, Result};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// How long output readers may keep running once the child is gone.
///
/// Grandchildren that inherited the pipes can hold them open past the child's exit.
const OUTPUT_DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Caller controls for one invocation.
#[derive(Clone, Debug, Default)]
pub struct InvokeOptions {
    /// Terminate the bundler once this much time has passed. None waits forever.
    pub timeout: Option<Duration>,
    /// Terminate the bundler when cancelled.
    pub cancel: CancellationToken,
}

impl InvokeOptions {
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Result of a bundler run that exited with status 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvocationResult {
    pub exit_code: i32,
    /// Combined stdout and stderr lines, in arrival order.
    pub captured_output: String,
}

enum Outcome {
    Exited(ExitStatus),
    TimedOut(Duration),
    Cancelled,
}

/// Runs the bundler described by `descriptor` and waits for it.
///
/// # Errors
///
/// - [`Error::CommandFailed`] if the process cannot be spawned or waited on
/// - [`Error::ExternalTool`] if it exits nonzero, with the captured output
/// - [`Error::Timeout`] / [`Error::Cancelled`] if it was terminated early
pub async fn invoke(
    descriptor: InvocationDescriptor,
    options: InvokeOptions,
) -> Result<InvocationResult> {
    let command_line = descriptor.command_line();
    log::info!("Running {command_line}");

    let mut command = Command::new(descriptor.executable());
    command
        .args(descriptor.arguments())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // Own process group, so termination reaches PyInstaller's helper processes too.
    #[cfg(unix)]
    command.process_group(0);

    let mut child = command.spawn().map_err(|error| Error::CommandFailed {
        command: command_line.clone(),
        error,
    })?;
    log::debug!("Spawned bundler with pid {:?}", child.id());

    let (tx, rx) = mpsc::unbounded_channel();
    let mut readers = JoinSet::new();
    if let Some(stdout) = child.stdout.take() {
        readers.spawn(forward_lines(stdout, tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.spawn(forward_lines(stderr, tx.clone()));
    }
    drop(tx);
    let mut collector = tokio::spawn(collect_output(rx));

    let deadline = async {
        match options.timeout {
            Some(timeout) => {
                tokio::time::sleep(timeout).await;
                timeout
            }
            None => std::future::pending().await,
        }
    };

    let outcome = tokio::select! {
        biased;
        _ = options.cancel.cancelled() => Outcome::Cancelled,
        status = child.wait() => Outcome::Exited(status.map_err(|error| Error::CommandFailed {
            command: command_line.clone(),
            error,
        })?),
        after = deadline => Outcome::TimedOut(after),
    };

    if !matches!(outcome, Outcome::Exited(_)) {
        terminate(&mut child).await;
    }

    let captured_output = match tokio::time::timeout(OUTPUT_DRAIN_GRACE, &mut collector).await {
        Ok(joined) => joined,
        Err(_elapsed) => {
            log::debug!("Output pipes still open after bundler exit; detaching readers");
            readers.shutdown().await;
            collector.await
        }
    }
    .map_err(|e| Error::GenericError(format!("output collector failed: {e}")))?;

    match outcome {
        Outcome::Exited(status) if status.success() => Ok(InvocationResult {
            exit_code: 0,
            captured_output,
        }),
        Outcome::Exited(status) => {
            let exit_code = status_code(status);
            log::debug!("Bundler failed with exit code {exit_code}");
            Err(Error::ExternalTool {
                exit_code,
                captured_output,
            })
        }
        Outcome::TimedOut(after) => {
            log::warn!("Bundler timed out after {}s, terminated", after.as_secs());
            Err(Error::Timeout {
                after,
                captured_output,
            })
        }
        Outcome::Cancelled => {
            log::warn!("Build cancelled, bundler terminated");
            Err(Error::Cancelled { captured_output })
        }
    }
}

/// Kills the child (and on Unix its process group) and reaps it.
async fn terminate(child: &mut Child) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        use nix::sys::signal::{Signal, killpg};
        use nix::unistd::Pid;

        if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            log::debug!("killpg({pid}) failed: {e}");
        }
    }

    if let Err(e) = child.kill().await {
        log::debug!("Failed to kill bundler process: {e}");
    }
    if let Err(e) = child.wait().await {
        log::warn!("Failed to reap bundler process: {e}");
    }
}

/// Sends each line of `reader` to `tx`. Invalid UTF-8 is replaced, never fatal,
/// so a pipe is always drained to EOF.
async fn forward_lines<R>(reader: R, tx: mpsc::UnboundedSender<String>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\n', '\r']).to_string();
                if tx.send(line).is_err() {
                    break;
                }
            }
            Err(e) => {
                log::debug!("Stopped reading bundler output: {e}");
                break;
            }
        }
    }
}

async fn collect_output(mut rx: mpsc::UnboundedReceiver<String>) -> String {
    let mut captured = String::new();
    while let Some(line) = rx.recv().await {
        log::debug!(target: "pyinstaller", "{line}");
        captured.push_str(&line);
        captured.push('\n');
    }
    captured
}

/// Exit code of `status`; a signal-terminated process reports `128 + signal`.
fn status_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
