// src/exec/process.rs

//! Single process runner.

use std::fs::File;
use std::process::Stdio;

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use super::{ExitReport, Invocation};

/// Spawn the invocation's program and wait for it to exit.
///
/// - With a `log_path`, stdout and stderr both go to that file
///   (parent directories are created).
/// - Without one, output lines are forwarded to `tracing` at debug level so
///   the pipes never fill up.
pub async fn run_process(invocation: &Invocation) -> Result<ExitReport> {
    let Some((program, args)) = invocation.argv.split_first() else {
        bail!("empty command line for {} invocation", invocation.kind);
    };

    info!(kind = %invocation.kind, cmd = %invocation.display(), "starting process");

    let mut cmd = Command::new(program);
    cmd.args(args).stdin(Stdio::null());

    match &invocation.log_path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("creating log directory {:?}", parent))?;
                }
            }
            let out = File::create(path).with_context(|| format!("creating log file {:?}", path))?;
            let err = out
                .try_clone()
                .with_context(|| format!("duplicating log handle for {:?}", path))?;
            cmd.stdout(Stdio::from(out)).stderr(Stdio::from(err));
        }
        None => {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        }
    }

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning '{}'", program))?;

    if let Some(stdout) = child.stdout.take() {
        forward_lines(stdout, invocation.kind.to_string(), "stdout");
    }
    if let Some(stderr) = child.stderr.take() {
        forward_lines(stderr, invocation.kind.to_string(), "stderr");
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for '{}'", program))?;

    let report = match status.code() {
        Some(code) => ExitReport::exited(code),
        None => ExitReport::signalled(),
    };

    info!(
        kind = %invocation.kind,
        exit_code = ?report.code,
        success = report.is_success(),
        "process exited"
    );

    Ok(report)
}

fn forward_lines<R>(reader: R, kind: String, stream: &'static str)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            debug!(kind = %kind, stream, "{}", line);
        }
    });
}
