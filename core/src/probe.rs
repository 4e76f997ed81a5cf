//! Process-spawning port for short-lived availability probes.
//!
//! A probe runs a command solely to see whether it exits successfully,
//! keeping its trimmed stdout for logging. Failure to spawn is folded into a
//! failed probe rather than surfaced as an error: a command that cannot run
//! is a command that is not available.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

/// Result of running a probe command.
#[derive(Debug, Clone, Default)]
pub struct ProbeOutput {
    /// Whether the process exited with status 0.
    pub success: bool,
    /// Concatenated, line-trimmed stdout.
    pub stdout: String,
}

/// Port for running probe processes.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    async fn run(&self, program: &str, args: &[&str], cwd: &Path) -> ProbeOutput;
}

/// Production runner backed by `tokio::process`.
///
/// No timeout is applied; a hung probe stalls resolution until it exits.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str], cwd: &Path) -> ProbeOutput {
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await;

        match output {
            Ok(out) => ProbeOutput {
                success: out.status.success(),
                stdout: String::from_utf8_lossy(&out.stdout)
                    .lines()
                    .map(str::trim)
                    .collect(),
            },
            Err(err) => {
                tracing::debug!(program, error = %err, "probe failed to spawn");
                ProbeOutput::default()
            }
        }
    }
}
