use tokio::process::Command;
use tracing::{debug, info};

use super::{CommandRunner, ExecuteError, Invocation, ProcessOutput};

/// Runs invocations as real child processes, inheriting the caller's
/// environment and capturing stdout/stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
  async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ExecuteError> {
    info!(cmd = %invocation, "executing command");

    let mut command = Command::new(&invocation.program);
    command.args(&invocation.args).envs(&invocation.env);
    if let Some(cwd) = &invocation.cwd {
      command.current_dir(cwd);
    }

    debug!(program = %invocation.program, working_dir = ?invocation.cwd, "spawning process");

    let output = command.output().await.map_err(|source| ExecuteError::Spawn {
      program: invocation.program.clone(),
      source,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if !stdout.is_empty() {
      debug!(stdout = %stdout, "command stdout");
    }
    if !stderr.is_empty() {
      debug!(stderr = %stderr, "command stderr");
    }

    Ok(ProcessOutput {
      code: output.status.code(),
      stdout,
      stderr,
    })
  }
}
