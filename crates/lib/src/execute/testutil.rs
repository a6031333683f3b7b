//! Scripted command runner for tests.

use std::sync::Mutex;

use super::{CommandRunner, ExecuteError, Invocation, ProcessOutput};

type Responder = Box<dyn Fn(&Invocation) -> ProcessOutput + Send + Sync>;

/// Records every invocation and answers with a caller-supplied closure.
pub struct ScriptedRunner {
  responder: Responder,
  calls: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
  pub fn new(responder: impl Fn(&Invocation) -> ProcessOutput + Send + Sync + 'static) -> Self {
    Self {
      responder: Box::new(responder),
      calls: Mutex::new(Vec::new()),
    }
  }

  /// A runner where every command exits 0 with no output.
  pub fn succeeding() -> Self {
    Self::new(|_| exit(0))
  }

  pub fn calls(&self) -> Vec<Invocation> {
    self.calls.lock().unwrap().clone()
  }

  /// Rendered command lines, in call order.
  pub fn command_lines(&self) -> Vec<String> {
    self.calls().iter().map(ToString::to_string).collect()
  }
}

impl CommandRunner for ScriptedRunner {
  async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ExecuteError> {
    self.calls.lock().unwrap().push(invocation.clone());
    Ok((self.responder)(invocation))
  }
}

pub fn exit(code: i32) -> ProcessOutput {
  ProcessOutput {
    code: Some(code),
    ..Default::default()
  }
}

pub fn exit_with_stdout(code: i32, stdout: &str) -> ProcessOutput {
  ProcessOutput {
    code: Some(code),
    stdout: stdout.to_string(),
    stderr: String::new(),
  }
}
