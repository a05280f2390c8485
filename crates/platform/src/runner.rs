//! Running external tools and capturing what they print.
//!
//! Everything that inspects the host toolchain goes through [`CommandRunner`],
//! so detection logic can be exercised against canned tool output in tests.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::PlatformError;

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
  /// Exit code, `None` when the process was killed by a signal.
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl CommandOutput {
  /// Build a successful output with the given stdout (handy for fakes).
  pub fn ok(stdout: impl Into<String>) -> Self {
    Self {
      code: Some(0),
      stdout: stdout.into(),
      stderr: String::new(),
    }
  }

  pub fn success(&self) -> bool {
    self.code == Some(0)
  }

  /// Stdout followed by stderr.
  ///
  /// Compilers print `-v` diagnostics on stderr, so callers scraping
  /// tool banners need both streams.
  pub fn combined(&self) -> String {
    match (self.stdout.is_empty(), self.stderr.is_empty()) {
      (_, true) => self.stdout.clone(),
      (true, false) => self.stderr.clone(),
      (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr),
    }
  }
}

/// Execution context able to run a tool and locate executables.
pub trait CommandRunner {
  /// Run `program` with `args`. Stdin is always empty.
  fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, PlatformError>;

  /// Locate an executable on `PATH`.
  fn which(&self, tool: &str) -> Option<PathBuf>;

  /// Everything the command printed, trimmed.
  ///
  /// Returns `None` when the command cannot be spawned or prints nothing.
  /// The exit status is ignored: many tools print their banner and then
  /// complain about missing input.
  fn command_output(&self, program: &str, args: &[&str]) -> Option<String> {
    let output = self.run(program, args).ok()?;
    let text = output.combined().trim().to_string();
    if text.is_empty() { None } else { Some(text) }
  }
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
  fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, PlatformError> {
    (**self).run(program, args)
  }

  fn which(&self, tool: &str) -> Option<PathBuf> {
    (**self).which(tool)
  }
}

/// [`CommandRunner`] backed by real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
  fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, PlatformError> {
    debug!(program, ?args, "running tool");

    let output = Command::new(program)
      .args(args)
      .stdin(Stdio::null())
      .output()
      .map_err(|source| PlatformError::Spawn {
        program: program.to_string(),
        source,
      })?;

    Ok(CommandOutput {
      code: output.status.code(),
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
  }

  fn which(&self, tool: &str) -> Option<PathBuf> {
    which::which(tool).ok()
  }
}
