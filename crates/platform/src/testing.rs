//! Canned [`CommandRunner`] for tests in dependent crates.
//!
//! Enabled with the `testing` feature.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::{CommandOutput, CommandRunner, PlatformError};

/// [`CommandRunner`] answering from a table of canned outputs.
///
/// Commands are keyed by their full command line (`"gcc --version"`).
/// Unknown commands fail to spawn, like a missing binary would.
#[derive(Default)]
pub struct FakeRunner {
  outputs: HashMap<String, CommandOutput>,
  paths: HashMap<String, PathBuf>,
}

impl FakeRunner {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_output(mut self, cmdline: &str, stdout: &str) -> Self {
    self.outputs.insert(cmdline.to_string(), CommandOutput::ok(stdout));
    self
  }

  pub fn with_result(mut self, cmdline: &str, output: CommandOutput) -> Self {
    self.outputs.insert(cmdline.to_string(), output);
    self
  }

  pub fn with_tool(mut self, tool: &str, path: &str) -> Self {
    self.paths.insert(tool.to_string(), PathBuf::from(path));
    self
  }
}

impl CommandRunner for FakeRunner {
  fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, PlatformError> {
    let cmdline = std::iter::once(program).chain(args.iter().copied()).collect::<Vec<_>>().join(" ");
    self.outputs.get(&cmdline).cloned().ok_or_else(|| PlatformError::Spawn {
      program: program.to_string(),
      source: std::io::Error::new(std::io::ErrorKind::NotFound, "not faked"),
    })
  }

  fn which(&self, tool: &str) -> Option<PathBuf> {
    self.paths.get(tool).cloned()
  }
}
