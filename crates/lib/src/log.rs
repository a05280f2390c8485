//! Per-package `build.log`.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tpbuild_platform::shell;
use tracing::debug;

use crate::BuildError;

/// Variables kept when a command runs with a cleared environment.
const KEPT_VARS: &[&str] = &["HOME", "PATH"];

/// Append-only log of every command a build runs and what it printed.
#[derive(Debug, Clone)]
pub struct BuildLog {
  path: PathBuf,
}

impl BuildLog {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn open(&self) -> Result<File, BuildError> {
    OpenOptions::new()
      .create(true)
      .append(true)
      .open(&self.path)
      .map_err(BuildError::at(&self.path))
  }

  /// Append one line.
  pub fn record(&self, line: &str) -> Result<(), BuildError> {
    let mut file = self.open()?;
    writeln!(file, "{line}").map_err(BuildError::at(&self.path))
  }

  /// Run `cmd` through the system shell in `cwd`.
  ///
  /// The command line is logged as `>>> cmd` and its stdout and stderr are
  /// appended to the log. With `clear_env` only `HOME` and `PATH` are
  /// passed through. Returns the exit code, `None` if killed by a signal.
  pub fn run_shell(&self, cmd: &str, cwd: &Path, clear_env: bool) -> Result<Option<i32>, BuildError> {
    self.record(&format!(">>> {cmd}"))?;

    let stdout = self.open()?;
    let stderr = stdout.try_clone().map_err(BuildError::at(&self.path))?;

    let (sh, flag) = shell::system_shell();
    let mut command = Command::new(sh);
    command
      .arg(flag)
      .arg(cmd)
      .current_dir(cwd)
      .stdin(Stdio::null())
      .stdout(Stdio::from(stdout))
      .stderr(Stdio::from(stderr));

    if clear_env {
      command.env_clear();
      for var in KEPT_VARS {
        if let Some(value) = std::env::var_os(var) {
          command.env(var, value);
        }
      }
    }

    debug!(cmd = %cmd, cwd = %cwd.display(), clear_env, "running build command");

    let status = command.status().map_err(|source| BuildError::Spawn {
      cmd: cmd.to_string(),
      source,
    })?;

    Ok(status.code())
  }

  /// Whole log contents.
  pub fn contents(&self) -> Result<String, BuildError> {
    std::fs::read_to_string(&self.path).map_err(BuildError::at(&self.path))
  }
}
