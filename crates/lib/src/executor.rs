//! Runs recipe steps inside a package build directory.

use std::fs;
use std::path::Path;

use tpbuild_platform::{CommandRunner, cpu_count};
use tracing::{debug, warn};

use crate::context::BuildContext;
use crate::fetch::Fetcher;
use crate::install::{install_files, install_tree};
use crate::layout::BuildDir;
use crate::log::BuildLog;
use crate::patch::{patch_available, patch_command, replace_in_file, replace_in_tree};
use crate::progress::stage;
use crate::step::{Jobs, Step};
use crate::unpack::unpack;
use crate::BuildError;

/// Executes [`Step`]s for one package, in order, stopping at the first error.
pub struct Executor<'a> {
  layout: &'a BuildDir,
  log: &'a BuildLog,
  runner: &'a dyn CommandRunner,
  fetcher: Fetcher<'a>,
}

impl<'a> Executor<'a> {
  pub fn new(ctx: &'a BuildContext, layout: &'a BuildDir, log: &'a BuildLog, runner: &'a dyn CommandRunner) -> Self {
    Self {
      layout,
      log,
      runner,
      fetcher: Fetcher::new(layout, &ctx.vendor_dir, log),
    }
  }

  pub fn run_all(&self, steps: &[Step]) -> Result<(), BuildError> {
    steps.iter().try_for_each(|step| self.run(step))
  }

  pub fn run(&self, step: &Step) -> Result<(), BuildError> {
    debug!(?step, "running step");

    match step {
      Step::Download { url, name } => self.fetcher.download(url, name),
      Step::Unpack { archive, dir } => unpack(self.layout, archive, dir),
      Step::Patch { dir, url, name } => self.patch(dir, url, name),
      Step::ReplaceInFile {
        path,
        from,
        to,
        optional,
      } => {
        let full = self.layout.join(path);
        if *optional && !full.exists() {
          return Ok(());
        }
        replace_in_file(&full, &path.display().to_string(), from, to)
      }
      Step::ReplaceInTree {
        dir,
        patterns,
        from,
        to,
      } => replace_in_tree(&self.layout.join(dir), patterns, from, to),
      Step::MakeDir(dir) => {
        let full = self.layout.join(dir);
        fs::create_dir_all(&full).map_err(BuildError::at(&full))
      }
      Step::Execute {
        cmd,
        cwd,
        ignore_error,
        clear_env,
      } => self.execute(cmd, cwd, *ignore_error, *clear_env),
      Step::Make { cwd, jobs } => self.execute(&make_command(*jobs, cpu_count()), cwd, false, false),
      Step::CopyFile { from, to } => {
        let (from, to) = (self.layout.join(from), self.layout.join(to));
        fs::copy(&from, &to).map(|_| ()).map_err(BuildError::at(&from))
      }
      Step::InstallTree { src, dst, filter } => install_tree(&self.layout.join(src), &self.layout.join(dst), filter),
      Step::InstallFiles { pattern, dst } => install_files(&self.layout.join(pattern), &self.layout.join(dst)),
    }
  }

  /// Apply a patch if possible. Failures are logged and never stop the build.
  fn patch(&self, dir: &str, url: &str, name: &str) -> Result<(), BuildError> {
    if !patch_available(self.runner) {
      debug!(url = %url, "patch tool not available, skipping");
      return Ok(());
    }

    if let Err(err) = self.fetcher.download(url, name) {
      warn!(url = %url, error = %err, "can't download patch, continuing");
      return self.log.record(&format!("can't download patch {url}: {err}"));
    }

    self.execute(&patch_command(dir, name), Path::new(""), true, false)
  }

  fn execute(&self, cmd: &str, cwd: &Path, ignore_error: bool, clear_env: bool) -> Result<(), BuildError> {
    stage("execute", cmd);

    let code = self.log.run_shell(cmd, &self.layout.join(cwd), clear_env)?;
    if code == Some(0) {
      return Ok(());
    }

    if ignore_error {
      warn!(cmd = %cmd, ?code, "ignoring failed command");
      return self.log.record(&format!("command exited with status {}", exit_status(code)));
    }

    Err(BuildError::CmdFailed {
      cmd: cmd.to_string(),
      code,
    })
  }
}

/// Exit code as printed in the log.
fn exit_status(code: Option<i32>) -> String {
  code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}

/// `make`, with `-j<N>` unless serial or the CPU count is unknown.
pub fn make_command(jobs: Jobs, cpus: Option<usize>) -> String {
  match (jobs, cpus) {
    (Jobs::Parallel, Some(n)) if n > 0 => format!("make -j{n}"),
    _ => "make".to_string(),
  }
}
