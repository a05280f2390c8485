//! One full `build-3rdparty` run.

use tpbuild_platform::CommandRunner;
use tracing::info;

use crate::context::BuildContext;
use crate::executor::Executor;
use crate::layout::BuildDir;
use crate::log::BuildLog;
use crate::package::PackageSpec;
use crate::progress::{display_path, stage};
use crate::recipes;
use crate::BuildError;

/// Build `package` (`<name>-<version>`) into `<work_dir>/<package>`.
///
/// The `commit` marker is removed first and written only after every step
/// succeeded, so an interrupted or failed build is never mistaken for a
/// complete one. Downloaded and unpacked sources are reused across runs.
pub fn build_package(ctx: &BuildContext, package: &str, runner: &dyn CommandRunner) -> Result<BuildDir, BuildError> {
  let spec = PackageSpec::parse(package)?;
  let layout = BuildDir::new(&ctx.work_dir, package);
  layout.prepare()?;

  let log = BuildLog::new(layout.log_path());
  let steps = recipes::plan(ctx, &spec, runner)?;
  info!(package = %spec, steps = steps.len(), "building");

  Executor::new(ctx, &layout, &log, runner).run_all(&steps)?;

  layout.commit()?;
  stage("commit", display_path(layout.root()).display());
  Ok(layout)
}
