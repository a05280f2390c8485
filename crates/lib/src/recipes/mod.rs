//! Per-dependency build recipes.
//!
//! Each supported dependency has one recipe that turns the build context
//! into a fixed list of [`Step`]s. The table is closed: a name that is not
//! listed here cannot be built.

use std::path::{Path, PathBuf};

use tpbuild_platform::CommandRunner;

use crate::context::{BuildContext, Variant};
use crate::flags::{MakeFlags, cmake_args};
use crate::layout::SRC_DIR;
use crate::package::PackageSpec;
use crate::step::{Jobs, Step, TreeFilter};
use crate::toolchain::Toolchain;
use crate::BuildError;

mod alsa;
mod cpputest;
mod gengetopt;
mod google_benchmark;
mod json_c;
mod libatomic_ops;
mod libunwind;
mod libuv;
mod ltdl;
mod openfec;
mod openssl;
mod pulseaudio;
mod ragel;
mod sndfile;
mod sox;
mod speexdsp;

/// Fills a [`Recipe`] with the steps for one dependency.
pub type RecipeFn = fn(&mut Recipe<'_>) -> Result<(), BuildError>;

const RECIPES: &[(&str, RecipeFn)] = &[
  ("libuv", libuv::recipe),
  ("libunwind", libunwind::recipe),
  ("libatomic_ops", libatomic_ops::recipe),
  ("openfec", openfec::recipe),
  ("speexdsp", speexdsp::recipe),
  ("alsa", alsa::recipe),
  ("ltdl", ltdl::recipe),
  ("json-c", json_c::recipe),
  ("sndfile", sndfile::recipe),
  ("pulseaudio", pulseaudio::recipe),
  ("sox", sox::recipe),
  ("gengetopt", gengetopt::recipe),
  ("ragel", ragel::recipe),
  ("cpputest", cpputest::recipe),
  ("google-benchmark", google_benchmark::recipe),
  ("openssl", openssl::recipe),
];

pub fn lookup(name: &str) -> Option<RecipeFn> {
  RECIPES.iter().find(|(known, _)| *known == name).map(|(_, recipe)| *recipe)
}

/// Names of every dependency that has a recipe.
pub fn names() -> impl Iterator<Item = &'static str> {
  RECIPES.iter().map(|(name, _)| *name)
}

/// Steps that build `spec` in `ctx`.
pub fn plan(ctx: &BuildContext, spec: &PackageSpec, runner: &dyn CommandRunner) -> Result<Vec<Step>, BuildError> {
  let recipe = lookup(&spec.name).ok_or_else(|| BuildError::UnknownPackage(spec.to_string()))?;

  let mut builder = Recipe::new(ctx, spec, runner);
  recipe(&mut builder)?;
  Ok(builder.into_steps())
}

/// Step list under construction.
///
/// Tracks a working directory relative to the build directory, so recipes
/// read like a shell session: enter the sources, run commands, install.
/// Install destinations are always relative to the build directory.
pub struct Recipe<'a> {
  ctx: &'a BuildContext,
  spec: &'a PackageSpec,
  toolchain: Toolchain<'a>,
  cwd: PathBuf,
  steps: Vec<Step>,
}

impl<'a> Recipe<'a> {
  pub fn new(ctx: &'a BuildContext, spec: &'a PackageSpec, runner: &'a dyn CommandRunner) -> Self {
    Self {
      ctx,
      spec,
      toolchain: Toolchain::new(ctx, runner),
      cwd: PathBuf::new(),
      steps: Vec::new(),
    }
  }

  pub fn version(&self) -> &'a str {
    &self.spec.version
  }

  pub fn spec(&self) -> &'a PackageSpec {
    self.spec
  }

  pub fn triple(&self) -> &'a str {
    &self.ctx.toolchain
  }

  pub fn variant(&self) -> Variant {
    self.ctx.variant
  }

  pub fn is_android(&self) -> bool {
    self.ctx.is_android()
  }

  /// Dependencies passed on the command line.
  pub fn deps(&self) -> &'a [String] {
    &self.ctx.deps
  }

  pub fn into_steps(self) -> Vec<Step> {
    self.steps
  }

  fn at(&self, path: impl AsRef<Path>) -> PathBuf {
    self.cwd.join(path)
  }

  pub fn download(&mut self, url: impl Into<String>, name: impl Into<String>) {
    self.steps.push(Step::Download {
      url: url.into(),
      name: name.into(),
    });
  }

  pub fn unpack(&mut self, archive: impl Into<String>, dir: impl Into<String>) {
    self.steps.push(Step::Unpack {
      archive: archive.into(),
      dir: dir.into(),
    });
  }

  /// Apply a patch to `src/<dir>` if possible.
  pub fn try_patch(&mut self, dir: impl Into<String>, url: impl Into<String>, name: impl Into<String>) {
    self.steps.push(Step::Patch {
      dir: dir.into(),
      url: url.into(),
      name: name.into(),
    });
  }

  /// Change into `dir`, relative to the current directory.
  pub fn enter(&mut self, dir: impl AsRef<Path>) {
    self.cwd.push(dir);
  }

  /// Change into `src/<dir>` of the build directory.
  pub fn enter_source(&mut self, dir: &str) {
    self.cwd = Path::new(SRC_DIR).join(dir);
  }

  /// Go back to the parent directory.
  pub fn leave(&mut self) {
    self.cwd.pop();
  }

  pub fn mkdir(&mut self, dir: &str) {
    let dir = self.at(dir);
    self.steps.push(Step::MakeDir(dir));
  }

  pub fn replace_in_file(&mut self, path: &str, from: &str, to: &str) {
    self.push_replace(path, from, to, false);
  }

  /// Like [`Recipe::replace_in_file`] but skipped when `path` is absent.
  pub fn replace_in_file_if_exists(&mut self, path: &str, from: &str, to: &str) {
    self.push_replace(path, from, to, true);
  }

  fn push_replace(&mut self, path: &str, from: &str, to: &str, optional: bool) {
    let path = self.at(path);
    self.steps.push(Step::ReplaceInFile {
      path,
      from: from.to_string(),
      to: to.to_string(),
      optional,
    });
  }

  pub fn replace_in_tree(&mut self, dir: &str, patterns: &[&str], from: &str, to: &str) {
    let dir = self.at(dir);
    self.steps.push(Step::ReplaceInTree {
      dir,
      patterns: patterns.iter().map(|p| p.to_string()).collect(),
      from: from.to_string(),
      to: to.to_string(),
    });
  }

  pub fn execute(&mut self, cmd: impl Into<String>) {
    self.push_execute(cmd.into(), false);
  }

  /// Run with only `HOME` and `PATH` in the environment.
  pub fn execute_clean(&mut self, cmd: impl Into<String>) {
    self.push_execute(cmd.into(), true);
  }

  fn push_execute(&mut self, cmd: String, clear_env: bool) {
    self.steps.push(Step::Execute {
      cmd,
      cwd: self.cwd.clone(),
      ignore_error: false,
      clear_env,
    });
  }

  pub fn make(&mut self) {
    self.push_make(Jobs::Parallel);
  }

  /// `make` without `-j`.
  pub fn make_serial(&mut self) {
    self.push_make(Jobs::Serial);
  }

  fn push_make(&mut self, jobs: Jobs) {
    self.steps.push(Step::Make {
      cwd: self.cwd.clone(),
      jobs,
    });
  }

  /// Flag builder for this toolchain, without dependencies.
  pub fn make_flags(&self) -> MakeFlags<'a> {
    MakeFlags::new(self.toolchain, &self.ctx.work_dir)
  }

  /// Environment overrides as `configure` arguments.
  pub fn env_args(&self) -> String {
    self.ctx.env.to_shell()
  }

  /// `./configure --host=<triple> <env> <flags> <options>`.
  pub fn configure(&mut self, flags: &str, options: &[&str]) {
    self.configure_with("./configure", flags, options);
  }

  /// Like [`Recipe::configure`] with a custom command prefix such as
  /// `ac_cv_host=... ./configure`.
  pub fn configure_with(&mut self, program: &str, flags: &str, options: &[&str]) {
    let host = format!("--host={}", self.triple());
    let env = self.env_args();
    let options = options.join(" ");

    let cmd = [program, host.as_str(), env.as_str(), flags, options.as_str()]
      .into_iter()
      .filter(|part| !part.is_empty())
      .collect::<Vec<_>>()
      .join(" ");
    self.execute(cmd);
  }

  /// Configure the CMake project in `srcdir` for the toolchain.
  pub fn cmake(&mut self, srcdir: &str, extra: &[&str]) {
    let args = cmake_args(&self.toolchain, self.variant(), self.ctx.external_cmake_toolchain, extra);
    self.execute(format!("cmake {srcdir} {}", args.join(" ")));
  }

  pub fn copy_file(&mut self, from: &str, to: &str) {
    let (from, to) = (self.at(from), self.at(to));
    self.steps.push(Step::CopyFile { from, to });
  }

  /// Install the `src` tree (relative to the current directory) as `dst`.
  pub fn install_tree(&mut self, src: &str, dst: &str, filter: TreeFilter) {
    let src = self.at(src);
    self.steps.push(Step::InstallTree {
      src,
      dst: PathBuf::from(dst),
      filter,
    });
  }

  /// Install files matching `pattern` into the `dst` directory.
  pub fn install_files(&mut self, pattern: &str, dst: &str) {
    let pattern = self.at(pattern);
    self.steps.push(Step::InstallFiles {
      pattern,
      dst: PathBuf::from(dst),
    });
  }
}

/// Keep only files matching `patterns`.
pub(crate) fn only(patterns: &[&str]) -> TreeFilter {
  TreeFilter::Match(patterns.iter().map(|p| p.to_string()).collect())
}
