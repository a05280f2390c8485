//! Build steps produced by recipes.
//!
//! Paths are relative to the package build directory.

use std::path::PathBuf;

/// Which files an [`Step::InstallTree`] copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeFilter {
  All,
  /// Keep only files whose names match one of the patterns.
  Match(Vec<String>),
  /// Drop files and directories whose names match one of the patterns.
  Ignore(Vec<String>),
}

/// How `make` is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jobs {
  /// One job per available CPU.
  Parallel,
  /// No `-j`, for packages whose makefiles break in parallel.
  Serial,
}

/// One unit of work in a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
  /// Fetch `url` into `src/<name>`.
  Download { url: String, name: String },
  /// Extract `src/<archive>` into `src/<dir>`.
  Unpack { archive: String, dir: String },
  /// Best-effort: fetch a patch and apply it to `src/<dir>`.
  Patch { dir: String, url: String, name: String },
  ReplaceInFile {
    path: PathBuf,
    from: String,
    to: String,
    /// Skip silently when the file does not exist.
    optional: bool,
  },
  ReplaceInTree {
    dir: PathBuf,
    patterns: Vec<String>,
    from: String,
    to: String,
  },
  MakeDir(PathBuf),
  /// Shell command run in `cwd`.
  Execute {
    cmd: String,
    cwd: PathBuf,
    ignore_error: bool,
    clear_env: bool,
  },
  Make { cwd: PathBuf, jobs: Jobs },
  CopyFile { from: PathBuf, to: PathBuf },
  InstallTree {
    src: PathBuf,
    dst: PathBuf,
    filter: TreeFilter,
  },
  /// Copy every file matching `pattern` into the `dst` directory.
  InstallFiles { pattern: PathBuf, dst: PathBuf },
}

impl Step {
  /// Command line of an [`Step::Execute`] step.
  pub fn command(&self) -> Option<&str> {
    match self {
      Step::Execute { cmd, .. } => Some(cmd),
      _ => None,
    }
  }
}
