//! On-disk layout of one package build.
//!
//! ```text
//! <work_dir>/<name>-<version>/
//!   src/        downloaded archives and unpacked sources
//!   tmp/        staging area, removed once empty
//!   include/    installed headers
//!   lib/        installed libraries
//!   rpath/      runtime-only shared objects
//!   bin/        installed tools
//!   build.log
//!   commit      written last, marks a complete build
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::BuildError;

pub const SRC_DIR: &str = "src";
pub const TMP_DIR: &str = "tmp";
pub const INCLUDE_DIR: &str = "include";
pub const LIB_DIR: &str = "lib";
pub const RPATH_DIR: &str = "rpath";
pub const BIN_DIR: &str = "bin";
pub const LOG_FILE: &str = "build.log";
pub const COMMIT_FILE: &str = "commit";

/// Build directory of a single package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDir {
  root: PathBuf,
}

impl BuildDir {
  pub fn new(work_dir: &Path, package: &str) -> Self {
    Self {
      root: work_dir.join(package),
    }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Resolve a path relative to the build directory.
  pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
    self.root.join(relative)
  }

  pub fn src_dir(&self) -> PathBuf {
    self.root.join(SRC_DIR)
  }

  pub fn tmp_dir(&self) -> PathBuf {
    self.root.join(TMP_DIR)
  }

  pub fn include_dir(&self) -> PathBuf {
    self.root.join(INCLUDE_DIR)
  }

  pub fn lib_dir(&self) -> PathBuf {
    self.root.join(LIB_DIR)
  }

  pub fn rpath_dir(&self) -> PathBuf {
    self.root.join(RPATH_DIR)
  }

  pub fn bin_dir(&self) -> PathBuf {
    self.root.join(BIN_DIR)
  }

  pub fn log_path(&self) -> PathBuf {
    self.root.join(LOG_FILE)
  }

  pub fn commit_path(&self) -> PathBuf {
    self.root.join(COMMIT_FILE)
  }

  /// Start a build: drop the commit marker and make sure `src/` exists.
  ///
  /// Everything else is kept so earlier stages can be skipped.
  pub fn prepare(&self) -> Result<(), BuildError> {
    let commit = self.commit_path();
    remove_path(&commit)?;

    let src = self.src_dir();
    fs::create_dir_all(&src).map_err(BuildError::at(&src))?;

    debug!(path = %self.root.display(), "build directory ready");
    Ok(())
  }

  pub fn is_committed(&self) -> bool {
    self.commit_path().is_file()
  }

  /// Write the empty commit marker.
  pub fn commit(&self) -> Result<(), BuildError> {
    let commit = self.commit_path();
    fs::write(&commit, b"").map_err(BuildError::at(&commit))
  }
}

/// Remove a file or directory tree. Missing paths are fine.
pub(crate) fn remove_path(path: &Path) -> Result<(), BuildError> {
  let result = match fs::symlink_metadata(path) {
    Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
    Ok(_) => fs::remove_file(path),
    Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
    Err(err) => Err(err),
  };
  result.map_err(BuildError::at(path))
}

/// Remove a directory if it is empty, ignoring every failure.
pub(crate) fn remove_empty_dir(path: &Path) {
  let _ = fs::remove_dir(path);
}
