//! Errors raised while building a dependency.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that abort a dependency build.
#[derive(Debug, Error)]
pub enum BuildError {
  /// Package name has no `-<version>` suffix.
  #[error("can't determine version of '{0}'")]
  Version(String),

  #[error("unknown variant '{0}', expected 'debug' or 'release'")]
  Variant(String),

  /// Environment override without `=`.
  #[error("malformed environment override '{0}', expected NAME=value")]
  InvalidEnv(String),

  /// No recipe for this dependency.
  #[error("unknown 3rdparty '{0}'")]
  UnknownPackage(String),

  /// Every fetch strategy failed.
  #[error("can't download '{url}': {reason}")]
  Download { url: String, reason: String },

  #[error("can't search vendor directory {}: {source}", path.display())]
  Vendor {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  #[error("unsupported archive format: {}", .0.display())]
  UnsupportedArchive(PathBuf),

  /// Archive extracted but the expected top-level directory is missing.
  #[error("archive '{archive}' does not contain '{dir}'")]
  MissingUnpackDir { archive: String, dir: String },

  /// A build command exited with a non-zero status.
  #[error("command failed with exit code {code:?}: {cmd}")]
  CmdFailed { cmd: String, code: Option<i32> },

  #[error("can't run '{cmd}': {source}")]
  Spawn {
    cmd: String,
    #[source]
    source: io::Error,
  },

  #[error("invalid pattern '{pattern}': {source}")]
  Pattern {
    pattern: String,
    #[source]
    source: glob::PatternError,
  },

  #[error("{}: {source}", path.display())]
  Path {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("io error: {0}")]
  Io(#[from] io::Error),
}

impl BuildError {
  /// Attach `path` to an I/O error.
  pub(crate) fn at(path: &Path) -> impl FnOnce(io::Error) -> BuildError + '_ {
    move |source| BuildError::Path {
      path: path.to_path_buf(),
      source,
    }
  }
}
