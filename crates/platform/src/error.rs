//! Error types for tpbuild-platform

use thiserror::Error;

/// Errors that can occur when running external tools
#[derive(Debug, Error)]
pub enum PlatformError {
  #[error("failed to spawn '{program}': {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },
}
