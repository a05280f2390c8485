//! Host platform access for tpbuild
//!
//! This crate provides the pieces that touch the host directly:
//! - Running tools and capturing their output (`CommandRunner`)
//! - Locating executables on `PATH`
//! - CPU count detection for parallel builds
//! - Shell quoting for recipe command lines

mod cpu;
mod error;
mod runner;
pub mod shell;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use cpu::cpu_count;
pub use error::PlatformError;
pub use runner::{CommandOutput, CommandRunner, SystemRunner};

/// Locate an executable on `PATH`.
pub fn which(tool: &str) -> Option<std::path::PathBuf> {
  which::which(tool).ok()
}
