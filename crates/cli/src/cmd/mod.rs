mod build;
mod probe;

pub use build::{BuildArgs, USAGE, cmd_build};
pub use probe::{ProbeArgs, ProbeCommand, cmd_probe};
