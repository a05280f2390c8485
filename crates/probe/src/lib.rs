//! Host toolchain introspection.
//!
//! Every helper here is best-effort: a missing tool, a failed command or
//! unrecognised output yields `None` (or `false`), never an error.

mod compiler;
mod git;
mod list;
mod pkgconfig;
mod target;
mod thirdparty;
mod version;

pub use compiler::{parse_compiler_directory, parse_link_dirs};
pub use git::parse_git_head;
pub use list::parse_list;
pub use pkgconfig::{BuildEnv, parse_pkg_config};
pub use target::{normalize_target, parse_compiler_target, parse_config_guess};
pub use thirdparty::{needs_build, parse_thirdparty_list, versioned_name};
pub use version::{CompilerVersion, parse_compiler_version, parse_tool_version};
