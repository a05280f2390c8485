//! tpbuild-lib: builds third-party dependencies from source.
//!
//! A build takes a `<name>-<version>` package, resolves its recipe and runs
//! it inside `<work_dir>/<package>`:
//! - `recipes`: the closed table of supported dependencies
//! - `fetch`/`unpack`/`patch`: obtaining and preparing sources
//! - `toolchain`/`flags`: cross-compilation settings for configure and CMake
//! - `executor`/`install`: running steps and collecting artifacts
//! - `orchestrate`: the whole pipeline ending in the `commit` marker

pub mod context;
pub mod error;
pub mod executor;
pub mod fetch;
pub mod flags;
pub mod install;
pub mod layout;
pub mod log;
pub mod orchestrate;
pub mod package;
pub mod patch;
pub mod progress;
pub mod recipes;
pub mod step;
pub mod toolchain;
pub mod unpack;

pub use context::{BuildContext, EnvOverrides, Variant};
pub use error::BuildError;
pub use layout::BuildDir;
pub use orchestrate::build_package;
pub use package::PackageSpec;
