//! Cross toolchain probing.
//!
//! Tool names come from `NAME=value` overrides or are derived from the
//! toolchain triple. Everything here inspects the host through a
//! [`CommandRunner`] and treats failures as "unknown".

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tpbuild_platform::CommandRunner;
use tracing::debug;

use crate::context::BuildContext;

static ANDROID_API: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"__ANDROID_API__\s+(\d+)").expect("valid regex"));

const ANDROID_TOOLCHAIN_FILE: &str = "build/cmake/android.toolchain.cmake";
const ANDROID_SYSROOT: &str = "sysroot";

/// Compiler families recognised from `-v` banners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
  Gnu,
  Clang,
}

impl Family {
  fn markers(self) -> &'static [&'static str] {
    match self {
      Family::Gnu => &["GNU", "gnu", "gcc", "g++"],
      Family::Clang => &["clang"],
    }
  }
}

/// Toolchain view of a [`BuildContext`].
#[derive(Clone, Copy)]
pub struct Toolchain<'a> {
  ctx: &'a BuildContext,
  runner: &'a dyn CommandRunner,
}

impl<'a> Toolchain<'a> {
  pub fn new(ctx: &'a BuildContext, runner: &'a dyn CommandRunner) -> Self {
    Self { ctx, runner }
  }

  /// Host triple, empty for native builds.
  pub fn triple(&self) -> &str {
    &self.ctx.toolchain
  }

  pub fn is_android(&self) -> bool {
    self.ctx.is_android()
  }

  pub fn is_gnu_triple(&self) -> bool {
    self.triple().contains("gnu")
  }

  /// Tool for `var`: the override, else `<triple>-<default>`, else `default`.
  pub fn tool_var(&self, var: &str, default: &str) -> String {
    if let Some(value) = self.ctx.env.get(var) {
      return value.to_string();
    }
    if self.triple().is_empty() {
      default.to_string()
    } else {
      format!("{}-{default}", self.triple())
    }
  }

  /// Absolute path of `tool` via `PATH` unless it already names a path.
  ///
  /// Unknown tools are returned unchanged.
  pub fn tool_path(&self, tool: &str) -> String {
    if tool.contains('/') {
      return tool.to_string();
    }
    self
      .runner
      .which(tool)
      .map(|path| path.to_string_lossy().into_owned())
      .unwrap_or_else(|| tool.to_string())
  }

  /// Sysroot reported by `compiler -print-sysroot` when cross compiling.
  pub fn sysroot(&self, compiler: &str) -> Option<String> {
    if self.triple().is_empty() {
      return None;
    }

    let compiler = if compiler.is_empty() {
      format!("{}-gcc", self.triple())
    } else {
      compiler.to_string()
    };

    let output = self.runner.run(&compiler, &["-print-sysroot"]).ok()?;
    let sysroot = output.stdout.trim();

    if !sysroot.is_empty() && Path::new(sysroot).is_dir() {
      Some(sysroot.to_string())
    } else {
      debug!(compiler = %compiler, "no usable sysroot");
      None
    }
  }

  /// `__ANDROID_API__` predefined by `compiler`.
  pub fn android_api(&self, compiler: &str) -> Option<String> {
    let output = self.runner.run(compiler, &["-dM", "-E", "-"]).ok()?;
    output
      .stdout
      .lines()
      .find_map(|line| ANDROID_API.captures(line))
      .map(|caps| caps[1].to_string())
  }

  /// Android ABI name for the triple's architecture.
  pub fn android_abi(&self) -> Option<String> {
    let arch = self.triple().split('-').next().unwrap_or_default();
    let abi = match arch {
      "arm" | "armv7a" => "armeabi-v7a",
      "aarch64" => "arm64-v8a",
      "i686" => "x86",
      "x86_64" => "x86_64",
      other => other,
    };
    if abi.is_empty() { None } else { Some(abi.to_string()) }
  }

  /// NDK CMake toolchain file found above the compiler binary.
  pub fn android_toolchain_file(&self, compiler: &str) -> Option<PathBuf> {
    let exe = self.runner.which(compiler)?;
    find_in_parents(&exe, Path::new(ANDROID_TOOLCHAIN_FILE))
  }

  /// NDK sysroot found above the compiler binary.
  pub fn android_sysroot(&self, compiler: &str) -> Option<PathBuf> {
    let exe = self.runner.which(compiler)?;
    find_in_parents(&exe, Path::new(ANDROID_SYSROOT))
  }

  /// Whether every compiler and linker in use belongs to `family`.
  ///
  /// Overridden tools are checked as given. For triples that are not GNU
  /// ones, a compiler, a linker and a C++ compiler must each be found among
  /// the usual candidates. An unconfirmed family is `false`, never an error.
  pub fn check_family(&self, family: Family) -> bool {
    for var in ["CC", "CCLD", "CXX", "CXXLD"] {
      if let Some(tool) = self.ctx.env.get(var) {
        if !self.tool_matches("", tool, family) {
          return false;
        }
      }
    }

    if self.is_gnu_triple() {
      return true;
    }

    let env = &self.ctx.env;
    let any = |candidates: &[&str]| candidates.iter().any(|tool| self.tool_matches(self.triple(), tool, family));

    if !env.contains("CC") && !any(&["cc", "gcc", "clang"]) {
      return false;
    }
    if !env.contains("CCLD") && !any(&["ld", "gcc", "clang"]) {
      return false;
    }
    if (!env.contains("CXX") || !env.contains("CXXLD")) && !any(&["g++", "clang++"]) {
      return false;
    }

    true
  }

  fn tool_matches(&self, triple: &str, tool: &str, family: Family) -> bool {
    let tool = if triple.is_empty() {
      tool.to_string()
    } else {
      format!("{triple}-{tool}")
    };

    let Some(banner) = self.runner.command_output(&tool, &["-v"]) else {
      return false;
    };

    family.markers().iter().any(|marker| banner.contains(marker))
  }
}

/// Walk up from `path` looking for `child` in each ancestor.
fn find_in_parents(path: &Path, child: &Path) -> Option<PathBuf> {
  path
    .ancestors()
    .skip(1)
    .map(|dir| dir.join(child))
    .find(|candidate| candidate.exists())
}
