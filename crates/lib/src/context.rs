//! Inputs shared by every stage of one build invocation.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tpbuild_platform::shell;

use crate::BuildError;

/// Build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
  Debug,
  Release,
}

impl Variant {
  pub fn as_str(self) -> &'static str {
    match self {
      Variant::Debug => "debug",
      Variant::Release => "release",
    }
  }

  pub fn is_debug(self) -> bool {
    matches!(self, Variant::Debug)
  }
}

impl FromStr for Variant {
  type Err = BuildError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "debug" => Ok(Variant::Debug),
      "release" => Ok(Variant::Release),
      other => Err(BuildError::Variant(other.to_string())),
    }
  }
}

impl fmt::Display for Variant {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// `NAME=value` overrides given on the command line, in order.
///
/// Lookups see the last assignment of a name. The full list is forwarded
/// to `configure` and `meson` as given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
  entries: Vec<(String, String)>,
}

impl EnvOverrides {
  pub fn new() -> Self {
    Self::default()
  }

  /// Parse `NAME=value` words. The value may itself contain `=`.
  pub fn parse<S: AsRef<str>>(words: &[S]) -> Result<Self, BuildError> {
    let entries = words
      .iter()
      .map(|word| {
        let word = word.as_ref();
        word
          .split_once('=')
          .map(|(name, value)| (name.to_string(), value.to_string()))
          .ok_or_else(|| BuildError::InvalidEnv(word.to_string()))
      })
      .collect::<Result<Vec<_>, _>>()?;

    Ok(Self { entries })
  }

  pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
    self.entries.push((name.into(), value.into()));
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self
      .entries
      .iter()
      .rev()
      .find(|(key, _)| key == name)
      .map(|(_, value)| value.as_str())
  }

  pub fn contains(&self, name: &str) -> bool {
    self.get(name).is_some()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.entries.iter().map(|(name, value)| (name.as_str(), value.as_str()))
  }

  /// Shell-quoted `NAME=value` words for a command line.
  pub fn to_shell(&self) -> String {
    let words: Vec<String> = self.iter().map(|(name, value)| format!("{name}={value}")).collect();
    shell::join(&words)
  }
}

/// Everything one `build-3rdparty` invocation was asked to do.
#[derive(Debug, Clone)]
pub struct BuildContext {
  /// Root holding one directory per built package.
  pub work_dir: PathBuf,
  /// Tree searched for pre-downloaded archives.
  pub vendor_dir: PathBuf,
  /// Host triple, empty for a native build.
  pub toolchain: String,
  pub variant: Variant,
  /// Versioned names of already built dependencies.
  pub deps: Vec<String>,
  pub env: EnvOverrides,
  /// CMake tool paths come from an external toolchain file (Yocto).
  pub external_cmake_toolchain: bool,
}

impl BuildContext {
  pub fn new(work_dir: impl Into<PathBuf>, vendor_dir: impl Into<PathBuf>, toolchain: &str, variant: Variant) -> Self {
    Self {
      work_dir: work_dir.into(),
      vendor_dir: vendor_dir.into(),
      toolchain: toolchain.to_string(),
      variant,
      deps: Vec::new(),
      env: EnvOverrides::new(),
      external_cmake_toolchain: false,
    }
  }

  /// Parse a colon-separated dependency list, skipping empty entries.
  pub fn with_deplist(mut self, deplist: &str) -> Self {
    self.deps = deplist.split(':').filter(|dep| !dep.is_empty()).map(str::to_string).collect();
    self
  }

  pub fn with_env(mut self, env: EnvOverrides) -> Self {
    self.env = env;
    self
  }

  pub fn is_android(&self) -> bool {
    self.toolchain.contains("android")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn variant_round_trip() {
    assert_eq!("debug".parse::<Variant>().unwrap(), Variant::Debug);
    assert_eq!(Variant::Release.to_string(), "release");
    assert!(matches!("fast".parse::<Variant>(), Err(BuildError::Variant(_))));
  }

  #[test]
  fn env_last_assignment_wins() {
    let env = EnvOverrides::parse(&["CC=gcc", "CFLAGS=-DX=1", "CC=clang"]).unwrap();
    assert_eq!(env.get("CC"), Some("clang"));
    assert_eq!(env.get("CFLAGS"), Some("-DX=1"));
    assert!(!env.contains("AR"));
    assert_eq!(env.iter().count(), 3);
  }

  #[test]
  fn env_without_equals_is_rejected() {
    let err = EnvOverrides::parse(&["CC"]).unwrap_err();
    assert!(matches!(err, BuildError::InvalidEnv(ref w) if w == "CC"));
  }

  #[test]
  fn env_to_shell_quotes_values() {
    let env = EnvOverrides::parse(&["CC=ccache gcc"]).unwrap();
    assert_eq!(env.to_shell(), shell::quote("CC=ccache gcc"));
    assert_eq!(EnvOverrides::new().to_shell(), "");
  }

  #[test]
  fn deplist_skips_empty_entries() {
    let ctx = BuildContext::new("/w", "/v", "", Variant::Release).with_deplist("libuv-1.44.2::openfec-1.4.2.4:");
    assert_eq!(ctx.deps, ["libuv-1.44.2", "openfec-1.4.2.4"]);
    assert!(BuildContext::new("/w", "/v", "", Variant::Debug).with_deplist("").deps.is_empty());
  }

  #[test]
  fn android_is_detected_from_triple() {
    assert!(BuildContext::new("/w", "/v", "aarch64-linux-android29", Variant::Release).is_android());
    assert!(!BuildContext::new("/w", "/v", "arm-linux-gnueabihf", Variant::Release).is_android());
  }
}
