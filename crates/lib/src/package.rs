//! Dependency name resolution.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::BuildError;

static PACKAGE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^(.*?)-([0-9][a-z0-9.-]+)$").expect("valid regex"));

/// A `<name>-<version>` dependency identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
  pub name: String,
  pub version: String,
}

impl PackageSpec {
  /// Split at the first dash that starts a version-looking suffix.
  ///
  /// The name is matched lazily, so the version binds the longest suffix:
  /// `google-benchmark-1.5.0` is `google-benchmark` at `1.5.0` and
  /// `json-c-0.13.1-20180305` is `json-c` at `0.13.1-20180305`.
  pub fn parse(package: &str) -> Result<Self, BuildError> {
    let caps = PACKAGE
      .captures(package)
      .ok_or_else(|| BuildError::Version(package.to_string()))?;

    Ok(Self {
      name: caps[1].to_string(),
      version: caps[2].to_string(),
    })
  }

  /// Version as integers, `None` if any component is not numeric.
  pub fn version_tuple(&self) -> Option<Vec<u32>> {
    self.version.split('.').map(|part| part.parse().ok()).collect()
  }

  /// Numeric version or a [`BuildError::Version`] naming the package.
  pub fn require_version_tuple(&self) -> Result<Vec<u32>, BuildError> {
    self.version_tuple().ok_or_else(|| BuildError::Version(self.to_string()))
  }
}

impl fmt::Display for PackageSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{}", self.name, self.version)
  }
}
