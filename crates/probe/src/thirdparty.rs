//! Helpers the build configuration uses to drive `build-3rdparty`.

use std::collections::BTreeMap;
use std::path::Path;

/// Parse `"libuv:1.44.2,openfec,all"` into ordered `(name, version)` pairs.
///
/// A repeated name keeps its first position and takes the last version
/// given. `all` never carries a version.
pub fn parse_thirdparty_list(s: &str) -> Vec<(String, Option<String>)> {
  let mut entries: Vec<(String, Option<String>)> = Vec::new();

  if s.is_empty() {
    return entries;
  }

  for item in s.split(',') {
    let (name, version) = match item.split_once(':') {
      Some((name, version)) if name != "all" => (name, Some(version.to_string())),
      Some((name, _)) => (name, None),
      None => (item, None),
    };

    match entries.iter_mut().find(|(existing, _)| existing == name) {
      Some(entry) => entry.1 = version,
      None => entries.push((name.to_string(), version)),
    }
  }

  entries
}

/// `name-version` for a known dependency, `None` when no version is pinned.
pub fn versioned_name(name: &str, versions: &BTreeMap<String, String>) -> Option<String> {
  versions.get(name).map(|version| format!("{name}-{version}"))
}

/// Whether `build_root/<versioned>` lacks a commit marker.
pub fn needs_build(build_root: &Path, versioned: &str) -> bool {
  !build_root.join(versioned).join("commit").exists()
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn owned(entries: &[(&str, Option<&str>)]) -> Vec<(String, Option<String>)> {
    entries
      .iter()
      .map(|(name, version)| (name.to_string(), version.map(str::to_string)))
      .collect()
  }

  #[test]
  fn names_with_and_without_versions() {
    assert_eq!(
      parse_thirdparty_list("libuv:1.44.2,openfec"),
      owned(&[("libuv", Some("1.44.2")), ("openfec", None)])
    );
  }

  #[test]
  fn all_never_has_version() {
    assert_eq!(parse_thirdparty_list("all:1.0"), owned(&[("all", None)]));
  }

  #[test]
  fn repeated_name_keeps_position() {
    assert_eq!(
      parse_thirdparty_list("a:1,b,a:2"),
      owned(&[("a", Some("2")), ("b", None)])
    );
  }

  #[test]
  fn version_may_contain_colons() {
    assert_eq!(parse_thirdparty_list("x:1:2"), owned(&[("x", Some("1:2"))]));
  }

  #[test]
  fn empty_string_is_empty_list() {
    assert!(parse_thirdparty_list("").is_empty());
  }

  #[test]
  fn versioned_name_lookup() {
    let versions = BTreeMap::from([("libuv".to_string(), "1.44.2".to_string())]);
    assert_eq!(versioned_name("libuv", &versions).as_deref(), Some("libuv-1.44.2"));
    assert_eq!(versioned_name("sox", &versions), None);
  }

  #[test]
  fn commit_marker_decides_rebuild() {
    let temp = TempDir::new().unwrap();
    assert!(needs_build(temp.path(), "libuv-1.44.2"));

    let dir = temp.path().join("libuv-1.44.2");
    std::fs::create_dir_all(&dir).unwrap();
    assert!(needs_build(temp.path(), "libuv-1.44.2"));

    std::fs::write(dir.join("commit"), "").unwrap();
    assert!(!needs_build(temp.path(), "libuv-1.44.2"));
  }
}
