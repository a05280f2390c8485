//! Compiler installation layout.

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tpbuild_platform::CommandRunner;

static INSTALLED_DIR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bInstalledDir:\s*(.*)").expect("valid regex"));
static LIBRARIES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*libraries:\s*=(.*)$").expect("valid regex"));

/// Directory a clang-style compiler reports as `InstalledDir`.
pub fn parse_compiler_directory(runner: &impl CommandRunner, compiler: &str) -> Option<String> {
  let text = runner.command_output(compiler, &["--version"])?;

  text
    .lines()
    .find_map(|line| INSTALLED_DIR.captures(line))
    .map(|caps| caps[1].trim_end().to_string())
}

/// Library search directories reported by `-print-search-dirs`.
///
/// Entries are made absolute and only existing directories are kept.
pub fn parse_link_dirs(runner: &impl CommandRunner, linker: &str) -> Vec<PathBuf> {
  let Some(text) = runner.command_output(linker, &["-print-search-dirs"]) else {
    return Vec::new();
  };

  let Some(caps) = text.lines().find_map(|line| LIBRARIES.captures(line)) else {
    return Vec::new();
  };

  caps[1]
    .split(':')
    .filter(|dir| !dir.is_empty())
    .filter_map(|dir| absolutize(Path::new(dir)))
    .filter(|dir| dir.is_dir())
    .collect()
}

/// Make `path` absolute and drop `.`/`..` components lexically.
fn absolutize(path: &Path) -> Option<PathBuf> {
  let absolute = std::path::absolute(path).ok()?;
  let mut normalized = PathBuf::new();

  for component in absolute.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        normalized.pop();
      }
      other => normalized.push(other),
    }
  }

  Some(normalized)
}

#[cfg(test)]
mod tests {
  use super::*;
  use tpbuild_platform::testing::FakeRunner;
  use tempfile::TempDir;

  #[test]
  fn installed_dir_from_clang_banner() {
    let runner = FakeRunner::new().with_output(
      "clang --version",
      "clang version 15.0.7\nTarget: x86_64-pc-linux-gnu\nThread model: posix\nInstalledDir: /usr/lib/llvm-15/bin",
    );
    assert_eq!(
      parse_compiler_directory(&runner, "clang").as_deref(),
      Some("/usr/lib/llvm-15/bin")
    );
  }

  #[test]
  fn installed_dir_absent_for_gcc() {
    let runner = FakeRunner::new().with_output("gcc --version", "gcc (GCC) 13.2.1");
    assert_eq!(parse_compiler_directory(&runner, "gcc"), None);
  }

  #[test]
  fn link_dirs_keep_existing_normalized_paths() {
    let temp = TempDir::new().unwrap();
    let lib = temp.path().join("lib");
    std::fs::create_dir_all(lib.join("gcc")).unwrap();

    let listing = format!(
      "install: /usr/lib/gcc/x86_64-linux-gnu/9/\nprograms: =/usr/bin\nlibraries: ={}:{}/gcc/..:{}/missing",
      lib.display(),
      lib.display(),
      temp.path().display()
    );
    let runner = FakeRunner::new().with_output("gcc -print-search-dirs", &listing);

    let dirs = parse_link_dirs(&runner, "gcc");
    assert_eq!(dirs, vec![lib.clone(), lib]);
  }

  #[test]
  fn link_dirs_empty_without_libraries_line() {
    let runner = FakeRunner::new().with_output("ld -print-search-dirs", "ld: unrecognized option");
    assert!(parse_link_dirs(&runner, "ld").is_empty());
    assert!(parse_link_dirs(&FakeRunner::new(), "ld").is_empty());
  }
}
