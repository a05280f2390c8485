//! Source rewriting and patch commands.

use std::fs;
use std::path::Path;

use glob::Pattern;
use tpbuild_platform::{CommandRunner, shell};
use walkdir::WalkDir;

use crate::layout::SRC_DIR;
use crate::progress::stage;
use crate::BuildError;

/// Replace every occurrence of `from` with `to` in the file at `path`.
///
/// `label` is what gets printed on the `[patch]` line.
pub fn replace_in_file(path: &Path, label: &str, from: &str, to: &str) -> Result<(), BuildError> {
  stage("patch", label);

  let text = fs::read_to_string(path).map_err(BuildError::at(path))?;
  fs::write(path, text.replace(from, to)).map_err(BuildError::at(path))
}

/// Rewrite files under `dir` whose names match one of `patterns` and
/// that contain `from`.
///
/// Unreadable or non-UTF-8 files are skipped.
pub fn replace_in_tree(dir: &Path, patterns: &[String], from: &str, to: &str) -> Result<(), BuildError> {
  let patterns = patterns
    .iter()
    .map(|p| {
      Pattern::new(p).map_err(|source| BuildError::Pattern {
        pattern: p.clone(),
        source,
      })
    })
    .collect::<Result<Vec<_>, _>>()?;

  for pattern in &patterns {
    for entry in WalkDir::new(dir).sort_by_file_name().into_iter().filter_map(Result::ok) {
      if !entry.file_type().is_file() {
        continue;
      }

      let name = entry.file_name().to_string_lossy();
      if !pattern.matches(&name) {
        continue;
      }

      let contains = fs::read_to_string(entry.path()).is_ok_and(|text| text.contains(from));
      if contains {
        let label = entry.path().strip_prefix(dir).unwrap_or(entry.path()).display().to_string();
        replace_in_file(entry.path(), &label, from, to)?;
      }
    }
  }

  Ok(())
}

/// Whether a working `patch` tool is installed.
pub fn patch_available(runner: &dyn CommandRunner) -> bool {
  runner.run("patch", &["--version"]).is_ok_and(|out| out.success())
}

/// Command applying `src/<name>` to `src/<dir>`, run from the build directory.
pub fn patch_command(dir: &str, name: &str) -> String {
  format!(
    "patch -p1 -N -d {} -i {}",
    shell::quote(&format!("{SRC_DIR}/{dir}")),
    shell::quote(&format!("../{name}"))
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;
  use tpbuild_platform::testing::FakeRunner;

  #[test]
  fn replaces_all_occurrences() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("uv.h");
    fs::write(&path, "A __attribute__((visibility(\"default\"))) B\nC __attribute__((visibility(\"default\")))\n").unwrap();

    replace_in_file(&path, "include/uv.h", "__attribute__((visibility(\"default\")))", "").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "A  B\nC \n");
  }

  #[test]
  fn missing_file_is_an_error() {
    let temp = TempDir::new().unwrap();
    let err = replace_in_file(&temp.path().join("nope"), "nope", "a", "b").unwrap_err();
    assert!(matches!(err, BuildError::Path { .. }));
  }

  #[test]
  fn tree_rewrite_only_touches_matching_files() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("src/modules/alsa")).unwrap();
    fs::write(root.join("src/modules/alsa/alsa-util.c"), "#include <asoundlib.h>\n").unwrap();
    fs::write(root.join("src/modules/alsa/alsa-util.h"), "#include <asoundlib.h>\n").unwrap();
    fs::write(root.join("src/modules/alsa/notes.txt"), "#include <asoundlib.h>\n").unwrap();
    fs::write(root.join("src/other.c"), "int x;\n").unwrap();

    let patterns = vec!["*.h".to_string(), "*.c".to_string()];
    replace_in_tree(root, &patterns, "#include <asoundlib.h>", "#include <alsa/asoundlib.h>").unwrap();

    let read = |p: &str| fs::read_to_string(root.join(p)).unwrap();
    assert_eq!(read("src/modules/alsa/alsa-util.c"), "#include <alsa/asoundlib.h>\n");
    assert_eq!(read("src/modules/alsa/alsa-util.h"), "#include <alsa/asoundlib.h>\n");
    assert_eq!(read("src/modules/alsa/notes.txt"), "#include <asoundlib.h>\n");
    assert_eq!(read("src/other.c"), "int x;\n");
  }

  #[test]
  fn bad_pattern_is_reported() {
    let temp = TempDir::new().unwrap();
    let err = replace_in_tree(temp.path(), &["[".to_string()], "a", "b").unwrap_err();
    assert!(matches!(err, BuildError::Pattern { .. }));
  }

  #[test]
  fn patch_command_targets_unpacked_sources() {
    assert_eq!(
      patch_command("pulseaudio-10.0", "memfd.patch"),
      format!(
        "patch -p1 -N -d {} -i {}",
        shell::quote("src/pulseaudio-10.0"),
        shell::quote("../memfd.patch")
      )
    );
  }

  #[test]
  fn patch_tool_must_run_successfully() {
    assert!(!patch_available(&FakeRunner::new()));
    assert!(patch_available(&FakeRunner::new().with_output("patch --version", "GNU patch 2.7.6")));
  }
}
