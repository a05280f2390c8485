//! Copying build products into `include/`, `lib/`, `rpath/` and `bin/`.

use std::fs;
use std::path::Path;

use glob::Pattern;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::layout::remove_path;
use crate::progress::{display_path, stage};
use crate::step::TreeFilter;
use crate::BuildError;

fn compile(patterns: &[String]) -> Result<Vec<Pattern>, BuildError> {
  patterns
    .iter()
    .map(|p| {
      Pattern::new(p).map_err(|source| BuildError::Pattern {
        pattern: p.clone(),
        source,
      })
    })
    .collect()
}

/// Replace `dst` with a copy of the `src` tree.
///
/// Directories are always created; `filter` selects which files are copied.
/// Ignore patterns also prune whole directories.
pub fn install_tree(src: &Path, dst: &Path, filter: &TreeFilter) -> Result<(), BuildError> {
  stage("install", display_path(dst).display());

  let (keep, ignore) = match filter {
    TreeFilter::All => (None, Vec::new()),
    TreeFilter::Match(patterns) => (Some(compile(patterns)?), Vec::new()),
    TreeFilter::Ignore(patterns) => (None, compile(patterns)?),
  };

  if let Some(parent) = dst.parent() {
    fs::create_dir_all(parent).map_err(BuildError::at(parent))?;
  }
  remove_path(dst)?;

  let walker = WalkDir::new(src).follow_links(true).sort_by_file_name().into_iter();
  let entries = walker.filter_entry(|entry| {
    entry.depth() == 0 || !ignore.iter().any(|p| p.matches(&entry.file_name().to_string_lossy()))
  });

  for entry in entries {
    let entry = entry.map_err(|err| BuildError::Io(err.into()))?;
    let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
    let target = dst.join(relative);

    if entry.file_type().is_dir() {
      fs::create_dir_all(&target).map_err(BuildError::at(&target))?;
      continue;
    }

    if let Some(keep) = &keep {
      let name = entry.file_name().to_string_lossy();
      if !keep.iter().any(|p| p.matches(&name)) {
        continue;
      }
    }

    fs::copy(entry.path(), &target).map_err(BuildError::at(entry.path()))?;
  }

  debug!(src = %src.display(), dst = %dst.display(), "installed tree");
  Ok(())
}

/// Copy every file matching the glob `pattern` into directory `dst`.
///
/// A pattern matching nothing installs nothing.
pub fn install_files(pattern: &Path, dst: &Path) -> Result<(), BuildError> {
  let basename = pattern.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
  stage("install", display_path(&dst.join(&basename)).display());

  let pattern_str = pattern.to_string_lossy();
  let matches = glob::glob(&pattern_str).map_err(|source| BuildError::Pattern {
    pattern: pattern_str.to_string(),
    source,
  })?;

  let mut copied = 0;
  for path in matches {
    let path = path.map_err(|err| BuildError::Io(err.into_error()))?;
    let Some(name) = path.file_name() else { continue };

    fs::create_dir_all(dst).map_err(BuildError::at(dst))?;
    let target = dst.join(name);
    fs::copy(&path, &target).map_err(BuildError::at(&path))?;
    copied += 1;
  }

  if copied == 0 {
    warn!(pattern = %pattern_str, "nothing to install");
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn tree(root: &Path, files: &[&str]) {
    for file in files {
      let path = root.join(file);
      fs::create_dir_all(path.parent().unwrap()).unwrap();
      fs::write(path, *file).unwrap();
    }
  }

  #[test]
  fn copies_whole_tree_replacing_destination() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dst = temp.path().join("out/include");
    tree(&src, &["uv.h", "uv/unix.h"]);
    tree(&dst, &["stale.h"]);

    install_tree(&src, &dst, &TreeFilter::All).unwrap();

    assert!(dst.join("uv.h").is_file());
    assert!(dst.join("uv/unix.h").is_file());
    assert!(!dst.join("stale.h").exists());
  }

  #[test]
  fn match_keeps_only_matching_files() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dst = temp.path().join("include");
    tree(&src, &["atomic_ops.h", "atomic_ops.c", "atomic_ops/sysdeps/gcc/x86.h", "Makefile"]);

    install_tree(&src, &dst, &TreeFilter::Match(vec!["*.h".into()])).unwrap();

    assert!(dst.join("atomic_ops.h").is_file());
    assert!(dst.join("atomic_ops/sysdeps/gcc/x86.h").is_file());
    assert!(!dst.join("atomic_ops.c").exists());
    assert!(!dst.join("Makefile").exists());
  }

  #[test]
  fn ignore_prunes_entries() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("alsa");
    let dst = temp.path().join("include/alsa");
    tree(&src, &["asoundlib.h", "pcm.h", "alsa/nested.h"]);

    install_tree(&src, &dst, &TreeFilter::Ignore(vec!["alsa".into()])).unwrap();

    assert!(dst.join("asoundlib.h").is_file());
    assert!(dst.join("pcm.h").is_file());
    assert!(!dst.join("alsa").exists());
  }

  #[test]
  fn install_files_expands_globs() {
    let temp = TempDir::new().unwrap();
    let libs = temp.path().join(".libs");
    tree(&libs, &["libasound.so", "libasound.so.2", "libasound.so.2.0.0", "libasound.la"]);
    let rpath = temp.path().join("rpath");

    install_files(&libs.join("libasound.so.*"), &rpath).unwrap();

    let mut names: Vec<String> = fs::read_dir(&rpath)
      .unwrap()
      .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
      .collect();
    names.sort();
    assert_eq!(names, ["libasound.so.2", "libasound.so.2.0.0"]);
  }

  #[test]
  fn install_files_without_match_creates_nothing() {
    let temp = TempDir::new().unwrap();
    let dst = temp.path().join("lib");

    install_files(&temp.path().join("missing.a"), &dst).unwrap();

    assert!(!dst.exists());
  }

  #[test]
  #[cfg(unix)]
  fn install_files_keeps_mode() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let tool = temp.path().join("gengetopt");
    fs::write(&tool, "#!/bin/sh\n").unwrap();
    fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

    install_files(&tool, &temp.path().join("bin")).unwrap();

    let mode = fs::metadata(temp.path().join("bin/gengetopt")).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
  }
}
