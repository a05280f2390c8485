//! Stage progress lines on stdout.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use owo_colors::{OwoColorize, Stream};

/// Print `[tag] message`.
pub fn stage(tag: &str, message: impl Display) {
  let tag = format!("[{tag}]");
  println!("{} {}", tag.if_supports_color(Stream::Stdout, |s| s.yellow()), message);
}

/// `path` relative to the current directory when it lies below it.
pub fn display_path(path: &Path) -> PathBuf {
  std::env::current_dir()
    .ok()
    .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
    .unwrap_or_else(|| path.to_path_buf())
}
