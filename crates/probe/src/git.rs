//! Git checkout identification.

use std::path::Path;

use tracing::debug;

/// Length of the abbreviated commit hash.
const SHORT_HASH_LEN: usize = 10;

/// Abbreviated hash of the commit `HEAD` points to in `repo_dir`.
///
/// `None` when `repo_dir` is not a repository or `HEAD` is unborn.
pub fn parse_git_head(repo_dir: &Path) -> Option<String> {
  let repo = match gix::open(repo_dir) {
    Ok(repo) => repo,
    Err(err) => {
      debug!(path = %repo_dir.display(), error = %err, "not a git repository");
      return None;
    }
  };

  let id = repo.head().ok()?.id()?;
  Some(id.to_hex_with_len(SHORT_HASH_LEN).to_string())
}
