//! Archive download with ordered fallbacks.
//!
//! Strategies are tried in a fixed order and the first success wins:
//! a copy already in `src/`, the vendor tree, an in-process HTTP GET,
//! then `curl` and `wget`. Downloads land in `tmp/` first and are renamed
//! into `src/` so a partial file is never mistaken for a finished one.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use tpbuild_platform::shell;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::layout::{BuildDir, remove_empty_dir, remove_path};
use crate::log::BuildLog;
use crate::progress::stage;
use crate::BuildError;

/// External download tools, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tool {
  Curl,
  Wget,
}

impl Tool {
  fn name(self) -> &'static str {
    match self {
      Tool::Curl => "curl",
      Tool::Wget => "wget",
    }
  }

  fn command(self, url: &str, dest: &Path) -> String {
    let url = shell::quote(url);
    let dest = shell::quote(&dest.to_string_lossy()).into_owned();
    match self {
      Tool::Curl => format!("curl -fLs {url} -o {dest}"),
      Tool::Wget => format!("wget {url} --quiet -O {dest}"),
    }
  }
}

/// Downloads archives into a package's `src/` directory.
pub struct Fetcher<'a> {
  layout: &'a BuildDir,
  vendor_dir: &'a Path,
  log: &'a BuildLog,
  client: Option<Client>,
}

impl<'a> Fetcher<'a> {
  pub fn new(layout: &'a BuildDir, vendor_dir: &'a Path, log: &'a BuildLog) -> Self {
    let client = Client::builder()
      .user_agent(concat!("tpbuild/", env!("CARGO_PKG_VERSION")))
      .connect_timeout(Duration::from_secs(30))
      .timeout(None)
      .build()
      .inspect_err(|err| warn!(error = %err, "can't create HTTP client"))
      .ok();

    Self {
      layout,
      vendor_dir,
      log,
      client,
    }
  }

  /// Make `src/<name>` available, fetching it from `url` if needed.
  pub fn download(&self, url: &str, name: &str) -> Result<(), BuildError> {
    let dest = self.layout.src_dir().join(name);

    if dest.exists() {
      stage("found downloaded", name);
      return Ok(());
    }

    let tmp_dir = self.layout.tmp_dir();
    let tmp = tmp_dir.join(name);
    remove_path(&tmp)?;
    fs::create_dir_all(&tmp_dir).map_err(BuildError::at(&tmp_dir))?;

    match find_vendored(self.vendor_dir, name) {
      Ok(Some(vendored)) => {
        stage("found vendored", name);
        if copy_vendored(&vendored, &tmp) {
          return self.finish(&tmp, &dest);
        }
      }
      Ok(None) => debug!(name, vendor_dir = %self.vendor_dir.display(), "not vendored"),
      Err(err) => warn!(error = %err, "vendor lookup failed"),
    }

    stage("download", url);

    let mut last_error = match self.fetch_http(url, &tmp) {
      Ok(()) => return self.finish(&tmp, &dest),
      Err(err) => err,
    };

    for tool in [Tool::Curl, Tool::Wget] {
      match self.fetch_tool(tool, url, &tmp) {
        Ok(()) => return self.finish(&tmp, &dest),
        Err(err) => last_error = err,
      }
    }

    remove_path(&tmp)?;
    remove_empty_dir(&tmp_dir);

    Err(BuildError::Download {
      url: url.to_string(),
      reason: last_error,
    })
  }

  fn fetch_http(&self, url: &str, tmp: &Path) -> Result<(), String> {
    let client = self.client.as_ref().ok_or("no HTTP client")?;

    info!(url = %url, "fetching URL");

    let response = client.get(url).send().map_err(|e| e.to_string())?;
    if !response.status().is_success() {
      return Err(format!("HTTP {}", response.status()));
    }

    let bytes = response.bytes().map_err(|e| e.to_string())?;
    let mut file = fs::File::create(tmp).map_err(|e| e.to_string())?;
    file.write_all(&bytes).map_err(|e| e.to_string())?;

    info!(path = %tmp.display(), size = bytes.len(), "download complete");
    Ok(())
  }

  fn fetch_tool(&self, tool: Tool, url: &str, tmp: &Path) -> Result<(), String> {
    stage(&format!("trying {}", tool.name()), url);

    let cmd = tool.command(url, tmp);
    let cwd = self.layout.root();

    match self.log.run_shell(&cmd, cwd, false) {
      Ok(Some(0)) if tmp.is_file() => Ok(()),
      Ok(Some(0)) => Err(format!("{} produced no file", tool.name())),
      Ok(code) => Err(format!("{} exited with status {code:?}", tool.name())),
      Err(err) => Err(err.to_string()),
    }
  }

  fn finish(&self, tmp: &Path, dest: &Path) -> Result<(), BuildError> {
    fs::rename(tmp, dest).map_err(BuildError::at(dest))?;
    remove_empty_dir(&self.layout.tmp_dir());
    Ok(())
  }
}

/// Copy a vendored archive into staging. Failures are logged so the
/// network strategies can take over.
fn copy_vendored(vendored: &Path, tmp: &Path) -> bool {
  match fs::copy(vendored, tmp) {
    Ok(_) => true,
    Err(err) => {
      warn!(path = %vendored.display(), error = %err, "can't copy vendored archive");
      false
    }
  }
}

/// Search `vendor_dir` recursively for a file named `name`.
///
/// A missing vendor directory simply has nothing in it. Other I/O failures
/// are reported so they are not confused with "not vendored".
pub fn find_vendored(vendor_dir: &Path, name: &str) -> Result<Option<PathBuf>, BuildError> {
  if !vendor_dir.exists() {
    return Ok(None);
  }

  for entry in WalkDir::new(vendor_dir).follow_links(true).sort_by_file_name() {
    let entry = entry.map_err(|source| BuildError::Vendor {
      path: vendor_dir.to_path_buf(),
      source,
    })?;

    if entry.file_type().is_file() && entry.file_name() == name {
      return Ok(Some(entry.into_path()));
    }
  }

  Ok(None)
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  struct Fixture {
    _temp: TempDir,
    layout: BuildDir,
    vendor: PathBuf,
    log: BuildLog,
  }

  fn fixture() -> Fixture {
    let temp = TempDir::new().unwrap();
    let layout = BuildDir::new(temp.path(), "libuv-1.44.2");
    layout.prepare().unwrap();
    let vendor = temp.path().join("vendor");
    std::fs::create_dir_all(&vendor).unwrap();
    let log = BuildLog::new(layout.log_path());
    Fixture {
      _temp: temp,
      layout,
      vendor,
      log,
    }
  }

  #[test]
  fn existing_download_is_reused() {
    let f = fixture();
    std::fs::write(f.layout.src_dir().join("a.tar.gz"), "cached").unwrap();

    Fetcher::new(&f.layout, &f.vendor, &f.log)
      .download("http://127.0.0.1:9/a.tar.gz", "a.tar.gz")
      .unwrap();

    assert_eq!(std::fs::read_to_string(f.layout.src_dir().join("a.tar.gz")).unwrap(), "cached");
    assert!(!f.log.path().exists());
  }

  #[test]
  fn vendored_copy_preempts_network() {
    let f = fixture();
    let nested = f.vendor.join("deep/er");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(nested.join("a.tar.gz"), "vendored").unwrap();

    let mut server = mockito::Server::new();
    let mock = server.mock("GET", "/a.tar.gz").with_body("network").expect(0).create();

    Fetcher::new(&f.layout, &f.vendor, &f.log)
      .download(&format!("{}/a.tar.gz", server.url()), "a.tar.gz")
      .unwrap();

    mock.assert();
    assert_eq!(std::fs::read_to_string(f.layout.src_dir().join("a.tar.gz")).unwrap(), "vendored");
    assert!(!f.layout.tmp_dir().exists());
  }

  #[test]
  fn vendored_copy_failure_is_reported_not_raised() {
    let f = fixture();
    let tmp = f.layout.tmp_dir();
    std::fs::create_dir_all(&tmp).unwrap();

    assert!(!copy_vendored(&f.vendor.join("gone.tar.gz"), &tmp.join("gone.tar.gz")));

    std::fs::write(f.vendor.join("a.tar.gz"), "vendored").unwrap();
    assert!(copy_vendored(&f.vendor.join("a.tar.gz"), &tmp.join("a.tar.gz")));
    assert_eq!(std::fs::read_to_string(tmp.join("a.tar.gz")).unwrap(), "vendored");
  }

  #[test]
  fn network_preempts_external_tools() {
    let f = fixture();
    let mut server = mockito::Server::new();
    let mock = server.mock("GET", "/a.tar.gz").with_body("network").create();

    Fetcher::new(&f.layout, &f.vendor, &f.log)
      .download(&format!("{}/a.tar.gz", server.url()), "a.tar.gz")
      .unwrap();

    mock.assert();
    assert_eq!(std::fs::read_to_string(f.layout.src_dir().join("a.tar.gz")).unwrap(), "network");
    let log = std::fs::read_to_string(f.log.path()).unwrap_or_default();
    assert!(!log.contains(">>> curl"));
    assert!(!log.contains(">>> wget"));
  }

  #[test]
  #[cfg(unix)]
  fn http_error_falls_back_and_reports_failure() {
    let f = fixture();
    let mut server = mockito::Server::new();
    server.mock("GET", "/missing.tar.gz").with_status(404).create();
    let url = format!("{}/missing.tar.gz", server.url());

    let err = Fetcher::new(&f.layout, &f.vendor, &f.log)
      .download(&url, "missing.tar.gz")
      .unwrap_err();

    assert!(matches!(err, BuildError::Download { url: ref u, .. } if *u == url));
    assert!(!f.layout.src_dir().join("missing.tar.gz").exists());
    assert!(!f.layout.tmp_dir().exists());

    let log = f.log.contents().unwrap();
    assert!(log.contains(">>> curl -fLs"));
    assert!(log.contains(">>> wget"));
  }

  #[test]
  fn vendor_lookup_distinguishes_absence() {
    let temp = TempDir::new().unwrap();
    assert!(find_vendored(&temp.path().join("none"), "a.tar.gz").unwrap().is_none());
    assert!(find_vendored(temp.path(), "a.tar.gz").unwrap().is_none());

    std::fs::create_dir(temp.path().join("a.tar.gz")).unwrap();
    assert!(find_vendored(temp.path(), "a.tar.gz").unwrap().is_none());
  }

  #[test]
  fn tool_commands_quote_arguments() {
    let url = "https://example.com/y.tar.gz?a=1&b=2";
    let cmd = Tool::Curl.command(url, Path::new("/tmp/my dir/y.tar.gz"));
    assert_eq!(
      cmd,
      format!("curl -fLs {} -o {}", shell::quote(url), shell::quote("/tmp/my dir/y.tar.gz"))
    );
    assert!(cmd.contains("'/tmp/my dir/y.tar.gz'"));

    let cmd = Tool::Wget.command(url, Path::new("/t/y"));
    assert!(cmd.starts_with("wget "));
    assert!(cmd.ends_with(&format!("--quiet -O {}", shell::quote("/t/y"))));
  }
}
