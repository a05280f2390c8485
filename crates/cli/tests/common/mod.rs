//! Shared helpers for CLI integration tests.
#![allow(dead_code)]

use std::ffi::OsString;
use std::fs::{self, File};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;

pub fn build_cmd() -> Command {
  cargo_bin_cmd!("build-3rdparty")
}

pub fn probe_cmd() -> Command {
  cargo_bin_cmd!("tpbuild-probe")
}

/// Isolated work, vendor and tool directories.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    for dir in ["work", "vendor", "bin"] {
      fs::create_dir_all(temp.path().join(dir)).unwrap();
    }
    Self { temp }
  }

  pub fn work_dir(&self) -> PathBuf {
    self.temp.path().join("work")
  }

  pub fn vendor_dir(&self) -> PathBuf {
    self.temp.path().join("vendor")
  }

  pub fn build_dir(&self, package: &str) -> PathBuf {
    self.work_dir().join(package)
  }

  /// Put an executable shell script named `name` on the test `PATH`.
  pub fn fake_tool(&self, name: &str, script: &str) {
    write_script(&self.temp.path().join("bin").join(name), script);
  }

  /// `PATH` with the fake tools first.
  pub fn path_var(&self) -> OsString {
    let mut paths = vec![self.temp.path().join("bin")];
    if let Some(path) = std::env::var_os("PATH") {
      paths.extend(std::env::split_paths(&path));
    }
    std::env::join_paths(paths).unwrap()
  }

  /// `build-3rdparty` for a native release build of `package`.
  pub fn build(&self, package: &str) -> Command {
    let mut cmd = build_cmd();
    cmd
      .arg(self.work_dir())
      .arg(self.vendor_dir())
      .args(["", "release", package, ""])
      .env("PATH", self.path_var())
      .env_remove("CI")
      .env_remove("OE_CMAKE_TOOLCHAIN_FILE");
    cmd
  }
}

pub fn write_script(path: &Path, script: &str) {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  fs::write(path, script).unwrap();
  fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Write a `.tar.gz` whose entries are `(path, contents, mode)`.
pub fn write_tarball(path: &Path, entries: &[(&str, &str, u32)]) {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  let encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
  let mut builder = tar::Builder::new(encoder);

  for (name, contents, mode) in entries {
    let mut header = tar::Header::new_gnu();
    header.set_size(contents.len() as u64);
    header.set_mode(*mode);
    header.set_cksum();
    builder.append_data(&mut header, name, contents.as_bytes()).unwrap();
  }

  builder.into_inner().unwrap().finish().unwrap();
}
