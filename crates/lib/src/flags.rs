//! Compiler and linker flag synthesis.

use std::path::Path;

use tpbuild_platform::shell;

use crate::context::Variant;
use crate::layout::{INCLUDE_DIR, LIB_DIR, RPATH_DIR};
use crate::toolchain::{Family, Toolchain};

/// `CXXFLAGS=.. CFLAGS=.. LDFLAGS=..` assignments for `configure`.
///
/// ```ignore
/// let flags = MakeFlags::new(&toolchain, work_dir)
///   .deps(&ctx.deps)
///   .cflags("-fPIC")
///   .variant(ctx.variant)
///   .render();
/// ```
pub struct MakeFlags<'a> {
  toolchain: Toolchain<'a>,
  work_dir: &'a Path,
  deps: &'a [String],
  cflags: &'a str,
  ldflags: &'a str,
  variant: Option<Variant>,
  pthread: bool,
}

impl<'a> MakeFlags<'a> {
  pub fn new(toolchain: Toolchain<'a>, work_dir: &'a Path) -> Self {
    Self {
      toolchain,
      work_dir,
      deps: &[],
      cflags: "",
      ldflags: "",
      variant: None,
      pthread: false,
    }
  }

  /// Dependencies whose `include/`, `lib/` and `rpath/` are searched.
  pub fn deps(mut self, deps: &'a [String]) -> Self {
    self.deps = deps;
    self
  }

  pub fn cflags(mut self, cflags: &'a str) -> Self {
    self.cflags = cflags;
    self
  }

  pub fn ldflags(mut self, ldflags: &'a str) -> Self {
    self.ldflags = ldflags;
    self
  }

  /// Add `-ggdb`/`-g` for debug or `-O2` for release.
  pub fn variant(mut self, variant: Variant) -> Self {
    self.variant = Some(variant);
    self
  }

  /// Link with threads. Ignored on Android where libc provides them.
  pub fn pthread(mut self) -> Self {
    self.pthread = true;
    self
  }

  /// Compiler and linker flag lists.
  pub fn build(&self) -> (Vec<String>, Vec<String>) {
    let mut cflags: Vec<String> = Vec::new();
    let mut ldflags: Vec<String> = Vec::new();

    if !self.cflags.is_empty() {
      cflags.push(self.cflags.to_string());
    }
    for dep in self.deps {
      cflags.push(format!("-I{}", self.work_dir.join(dep).join(INCLUDE_DIR).display()));
    }
    for dep in self.deps {
      ldflags.push(format!("-L{}", self.work_dir.join(dep).join(LIB_DIR).display()));
    }
    if !self.ldflags.is_empty() {
      ldflags.push(self.ldflags.to_string());
    }

    let is_gnu = self.toolchain.check_family(Family::Gnu);
    let is_clang = self.toolchain.check_family(Family::Clang);

    match self.variant {
      Some(Variant::Debug) if is_gnu || is_clang => cflags.push("-ggdb".into()),
      Some(Variant::Debug) => cflags.push("-g".into()),
      Some(Variant::Release) => cflags.push("-O2".into()),
      None => {}
    }

    if self.pthread && !self.toolchain.is_android() {
      if is_gnu || is_clang {
        cflags.push("-pthread".into());
      }
      ldflags.push(if is_gnu { "-pthread" } else { "-lpthread" }.into());
    }

    if is_gnu {
      for dep in self.deps {
        ldflags.push(format!("-Wl,-rpath-link={}", self.work_dir.join(dep).join(RPATH_DIR).display()));
      }
    }

    (cflags, ldflags)
  }

  pub fn render(&self) -> String {
    let (cflags, ldflags) = self.build();
    let cflags = cflags.join(" ");
    let ldflags = ldflags.join(" ");

    [
      format!("CXXFLAGS={}", shell::quote(&cflags)),
      format!("CFLAGS={}", shell::quote(&cflags)),
      format!("LDFLAGS={}", shell::quote(&ldflags)),
    ]
    .join(" ")
  }
}

/// Arguments for configuring a CMake project for the toolchain.
///
/// `extra` recipe arguments come first, followed by cross-compilation,
/// tool and build type settings.
pub fn cmake_args(toolchain: &Toolchain<'_>, variant: Variant, external_toolchain: bool, extra: &[&str]) -> Vec<String> {
  let mut args: Vec<String> = extra.iter().map(|a| a.to_string()).collect();

  let compiler = toolchain.tool_var("CC", "gcc");
  let mut sysroot = toolchain.sysroot(&compiler);
  let mut need_tools = !external_toolchain;

  if toolchain.is_android() {
    args.push("-DCMAKE_SYSTEM_NAME=Android".into());

    let api = toolchain.android_api(&compiler);
    let abi = toolchain.android_abi();

    match toolchain.android_toolchain_file(&compiler) {
      Some(file) => {
        sysroot = None;
        need_tools = false;
        args.push(shell::quote(&format!("-DCMAKE_TOOLCHAIN_FILE={}", file.display())).into_owned());
        if let Some(api) = api {
          args.push(format!("-DANDROID_NATIVE_API_LEVEL={api}"));
        }
        if let Some(abi) = abi {
          args.push(format!("-DANDROID_ABI={abi}"));
        }
      }
      None => {
        sysroot = toolchain
          .android_sysroot(&compiler)
          .map(|path| path.to_string_lossy().into_owned());
        need_tools = true;
        if let Some(api) = api {
          args.push(format!("-DCMAKE_SYSTEM_VERSION={api}"));
        }
        if let Some(abi) = abi {
          args.push(format!("-DCMAKE_ANDROID_ARCH_ABI={abi}"));
        }
      }
    }
  }

  if let Some(sysroot) = sysroot {
    let sysroot = shell::quote(&sysroot);
    args.push(format!("-DCMAKE_FIND_ROOT_PATH={sysroot}"));
    args.push(format!("-DCMAKE_SYSROOT={sysroot}"));
  }

  if need_tools {
    if !toolchain.is_android() {
      args.push(format!("-DCMAKE_C_COMPILER={}", shell::quote(&toolchain.tool_path(&compiler))));
    }
    let tool = |var: &str, default: &str| shell::quote(&toolchain.tool_path(&toolchain.tool_var(var, default))).into_owned();
    args.push(format!("-DCMAKE_LINKER={}", tool("CCLD", "gcc")));
    args.push(format!("-DCMAKE_AR={}", tool("AR", "ar")));
    args.push(format!("-DCMAKE_RANLIB={}", tool("RANLIB", "ranlib")));
  }

  let mut cc_flags = vec!["-fPIC", "-fvisibility=hidden"];
  if variant.is_debug() {
    cc_flags.push("-ggdb");
    args.push("-DCMAKE_BUILD_TYPE=Debug".into());
    args.push(format!("-DCMAKE_C_FLAGS_DEBUG:STRING={}", shell::quote(&cc_flags.join(" "))));
  } else {
    args.push("-DCMAKE_BUILD_TYPE=Release".into());
    args.push(format!("-DCMAKE_C_FLAGS_RELEASE:STRING={}", shell::quote(&cc_flags.join(" "))));
  }

  args.push("-DCMAKE_POSITION_INDEPENDENT_CODE=ON".into());
  args
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::context::{BuildContext, EnvOverrides};
  use tempfile::TempDir;
  use tpbuild_platform::testing::FakeRunner;

  fn ctx(toolchain: &str, env: &[&str]) -> BuildContext {
    BuildContext::new("/work", "/vendor", toolchain, Variant::Release).with_env(EnvOverrides::parse(env).unwrap())
  }

  #[test]
  fn gnu_cross_build_flags() {
    let c = ctx("arm-linux-gnueabihf", &[]);
    let runner = FakeRunner::new();
    let deps = vec!["libuv-1.44.2".to_string()];

    let (cflags, ldflags) = MakeFlags::new(Toolchain::new(&c, &runner), Path::new("/work"))
      .deps(&deps)
      .cflags("-fPIC")
      .variant(Variant::Release)
      .pthread()
      .build();

    assert_eq!(cflags, ["-fPIC", "-I/work/libuv-1.44.2/include", "-O2", "-pthread"]);
    assert_eq!(
      ldflags,
      [
        "-L/work/libuv-1.44.2/lib",
        "-pthread",
        "-Wl,-rpath-link=/work/libuv-1.44.2/rpath"
      ]
    );
  }

  #[test]
  fn unknown_family_gets_portable_flags() {
    let c = ctx("", &[]);
    let runner = FakeRunner::new();

    let (cflags, ldflags) = MakeFlags::new(Toolchain::new(&c, &runner), Path::new("/work"))
      .variant(Variant::Debug)
      .pthread()
      .build();

    assert_eq!(cflags, ["-g"]);
    assert_eq!(ldflags, ["-lpthread"]);
  }

  #[test]
  fn android_skips_thread_flags() {
    let c = ctx("aarch64-linux-android", &[]);
    let runner = FakeRunner::new();

    let (cflags, ldflags) = MakeFlags::new(Toolchain::new(&c, &runner), Path::new("/work"))
      .pthread()
      .build();

    assert!(cflags.is_empty());
    assert!(ldflags.is_empty());
  }

  #[test]
  fn render_quotes_each_list() {
    let c = ctx("arm-linux-gnueabihf", &[]);
    let runner = FakeRunner::new();

    let rendered = MakeFlags::new(Toolchain::new(&c, &runner), Path::new("/work"))
      .cflags("-w -fPIC")
      .ldflags("-static")
      .render();

    let cflags = shell::quote("-w -fPIC");
    assert_eq!(
      rendered,
      format!("CXXFLAGS={cflags} CFLAGS={cflags} LDFLAGS={}", shell::quote("-static"))
    );
  }

  #[test]
  fn render_empty_flags() {
    let c = ctx("", &[]);
    let runner = FakeRunner::new();
    let rendered = MakeFlags::new(Toolchain::new(&c, &runner), Path::new("/work")).render();
    assert_eq!(rendered, "CXXFLAGS='' CFLAGS='' LDFLAGS=''");
  }

  #[test]
  fn cmake_native_release() {
    let c = ctx("", &[]);
    let runner = FakeRunner::new()
      .with_tool("gcc", "/usr/bin/gcc")
      .with_tool("ar", "/usr/bin/ar")
      .with_tool("ranlib", "/usr/bin/ranlib");

    let args = cmake_args(&Toolchain::new(&c, &runner), Variant::Release, false, &["-DBUILD_STATIC_LIBS=ON"]);

    assert_eq!(args[0], "-DBUILD_STATIC_LIBS=ON");
    assert!(args.contains(&"-DCMAKE_C_COMPILER=/usr/bin/gcc".to_string()));
    assert!(args.contains(&"-DCMAKE_LINKER=/usr/bin/gcc".to_string()));
    assert!(args.contains(&"-DCMAKE_AR=/usr/bin/ar".to_string()));
    assert!(args.contains(&"-DCMAKE_BUILD_TYPE=Release".to_string()));
    assert!(args.contains(&format!(
      "-DCMAKE_C_FLAGS_RELEASE:STRING={}",
      shell::quote("-fPIC -fvisibility=hidden")
    )));
    assert_eq!(args.last().map(String::as_str), Some("-DCMAKE_POSITION_INDEPENDENT_CODE=ON"));
    assert!(!args.iter().any(|a| a.starts_with("-DCMAKE_SYSROOT")));
  }

  #[test]
  fn cmake_debug_adds_ggdb() {
    let c = ctx("", &[]);
    let args = cmake_args(&Toolchain::new(&c, &FakeRunner::new()), Variant::Debug, false, &[]);
    assert!(args.contains(&"-DCMAKE_BUILD_TYPE=Debug".to_string()));
    assert!(args.contains(&format!(
      "-DCMAKE_C_FLAGS_DEBUG:STRING={}",
      shell::quote("-fPIC -fvisibility=hidden -ggdb")
    )));
  }

  #[test]
  fn cmake_external_toolchain_keeps_tools_unset() {
    let c = ctx("", &[]);
    let args = cmake_args(&Toolchain::new(&c, &FakeRunner::new()), Variant::Release, true, &[]);
    assert!(!args.iter().any(|a| a.starts_with("-DCMAKE_C_COMPILER") || a.starts_with("-DCMAKE_AR")));
  }

  #[test]
  fn cmake_cross_sysroot() {
    let temp = TempDir::new().unwrap();
    let sysroot = temp.path().display().to_string();
    let c = ctx("arm-linux-gnueabihf", &[]);
    let runner = FakeRunner::new().with_output("arm-linux-gnueabihf-gcc -print-sysroot", &sysroot);

    let args = cmake_args(&Toolchain::new(&c, &runner), Variant::Release, false, &[]);

    assert!(args.contains(&format!("-DCMAKE_SYSROOT={}", shell::quote(&sysroot))));
    assert!(args.contains(&format!("-DCMAKE_FIND_ROOT_PATH={}", shell::quote(&sysroot))));
    assert!(args.contains(&"-DCMAKE_C_COMPILER=arm-linux-gnueabihf-gcc".to_string()));
  }

  #[test]
  fn cmake_android_with_ndk_toolchain_file() {
    let temp = TempDir::new().unwrap();
    let ndk = temp.path().join("ndk");
    let bin = ndk.join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    std::fs::create_dir_all(ndk.join("build/cmake")).unwrap();
    std::fs::write(ndk.join("build/cmake/android.toolchain.cmake"), "").unwrap();

    let c = ctx("aarch64-linux-android", &["CC=aarch64-linux-android29-clang"]);
    let runner = FakeRunner::new()
      .with_tool("aarch64-linux-android29-clang", &bin.join("clang").display().to_string())
      .with_output("aarch64-linux-android29-clang -dM -E -", "#define __ANDROID_API__ 29");

    let args = cmake_args(&Toolchain::new(&c, &runner), Variant::Release, false, &["-DLIBUV_BUILD_TESTS=OFF"]);

    let file = ndk.join("build/cmake/android.toolchain.cmake");
    assert!(args.contains(&"-DCMAKE_SYSTEM_NAME=Android".to_string()));
    assert!(args.contains(&shell::quote(&format!("-DCMAKE_TOOLCHAIN_FILE={}", file.display())).into_owned()));
    assert!(args.contains(&"-DANDROID_NATIVE_API_LEVEL=29".to_string()));
    assert!(args.contains(&"-DANDROID_ABI=arm64-v8a".to_string()));
    assert!(!args.iter().any(|a| a.starts_with("-DCMAKE_LINKER")));
  }

  #[test]
  fn cmake_android_without_ndk_file_uses_system_version() {
    let c = ctx("armv7a-linux-androideabi", &[]);
    let runner = FakeRunner::new().with_output("armv7a-linux-androideabi-gcc -dM -E -", "#define __ANDROID_API__ 21");

    let args = cmake_args(&Toolchain::new(&c, &runner), Variant::Release, false, &[]);

    assert!(args.contains(&"-DCMAKE_SYSTEM_VERSION=21".to_string()));
    assert!(args.contains(&"-DCMAKE_ANDROID_ARCH_ABI=armeabi-v7a".to_string()));
    assert!(!args.iter().any(|a| a.starts_with("-DCMAKE_C_COMPILER")));
    assert!(args.iter().any(|a| a.starts_with("-DCMAKE_LINKER=")));
  }
}
