use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tpbuild_lib::{BuildContext, BuildDir, BuildError, EnvOverrides, Variant, build_package};
use tpbuild_platform::SystemRunner;
use tracing::debug;

use crate::output::print_error;

pub const USAGE: &str = "usage: build-3rdparty workdir vendordir toolchain variant package deplist [env]";

/// Fetch, build and install one third-party dependency
#[derive(Parser, Debug)]
#[command(name = "build-3rdparty", version, about, long_about = None)]
pub struct BuildArgs {
  /// Directory holding one build directory per package
  pub workdir: PathBuf,

  /// Directory searched for pre-downloaded archives
  pub vendordir: PathBuf,

  /// Target triple, empty for a native build
  pub toolchain: String,

  /// Build variant (debug or release)
  pub variant: String,

  /// Package to build, as <name>-<version>
  pub package: String,

  /// Colon-separated list of already built packages to build against
  pub deplist: String,

  /// Tool and flag overrides such as CC=clang
  pub env: Vec<String>,

  /// Enable verbose output
  #[arg(short, long)]
  pub verbose: bool,
}

/// Run a build, reporting any failure on stderr.
pub fn cmd_build(args: BuildArgs) -> ExitCode {
  match run(&args) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      report(&args, &err);
      ExitCode::FAILURE
    }
  }
}

fn run(args: &BuildArgs) -> Result<(), BuildError> {
  let variant: Variant = args.variant.parse()?;
  let env = EnvOverrides::parse(args.env.as_slice())?;

  let mut ctx = BuildContext::new(absolute(&args.workdir)?, absolute(&args.vendordir)?, &args.toolchain, variant)
    .with_deplist(&args.deplist)
    .with_env(env);
  ctx.external_cmake_toolchain = std::env::var_os("OE_CMAKE_TOOLCHAIN_FILE").is_some();
  debug!(?ctx, "build context");

  build_package(&ctx, &args.package, &SystemRunner)?;
  Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf, BuildError> {
  std::path::absolute(path).map_err(|source| BuildError::Path {
    path: path.to_path_buf(),
    source,
  })
}

fn report(args: &BuildArgs, err: &BuildError) {
  let BuildError::CmdFailed { .. } = err else {
    print_error(err);
    return;
  };

  debug!(error = %err, "build command failed");
  let log = BuildDir::new(&args.workdir, &args.package).log_path();
  let mut message = format!(
    "can't make '{}', see '{}' for details",
    args.package,
    log.display()
  );

  if is_ci() {
    if let Ok(contents) = std::fs::read_to_string(&log) {
      message.push_str("\n\n");
      message.push_str(&contents);
    }
  }

  print_error(message);
}

fn is_ci() -> bool {
  matches!(std::env::var("CI").as_deref(), Ok("1" | "true"))
}
