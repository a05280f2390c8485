use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tpbuild_platform::SystemRunner;
use tpbuild_probe::{
  BuildEnv, needs_build, parse_compiler_directory, parse_compiler_target, parse_compiler_version, parse_config_guess,
  parse_git_head, parse_link_dirs, parse_list, parse_pkg_config, parse_thirdparty_list, parse_tool_version,
};

use crate::output::{OutputFormat, print_json, print_lines, print_value};

/// Inspect host tools and compilers for the build configuration
#[derive(Parser, Debug)]
#[command(name = "tpbuild-probe", version, about, long_about = None)]
pub struct ProbeArgs {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Output format
  #[arg(short, long, value_enum, default_value_t, global = true)]
  pub format: OutputFormat,

  #[command(subcommand)]
  pub command: ProbeCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProbeCommand {
  /// First version number printed by a command
  ToolVersion {
    /// Command and its arguments, e.g. `make --version`
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
  },

  /// Short hash of the checked out commit
  GitHead {
    #[arg(default_value = ".")]
    repo: PathBuf,
  },

  /// Compiler version as dotted numbers
  CompilerVersion { compiler: String },

  /// Normalized target triple of a compiler
  CompilerTarget { compiler: String },

  /// Installation directory reported by a clang-style compiler
  CompilerDir { compiler: String },

  /// Library search directories of a linker
  LinkDirs { linker: String },

  /// Normalized triple printed by a config.guess-style command
  ConfigGuess { command: String },

  /// Flags reported by pkg-config, sorted by kind
  PkgConfig {
    /// Arguments passed to pkg-config, e.g. `--cflags --libs libuv`
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
  },

  /// Expand a comma-separated selection, `all` meaning every choice
  List {
    selection: String,

    /// Comma-separated list of every choice
    #[arg(long, value_delimiter = ',', default_value = "")]
    all: Vec<String>,
  },

  /// Parse a `name:version,...` third-party list
  ThirdpartyList { list: String },

  /// Print the package if its build directory has no commit marker
  NeedsBuild { build_root: PathBuf, package: String },
}

#[derive(Debug, Serialize)]
struct ThirdParty {
  name: String,
  version: Option<String>,
}

impl fmt::Display for ThirdParty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.version {
      Some(version) => write!(f, "{}:{}", self.name, version),
      None => f.write_str(&self.name),
    }
  }
}

/// Run one probe. Nothing found exits 1 without output.
pub fn cmd_probe(args: ProbeArgs) -> Result<ExitCode> {
  let runner = SystemRunner;
  let format = args.format;

  match args.command {
    ProbeCommand::ToolVersion { command } => {
      let command: Vec<&str> = command.iter().map(String::as_str).collect();
      found(parse_tool_version(&runner, &command), format)
    }
    ProbeCommand::GitHead { repo } => found(parse_git_head(&repo), format),
    ProbeCommand::CompilerVersion { compiler } => found(parse_compiler_version(&runner, &compiler), format),
    ProbeCommand::CompilerTarget { compiler } => found(parse_compiler_target(&runner, &compiler), format),
    ProbeCommand::CompilerDir { compiler } => found(parse_compiler_directory(&runner, &compiler), format),
    ProbeCommand::LinkDirs { linker } => {
      let dirs: Vec<String> = parse_link_dirs(&runner, &linker)
        .iter()
        .map(|dir| dir.display().to_string())
        .collect();
      found_all(&dirs, format)
    }
    ProbeCommand::ConfigGuess { command } => found(parse_config_guess(&runner, &command), format),
    ProbeCommand::PkgConfig { args } => {
      let args: Vec<&str> = args.iter().map(String::as_str).collect();
      let pkg_config = std::env::var("PKG_CONFIG").ok().filter(|p| !p.is_empty());

      let mut env = BuildEnv::new();
      if !parse_pkg_config(&runner, &mut env, pkg_config.as_deref(), &args) {
        return Ok(ExitCode::FAILURE);
      }
      print_build_env(&env, format)?;
      Ok(ExitCode::SUCCESS)
    }
    ProbeCommand::List { selection, all } => {
      let all: Vec<String> = all.into_iter().filter(|choice| !choice.is_empty()).collect();
      found_all(&parse_list(&selection, all.as_slice()), format)
    }
    ProbeCommand::ThirdpartyList { list } => {
      let entries: Vec<ThirdParty> = parse_thirdparty_list(&list)
        .into_iter()
        .map(|(name, version)| ThirdParty { name, version })
        .collect();
      found_all(&entries, format)
    }
    ProbeCommand::NeedsBuild { build_root, package } => {
      let pending = needs_build(&build_root, &package).then_some(package);
      found(pending, format)
    }
  }
}

fn found<T: Serialize + fmt::Display>(value: Option<T>, format: OutputFormat) -> Result<ExitCode> {
  let Some(value) = value else {
    return Ok(ExitCode::FAILURE);
  };
  print_value(&value, format)?;
  Ok(ExitCode::SUCCESS)
}

fn found_all<T: Serialize + fmt::Display>(items: &[T], format: OutputFormat) -> Result<ExitCode> {
  if items.is_empty() {
    return Ok(ExitCode::FAILURE);
  }
  print_lines(items, format)?;
  Ok(ExitCode::SUCCESS)
}

fn print_build_env(env: &BuildEnv, format: OutputFormat) -> Result<()> {
  if format.is_json() {
    return print_json(env);
  }

  let fields = [
    ("cpppath", &env.cpppath),
    ("cppdefines", &env.cppdefines),
    ("libpath", &env.libpath),
    ("libs", &env.libs),
    ("ccflags", &env.ccflags),
    ("linkflags", &env.linkflags),
  ];
  for (name, values) in fields {
    if !values.is_empty() {
      println!("{}: {}", name, values.join(" "));
    }
  }
  Ok(())
}
