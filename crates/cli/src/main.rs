use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use tpbuild_cli::cmd::{BuildArgs, USAGE, cmd_build};
use tpbuild_cli::logging;
use tpbuild_cli::output::print_error;

fn main() -> ExitCode {
  let args = match BuildArgs::try_parse() {
    Ok(args) => args,
    Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => err.exit(),
    Err(_) => {
      print_error(USAGE);
      return ExitCode::from(1);
    }
  };

  logging::init(args.verbose);

  cmd_build(args)
}
