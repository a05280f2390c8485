use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tpbuild_cli::cmd::{ProbeArgs, cmd_probe};
use tpbuild_cli::logging;

fn main() -> Result<ExitCode> {
  let args = ProbeArgs::parse();
  logging::init(args.verbose);

  cmd_probe(args)
}
