//! Target triple detection and normalization.

use std::sync::LazyLock;

use regex::Regex;
use tpbuild_platform::CommandRunner;

static TARGET_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bTarget:\s*(\S+)").expect("valid regex"));
static TRIPLE_LIKE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\S+-\S+$").expect("valid regex"));

/// Bring a target triple into the `arch-vendor-os[-abi]` form.
///
/// Red Hat compilers report `-redhat-linux`, some distros omit the vendor
/// field, and older `config.guess` reports `unknown` where newer ones say
/// `pc`. All of these collapse to the modern form.
pub fn normalize_target(triple: &str) -> String {
  let triple = triple.replace("-redhat-linux", "-linux-gnu");
  let mut parts: Vec<&str> = triple.split('-').collect();

  match parts.len() {
    3 => parts.insert(1, "pc"),
    4 if parts[1] == "unknown" => parts[1] = "pc",
    _ => {}
  }

  parts.join("-")
}

/// Normalized target triple from a compiler's `-v -E -` output.
pub fn parse_compiler_target(runner: &impl CommandRunner, compiler: &str) -> Option<String> {
  let text = runner.command_output(compiler, &["-v", "-E", "-"])?;

  text
    .lines()
    .find_map(|line| TARGET_LINE.captures(line))
    .map(|caps| normalize_target(&caps[1]))
}

/// Normalized triple printed by a `config.guess`-style command.
///
/// Output that does not look like a single triple is rejected.
pub fn parse_config_guess(runner: &impl CommandRunner, command: &str) -> Option<String> {
  let text = runner.command_output(command, &[])?;

  if !TRIPLE_LIKE.is_match(&text) {
    return None;
  }

  Some(normalize_target(&text))
}
