//! Version scraping from tool banners.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tpbuild_platform::CommandRunner;

static TOOL_VERSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[0-9][0-9.]+\b").expect("valid regex"));

/// Version formats tried in order: three components beat two.
static VERSION_FORMATS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
  [
    Regex::new(r"\b([0-9]+\.[0-9]+\.[0-9]+)\b").expect("valid regex"),
    Regex::new(r"\b([0-9]+\.[0-9]+)\b").expect("valid regex"),
  ]
});

static CLANG_FORMATS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
  [
    Regex::new(r"(?:LLVM|clang)\s+version\s+\b([0-9]+\.[0-9]+\.[0-9]+)\b").expect("valid regex"),
    Regex::new(r"(?:LLVM|clang)\s+version\s+\b([0-9]+\.[0-9]+)\b").expect("valid regex"),
  ]
});

static PARENTHESIZED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^)]+\)").expect("valid regex"));

/// Dotted numeric compiler version, ordered component by component.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CompilerVersion(pub Vec<u32>);

impl CompilerVersion {
  /// Parse `"9.4.0"` style strings. Every component must be numeric.
  pub fn parse(s: &str) -> Option<Self> {
    let parts = s
      .split('.')
      .map(|part| part.parse::<u32>().ok())
      .collect::<Option<Vec<_>>>()?;
    if parts.is_empty() { None } else { Some(Self(parts)) }
  }

  pub fn components(&self) -> &[u32] {
    &self.0
  }

  pub fn major(&self) -> u32 {
    self.0.first().copied().unwrap_or(0)
  }
}

impl fmt::Display for CompilerVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let text = self.0.iter().map(u32::to_string).collect::<Vec<_>>().join(".");
    f.write_str(&text)
  }
}

/// First version-looking token in the output of `command`.
///
/// `command` is the program followed by its arguments.
pub fn parse_tool_version(runner: &impl CommandRunner, command: &[&str]) -> Option<String> {
  let (program, args) = command.split_first()?;
  let text = runner.command_output(program, args)?;
  TOOL_VERSION.find(&text).map(|m| m.as_str().to_string())
}

/// Determine a compiler's version.
///
/// Clang and Apple LLVM banners are recognised first. Otherwise the
/// `-dumpversion` output, the `--version` banner with parenthesised vendor
/// text removed, and finally the raw banner are searched in that order.
pub fn parse_compiler_version(runner: &impl CommandRunner, compiler: &str) -> Option<CompilerVersion> {
  let full_text = runner.command_output(compiler, &["--version"]).unwrap_or_default();

  for regex in CLANG_FORMATS.iter() {
    if let Some(caps) = regex.captures(&full_text) {
      return CompilerVersion::parse(&caps[1]);
    }
  }

  let trunc_text = PARENTHESIZED.replace_all(&full_text, "").into_owned();
  let dump_text = runner.command_output(compiler, &["-dumpversion"]).unwrap_or_default();

  for text in [&dump_text, &trunc_text, &full_text] {
    for regex in VERSION_FORMATS.iter() {
      if let Some(caps) = regex.captures(text) {
        return CompilerVersion::parse(&caps[1]);
      }
    }
  }

  None
}
